use forum_reactions::forum::{Client, ClientBuilder, Kind, Target, error::Error};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(
            "forum_reactions=debug".parse().expect("directive is known to be valid"),
        ))
        .init();

    let base = std::env::var("FORUM_URL")
        .unwrap_or_else(|_| "http://localhost:4000".to_owned())
        .parse()
        .expect("`FORUM_URL` should be a valid url");

    let post: u32 = std::env::var("FORUM_POST")
        .ok()
        .and_then(|post| post.parse().ok())
        .unwrap_or(1);

    let client: Client = match std::env::var("FORUM_SESSION") {
        Ok(session) if !session.is_empty() => ClientBuilder::new(base).with_session(&session).build()?,
        _ => ClientBuilder::new(base).build()?,
    };

    let page = client.post(post).await?;

    for reaction in page.reactions() {
        println!(
            "{} on {}: {} (active: {})",
            reaction.kind(),
            reaction.target(),
            reaction.count(),
            reaction.is_active()
        );
    }

    let Some(like) = page.control(&client, Target::Post { post }, Kind::Like) else {
        println!("post {post} has no like button");
        return Ok(());
    };

    let page = like.click().await?;

    if let Some(reaction) = page.reaction(Target::Post { post }, Kind::Like) {
        println!("after reload: {} likes (active: {})", reaction.count(), reaction.is_active());
    }

    Ok(())
}
