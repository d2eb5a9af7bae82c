//! Represents a client abstraction for a forum.

use super::{
    Page,
    control::Config,
    error::{ClientBuilderError, PageError, Rejected, RequestError, SyncError},
    reaction::Reaction,
};
use crate::stdx::{
    error::Assume,
    http::{DEFAULT_USER_AGENT, SESSION_COOKIE},
};
use reqwest::RequestBuilder;
use scraper::Html;
use std::sync::Arc;
use url::Url;

/// A builder for configuring and creating instances of [`Client`] with custom settings.
///
/// Every client talks to exactly one forum, given by its base URL. The builder
/// is where the user agent and the viewer's session are set.
///
/// # Example
///
/// ```
/// # use forum_reactions::forum::ClientBuilder;
/// let client = ClientBuilder::new("http://localhost:4000".parse().expect("valid url"))
///     .user_agent("custom-agent/1.0")
///     .with_session("3f1c0d4e")
///     .build()?;
/// # Ok::<(), forum_reactions::forum::error::ClientBuilderError>(())
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    builder: reqwest::ClientBuilder,
    base: Url,
    session: Session,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` for the forum at `base`, with default settings.
    ///
    /// This includes a default user agent (`$CARGO_PKG_NAME/$CARGO_PKG_VERSION`), and no session.
    #[inline]
    #[must_use]
    pub fn new(base: Url) -> Self {
        let builder = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .use_rustls_tls()
            .brotli(true);

        Self {
            builder,
            base,
            session: Session::default(),
        }
    }

    /// Configures the `ClientBuilder` to send the given session token with every request.
    ///
    /// The forum knows who is reacting from its `session` cookie. Without one,
    /// the forum treats the requests as coming from a logged out viewer.
    #[inline]
    #[must_use]
    pub fn with_session(mut self, session: &str) -> Self {
        self.session = Session::new(session);
        self
    }

    /// Sets a custom `User-Agent` header for the [`Client`].
    #[inline]
    #[must_use]
    pub fn user_agent(self, user_agent: &str) -> Self {
        let builder = self.builder.user_agent(user_agent);
        Self { builder, ..self }
    }

    /// Consumes the `ClientBuilder` and returns a fully-configured [`Client`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuilderError::BuildFailed`] if the underlying HTTP client could
    /// not be built, such as when TLS initialization fails.
    #[inline]
    pub fn build(self) -> Result<Client, ClientBuilderError> {
        Ok(Client {
            http: self
                .builder
                .build()
                .map_err(|_err| ClientBuilderError::BuildFailed)?,
            base: Arc::new(self.base),
            session: self.session,
        })
    }
}

/// A high-level, asynchronous client to react to posts and comments on a forum.
///
/// Cloning is cheap, and clones share the same connection pool.
///
/// # Example
///
/// ```
/// # use forum_reactions::forum::Client;
/// let client = Client::new("http://localhost:4000".parse().expect("valid url"));
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base: Arc<Url>,
    session: Session,
}

// Creation impls
impl Client {
    /// Instantiates a new [`Client`] for the forum at `base` with default settings.
    ///
    /// # Panics
    ///
    /// This function will panic if the TLS backend cannot be initialized. For an
    /// alternative that returns a `Result`, use the [`ClientBuilder`].
    #[inline]
    #[must_use]
    pub fn new(base: Url) -> Self {
        #[expect(
            clippy::expect_used,
            reason = "it is documented that this can panic and that `ClientBuilder` should be used instead for a `Result`"
        )]
        ClientBuilder::new(base).build().expect("Client::new()")
    }

    /// Instantiates a new [`Client`] for the forum at `base` that sends `session` with every request.
    ///
    /// # Panics
    ///
    /// This function will panic if the TLS backend cannot be initialized. For an
    /// alternative that returns a `Result`, use the [`ClientBuilder`].
    #[inline]
    #[must_use]
    pub fn with_session(base: Url, session: &str) -> Self {
        #[expect(
            clippy::expect_used,
            reason = "it is documented that this can panic and that `ClientBuilder` should be used instead for a `Result`"
        )]
        ClientBuilder::new(base)
            .with_session(session)
            .build()
            .expect("Client::with_session()")
    }

    /// Returns a [`ClientBuilder`] for creating a custom-configured `Client`.
    #[inline]
    #[must_use]
    pub fn builder(base: Url) -> ClientBuilder {
        ClientBuilder::new(base)
    }
}

// Public facing impls
impl Client {
    /// Returns the base URL of the forum the client talks to.
    #[inline]
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Loads the page for the post with the given `id`, from `/post/view/{id}`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use forum_reactions::forum::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), forum_reactions::forum::error::Error> {
    /// let client = Client::new("http://localhost:4000".parse().expect("valid url"));
    /// let page = client.post(1).await?;
    ///
    /// for reaction in page.reactions() {
    ///     println!("{} on {}: {}", reaction.kind(), reaction.target(), reaction.count());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`PageError::RequestFailed`] if the page could not be fetched or the
    /// forum responded with a non-success status, and [`PageError::Malformed`] if the
    /// page could not be read.
    pub async fn post(&self, id: u32) -> Result<Page, PageError> {
        let url = self
            .base
            .join(&format!("/post/view/{id}"))
            .assumption(format!("`/post/view/{id}` should always join onto the base url"))?;

        self.page(&url).await
    }

    /// Loads the post page at `url`.
    ///
    /// This is what reloading a page after a successful reaction does.
    ///
    /// # Errors
    ///
    /// See [`Client::post`].
    pub async fn page(&self, url: &Url) -> Result<Page, PageError> {
        let document = self
            .request(self.http.get(url.clone()))
            .send()
            .await
            .map_err(RequestError)?
            .error_for_status()
            .map_err(RequestError)?
            .text()
            .await
            .map_err(RequestError)?;

        tracing::debug!("loaded page `{url}`");

        let html = Html::parse_document(&document);

        Page::parse(url.clone(), &html)
    }

    /// Sends `reaction` to the forum, as described by `config`.
    ///
    /// The body is posted as JSON to `config.endpoint`. Any `2xx` status counts as
    /// success; the response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Rejected`] for any other status, and
    /// [`SyncError::RequestFailed`] if the forum could not be reached.
    pub async fn sync(&self, config: &Config, reaction: &Reaction) -> Result<(), SyncError> {
        let url = self.base.join(config.endpoint).assumption(format!(
            "`{}` should always join onto the base url",
            config.endpoint
        ))?;

        let response = self
            .request(self.http.post(url))
            .json(&config.body(reaction))
            .send()
            .await
            .map_err(RequestError)?;

        let status = response.status();

        if !status.is_success() {
            return Err(Rejected(status).into());
        }

        Ok(())
    }
}

// Internal impls
impl Client {
    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.cookie() {
            Some(cookie) => builder.header(reqwest::header::COOKIE, cookie),
            None => builder,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Session(Option<Arc<str>>);

impl Session {
    #[inline]
    fn new(session: &str) -> Self {
        Self(Some(Arc::from(session)))
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.0.as_ref().is_none_or(|session| session.is_empty())
    }

    fn cookie(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        self.0
            .as_ref()
            .map(|session| format!("{SESSION_COOKIE}={session}"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn session_should_be_empty() {
        let session = Session::default();
        assert!(session.is_empty());
        assert_eq!(None, session.cookie());
    }

    #[test]
    fn blank_session_should_not_send_cookie() {
        let session = Session::new("");
        assert!(session.is_empty());
        assert_eq!(None, session.cookie());
    }

    #[test]
    fn session_should_render_as_cookie() {
        let session = Session::new("3f1c0d4e");
        assert!(!session.is_empty());
        assert_eq!(Some("session=3f1c0d4e".to_owned()), session.cookie());
    }

    #[test]
    fn builder_should_keep_base_url() {
        let base: Url = "http://localhost:4000/".parse().unwrap();
        let client = Client::builder(base.clone()).build().unwrap();
        assert_eq!(&base, client.base());
    }
}
