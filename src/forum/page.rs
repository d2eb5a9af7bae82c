//! Module for reading reaction state out of a rendered post page.

use super::{
    Client,
    control::{Button, Control},
    error::{MalformedPage, PageError},
    reaction::{Kind, Reaction, Target},
};
use scraper::{ElementRef, Html, Selector};
use std::{fmt, ops::Deref, sync::LazyLock};
use url::Url;

/// A rendered post page, as far as reactions are concerned.
///
/// Holds the viewer's reaction to the post itself and to every comment on it,
/// in the order the buttons appear in the page.
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    post: u32,
    reactions: Vec<(Reaction, Button)>,
}

impl Page {
    /// Reads the reaction state from a rendered post page located at `url`.
    ///
    /// Reaction flags are `true` only if their text is `true` in any casing;
    /// anything else, including a missing flag, is `false`. An empty count is `0`.
    ///
    /// A comment reaction that cannot be read, because its id is missing or not a
    /// number or its count is not a number, is skipped and logged. If the number of
    /// comment counts of a kind does not match the number of comment buttons, the
    /// counts cannot be paired with the buttons and every comment reaction of that
    /// kind is skipped. The rest of the page stays usable in both cases.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Malformed`] if the post id is missing or not a number,
    /// or if the post's own rendered button has no count or a count that is not a number.
    pub fn parse(url: Url, html: &Html) -> Result<Self, PageError> {
        let post = post_id(html)?;

        let mut reactions = Vec::new();

        for kind in [Kind::Like, Kind::Dislike] {
            if let Some(reaction) = post_reaction(html, post, kind)? {
                reactions.push(reaction);
            }
        }

        for kind in [Kind::Like, Kind::Dislike] {
            reactions.extend(comment_reactions(html, post, kind));
        }

        Ok(Self {
            url,
            post,
            reactions,
        })
    }

    /// Returns the URL the page was loaded from.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the id of the post the page shows.
    #[inline]
    #[must_use]
    pub fn post(&self) -> u32 {
        self.post
    }

    /// Returns every reaction rendered on the page.
    pub fn reactions(&self) -> impl Iterator<Item = &Reaction> {
        self.reactions.iter().map(|(reaction, _)| reaction)
    }

    /// Returns the rendered reaction of `kind` on `target`, if the page has one.
    #[must_use]
    pub fn reaction(&self, target: Target, kind: Kind) -> Option<&Reaction> {
        self.reactions()
            .find(|reaction| reaction.target == target && reaction.kind == kind)
    }

    /// Returns the rendered button for the reaction of `kind` on `target`, if the page has one.
    #[must_use]
    pub fn button(&self, target: Target, kind: Kind) -> Option<&Button> {
        self.reactions
            .iter()
            .find(|(reaction, _)| reaction.target == target && reaction.kind == kind)
            .map(|(_, button)| button)
    }

    /// Creates a [`Control`] for every reaction button on the page.
    ///
    /// The post's like and dislike come first, followed by the comment likes
    /// and then the comment dislikes.
    #[must_use]
    pub fn controls(&self, client: &Client) -> Vec<Control> {
        self.reactions
            .iter()
            .map(|(reaction, button)| {
                Control::new(client.clone(), self.url.clone(), *reaction, button.clone())
            })
            .collect()
    }

    /// Creates a [`Control`] for the reaction of `kind` on `target`, if the page has one.
    #[must_use]
    pub fn control(&self, client: &Client, target: Target, kind: Kind) -> Option<Control> {
        self.reactions
            .iter()
            .find(|(reaction, _)| reaction.target == target && reaction.kind == kind)
            .map(|(reaction, button)| {
                Control::new(client.clone(), self.url.clone(), *reaction, button.clone())
            })
    }
}

/// A CSS selector, parsed the first time it is used.
struct Query {
    css: &'static str,
    selector: LazyLock<Selector>,
}

impl Deref for Query {
    type Target = Selector;

    fn deref(&self) -> &Selector {
        &self.selector
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css)
    }
}

macro_rules! queries {
    ($($name:ident = $css:literal;)*) => {
        $(
            static $name: Query = Query {
                css: $css,
                selector: LazyLock::new(|| parse_selector($css)),
            };
        )*
    };
}

queries! {
    POST_ID = "#postID";
    IMG = "img";

    LIKE_BUTTON = "#likeButton";
    LIKE_ICON = "#likeIcon";
    IS_LIKED = "#isLiked";
    LIKE_COUNT = "#likeCount";
    COMMENT_LIKE_BUTTON = ".commentLikeButton";
    COMMENT_LIKE_COUNT = ".commentLikeCount";

    DISLIKE_BUTTON = "#dislikeButton";
    DISLIKE_ICON = "#dislikeIcon";
    IS_DISLIKED = "#isDisliked";
    DISLIKE_COUNT = "#dislikeCount";
    COMMENT_DISLIKE_BUTTON = ".commentDislikeButton";
    COMMENT_DISLIKE_COUNT = ".commentDislikeCount";
}

#[expect(
    clippy::expect_used,
    reason = "queries are string literals known to be valid selectors"
)]
fn parse_selector(css: &str) -> Selector {
    Selector::parse(css).expect("reaction selectors should be valid")
}

/// Elements and attributes a reaction kind is rendered with.
struct Markup {
    button: &'static Query,
    icon: &'static Query,
    flag: &'static Query,
    count: &'static Query,
    comment_button: &'static Query,
    comment_flag: &'static str,
    comment_count: &'static Query,
}

impl Markup {
    fn of(kind: Kind) -> Self {
        match kind {
            Kind::Like => Self {
                button: &LIKE_BUTTON,
                icon: &LIKE_ICON,
                flag: &IS_LIKED,
                count: &LIKE_COUNT,
                comment_button: &COMMENT_LIKE_BUTTON,
                comment_flag: "comment-liked",
                comment_count: &COMMENT_LIKE_COUNT,
            },
            Kind::Dislike => Self {
                button: &DISLIKE_BUTTON,
                icon: &DISLIKE_ICON,
                flag: &IS_DISLIKED,
                count: &DISLIKE_COUNT,
                comment_button: &COMMENT_DISLIKE_BUTTON,
                comment_flag: "comment-disliked",
                comment_count: &COMMENT_DISLIKE_COUNT,
            },
        }
    }
}

fn post_id(html: &Html) -> Result<u32, PageError> {
    let text = select_text(html, &POST_ID).ok_or_else(|| {
        MalformedPage::new(format!(
            "`{POST_ID}` is missing: post page should always render its id"
        ))
    })?;

    let id = text.trim().parse::<u32>().map_err(|err| {
        MalformedPage::new(format!("`{POST_ID}` should be a number, got `{text}`: {err}"))
    })?;

    Ok(id)
}

fn post_reaction(
    html: &Html,
    post: u32,
    kind: Kind,
) -> Result<Option<(Reaction, Button)>, PageError> {
    let markup = Markup::of(kind);

    let Some(button) = select_first(html, markup.button) else {
        return Ok(None);
    };

    let active = select_text(html, markup.flag).is_some_and(|flag| is_true(&flag));

    let text = select_text(html, markup.count).ok_or_else(|| {
        MalformedPage::new(format!(
            "`{}` is missing: a rendered `{}` should always have a count",
            markup.count, markup.button
        ))
    })?;
    let count = parse_count(markup.count, &text)?;

    let icon = select_first(html, markup.icon)
        .or_else(|| first_img(button))
        .and_then(|img| img.attr("src"))
        .map(str::to_owned);

    let reaction = Reaction::new(Target::Post { post }, kind, active, count);

    Ok(Some((reaction, Button::new(icon, text))))
}

/// Reads every comment reaction of `kind`, skipping the ones that cannot be read.
fn comment_reactions(html: &Html, post: u32, kind: Kind) -> Vec<(Reaction, Button)> {
    let markup = Markup::of(kind);

    let buttons: Vec<ElementRef<'_>> = html.select(markup.comment_button).collect();
    let counts: Vec<String> = html.select(markup.comment_count).map(text).collect();

    // Counts pair with buttons by position only, so a missing one shifts every later pair.
    if buttons.len() != counts.len() {
        tracing::warn!(
            post,
            %kind,
            buttons = buttons.len(),
            counts = counts.len(),
            "skipping comment reactions: expected a `{}` for every `{}`",
            markup.comment_count,
            markup.comment_button
        );
        return Vec::new();
    }

    buttons
        .into_iter()
        .zip(counts)
        .filter_map(|(button, text)| match comment_reaction(&markup, post, kind, button, text) {
            Ok(reaction) => Some(reaction),
            Err(err) => {
                tracing::warn!(post, %kind, "skipping comment reaction: {err}");
                None
            }
        })
        .collect()
}

fn comment_reaction(
    markup: &Markup,
    post: u32,
    kind: Kind,
    button: ElementRef<'_>,
    text: String,
) -> Result<(Reaction, Button), MalformedPage> {
    let id = button.attr("comment-id").ok_or_else(|| {
        MalformedPage::new(format!(
            "`comment-id` is missing: `{}` should always have one",
            markup.comment_button
        ))
    })?;

    let comment = id.trim().parse::<u32>().map_err(|err| {
        MalformedPage::new(format!("`comment-id` should be a number, got `{id}`: {err}"))
    })?;

    let active = button.attr(markup.comment_flag).is_some_and(is_true);
    let count = parse_count(markup.comment_count, &text)?;

    let icon = first_img(button)
        .and_then(|img| img.attr("src"))
        .map(str::to_owned);

    let reaction = Reaction::new(Target::Comment { post, comment }, kind, active, count);

    Ok((reaction, Button::new(icon, text)))
}

/// Flags are rendered as `true`/`false`, but any casing of `true` counts.
fn is_true(flag: &str) -> bool {
    flag.trim().eq_ignore_ascii_case("true")
}

fn parse_count(element: &Query, text: &str) -> Result<i64, MalformedPage> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Ok(0);
    }

    trimmed.parse::<i64>().map_err(|err| {
        MalformedPage::new(format!("`{element}` should be a number, got `{text}`: {err}"))
    })
}

fn select_first<'a>(html: &'a Html, query: &Query) -> Option<ElementRef<'a>> {
    html.select(query).next()
}

fn select_text(html: &Html, query: &Query) -> Option<String> {
    select_first(html, query).map(text)
}

fn first_img(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.select(&IMG).next()
}

fn text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
