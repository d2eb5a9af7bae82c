//! Module representing a reaction button that can be clicked.

use super::{
    Client, Page,
    error::{ReactError, ReloadFailed},
    reaction::{Kind, Reaction, Target},
};
use parking_lot::Mutex;
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::sync::Arc;
use url::Url;

/// Describes how one kind of reaction is sent to the forum and shown on the page.
///
/// The forum has four of these: [`POST_LIKE`](Config::POST_LIKE), [`POST_DISLIKE`](Config::POST_DISLIKE),
/// [`COMMENT_LIKE`](Config::COMMENT_LIKE), and [`COMMENT_DISLIKE`](Config::COMMENT_DISLIKE).
/// They only differ in the values held here; everything else about a click is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Path, relative to the forum's base URL, the new state is posted to.
    pub endpoint: &'static str,
    /// Names of the JSON fields carrying the count and the active flag.
    pub fields: Fields,
    /// Icons shown on the button for each state, if the button shows one.
    pub icons: Option<Icons>,
    /// Whether the button's count text is rewritten on click, or only after a reload.
    pub live_count: bool,
}

/// Names of the JSON fields a reaction is sent with.
///
/// The ids are always sent as `postID`, and for comments also as `commentID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields {
    /// Field carrying the new count, e.g. `likeCount`.
    pub count: &'static str,
    /// Field carrying whether the reaction is now active, e.g. `isLiked`.
    pub active: &'static str,
}

/// Icon assets for a button, by reaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icons {
    /// Shown while the reaction is active.
    pub active: &'static str,
    /// Shown while the reaction is not active.
    pub inactive: &'static str,
}

impl Icons {
    #[inline]
    fn for_state(&self, active: bool) -> &'static str {
        if active { self.active } else { self.inactive }
    }
}

impl Config {
    /// Liking a post.
    pub const POST_LIKE: Self = Self {
        endpoint: "/post/like",
        fields: Fields {
            count: "likeCount",
            active: "isLiked",
        },
        icons: Some(Icons {
            active: "/static/img/like.png",
            inactive: "/static/img/unlike.png",
        }),
        live_count: true,
    };

    /// Disliking a post.
    pub const POST_DISLIKE: Self = Self {
        endpoint: "/post/dislike",
        fields: Fields {
            count: "dislikeCount",
            active: "isDisliked",
        },
        icons: None,
        live_count: false,
    };

    /// Liking a comment.
    pub const COMMENT_LIKE: Self = Self {
        endpoint: "/post/commentLike",
        fields: Fields {
            count: "commentLikeCount",
            active: "isCommentLiked",
        },
        icons: Some(Icons {
            active: "/static/img/thumbUpClicked.png",
            inactive: "/static/img/thumbUpUnclicked.png",
        }),
        live_count: true,
    };

    /// Disliking a comment.
    pub const COMMENT_DISLIKE: Self = Self {
        endpoint: "/post/commentDislike",
        fields: Fields {
            count: "commentDislikeCount",
            active: "isCommentDisliked",
        },
        icons: None,
        live_count: false,
    };

    /// Returns the forum's config for the given reaction.
    ///
    /// # Example
    ///
    /// ```
    /// # use forum_reactions::forum::{control::Config, reaction::{Reaction, Target, Kind}};
    /// let reaction = Reaction::new(Target::Comment { post: 1, comment: 7 }, Kind::Dislike, false, 0);
    /// assert_eq!(Config::COMMENT_DISLIKE, Config::for_reaction(&reaction));
    /// ```
    #[must_use]
    pub fn for_reaction(reaction: &Reaction) -> Self {
        match (reaction.target, reaction.kind) {
            (Target::Post { .. }, Kind::Like) => Self::POST_LIKE,
            (Target::Post { .. }, Kind::Dislike) => Self::POST_DISLIKE,
            (Target::Comment { .. }, Kind::Like) => Self::COMMENT_LIKE,
            (Target::Comment { .. }, Kind::Dislike) => Self::COMMENT_DISLIKE,
        }
    }

    /// Returns the body the forum expects for `reaction` under this config.
    #[inline]
    pub(crate) fn body<'a>(&'a self, reaction: &'a Reaction) -> Body<'a> {
        Body {
            fields: &self.fields,
            reaction,
        }
    }
}

/// JSON body of a reaction request.
///
/// Serializes as `{ <count>: int, "commentID": int, "postID": int, <active>: bool }`,
/// with `commentID` only present for comments.
#[derive(Debug)]
pub(crate) struct Body<'a> {
    fields: &'a Fields,
    reaction: &'a Reaction,
}

impl Serialize for Body<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let target = self.reaction.target;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(self.fields.count, &self.reaction.count)?;
        if let Some(comment) = target.comment() {
            map.serialize_entry("commentID", &comment)?;
        }
        map.serialize_entry("postID", &target.post())?;
        map.serialize_entry(self.fields.active, &self.reaction.active)?;
        map.end()
    }
}

/// In-memory copy of a rendered reaction button.
///
/// Clicking a [`Control`] changes this the same way the page would change: the
/// icon swaps and, for some buttons, the count text is rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Button {
    pub(crate) icon: Option<String>,
    pub(crate) count: String,
}

impl Button {
    /// Creates a button as rendered with the given icon source and count text.
    #[inline]
    #[must_use]
    pub fn new(icon: Option<String>, count: impl Into<String>) -> Self {
        Self {
            icon,
            count: count.into(),
        }
    }

    /// Returns the `src` of the icon currently shown, if there is one.
    #[inline]
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Returns the count text currently shown.
    #[inline]
    #[must_use]
    pub fn count(&self) -> &str {
        &self.count
    }
}

#[derive(Debug)]
struct State {
    reaction: Reaction,
    button: Button,
}

/// A clickable reaction button on a forum page.
///
/// Clicking flips the reaction right away, updates the [`Button`], and then sends
/// the new state to the forum. If the forum accepts it, the page is fetched again
/// and returned; the forum's rendering is the source of truth from then on.
///
/// Nothing is rolled back if the forum cannot be reached or rejects the
/// reaction: the control keeps showing the clicked state. Clicks are not
/// debounced either, so clicking again before the first request finished sends
/// a second request with the state after both clicks.
///
/// Clones share their state, so a clone can be clicked from another task.
#[derive(Debug, Clone)]
pub struct Control {
    client: Client,
    config: Config,
    page: Url,
    state: Arc<Mutex<State>>,
}

impl Control {
    /// Creates a control for `reaction`, rendered as `button` on the page at `page`.
    ///
    /// The forum's config for the reaction is picked with [`Config::for_reaction`].
    #[must_use]
    pub fn new(client: Client, page: Url, reaction: Reaction, button: Button) -> Self {
        let config = Config::for_reaction(&reaction);
        Self::with_config(client, config, page, reaction, button)
    }

    /// Creates a control using a custom [`Config`].
    #[must_use]
    pub fn with_config(
        client: Client,
        config: Config,
        page: Url,
        reaction: Reaction,
        button: Button,
    ) -> Self {
        Self {
            client,
            config,
            page,
            state: Arc::new(Mutex::new(State { reaction, button })),
        }
    }

    /// Returns the current local reaction state.
    #[must_use]
    pub fn reaction(&self) -> Reaction {
        self.state.lock().reaction
    }

    /// Returns the button as it currently looks.
    #[must_use]
    pub fn button(&self) -> Button {
        self.state.lock().button.clone()
    }

    /// Returns the config the control sends reactions with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Clicks the button.
    ///
    /// Toggles the reaction, updates the button, and sends the new state to the
    /// forum. On success the page the control came from is loaded again and
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`ReactError::Rejected`] if the forum responded with a non-success
    /// status, and [`ReactError::RequestFailed`] if the forum could not be reached.
    /// In both cases the forum did not take the reaction.
    ///
    /// Returns [`ReactError::Reload`] if the forum took the reaction but the page
    /// could not be fetched or read afterwards.
    ///
    /// The local state is **not** reverted in any case.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use forum_reactions::forum::{Client, reaction::{Target, Kind}};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), forum_reactions::forum::error::Error> {
    /// let client = Client::new("http://localhost:4000".parse().expect("valid url"));
    /// let page = client.post(1).await?;
    ///
    /// if let Some(like) = page.control(&client, Target::Post { post: 1 }, Kind::Like) {
    ///     let page = like.click().await?;
    ///     println!("{:?}", page.reaction(Target::Post { post: 1 }, Kind::Like));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn click(&self) -> Result<Page, ReactError> {
        let reaction = self.toggle();

        if let Err(err) = self.client.sync(&self.config, &reaction).await {
            tracing::error!(
                on = %reaction.target,
                kind = %reaction.kind,
                active = reaction.active,
                count = reaction.count,
                "failed to sync reaction: {err}"
            );
            return Err(err.into());
        }

        tracing::debug!(
            on = %reaction.target,
            kind = %reaction.kind,
            active = reaction.active,
            count = reaction.count,
            "synced reaction, reloading `{}`",
            self.page
        );

        match self.client.page(&self.page).await {
            Ok(page) => Ok(page),
            Err(err) => {
                tracing::error!(
                    on = %reaction.target,
                    kind = %reaction.kind,
                    active = reaction.active,
                    count = reaction.count,
                    "synced reaction, but failed to reload `{}`: {err}",
                    self.page
                );
                Err(ReactError::Reload(ReloadFailed {
                    url: self.page.clone(),
                    source: err,
                }))
            }
        }
    }

    /// Applies a click locally, returning the state to send.
    fn toggle(&self) -> Reaction {
        let mut state = self.state.lock();

        state.reaction.toggle();
        let reaction = state.reaction;

        if let Some(icons) = self.config.icons {
            state.button.icon = Some(icons.for_state(reaction.active).to_owned());
        }

        if self.config.live_count {
            state.button.count = reaction.count.to_string();
        }

        reaction
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn control(reaction: Reaction, button: Button) -> Control {
        let base: Url = "http://localhost:4000".parse().unwrap();
        let page = base.join("/post/view/12").unwrap();
        Control::new(Client::new(base), page, reaction, button)
    }

    #[test]
    fn should_pick_config_by_target_and_kind() {
        let post = Target::Post { post: 1 };
        let comment = Target::Comment {
            post: 1,
            comment: 2,
        };

        let cases = [
            (post, Kind::Like, Config::POST_LIKE),
            (post, Kind::Dislike, Config::POST_DISLIKE),
            (comment, Kind::Like, Config::COMMENT_LIKE),
            (comment, Kind::Dislike, Config::COMMENT_DISLIKE),
        ];

        for (target, kind, expected) in cases {
            let reaction = Reaction::new(target, kind, false, 0);
            assert_eq!(expected, Config::for_reaction(&reaction));
        }
    }

    #[test]
    fn should_serialize_post_like_body() {
        let reaction = Reaction::new(Target::Post { post: 12 }, Kind::Like, true, 5);
        let body = serde_json::to_value(Config::POST_LIKE.body(&reaction)).unwrap();
        assert_eq!(
            json!({ "likeCount": 5, "postID": 12, "isLiked": true }),
            body
        );
    }

    #[test]
    fn should_serialize_post_dislike_body() {
        let reaction = Reaction::new(Target::Post { post: 12 }, Kind::Dislike, false, 0);
        let body = serde_json::to_value(Config::POST_DISLIKE.body(&reaction)).unwrap();
        assert_eq!(
            json!({ "dislikeCount": 0, "postID": 12, "isDisliked": false }),
            body
        );
    }

    #[test]
    fn should_serialize_comment_bodies_with_both_ids() {
        let target = Target::Comment {
            post: 12,
            comment: 7,
        };

        let like = Reaction::new(target, Kind::Like, false, 2);
        let body = serde_json::to_value(Config::COMMENT_LIKE.body(&like)).unwrap();
        assert_eq!(
            json!({ "commentLikeCount": 2, "commentID": 7, "postID": 12, "isCommentLiked": false }),
            body
        );

        let dislike = Reaction::new(target, Kind::Dislike, true, 1);
        let body = serde_json::to_value(Config::COMMENT_DISLIKE.body(&dislike)).unwrap();
        assert_eq!(
            json!({ "commentDislikeCount": 1, "commentID": 7, "postID": 12, "isCommentDisliked": true }),
            body
        );
    }

    #[test]
    fn should_keep_body_field_order() {
        let reaction = Reaction::new(
            Target::Comment {
                post: 12,
                comment: 7,
            },
            Kind::Like,
            true,
            3,
        );
        let body = serde_json::to_string(&Config::COMMENT_LIKE.body(&reaction)).unwrap();
        assert_eq!(
            r#"{"commentLikeCount":3,"commentID":7,"postID":12,"isCommentLiked":true}"#,
            body
        );
    }

    #[test]
    fn should_swap_icon_and_count_on_toggle() {
        let reaction = Reaction::new(Target::Post { post: 12 }, Kind::Like, false, 4);
        let control = control(
            reaction,
            Button::new(Some("/static/img/unlike.png".to_owned()), "4"),
        );

        let sent = control.toggle();
        assert_eq!(Reaction::new(Target::Post { post: 12 }, Kind::Like, true, 5), sent);
        assert_eq!(sent, control.reaction());
        assert_eq!(
            Button::new(Some("/static/img/like.png".to_owned()), "5"),
            control.button()
        );

        control.toggle();
        assert_eq!(reaction, control.reaction());
        assert_eq!(
            Button::new(Some("/static/img/unlike.png".to_owned()), "4"),
            control.button()
        );
    }

    #[test]
    fn should_leave_count_text_until_reload_when_not_live() {
        let reaction = Reaction::new(Target::Post { post: 12 }, Kind::Dislike, true, 4);
        let control = control(reaction, Button::new(None, "4"));

        control.toggle();
        assert_eq!(3, control.reaction().count());
        assert_eq!(Button::new(None, "4"), control.button());
    }

    #[test]
    fn should_share_state_between_clones() {
        let reaction = Reaction::new(Target::Post { post: 12 }, Kind::Like, false, 0);
        let control = control(reaction, Button::default());
        let clone = control.clone();

        clone.toggle();
        assert!(control.reaction().is_active(), "clone should toggle the same state");
    }
}
