//! Module representing a viewer's reaction to a post or comment.

use std::fmt::Display;

/// Represents what a reaction is attached to.
///
/// Comments carry the id of the post they were made on, as the forum needs
/// both to attribute a comment reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// A post, by id.
    Post {
        /// Id of the post.
        post: u32,
    },
    /// A comment, by id, on the post with id `post`.
    Comment {
        /// Id of the post the comment belongs to.
        post: u32,
        /// Id of the comment.
        comment: u32,
    },
}

impl Target {
    /// Returns the id of the post, or the id of the post the comment belongs to.
    #[inline]
    #[must_use]
    pub fn post(&self) -> u32 {
        match *self {
            Self::Post { post } | Self::Comment { post, .. } => post,
        }
    }

    /// Returns the id of the comment, if the target is a comment.
    #[inline]
    #[must_use]
    pub fn comment(&self) -> Option<u32> {
        match *self {
            Self::Post { .. } => None,
            Self::Comment { comment, .. } => Some(comment),
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Post { post } => write!(f, "post {post}"),
            Self::Comment { post, comment } => write!(f, "comment {comment} on post {post}"),
        }
    }
}

/// Represents the kind of reaction.
///
/// A like and a dislike on the same target are tracked independently of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Viewer likes the target.
    Like,
    /// Viewer dislikes the target.
    Dislike,
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Like => write!(f, "like"),
            Self::Dislike => write!(f, "dislike"),
        }
    }
}

/// Represents the state of one reaction as the current viewer sees it.
///
/// The state is only ever read from a rendered page and changed by toggling it;
/// it is thrown away once the page is reloaded, at which point the forum's
/// freshly rendered state takes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaction {
    pub(crate) target: Target,
    pub(crate) kind: Kind,
    pub(crate) active: bool,
    pub(crate) count: i64,
}

impl Reaction {
    /// Creates a reaction state from already known values.
    ///
    /// # Example
    ///
    /// ```
    /// # use forum_reactions::forum::reaction::{Reaction, Target, Kind};
    /// let reaction = Reaction::new(Target::Post { post: 1 }, Kind::Like, false, 3);
    /// assert_eq!(3, reaction.count());
    /// ```
    #[inline]
    #[must_use]
    pub fn new(target: Target, kind: Kind, active: bool, count: i64) -> Self {
        Self {
            target,
            kind,
            active,
            count,
        }
    }

    /// Returns what the reaction is attached to.
    #[inline]
    #[must_use]
    pub fn target(&self) -> Target {
        self.target
    }

    /// Returns whether this is a like or a dislike.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns whether the viewer currently has this reaction.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the total count of this reaction on the target.
    ///
    /// This is not guaranteed to be positive: toggling off a reaction the
    /// forum rendered with a count of `0` yields `-1`.
    #[inline]
    #[must_use]
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Flips whether the reaction is active, moving the count along with it.
    ///
    /// Turning a reaction on adds one to the count, turning it off removes one.
    /// Two toggles always return to the starting state.
    ///
    /// # Example
    ///
    /// ```
    /// # use forum_reactions::forum::reaction::{Reaction, Target, Kind};
    /// let mut reaction = Reaction::new(Target::Post { post: 1 }, Kind::Like, false, 3);
    ///
    /// reaction.toggle();
    /// assert!(reaction.is_active());
    /// assert_eq!(4, reaction.count());
    ///
    /// reaction.toggle();
    /// assert!(!reaction.is_active());
    /// assert_eq!(3, reaction.count());
    /// ```
    pub fn toggle(&mut self) {
        if self.active {
            self.count = self.count.saturating_sub(1);
        } else {
            self.count = self.count.saturating_add(1);
        }

        self.active = !self.active;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const POST: Target = Target::Post { post: 12 };

    #[test]
    fn should_activate_and_increment() {
        for count in [0, 1, 41, 1_000] {
            let mut reaction = Reaction::new(POST, Kind::Like, false, count);
            reaction.toggle();
            assert_eq!(Reaction::new(POST, Kind::Like, true, count + 1), reaction);
        }
    }

    #[test]
    fn should_deactivate_and_decrement() {
        for count in [1, 2, 42, 1_000] {
            let mut reaction = Reaction::new(POST, Kind::Dislike, true, count);
            reaction.toggle();
            assert_eq!(Reaction::new(POST, Kind::Dislike, false, count - 1), reaction);
        }
    }

    #[test]
    fn should_return_to_initial_state_after_two_toggles() {
        let target = Target::Comment {
            post: 12,
            comment: 7,
        };

        for (active, count) in [(false, 0), (true, 1), (false, 9), (true, 10)] {
            let initial = Reaction::new(target, Kind::Like, active, count);
            let mut reaction = initial;
            reaction.toggle();
            reaction.toggle();
            assert_eq!(initial, reaction);
        }
    }

    #[test]
    fn should_go_negative_when_deactivating_zero() {
        let mut reaction = Reaction::new(POST, Kind::Like, true, 0);
        reaction.toggle();
        assert_eq!(-1, reaction.count());
        assert!(!reaction.is_active(), "reaction should have been turned off");
    }

    #[test]
    fn should_saturate_instead_of_overflowing() {
        let mut reaction = Reaction::new(POST, Kind::Like, false, i64::MAX);
        reaction.toggle();
        assert_eq!(i64::MAX, reaction.count());
    }

    #[test]
    fn should_expose_target_ids() {
        let comment = Target::Comment {
            post: 12,
            comment: 7,
        };

        assert_eq!(12, POST.post());
        assert_eq!(None, POST.comment());
        assert_eq!(12, comment.post());
        assert_eq!(Some(7), comment.comment());
        assert_eq!("comment 7 on post 12", comment.to_string());
    }
}
