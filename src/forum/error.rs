//! Errors that can happen when reacting to posts and comments on the forum.
#![allow(missing_docs)]

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

pub use _inner::{ClientBuilderError, Error, PageError, ReactError, SyncError};

#[derive(Debug, Error)]
#[error(transparent)]
pub struct RequestError(#[from] pub(crate) reqwest::Error);

/// Represents rendered markup that reaction state could not be read from.
///
/// This is returned for values the page *did* render but that make no sense,
/// like a like count of `"many"` or a comment id of `""`. It carries a message
/// saying which element was wrong and what it contained.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct MalformedPage(String);

impl MalformedPage {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// The forum answered a reaction with a status outside of `200..=299`.
///
/// Any state already applied to the control stays applied.
#[derive(Debug, Error)]
#[error("forum rejected reaction with status `{0}`")]
pub struct Rejected(pub(crate) StatusCode);

impl Rejected {
    /// Returns the status the forum responded with.
    #[inline]
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.0
    }
}

/// The forum accepted a reaction, but the page could not be loaded again afterwards.
///
/// Unlike a failed sync, the forum *has* applied the reaction here, so the
/// control's local state is what the forum holds. Only the fresh page is missing.
#[derive(Debug, Error)]
#[error("reaction was applied, but reloading `{url}` failed: {source}")]
pub struct ReloadFailed {
    pub(crate) url: Url,
    #[source]
    pub(crate) source: PageError,
}

impl ReloadFailed {
    /// Returns the URL of the page that could not be reloaded.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns why the page could not be reloaded.
    #[inline]
    #[must_use]
    pub fn error(&self) -> &PageError {
        &self.source
    }
}

mod _inner {
    use crate::stdx::error::Assumption;
    use error_set::error_set;

    error_set! {
        #[expect(
            clippy::error_impl_error,
            reason = "`Error` is the union of every error the crate can return"
        )]
        Error := ClientBuilderError || ReactError || PageError

        PageError := {
            Malformed(super::MalformedPage),
        } || Base || ClientError

        SyncError := {
            Rejected(super::Rejected),
        } || Base || ClientError

        ReactError := {
            Reload(super::ReloadFailed),
        } || SyncError

        ClientBuilderError := {
            #[display("failed to build http client")]
            BuildFailed,
        }

        // --- Internal ---

        ClientError := {
            RequestFailed(super::RequestError),
        }

        Base := {
            Internal(Assumption),
        }
    }
}
