use thiserror::Error;

/// Represents an assumption about the forum's markup or behavior that did not hold.
///
/// If this is returned, the forum changed underneath the library, or the library
/// has a bug. Either way it is not actionable by the library user.
///
/// # Use
///
/// Only used when interacting with the forum, as opposed to input data that
/// might be passed to the library directly.
#[derive(Debug, Error)]
#[error("internal assumption violated: {0}")]
pub struct Assumption(String);

impl From<String> for Assumption {
    #[inline]
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

pub(crate) trait Assume<T> {
    type Output;

    fn assumption(self, msg: impl Into<String>) -> Self::Output;
}

impl<T> Assume<T> for Option<T> {
    type Output = Result<T, Assumption>;

    #[inline]
    fn assumption(self, msg: impl Into<String>) -> Self::Output {
        self.ok_or_else(|| Assumption(msg.into()))
    }
}

impl<T, E> Assume<T> for Result<T, E> {
    type Output = Result<T, Assumption>;

    #[inline]
    fn assumption(self, msg: impl Into<String>) -> Self::Output {
        self.map_err(|_err: _| Assumption(msg.into()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_map_none_into_assumption() {
        let missing: Option<u32> = None;
        let err = missing.assumption("`#postID` should always be rendered").unwrap_err();
        pretty_assertions::assert_str_eq!(
            "internal assumption violated: `#postID` should always be rendered",
            err.to_string()
        );
    }

    #[test]
    fn should_map_err_into_assumption() {
        let parsed = "abc".parse::<u32>().assumption("`abc` is not a number");
        assert!(parsed.is_err(), "non-numeric text should not parse");
    }
}
