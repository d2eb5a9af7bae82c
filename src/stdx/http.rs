pub static DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Name of the cookie the forum identifies a logged-in viewer by.
pub static SESSION_COOKIE: &str = "session";
