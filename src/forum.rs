//! An abstraction for reacting to posts and comments on a server-rendered forum.

pub mod client;
pub mod control;
pub mod error;
pub mod page;
pub mod reaction;

pub use client::{Client, ClientBuilder};

pub use control::{Button, Config, Control};

pub use page::Page;

pub use reaction::{Kind, Reaction, Target};
