//! Social feed.

mod post;

pub use post::{Post, PostText, POST_TEXT_MAX};
