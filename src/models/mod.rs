mod post;

pub use post::{Post, PostError, is_post};
