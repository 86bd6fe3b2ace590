mod client;
mod post;

pub use client::{InstagramClient, ACTOR};
pub use post::{media_layout, normalize, normalize_posts, InstagramPost, PREFIX};
