mod client;
mod post;

pub use client::{TikTokClient, TikTokOptions, ACTOR};
pub use post::{media_layout, normalize, normalize_posts, TikTokPost, PREFIX};
