use std::path::Path;

use apify_archive_common::{
    deserialize_present, normalize_all, ApifyError, MediaJob, MediaKind, MediaLayout,
    RawPost, SavablePost,
};
use serde::{Deserialize, Serialize};

/// Prefix of every file written for Instagram
pub static PREFIX: &str = "ig";

/// Raw reel. Every field must be present; only the identifiers must not be `null`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ReelItem {
    id: String,
    short_code: String,
    #[serde(deserialize_with = "deserialize_present")]
    timestamp: Option<String>,
    #[serde(deserialize_with = "deserialize_present")]
    url: Option<String>,
    #[serde(default)]
    video_url: Option<String>,
    #[serde(deserialize_with = "deserialize_present")]
    caption: Option<String>,
    #[serde(deserialize_with = "deserialize_present")]
    hashtags: Option<Vec<String>>,
    #[serde(deserialize_with = "deserialize_present")]
    display_url: Option<String>,
    #[serde(deserialize_with = "deserialize_present")]
    likes_count: Option<i64>,
}

/// Instagram reel as written to the post dump.
///
/// Values the actor returned as `null` stay `null`, except `videoUrl` which is empty instead.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstagramPost {
    pub id: String,
    pub short_code: String,
    pub timestamp: Option<String>,
    pub url: Option<String>,
    pub video_url: String,
    pub caption: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub display_url: Option<String>,
    pub likes_count: Option<i64>,
}

impl From<ReelItem> for InstagramPost {
    fn from(item: ReelItem) -> Self {
        Self {
            id: item.id,
            short_code: item.short_code,
            timestamp: item.timestamp,
            url: item.url,
            video_url: item.video_url.unwrap_or_default(),
            caption: item.caption,
            hashtags: item.hashtags,
            display_url: item.display_url,
            likes_count: item.likes_count,
        }
    }
}

pub fn normalize(raw: RawPost) -> Result<InstagramPost, serde_json::Error> {
    serde_json::from_value::<ReelItem>(raw).map(InstagramPost::from)
}

pub fn normalize_posts(raws: Vec<RawPost>) -> Result<Vec<InstagramPost>, ApifyError> {
    normalize_all(raws, normalize)
}

/// Media of `account` is saved flat into `<account>_ig_media`
pub fn media_layout(output_dir: impl AsRef<Path>, account: &str) -> MediaLayout {
    MediaLayout::new(output_dir, PREFIX, account)
}

impl SavablePost for InstagramPost {
    fn media_jobs(&self, layout: &MediaLayout) -> Vec<MediaJob> {
        MediaJob::for_url(
            layout,
            &self.short_code,
            &self.short_code,
            MediaKind::Video,
            &self.video_url,
        )
        .into_iter()
        .collect()
    }
}
