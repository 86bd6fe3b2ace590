use std::path::Path;

use apify_archive_common::{
    deserialize_nullable_string, deserialize_present, normalize_all, ApifyError, MediaJob,
    MediaKind, MediaLayout, RawPost, SavablePost,
};
use serde::{Deserialize, Serialize};

use crate::TikTokOptions;

/// Prefix of every file written for TikTok
pub static PREFIX: &str = "tt";

/// Raw video. Every field must be present; only the identifier must not be `null`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    #[serde(deserialize_with = "deserialize_present")]
    text: Option<String>,
    #[serde(deserialize_with = "deserialize_present")]
    create_time: Option<i64>,
    #[serde(deserialize_with = "deserialize_present")]
    web_video_url: Option<String>,
    #[serde(default)]
    video_meta: Option<VideoMeta>,
    #[serde(deserialize_with = "deserialize_present")]
    music_meta: Option<MusicMeta>,
    #[serde(deserialize_with = "deserialize_present")]
    hashtags: Option<Vec<serde_json::Value>>,
    #[serde(deserialize_with = "deserialize_present")]
    is_pinned: Option<bool>,
    #[serde(deserialize_with = "deserialize_present")]
    is_sponsored: Option<bool>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct VideoMeta {
    #[serde(default)]
    download_addr: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct MusicMeta {
    #[serde(deserialize_with = "deserialize_nullable_string")]
    play_url: String,
}

/// TikTok video as written to the post dump.
///
/// Values the actor returned as `null` stay `null`, except the media URLs which are empty
/// instead.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TikTokPost {
    pub id: String,
    /// Unix timestamp in seconds
    pub timestamp: Option<i64>,
    pub post_url: Option<String>,
    /// Empty when the actor did not return a download address
    pub video_url: String,
    pub audio_url: String,
    pub caption: Option<String>,
    /// Hashtag objects exactly as returned by the actor
    pub hashtags: Option<Vec<serde_json::Value>>,
    pub is_pinned: Option<bool>,
    pub is_sponsored: Option<bool>,
}

impl From<VideoItem> for TikTokPost {
    fn from(item: VideoItem) -> Self {
        let video_url = item
            .video_meta
            .and_then(|m| m.download_addr)
            .unwrap_or_default();
        let audio_url = item.music_meta.map(|m| m.play_url).unwrap_or_default();
        Self {
            id: item.id,
            timestamp: item.create_time,
            post_url: item.web_video_url,
            video_url,
            audio_url,
            caption: item.text,
            hashtags: item.hashtags,
            is_pinned: item.is_pinned,
            is_sponsored: item.is_sponsored,
        }
    }
}

pub fn normalize(raw: RawPost) -> Result<TikTokPost, serde_json::Error> {
    serde_json::from_value::<VideoItem>(raw).map(TikTokPost::from)
}

pub fn normalize_posts(raws: Vec<RawPost>) -> Result<Vec<TikTokPost>, ApifyError> {
    normalize_all(raws, normalize)
}

/// Media of `account` is saved into `<account>_tt_media/{audios,videos}`.
///
/// Videos are only saved when `options.with_videos` is set.
pub fn media_layout(
    output_dir: impl AsRef<Path>,
    account: &str,
    options: &TikTokOptions,
) -> MediaLayout {
    let layout = MediaLayout::new(output_dir, PREFIX, account).split_by_kind();
    if options.with_videos {
        layout
    } else {
        layout.without(MediaKind::Video)
    }
}

impl SavablePost for TikTokPost {
    fn media_jobs(&self, layout: &MediaLayout) -> Vec<MediaJob> {
        [
            (MediaKind::Audio, &self.audio_url),
            (MediaKind::Video, &self.video_url),
        ]
        .into_iter()
        .filter_map(|(kind, url)| MediaJob::for_url(layout, &self.id, &self.id, kind, url))
        .collect()
    }
}
