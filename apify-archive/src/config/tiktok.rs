use std::path::PathBuf;

use serde::Deserialize;
use tiktok::TikTokOptions;
use url::Url;

/// Archive TikTok audio and, optionally, videos
#[derive(Debug, Deserialize, Clone)]
pub struct TikTokConfig {
    #[serde(default = "default_accounts")]
    pub accounts: Vec<String>,
    #[serde(default = "super::default_results_limit")]
    pub results_limit: u32,
    #[serde(default = "super::default_max_connections")]
    pub max_connections: usize,
    #[serde(default = "super::default_download_path")]
    #[serde(deserialize_with = "super::deserialize_path")]
    pub download_path: PathBuf,
    #[serde(default = "super::default_api_base_url")]
    pub api_base_url: Url,
    #[serde(default)]
    pub with_videos: bool,
}

impl TikTokConfig {
    pub fn options(&self) -> TikTokOptions {
        TikTokOptions {
            with_videos: self.with_videos,
        }
    }
}

impl Default for TikTokConfig {
    fn default() -> Self {
        Self {
            accounts: default_accounts(),
            results_limit: super::default_results_limit(),
            max_connections: super::default_max_connections(),
            download_path: super::default_download_path(),
            api_base_url: super::default_api_base_url(),
            with_videos: false,
        }
    }
}

fn default_accounts() -> Vec<String> {
    vec!["willcaplan_changemakers".to_owned()]
}
