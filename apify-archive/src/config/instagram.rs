use std::path::PathBuf;

use serde::Deserialize;
use url::Url;

/// Archive Instagram reels
#[derive(Debug, Deserialize, Clone)]
pub struct InstagramConfig {
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
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            accounts: default_accounts(),
            results_limit: super::default_results_limit(),
            max_connections: super::default_max_connections(),
            download_path: super::default_download_path(),
            api_base_url: super::default_api_base_url(),
        }
    }
}

fn default_accounts() -> Vec<String> {
    vec!["oliviacaplandesign".to_owned()]
}
