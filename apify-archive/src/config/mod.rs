use std::path::{Path, PathBuf};

use anyhow::Result;
use apify_archive_common::{DEFAULT_BASE_URL, DEFAULT_MAX_CONNECTIONS};
use serde::{Deserialize, Deserializer};
use tracing::info;
use url::Url;

use self::instagram::InstagramConfig;
use self::tiktok::TikTokConfig;

pub mod instagram;
pub mod tiktok;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub instagram: InstagramConfig,
    #[serde(default)]
    pub tiktok: TikTokConfig,
}

impl Config {
    /// Read the config file, falling back to the defaults if it does not exist
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        if !path.as_ref().exists() {
            info!(path = %path.as_ref().display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let conf_contents = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&conf_contents)?)
    }
}

fn default_results_limit() -> u32 {
    200
}

fn default_max_connections() -> usize {
    DEFAULT_MAX_CONNECTIONS
}

fn default_download_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_api_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).unwrap()
}

fn deserialize_path<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: Deserializer<'de>,
{
    let s: PathBuf = Deserialize::deserialize(deserializer)?;
    expand_home(s).map_err(serde::de::Error::custom)
}

#[cfg(unix)]
fn expand_home(path: PathBuf) -> Result<PathBuf, String> {
    use home_dir::HomeDirExt;
    path.expand_home().map_err(|e| e.to_string())
}

#[cfg(not(unix))]
fn expand_home(path: PathBuf) -> Result<PathBuf, String> {
    Ok(path)
}
