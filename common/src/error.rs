use std::path::PathBuf;

use thiserror::Error;

use crate::MediaKind;

#[derive(Error, Debug)]
pub enum ApifyError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to fetch posts for {account}: unexpected status {status}")]
    Fetch {
        account: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to fetch posts for {account}: {source}")]
    Transport {
        account: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed record at index {index}: {msg}")]
    MalformedRecord { index: usize, msg: String },

    #[error("unable to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to encode or decode {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a single media transfer. Never aborts the rest of a batch.
#[derive(Error, Debug)]
#[error("Error downloading {kind} for post {post_id}: {msg}")]
pub struct DownloadError {
    pub post_id: String,
    pub kind: MediaKind,
    pub url: String,
    pub path: PathBuf,
    pub msg: String,
}
