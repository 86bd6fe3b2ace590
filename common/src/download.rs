use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::{Client, IntoUrl, Response};
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::{ApifyError, DownloadError};

/// Size of the write buffer media bodies are streamed through
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Number of concurrent post downloads unless configured otherwise
pub const DEFAULT_MAX_CONNECTIONS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Video => "mp4",
            Self::Audio => "mp3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }

    fn directory(&self) -> &'static str {
        match self {
            Self::Video => "videos",
            Self::Audio => "audios",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the media of one account is saved.
///
/// Files are named `<prefix>_<account>_<identifier>_<kind>.<ext>` below
/// `<account>_<prefix>_media`, optionally split into one subdirectory per media kind.
#[derive(Clone, Debug)]
pub struct MediaLayout {
    prefix: &'static str,
    account: String,
    root: PathBuf,
    split_by_kind: bool,
    skipped: Vec<MediaKind>,
}

impl MediaLayout {
    pub fn new(output_dir: impl AsRef<Path>, prefix: &'static str, account: &str) -> Self {
        let account = sanitize_filename::sanitize(account);
        let root = output_dir
            .as_ref()
            .join(format!("{}_{}_media", account, prefix));
        Self {
            prefix,
            account,
            root,
            split_by_kind: false,
            skipped: Vec::new(),
        }
    }

    /// Save audio and video into separate `audios` and `videos` subdirectories
    pub fn split_by_kind(mut self) -> Self {
        self.split_by_kind = true;
        self
    }

    /// Never save media of `kind`
    pub fn without(mut self, kind: MediaKind) -> Self {
        self.skipped.push(kind);
        self
    }

    pub fn wants(&self, kind: MediaKind) -> bool {
        !self.skipped.contains(&kind)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self, kind: MediaKind) -> PathBuf {
        if self.split_by_kind {
            self.root.join(kind.directory())
        } else {
            self.root.clone()
        }
    }

    /// Path of the `kind` media of `identifier`, which is sanitized to a single file name
    pub fn path(&self, identifier: &str, kind: MediaKind) -> PathBuf {
        self.dir(kind).join(format!(
            "{}_{}_{}_{}.{}",
            self.prefix,
            self.account,
            sanitize_filename::sanitize(identifier),
            kind.label(),
            kind.extension()
        ))
    }

    /// Create every directory of the layout
    pub async fn prepare(&self) -> Result<(), ApifyError> {
        let dirs = if self.split_by_kind {
            vec![self.dir(MediaKind::Audio), self.dir(MediaKind::Video)]
        } else {
            vec![self.root.clone()]
        };
        for dir in dirs {
            fs::create_dir_all(&dir)
                .await
                .map_err(|source| ApifyError::Io {
                    path: dir.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}

/// A single media transfer
#[derive(Clone, Debug)]
pub struct MediaJob {
    pub post_id: String,
    pub kind: MediaKind,
    pub url: String,
    pub path: PathBuf,
}

impl MediaJob {
    /// Job saving `url` as the `kind` media of `identifier`.
    ///
    /// `None` if the URL is empty or the layout does not save this kind of media.
    pub fn for_url(
        layout: &MediaLayout,
        post_id: &str,
        identifier: &str,
        kind: MediaKind,
        url: &str,
    ) -> Option<Self> {
        if url.is_empty() || !layout.wants(kind) {
            return None;
        }
        Some(Self {
            post_id: post_id.to_owned(),
            kind,
            url: url.to_owned(),
            path: layout.path(identifier, kind),
        })
    }

    pub async fn fetch(self, client: &Client) -> Result<MediaFile, DownloadError> {
        println!("Saving {}", self.path.display());
        match streamed_download(client, self.url.as_str(), &self.path).await {
            Ok(bytes) => Ok(MediaFile {
                path: self.path,
                kind: self.kind,
                bytes,
            }),
            Err(e) => Err(DownloadError {
                post_id: self.post_id,
                kind: self.kind,
                url: self.url,
                path: self.path,
                msg: format!("{:#}", e),
            }),
        }
    }
}

/// A media file that was saved successfully
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub bytes: u64,
}

#[async_trait]
pub trait SavablePost: Sync {
    /// Media transfers for this post. Media with an empty URL is left out.
    fn media_jobs(&self, layout: &MediaLayout) -> Vec<MediaJob>;

    /// Fetch every media of this post in order. A failed transfer does not stop the next one.
    async fn download(
        &self,
        client: &Client,
        layout: &MediaLayout,
    ) -> Vec<Result<MediaFile, DownloadError>> {
        let mut results = Vec::new();
        for job in self.media_jobs(layout) {
            results.push(job.fetch(client).await);
        }
        results
    }
}

/// Outcome of a batch download
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub downloaded: Vec<MediaFile>,
    pub failed: Vec<DownloadError>,
}

impl DownloadReport {
    fn push(&mut self, result: Result<MediaFile, DownloadError>) {
        match result {
            Ok(f) => self.downloaded.push(f),
            Err(e) => self.failed.push(e),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Download the media of every post, at most `max_connections` posts at a time.
///
/// Individual failures are collected into the report and never abort the batch. Only failing
/// to create the target directories is fatal.
pub async fn download_all<P: SavablePost>(
    client: &Client,
    posts: &[P],
    layout: &MediaLayout,
    max_connections: usize,
) -> Result<DownloadReport, ApifyError> {
    layout.prepare().await?;

    let results = stream::iter(posts)
        .map(|p| p.download(client, layout))
        .buffer_unordered(max_connections.max(1))
        .collect::<Vec<_>>()
        .await;

    let mut report = DownloadReport::default();
    for result in results.into_iter().flatten() {
        report.push(result);
    }

    Ok(report)
}

/// Stream `url` into `path`, returning the number of bytes written.
///
/// The body goes to `<path>.temp` first and is only moved into place once complete.
pub async fn streamed_download(
    client: &Client,
    url: impl IntoUrl,
    path: impl AsRef<Path>,
) -> Result<u64> {
    let path = path.as_ref();
    let resp = client.get(url).send().await?.error_for_status()?;

    let temp_path = temp_path(path);
    match write_body(resp, &temp_path).await {
        Ok(written) => {
            fs::rename(&temp_path, path).await?;
            Ok(written)
        }
        Err(e) => {
            let _ = fs::remove_file(&temp_path).await;
            Err(e)
        }
    }
}

async fn write_body(resp: Response, path: &Path) -> Result<u64> {
    let file = fs::File::create(path).await?;
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
    let mut stream = resp.bytes_stream();
    let mut written = 0;
    while let Some(b) = stream.next().await {
        let chunk = b?;
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    writer.flush().await?;

    Ok(written)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut s = OsString::from(path.as_os_str());
    s.push(".temp");
    PathBuf::from(s)
}
