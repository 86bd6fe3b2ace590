mod apify_client;
mod credentials;
mod download;
mod error;
mod persist;

pub use apify_client::{
    deserialize_nullable_string, deserialize_present, normalize_all, validate_request,
    ApifyClient, RawPost, DEFAULT_BASE_URL,
};
pub use credentials::{ApiKey, CredentialProvider, EnvCredentials, StaticCredentials, API_KEY_VAR};
pub use download::{
    download_all, streamed_download, DownloadReport, MediaFile, MediaJob, MediaKind, MediaLayout,
    SavablePost, CHUNK_SIZE, DEFAULT_MAX_CONNECTIONS,
};
pub use error::{ApifyError, DownloadError};
pub use persist::{load_posts, persist_posts, posts_file_name};
