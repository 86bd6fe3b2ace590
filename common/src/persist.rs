use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

use crate::ApifyError;

/// File name of the post dump for `account`, e.g. `ig_someone_posts.json`
pub fn posts_file_name(prefix: &str, account: &str) -> String {
    format!("{}_{}_posts.json", prefix, account)
}

/// Write `posts` as a pretty printed JSON array, replacing any existing file
pub async fn persist_posts<P: Serialize>(
    path: impl AsRef<Path>,
    posts: &[P],
) -> Result<(), ApifyError> {
    let path = path.as_ref();
    let data = serde_json::to_vec_pretty(posts).map_err(|source| ApifyError::Json {
        path: path.to_owned(),
        source,
    })?;
    fs::write(path, data).await.map_err(|source| ApifyError::Io {
        path: path.to_owned(),
        source,
    })?;

    Ok(())
}

/// Read back a post dump written by [`persist_posts`]
pub async fn load_posts<P: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<P>, ApifyError> {
    let path = path.as_ref();
    let data = fs::read(path).await.map_err(|source| ApifyError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| ApifyError::Json {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod test {
    use serde::Deserialize;

    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    #[serde(rename_all = "camelCase")]
    struct Record {
        id: String,
        short_code: String,
        tags: Vec<String>,
    }

    fn records() -> Vec<Record> {
        vec![
            Record {
                id: "2".to_owned(),
                short_code: "b".to_owned(),
                tags: vec!["x".to_owned()],
            },
            Record {
                id: "1".to_owned(),
                short_code: "a".to_owned(),
                tags: vec![],
            },
        ]
    }

    #[test]
    fn file_name() {
        assert_eq!("tt_someone_posts.json", posts_file_name("tt", "someone"));
    }

    #[tokio::test]
    async fn pretty_printed_with_two_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        persist_posts(&path, &records()).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": \"2\",\n    \"shortCode\": \"b\""));
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(&path, "a much longer file that should disappear entirely").unwrap();

        persist_posts::<Record>(&path, &[]).await.unwrap();
        assert_eq!("[]", std::fs::read_to_string(&path).unwrap());
    }

    #[tokio::test]
    async fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        persist_posts(&path, &records()).await.unwrap();

        let loaded: Vec<Record> = load_posts(&path).await.unwrap();
        assert_eq!(records(), loaded);
    }

    #[tokio::test]
    async fn unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("posts.json");
        let err = persist_posts(&path, &records()).await.unwrap_err();
        assert!(matches!(err, ApifyError::Io { .. }));
    }
}
