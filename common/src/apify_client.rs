use reqwest::{header, Client, StatusCode, Url};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::{ApiKey, ApifyError};

pub static DEFAULT_BASE_URL: &str = "https://api.apify.com";

/// Untyped dataset item as returned by an Apify actor
pub type RawPost = serde_json::Value;

/// Thin client for running Apify actors synchronously
#[derive(Clone, Debug)]
pub struct ApifyClient<'a> {
    reqwest_client: &'a Client,
    api_key: ApiKey,
    base_url: Url,
}

impl<'a> ApifyClient<'a> {
    /// Create a new ApifyClient pointing at a custom API root
    pub fn with_base_url(reqwest_client: &'a Client, api_key: ApiKey, base_url: Url) -> Self {
        Self {
            reqwest_client,
            api_key,
            base_url,
        }
    }

    fn actor_url(&self, actor: &str) -> String {
        format!(
            "{}/v2/acts/{}/run-sync-get-dataset-items",
            self.base_url.as_str().trim_end_matches('/'),
            actor
        )
    }

    /// Run `actor` with `body` as input and return its dataset items.
    ///
    /// The API answers a successful synchronous run with 201 Created, every other status is
    /// treated as a failure.
    pub async fn run_actor<B>(
        &self,
        actor: &str,
        account: &str,
        body: &B,
    ) -> Result<Vec<RawPost>, ApifyError>
    where
        B: Serialize + ?Sized,
    {
        let transport = |source: reqwest::Error| ApifyError::Transport {
            account: account.to_owned(),
            source,
        };

        let resp = self
            .reqwest_client
            .post(self.actor_url(actor))
            .header(header::AUTHORIZATION, self.api_key.bearer())
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if status != StatusCode::CREATED {
            return Err(ApifyError::Fetch {
                account: account.to_owned(),
                status,
            });
        }

        let posts = resp.json::<Vec<RawPost>>().await.map_err(transport)?;
        debug!(actor, account, count = posts.len(), "actor run finished");

        Ok(posts)
    }
}

/// Reject requests the actor cannot run before anything is sent
pub fn validate_request(account: &str, limit: u32) -> Result<(), ApifyError> {
    if account.trim().is_empty() {
        return Err(ApifyError::Configuration("account must not be empty".to_owned()));
    }
    if limit == 0 {
        return Err(ApifyError::Configuration(format!(
            "results limit for {} must be positive",
            account
        )));
    }
    Ok(())
}

/// Deserialize a string field that must be present but may be `null`
pub fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(deserializer)?;
    Ok(s.unwrap_or_default())
}

/// Deserialize a field that must be present, keeping an explicit `null` as `None`
pub fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Project every raw record with `normalize`, preserving order.
///
/// The first record that fails to normalize fails the whole batch.
pub fn normalize_all<P, F>(raws: Vec<RawPost>, normalize: F) -> Result<Vec<P>, ApifyError>
where
    F: Fn(RawPost) -> Result<P, serde_json::Error>,
{
    raws.into_iter()
        .enumerate()
        .map(|(index, raw)| {
            normalize(raw).map_err(|e| ApifyError::MalformedRecord {
                index,
                msg: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    static ACTOR: &str = "apify~instagram-reel-scraper";
    static ACTOR_PATH: &str = "/v2/acts/apify~instagram-reel-scraper/run-sync-get-dataset-items";

    fn client<'a>(reqwest_client: &'a Client, server: &MockServer) -> ApifyClient<'a> {
        let key = ApiKey::new("test-key").unwrap();
        ApifyClient::with_base_url(reqwest_client, key, Url::parse(&server.uri()).unwrap())
    }

    #[tokio::test]
    async fn returns_dataset_items() {
        let server = MockServer::start().await;
        let body = json!({ "username": ["someone"], "resultsLimit": 2 });
        Mock::given(method("POST"))
            .and(path(ACTOR_PATH))
            .and(header("authorization", "Bearer test-key"))
            .and(body_json(&body))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": "1" }, { "id": "2" }])))
            .expect(1)
            .mount(&server)
            .await;

        let reqwest_client = Client::new();
        let posts = client(&reqwest_client, &server)
            .run_actor(ACTOR, "someone", &body)
            .await
            .unwrap();
        assert_eq!(vec![json!({ "id": "1" }), json!({ "id": "2" })], posts);
    }

    #[tokio::test]
    async fn ok_status_is_not_created() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let reqwest_client = Client::new();
        let err = client(&reqwest_client, &server)
            .run_actor(ACTOR, "someone", &json!({}))
            .await
            .unwrap_err();
        match err {
            ApifyError::Fetch { account, status } => {
                assert_eq!("someone", account);
                assert_eq!(StatusCode::OK, status);
            }
            e => panic!("unexpected error {e:?}"),
        }
    }

    #[tokio::test]
    async fn unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let reqwest_client = Client::new();
        let err = client(&reqwest_client, &server)
            .run_actor(ACTOR, "someone", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApifyError::Fetch { status, .. } if status == StatusCode::UNAUTHORIZED
        ));
    }

    #[tokio::test]
    async fn body_not_an_array() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "error": "nope" })))
            .mount(&server)
            .await;

        let reqwest_client = Client::new();
        let err = client(&reqwest_client, &server)
            .run_actor(ACTOR, "someone", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApifyError::Transport { .. }));
    }

    #[tokio::test]
    async fn connection_refused() {
        let reqwest_client = Client::new();
        let key = ApiKey::new("test-key").unwrap();
        let client = ApifyClient::with_base_url(
            &reqwest_client,
            key,
            Url::parse("http://127.0.0.1:9").unwrap(),
        );
        let err = client
            .run_actor(ACTOR, "someone", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ApifyError::Transport { .. }));
    }

    #[test]
    fn rejects_bad_requests() {
        assert!(validate_request("someone", 1).is_ok());
        assert!(matches!(
            validate_request("", 10),
            Err(ApifyError::Configuration(_))
        ));
        assert!(matches!(
            validate_request("someone", 0),
            Err(ApifyError::Configuration(_))
        ));
    }

    #[test]
    fn nullable_string_must_be_present() {
        #[derive(Deserialize)]
        struct Caption {
            #[serde(deserialize_with = "deserialize_nullable_string")]
            caption: String,
        }

        let c: Caption = serde_json::from_value(json!({ "caption": null })).unwrap();
        assert_eq!("", c.caption);
        let c: Caption = serde_json::from_value(json!({ "caption": "hi" })).unwrap();
        assert_eq!("hi", c.caption);
        assert!(serde_json::from_value::<Caption>(json!({})).is_err());
    }

    #[test]
    fn present_field_may_be_null() {
        #[derive(Deserialize)]
        struct Likes {
            #[serde(deserialize_with = "deserialize_present")]
            likes: Option<i64>,
        }

        let l: Likes = serde_json::from_value(json!({ "likes": null })).unwrap();
        assert_eq!(None, l.likes);
        let l: Likes = serde_json::from_value(json!({ "likes": 3 })).unwrap();
        assert_eq!(Some(3), l.likes);
        assert!(serde_json::from_value::<Likes>(json!({})).is_err());
    }

    #[test]
    fn normalize_keeps_order() {
        let raws = vec![json!(3), json!(1), json!(2)];
        let out: Vec<u32> = normalize_all(raws, serde_json::from_value).unwrap();
        assert_eq!(vec![3, 1, 2], out);
    }

    #[test]
    fn normalize_fails_whole_batch() {
        let raws = vec![json!(3), json!("x"), json!(2)];
        let err = normalize_all::<u32, _>(raws, serde_json::from_value).unwrap_err();
        assert!(matches!(err, ApifyError::MalformedRecord { index: 1, .. }));
    }
}
