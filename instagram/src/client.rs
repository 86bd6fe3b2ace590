use apify_archive_common::{validate_request, ApifyClient, ApifyError, RawPost};
use serde::Serialize;

use crate::post::{normalize_posts, InstagramPost};

/// Apify actor scraping the reels of a profile
pub static ACTOR: &str = "apify~instagram-reel-scraper";

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ReelScraperInput<'a> {
    username: [&'a str; 1],
    results_limit: u32,
}

#[derive(Clone, Debug)]
pub struct InstagramClient<'a> {
    apify: ApifyClient<'a>,
}

impl<'a> InstagramClient<'a> {
    pub fn new(apify: ApifyClient<'a>) -> Self {
        Self { apify }
    }

    /// Fetch up to `limit` raw reels of `account`
    pub async fn fetch(&self, account: &str, limit: u32) -> Result<Vec<RawPost>, ApifyError> {
        validate_request(account, limit)?;
        let input = ReelScraperInput {
            username: [account],
            results_limit: limit,
        };
        self.apify.run_actor(ACTOR, account, &input).await
    }

    /// Fetch and normalize up to `limit` reels of `account`
    pub async fn posts(&self, account: &str, limit: u32) -> Result<Vec<InstagramPost>, ApifyError> {
        normalize_posts(self.fetch(account, limit).await?)
    }
}

#[cfg(test)]
mod test {
    use apify_archive_common::ApiKey;
    use reqwest::{Client, Url};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn apify<'a>(client: &'a Client, server: &MockServer) -> ApifyClient<'a> {
        ApifyClient::with_base_url(
            client,
            ApiKey::new("key").unwrap(),
            Url::parse(&server.uri()).unwrap(),
        )
    }

    #[tokio::test]
    async fn request_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                "/v2/acts/apify~instagram-reel-scraper/run-sync-get-dataset-items",
            ))
            .and(body_json(json!({ "username": ["someone"], "resultsLimit": 200 })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let posts = InstagramClient::new(apify(&client, &server))
            .posts("someone", 200)
            .await
            .unwrap();
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn zero_limit_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let client = Client::new();
        let err = InstagramClient::new(apify(&client, &server))
            .fetch("someone", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ApifyError::Configuration(_)));
    }

    #[tokio::test]
    async fn malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": "1" }])))
            .mount(&server)
            .await;

        let client = Client::new();
        let err = InstagramClient::new(apify(&client, &server))
            .posts("someone", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, ApifyError::MalformedRecord { index: 0, .. }));
    }
}
