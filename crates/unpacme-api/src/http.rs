//! HTTP backend abstraction for the UnpacMe API.
//!
//! The backend only moves bytes: it returns the status code and body of
//! every response it receives, success or not. Classifying a response into
//! success, domain error or transport failure happens in the client so that
//! the rules can be tested against a fake backend.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::config::UnpacMeClientConfig;
use crate::error::ApiResult;

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }
}

/// Trait for HTTP backends able to issue the two request kinds the API needs.
///
/// This is an implementation detail - external code should use the
/// `UnpacMeClientPort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Issue a GET request.
    async fn get(&self, url: &Url) -> ApiResult<RawResponse>;

    /// POST `data` as the multipart field `file`.
    async fn post_file(&self, url: &Url, data: Vec<u8>) -> ApiResult<RawResponse>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
///
/// Every request carries the configured user agent, the API key and the
/// default timeout. Nothing is retried.
pub struct ReqwestBackend {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &UnpacMeClientConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
        })
    }

    /// Attach authentication to a request.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.api_key {
            Some(ref key) => request.header(reqwest::header::AUTHORIZATION, format!("Key {key}")),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> ApiResult<RawResponse> {
        let response = self.authorize(request).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        debug!(%url, status, bytes = body.len(), "Received response");
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get(&self, url: &Url) -> ApiResult<RawResponse> {
        debug!(%url, "GET");
        self.send(self.client.get(url.as_str()), url).await
    }

    async fn post_file(&self, url: &Url, data: Vec<u8>) -> ApiResult<RawResponse> {
        debug!(%url, bytes = data.len(), "POST file");
        let part = reqwest::multipart::Part::bytes(data).file_name("file");
        let form = reqwest::multipart::Form::new().part("file", part);
        self.send(self.client.post(url.as_str()).multipart(form), url)
            .await
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_response_classes() {
        let ok = RawResponse {
            status: 200,
            body: vec![],
        };
        assert!(ok.is_success());
        assert!(!ok.is_client_error());

        let missing = RawResponse {
            status: 404,
            body: vec![],
        };
        assert!(!missing.is_success());
        assert!(missing.is_client_error());

        let server = RawResponse {
            status: 503,
            body: vec![],
        };
        assert!(!server.is_client_error());
    }

    #[test]
    fn test_reqwest_backend_creation() {
        let config = UnpacMeClientConfig::new().with_api_key("test_key");
        let backend = ReqwestBackend::new(&config).unwrap();
        assert_eq!(backend.api_key, Some("test_key".to_string()));
    }

    mod fake_backend_tests {
        use super::super::testing::*;
        use super::*;
        use serde_json::json;

        #[tokio::test]
        async fn test_fake_backend_first_match_wins() {
            let backend = FakeBackend::new()
                .with_json("history?cursor=c1", 404, json!({}))
                .with_json("history", 200, json!({"results": []}));

            let url = Url::parse("https://example.com/private/history?cursor=c1").unwrap();
            assert_eq!(backend.get(&url).await.unwrap().status, 404);

            let url = Url::parse("https://example.com/private/history?limit=10").unwrap();
            assert_eq!(backend.get(&url).await.unwrap().status, 200);
            assert_eq!(backend.requests().len(), 2);
        }

        #[tokio::test]
        async fn test_fake_backend_sequence_repeats_last() {
            let backend = FakeBackend::new().with_sequence(
                "status",
                vec![
                    RawResponse {
                        status: 500,
                        body: vec![],
                    },
                    RawResponse {
                        status: 200,
                        body: b"{}".to_vec(),
                    },
                ],
            );

            let url = Url::parse("https://example.com/public/status/x").unwrap();
            assert_eq!(backend.get(&url).await.unwrap().status, 500);
            assert_eq!(backend.get(&url).await.unwrap().status, 200);
            assert_eq!(backend.get(&url).await.unwrap().status, 200);
        }

        #[tokio::test]
        async fn test_fake_backend_records_posts() {
            let backend = FakeBackend::new().with_json("upload", 200, json!({"id": "a"}));
            let url = Url::parse("https://example.com/private/upload").unwrap();
            backend.post_file(&url, vec![1, 2, 3]).await.unwrap();

            assert_eq!(
                backend.requests(),
                vec![RecordedRequest {
                    method: "POST",
                    url: url.to_string(),
                    body_len: 3,
                }]
            );
        }
    }
}
