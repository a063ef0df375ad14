//! Account-scoped and read-only endpoints: quota, history, search and feed.

use tracing::debug;
use unpacme_core::{ContentHash, FeedEntry, HashMatch, HistoryPage, QuotaSnapshot};

use crate::error::{ApiError, ApiResult};
use crate::http::HttpBackend;
use crate::models::AccessResponse;
use crate::parsing::{parse_feed, parse_hash_matches, parse_history_page, quota_from_access};
use crate::url::{build_access_url, build_feed_url, build_history_url, build_search_url};

use super::{UnpacMeClient, classify, decode_json};

impl<B: HttpBackend> UnpacMeClient<B> {
    pub(crate) async fn quota(&self) -> ApiResult<QuotaSnapshot> {
        let url = build_access_url(&self.config);
        let access: AccessResponse = self.get_json(&url).await?;
        let quota = quota_from_access(access);
        debug!(
            used = quota.submissions_this_period,
            limit = quota.period_limit,
            "Fetched quota"
        );
        Ok(quota)
    }

    /// Fetch one history page.
    ///
    /// The service answers 404 once the cursor runs past the last page, with
    /// or without an error body, so every 404 here is end-of-history.
    pub(crate) async fn history_page(&self, cursor: Option<&str>) -> ApiResult<HistoryPage> {
        let url = build_history_url(&self.config, cursor);
        let response = self.backend.get(&url).await?;

        if response.status == 404 {
            debug!(cursor, "History exhausted");
            return Err(ApiError::NotFound {
                description: "no more history".to_string(),
            });
        }

        let body = classify(&url, response)?;
        let json: serde_json::Value = decode_json(&body)?;
        let page = parse_history_page(&json)?;
        debug!(
            cursor,
            items = page.items.len(),
            has_more = page.has_more(),
            "Fetched history page"
        );
        Ok(page)
    }

    pub(crate) async fn search_hash(&self, hash: &ContentHash) -> ApiResult<Vec<HashMatch>> {
        let url = build_search_url(&self.config, hash);
        let json: serde_json::Value = self.get_json(&url).await?;
        let matches = parse_hash_matches(&json)?;
        debug!(sha256 = %hash, matches = matches.len(), "Searched hash");
        Ok(matches)
    }

    pub(crate) async fn public_feed(&self) -> ApiResult<Vec<FeedEntry>> {
        let url = build_feed_url(&self.config);
        let json: serde_json::Value = self.get_json(&url).await?;
        parse_feed(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::client;
    use crate::error::ApiError;
    use crate::http::testing::FakeBackend;
    use serde_json::json;
    use unpacme_core::ContentHash;

    fn hex(c: char) -> String {
        c.to_string().repeat(64)
    }

    #[tokio::test]
    async fn test_quota() {
        let backend = FakeBackend::new().with_json(
            "private/user/access",
            200,
            json!({
                "api_key": "secret",
                "total_submissions": 5,
                "month_submissions": 3,
                "month_limit": 10,
                "roles": ["user"]
            }),
        );
        let quota = client(backend).quota().await.unwrap();
        assert_eq!(quota.submissions_this_period, 3);
        assert_eq!(quota.period_limit, 10);
        assert_eq!(quota.usage_fraction(), Some(0.3));
    }

    #[tokio::test]
    async fn test_quota_unauthorised_is_domain_error() {
        let backend = FakeBackend::new().with_json(
            "private/user/access",
            401,
            json!({"error": "unauthorized", "description": "Invalid API key"}),
        );
        let err = client(backend).quota().await.unwrap_err();
        assert!(matches!(err, ApiError::Domain { ref error, .. } if error == "unauthorized"));
    }

    #[tokio::test]
    async fn test_history_pages_round_trip_cursor() {
        let backend = FakeBackend::new()
            .with_json("cursor=c1", 404, json!({}))
            .with_json(
                "private/history",
                200,
                json!({
                    "results": [{"id": "a", "status": "complete", "created": 0, "sha256": hex('a')}],
                    "cursor": "c1"
                }),
            );
        let client = client(backend);

        let page = client.history_page(None).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.next_cursor.as_deref(), Some("c1"));

        let err = client.history_page(Some("c1")).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));

        let requests = client.backend.requests();
        assert!(!requests[0].url.contains("cursor="));
        assert!(requests[1].url.contains("cursor=c1"));
        assert!(requests[1].url.contains("limit=10"));
    }

    #[tokio::test]
    async fn test_history_404_without_body_ends_history() {
        let backend = FakeBackend::new().with_raw("private/history", 404, Vec::new());
        let err = client(backend).history_page(None).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_history_domain_error() {
        let backend = FakeBackend::new().with_json(
            "private/history",
            400,
            json!({"error": "bad_cursor", "description": "Cursor expired"}),
        );
        let err = client(backend).history_page(Some("old")).await.unwrap_err();
        assert!(matches!(err, ApiError::Domain { ref error, .. } if error == "bad_cursor"));
    }

    #[tokio::test]
    async fn test_search_hash_not_found() {
        let backend = FakeBackend::new().with_json(
            "private/search/hash/",
            404,
            json!({"error": "not_found", "description": "Hash not found"}),
        );
        let hash = ContentHash::new(hex('e')).unwrap();
        let err = client(backend).search_hash(&hash).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_search_hash_matches() {
        let backend = FakeBackend::new().with_json(
            "private/search/hash/",
            200,
            json!([{"id": "Fk2xQ", "status": "complete", "sha256": hex('e'), "children": [hex('f')]}]),
        );
        let hash = ContentHash::new(hex('e')).unwrap();
        let matches = client(backend).search_hash(&hash).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].children[0].as_str(), "f".repeat(64));
    }

    #[tokio::test]
    async fn test_public_feed() {
        let backend = FakeBackend::new().with_json(
            "public/feed",
            200,
            json!({"results": [{
                "id": "Fk2xQ",
                "status": "complete",
                "sha256": hex('1'),
                "malwareid": [{"match": "Emotet"}],
                "created": 1_600_000_000,
                "children": 2
            }]}),
        );
        let feed = client(backend).public_feed().await.unwrap();
        assert_eq!(feed.len(), 1);
        assert!(feed[0].has_malware());
        assert_eq!(feed[0].child_count, 2);
    }
}
