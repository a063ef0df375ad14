//! Internal API types for the UnpacMe REST API.
//!
//! These types are internal to `unpacme-api` and are not exposed to consumers.
//! External consumers should use the domain types defined in `unpacme-core`.

use serde::Deserialize;
use url::Url;

use crate::error::{ApiError, ApiResult};

// ============================================================================
// Configuration (used internally, see config.rs for public config)
// ============================================================================

/// Internal configuration derived from `UnpacMeClientConfig`.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API root, e.g. <https://api.unpac.me/api/v1>
    pub base_url: Url,
    /// Submissions requested per history page
    pub history_page_size: u32,
}

impl ApiConfig {
    pub fn new(base_url: &str, history_page_size: u32) -> ApiResult<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::invalid(format!(
                "base URL cannot carry a path: {base_url}"
            )));
        }
        Ok(Self {
            base_url,
            history_page_size: history_page_size.max(1),
        })
    }
}

// ============================================================================
// Wire bodies
// ============================================================================

/// Recognised error body: `{"error": ..., "description": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub description: String,
}

/// Body of a successful upload.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
}

/// Body of a status query.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Body of the account access endpoint.
#[derive(Debug, Deserialize)]
pub struct AccessResponse {
    pub total_submissions: u64,
    pub month_submissions: u64,
    pub month_limit: u64,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Submission ids are strings on most endpoints but have been seen as numbers.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("unexpected id value: {other}"))),
    }
}
