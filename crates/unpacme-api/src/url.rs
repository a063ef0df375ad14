//! URL construction helpers for the UnpacMe API.
//!
//! Pure functions joining endpoint paths onto the configured API root.
//! Identifiers are percent-encoded as single path segments.

use unpacme_core::{ContentHash, SubmissionId};
use url::Url;

use crate::models::ApiConfig;

/// Append `path` to the configured API root, keeping any path the root carries.
fn endpoint(config: &ApiConfig, path: &str) -> Url {
    let mut url = config.base_url.clone();
    let base_path = url.path().trim_end_matches('/');
    url.set_path(&format!("{base_path}/{path}"));
    url.set_query(None);
    url
}

pub fn build_upload_url(config: &ApiConfig) -> Url {
    endpoint(config, "private/upload")
}

pub fn build_status_url(config: &ApiConfig, id: &SubmissionId) -> Url {
    endpoint(
        config,
        &format!("public/status/{}", urlencoding::encode(id.as_str())),
    )
}

pub fn build_results_url(config: &ApiConfig, id: &SubmissionId) -> Url {
    endpoint(
        config,
        &format!("public/results/{}", urlencoding::encode(id.as_str())),
    )
}

pub fn build_download_url(config: &ApiConfig, hash: &ContentHash) -> Url {
    endpoint(config, &format!("private/download/{hash}"))
}

/// Build a history page URL. The cursor is omitted on the first request.
pub fn build_history_url(config: &ApiConfig, cursor: Option<&str>) -> Url {
    let mut url = endpoint(config, "private/history");
    {
        let mut query = url.query_pairs_mut();
        if let Some(cursor) = cursor {
            query.append_pair("cursor", cursor);
        }
        query.append_pair("limit", &config.history_page_size.to_string());
    }
    url
}

pub fn build_search_url(config: &ApiConfig, hash: &ContentHash) -> Url {
    endpoint(config, &format!("private/search/hash/{hash}"))
}

pub fn build_access_url(config: &ApiConfig) -> Url {
    endpoint(config, "private/user/access")
}

pub fn build_feed_url(config: &ApiConfig) -> Url {
    endpoint(config, "public/feed")
}
