//! UnpacMe client: submissions, results, account and feed endpoints.
//!
//! Every response goes through [`classify`]: 2xx bodies are returned, 4xx
//! bodies shaped as `{error, description}` become domain errors, and
//! anything else is a transport failure.

mod account;
mod submissions;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::UnpacMeClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpBackend, RawResponse, ReqwestBackend};
use crate::models::{ApiConfig, ErrorBody};

// ============================================================================
// Type Aliases
// ============================================================================

/// Default UnpacMe client using the reqwest HTTP backend.
pub type DefaultUnpacMeClient = UnpacMeClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the UnpacMe REST API.
///
/// Generic over the HTTP backend so response handling can be tested without
/// a network. Use `DefaultUnpacMeClient` in production code.
pub struct UnpacMeClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: ApiConfig,
}

impl DefaultUnpacMeClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails when the base URL does not parse or the HTTP client cannot be
    /// built.
    pub fn new(config: &UnpacMeClientConfig) -> ApiResult<Self> {
        let internal_config = ApiConfig::new(&config.base_url, config.history_page_size)?;
        let backend = ReqwestBackend::new(config)?;
        debug!(base_url = %internal_config.base_url, ?config, "Created UnpacMe client");
        Ok(Self {
            backend,
            config: internal_config,
        })
    }
}

impl<B: HttpBackend> UnpacMeClient<B> {
    /// Create a new client with a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: ApiConfig, backend: B) -> Self {
        Self { backend, config }
    }

    /// GET `url` and return the body of a successful response.
    pub(crate) async fn get_bytes(&self, url: &Url) -> ApiResult<Vec<u8>> {
        let response = self.backend.get(url).await?;
        classify(url, response)
    }

    /// GET `url` and decode the body of a successful response.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> ApiResult<T> {
        let body = self.get_bytes(url).await?;
        decode_json(&body)
    }
}

// ============================================================================
// Response classification
// ============================================================================

/// Turn a raw response into its body or a typed error.
pub(crate) fn classify(url: &Url, response: RawResponse) -> ApiResult<Vec<u8>> {
    if response.is_success() {
        return Ok(response.body);
    }

    if response.is_client_error()
        && let Ok(ErrorBody { error, description }) =
            serde_json::from_slice::<ErrorBody>(&response.body)
    {
        debug!(%url, status = response.status, %error, "Service rejected request");
        return Err(if response.status == 404 {
            ApiError::NotFound { description }
        } else {
            ApiError::Domain { error, description }
        });
    }

    Err(ApiError::ApiRequestFailed {
        status: response.status,
        url: url.to_string(),
    })
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    Ok(serde_json::from_slice(body)?)
}
