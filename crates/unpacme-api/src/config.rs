//! Public configuration for the UnpacMe client.
//!
//! This module provides a stable public API for configuring the client.
//! The internal config is derived from this.

use std::time::Duration;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.unpac.me/api/v1";

/// Configuration for the UnpacMe client.
///
/// Use the builder pattern methods to customize the client configuration.
///
/// # Example
///
/// ```
/// use unpacme_api::UnpacMeClientConfig;
/// use std::time::Duration;
///
/// let config = UnpacMeClientConfig::new()
///     .with_api_key("secret")
///     .with_timeout(Duration::from_secs(10))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Clone)]
pub struct UnpacMeClientConfig {
    /// Base URL for the UnpacMe API
    pub(crate) base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Default timeout applied to every request
    pub(crate) timeout: Duration,
    /// API key sent with every request
    pub(crate) api_key: Option<String>,
    /// Number of submissions requested per history page
    pub(crate) history_page_size: u32,
}

impl std::fmt::Debug for UnpacMeClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnpacMeClientConfig")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("history_page_size", &self.history_page_size)
            .finish()
    }
}

impl Default for UnpacMeClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("unpacme-client/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(5),
            api_key: None,
            history_page_size: 10,
        }
    }
}

impl UnpacMeClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL for the API.
    ///
    /// Defaults to `https://api.unpac.me/api/v1`.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the default request timeout.
    ///
    /// Defaults to 5 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set an optional API key.
    #[must_use]
    pub fn with_optional_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Set how many submissions each history page request asks for.
    ///
    /// Defaults to 10. The server may return fewer.
    #[must_use]
    pub const fn with_history_page_size(mut self, size: u32) -> Self {
        self.history_page_size = size;
        self
    }
}
