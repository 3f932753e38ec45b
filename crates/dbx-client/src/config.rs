//! Client configuration

use std::time::Duration;

/// Dropbox RPC endpoint (metadata, listing, folders, delete, account)
pub const DEFAULT_API_ENDPOINT: &str = "https://api.dropboxapi.com/2";

/// Dropbox content endpoint (upload, download)
pub const DEFAULT_CONTENT_ENDPOINT: &str = "https://content.dropboxapi.com/2";

/// Product identifier sent with every request
pub const DEFAULT_CLIENT_IDENTIFIER: &str = "DbxStorageModule/1.0";

/// Client configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL for RPC-style routes
    pub api_endpoint: String,
    /// Base URL for content upload/download routes
    pub content_endpoint: String,
    /// Product identifier, e.g. `MyApp/1.0`
    pub client_identifier: String,
    /// Locale tag appended to the user agent
    pub locale: String,
    /// Request timeout; `None` leaves the HTTP stack default in place
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            content_endpoint: DEFAULT_CONTENT_ENDPOINT.to_string(),
            client_identifier: DEFAULT_CLIENT_IDENTIFIER.to_string(),
            locale: default_locale(),
            timeout: None,
        }
    }
}

impl Config {
    /// Point both the RPC and content routes at one base URL.
    ///
    /// Mostly useful for tests and proxies, which serve both hosts from
    /// the same origin.
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_end_matches('/');
        self.api_endpoint = format!("{}/2", base);
        self.content_endpoint = format!("{}/2", base);
        self
    }

    /// Set the RPC endpoint
    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }

    /// Set the content endpoint
    pub fn with_content_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.content_endpoint = endpoint.into();
        self
    }

    /// Set the product identifier
    pub fn with_client_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.client_identifier = identifier.into();
        self
    }

    /// Set the locale tag
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// User agent string: product identifier followed by the locale tag
    pub fn user_agent(&self) -> String {
        format!("{} ({})", self.client_identifier, self.locale)
    }
}

/// Locale of the current process, derived from `LC_ALL` or `LANG`.
///
/// `en_US.UTF-8` becomes `en_US`; `C`, `POSIX` and unset fall back to `en_US`.
pub fn default_locale() -> String {
    ["LC_ALL", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|value| parse_locale(&value))
        .unwrap_or_else(|| "en_US".to_string())
}

fn parse_locale(value: &str) -> Option<String> {
    let tag = value.split(['.', '@']).next()?.trim();
    match tag {
        "" | "C" | "POSIX" => None,
        tag => Some(tag.to_string()),
    }
}
