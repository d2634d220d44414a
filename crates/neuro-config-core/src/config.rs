//! Client configuration.
//!
//! [`ClientConfig`] carries everything needed to build a config service
//! client: the service root URL, an optional service token and HTTP settings.
//! Values come from the caller (or the CLI flags / environment), there is no
//! configuration file.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::AppError;

/// API prefix appended to the service root URL.
pub const API_PREFIX: &str = "api/v1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the config service HTTP client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Root URL of the config service (without `/api/v1`).
    pub url: Url,
    /// Bearer token attached to every request unless overridden per call.
    pub token: Option<String>,
    /// Total request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration for the given service root URL with default
    /// timeout and no token.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }

    /// Parses the service root URL and creates a configuration for it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` if the URL is malformed or cannot be a
    /// base for API paths.
    pub fn from_url(url: &str) -> Result<Self, AppError> {
        let parsed = Url::parse(url).map_err(|e| AppError::InvalidUrl(format!("{url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(AppError::InvalidUrl(format!("{url}: not a base URL")));
        }
        Ok(Self::new(parsed))
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into()).filter(|t: &String| !t.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the versioned API base URL, always ending with a slash so that
    /// relative endpoint paths join under it.
    pub fn api_base_url(&self) -> Result<Url, AppError> {
        let mut root = self.url.clone();
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        root.join(&format!("{API_PREFIX}/")).map_err(|e| AppError::InvalidUrl(e.to_string()))
    }
}

fn default_user_agent() -> String {
    format!("neuro-config-client/{}", env!("CARGO_PKG_VERSION"))
}
