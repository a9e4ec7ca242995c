//! Client configuration.

use hostkit_core::Credentials;
use tracing::debug;
use url::Url;

use crate::fallback::{FallbackConfig, FallbackResolver};
use crate::retry::RetryOptions;
use crate::types::{ApiError, Result};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.hostkit.io/v1";

/// Everything a [`HostkitClient`](crate::HostkitClient) is built from.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root; resource paths are appended to it.
    pub base_url: String,
    /// Explicitly supplied credentials.
    pub credentials: Credentials,
    pub retry: RetryOptions,
    /// Consulted only when `credentials` is empty.
    pub fallback: FallbackConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials::default(),
            retry: RetryOptions::default(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl ClientConfig {
    /// The base URL without a trailing slash, validated.
    pub fn normalized_base_url(&self) -> Result<String> {
        let trimmed = self.base_url.trim_end_matches('/');
        let parsed = Url::parse(trimmed)
            .map_err(|e| ApiError::Config(format!("invalid base URL {}: {}", self.base_url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "unsupported base URL scheme: {}",
                parsed.scheme()
            )));
        }

        Ok(trimmed.to_string())
    }

    /// Credentials the client will use.
    ///
    /// Explicit credentials win outright; the fallback chain is the last
    /// resort when nothing was supplied.
    pub fn effective_credentials(&self) -> Result<Credentials> {
        if !self.credentials.is_empty() {
            return Ok(self.credentials.clone());
        }

        debug!("no explicit credentials, consulting fallback sources");
        FallbackResolver::new(self.fallback.clone()).credentials()
    }
}
