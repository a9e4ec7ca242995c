//! One HTTP attempt against the API.

use std::sync::Arc;

use hostkit_core::TokenManager;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::mask::mask_pii;
use crate::types::{ApiError, Result};

/// Header identifying this library and its version.
pub const CLIENT_VERSION_HEADER: &str = "X-Client-Version";

/// Value sent in [`CLIENT_VERSION_HEADER`].
pub const CLIENT_VERSION: &str = concat!("hostkit-rust/", env!("CARGO_PKG_VERSION"));

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builds and sends single requests.
///
/// Each call asks the token manager for a current bearer value, so a retry
/// after a refresh picks up the new credential.
#[derive(Clone)]
pub struct RequestExecutor {
    http_client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenManager>,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RequestExecutor {
    /// Create an executor for the API rooted at `base_url` (no trailing slash).
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenManager>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            tokens,
        }
    }

    /// The API root.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `{base}{path}` with query pairs appended.
    pub fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw)
            .map_err(|e| ApiError::Config(format!("invalid request URL {}: {}", raw, e)))?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// Perform one attempt.
    ///
    /// Returns `Ok(None)` for 204 and empty 2xx bodies.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<Option<T>> {
        let url = self.build_url(path, query)?;
        let token = self.tokens.authorization_value().await?;

        debug!("{} {}", method, url);
        if let Some(body) = body {
            trace!("request body: {}", mask_pii(body));
        }

        let mut request = self
            .http_client
            .request(method, url)
            .header(AUTHORIZATION, token.bearer())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(CLIENT_VERSION_HEADER, CLIENT_VERSION);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(error_from_response(status, &headers, &bytes));
        }

        if status == StatusCode::NO_CONTENT || bytes.is_empty() {
            return Ok(None);
        }

        let value: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))?;
        trace!("response body: {}", mask_pii(&value));

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Map a non-success response to [`ApiError::Http`].
///
/// A body that is not JSON is tolerated and reported as `None`.
fn error_from_response(status: StatusCode, headers: &HeaderMap, bytes: &[u8]) -> ApiError {
    let body = serde_json::from_slice::<serde_json::Value>(bytes).ok();

    let message = body
        .as_ref()
        .and_then(|b| b.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let retry_after = headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0);

    debug!(
        "request failed with {} (request id {:?}): {}",
        status.as_u16(),
        request_id,
        message
    );

    ApiError::Http {
        status: status.as_u16(),
        message,
        request_id,
        body,
        retry_after,
        attempts: 1,
    }
}
