use hostkit_core::TokenError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the hostkit client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The credential could not be obtained or refreshed.
    #[error("authentication failed: {0}")]
    Token(#[from] TokenError),

    /// The API answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        /// The body's `message` field, or `HTTP {status}`.
        message: String,
        /// Value of the `x-request-id` response header.
        request_id: Option<String>,
        /// Parsed error body; `None` when it was not JSON.
        body: Option<serde_json::Value>,
        /// Seconds from the `Retry-After` header.
        retry_after: Option<u64>,
        /// Attempt on which this response arrived (1 outside the retry loop).
        attempts: u32,
    },

    /// Retryable failures persisted through every attempt.
    #[error("request failed after {attempts} attempts (HTTP {status}): {message}")]
    RetryExhausted {
        status: u16,
        message: String,
        attempts: u32,
    },

    /// Transport-level failure; carries no status.
    #[error("network error: {0}")]
    Network(String),

    /// A 2xx body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status of a resource call failure.
    ///
    /// Token failures report `None` here even when the token endpoint
    /// answered with a status; inspect the inner [`TokenError`] for that.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::RetryExhausted { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-supplied wait hint in seconds.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::Http { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Request id reported by the server, if any.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Http { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// Record the attempt on which an HTTP failure arrived.
    pub(crate) fn at_attempt(mut self, attempt: u32) -> Self {
        if let Self::Http { attempts, .. } = &mut self {
            *attempts = attempt;
        }
        self
    }

    /// Whether the server rejected the bearer credential.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }
}

/// Result type for hostkit client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Passed to the rate-limit callback when a 429 carries a wait hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitEvent {
    pub wait_hint_secs: u64,
    /// Identifies the operation, e.g. `GET /properties`.
    pub context: String,
    /// The 1-based attempt that was throttled.
    pub attempt: u32,
}

/// One page of a cursor-paginated list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Cursor for the next page; `None` on the last page.
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub per_page: u32,
}

impl<T> Page<T> {
    /// Whether another page follows this one.
    pub fn has_more(&self) -> bool {
        self.meta.next_cursor.is_some()
    }
}
