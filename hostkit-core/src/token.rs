//! Token lifecycle types.
//!
//! This module provides:
//! - [`TokenError`] - Failures of the token lifecycle
//! - [`TokenManager`] - Trait for obtaining a usable bearer value

use async_trait::async_trait;
use thiserror::Error;

use crate::store::Secret;

/// Error type for token operations.
///
/// None of these are retried by the token manager itself.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Credential material required for the operation is missing.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// No usable access value and nothing to refresh.
    #[error("unauthenticated: {message}")]
    Unauthenticated { message: String },

    /// The token endpoint answered with a non-success status.
    #[error("token endpoint returned {status}: {body}")]
    Endpoint { status: u16, body: String },

    /// The token endpoint could not be reached.
    #[error("network error: {message}")]
    Network { message: String },

    /// The token endpoint answered 2xx with an unusable body.
    #[error("invalid token response: {message}")]
    InvalidResponse { message: String },
}

impl TokenError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Endpoint { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Trait for managing the bearer credential of one client.
///
/// # Example
///
/// ```rust,ignore
/// use hostkit_core::TokenManager;
///
/// async fn authorize(manager: &impl TokenManager) -> Result<String, hostkit_core::TokenError> {
///     let token = manager.authorization_value().await?;
///     Ok(token.bearer())
/// }
/// ```
#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Get a usable bearer value, refreshing first if the current one is stale.
    async fn authorization_value(&self) -> Result<Secret, TokenError>;

    /// Treat the current value as expired and refresh (or join an in-flight
    /// refresh). Used after the server rejected the current value.
    async fn force_reauthentication(&self) -> Result<Secret, TokenError>;

    /// Whether the credential can ever be refreshed.
    fn is_refreshable(&self) -> bool;
}
