//! OAuth 2.0 token endpoint exchange.
//!
//! This module provides:
//! - [`GrantRequest`] - The two grant shapes the client uses
//! - [`TokenGrant`] - A successful token endpoint response
//! - [`TokenEndpoint`] - Trait for performing one exchange
//! - [`HttpTokenEndpoint`] - `POST {base}/oauth/token` over HTTP (with the `oauth` feature)

#[cfg(feature = "oauth")]
mod http;

#[cfg(feature = "oauth")]
pub use http::HttpTokenEndpoint;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::store::Secret;
use crate::token::TokenError;

/// A token endpoint request.
///
/// Both shapes carry the client identifier and secret; the manager refuses to
/// build one without them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantRequest {
    /// `grant_type=refresh_token`.
    RefreshToken {
        client_id: String,
        client_secret: Secret,
        refresh_token: Secret,
    },
    /// `grant_type=client_credentials`.
    ClientCredentials {
        client_id: String,
        client_secret: Secret,
    },
}

impl GrantRequest {
    /// The `grant_type` form value.
    pub fn grant_type(&self) -> &'static str {
        match self {
            Self::RefreshToken { .. } => "refresh_token",
            Self::ClientCredentials { .. } => "client_credentials",
        }
    }

    /// Form-encoded body fields.
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::RefreshToken {
                client_id,
                client_secret,
                refresh_token,
            } => vec![
                ("grant_type", self.grant_type()),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.expose()),
                ("refresh_token", refresh_token.expose()),
            ],
            Self::ClientCredentials {
                client_id,
                client_secret,
            } => vec![
                ("grant_type", self.grant_type()),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.expose()),
            ],
        }
    }
}

/// Successful response from the token endpoint.
///
/// `expires_in` is a delta in seconds from the response time. `token_type`
/// is ignored; bearer is assumed.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    /// Seconds until the access token expires (delta, not absolute)
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Performs one exchange against the authorization server.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Exchange the grant for a new access value.
    async fn exchange(&self, grant: &GrantRequest) -> Result<TokenGrant, TokenError>;
}
