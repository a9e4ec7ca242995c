//! # Hostkit Core
//!
//! Credential handling for the hostkit rental-management API client.
//!
//! This crate provides:
//! - Credential material supplied by the caller and the in-memory store it seeds
//! - The [`TokenManager`] trait and its default, refresh-deduplicating implementation
//! - The OAuth token endpoint exchange (`refresh_token` and `client_credentials` grants)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hostkit_core::{Credentials, DefaultTokenManager, HttpTokenEndpoint, TokenManager};
//!
//! async fn bearer() -> Result<String, hostkit_core::TokenError> {
//!     let credentials = Credentials::new()
//!         .with_client_id("client")
//!         .with_client_secret("secret");
//!     let endpoint = HttpTokenEndpoint::new("https://api.hostkit.io/v1")?;
//!     let manager = DefaultTokenManager::new(&credentials, endpoint);
//!     let token = manager.authorization_value().await?;
//!     Ok(token.bearer())
//! }
//! ```

pub mod model;
pub mod oauth;
pub mod store;
pub mod token;
pub mod token_manager;

// Re-export commonly used types at crate root
pub use model::{CredentialType, Credentials, PRESET_TOKEN_LIFETIME_SECS};

pub use store::{CredentialState, CredentialStore, Expiry, Secret};

pub use token::{TokenError, TokenManager};

pub use oauth::{GrantRequest, TokenEndpoint, TokenGrant};

#[cfg(feature = "oauth")]
pub use oauth::HttpTokenEndpoint;

pub use token_manager::{DEFAULT_STALENESS_MARGIN_SECS, DefaultTokenManager};
