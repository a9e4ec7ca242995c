//! Credential configuration types.
//!
//! This module defines the inputs a client is built from:
//! - [`Credentials`] - Static token and OAuth material supplied by the caller
//! - [`CredentialType`] - Names of individual credential fields

use std::fmt;

use crate::store::{CredentialState, Expiry, Secret};

/// Lifetime given to a static token that was supplied together with OAuth
/// material. With the 60 second staleness margin this makes the first call
/// refresh before using it.
pub const PRESET_TOKEN_LIFETIME_SECS: i64 = 60;

/// Credential material supplied when building a client.
///
/// # Examples
///
/// ```
/// use hostkit_core::Credentials;
///
/// let personal = Credentials::new().with_access_token("pat-123");
/// assert!(!personal.has_oauth_material());
///
/// let oauth = Credentials::new()
///     .with_client_id("client")
///     .with_client_secret("secret");
/// assert!(oauth.has_oauth_material());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Static bearer token (personal access token, or a previously issued access token).
    pub access_token: Option<Secret>,

    /// OAuth refresh token.
    pub refresh_token: Option<Secret>,

    /// OAuth client identifier.
    pub client_id: Option<String>,

    /// OAuth client secret.
    pub client_secret: Option<Secret>,
}

impl Credentials {
    /// Create an empty credential set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the static access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = non_empty(token.into()).map(Secret::new);
        self
    }

    /// Set the refresh token.
    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = non_empty(token.into()).map(Secret::new);
        self
    }

    /// Set the OAuth client identifier.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = non_empty(client_id.into());
        self
    }

    /// Set the OAuth client secret.
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = non_empty(secret.into()).map(Secret::new);
        self
    }

    /// Whether any OAuth material is present: a refresh token, or a client
    /// identifier and secret pair.
    pub fn has_oauth_material(&self) -> bool {
        self.refresh_token.is_some() || (self.client_id.is_some() && self.client_secret.is_some())
    }

    /// Whether nothing at all was supplied.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none()
            && self.refresh_token.is_none()
            && self.client_id.is_none()
            && self.client_secret.is_none()
    }

    /// Derive the initial [`CredentialState`].
    ///
    /// - static token only: never expires
    /// - static token and OAuth material: expires in [`PRESET_TOKEN_LIFETIME_SECS`]
    /// - OAuth material only: no access value, already expired
    /// - nothing: no access value, never refreshed
    pub fn initial_state(&self) -> CredentialState {
        let access = self.access_token.as_ref().map(|s| s.expose().to_string());
        let refresh = self.refresh_token.as_ref().map(|s| s.expose().to_string());

        let expires_at = match (access.is_some(), self.has_oauth_material()) {
            (true, true) => Expiry::in_seconds(PRESET_TOKEN_LIFETIME_SECS),
            (false, true) => Expiry::in_seconds(0),
            (_, false) => Expiry::Never,
        };

        CredentialState::new(access, refresh, expires_at)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Type of credential field, as used by configuration fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialType {
    /// Static or previously issued access token.
    Token,
    /// OAuth refresh token.
    RefreshToken,
    /// OAuth client ID.
    ClientId,
    /// OAuth client secret.
    ClientSecret,
}

impl CredentialType {
    /// All credential types, in resolution order.
    pub const ALL: [CredentialType; 4] = [
        Self::Token,
        Self::RefreshToken,
        Self::ClientId,
        Self::ClientSecret,
    ];

    /// Get the credential type as a string for config file keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::RefreshToken => "refresh_token",
            Self::ClientId => "client_id",
            Self::ClientSecret => "client_secret",
        }
    }

    /// Convert to environment variable suffix.
    pub fn env_suffix(&self) -> &'static str {
        match self {
            Self::Token => "TOKEN",
            Self::RefreshToken => "REFRESH_TOKEN",
            Self::ClientId => "CLIENT_ID",
            Self::ClientSecret => "CLIENT_SECRET",
        }
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
