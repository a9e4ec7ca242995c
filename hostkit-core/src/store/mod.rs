//! Credential storage.
//!
//! This module provides:
//! - [`Secret`] - A wrapper for sensitive values that prevents accidental logging
//! - [`Expiry`] - When the current access value stops being usable
//! - [`CredentialState`] - Access value, refresh material and expiry for one client
//! - [`CredentialStore`] - In-memory holder of the [`CredentialState`]
//!
//! The store has no network logic. The token manager is the only writer;
//! everything else reads through it.
//!
//! # Example
//!
//! ```
//! use hostkit_core::store::{CredentialState, CredentialStore, Expiry, Secret};
//!
//! let store = CredentialStore::new(CredentialState::new(
//!     Some("personal-token".to_string()),
//!     None,
//!     Expiry::Never,
//! ));
//!
//! let state = store.snapshot();
//! assert_eq!(state.access.unwrap().expose(), "personal-token");
//! ```

use chrono::{DateTime, Duration, Utc};

mod memory;

pub use memory::CredentialStore;

/// A secret value that prevents accidental exposure in logs.
///
/// The inner value is only accessible via [`expose()`](Secret::expose).
/// Debug and Display implementations show `[REDACTED]` instead of the value.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    /// Create a new secret from a string value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the secret value.
    ///
    /// Use sparingly and never log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Consume the secret and return the inner value.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Format the secret as an `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret([REDACTED])")
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Secret {}

/// When the current access value stops being usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// A static personal token. Never refreshed.
    Never,
    /// Expires at the given instant.
    At(DateTime<Utc>),
}

impl Expiry {
    /// Whether the credential should be refreshed at `now`, given a lead
    /// `margin` before the actual expiry.
    pub fn is_stale_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        match self {
            Self::Never => false,
            Self::At(expires_at) => expires_at
                .checked_sub_signed(margin)
                .is_none_or(|refresh_at| now >= refresh_at),
        }
    }

    /// Expiry `seconds` from now.
    pub fn in_seconds(seconds: i64) -> Self {
        Self::At(Utc::now() + Duration::seconds(seconds))
    }
}

/// Credential material held for one client instance.
///
/// `access` is either absent or a non-empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialState {
    /// Current bearer value.
    pub access: Option<Secret>,
    /// Material that can be exchanged for a new access value.
    pub refresh: Option<Secret>,
    /// When `access` stops being usable.
    pub expires_at: Expiry,
}

impl CredentialState {
    /// Build a state, normalizing empty strings to absent values.
    pub fn new(access: Option<String>, refresh: Option<String>, expires_at: Expiry) -> Self {
        Self {
            access: non_empty(access),
            refresh: non_empty(refresh),
            expires_at,
        }
    }

    /// Whether this state may ever be refreshed.
    pub fn is_refreshable(&self) -> bool {
        self.expires_at != Expiry::Never
    }

    /// The access value if present and not stale at `now`.
    pub fn usable_access(&self, now: DateTime<Utc>, margin: Duration) -> Option<&Secret> {
        if self.expires_at.is_stale_at(now, margin) {
            return None;
        }
        self.access.as_ref()
    }
}

fn non_empty(value: Option<String>) -> Option<Secret> {
    value.filter(|v| !v.is_empty()).map(Secret::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_debug_redacted() {
        let secret = Secret::new("super-secret");
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_secret_display_redacted() {
        let secret = Secret::new("super-secret");
        let display = format!("{}", secret);
        assert!(!display.contains("super-secret"));
        assert!(display.contains("REDACTED"));
    }

    #[test]
    fn test_secret_bearer() {
        assert_eq!(Secret::new("abc").bearer(), "Bearer abc");
    }

    #[test]
    fn test_never_is_never_stale() {
        let far_future = Utc::now() + Duration::days(365 * 100);
        assert!(!Expiry::Never.is_stale_at(far_future, Duration::seconds(60)));
    }

    #[test]
    fn test_stale_within_margin() {
        let now = Utc::now();
        let margin = Duration::seconds(60);

        assert!(Expiry::At(now + Duration::seconds(30)).is_stale_at(now, margin));
        assert!(Expiry::At(now + Duration::seconds(60)).is_stale_at(now, margin));
        assert!(!Expiry::At(now + Duration::seconds(61)).is_stale_at(now, margin));
    }

    #[test]
    fn test_empty_access_normalized_to_absent() {
        let state = CredentialState::new(Some(String::new()), Some(String::new()), Expiry::Never);
        assert!(state.access.is_none());
        assert!(state.refresh.is_none());
    }

    #[test]
    fn test_usable_access() {
        let now = Utc::now();
        let margin = Duration::seconds(60);

        let fresh = CredentialState::new(
            Some("at".to_string()),
            None,
            Expiry::At(now + Duration::hours(1)),
        );
        assert_eq!(fresh.usable_access(now, margin).unwrap().expose(), "at");

        let stale = CredentialState::new(Some("at".to_string()), None, Expiry::At(now));
        assert!(stale.usable_access(now, margin).is_none());
        assert!(stale.is_refreshable());

        let static_token = CredentialState::new(Some("pat".to_string()), None, Expiry::Never);
        assert!(!static_token.is_refreshable());
    }
}
