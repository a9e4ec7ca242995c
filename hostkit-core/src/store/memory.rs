//! In-memory credential store.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::{CredentialState, Expiry, Secret};

/// In-memory holder of a client's [`CredentialState`].
///
/// The store is not persistent; state lives as long as the owning client.
///
/// # Thread Safety
///
/// This implementation uses interior mutability via `RwLock` and is
/// safe to share across threads. Locks are never held across an await.
pub struct CredentialStore {
    state: RwLock<CredentialState>,
}

impl CredentialStore {
    /// Create a store holding the given initial state.
    pub fn new(state: CredentialState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Clone the current state.
    pub fn snapshot(&self) -> CredentialState {
        self.state.read().clone()
    }

    /// Replace the access value after a successful refresh.
    ///
    /// The prior refresh value is kept when `refresh` is `None`.
    pub fn replace_access(&self, access: Secret, expires_at: DateTime<Utc>, refresh: Option<Secret>) {
        let mut state = self.state.write();
        state.access = Some(access);
        state.expires_at = Expiry::At(expires_at);
        if let Some(refresh) = refresh {
            state.refresh = Some(refresh);
        }
    }

    /// Mark the current access value as already expired.
    ///
    /// A never-expiring credential is left untouched.
    pub fn expire_now(&self) {
        let mut state = self.state.write();
        if state.expires_at != Expiry::Never {
            state.expires_at = Expiry::At(Utc::now());
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("CredentialStore")
            .field("has_access", &state.access.is_some())
            .field("has_refresh", &state.refresh.is_some())
            .field("expires_at", &state.expires_at)
            .finish()
    }
}
