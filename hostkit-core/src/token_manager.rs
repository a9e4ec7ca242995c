//! Default implementation of the TokenManager trait.
//!
//! This module provides [`DefaultTokenManager`], which owns the client's
//! [`CredentialStore`], decides when the stored credential is stale, and
//! performs refresh exchanges against a [`TokenEndpoint`].
//!
//! # Features
//!
//! - Proactive refresh a fixed margin before the credential expires
//! - `refresh_token` or `client_credentials` grants, depending on the material held
//! - Concurrent callers share a single in-flight refresh
//! - Static personal tokens are never refreshed
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use hostkit_core::{Credentials, DefaultTokenManager, HttpTokenEndpoint, TokenManager};
//!
//! let credentials = Credentials::new()
//!     .with_client_id("my-client")
//!     .with_client_secret("my-secret");
//! let endpoint = HttpTokenEndpoint::new("https://api.hostkit.io/v1")?;
//! let manager = DefaultTokenManager::new(&credentials, endpoint);
//!
//! let token = manager.authorization_value().await?;
//! println!("Authorization: {}", token.bearer());
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use crate::{
    model::Credentials,
    oauth::{GrantRequest, TokenEndpoint},
    store::{CredentialState, CredentialStore, Secret},
    token::{TokenError, TokenManager},
};

/// Staleness margin in seconds.
///
/// A credential is treated as stale this long before it actually expires, so
/// in-flight requests never carry a value that expires mid-flight.
pub const DEFAULT_STALENESS_MARGIN_SECS: i64 = 60;

/// The single refresh slot shared by all callers.
///
/// `generation` counts completed refresh attempts; `last_outcome` is the
/// result of the most recent one, handed to callers that waited on it.
#[derive(Default)]
struct RefreshSlot {
    generation: u64,
    last_outcome: Option<Result<Secret, TokenError>>,
}

/// Default implementation of TokenManager.
///
/// # Type Parameters
///
/// * `E` - The token endpoint used for refresh exchanges
pub struct DefaultTokenManager<E: TokenEndpoint> {
    store: CredentialStore,
    endpoint: E,
    client_id: Option<String>,
    client_secret: Option<Secret>,
    staleness_margin: Duration,
    slot: Mutex<RefreshSlot>,
    completed: AtomicU64,
}

impl<E: TokenEndpoint> DefaultTokenManager<E> {
    /// Create a manager from the supplied credentials.
    ///
    /// Uses the default staleness margin of 60 seconds.
    pub fn new(credentials: &Credentials, endpoint: E) -> Self {
        Self {
            store: CredentialStore::new(credentials.initial_state()),
            endpoint,
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            staleness_margin: Duration::seconds(DEFAULT_STALENESS_MARGIN_SECS),
            slot: Mutex::new(RefreshSlot::default()),
            completed: AtomicU64::new(0),
        }
    }

    /// Override the staleness margin.
    pub fn with_staleness_margin(mut self, margin: Duration) -> Self {
        self.staleness_margin = margin;
        self
    }

    /// Read access to the credential store.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// The stored access value, if present and not stale.
    fn current_if_fresh(&self) -> Option<Secret> {
        self.store
            .snapshot()
            .usable_access(Utc::now(), self.staleness_margin)
            .cloned()
    }

    /// Pick the grant for the material held.
    ///
    /// Both grants need the client identifier and secret.
    fn build_grant(&self, state: &CredentialState) -> Result<GrantRequest, TokenError> {
        let (client_id, client_secret) = match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => (id.clone(), secret.clone()),
            (None, _) => {
                return Err(TokenError::Config {
                    message: "client_id is required to refresh the access token".to_string(),
                });
            }
            (_, None) => {
                return Err(TokenError::Config {
                    message: "client_secret is required to refresh the access token".to_string(),
                });
            }
        };

        Ok(match &state.refresh {
            Some(refresh_token) => GrantRequest::RefreshToken {
                client_id,
                client_secret,
                refresh_token: refresh_token.clone(),
            },
            None => GrantRequest::ClientCredentials {
                client_id,
                client_secret,
            },
        })
    }

    /// Perform one exchange and store its result. Caller holds the slot.
    async fn exchange(&self) -> Result<Secret, TokenError> {
        let state = self.store.snapshot();
        if !state.is_refreshable() {
            return Err(TokenError::Unauthenticated {
                message: "no access token configured and no OAuth material to obtain one"
                    .to_string(),
            });
        }

        let grant = self.build_grant(&state)?;
        tracing::info!("Refreshing access token with {} grant", grant.grant_type());

        let issued = self.endpoint.exchange(&grant).await?;

        let access = Secret::new(issued.access_token);
        let expires_at = Duration::try_seconds(issued.expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| TokenError::InvalidResponse {
                message: format!("expires_in out of range: {}", issued.expires_in),
            })?;
        let rotated = issued.refresh_token.filter(|r| !r.is_empty()).map(Secret::new);

        tracing::debug!(
            "Access token refreshed, expires at {} (refresh token rotated: {})",
            expires_at,
            rotated.is_some()
        );

        self.store.replace_access(access.clone(), expires_at, rotated);
        Ok(access)
    }

    /// Refresh, or join a refresh another caller completed while we waited.
    ///
    /// With `force` the stored credential is expired first, so a refresh is
    /// performed even if the value has not yet reached its staleness window.
    async fn refresh_or_join(&self, force: bool) -> Result<Secret, TokenError> {
        let observed = self.completed.load(Ordering::Acquire);
        let mut slot = self.slot.lock().await;

        if slot.generation != observed {
            if let Some(outcome) = &slot.last_outcome {
                tracing::debug!("Joined refresh completed by a concurrent caller");
                return outcome.clone();
            }
        }

        if force {
            self.store.expire_now();
        } else if let Some(token) = self.current_if_fresh() {
            return Ok(token);
        }

        let outcome = self.exchange().await;
        if let Err(e) = &outcome {
            tracing::warn!("Token refresh failed: {}", e);
        }

        slot.generation += 1;
        slot.last_outcome = Some(outcome.clone());
        self.completed.store(slot.generation, Ordering::Release);

        outcome
    }
}

impl<E: TokenEndpoint> std::fmt::Debug for DefaultTokenManager<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultTokenManager")
            .field("store", &self.store)
            .field("client_id", &self.client_id)
            .field("staleness_margin", &self.staleness_margin)
            .finish()
    }
}

#[async_trait]
impl<E: TokenEndpoint + 'static> TokenManager for DefaultTokenManager<E> {
    async fn authorization_value(&self) -> Result<Secret, TokenError> {
        if let Some(token) = self.current_if_fresh() {
            tracing::trace!("Using cached access token");
            return Ok(token);
        }

        self.refresh_or_join(false).await
    }

    async fn force_reauthentication(&self) -> Result<Secret, TokenError> {
        if !self.is_refreshable() {
            return Err(TokenError::Unauthenticated {
                message: "access token was rejected and cannot be refreshed".to_string(),
            });
        }

        tracing::info!("Forcing re-authentication");
        self.refresh_or_join(true).await
    }

    fn is_refreshable(&self) -> bool {
        self.store.snapshot().is_refreshable()
    }
}
