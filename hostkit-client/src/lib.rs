//! Hostkit Client Library
//!
//! A typed async client for the hostkit short-term-rental management API.
//!
//! # Overview
//!
//! Every call the client makes runs through one pipeline:
//!
//! - The **token manager** (from `hostkit-core`) supplies a bearer value,
//!   refreshing it shortly before it expires. Concurrent callers share a single
//!   refresh.
//! - The **retry controller** retries 429 and 5xx responses with jittered
//!   exponential backoff, honoring `Retry-After` on 429.
//! - The **request executor** performs one attempt and maps failures to
//!   [`ApiError`].
//! - The **cursor pager** turns list endpoints into lazy streams.
//!
//! A 401 response forces one re-authentication and one more pass through the
//! retry loop.
//!
//! # Quick Start
//!
//! ```no_run
//! use futures_util::TryStreamExt;
//! use hostkit_client::HostkitClient;
//! use hostkit_client::filters::ReservationFilter;
//!
//! #[tokio::main]
//! async fn main() -> hostkit_client::Result<()> {
//!     // Personal access token; never refreshed
//!     let client = HostkitClient::with_token("pat-123")?;
//!
//!     let filter = ReservationFilter::new().with_status("confirmed");
//!     let reservations: Vec<_> = client.reservations(&filter).try_collect().await?;
//!     println!("{} confirmed reservations", reservations.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # OAuth
//!
//! ```no_run
//! use hostkit_client::{HostkitClient, RetryOptions};
//!
//! # fn main() -> hostkit_client::Result<()> {
//! let client = HostkitClient::builder()
//!     .client_id("my-client")
//!     .client_secret("my-secret")
//!     .refresh_token("rt-abc")
//!     .retry(RetryOptions::default().with_max_attempts(6))
//!     .on_rate_limit(|event| eprintln!("throttled for {}s: {}", event.wait_hint_secs, event.context))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Credential Fallback
//!
//! When no credentials are given to the builder, they are looked up once, at
//! build time, from:
//!
//! 1. Environment variables `{PREFIX}_{TYPE}` (default prefix `HOSTKIT`):
//!    `HOSTKIT_TOKEN`, `HOSTKIT_REFRESH_TOKEN`, `HOSTKIT_CLIENT_ID`,
//!    `HOSTKIT_CLIENT_SECRET`
//! 2. A TOML file at the platform config directory (`credentials.toml`):
//!
//! ```toml
//! [credentials]
//! token = "pat-123"
//! ```
//!
//! # Feature Flags
//!
//! - `fallback-env` (default): Include environment variables in the default fallback chain
//! - `fallback-config` (default): Enable TOML config file fallback

mod client;
pub mod config;
pub mod executor;
pub mod fallback;
pub mod filters;
pub mod mask;
pub mod pager;
pub mod resources;
pub mod retry;
pub mod types;

// Re-export main types from client module
pub use client::{HostkitClient, HostkitClientBuilder};

// Re-export from other modules
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use fallback::{FallbackConfig, FallbackResolver};
pub use pager::{CursorPager, PageRequest, collect_all};
pub use retry::{RetryOptions, execute_with_retry};
pub use types::{ApiError, Page, PageMeta, RateLimitEvent, Result};

pub use hostkit_core::{Credentials, TokenError, TokenManager};
