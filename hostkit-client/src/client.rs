use crate::config::ClientConfig;
use crate::executor::RequestExecutor;
use crate::fallback::FallbackConfig;
use crate::pager::{CursorPager, DEFAULT_PAGE_SIZE, PageRequest};
use crate::retry::{RetryOptions, execute_with_retry};
use crate::types::{ApiError, Page, RateLimitEvent, Result};
use futures_core::Stream;
use hostkit_core::{Credentials, DefaultTokenManager, HttpTokenEndpoint, TokenManager};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

/// Client for the hostkit rental-management API.
///
/// Every call goes through the same pipeline: the retry controller wraps
/// single attempts of the request executor, and the executor asks the token
/// manager for a current bearer value on each attempt. A 401 from the server
/// forces one re-authentication followed by one more pass through the retry
/// loop.
///
/// # Example
///
/// ```no_run
/// use hostkit_client::HostkitClient;
/// use hostkit_client::filters::PropertyFilter;
///
/// #[tokio::main]
/// async fn main() -> hostkit_client::Result<()> {
///     let client = HostkitClient::builder()
///         .client_id("my-client")
///         .client_secret("my-secret")
///         .build()?;
///
///     let page = client.list_properties(&PropertyFilter::new()).await?;
///     for property in page.data {
///         println!("{}: {}", property.id, property.name);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct HostkitClient {
    executor: RequestExecutor,
    tokens: Arc<dyn TokenManager>,
    retry: RetryOptions,
}

impl std::fmt::Debug for HostkitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostkitClient")
            .field("base_url", &self.base_url())
            .field("refreshable", &self.tokens.is_refreshable())
            .field("retry", &self.retry)
            .finish()
    }
}

impl HostkitClient {
    /// Start building a client.
    pub fn builder() -> HostkitClientBuilder {
        HostkitClientBuilder::new()
    }

    /// Build a client from a complete configuration.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        HostkitClientBuilder::from_config(config).build()
    }

    /// Build a client authenticated with a static personal token.
    pub fn with_token(token: impl Into<String>) -> Result<Self> {
        Self::builder()
            .access_token(token)
            .fallback(FallbackConfig::None)
            .build()
    }

    /// The API root requests are sent to.
    pub fn base_url(&self) -> &str {
        self.executor.base_url()
    }

    /// The token manager backing this client.
    pub fn token_manager(&self) -> &Arc<dyn TokenManager> {
        &self.tokens
    }

    /// Send a request through the full pipeline.
    ///
    /// Returns `Ok(None)` when the server answered without a body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<Option<T>> {
        let context = format!("{} {}", method, path);

        match self.request_with_retry(&method, path, query, body, &context).await {
            Err(err) if err.is_unauthorized() && self.tokens.is_refreshable() => {
                info!("{} rejected the access token, re-authenticating", context);
                self.tokens.force_reauthentication().await?;
                self.request_with_retry(&method, path, query, body, &context)
                    .await
            }
            other => other,
        }
    }

    async fn request_with_retry<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&serde_json::Value>,
        context: &str,
    ) -> Result<Option<T>> {
        execute_with_retry(
            move || self.executor.execute(method.clone(), path, query, body),
            context,
            &self.retry,
        )
        .await
    }

    /// `GET` a resource that must have a body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let value = self.request(Method::GET, path, query, None).await?;
        require_body(value, path)
    }

    /// `POST` a JSON body.
    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: &serde_json::Value) -> Result<T> {
        let value = self.request(Method::POST, path, &[], Some(body)).await?;
        require_body(value, path)
    }

    /// `PUT` a JSON body.
    pub async fn put<T: DeserializeOwned>(&self, path: &str, body: &serde_json::Value) -> Result<T> {
        let value = self.request(Method::PUT, path, &[], Some(body)).await?;
        require_body(value, path)
    }

    /// `PATCH` a JSON body.
    pub async fn patch<T: DeserializeOwned>(&self, path: &str, body: &serde_json::Value) -> Result<T> {
        let value = self.request(Method::PATCH, path, &[], Some(body)).await?;
        require_body(value, path)
    }

    /// `DELETE` a resource; any response body is discarded.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.request::<serde_json::Value>(Method::DELETE, path, &[], None)
            .await
            .map(|_| ())
    }

    /// Fetch one page of a list endpoint.
    pub async fn list_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Page<T>> {
        self.get(path, &query).await
    }

    /// Lazily stream every item of a list endpoint.
    pub fn paginate<T>(
        &self,
        path: String,
        params: Vec<(String, String)>,
    ) -> impl Stream<Item = Result<T>> + Send + '_
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.paginate_with_page_size(path, params, DEFAULT_PAGE_SIZE)
    }

    /// Like [`paginate`](Self::paginate) with an explicit page size.
    pub fn paginate_with_page_size<T>(
        &self,
        path: String,
        params: Vec<(String, String)>,
        page_size: u32,
    ) -> impl Stream<Item = Result<T>> + Send + '_
    where
        T: DeserializeOwned + Send + 'static,
    {
        debug!("paginating {} with page size {}", path, page_size);

        CursorPager::new(params, move |request: PageRequest| {
            let path = path.clone();
            async move { self.list_page::<T>(&path, request.query_pairs()).await }
        })
        .with_page_size(page_size)
    }
}

fn require_body<T>(value: Option<T>, path: &str) -> Result<T> {
    value.ok_or_else(|| ApiError::Decode(format!("{} returned an empty body", path)))
}

/// Builder for creating a `HostkitClient` with custom configuration.
pub struct HostkitClientBuilder {
    config: ClientConfig,
    http_client: Option<reqwest::Client>,
    token_manager: Option<Arc<dyn TokenManager>>,
}

impl HostkitClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::from_config(ClientConfig::default())
    }

    /// Start from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            http_client: None,
            token_manager: None,
        }
    }

    /// Set the API root.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set a static access token.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.credentials = self.config.credentials.with_access_token(token);
        self
    }

    /// Set the OAuth refresh token.
    pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
        self.config.credentials = self.config.credentials.with_refresh_token(token);
        self
    }

    /// Set the OAuth client identifier.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.credentials = self.config.credentials.with_client_id(client_id);
        self
    }

    /// Set the OAuth client secret.
    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.credentials = self.config.credentials.with_client_secret(secret);
        self
    }

    /// Replace all explicit credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = credentials;
        self
    }

    /// Set the retry options.
    pub fn retry(mut self, retry: RetryOptions) -> Self {
        self.config.retry = retry;
        self
    }

    /// Register a callback for rate-limit waits.
    pub fn on_rate_limit<F>(mut self, callback: F) -> Self
    where
        F: Fn(&RateLimitEvent) + Send + Sync + 'static,
    {
        self.config.retry = self.config.retry.on_rate_limit(callback);
        self
    }

    /// Set the fallback configuration.
    pub fn fallback(mut self, config: FallbackConfig) -> Self {
        self.config.fallback = config;
        self
    }

    /// Use an existing HTTP client (shared connection pool, proxies, timeouts).
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Use a custom token manager instead of the built-in one.
    ///
    /// Explicit credentials and fallbacks are ignored when this is set.
    pub fn token_manager(mut self, manager: Arc<dyn TokenManager>) -> Self {
        self.token_manager = Some(manager);
        self
    }

    /// Build the client.
    ///
    /// Fallback credentials are resolved here, once.
    pub fn build(self) -> Result<HostkitClient> {
        let base_url = self.config.normalized_base_url()?;
        let http_client = self.http_client.unwrap_or_default();

        let tokens: Arc<dyn TokenManager> = match self.token_manager {
            Some(manager) => manager,
            None => {
                let credentials = self.config.effective_credentials()?;
                if credentials.is_empty() {
                    debug!("no credentials configured; requests will fail as unauthenticated");
                }
                let endpoint = HttpTokenEndpoint::with_client(&base_url, http_client.clone())
                    .map_err(ApiError::Token)?;
                Arc::new(DefaultTokenManager::new(&credentials, endpoint))
            }
        };

        Ok(HostkitClient {
            executor: RequestExecutor::new(http_client, base_url, tokens.clone()),
            tokens,
            retry: self.config.retry,
        })
    }
}

impl Default for HostkitClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
