//! HTTP implementation of [`TokenEndpoint`].

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use super::{GrantRequest, TokenEndpoint, TokenGrant};
use crate::token::TokenError;

/// Token endpoint reached at `POST {base}/oauth/token` with a form-encoded body.
#[derive(Debug, Clone)]
pub struct HttpTokenEndpoint {
    http_client: reqwest::Client,
    token_url: Url,
}

impl HttpTokenEndpoint {
    /// Create an endpoint for the API rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, TokenError> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create an endpoint sharing an existing HTTP client.
    pub fn with_client(base_url: &str, http_client: reqwest::Client) -> Result<Self, TokenError> {
        let raw = format!("{}/oauth/token", base_url.trim_end_matches('/'));
        let token_url = Url::parse(&raw).map_err(|e| TokenError::Config {
            message: format!("invalid token URL {}: {}", raw, e),
        })?;

        Ok(Self {
            http_client,
            token_url,
        })
    }

    /// The resolved token URL.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }
}

#[async_trait]
impl TokenEndpoint for HttpTokenEndpoint {
    async fn exchange(&self, grant: &GrantRequest) -> Result<TokenGrant, TokenError> {
        debug!("requesting {} grant from {}", grant.grant_type(), self.token_url);

        let response = self
            .http_client
            .post(self.token_url.clone())
            .form(&grant.form_fields())
            .send()
            .await
            .map_err(|e| TokenError::Network {
                message: format!("token request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<no body>"));
            return Err(TokenError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let grant = response
            .json::<TokenGrant>()
            .await
            .map_err(|e| TokenError::InvalidResponse {
                message: e.to_string(),
            })?;

        if grant.access_token.is_empty() {
            return Err(TokenError::InvalidResponse {
                message: "access_token is empty".to_string(),
            });
        }

        Ok(grant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_url_appends_path() {
        let endpoint = HttpTokenEndpoint::new("https://api.hostkit.io/v1/").unwrap();
        assert_eq!(
            endpoint.token_url().as_str(),
            "https://api.hostkit.io/v1/oauth/token"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpTokenEndpoint::new("not a url");
        assert!(matches!(result, Err(TokenError::Config { .. })));
    }
}
