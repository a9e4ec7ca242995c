use crate::types::Result;
use hostkit_core::{CredentialType, Credentials, Secret};
use tracing::{debug, trace};

#[cfg(feature = "fallback-config")]
use crate::types::ApiError;
#[cfg(feature = "fallback-config")]
use std::path::{Path, PathBuf};

/// Default prefix for credential environment variables.
pub const DEFAULT_ENV_PREFIX: &str = "HOSTKIT";

/// Where to look for credentials that were not supplied explicitly.
#[derive(Debug, Clone)]
pub enum FallbackConfig {
    /// No fallback; only explicit credentials are used.
    None,

    /// Read from environment variables.
    ///
    /// Format: `{prefix}_{TYPE}`
    /// Example: `HOSTKIT_TOKEN`, `HOSTKIT_CLIENT_SECRET`
    EnvVars {
        /// Prefix for environment variables (default: "HOSTKIT").
        prefix: String,
    },

    /// Read from a TOML config file with a `[credentials]` table.
    #[cfg(feature = "fallback-config")]
    ConfigFile {
        /// Path to the config file.
        path: PathBuf,
    },

    /// Chain multiple fallback strategies.
    ///
    /// Each credential field is taken from the first strategy that has it.
    Chain(Vec<FallbackConfig>),
}

impl Default for FallbackConfig {
    fn default() -> Self {
        #[allow(unused_mut)]
        let mut chain = Vec::new();

        #[cfg(feature = "fallback-env")]
        chain.push(FallbackConfig::env_vars());

        #[cfg(feature = "fallback-config")]
        {
            if let Some(config_path) = default_config_path() {
                chain.push(FallbackConfig::ConfigFile { path: config_path });
            }
        }

        FallbackConfig::Chain(chain)
    }
}

impl FallbackConfig {
    /// Create an env vars fallback with default prefix.
    pub fn env_vars() -> Self {
        Self::EnvVars {
            prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Create an env vars fallback with custom prefix.
    pub fn env_vars_with_prefix(prefix: impl Into<String>) -> Self {
        Self::EnvVars {
            prefix: prefix.into(),
        }
    }

    /// Create a config file fallback.
    #[cfg(feature = "fallback-config")]
    pub fn config_file(path: impl Into<PathBuf>) -> Self {
        Self::ConfigFile { path: path.into() }
    }

    /// Chain multiple fallback strategies.
    pub fn chain(strategies: Vec<FallbackConfig>) -> Self {
        Self::Chain(strategies)
    }
}

/// Get the default config file path.
#[cfg(feature = "fallback-config")]
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "hostkit", "hostkit")
        .map(|dirs| dirs.config_dir().join("credentials.toml"))
}

/// Resolves credential fields from the configured fallback sources.
///
/// Resolution happens once, when a client is built.
#[derive(Debug, Clone)]
pub struct FallbackResolver {
    config: FallbackConfig,
}

impl FallbackResolver {
    /// Create a new fallback resolver.
    pub fn new(config: FallbackConfig) -> Self {
        Self { config }
    }

    /// Resolve every credential field.
    pub fn credentials(&self) -> Result<Credentials> {
        let mut credentials = Credentials::new();

        for credential_type in CredentialType::ALL {
            let Some(value) = self.resolve(credential_type)? else {
                continue;
            };
            let value = value.into_inner();
            credentials = match credential_type {
                CredentialType::Token => credentials.with_access_token(value),
                CredentialType::RefreshToken => credentials.with_refresh_token(value),
                CredentialType::ClientId => credentials.with_client_id(value),
                CredentialType::ClientSecret => credentials.with_client_secret(value),
            };
        }

        Ok(credentials)
    }

    /// Resolve a single credential field.
    ///
    /// `Ok(None)` means no source had it; errors come from unreadable or
    /// malformed config files.
    pub fn resolve(&self, credential_type: CredentialType) -> Result<Option<Secret>> {
        resolve_with_config(&self.config, credential_type)
    }
}

fn resolve_with_config(
    config: &FallbackConfig,
    credential_type: CredentialType,
) -> Result<Option<Secret>> {
    match config {
        FallbackConfig::None => Ok(None),

        FallbackConfig::EnvVars { prefix } => Ok(resolve_from_env(prefix, credential_type)),

        #[cfg(feature = "fallback-config")]
        FallbackConfig::ConfigFile { path } => resolve_from_config_file(path, credential_type),

        FallbackConfig::Chain(strategies) => {
            for strategy in strategies {
                match resolve_with_config(strategy, credential_type) {
                    Ok(Some(value)) => return Ok(Some(value)),
                    Ok(None) => continue,
                    Err(e) => {
                        trace!("fallback strategy failed: {}", e);
                        continue;
                    }
                }
            }
            Ok(None)
        }
    }
}

fn resolve_from_env(prefix: &str, credential_type: CredentialType) -> Option<Secret> {
    let env_var = format!("{}_{}", prefix, credential_type.env_suffix());

    debug!("looking for env var: {}", env_var);

    match std::env::var(&env_var) {
        Ok(value) if !value.is_empty() => {
            debug!("found {} in env var {}", credential_type, env_var);
            Some(Secret::new(value))
        }
        _ => None,
    }
}

#[cfg(feature = "fallback-config")]
fn resolve_from_config_file(path: &Path, credential_type: CredentialType) -> Result<Option<Secret>> {
    debug!("looking for {} in config file: {:?}", credential_type, path);

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ApiError::Config(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            )));
        }
    };

    let config: CredentialsFile = toml::from_str(&content).map_err(|e| {
        ApiError::Config(format!("failed to parse config file {}: {}", path.display(), e))
    })?;

    match config.credentials.get(credential_type.as_str()) {
        Some(value) if !value.is_empty() => {
            debug!("found {} in config file", credential_type);
            Ok(Some(Secret::new(value.clone())))
        }
        _ => Ok(None),
    }
}

/// TOML config file structure for credentials.
#[cfg(feature = "fallback-config")]
#[derive(Debug, serde::Deserialize)]
struct CredentialsFile {
    /// credential_type -> value
    #[serde(default)]
    credentials: std::collections::HashMap<String, String>,
}
