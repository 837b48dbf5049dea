//! Environment-supplied configuration
//!
//! Values come from the process environment after `.env` files are loaded.
//! API keys fall back to the OS keychain (see [`CredentialManager`]).

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::ai::credentials::CredentialManager;
use crate::audit::IssueCatalog;
use crate::error::{AuditError, CatalogError};

pub const GATEWAY_URL_VAR: &str = "PREAUDIT_GATEWAY_URL";
pub const GATEWAY_KEY_VAR: &str = "PREAUDIT_API_KEY";
pub const MODEL_VAR: &str = "PREAUDIT_MODEL";
pub const TIMEOUT_VAR: &str = "PREAUDIT_TIMEOUT_SECS";
pub const MAX_EXCERPT_VAR: &str = "PREAUDIT_MAX_EXCERPT_CHARS";
pub const FUNCTION_URL_VAR: &str = "PREAUDIT_FUNCTION_URL";
pub const FUNCTION_KEY_VAR: &str = "PREAUDIT_FUNCTION_KEY";
pub const CATALOG_PATH_VAR: &str = "PREAUDIT_CATALOG_PATH";

const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_EXCERPT_CHARS: usize = 10_000;

/// Load `.env` from the working directory, falling back to the parent
pub fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path("../.env");
    }
}

/// Settings for the chat-completions reasoning gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
    /// Cap on each file's base64 excerpt in the prompt
    pub max_excerpt_chars: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GATEWAY_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_excerpt_chars: DEFAULT_MAX_EXCERPT_CHARS,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, AuditError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuditError> {
        let defaults = Self::default();
        Ok(Self {
            endpoint: lookup(GATEWAY_URL_VAR).unwrap_or(defaults.endpoint),
            api_key: CredentialManager::resolve(lookup(GATEWAY_KEY_VAR), GATEWAY_KEY_VAR)?,
            model: lookup(MODEL_VAR).unwrap_or(defaults.model),
            timeout: Duration::from_secs(parse_or(&lookup, TIMEOUT_VAR, DEFAULT_TIMEOUT_SECS)),
            max_excerpt_chars: parse_or(&lookup, MAX_EXCERPT_VAR, DEFAULT_MAX_EXCERPT_CHARS),
        })
    }
}

/// Settings for the hosted audit function (multipart upload endpoint)
#[derive(Debug, Clone)]
pub struct FunctionConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl FunctionConfig {
    pub fn from_env() -> Result<Self, AuditError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuditError> {
        let endpoint = lookup(FUNCTION_URL_VAR).ok_or_else(|| AuditError::MissingCredentials {
            var: FUNCTION_URL_VAR.to_string(),
        })?;

        Ok(Self {
            endpoint,
            api_key: CredentialManager::resolve(lookup(FUNCTION_KEY_VAR), FUNCTION_KEY_VAR)?,
            timeout: Duration::from_secs(parse_or(&lookup, TIMEOUT_VAR, DEFAULT_TIMEOUT_SECS)),
        })
    }
}

/// The catalog named by `PREAUDIT_CATALOG_PATH`, or the builtin one
pub fn load_catalog() -> Result<IssueCatalog, CatalogError> {
    match std::env::var_os(CATALOG_PATH_VAR) {
        Some(path) => {
            let path = PathBuf::from(path);
            let catalog = IssueCatalog::from_path(&path)?;
            tracing::info!(
                path = %path.display(),
                version = catalog.version(),
                "Loaded issue catalog"
            );
            Ok(catalog)
        }
        None => Ok(IssueCatalog::builtin()),
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, var: &str, default: T) -> T {
    match lookup(var) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(var = var, value = %raw, "Ignoring invalid value, using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_gateway_defaults() {
        let config = GatewayConfig::from_lookup(lookup_from(&[(GATEWAY_KEY_VAR, "sk-1")])).unwrap();

        assert_eq!(config.api_key, "sk-1");
        assert_eq!(config.endpoint, DEFAULT_GATEWAY_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.max_excerpt_chars, 10_000);
    }

    #[test]
    fn test_gateway_overrides() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            (GATEWAY_KEY_VAR, "sk-1"),
            (GATEWAY_URL_VAR, "http://localhost:9000/v1/chat/completions"),
            (MODEL_VAR, "test-model"),
            (TIMEOUT_VAR, "30"),
            (MAX_EXCERPT_VAR, "500"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint, "http://localhost:9000/v1/chat/completions");
        assert_eq!(config.model, "test-model");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_excerpt_chars, 500);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            (GATEWAY_KEY_VAR, "sk-1"),
            (TIMEOUT_VAR, "soon"),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_function_requires_url() {
        let err =
            FunctionConfig::from_lookup(lookup_from(&[(FUNCTION_KEY_VAR, "anon")])).unwrap_err();
        assert!(matches!(
            err,
            AuditError::MissingCredentials { ref var } if var == FUNCTION_URL_VAR
        ));

        let config = FunctionConfig::from_lookup(lookup_from(&[
            (FUNCTION_URL_VAR, "https://example.test/functions/v1/run-audit"),
            (FUNCTION_KEY_VAR, "anon"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "anon");
    }
}
