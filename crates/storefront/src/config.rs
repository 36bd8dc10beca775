//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `QUICKCART_STORAGE` - Slot backend, `file` or `memory` (default: file)
//! - `QUICKCART_DATA_DIR` - Directory for the file backend (default: .quickcart)
//! - `QUICKCART_CART_KEY` - Cart slot key (default: `quickcart_cart`)
//! - `QUICKCART_WISHLIST_KEY` - Wishlist slot key (default: `quickcart-wishlist`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate between 0.0 and 1.0 (default: 1.0)

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::is_valid_key;

/// Default cart slot key, shared with the browser client.
pub const DEFAULT_CART_KEY: &str = "quickcart_cart";
/// Default wishlist slot key, shared with the browser client.
pub const DEFAULT_WISHLIST_KEY: &str = "quickcart-wishlist";

const DEFAULT_DATA_DIR: &str = ".quickcart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Where the cart and wishlist slots live
    pub storage: StorageConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
}

/// Slot storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Backend holding the slots
    pub backend: StorageBackend,
    /// Key of the cart slot
    pub cart_key: String,
    /// Key of the wishlist slot
    pub wishlist_key: String,
}

/// Available slot backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local, nothing survives a restart.
    Memory,
    /// One JSON file per slot under `dir`.
    File { dir: PathBuf },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File {
                dir: PathBuf::from(DEFAULT_DATA_DIR),
            },
            cart_key: DEFAULT_CART_KEY.to_string(),
            wishlist_key: DEFAULT_WISHLIST_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    /// In-memory slots with the default keys.
    #[must_use]
    pub fn memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            ..Self::default()
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match get("QUICKCART_STORAGE").as_deref().map(str::trim) {
            None | Some("file") => StorageBackend::File {
                dir: PathBuf::from(
                    get("QUICKCART_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
                ),
            },
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "QUICKCART_STORAGE".to_string(),
                    format!("expected 'file' or 'memory', got '{other}'"),
                ));
            }
        };

        let cart_key = get("QUICKCART_CART_KEY").unwrap_or_else(|| DEFAULT_CART_KEY.to_string());
        validate_key(&cart_key, "QUICKCART_CART_KEY")?;
        let wishlist_key =
            get("QUICKCART_WISHLIST_KEY").unwrap_or_else(|| DEFAULT_WISHLIST_KEY.to_string());
        validate_key(&wishlist_key, "QUICKCART_WISHLIST_KEY")?;

        if cart_key == wishlist_key {
            return Err(ConfigError::InvalidEnvVar(
                "QUICKCART_WISHLIST_KEY".to_string(),
                "must differ from QUICKCART_CART_KEY".to_string(),
            ));
        }

        let sentry_sample_rate = match get("SENTRY_SAMPLE_RATE") {
            Some(raw) => parse_sample_rate(&raw, "SENTRY_SAMPLE_RATE")?,
            None => 1.0,
        };

        Ok(Self {
            storage: StorageConfig {
                backend,
                cart_key,
                wishlist_key,
            },
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
        })
    }
}

fn validate_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    if !is_valid_key(key) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("'{key}' may only contain letters, digits, '_', '-' and '.'"),
        ));
    }
    Ok(())
}

fn parse_sample_rate(raw: &str, var_name: &str) -> Result<f32, ConfigError> {
    let rate = raw
        .trim()
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.storage, StorageConfig::default());
        assert_eq!(config.storage.cart_key, "quickcart_cart");
        assert_eq!(config.storage.wishlist_key, "quickcart-wishlist");
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_memory_backend() {
        let config = load(&[("QUICKCART_STORAGE", "memory")]).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_file_backend_dir() {
        let config = load(&[("QUICKCART_DATA_DIR", "/var/lib/quickcart")]).unwrap();
        assert_eq!(
            config.storage.backend,
            StorageBackend::File {
                dir: PathBuf::from("/var/lib/quickcart")
            }
        );
    }

    #[test]
    fn test_unknown_backend() {
        let err = load(&[("QUICKCART_STORAGE", "redis")]).unwrap_err();
        assert!(err.to_string().contains("QUICKCART_STORAGE"));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("QUICKCART_CART_KEY", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.storage.cart_key, DEFAULT_CART_KEY);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_key() {
        let err = load(&[("QUICKCART_CART_KEY", "../cart")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref var, _) if var == "QUICKCART_CART_KEY"));
    }

    #[test]
    fn test_keys_must_differ() {
        let err = load(&[
            ("QUICKCART_CART_KEY", "shared"),
            ("QUICKCART_WISHLIST_KEY", "shared"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_sample_rate() {
        let config = load(&[("SENTRY_SAMPLE_RATE", "0.25")]).unwrap();
        assert!((config.sentry_sample_rate - 0.25).abs() < f32::EPSILON);

        assert!(load(&[("SENTRY_SAMPLE_RATE", "1.5")]).is_err());
        assert!(load(&[("SENTRY_SAMPLE_RATE", "lots")]).is_err());
    }
}
