//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults target the public API.
//!
//! - `FRESHCART_API_BASE_URL` - API root (default: `https://ecommerce.routemisr.com/api/v1`)
//! - `FRESHCART_FETCH_RETRIES` - Retry count for idempotent GETs (default: 5)
//! - `FRESHCART_FETCH_RETRY_DELAY_SECS` - Fixed delay between retries (default: 10)
//! - `FRESHCART_CATALOG_TTL_SECS` - Catalog cache time-to-live (default: 3600)

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://ecommerce.routemisr.com/api/v1";
const DEFAULT_FETCH_RETRIES: u32 = 5;
const DEFAULT_FETCH_RETRY_DELAY_SECS: u64 = 10;
const DEFAULT_CATALOG_TTL_SECS: u64 = 3600;
const DEFAULT_CATALOG_CAPACITY: u64 = 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root URL; endpoint paths are joined onto this.
    pub base_url: Url,
    /// How many times an idempotent GET is retried after a transport or
    /// server failure. Mutating calls are never retried.
    pub fetch_retries: u32,
    /// Fixed delay between GET retries.
    pub fetch_retry_delay: Duration,
    /// Time-to-live for cached catalog responses.
    pub catalog_cache_ttl: Duration,
    /// Maximum number of cached catalog entries.
    pub catalog_cache_capacity: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            fetch_retries: DEFAULT_FETCH_RETRIES,
            fetch_retry_delay: Duration::from_secs(DEFAULT_FETCH_RETRY_DELAY_SECS),
            catalog_cache_ttl: Duration::from_secs(DEFAULT_CATALOG_TTL_SECS),
            catalog_cache_capacity: DEFAULT_CATALOG_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Some(raw) = get_optional_env("FRESHCART_API_BASE_URL") {
            config.base_url = Url::parse(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("FRESHCART_API_BASE_URL".to_owned(), e.to_string())
            })?;
        }
        if let Some(raw) = get_optional_env("FRESHCART_FETCH_RETRIES") {
            config.fetch_retries = raw.parse().map_err(|_| {
                ConfigError::InvalidEnvVar("FRESHCART_FETCH_RETRIES".to_owned(), raw)
            })?;
        }
        if let Some(raw) = get_optional_env("FRESHCART_FETCH_RETRY_DELAY_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                ConfigError::InvalidEnvVar("FRESHCART_FETCH_RETRY_DELAY_SECS".to_owned(), raw)
            })?;
            config.fetch_retry_delay = Duration::from_secs(secs);
        }
        if let Some(raw) = get_optional_env("FRESHCART_CATALOG_TTL_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                ConfigError::InvalidEnvVar("FRESHCART_CATALOG_TTL_SECS".to_owned(), raw)
            })?;
            config.catalog_cache_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Build the full URL for an endpoint path relative to the API root.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/{path}")
    }
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_public_api() {
        let config = ClientConfig::default();
        assert_eq!(
            config.base_url.as_str(),
            "https://ecommerce.routemisr.com/api/v1"
        );
        assert_eq!(config.fetch_retries, 5);
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let config = ClientConfig::default();
        assert_eq!(
            config.endpoint("cart"),
            "https://ecommerce.routemisr.com/api/v1/cart"
        );
        assert_eq!(
            config.endpoint("cart/123"),
            "https://ecommerce.routemisr.com/api/v1/cart/123"
        );
    }
}
