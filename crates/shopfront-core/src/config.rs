//! Shopfront configuration
//!
//! Loaded from TOML, then overridden from `SHOPFRONT_*` environment
//! variables. Every field has a default so an empty file is valid.

use crate::error::ConfigError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Env var overriding [`ShopfrontConfig::api_base_url`]
pub const ENV_API_BASE_URL: &str = "SHOPFRONT_API_BASE_URL";
/// Env var overriding [`ShopfrontConfig::products_path`]
pub const ENV_PRODUCTS_PATH: &str = "SHOPFRONT_PRODUCTS_PATH";
/// Env var overriding [`ShopfrontConfig::request_timeout_secs`]
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SHOPFRONT_REQUEST_TIMEOUT_SECS";

/// Shopfront configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopfrontConfig {
    /// Base URL of the remote product API
    pub api_base_url: String,
    /// Path of the products endpoint, joined onto the base URL
    pub products_path: String,
    /// Optional request timeout; the transport default applies when unset
    pub request_timeout_secs: Option<u64>,
    /// User-Agent header sent with the fetch
    pub user_agent: String,
}

impl ShopfrontConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With API base URL
    #[inline]
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Parse from TOML text and validate
    ///
    /// # Errors
    /// - `ConfigError::Parse` on invalid TOML
    /// - any error from [`ShopfrontConfig::validate`]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// - `ConfigError::Read` if the file cannot be read
    /// - any error from [`ShopfrontConfig::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from the process environment
    ///
    /// # Errors
    /// Returns an error if an override is invalid.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup
    ///
    /// # Errors
    /// - `ConfigError::InvalidEnv` if the timeout is not an integer
    /// - any error from [`ShopfrontConfig::validate`]
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_BASE_URL) {
            self.api_base_url = url;
        }
        if let Some(path) = lookup(ENV_PRODUCTS_PATH) {
            self.products_path = path;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            let secs = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: ENV_REQUEST_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
            self.request_timeout_secs = Some(secs);
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that the endpoint URL resolves and the timeout is usable
    ///
    /// # Errors
    /// - `ConfigError::InvalidUrl` if the URL does not parse
    /// - `ConfigError::ZeroTimeout` if the timeout is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.products_url()?;
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Full URL of the products endpoint
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidUrl` if base or path is unusable.
    pub fn products_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            value: format!("{}{}", self.api_base_url, self.products_path),
            reason,
        };

        let base = Url::parse(&self.api_base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", base.scheme())));
        }
        base.join(&self.products_path)
            .map_err(|e| invalid(e.to_string()))
    }

    /// Request timeout, if configured
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ShopfrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            products_path: "/api/products".to_string(),
            request_timeout_secs: None,
            user_agent: format!("shopfront/{}", crate::VERSION),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_url() {
        let config = ShopfrontConfig::new();
        assert_eq!(
            config.products_url().unwrap().as_str(),
            "http://localhost:3000/api/products"
        );
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ShopfrontConfig::from_toml_str("").unwrap(), ShopfrontConfig::default());
    }

    #[test]
    fn toml_overrides_fields() {
        let config = ShopfrontConfig::from_toml_str(
            r#"
            api_base_url = "https://shop.example.com"
            request_timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(
            config.products_url().unwrap().as_str(),
            "https://shop.example.com/api/products"
        );
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let result = ShopfrontConfig::from_toml_str(r#"api_base_url = "ftp://shop.example.com""#);
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = ShopfrontConfig::new().with_request_timeout(0).validate();
        assert!(matches!(result, Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = [
            (ENV_API_BASE_URL, "http://127.0.0.1:8080"),
            (ENV_REQUEST_TIMEOUT_SECS, " 3 "),
        ]
        .into_iter()
        .collect();

        let config = ShopfrontConfig::new()
            .apply_env(|key| env.get(key).map(|v| (*v).to_string()))
            .unwrap();

        assert_eq!(
            config.products_url().unwrap().as_str(),
            "http://127.0.0.1:8080/api/products"
        );
        assert_eq!(config.request_timeout_secs, Some(3));
    }

    #[test]
    fn env_timeout_must_be_numeric() {
        let result = ShopfrontConfig::new().apply_env(|key| {
            (key == ENV_REQUEST_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shopfront.toml");
        std::fs::write(&path, "products_path = \"/v2/products\"\n").unwrap();

        let config = ShopfrontConfig::load(&path).unwrap();
        assert_eq!(
            config.products_url().unwrap().as_str(),
            "http://localhost:3000/v2/products"
        );
    }

    #[test]
    fn load_missing_file_fails() {
        let result = ShopfrontConfig::load("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
