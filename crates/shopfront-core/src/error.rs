//! Error types for Shopfront Core
//!
//! Provides error handling for:
//! - Configuration loading and validation
//! - Remote catalog fetches
//! - Static catalog problems surfaced at startup
//!
//! None of these reach the presentation layer as failures. A fetch error is
//! reduced to a [`FetchSignal`] and the store keeps serving its last catalog.

use serde::Serialize;
use shopfront_catalog::CatalogError;
use std::fmt;
use std::path::PathBuf;

/// Main shopfront error type
#[derive(Debug, thiserror::Error)]
pub enum ShopfrontError {
    /// Static catalog invalid
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote fetch failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// HTTP client could not be built
    #[error("http client error: {0}")]
    Client(String),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Base URL or path does not form a valid URL
    #[error("invalid url {value:?}: {reason}")]
    InvalidUrl { value: String, reason: String },

    /// Timeout must be at least one second when set
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    /// Environment variable holds an unusable value
    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Remote fetch errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Connection, DNS, TLS, timeout or body read failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx response
    #[error("unexpected status {0}")]
    Status(u16),

    /// Remote fetching switched off
    #[error("remote catalog disabled")]
    Disabled,
}

impl FetchError {
    /// Build a transport error from any displayable cause
    #[inline]
    pub fn transport(cause: impl fmt::Display) -> Self {
        Self::Transport(cause.to_string())
    }

    /// Check if this is a transport-level failure
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Diagnostic token exposed to the presentation layer
    #[must_use]
    pub fn signal(&self) -> FetchSignal {
        match self {
            Self::Transport(_) | Self::Disabled => FetchSignal::Offline,
            Self::Status(code) => FetchSignal::HttpStatus(*code),
        }
    }
}

/// Short, non-fatal diagnostic for a fetch that could not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchSignal {
    /// Endpoint unreachable or remote disabled
    Offline,
    /// Endpoint answered with a non-2xx status
    HttpStatus(u16),
}

impl fmt::Display for FetchSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => f.write_str("offline"),
            Self::HttpStatus(code) => write!(f, "http-{code}"),
        }
    }
}

impl Serialize for FetchSignal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_signals() {
        assert_eq!(FetchError::transport("refused").signal(), FetchSignal::Offline);
        assert_eq!(FetchError::Disabled.signal(), FetchSignal::Offline);
        assert_eq!(FetchError::Status(503).signal(), FetchSignal::HttpStatus(503));
    }

    #[test]
    fn fetch_signal_tokens() {
        assert_eq!(FetchSignal::Offline.to_string(), "offline");
        assert_eq!(FetchSignal::HttpStatus(404).to_string(), "http-404");
        assert_eq!(
            serde_json::to_string(&FetchSignal::HttpStatus(500)).unwrap(),
            "\"http-500\""
        );
    }

    #[test]
    fn fetch_error_is_transport() {
        assert!(FetchError::transport("reset").is_transport());
        assert!(!FetchError::Status(500).is_transport());
    }

    #[test]
    fn shopfront_error_display() {
        let err = ShopfrontError::from(FetchError::Status(502));
        assert!(err.to_string().contains("unexpected status 502"));

        let err = ShopfrontError::from(CatalogError::Empty);
        assert!(err.to_string().contains("catalog is empty"));
    }
}
