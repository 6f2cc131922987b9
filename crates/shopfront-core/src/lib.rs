//! Shopfront Core
//!
//! Runtime side of the storefront catalog:
//! - Loads configuration (TOML + environment)
//! - Fetches the remote catalog over HTTP, once per activation
//! - Reconciles it against the embedded static catalog
//! - Publishes `{ products, featured, loading, error }` views to the UI
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_core::{CatalogStore, HttpCatalogSource, ShopfrontConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ShopfrontConfig::new().with_env_overrides()?;
//! let store = CatalogStore::embedded()?;
//!
//! let activation = store.activate(Arc::new(HttpCatalogSource::new(&config)?));
//! activation.finished().await;
//!
//! let view = store.snapshot();
//! println!("{} products, error: {:?}", view.products.len(), view.error);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod source;
pub mod store;
pub mod view;

pub use config::ShopfrontConfig;
pub use error::{ConfigError, FetchError, FetchSignal, ShopfrontError};
pub use source::{CatalogSource, DisabledSource, HttpCatalogSource};
pub use store::{Activation, ActivationId, ActivationOutcome, CatalogStore};
pub use view::{CatalogView, CategoryFilter};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Shopfront Core
    pub use crate::{
        Activation, ActivationOutcome, CatalogSource, CatalogStore, CatalogView, CategoryFilter,
        FetchSignal, HttpCatalogSource, ShopfrontConfig,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
