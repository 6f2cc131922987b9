//! Shopfront Catalog
//!
//! Product model shared by every shopfront crate.
//!
//! # Core Concepts
//!
//! - [`Product`]: Opaque commerce record with an id and a join-key name
//! - [`RemoteProduct`]: Product plus the remote `featured` flag
//! - [`Catalog`]: Ordered product sequence with linear lookups
//! - [`FeaturedSet`]: Ordered ids chosen for prominent display
//! - [`embedded_catalog`]: The build-time static baseline
//!
//! # Example
//!
//! ```rust
//! use shopfront_catalog::{default_featured, embedded_catalog};
//!
//! let catalog = embedded_catalog().unwrap();
//! let featured = catalog.featured(&default_featured());
//! assert!(!featured.is_empty());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod catalog;
mod embedded;
mod error;
mod featured;
mod product;

pub use catalog::Catalog;
pub use embedded::{default_featured, embedded_catalog, DEFAULT_FEATURED_IDS};
pub use error::CatalogError;
pub use featured::{FeaturedSet, FeaturedSource};
pub use product::{Product, ProductId, RemoteProduct};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
