//! Build-time embedded static catalog
//!
//! The static catalog ships inside the binary and is the fallback whenever
//! the remote endpoint cannot be used.

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::featured::FeaturedSet;
use std::sync::OnceLock;

const EMBEDDED_JSON: &str = include_str!("../data/products.json");

/// Ids shown as featured when the remote side flags nothing
pub const DEFAULT_FEATURED_IDS: &[&str] = &["1", "3", "5"];

static EMBEDDED: OnceLock<Result<Catalog, CatalogError>> = OnceLock::new();

/// The embedded static catalog, parsed on first use
///
/// # Errors
/// Returns the parse/validation error if the embedded data is broken.
pub fn embedded_catalog() -> Result<&'static Catalog, CatalogError> {
    EMBEDDED
        .get_or_init(|| Catalog::from_json(EMBEDDED_JSON))
        .as_ref()
        .map_err(Clone::clone)
}

/// The default featured set
#[must_use]
pub fn default_featured() -> FeaturedSet {
    FeaturedSet::from_ids(DEFAULT_FEATURED_IDS.iter().copied())
}
