//! Catalog errors

use crate::product::ProductId;

/// Errors raised while loading or validating a static catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Text is not a JSON array of products
    #[error("invalid catalog json: {0}")]
    InvalidJson(String),

    /// Catalog has no products
    #[error("catalog is empty")]
    Empty,

    /// Two products share an id
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),

    /// Product has a blank name
    #[error("product {id} has an empty name")]
    EmptyName {
        /// Offending product
        id: ProductId,
    },
}
