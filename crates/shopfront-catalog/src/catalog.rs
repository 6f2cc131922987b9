//! Ordered product catalog
//!
//! The catalog is a plain ordered sequence. Lookups are linear scans; the
//! storefront never holds more than a few dozen products.

use crate::error::CatalogError;
use crate::featured::FeaturedSet;
use crate::product::{Product, ProductId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Ordered sequence of products
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create catalog from products, keeping their order
    #[inline]
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parse a JSON array of products and validate it
    ///
    /// # Errors
    /// - `CatalogError::InvalidJson` if the text is not an array of products
    /// - any error from [`Catalog::validate`]
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> =
            serde_json::from_str(json).map_err(|e| CatalogError::InvalidJson(e.to_string()))?;
        let catalog = Self::new(products);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the invariants a static baseline must hold
    ///
    /// # Errors
    /// - `CatalogError::Empty` if there are no products
    /// - `CatalogError::EmptyName` if a product has a blank name
    /// - `CatalogError::DuplicateId` if two products share an id
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.products.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(self.products.len());
        for product in &self.products {
            if product.name.trim().is_empty() {
                return Err(CatalogError::EmptyName {
                    id: product.id.clone(),
                });
            }
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }

        Ok(())
    }

    /// Products in catalog order
    #[inline]
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Consume into the product list
    #[inline]
    #[must_use]
    pub fn into_products(self) -> Vec<Product> {
        self.products
    }

    /// Iterate products in order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    /// Number of products
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id.as_str() == id)
    }

    /// Look up a product by name (first match)
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Set of product names
    #[must_use]
    pub fn names(&self) -> HashSet<&str> {
        self.products.iter().map(|p| p.name.as_str()).collect()
    }

    /// Product ids in catalog order
    #[must_use]
    pub fn ids(&self) -> Vec<&ProductId> {
        self.products.iter().map(|p| &p.id).collect()
    }

    /// Distinct non-empty categories in first-appearance order
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| !c.is_empty())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Products of one category, in catalog order
    #[must_use]
    pub fn in_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Products whose id is in `featured`, in catalog order
    #[must_use]
    pub fn featured(&self, featured: &FeaturedSet) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| featured.contains(p.id.as_str()))
            .collect()
    }

    /// Names that appear on more than one product
    ///
    /// Name is the join key for reconciliation, so any entry here makes the
    /// merge ambiguous.
    #[must_use]
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for product in &self.products {
            *counts.entry(product.name.as_str()).or_default() += 1;
        }

        self.products
            .iter()
            .map(|p| p.name.as_str())
            .filter(|name| counts.get(name).copied().unwrap_or_default() > 1)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

impl IntoIterator for Catalog {
    type Item = Product;
    type IntoIter = std::vec::IntoIter<Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.into_iter()
    }
}
