//! Catalog view exposed to the presentation layer

use crate::error::FetchSignal;
use shopfront_catalog::{Catalog, FeaturedSet, Product};
use shopfront_reconcile::MergeReport;
use std::sync::Arc;

/// Snapshot of the store's state
///
/// Catalog and featured set are always replaced together; a view never mixes
/// a merged catalog with a stale featured set.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView {
    /// Working catalog
    pub products: Arc<Catalog>,
    /// Featured ids
    pub featured: Arc<FeaturedSet>,
    /// True while the activation's fetch is outstanding
    pub loading: bool,
    /// Set when the last fetch could not be used
    pub error: Option<FetchSignal>,
    /// Report of the last applied merge, if any
    pub last_merge: Option<MergeReport>,
}

impl CatalogView {
    /// Initial view: baseline, default featured, idle
    ///
    /// A store is mounted by [`crate::CatalogStore::activate`]; until then
    /// no fetch exists, so `loading` is false. `activate` publishes
    /// `loading = true` before its request starts.
    #[must_use]
    pub fn initial(products: Catalog, featured: FeaturedSet) -> Self {
        Self {
            products: Arc::new(products),
            featured: Arc::new(featured),
            loading: false,
            error: None,
            last_merge: None,
        }
    }

    /// Featured products in catalog order
    #[inline]
    #[must_use]
    pub fn featured_products(&self) -> Vec<&Product> {
        self.products.featured(&self.featured)
    }

    /// Look up a product; `None` when absent
    #[inline]
    #[must_use]
    pub fn get_product_by_id(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    /// Products for the grid under a category filter
    #[must_use]
    pub fn filter(&self, filter: &CategoryFilter) -> Vec<&Product> {
        match filter {
            CategoryFilter::All => self.products.iter().collect(),
            CategoryFilter::Only(category) => self.products.in_category(category),
        }
    }

    /// Categories available for filtering
    #[inline]
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.products.categories()
    }
}

/// Grid filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every product
    #[default]
    All,
    /// Products of one category
    Only(String),
}

impl CategoryFilter {
    /// `None` means all
    #[must_use]
    pub fn from_option(category: Option<String>) -> Self {
        category.map_or(Self::All, Self::Only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> CatalogView {
        CatalogView::initial(
            Catalog::new(vec![
                Product::new("1", "Mug").with_category("Ceramics"),
                Product::new("2", "Basket").with_category("Home"),
                Product::new("3", "Bowl").with_category("Ceramics"),
            ]),
            FeaturedSet::from_ids(["3"]),
        )
    }

    #[test]
    fn filter_all_and_one() {
        let view = view();
        assert_eq!(view.filter(&CategoryFilter::All).len(), 3);

        let ceramics = view.filter(&CategoryFilter::Only("Ceramics".into()));
        let ids: Vec<_> = ceramics.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        assert!(view.filter(&CategoryFilter::Only("Jewellery".into())).is_empty());
    }

    #[test]
    fn lookup_miss_is_none() {
        let view = view();
        assert!(view.get_product_by_id("2").is_some());
        assert!(view.get_product_by_id("42").is_none());
    }

    #[test]
    fn featured_products_resolved() {
        let view = view();
        let featured = view.featured_products();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].name, "Bowl");
    }

    #[test]
    fn filter_from_option() {
        assert_eq!(CategoryFilter::from_option(None), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_option(Some("Home".into())),
            CategoryFilter::Only("Home".into())
        );
    }
}
