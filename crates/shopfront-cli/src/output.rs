//! Terminal and JSON rendering

use serde::Serialize;
use shopfront_catalog::Product;
use shopfront_core::FetchSignal;
use shopfront_reconcile::MergeReport;
use std::fmt::Write as _;

/// JSON document printed by `show --json` and `merge --json`
#[derive(Debug, Serialize)]
pub(crate) struct CatalogDocument<'a> {
    pub(crate) products: Vec<&'a Product>,
    pub(crate) featured: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<FetchSignal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) report: Option<MergeReport>,
}

/// Fixed-width product table
pub(crate) fn product_table(products: &[&Product]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {:<32} {:>9}  {}", "ID", "NAME", "PRICE", "CATEGORY");
    for product in products {
        let _ = writeln!(
            out,
            "{:<10} {:<32} {:>9}  {}",
            truncate(product.id.as_str(), 10),
            truncate(&product.name, 32),
            product.display_price(),
            product.category
        );
    }
    out
}

/// Multi-line detail block for one product
pub(crate) fn product_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", product.name, product.id);
    let _ = writeln!(out, "  price:      {}", product.display_price());
    if !product.category.is_empty() {
        let _ = writeln!(out, "  category:   {}", product.category);
    }
    if !product.dimensions.is_empty() {
        let _ = writeln!(out, "  dimensions: {}", product.dimensions);
    }
    if !product.weight.is_empty() {
        let _ = writeln!(out, "  weight:     {}", product.weight);
    }
    for image in &product.images {
        let _ = writeln!(out, "  image:      {image}");
    }
    if !product.description.is_empty() {
        let _ = writeln!(out, "\n  {}", product.description);
    }
    out
}

/// One-line merge summary
pub(crate) fn report_line(report: &MergeReport) -> String {
    format!(
        "payload={:?} retained={} dropped={} added={} featured={:?}",
        report.payload, report.retained, report.dropped, report.added, report.featured_source
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}
