//! Merge-by-name reconciliation
//!
//! The remote snapshot decides which static products are still sellable and
//! contributes products the static catalog has never seen. It never changes
//! the fields of a static product.

use crate::payload::{PayloadKind, RemotePayload};
use serde::Serialize;
use shopfront_catalog::{Catalog, FeaturedSet, FeaturedSource, Product, RemoteProduct};
use std::collections::HashSet;

/// Result of reconciling: the working catalog and its featured set
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Working catalog: retained static products, then new remote products
    pub catalog: Catalog,
    /// Featured ids
    pub featured: FeaturedSet,
    /// What happened
    pub report: MergeReport,
}

impl Reconciliation {
    /// Featured products, in catalog order
    #[inline]
    #[must_use]
    pub fn featured_products(&self) -> Vec<&Product> {
        self.catalog.featured(&self.featured)
    }
}

/// Counters describing one reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Shape of the remote payload
    pub payload: PayloadKind,
    /// Static products kept
    pub retained: usize,
    /// Static products dropped as sold out
    pub dropped: usize,
    /// Remote-only products added
    pub added: usize,
    /// Which source the featured set came from
    pub featured_source: FeaturedSource,
}

impl MergeReport {
    /// Report for an unusable payload: baseline untouched
    #[must_use]
    pub fn unchanged(payload: PayloadKind, baseline_len: usize) -> Self {
        Self {
            payload,
            retained: baseline_len,
            dropped: 0,
            added: 0,
            featured_source: FeaturedSource::Default,
        }
    }

    /// Whether the remote payload was merged
    #[inline]
    #[must_use]
    pub fn merged(&self) -> bool {
        self.payload == PayloadKind::Records
    }
}

/// Outcome of [`Reconciler::merge`]
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// Remote data was usable; replace catalog and featured set
    Merged(Reconciliation),
    /// Remote data was unusable; leave state as it is
    Unchanged(PayloadKind),
}

impl MergeOutcome {
    /// The reconciliation, if one was produced
    #[inline]
    #[must_use]
    pub fn into_reconciliation(self) -> Option<Reconciliation> {
        match self {
            Self::Merged(reconciliation) => Some(reconciliation),
            Self::Unchanged(_) => None,
        }
    }
}

/// Holds the static baseline and default featured ids
///
/// Cheap to share behind an `Arc`; `merge` never mutates it.
#[derive(Debug, Clone)]
pub struct Reconciler {
    baseline: Catalog,
    default_featured: FeaturedSet,
}

impl Reconciler {
    /// Create reconciler for a baseline
    ///
    /// Duplicate names in the baseline make the merge ambiguous; they are
    /// logged, not rejected.
    #[must_use]
    pub fn new(baseline: Catalog, default_featured: FeaturedSet) -> Self {
        let duplicates = baseline.duplicate_names();
        if !duplicates.is_empty() {
            tracing::warn!(?duplicates, "static catalog has duplicate product names");
        }

        Self {
            baseline,
            default_featured,
        }
    }

    /// Static baseline
    #[inline]
    #[must_use]
    pub fn baseline(&self) -> &Catalog {
        &self.baseline
    }

    /// Default featured ids
    #[inline]
    #[must_use]
    pub fn default_featured(&self) -> &FeaturedSet {
        &self.default_featured
    }

    /// Baseline catalog with default featured set, reported against the
    /// payload that could not be used
    #[must_use]
    pub fn fallback(&self, payload: PayloadKind) -> Reconciliation {
        Reconciliation {
            catalog: self.baseline.clone(),
            featured: self.default_featured.clone(),
            report: MergeReport::unchanged(payload, self.baseline.len()),
        }
    }

    /// Merge a remote payload, or report that there is nothing to merge
    #[must_use]
    pub fn merge(&self, payload: &RemotePayload) -> MergeOutcome {
        match payload.records() {
            Some(records) => {
                let reconciliation =
                    merge_by_name(&self.baseline, &self.default_featured, records);
                tracing::debug!(
                    retained = reconciliation.report.retained,
                    dropped = reconciliation.report.dropped,
                    added = reconciliation.report.added,
                    featured_source = ?reconciliation.report.featured_source,
                    "merged remote catalog"
                );
                MergeOutcome::Merged(reconciliation)
            }
            None => {
                tracing::debug!(payload = ?payload.kind(), "remote payload unusable, keeping catalog");
                MergeOutcome::Unchanged(payload.kind())
            }
        }
    }

    /// Merge a payload, falling back to the baseline when it is unusable
    #[must_use]
    pub fn resolve(&self, payload: &RemotePayload) -> Reconciliation {
        match self.merge(payload) {
            MergeOutcome::Merged(reconciliation) => reconciliation,
            MergeOutcome::Unchanged(kind) => self.fallback(kind),
        }
    }
}

/// Merge a non-empty remote snapshot into a static catalog
///
/// The working catalog is the static products whose name the remote lists,
/// in static order, followed by remote products whose name the static
/// catalog lacks, in remote order. The featured set is every catalog id whose
/// name the remote flags `featured`, or `default_featured` when that comes
/// out empty.
///
/// Callers pass only usable records; an empty slice yields an empty catalog.
#[must_use]
pub fn merge_by_name(
    static_catalog: &Catalog,
    default_featured: &FeaturedSet,
    remote: &[RemoteProduct],
) -> Reconciliation {
    let remote_names: HashSet<&str> = remote.iter().map(RemoteProduct::name).collect();
    let static_names = static_catalog.names();

    let duplicates = duplicate_remote_names(remote);
    if !duplicates.is_empty() {
        tracing::warn!(?duplicates, "remote catalog has duplicate product names");
    }

    let retained: Vec<Product> = static_catalog
        .iter()
        .filter(|p| remote_names.contains(p.name.as_str()))
        .cloned()
        .collect();

    let added: Vec<Product> = remote
        .iter()
        .filter(|r| !static_names.contains(r.name()))
        .map(|r| r.product.clone())
        .collect();

    let report_retained = retained.len();
    let report_added = added.len();
    let catalog: Catalog = retained.into_iter().chain(added).collect();

    let featured_names: HashSet<&str> = remote
        .iter()
        .filter(|r| r.featured)
        .map(RemoteProduct::name)
        .collect();

    let from_remote: FeaturedSet = catalog
        .iter()
        .filter(|p| featured_names.contains(p.name.as_str()))
        .map(|p| p.id.clone())
        .collect();

    let (featured, featured_source) = if from_remote.is_empty() {
        (default_featured.clone(), FeaturedSource::Default)
    } else {
        (from_remote, FeaturedSource::Remote)
    };

    Reconciliation {
        catalog,
        featured,
        report: MergeReport {
            payload: PayloadKind::Records,
            retained: report_retained,
            dropped: static_catalog.len() - report_retained,
            added: report_added,
            featured_source,
        },
    }
}

fn duplicate_remote_names(remote: &[RemoteProduct]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(remote.len());
    let mut duplicates = Vec::new();
    for name in remote.iter().map(RemoteProduct::name) {
        if !seen.insert(name) && !duplicates.contains(&name) {
            duplicates.push(name);
        }
    }
    duplicates
}
