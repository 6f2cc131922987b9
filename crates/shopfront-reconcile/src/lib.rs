//! Shopfront Reconcile
//!
//! Combines the trusted static catalog with an untrusted remote snapshot.
//!
//! # Core Concepts
//!
//! - [`RemotePayload`]: Remote body classified as records, empty, non-array or malformed
//! - [`merge_by_name`]: The pure merge over a non-empty record list
//! - [`Reconciler`]: Baseline + default featured ids, producing [`MergeOutcome`]s
//! - [`MergeReport`]: Counters for logging and the CLI
//!
//! # Example
//!
//! ```rust
//! use shopfront_catalog::{Catalog, FeaturedSet, Product};
//! use shopfront_reconcile::{MergeOutcome, Reconciler, RemotePayload};
//!
//! let baseline = Catalog::new(vec![Product::new("a", "A"), Product::new("b", "B")]);
//! let reconciler = Reconciler::new(baseline, FeaturedSet::from_ids(["a"]));
//!
//! let payload = RemotePayload::from_slice(br#"[{"id": "b", "name": "B", "featured": true}]"#);
//! let MergeOutcome::Merged(result) = reconciler.merge(&payload) else {
//!     panic!("payload should merge");
//! };
//! assert_eq!(result.catalog.len(), 1);
//! assert!(result.featured.contains("b"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod merge;
mod payload;

pub use merge::{merge_by_name, MergeOutcome, MergeReport, Reconciler, Reconciliation};
pub use payload::{PayloadKind, RemotePayload};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
