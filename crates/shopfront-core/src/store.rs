//! Catalog store and activation lifecycle
//!
//! A [`CatalogStore`] owns one catalog/featured-set pair. Each call to
//! [`CatalogStore::activate`] issues exactly one fetch on a spawned task and
//! returns an [`Activation`] handle carrying that fetch's own cancel token.
//!
//! # Cancellation
//!
//! Applying a result and cancelling a token both take the store's `current`
//! lock, and the apply path re-checks the token under it. Once
//! [`Activation::cancel`] returns (or the handle is dropped), that
//! activation can no longer change the published view.

use crate::error::{FetchError, FetchSignal, ShopfrontError};
use crate::source::CatalogSource;
use crate::view::CatalogView;
use parking_lot::Mutex;
use shopfront_catalog::{default_featured, embedded_catalog, Catalog, FeaturedSet, Product};
use shopfront_reconcile::{MergeOutcome, MergeReport, PayloadKind, Reconciler, RemotePayload};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Activation identifier, unique per store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActivationId(pub u64);

impl fmt::Display for ActivationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "activation-{}", self.0)
    }
}

/// How an activation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// Remote snapshot merged and published
    Merged(MergeReport),
    /// Remote payload unusable; catalog kept, loading cleared
    Unchanged(PayloadKind),
    /// Fetch failed; catalog kept, error signal published
    Failed(FetchSignal),
    /// Cancelled before its result was applied; nothing published
    Cancelled,
}

/// Per-activation cancel token
#[derive(Debug)]
struct CancelToken {
    id: ActivationId,
    flag: watch::Sender<bool>,
}

impl CancelToken {
    fn new(id: ActivationId) -> Self {
        let (flag, _) = watch::channel(false);
        Self { id, flag }
    }

    fn cancel(&self) {
        self.flag.send_replace(true);
    }

    fn is_cancelled(&self) -> bool {
        *self.flag.borrow()
    }

    async fn cancelled(&self) {
        let mut rx = self.flag.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

#[derive(Debug)]
struct StoreInner {
    reconciler: Reconciler,
    view: watch::Sender<CatalogView>,
    current: Mutex<Option<Arc<CancelToken>>>,
    next_id: AtomicU64,
}

impl StoreInner {
    /// Publish a fetch result unless `token` has been cancelled
    fn complete(
        &self,
        token: &CancelToken,
        result: Result<RemotePayload, FetchError>,
    ) -> ActivationOutcome {
        // Merge outside the lock; it is pure.
        let merged = result.map(|payload| self.reconciler.merge(&payload));

        let mut current = self.current.lock();
        if token.is_cancelled() {
            return ActivationOutcome::Cancelled;
        }
        if current.as_ref().is_some_and(|t| t.id == token.id) {
            *current = None;
        }

        match merged {
            Ok(MergeOutcome::Merged(reconciliation)) => {
                let report = reconciliation.report;
                self.view.send_modify(|view| {
                    view.products = Arc::new(reconciliation.catalog);
                    view.featured = Arc::new(reconciliation.featured);
                    view.loading = false;
                    view.error = None;
                    view.last_merge = Some(report);
                });
                tracing::info!(
                    activation = %token.id,
                    retained = report.retained,
                    added = report.added,
                    "remote catalog applied"
                );
                ActivationOutcome::Merged(report)
            }
            Ok(MergeOutcome::Unchanged(kind)) => {
                self.view.send_modify(|view| {
                    view.loading = false;
                    view.error = None;
                });
                tracing::info!(activation = %token.id, payload = ?kind, "remote catalog had no usable data");
                ActivationOutcome::Unchanged(kind)
            }
            Err(error) => {
                let signal = error.signal();
                self.view.send_modify(|view| {
                    view.loading = false;
                    view.error = Some(signal);
                });
                tracing::warn!(activation = %token.id, %error, "remote catalog unavailable, serving current catalog");
                ActivationOutcome::Failed(signal)
            }
        }
    }

    /// Mark `token` cancelled and forget it if it is current
    fn cancel(&self, token: &CancelToken) {
        let mut current = self.current.lock();
        if !token.is_cancelled() {
            token.cancel();
            tracing::debug!(activation = %token.id, "activation cancelled");
        }
        if current.as_ref().is_some_and(|t| t.id == token.id) {
            *current = None;
        }
    }
}

/// Owner of the working catalog and featured set
///
/// Cloning yields another handle to the same store.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    inner: Arc<StoreInner>,
}

impl CatalogStore {
    /// Create a store seeded with the reconciler's baseline and default featured set
    ///
    /// The store is idle until [`CatalogStore::activate`] mounts it.
    #[must_use]
    pub fn new(reconciler: Reconciler) -> Self {
        let initial = CatalogView::initial(
            reconciler.baseline().clone(),
            reconciler.default_featured().clone(),
        );
        let (view, _) = watch::channel(initial);

        Self {
            inner: Arc::new(StoreInner {
                reconciler,
                view,
                current: Mutex::new(None),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Create a store over a static catalog and default featured ids
    #[must_use]
    pub fn with_baseline(baseline: Catalog, default_featured: FeaturedSet) -> Self {
        Self::new(Reconciler::new(baseline, default_featured))
    }

    /// Store over the embedded static catalog and default featured ids
    ///
    /// # Errors
    /// Returns `ShopfrontError::Catalog` if the embedded catalog is invalid.
    pub fn embedded() -> Result<Self, ShopfrontError> {
        let baseline = embedded_catalog()?.clone();
        Ok(Self::with_baseline(baseline, default_featured()))
    }

    /// Start one fetch-and-reconcile cycle
    ///
    /// Any activation still in flight on this store is cancelled first. The
    /// view switches to `loading` with no error; the displayed catalog stays
    /// until the new result resolves.
    ///
    /// Must be called within a Tokio runtime.
    pub fn activate(&self, source: Arc<dyn CatalogSource>) -> Activation {
        let id = ActivationId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let token = Arc::new(CancelToken::new(id));

        {
            let mut current = self.inner.current.lock();
            if let Some(previous) = current.replace(Arc::clone(&token)) {
                previous.cancel();
                tracing::debug!(activation = %previous.id, superseded_by = %id, "activation superseded");
            }
            self.inner.view.send_modify(|view| {
                view.loading = true;
                view.error = None;
            });
        }

        tracing::info!(activation = %id, source = %source.describe(), "activating catalog");

        let task = tokio::spawn(run_activation(
            Arc::clone(&self.inner),
            Arc::clone(&token),
            source,
        ));

        Activation {
            token,
            inner: Arc::clone(&self.inner),
            task: Some(task),
        }
    }

    /// Re-run the fetch on an existing store
    ///
    /// Same as [`CatalogStore::activate`]; merging is always against the
    /// static baseline, so identical snapshots yield identical views.
    pub fn refresh(&self, source: Arc<dyn CatalogSource>) -> Activation {
        tracing::info!("refreshing catalog");
        self.activate(source)
    }

    /// Current view
    #[must_use]
    pub fn snapshot(&self) -> CatalogView {
        self.inner.view.borrow().clone()
    }

    /// Receiver notified on every published view
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CatalogView> {
        self.inner.view.subscribe()
    }

    /// Look up a product in the current catalog; `None` when absent
    #[must_use]
    pub fn get_product_by_id(&self, id: &str) -> Option<Product> {
        self.inner.view.borrow().get_product_by_id(id).cloned()
    }

    /// Whether an activation is in flight
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.current.lock().is_some()
    }

    /// Static baseline
    #[inline]
    #[must_use]
    pub fn baseline(&self) -> &Catalog {
        self.inner.reconciler.baseline()
    }
}

async fn run_activation(
    inner: Arc<StoreInner>,
    token: Arc<CancelToken>,
    source: Arc<dyn CatalogSource>,
) -> ActivationOutcome {
    let result = tokio::select! {
        biased;
        () = token.cancelled() => return ActivationOutcome::Cancelled,
        result = source.fetch() => result,
    };
    inner.complete(&token, result)
}

/// Handle to one in-flight fetch
///
/// Dropping the handle cancels the activation. Use
/// [`Activation::finished`] to wait for it instead.
#[derive(Debug)]
pub struct Activation {
    token: Arc<CancelToken>,
    inner: Arc<StoreInner>,
    task: Option<JoinHandle<ActivationOutcome>>,
}

impl Activation {
    /// Activation id
    #[inline]
    #[must_use]
    pub fn id(&self) -> ActivationId {
        self.token.id
    }

    /// Cancel; no state change from this activation is visible afterwards
    pub fn cancel(&self) {
        self.inner.cancel(&self.token);
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Whether this activation was cancelled
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the activation to resolve
    ///
    /// Dropping the returned future before it resolves cancels the
    /// activation, same as dropping the handle.
    pub async fn finished(mut self) -> ActivationOutcome {
        let Some(task) = self.task.as_mut() else {
            return ActivationOutcome::Cancelled;
        };
        let joined = task.await;
        self.task = None;
        match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                if e.is_panic() {
                    tracing::error!(activation = %self.token.id, "activation task panicked");
                }
                ActivationOutcome::Cancelled
            }
        }
    }
}

impl Drop for Activation {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            self.inner.cancel(&self.token);
            task.abort();
        }
    }
}
