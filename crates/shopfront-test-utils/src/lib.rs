//! Testing utilities for the shopfront workspace
//!
//! Shared fixtures and scripted catalog sources.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use shopfront_catalog::{Catalog, FeaturedSet, Product, RemoteProduct};
use shopfront_core::{CatalogSource, CatalogStore, FetchError};
use shopfront_reconcile::RemotePayload;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Static catalog `[A, B, C]` with ids `a`, `b`, `c`
pub fn abc_catalog() -> Catalog {
    Catalog::new(vec![
        Product::new("a", "A")
            .with_price(10.0)
            .with_category("Ceramics")
            .with_images(["/images/products/a.jpg"]),
        Product::new("b", "B")
            .with_price(20.0)
            .with_category("Home")
            .with_images(["/images/products/b.jpg"]),
        Product::new("c", "C")
            .with_price(30.0)
            .with_category("Ceramics")
            .with_images(["/images/products/c.jpg"]),
    ])
}

/// Default featured ids for [`abc_catalog`]
pub fn abc_defaults() -> FeaturedSet {
    FeaturedSet::from_ids(["a", "c"])
}

pub fn setup_abc_store() -> CatalogStore {
    CatalogStore::with_baseline(abc_catalog(), abc_defaults())
}

/// Remote record with remote-hosted image
pub fn remote(id: &str, name: &str) -> RemoteProduct {
    RemoteProduct::new(
        Product::new(id, name)
            .with_price(99.0)
            .with_category("Remote")
            .with_images([format!("https://cdn.example.com/{id}.jpg")]),
    )
}

/// Remote snapshot `[B, D(featured)]`
pub fn b_and_featured_d() -> RemotePayload {
    RemotePayload::from_records(vec![remote("rb", "B"), remote("d", "D").featured()])
}

/// Source that returns a fixed result, optionally after a gate opens
#[derive(Debug)]
pub struct ScriptedSource {
    response: Mutex<Result<RemotePayload, FetchError>>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    /// Respond immediately
    pub fn ready(response: Result<RemotePayload, FetchError>) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(response),
            gate: None,
            calls: AtomicUsize::new(0),
        })
    }

    /// Respond once the returned gate is opened
    pub fn gated(response: Result<RemotePayload, FetchError>) -> (Arc<Self>, Gate) {
        let notify = Arc::new(Notify::new());
        let source = Arc::new(Self {
            response: Mutex::new(response),
            gate: Some(Arc::clone(&notify)),
            calls: AtomicUsize::new(0),
        });
        (source, Gate(notify))
    }

    /// Replace the scripted response
    pub fn set_response(&self, response: Result<RemotePayload, FetchError>) {
        *self.response.lock() = response;
    }

    /// Number of fetches started
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    async fn fetch(&self) -> Result<RemotePayload, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.response.lock().clone()
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

/// Releases one pending [`ScriptedSource`] fetch per `open`
#[derive(Debug, Clone)]
pub struct Gate(Arc<Notify>);

impl Gate {
    pub fn open(&self) {
        self.0.notify_one();
    }
}

/// Source whose fetch never completes
#[derive(Debug, Default)]
pub struct PendingSource;

#[async_trait]
impl CatalogSource for PendingSource {
    async fn fetch(&self) -> Result<RemotePayload, FetchError> {
        std::future::pending().await
    }

    fn describe(&self) -> String {
        "pending".to_string()
    }
}
