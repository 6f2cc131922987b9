use pretty_assertions::assert_eq;
use shopfront_catalog::{FeaturedSet, FeaturedSource};
use shopfront_core::{ActivationOutcome, CatalogStore, FetchError, FetchSignal};
use shopfront_reconcile::{PayloadKind, RemotePayload};
use shopfront_test_utils::{
    abc_catalog, abc_defaults, b_and_featured_d, remote, setup_abc_store, PendingSource,
    ScriptedSource,
};
use std::sync::Arc;
use std::time::Duration;

fn names(store: &CatalogStore) -> Vec<String> {
    store
        .snapshot()
        .products
        .iter()
        .map(|p| p.name.clone())
        .collect()
}

#[tokio::test]
async fn new_store_serves_static_catalog() {
    let store = setup_abc_store();
    let view = store.snapshot();

    assert_eq!(*view.products, abc_catalog());
    assert_eq!(*view.featured, abc_defaults());
    assert!(!view.loading);
    assert_eq!(view.error, None);
}

#[tokio::test]
async fn store_is_idle_until_activated_then_loading_until_resolved() {
    let store = setup_abc_store();
    let (source, gate) = ScriptedSource::gated(Ok(b_and_featured_d()));
    assert!(!store.snapshot().loading);

    let activation = store.activate(source.clone());
    assert!(store.snapshot().loading);
    assert!(store.is_active());

    gate.open();
    let outcome = activation.finished().await;

    assert!(matches!(outcome, ActivationOutcome::Merged(_)));
    assert!(!store.snapshot().loading);
    assert!(!store.is_active());
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn merged_snapshot_is_b_then_d_with_d_featured() {
    let store = setup_abc_store();
    let source = ScriptedSource::ready(Ok(b_and_featured_d()));

    let outcome = store.activate(source).finished().await;

    let ActivationOutcome::Merged(report) = outcome else {
        panic!("expected merge, got {outcome:?}");
    };
    assert_eq!(report.featured_source, FeaturedSource::Remote);

    assert_eq!(names(&store), vec!["B", "D"]);
    let view = store.snapshot();
    assert_eq!(*view.featured, FeaturedSet::from_ids(["d"]));
    assert_eq!(view.get_product_by_id("b"), abc_catalog().get("b"));
    assert_eq!(
        view.get_product_by_id("d").and_then(|p| p.thumbnail()),
        Some("https://cdn.example.com/d.jpg")
    );
    assert_eq!(view.last_merge, Some(report));
}

#[tokio::test]
async fn network_error_keeps_static_catalog_and_flags_offline() {
    let store = setup_abc_store();
    let source = ScriptedSource::ready(Err(FetchError::transport("connection refused")));

    let outcome = store.activate(source).finished().await;
    assert_eq!(outcome, ActivationOutcome::Failed(FetchSignal::Offline));

    let view = store.snapshot();
    assert_eq!(*view.products, abc_catalog());
    assert_eq!(*view.featured, abc_defaults());
    assert_eq!(view.error, Some(FetchSignal::Offline));
    assert!(!view.loading);
}

#[tokio::test]
async fn non_success_status_flags_status() {
    let store = setup_abc_store();
    let source = ScriptedSource::ready(Err(FetchError::Status(503)));

    store.activate(source).finished().await;

    let view = store.snapshot();
    assert_eq!(*view.products, abc_catalog());
    assert_eq!(view.error, Some(FetchSignal::HttpStatus(503)));
}

#[tokio::test]
async fn empty_and_non_array_payloads_keep_catalog_without_error() {
    for payload in [RemotePayload::Empty, RemotePayload::NotArray] {
        let store = setup_abc_store();
        let kind = payload.kind();
        let source = ScriptedSource::ready(Ok(payload));

        let outcome = store.activate(source).finished().await;
        assert_eq!(outcome, ActivationOutcome::Unchanged(kind));

        let view = store.snapshot();
        assert_eq!(*view.products, abc_catalog());
        assert_eq!(*view.featured, abc_defaults());
        assert_eq!(view.error, None);
        assert!(!view.loading);
    }
}

#[tokio::test]
async fn remote_without_flags_keeps_default_featured() {
    let store = setup_abc_store();
    let payload = RemotePayload::from_records(vec![remote("ra", "A"), remote("rc", "C")]);

    store.activate(ScriptedSource::ready(Ok(payload))).finished().await;

    assert_eq!(names(&store), vec!["A", "C"]);
    assert_eq!(*store.snapshot().featured, abc_defaults());
}

#[tokio::test]
async fn cancel_before_response_discards_result() {
    let store = setup_abc_store();
    let (source, gate) = ScriptedSource::gated(Ok(b_and_featured_d()));

    let activation = store.activate(source);
    activation.cancel();
    gate.open();

    assert!(activation.is_cancelled());
    assert_eq!(activation.finished().await, ActivationOutcome::Cancelled);

    let view = store.snapshot();
    assert_eq!(*view.products, abc_catalog());
    assert_eq!(*view.featured, abc_defaults());
    assert_eq!(view.error, None);
}

#[tokio::test]
async fn dropping_activation_cancels_it() {
    let store = setup_abc_store();
    let (source, gate) = ScriptedSource::gated(Ok(b_and_featured_d()));

    drop(store.activate(source.clone()));
    assert!(!store.is_active());

    gate.open();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(*store.snapshot().products, abc_catalog());
}

#[tokio::test]
async fn abandoning_finished_cancels_activation() {
    let store = setup_abc_store();
    let (source, gate) = ScriptedSource::gated(Ok(b_and_featured_d()));

    let waited =
        tokio::time::timeout(Duration::from_millis(10), store.activate(source).finished()).await;
    assert!(waited.is_err());
    assert!(!store.is_active());

    gate.open();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(names(&store), vec!["A", "B", "C"]);
    assert_eq!(*store.snapshot().featured, abc_defaults());
}

#[tokio::test]
async fn pending_fetch_is_cancellable() {
    let store = setup_abc_store();
    let activation = store.activate(Arc::new(PendingSource));

    activation.cancel();
    assert_eq!(activation.finished().await, ActivationOutcome::Cancelled);
    assert_eq!(*store.snapshot().products, abc_catalog());
}

#[tokio::test]
async fn new_activation_supersedes_stale_one() {
    let store = setup_abc_store();
    let (stale_source, stale_gate) = ScriptedSource::gated(Ok(b_and_featured_d()));
    let stale = store.activate(stale_source);

    let fresh_payload = RemotePayload::from_records(vec![remote("ra", "A")]);
    let fresh = store.refresh(ScriptedSource::ready(Ok(fresh_payload)));
    assert_ne!(stale.id(), fresh.id());
    assert!(stale.is_cancelled());

    assert!(matches!(fresh.finished().await, ActivationOutcome::Merged(_)));
    stale_gate.open();
    assert_eq!(stale.finished().await, ActivationOutcome::Cancelled);

    assert_eq!(names(&store), vec!["A"]);
}

#[tokio::test]
async fn refresh_after_merge_failure_keeps_last_good_catalog() {
    let store = setup_abc_store();
    let source = ScriptedSource::ready(Ok(b_and_featured_d()));
    store.activate(source.clone()).finished().await;

    source.set_response(Err(FetchError::transport("timed out")));
    let outcome = store.refresh(source.clone()).finished().await;

    assert_eq!(outcome, ActivationOutcome::Failed(FetchSignal::Offline));
    assert_eq!(names(&store), vec!["B", "D"]);
    assert_eq!(store.snapshot().error, Some(FetchSignal::Offline));
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn refresh_with_identical_payload_is_stable() {
    let store = setup_abc_store();
    let source = ScriptedSource::ready(Ok(b_and_featured_d()));

    store.activate(source.clone()).finished().await;
    let first = store.snapshot();
    store.refresh(source).finished().await;
    let second = store.snapshot();

    assert_eq!(first.products, second.products);
    assert_eq!(first.featured, second.featured);
}

#[tokio::test]
async fn refresh_clears_previous_error() {
    let store = setup_abc_store();
    let source = ScriptedSource::ready(Err(FetchError::Status(500)));
    store.activate(source.clone()).finished().await;
    assert!(store.snapshot().error.is_some());

    source.set_response(Ok(b_and_featured_d()));
    store.refresh(source).finished().await;
    assert_eq!(store.snapshot().error, None);
}

#[tokio::test]
async fn subscribers_see_catalog_and_featured_change_together() {
    let store = setup_abc_store();
    let mut rx = store.subscribe();
    let (source, gate) = ScriptedSource::gated(Ok(b_and_featured_d()));

    let activation = store.activate(source);
    rx.changed().await.unwrap();
    {
        let view = rx.borrow_and_update();
        assert!(view.loading);
        assert_eq!(*view.products, abc_catalog());
        assert_eq!(*view.featured, abc_defaults());
    }

    gate.open();
    rx.changed().await.unwrap();
    {
        let view = rx.borrow_and_update();
        assert!(!view.loading);
        assert_eq!(view.products.len(), 2);
        assert_eq!(*view.featured, FeaturedSet::from_ids(["d"]));
    }

    activation.finished().await;
}

#[tokio::test]
async fn get_product_by_id_misses_are_none() {
    let store = setup_abc_store();
    assert!(store.get_product_by_id("a").is_some());
    assert!(store.get_product_by_id("nope").is_none());

    store
        .activate(ScriptedSource::ready(Ok(b_and_featured_d())))
        .finished()
        .await;
    assert!(store.get_product_by_id("a").is_none());
    assert_eq!(
        store.get_product_by_id("d").map(|p| p.name),
        Some("D".to_string())
    );
}

#[tokio::test]
async fn malformed_payload_keeps_catalog() {
    let store = setup_abc_store();
    let payload = RemotePayload::from_slice(b"{\"unexpected\": true");
    assert_eq!(payload.kind(), PayloadKind::Malformed);

    let outcome = store
        .activate(ScriptedSource::ready(Ok(payload)))
        .finished()
        .await;
    assert_eq!(outcome, ActivationOutcome::Unchanged(PayloadKind::Malformed));
    assert_eq!(*store.snapshot().products, abc_catalog());
}
