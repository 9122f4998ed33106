//! Scenario tests for the public reconciliation API
//!
//! These exercise the crate the way a provisioning engine does: one
//! `ensure` call per secret per apply pass, logging the returned report,
//! never branching on it for overall apply success.

use secret_store_reconciler::store::memory::StoreOp;
use secret_store_reconciler::{sign, MemoryStore, Reconciler, SecretValue, Status};

fn value(fields: &[(&str, &str)]) -> SecretValue {
    fields.iter().copied().collect()
}

#[tokio::test]
async fn test_two_apply_passes_converge_and_then_no_op() {
    let store = MemoryStore::new();
    let reconciler = Reconciler::new(&store);

    let web = value(&[("api-key", "k1")]);
    let db = value(&[("username", "svc"), ("password", "hunter2")]);

    // First pass: everything is created
    assert_eq!(
        reconciler.ensure("shop.web.prod", &web).await.status(),
        Status::Created
    );
    assert_eq!(
        reconciler.ensure("shop.db.prod", &db).await.status(),
        Status::Created
    );

    // Second pass with identical desired state: all no-ops, zero writes
    assert_eq!(
        reconciler.ensure("shop.web.prod", &web).await.status(),
        Status::Unchanged
    );
    assert_eq!(
        reconciler.ensure("shop.db.prod", &db).await.status(),
        Status::Unchanged
    );
    assert_eq!(store.calls(StoreOp::Put), 0);
}

#[tokio::test]
async fn test_field_rotation_reports_and_applies_replacement() {
    let store = MemoryStore::new().with_secret(
        "shop.db.prod",
        value(&[("username", "svc"), ("password", "old")]),
    );
    let reconciler = Reconciler::new(&store);

    // Rotate the password and drop the username field entirely
    let desired = value(&[("password", "new")]);
    let result = reconciler.ensure("shop.db.prod", &desired).await;

    assert_eq!(result.status(), Status::Updated);
    assert_eq!(result.summary(), "~password -username");
    assert_eq!(result.signature(), &sign(&desired));
    // Replace semantics: the dropped field is gone from the store
    assert_eq!(store.stored("shop.db.prod"), Some(desired));
}

#[tokio::test]
async fn test_degraded_read_after_conflict_is_reported_unchanged() {
    let store = MemoryStore::new().with_secret("shop.db.prod", value(&[("password", "old")]));
    store.fail_next(StoreOp::Get);
    let reconciler = Reconciler::new(&store);

    let desired = value(&[("password", "new")]);
    let result = reconciler.ensure("shop.db.prod", &desired).await;

    // Indistinguishable from a confirmed no-op at the type level; the store
    // keeps its (stale) value and no write is attempted.
    assert_eq!(result.status(), Status::Unchanged);
    assert!(result.unchanged().is_empty());
    assert_eq!(store.calls(StoreOp::Put), 0);
    assert_eq!(
        store.stored("shop.db.prod"),
        Some(value(&[("password", "old")]))
    );
}

#[tokio::test]
async fn test_failed_pass_does_not_abort_the_apply_loop() {
    let store = MemoryStore::new();
    store.fail_next(StoreOp::Create);
    let reconciler = Reconciler::new(&store);

    // The failing secret reports Failed; the next one proceeds normally
    let broken = reconciler.ensure("shop.web.prod", &value(&[("k", "v")])).await;
    let healthy = reconciler.ensure("shop.db.prod", &value(&[("k", "v")])).await;

    assert_eq!(broken.status(), Status::Failed);
    assert_eq!(healthy.status(), Status::Created);
}

#[tokio::test]
async fn test_result_serializes_for_status_reporting() {
    let store = MemoryStore::new();
    let result = Reconciler::new(&store)
        .ensure("s1", &value(&[("x", "1")]))
        .await;

    let json = serde_json::to_value(&result).expect("result serializes");
    assert_eq!(json["status"], "created");
    assert_eq!(json["secret_id"], "s1");
    assert_eq!(json["added"][0], "x");
    assert!(json["signature"]
        .as_str()
        .expect("signature is a string")
        .starts_with("sha256:"));
}
