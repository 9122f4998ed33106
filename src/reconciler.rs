//! # Reconciler
//!
//! Core convergence logic: make the secret stored under an id equal a
//! caller-supplied desired value, writing only when the content signature
//! actually differs, and report a classified diff of what moved.
//!
//! ## Reconciliation Flow
//!
//! 1. Attempt `create(id, desired)` - the common first-apply path
//! 2. On conflict, fetch the stored value and classify every field as
//!    added / removed / changed / unchanged
//! 3. Compare content signatures; skip the write when they match
//! 4. Otherwise overwrite the stored value with `desired` wholesale
//!
//! The reconciler is stateless and reentrant. It performs no retries, no
//! timeouts, and no locking; the caller must serialize concurrent `ensure`
//! calls for the *same* id (distinct ids are safe to run concurrently).

use crate::report::{ReconciliationResult, Status};
use crate::signature::sign;
use crate::store::{SecretStoreClient, StoreError};
use crate::value::SecretValue;
use std::collections::BTreeSet;
use tracing::{debug, info, info_span, warn, Instrument};

/// Reconciles one secret per call against an injected store client.
///
/// Holds nothing but the client reference; construct freely or copy one
/// around - there is no state to share or protect.
#[derive(Clone, Copy)]
pub struct Reconciler<'a> {
    store: &'a dyn SecretStoreClient,
}

impl std::fmt::Debug for Reconciler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}

impl<'a> Reconciler<'a> {
    #[must_use]
    pub fn new(store: &'a dyn SecretStoreClient) -> Self {
        Self { store }
    }

    /// Converge the secret stored under `id` to exactly `desired`.
    ///
    /// `desired` is the *complete* intended field set, with replace
    /// semantics: any field the store holds that is absent from `desired` is
    /// deleted by the next write. A caller that forgets a field will
    /// silently delete it on the next apply - always supply the full set.
    ///
    /// All expected outcomes, including transient store failures, are encoded
    /// in the returned [`ReconciliationResult`]; this function never fails at
    /// the type level. Callers that treat `Failed` as fatal must inspect
    /// [`ReconciliationResult::status`](ReconciliationResult::status)
    /// explicitly.
    pub async fn ensure(&self, id: &str, desired: &SecretValue) -> ReconciliationResult {
        let span = info_span!(
            "secret.ensure",
            secret.id = id,
            operation.kind = tracing::field::Empty,
            operation.success = tracing::field::Empty
        );
        let span_clone = span.clone();

        async move {
            // First-apply fast path: attempt creation and let the store tell
            // us whether the secret already exists.
            match self.store.create(id, desired).await {
                Ok(()) => {
                    info!("Created secret {} with {} field(s)", id, desired.len());
                    span_clone.record("operation.kind", "create");
                    span_clone.record("operation.success", true);
                    return ReconciliationResult::new(
                        id,
                        sign(desired),
                        Status::Created,
                        desired.field_names(),
                        BTreeSet::new(),
                        BTreeSet::new(),
                        BTreeSet::new(),
                    );
                }
                Err(StoreError::AlreadyExists) => {
                    debug!("Secret {} already exists, reconciling stored value", id);
                }
                Err(StoreError::Transient(e)) => {
                    warn!("Failed to create secret {}: {e:#}", id);
                    span_clone.record("operation.kind", "create");
                    span_clone.record("operation.success", false);
                    return ReconciliationResult::empty(id, sign(desired), Status::Failed);
                }
                Err(e @ StoreError::NotFound) => {
                    // Not part of the create contract; treat like a
                    // transient failure rather than guessing at store state.
                    warn!("Unexpected error creating secret {}: {}", id, e);
                    span_clone.record("operation.kind", "create");
                    span_clone.record("operation.success", false);
                    return ReconciliationResult::empty(id, sign(desired), Status::Failed);
                }
            }

            // Fetch the stored value. A failure here (transient, or the
            // secret vanishing between create and get) degrades to
            // `Unchanged` without confirming store state; only this warning
            // distinguishes the degraded path from a verified no-op.
            let existing = match self.store.get(id).await {
                Ok(existing) => existing,
                Err(e) => {
                    warn!(
                        "Could not read secret {} after create conflict ({}), assuming converged",
                        id, e
                    );
                    // Distinct from a verified no-op in span data, even
                    // though the reported status is the same.
                    span_clone.record("operation.kind", "degraded");
                    span_clone.record("operation.success", true);
                    return ReconciliationResult::empty(id, sign(desired), Status::Unchanged);
                }
            };

            let diff = classify_fields(&existing, desired);
            let existing_signature = sign(&existing);
            let desired_signature = sign(desired);

            if desired_signature == existing_signature {
                debug!("Secret {} unchanged, skipping update", id);
                span_clone.record("operation.kind", "no_change");
                span_clone.record("operation.success", true);
                return ReconciliationResult::new(
                    id,
                    existing_signature,
                    Status::Unchanged,
                    diff.added,
                    diff.removed,
                    diff.changed,
                    diff.unchanged,
                );
            }

            // Full overwrite with the desired value. The classification above
            // is reporting only; the value written is `desired` exactly.
            debug!("Writing secret {} as {}", id, desired);
            match self.store.put(id, desired).await {
                Ok(()) => {
                    span_clone.record("operation.kind", "update");
                    span_clone.record("operation.success", true);
                    let result = ReconciliationResult::new(
                        id,
                        desired_signature,
                        Status::Updated,
                        diff.added,
                        diff.removed,
                        diff.changed,
                        diff.unchanged,
                    );
                    info!("Updated secret {} ({})", id, result.summary());
                    result
                }
                Err(e) => {
                    // The write did not happen: report the stored signature
                    // and discard the computed diff rather than presenting it
                    // as applied.
                    warn!("Failed to update secret {}: {}", id, e);
                    span_clone.record("operation.kind", "update");
                    span_clone.record("operation.success", false);
                    ReconciliationResult::empty(id, existing_signature, Status::Failed)
                }
            }
        }
        .instrument(span)
        .await
    }
}

struct FieldDiff {
    added: BTreeSet<String>,
    removed: BTreeSet<String>,
    changed: BTreeSet<String>,
    unchanged: BTreeSet<String>,
}

/// Classify every field of existing and desired into exactly one bucket.
fn classify_fields(existing: &SecretValue, desired: &SecretValue) -> FieldDiff {
    let existing_fields = existing.field_names();
    let desired_fields = desired.field_names();

    let added = desired_fields
        .difference(&existing_fields)
        .cloned()
        .collect();
    let removed = existing_fields
        .difference(&desired_fields)
        .cloned()
        .collect();

    let mut changed = BTreeSet::new();
    let mut unchanged = BTreeSet::new();
    for field in desired_fields.intersection(&existing_fields) {
        if desired.get(field) == existing.get(field) {
            unchanged.insert(field.clone());
        } else {
            changed.insert(field.clone());
        }
    }

    FieldDiff {
        added,
        removed,
        changed,
        unchanged,
    }
}
