//! # Reconciliation Reports
//!
//! [`ReconciliationResult`] is the single value returned by every `ensure`
//! call: a status plus the four classified field sets (added, removed,
//! changed, unchanged). It is a report, not a handle - constructed once,
//! immutable afterward, and never retained by the reconciler.

use crate::signature::Signature;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Outcome of a single reconciliation pass over one secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The secret did not exist and was created with the desired value.
    Created,
    /// The stored value differed and was overwritten with the desired value.
    Updated,
    /// No write was made. This covers both the confirmed no-op (stored value
    /// already equals desired) and the degraded case where the stored value
    /// could not be read after a create conflict; only logs distinguish the
    /// two.
    Unchanged,
    /// A transient store failure aborted the pass; the store was not
    /// mutated by this call.
    Failed,
}

impl Status {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field classification of a reconciliation, for observability.
///
/// The four sets are pairwise disjoint. For `Created` results `added` holds
/// every desired field and the other three sets are empty; for `Updated` and
/// confirmed `Unchanged` results the union of the four sets covers every
/// field of the stored and desired values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    secret_id: String,
    signature: Signature,
    status: Status,
    added: BTreeSet<String>,
    removed: BTreeSet<String>,
    changed: BTreeSet<String>,
    unchanged: BTreeSet<String>,
}

impl ReconciliationResult {
    pub(crate) fn new(
        secret_id: impl Into<String>,
        signature: Signature,
        status: Status,
        added: BTreeSet<String>,
        removed: BTreeSet<String>,
        changed: BTreeSet<String>,
        unchanged: BTreeSet<String>,
    ) -> Self {
        Self {
            secret_id: secret_id.into(),
            signature,
            status,
            added,
            removed,
            changed,
            unchanged,
        }
    }

    /// Result with no classified fields, for the created-nothing outcomes
    /// (`Failed` and the degraded `Unchanged` fallback).
    pub(crate) fn empty(secret_id: impl Into<String>, signature: Signature, status: Status) -> Self {
        Self::new(
            secret_id,
            signature,
            status,
            BTreeSet::new(),
            BTreeSet::new(),
            BTreeSet::new(),
            BTreeSet::new(),
        )
    }

    #[must_use]
    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }

    /// Signature of the value the store is believed to hold after this pass.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Fields present in desired but not in the stored value.
    #[must_use]
    pub fn added(&self) -> &BTreeSet<String> {
        &self.added
    }

    /// Fields present in the stored value but absent from desired (deleted).
    #[must_use]
    pub fn removed(&self) -> &BTreeSet<String> {
        &self.removed
    }

    /// Fields present in both with differing values.
    #[must_use]
    pub fn changed(&self) -> &BTreeSet<String> {
        &self.changed
    }

    /// Fields present in both with identical values.
    #[must_use]
    pub fn unchanged(&self) -> &BTreeSet<String> {
        &self.unchanged
    }

    /// Human-readable diff line: `+field` added, `~field` changed,
    /// `-field` removed, in stable sorted order per class.
    ///
    /// Unchanged fields are omitted; an empty string means nothing moved.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        parts.extend(self.added.iter().map(|f| format!("+{f}")));
        parts.extend(self.changed.iter().map(|f| format!("~{f}")));
        parts.extend(self.removed.iter().map(|f| format!("-{f}")));
        parts.join(" ")
    }
}

impl fmt::Display for ReconciliationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary();
        if summary.is_empty() {
            write!(f, "{} {}", self.secret_id, self.status)
        } else {
            write!(f, "{} {} ({summary})", self.secret_id, self.status)
        }
    }
}
