//! # Store Clients
//!
//! The store client is the seam between the reconciler and a concrete secret
//! store backend (cloud secrets manager, vault service, ...).
//!
//! Each backend implements [`SecretStoreClient`]; the reconciler is written
//! once against the trait. Connection pooling, timeouts, and retry policy
//! belong in the adapter (or in the caller wrapping the reconciler), never in
//! the reconciler itself - each operation is attempted exactly once per
//! reconciliation pass.

use crate::value::SecretValue;
use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of the three store operations.
///
/// `AlreadyExists` and `NotFound` are expected control-flow signals for the
/// reconciler, not failures. Only `Transient` represents a real
/// infrastructure, auth, or network problem.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `create` found a secret with this id already present.
    #[error("secret already exists")]
    AlreadyExists,

    /// `get` found no secret with this id.
    #[error("secret not found")]
    NotFound,

    /// Infrastructure, auth, or network failure from the backend SDK.
    #[error("transient store failure")]
    Transient(#[from] anyhow::Error),
}

/// Client trait for remote key/value secret stores.
///
/// Implementations wrap a backend SDK and map its errors onto [`StoreError`];
/// SDK failures other than the documented signal conditions become
/// [`StoreError::Transient`].
#[async_trait]
pub trait SecretStoreClient: Send + Sync {
    /// Create the secret iff absent.
    ///
    /// Must fail atomically with [`StoreError::AlreadyExists`] when a secret
    /// with `id` is already present; must not partially write.
    async fn create(&self, id: &str, value: &SecretValue) -> Result<(), StoreError>;

    /// Fetch the current stored value, or [`StoreError::NotFound`].
    async fn get(&self, id: &str) -> Result<SecretValue, StoreError>;

    /// Overwrite the stored value wholesale (not a field-level patch).
    async fn put(&self, id: &str, value: &SecretValue) -> Result<(), StoreError>;
}

pub mod memory;

pub use memory::MemoryStore;
