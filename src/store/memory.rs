//! # In-Memory Store
//!
//! Deterministic [`SecretStoreClient`] backed by a process-local map.
//!
//! Used by the crate's own tests and exported so downstream adapter authors
//! can exercise reconciliation logic without a live backend. Supports
//! scripted transient failures and per-operation call counting so tests can
//! assert things like "zero `put` calls were made".

use crate::store::{SecretStoreClient, StoreError};
use crate::value::SecretValue;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One of the three store operations, for failure scripting and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Create,
    Get,
    Put,
}

/// In-memory secret store with fault injection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    secrets: Mutex<HashMap<String, SecretValue>>,
    scripted_failures: Mutex<Vec<StoreOp>>,
    create_calls: AtomicUsize,
    get_calls: AtomicUsize,
    put_calls: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing secret.
    #[must_use]
    pub fn with_secret(self, id: impl Into<String>, value: SecretValue) -> Self {
        self.secrets
            .lock()
            .expect("store mutex poisoned")
            .insert(id.into(), value);
        self
    }

    /// Script the next call of `op` to fail with [`StoreError::Transient`].
    ///
    /// Failures are consumed in the order scripted; each covers exactly one
    /// call of the matching operation.
    pub fn fail_next(&self, op: StoreOp) {
        self.scripted_failures
            .lock()
            .expect("store mutex poisoned")
            .push(op);
    }

    /// Number of calls made to `op` so far.
    #[must_use]
    pub fn calls(&self, op: StoreOp) -> usize {
        self.counter(op).load(Ordering::SeqCst)
    }

    /// Current stored value for `id`, if any.
    #[must_use]
    pub fn stored(&self, id: &str) -> Option<SecretValue> {
        self.secrets
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned()
    }

    fn counter(&self, op: StoreOp) -> &AtomicUsize {
        match op {
            StoreOp::Create => &self.create_calls,
            StoreOp::Get => &self.get_calls,
            StoreOp::Put => &self.put_calls,
        }
    }

    /// Record the call and consume a scripted failure if one matches.
    fn enter(&self, op: StoreOp) -> Result<(), StoreError> {
        self.counter(op).fetch_add(1, Ordering::SeqCst);
        let mut scripted = self.scripted_failures.lock().expect("store mutex poisoned");
        if let Some(position) = scripted.iter().position(|scripted_op| *scripted_op == op) {
            scripted.remove(position);
            return Err(StoreError::Transient(anyhow::anyhow!(
                "injected failure for {op:?}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SecretStoreClient for MemoryStore {
    async fn create(&self, id: &str, value: &SecretValue) -> Result<(), StoreError> {
        self.enter(StoreOp::Create)?;
        let mut secrets = self.secrets.lock().expect("store mutex poisoned");
        if secrets.contains_key(id) {
            return Err(StoreError::AlreadyExists);
        }
        secrets.insert(id.to_owned(), value.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<SecretValue, StoreError> {
        self.enter(StoreOp::Get)?;
        self.secrets
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn put(&self, id: &str, value: &SecretValue) -> Result<(), StoreError> {
        self.enter(StoreOp::Put)?;
        self.secrets
            .lock()
            .expect("store mutex poisoned")
            .insert(id.to_owned(), value.clone());
        Ok(())
    }
}
