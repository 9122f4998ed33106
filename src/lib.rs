//! Secret Store Reconciler
//!
//! Converges a named secret in a remote key/value secret store to a
//! caller-supplied desired state. A content signature avoids unnecessary
//! writes, and every pass produces a [`ReconciliationResult`] with the
//! fields classified as added / removed / changed / unchanged for
//! observability.
//!
//! Backends plug in behind the [`SecretStoreClient`] trait; the reconciler
//! is implemented once against it. An in-memory store with fault injection
//! is provided for tests and local dry-runs.
//!
//! Replace semantics: the desired value is always the *complete* field set.
//! Fields omitted from it are deleted from the store on the next apply.
//!
//! ```
//! use secret_store_reconciler::{MemoryStore, Reconciler, SecretValue, Status};
//!
//! # async fn demo() {
//! let store = MemoryStore::new();
//! let reconciler = Reconciler::new(&store);
//!
//! let desired: SecretValue = [("username", "svc"), ("password", "hunter2")]
//!     .into_iter()
//!     .collect();
//! let result = reconciler.ensure("billing.db.prod", &desired).await;
//! assert_eq!(result.status(), Status::Created);
//! # }
//! ```

pub mod name;
pub mod reconciler;
pub mod report;
pub mod signature;
pub mod store;
pub mod value;

pub use reconciler::Reconciler;
pub use report::{ReconciliationResult, Status};
pub use signature::{sign, Signature};
pub use store::{MemoryStore, SecretStoreClient, StoreError};
pub use value::SecretValue;
