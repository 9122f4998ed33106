//! # Content Signatures
//!
//! A signature is a deterministic content hash over a secret value, used to
//! decide whether a write against the store is necessary at all. Two values
//! with identical field/value pairs produce identical signatures regardless
//! of insertion order.
//!
//! The signature is a correctness optimization, not a security credential:
//! it is never presented to the store or any external party for
//! authentication or integrity checking.

use crate::value::SecretValue;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex-rendered SHA-256 content hash of a [`SecretValue`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the content signature of a secret value.
///
/// Fields are fed to the digest in canonical (sorted) order, each field name
/// and value prefixed with its byte length so adjacent fields cannot alias
/// each other.
#[must_use]
pub fn sign(value: &SecretValue) -> Signature {
    let mut hasher = Sha256::new();
    for (field, field_value) in value.iter() {
        hasher.update((field.len() as u64).to_le_bytes());
        hasher.update(field.as_bytes());
        hasher.update((field_value.len() as u64).to_le_bytes());
        hasher.update(field_value.as_bytes());
    }
    Signature(format!("sha256:{:x}", hasher.finalize()))
}
