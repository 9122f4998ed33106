//! # Secret Values
//!
//! A secret value is a flat mapping of field names to field values. It is the
//! *complete* set of fields the secret should contain, not a partial patch:
//! any field missing from a desired value is deleted from the store on the
//! next reconciliation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Complete field set for a single secret.
///
/// Backed by an ordered map so serialization (and therefore signing) is
/// deterministic regardless of the order fields were inserted in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(BTreeMap<String, String>);

impl SecretValue {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert or replace a field.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate fields in canonical (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Field names in canonical order.
    #[must_use]
    pub fn field_names(&self) -> BTreeSet<String> {
        self.0.keys().cloned().collect()
    }
}

/// Renders field names with masked values, safe for log output.
impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (field, field_value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}: {}", mask_field_value(field_value))?;
        }
        write!(f, "}}")
    }
}

impl From<BTreeMap<String, String>> for SecretValue {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self(fields)
    }
}

impl FromIterator<(String, String)> for SecretValue {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for SecretValue {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        )
    }
}

/// Mask a field value for logging (show first and last few characters)
///
/// Operates on characters, not bytes, so multi-byte values mask cleanly.
#[must_use]
pub fn mask_field_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count <= 8 {
        // Very short values - mask completely
        "*".repeat(char_count.min(4))
    } else {
        // Show first 4 and last 4 characters
        let first: String = value.chars().take(4).collect();
        let last: String = value.chars().skip(char_count - 4).collect();
        format!("{first}...{last}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut value = SecretValue::new();
        value.set("username", "svc-account").set("password", "hunter2");
        assert_eq!(value.get("username"), Some("svc-account"));
        assert_eq!(value.get("missing"), None);
        assert_eq!(value.len(), 2);
    }

    #[test]
    fn test_iteration_is_sorted() {
        let value: SecretValue = [("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
        let fields: Vec<&str> = value.iter().map(|(k, _)| k).collect();
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_serializes_as_flat_json_object() {
        let value: SecretValue = [("host", "db.internal"), ("port", "5432")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"host":"db.internal","port":"5432"}"#);
    }

    #[test]
    fn test_display_masks_field_values() {
        let value: SecretValue = [("password", "super-secret-value"), ("user", "svc")]
            .into_iter()
            .collect();
        let rendered = value.to_string();
        assert_eq!(rendered, "{password: supe...alue, user: ***}");
        assert!(!rendered.contains("super-secret-value"));
    }

    #[test]
    fn test_mask_field_value_short() {
        // Values <= 8 chars: mask with at most 4 asterisks
        assert_eq!(mask_field_value("abc"), "***");
        assert_eq!(mask_field_value("short"), "****");
        assert_eq!(mask_field_value("12345678"), "****");
    }

    #[test]
    fn test_mask_field_value_long() {
        let value = "this-is-a-very-long-secret-value";
        let masked = mask_field_value(value);
        assert!(masked.starts_with("this"));
        assert!(masked.ends_with("lue"));
        assert!(masked.contains("..."));
    }

    #[test]
    fn test_mask_field_value_non_ascii_short() {
        // Multi-byte values must not be sliced mid-character
        // 7 chars, 21 bytes: masked entirely
        assert_eq!(mask_field_value("日本語のひみつ"), "****");
    }

    #[test]
    fn test_mask_field_value_non_ascii_long() {
        // 12 chars: first 4 and last 4 characters shown
        let masked = mask_field_value("パスワードはひみつです!");
        assert_eq!(masked, "パスワー...つです!");
    }

    #[test]
    fn test_display_masks_non_ascii_values() {
        let value: SecretValue = [("greeting", "こんにちは")].into_iter().collect();
        assert_eq!(value.to_string(), "{greeting: ****}");
    }
}
