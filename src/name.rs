//! # Identifier Helpers
//!
//! Convenience helpers for composing secret identifiers in the conventional
//! `<workload>.<component>.<domain>` shape.
//!
//! The reconciler itself treats identifiers as opaque strings and never
//! validates or parses them; these helpers exist so callers that follow the
//! convention produce store-safe names consistently.

/// Compose a secret identifier from its conventional parts.
///
/// Format: `{workload}.{component}.{domain}`. Each part is sanitized with
/// [`sanitize_id_component`]; empty parts are dropped rather than producing
/// consecutive separators.
#[must_use]
pub fn compose_secret_id(workload: &str, component: &str, domain: &str) -> String {
    [workload, component, domain]
        .iter()
        .map(|part| sanitize_id_component(part))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// Sanitize one identifier part for use in a store identifier.
///
/// Keeps alphanumerics, `-` and `_`; separators and whitespace collapse to a
/// single `_`. Leading and trailing underscores are trimmed.
#[must_use]
pub fn sanitize_id_component(part: &str) -> String {
    let sanitized: String = part
        .chars()
        .map(|c| match c {
            c if c.is_alphanumeric() || c == '-' => c,
            _ => '_',
        })
        .collect();

    // Collapse runs of underscores produced by adjacent invalid characters
    let mut result = String::with_capacity(sanitized.len());
    let mut prev_was_underscore = false;
    for c in sanitized.chars() {
        if c == '_' {
            if !prev_was_underscore {
                result.push(c);
                prev_was_underscore = true;
            }
        } else {
            result.push(c);
            prev_was_underscore = false;
        }
    }

    result.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_secret_id() {
        assert_eq!(
            compose_secret_id("billing", "db", "prod"),
            "billing.db.prod"
        );
    }

    #[test]
    fn test_compose_drops_empty_parts() {
        assert_eq!(compose_secret_id("billing", "", "prod"), "billing.prod");
    }

    #[test]
    fn test_sanitize_replaces_separators() {
        assert_eq!(sanitize_id_component("my/secret path"), "my_secret_path");
        assert_eq!(sanitize_id_component("a.b"), "a_b");
    }

    #[test]
    fn test_sanitize_collapses_underscore_runs() {
        assert_eq!(sanitize_id_component("a //b"), "a_b");
    }

    #[test]
    fn test_sanitize_trims_leading_trailing() {
        assert_eq!(sanitize_id_component(".secret."), "secret");
    }

    #[test]
    fn test_sanitize_keeps_dashes() {
        assert_eq!(sanitize_id_component("my-secret"), "my-secret");
    }
}
