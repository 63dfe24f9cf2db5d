//! Deterministic JSON emission and content hashing.
//!
//! Every artifact and result file in the pipeline is UTF-8 JSON with stable
//! field ordering, so two runs over identical input produce byte-identical
//! output. We get that via JCS (RFC 8785): serialize to a `serde_json::Value`
//! then canonicalize key ordering and number formatting.

use crate::error::SlrError;
use blake3::Hasher;
use serde::Serialize;

/// Emit a value as JCS-canonical JSON (RFC 8785).
///
/// This is the standard way to emit artifact, result, and export-manifest
/// JSON: canonicalization makes output deterministic regardless of struct
/// field declaration order, which keeps diffs stable across platforms and
/// lets callers hash the output meaningfully.
pub fn emit_jcs<T: Serialize>(value: &T) -> Result<String, SlrError> {
    let json_value = serde_json::to_value(value)
        .map_err(|e| SlrError::Internal(format!("failed to serialize to JSON: {e}")))?;
    let bytes = serde_json_canonicalizer::to_vec(&json_value)
        .map_err(|e| SlrError::Internal(format!("failed to canonicalize JSON: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| SlrError::Internal(format!("JCS output was not valid UTF-8: {e}")))
}

/// BLAKE3 hash of a value's canonical JSON form, hex-encoded.
///
/// Used for artifact content hashes and provider-result file integrity
/// checks; never for security-sensitive authentication.
pub fn content_hash<T: Serialize>(value: &T) -> Result<String, SlrError> {
    let canonical = emit_jcs(value)?;
    Ok(hash_str(&canonical))
}

/// BLAKE3 hash of raw bytes, hex-encoded.
#[must_use]
pub fn hash_str(s: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(s.as_bytes());
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Sample {
        b: i32,
        a: i32,
    }

    #[test]
    fn emit_jcs_orders_keys_canonically() {
        let json = emit_jcs(&Sample { b: 2, a: 1 }).unwrap();
        assert_eq!(json, r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn content_hash_is_deterministic() {
        let mut m1 = BTreeMap::new();
        m1.insert("x", 1);
        let h1 = content_hash(&m1).unwrap();
        let h2 = content_hash(&m1).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn content_hash_changes_with_content() {
        let mut m1 = BTreeMap::new();
        m1.insert("x", 1);
        let mut m2 = BTreeMap::new();
        m2.insert("x", 2);
        assert_ne!(content_hash(&m1).unwrap(), content_hash(&m2).unwrap());
    }
}
