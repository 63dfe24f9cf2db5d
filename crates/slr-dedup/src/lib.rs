//! Deduplication: a pure, synchronous pass over an unordered stream of
//! documents from possibly many providers, keeping the first-seen record
//! under a three-level key (DOI, then normalized title, then fingerprint).
//!
//! No I/O, so no async runtime dependency — the executor is responsible for
//! loading provider result files in the right order (databases in the order
//! they appear in the query plan) before calling [`deduplicate`].

use slr_artifact::{DeduplicationStats, Document};
use std::collections::HashSet;

/// A collision key derived from one document, tried in priority order.
enum Key {
    Doi(String),
    Title(String),
    Fingerprint(String),
}

fn normalize_doi(doi: &str) -> String {
    let trimmed = doi.trim();
    let stripped = trimmed
        .strip_prefix("https://doi.org/")
        .or_else(|| trimmed.strip_prefix("http://doi.org/"))
        .or_else(|| trimmed.strip_prefix("doi.org/"))
        .or_else(|| trimmed.strip_prefix("DOI:"))
        .unwrap_or(trimmed);
    stripped.trim().to_lowercase()
}

fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn key_for(doc: &Document) -> Key {
    if let Some(doi) = &doc.doi {
        let normalized = normalize_doi(doi);
        if !normalized.is_empty() {
            return Key::Doi(normalized);
        }
    }
    let title = normalize_title(&doc.title);
    if title.chars().count() >= 10 {
        return Key::Title(title);
    }
    Key::Fingerprint(doc.fingerprint.clone())
}

impl Key {
    fn tagged(self) -> String {
        match self {
            Key::Doi(v) => format!("doi:{v}"),
            Key::Title(v) => format!("title:{v}"),
            Key::Fingerprint(v) => format!("fp:{v}"),
        }
    }
}

/// Deduplicates `documents` in place order (first occurrence wins),
/// returning the unique list and collision stats.
#[must_use]
pub fn deduplicate(documents: Vec<Document>) -> (Vec<Document>, DeduplicationStats) {
    let original_count = documents.len();
    let mut seen = HashSet::with_capacity(original_count);
    let mut unique = Vec::with_capacity(original_count);
    let mut duplicates_removed = 0usize;

    for doc in documents {
        let key = key_for(&doc).tagged();
        if seen.insert(key) {
            unique.push(doc);
        } else {
            duplicates_removed += 1;
        }
    }

    let rate = if original_count == 0 {
        0.0
    } else {
        duplicates_removed as f64 / original_count as f64
    };

    (
        unique,
        DeduplicationStats {
            original_count,
            duplicates_removed,
            rate,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(title: &str, doi: Option<&str>, fingerprint: &str) -> Document {
        Document {
            title: title.to_string(),
            authors: vec!["Jane Doe".to_string()],
            year: Some(2020),
            venue: None,
            doi: doi.map(str::to_string),
            url: None,
            abstract_text: None,
            citation_count: None,
            provider: "test".to_string(),
            arxiv_id: None,
            pubmed_id: None,
            fingerprint: fingerprint.to_string(),
        }
    }

    #[test]
    fn dedups_on_normalized_doi_regardless_of_url_prefix() {
        let a = doc("Title One", Some("https://doi.org/10.1/ABC"), "fp1");
        let b = doc("A Different Title", Some("10.1/abc"), "fp2");
        let (unique, stats) = deduplicate(vec![a, b]);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].title, "Title One");
        assert_eq!(stats.duplicates_removed, 1);
        assert!((stats.rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_title_when_no_doi() {
        let a = doc("A Sufficiently Long Title", None, "fp1");
        let b = doc("A Sufficiently Long Title!!", None, "fp2");
        let (unique, stats) = deduplicate(vec![a, b]);
        assert_eq!(unique.len(), 1);
        assert_eq!(stats.duplicates_removed, 1);
    }

    #[test]
    fn falls_back_to_fingerprint_for_short_titles_without_doi() {
        let a = doc("Short", None, "shared-fp");
        let b = doc("Also Short", None, "shared-fp");
        let (unique, stats) = deduplicate(vec![a, b]);
        assert_eq!(unique.len(), 1);
        assert_eq!(stats.duplicates_removed, 1);
    }

    #[test]
    fn empty_input_has_zero_rate() {
        let (unique, stats) = deduplicate(vec![]);
        assert!(unique.is_empty());
        assert_eq!(stats.original_count, 0);
        assert!((stats.rate - 0.0).abs() < 1e-9);
    }

    #[test]
    fn first_seen_record_wins() {
        let a = doc("Kept Title Keeper Long Enough", Some("10.1/x"), "fp1");
        let b = doc("Overwritten", Some("10.1/x"), "fp2");
        let (unique, _) = deduplicate(vec![a, b]);
        assert_eq!(unique[0].title, "Kept Title Keeper Long Enough");
    }

    proptest::proptest! {
        #[test]
        fn deduplicating_twice_is_a_no_op(
            titles in proptest::collection::vec("[a-z ]{3,20}", 0..30)
        ) {
            let docs: Vec<Document> = titles
                .into_iter()
                .enumerate()
                .map(|(i, t)| doc(&t, None, &format!("fp{i}")))
                .collect();
            let (once, _) = deduplicate(docs);
            let (twice, stats_twice) = deduplicate(once.clone());
            proptest::prop_assert_eq!(once.len(), twice.len());
            proptest::prop_assert_eq!(stats_twice.duplicates_removed, 0);
        }
    }
}
