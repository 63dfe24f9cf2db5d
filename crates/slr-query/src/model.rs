//! Value types for the query-synthesis intermediate representation:
//! `SearchTerm`, `ConceptBlock`, `QueryPlan`.

use serde::{Deserialize, Serialize};

/// Which field class a search term targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldTag {
    Keyword,
    ControlledVocab,
    AllFields,
}

/// One searchable term within a concept block.
///
/// `is_phrase` is derived at construction time: true iff `text` (after
/// stripping surrounding quote characters) contains whitespace, or the
/// caller explicitly passed a phrase-quoted string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTerm {
    pub text: String,
    pub field_tag: FieldTag,
    pub is_phrase: bool,
}

impl SearchTerm {
    #[must_use]
    pub fn new(raw_text: impl AsRef<str>, field_tag: FieldTag) -> Self {
        let stripped = strip_quotes(raw_text.as_ref());
        let sanitized = collapse_whitespace(&stripped);
        let is_phrase = sanitized.contains(char::is_whitespace);
        Self {
            text: sanitized,
            field_tag,
            is_phrase,
        }
    }
}

fn strip_quotes(text: &str) -> String {
    text.chars().filter(|c| *c != '"' && *c != '\'').collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A set of synonymous/related terms combined with OR. Empty blocks are
/// illegal in a final `QueryPlan` (checked by `QueryPlan::validate`), but
/// the type itself permits construction of an empty block so callers can
/// build one incrementally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConceptBlock {
    pub label: String,
    pub terms: Vec<SearchTerm>,
}

impl ConceptBlock {
    #[must_use]
    pub fn new(label: impl Into<String>, terms: Vec<SearchTerm>) -> Self {
        Self {
            label: label.into(),
            terms,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// The abstract Boolean query: blocks combine with AND, terms within a
/// block combine with OR, and an optional exclusion block is the `NOT`
/// side of the query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryPlan {
    pub blocks: Vec<ConceptBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion_block: Option<ConceptBlock>,
}

impl QueryPlan {
    #[must_use]
    pub fn new(blocks: Vec<ConceptBlock>) -> Self {
        Self {
            blocks,
            exclusion_block: None,
        }
    }

    #[must_use]
    pub fn with_exclusion(mut self, exclusion: ConceptBlock) -> Self {
        self.exclusion_block = Some(exclusion);
        self
    }

    #[must_use]
    pub fn total_terms(&self) -> usize {
        self.blocks.iter().map(|b| b.terms.len()).sum()
    }

    #[must_use]
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }
}
