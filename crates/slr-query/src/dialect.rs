//! The `Dialect` trait: a value-type strategy for compiling a `QueryPlan`
//! into one scholarly database's Boolean query syntax.
//!
//! Per the no-inheritance redesign rule, dialects are plain structs
//! implementing this trait and registered into a map at init — there is no
//! shared abstract base, only composition over the small set of formatting
//! helpers in this module.

use crate::model::{ConceptBlock, FieldTag, QueryPlan, SearchTerm};
use serde::{Deserialize, Serialize};

/// What a dialect supports, queried by callers that need to adapt their
/// plan (or warn the user) before compiling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Capabilities {
    pub supports_field_tags: bool,
    pub supports_controlled_vocab: bool,
    pub phrase_quote_char: char,
    pub max_query_length: Option<usize>,
}

/// A non-fatal diagnostic surfaced from `Dialect::compile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;
    fn capabilities(&self) -> Capabilities;

    /// Compile a plan, returning both the formatted string and any
    /// diagnostics (downgraded controlled-vocab terms, length warnings).
    fn compile(&self, plan: &QueryPlan) -> (String, Vec<Warning>);

    /// Convenience wrapper over `compile` for callers that don't need
    /// diagnostics.
    fn format(&self, plan: &QueryPlan) -> String {
        self.compile(plan).0
    }
}

/// Wrap a term's sanitized text in the dialect's phrase quote character
/// when the term is a phrase.
#[must_use]
pub fn quote_if_phrase(term: &SearchTerm, quote_char: char) -> String {
    if term.is_phrase {
        format!("{quote_char}{}{quote_char}", term.text)
    } else {
        term.text.clone()
    }
}

/// Join formatted terms with OR, parenthesizing when there is more than
/// one term. A single term is emitted bare, per the spec's tie-break rule.
#[must_use]
pub fn join_or(parts: &[String]) -> String {
    match parts.len() {
        0 => String::new(),
        1 => parts[0].clone(),
        _ => format!("({})", parts.join(" OR ")),
    }
}

/// Join per-block groups with AND. A single group is emitted bare.
#[must_use]
pub fn join_and(groups: &[String]) -> String {
    groups
        .iter()
        .filter(|g| !g.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Downgrade a controlled-vocab term to keyword when the dialect doesn't
/// support controlled vocabulary, recording a warning.
pub fn downgrade_if_unsupported(
    term: &SearchTerm,
    supports_controlled_vocab: bool,
    warnings: &mut Vec<Warning>,
) -> FieldTag {
    if term.field_tag == FieldTag::ControlledVocab && !supports_controlled_vocab {
        warnings.push(Warning::new(format!(
            "controlled-vocab term '{}' downgraded to keyword: dialect does not support controlled vocabulary",
            term.text
        )));
        FieldTag::Keyword
    } else {
        term.field_tag
    }
}

/// Shared pre-compile diagnostics independent of dialect-specific joins:
/// NOT blocks with more than 2 terms, blocks with only excluded terms (the
/// block itself is empty but an exclusion exists), and over-long terms.
pub fn collect_generic_warnings(plan: &QueryPlan) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if plan.blocks.is_empty() {
        warnings.push(Warning::new("empty query plan: no concept blocks to compile"));
    }
    if let Some(excl) = &plan.exclusion_block {
        if excl.terms.len() > 2 {
            warnings.push(Warning::new(format!(
                "exclusion block '{}' has {} terms (> 2); consider narrowing",
                excl.label,
                excl.terms.len()
            )));
        }
    }
    for block in &plan.blocks {
        if block.is_empty() {
            warnings.push(Warning::new(format!(
                "block '{}' has no included terms",
                block.label
            )));
        }
        for term in &block.terms {
            if term.text.chars().count() > 100 {
                warnings.push(Warning::new(format!(
                    "term '{}…' exceeds 100 characters",
                    &term.text.chars().take(20).collect::<String>()
                )));
            }
        }
    }
    warnings
}

pub fn check_max_length(compiled: &str, max_len: Option<usize>, warnings: &mut Vec<Warning>) {
    if let Some(max) = max_len {
        if compiled.len() > max {
            warnings.push(Warning::new(format!(
                "compiled query ({} chars) exceeds dialect max length ({max})",
                compiled.len()
            )));
        }
    }
}

/// Fallback block formatter shared by the plain-token dialects (OpenAlex,
/// Semantic Scholar, Crossref, arXiv, IEEE, WoS): quote phrases, OR-join,
/// no field-tag brackets.
#[must_use]
pub fn format_block_plain(block: &ConceptBlock, quote_char: char) -> String {
    let parts: Vec<String> = block
        .terms
        .iter()
        .map(|t| quote_if_phrase(t, quote_char))
        .collect();
    join_or(&parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_or_omits_parens_for_single_term() {
        assert_eq!(join_or(&["x".to_string()]), "x");
    }

    #[test]
    fn join_or_parenthesizes_multiple_terms() {
        assert_eq!(
            join_or(&["x".to_string(), "y".to_string()]),
            "(x OR y)"
        );
    }
}
