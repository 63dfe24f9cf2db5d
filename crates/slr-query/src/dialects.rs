//! Concrete `Dialect` implementations for the eight recognized databases.

use crate::dialect::{
    Capabilities, Dialect, Warning, check_max_length, collect_generic_warnings,
    downgrade_if_unsupported, format_block_plain, join_and, join_or, quote_if_phrase,
};
use crate::model::{ConceptBlock, FieldTag, QueryPlan};

/// PubMed: every term is quoted and field-tagged; `[MeSH Terms]` for
/// controlled vocabulary, `[Title/Abstract]` for keyword, `[All Fields]`
/// otherwise.
pub struct PubMed;

impl PubMed {
    fn format_term_bracketed(text: &str, tag: FieldTag) -> String {
        let bracket = match tag {
            FieldTag::ControlledVocab => "MeSH Terms",
            FieldTag::Keyword => "Title/Abstract",
            FieldTag::AllFields => "All Fields",
        };
        format!("\"{text}\"[{bracket}]")
    }

    fn format_block(block: &ConceptBlock) -> String {
        let parts: Vec<String> = block
            .terms
            .iter()
            .map(|t| Self::format_term_bracketed(&t.text, t.field_tag))
            .collect();
        join_or(&parts)
    }
}

impl Dialect for PubMed {
    fn name(&self) -> &'static str {
        "pubmed"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            supports_field_tags: true,
            supports_controlled_vocab: true,
            phrase_quote_char: '"',
            max_query_length: Some(4000),
        }
    }

    fn compile(&self, plan: &QueryPlan) -> (String, Vec<Warning>) {
        let mut warnings = collect_generic_warnings(plan);
        let groups: Vec<String> = plan.blocks.iter().map(Self::format_block).collect();
        let mut compiled = join_and(&groups);

        if let Some(excl) = &plan.exclusion_block {
            if !excl.is_empty() {
                let excl_group = Self::format_block(excl);
                compiled = format!("{compiled} NOT {excl_group}");
            }
        }

        check_max_length(&compiled, self.capabilities().max_query_length, &mut warnings);
        (compiled, warnings)
    }
}

/// Scopus: one `TITLE-ABS-KEY(...)` envelope per block (not per term), no
/// field tags, no controlled vocabulary.
pub struct Scopus;

impl Scopus {
    fn format_block(&self, block: &ConceptBlock, warnings: &mut Vec<Warning>) -> String {
        let caps = self.capabilities();
        let parts: Vec<String> = block
            .terms
            .iter()
            .map(|t| {
                downgrade_if_unsupported(t, caps.supports_controlled_vocab, warnings);
                quote_if_phrase(t, caps.phrase_quote_char)
            })
            .collect();
        let inner = parts.join(" OR ");
        if inner.is_empty() {
            String::new()
        } else {
            format!("TITLE-ABS-KEY({inner})")
        }
    }
}

impl Dialect for Scopus {
    fn name(&self) -> &'static str {
        "scopus"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            supports_field_tags: false,
            supports_controlled_vocab: false,
            phrase_quote_char: '"',
            max_query_length: Some(4000),
        }
    }

    fn compile(&self, plan: &QueryPlan) -> (String, Vec<Warning>) {
        let mut warnings = collect_generic_warnings(plan);
        let groups: Vec<String> = plan
            .blocks
            .iter()
            .map(|b| self.format_block(b, &mut warnings))
            .collect();
        let mut compiled = join_and(&groups);

        if let Some(excl) = &plan.exclusion_block {
            if !excl.is_empty() {
                let excl_group = self.format_block(excl, &mut warnings);
                compiled = format!("{compiled} AND NOT {excl_group}");
            }
        }

        check_max_length(&compiled, self.capabilities().max_query_length, &mut warnings);
        (compiled, warnings)
    }
}

/// Shared shape for the remaining "plain token, dialect-local field
/// syntax or nothing" dialects: OpenAlex, Semantic Scholar, Crossref,
/// arXiv, IEEE, Web of Science. Each differs only in capability flags and
/// name, so one struct parameterized at construction avoids six near-copies
/// of the same compile logic.
pub struct PlainDialect {
    name: &'static str,
    caps: Capabilities,
}

impl PlainDialect {
    #[must_use]
    pub fn open_alex() -> Self {
        Self {
            name: "openalex",
            caps: Capabilities {
                supports_field_tags: false,
                supports_controlled_vocab: false,
                phrase_quote_char: '"',
                max_query_length: None,
            },
        }
    }

    #[must_use]
    pub fn semantic_scholar() -> Self {
        Self {
            name: "semantic_scholar",
            caps: Capabilities {
                supports_field_tags: false,
                supports_controlled_vocab: false,
                phrase_quote_char: '"',
                max_query_length: None,
            },
        }
    }

    #[must_use]
    pub fn crossref() -> Self {
        Self {
            name: "crossref",
            caps: Capabilities {
                supports_field_tags: false,
                supports_controlled_vocab: false,
                phrase_quote_char: '"',
                max_query_length: None,
            },
        }
    }

    #[must_use]
    pub fn arxiv() -> Self {
        Self {
            name: "arxiv",
            caps: Capabilities {
                supports_field_tags: false,
                supports_controlled_vocab: false,
                phrase_quote_char: '"',
                max_query_length: None,
            },
        }
    }

    #[must_use]
    pub fn ieee() -> Self {
        Self {
            name: "ieee",
            caps: Capabilities {
                supports_field_tags: false,
                supports_controlled_vocab: false,
                phrase_quote_char: '"',
                max_query_length: Some(4096),
            },
        }
    }

    #[must_use]
    pub fn web_of_science() -> Self {
        Self {
            name: "wos",
            caps: Capabilities {
                supports_field_tags: false,
                supports_controlled_vocab: false,
                phrase_quote_char: '"',
                max_query_length: Some(2048),
            },
        }
    }
}

impl Dialect for PlainDialect {
    fn name(&self) -> &'static str {
        self.name
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn compile(&self, plan: &QueryPlan) -> (String, Vec<Warning>) {
        let mut warnings = collect_generic_warnings(plan);
        for block in &plan.blocks {
            for term in &block.terms {
                downgrade_if_unsupported(term, self.caps.supports_controlled_vocab, &mut warnings);
            }
        }

        let groups: Vec<String> = plan
            .blocks
            .iter()
            .map(|b| format_block_plain(b, self.caps.phrase_quote_char))
            .collect();
        let mut compiled = join_and(&groups);

        if let Some(excl) = &plan.exclusion_block {
            if !excl.is_empty() {
                let excl_group = format_block_plain(excl, self.caps.phrase_quote_char);
                compiled = format!("{compiled} NOT {excl_group}");
            }
        }

        check_max_length(&compiled, self.caps.max_query_length, &mut warnings);
        (compiled, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SearchTerm;

    fn disease_drug_plan() -> QueryPlan {
        QueryPlan::new(vec![
            ConceptBlock::new(
                "Disease",
                vec![
                    SearchTerm::new("Heart Attack", FieldTag::Keyword),
                    SearchTerm::new("Myocardial Infarction", FieldTag::ControlledVocab),
                ],
            ),
            ConceptBlock::new("Drug", vec![SearchTerm::new("Aspirin", FieldTag::Keyword)]),
        ])
    }

    #[test]
    fn pubmed_field_tags_and_one_and_one_or() {
        let (s, _warnings) = PubMed.compile(&disease_drug_plan());
        assert!(s.contains("\"Heart Attack\"[Title/Abstract]"));
        assert!(s.contains("\"Myocardial Infarction\"[MeSH Terms]"));
        assert!(s.contains("\"Aspirin\"[Title/Abstract]"));
        assert_eq!(s.matches(" OR ").count(), 1);
        assert_eq!(s.matches(" AND ").count(), 1);
    }

    #[test]
    fn scopus_wraps_one_envelope_per_block() {
        let (s, _warnings) = Scopus.compile(&disease_drug_plan());
        assert!(s.starts_with("TITLE-ABS-KEY("));
        assert_eq!(s.matches("TITLE-ABS-KEY(").count(), 2);
        assert!(s.contains(" AND "));
    }

    #[test]
    fn empty_plan_compiles_to_empty_string_with_warning() {
        let plan = QueryPlan::default();
        let (s, warnings) = PubMed.compile(&plan);
        assert_eq!(s, "");
        assert!(warnings.iter().any(|w| w.message.contains("empty query plan")));
    }

    #[test]
    fn format_is_deterministic() {
        let plan = disease_drug_plan();
        assert_eq!(PubMed.format(&plan), PubMed.format(&plan));
        assert_eq!(Scopus.format(&plan), Scopus.format(&plan));
    }

    #[test]
    fn no_not_token_when_exclusion_absent() {
        let (s, _) = PubMed.compile(&disease_drug_plan());
        assert!(!s.contains("NOT"));
    }

    #[test]
    fn openalex_downgrades_controlled_vocab_with_warning() {
        let plan = disease_drug_plan();
        let (_s, warnings) = PlainDialect::open_alex().compile(&plan);
        assert!(warnings.iter().any(|w| w.message.contains("downgraded")));
    }
}
