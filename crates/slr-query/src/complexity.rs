//! Complexity Analyzer: a pure function from a `QueryPlan` to a complexity
//! level, an expected-results bucket, human guidance, and warnings.

use crate::dialect::Dialect;
use crate::model::QueryPlan;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    VeryBroad,
    Broad,
    Balanced,
    Narrow,
    VeryNarrow,
}

impl ComplexityLevel {
    #[must_use]
    pub fn expected_results_bucket(self) -> &'static str {
        match self {
            Self::VeryBroad => "> 10k",
            Self::Broad => "1k\u{2013}10k",
            Self::Balanced => "100\u{2013}1k",
            Self::Narrow => "10\u{2013}100",
            Self::VeryNarrow => "< 10",
        }
    }

    #[must_use]
    pub fn guidance(self) -> &'static str {
        match self {
            Self::VeryBroad => {
                "Very broad query: expect a large, noisy result set. Consider adding more concept blocks."
            }
            Self::Broad => "Broad query: results will be numerous. Consider narrowing key concepts.",
            Self::Balanced => "Balanced query: a reasonable trade-off between recall and precision.",
            Self::Narrow => "Narrow query: results are selective. Verify important terms aren't excluded.",
            Self::VeryNarrow => {
                "Very narrow query: results may be too sparse. Consider broadening term coverage."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityAnalysis {
    pub level: ComplexityLevel,
    pub total_terms: usize,
    pub num_blocks: usize,
    pub expected_results: String,
    pub guidance: String,
    pub warnings: Vec<String>,
}

/// Classify a plan's complexity.
///
/// The five level predicates in the spec overlap (e.g. both `very_broad`'s
/// `T < 4` and `broad`'s `T < 8` can be true at once); "tie-breaks lean to
/// the broader side" is implemented as a priority order that checks
/// `very_narrow`'s strict AND-condition first (it is the only predicate
/// that can't be satisfied by a broader level), then the broad-leaning
/// single-condition escapes (`B <= 1`, `T < 4`), then the remaining levels
/// narrowest-first.
#[must_use]
pub fn classify(plan: &QueryPlan) -> ComplexityLevel {
    let t = plan.total_terms();
    let b = plan.num_blocks();
    let avg = if b > 0 { t as f64 / b as f64 } else { 0.0 };

    if b >= 7 && t > 40 {
        return ComplexityLevel::VeryNarrow;
    }
    if b <= 1 {
        return ComplexityLevel::VeryBroad;
    }
    if t < 4 {
        return ComplexityLevel::VeryBroad;
    }
    if (b >= 4 && t > 25) || b >= 6 {
        return ComplexityLevel::Narrow;
    }
    if (3..=5).contains(&b) && (8..=25).contains(&t) {
        return ComplexityLevel::Balanced;
    }
    if (b == 2 && avg >= 3.0) || t < 8 {
        return ComplexityLevel::Broad;
    }
    ComplexityLevel::Balanced
}

fn base_warnings(plan: &QueryPlan) -> Vec<String> {
    let mut warnings = Vec::new();
    if let Some(excl) = &plan.exclusion_block {
        if excl.terms.len() > 2 {
            warnings.push(format!(
                "exclusion block has {} terms (> 2 NOT terms)",
                excl.terms.len()
            ));
        }
    }
    for block in &plan.blocks {
        if block.is_empty() {
            warnings.push(format!("block '{}' has only excluded terms", block.label));
        }
        for term in &block.terms {
            if term.text.chars().count() > 100 {
                warnings.push(format!("term in block '{}' exceeds 100 characters", block.label));
            }
        }
    }
    warnings
}

/// Analyze a plan without dialect-specific length checks.
#[must_use]
pub fn analyze(plan: &QueryPlan) -> ComplexityAnalysis {
    let level = classify(plan);
    ComplexityAnalysis {
        level,
        total_terms: plan.total_terms(),
        num_blocks: plan.num_blocks(),
        expected_results: level.expected_results_bucket().to_string(),
        guidance: level.guidance().to_string(),
        warnings: base_warnings(plan),
    }
}

/// Analyze a plan together with the dialect it will be compiled for, so the
/// `max_query_length` warning can be checked.
#[must_use]
pub fn analyze_with_dialect(plan: &QueryPlan, dialect: &dyn Dialect) -> ComplexityAnalysis {
    let mut analysis = analyze(plan);
    let (compiled, dialect_warnings) = dialect.compile(plan);
    analysis
        .warnings
        .extend(dialect_warnings.into_iter().map(|w| w.message));
    if let Some(max) = dialect.capabilities().max_query_length {
        if compiled.len() > max {
            analysis.warnings.push(format!(
                "compiled query ({} chars) exceeds {}'s max length ({max})",
                compiled.len(),
                dialect.name()
            ));
        }
    }
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConceptBlock, FieldTag, SearchTerm};

    fn block_with_n_terms(label: &str, n: usize) -> ConceptBlock {
        let terms = (0..n)
            .map(|i| SearchTerm::new(format!("term{i}"), FieldTag::Keyword))
            .collect();
        ConceptBlock::new(label, terms)
    }

    #[test]
    fn one_block_three_terms_is_very_broad() {
        let plan = QueryPlan::new(vec![block_with_n_terms("a", 3)]);
        assert_eq!(classify(&plan), ComplexityLevel::VeryBroad);
    }

    #[test]
    fn four_blocks_fourteen_terms_is_balanced() {
        let plan = QueryPlan::new(vec![
            block_with_n_terms("a", 4),
            block_with_n_terms("b", 4),
            block_with_n_terms("c", 3),
            block_with_n_terms("d", 3),
        ]);
        assert_eq!(plan.total_terms(), 14);
        assert_eq!(classify(&plan), ComplexityLevel::Balanced);
    }

    #[test]
    fn seven_blocks_fortyfive_terms_is_very_narrow() {
        let mut blocks = Vec::new();
        for i in 0..6 {
            blocks.push(block_with_n_terms(&format!("b{i}"), 6));
        }
        blocks.push(block_with_n_terms("b6", 9));
        let plan = QueryPlan::new(blocks);
        assert_eq!(plan.num_blocks(), 7);
        assert_eq!(plan.total_terms(), 45);
        assert_eq!(classify(&plan), ComplexityLevel::VeryNarrow);
    }
}
