//! Artifact payload types from the data model: one struct per artifact
//! type, each embedding the shared header via `#[serde(flatten)]` rather
//! than inheriting from a base class.

use serde::{Deserialize, Serialize};
use slr_query::ComplexityAnalysis;
use slr_utils::types::ArtifactHeader;

/// The set of artifact types the store recognizes, also used as the
/// on-disk filename stem (`artifacts/<name>.json`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ArtifactType {
    ProjectContext,
    ProblemFraming,
    ConceptModel,
    ResearchQuestionSet,
    SearchConceptBlocks,
    DatabaseQueryPlan,
    SearchResults,
    ScreeningCriteria,
    StrategyExportBundle,
}

impl ArtifactType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectContext => "ProjectContext",
            Self::ProblemFraming => "ProblemFraming",
            Self::ConceptModel => "ConceptModel",
            Self::ResearchQuestionSet => "ResearchQuestionSet",
            Self::SearchConceptBlocks => "SearchConceptBlocks",
            Self::DatabaseQueryPlan => "DatabaseQueryPlan",
            Self::SearchResults => "SearchResults",
            Self::ScreeningCriteria => "ScreeningCriteria",
            Self::StrategyExportBundle => "StrategyExportBundle",
        }
    }

    #[must_use]
    pub fn all() -> &'static [ArtifactType] {
        &[
            Self::ProjectContext,
            Self::ProblemFraming,
            Self::ConceptModel,
            Self::ResearchQuestionSet,
            Self::SearchConceptBlocks,
            Self::DatabaseQueryPlan,
            Self::SearchResults,
            Self::ScreeningCriteria,
            Self::StrategyExportBundle,
        ]
    }
}

/// Error returned by [`ArtifactType::from_str`] for an unrecognized name.
#[derive(Debug, Clone)]
pub struct UnknownArtifactType(pub String);

impl std::fmt::Display for UnknownArtifactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized artifact type '{}'", self.0)
    }
}

impl std::error::Error for UnknownArtifactType {}

impl std::str::FromStr for ArtifactType {
    type Err = UnknownArtifactType;

    /// Accepts both the canonical `PascalCase` name and the stage-glue
    /// `kebab-case`/`snake_case` spellings a CLI flag is likely to carry.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace(['-', '_'], "").to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|ty| ty.as_str().to_lowercase() == normalized)
            .ok_or_else(|| UnknownArtifactType(s.to_string()))
    }
}

impl std::fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptType {
    Population,
    Intervention,
    Comparison,
    Outcome,
    Method,
    Context,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub concept_type: ConceptType,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptRelation {
    pub source_id: String,
    pub target_id: String,
    pub relation_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Descriptive,
    Explanatory,
    Evaluative,
    Design,
    Predictive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionPriority {
    Must,
    Nice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchQuestion {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub linked_concept_ids: Vec<String>,
    pub priority: QuestionPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methodological_lens: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConceptBlock {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub terms_included: Vec<String>,
    #[serde(default)]
    pub terms_excluded: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseQuery {
    pub id: String,
    pub database_name: String,
    pub query_blocks: Vec<String>,
    pub boolean_query_string: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_count_estimate: Option<u64>,
    pub complexity_analysis: ComplexityAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeduplicationStats {
    pub original_count: usize,
    pub duplicates_removed: usize,
    pub rate: f64,
}

/// A normalized search result, common across every provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation_count: Option<u64>,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arxiv_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pubmed_id: Option<String>,
    pub fingerprint: String,
}

impl Document {
    /// `lowercase(title) || "|" || first_author_surname || "|" || year`,
    /// with punctuation stripped and whitespace collapsed -- the
    /// deduplication key of last resort.
    #[must_use]
    pub fn compute_fingerprint(title: &str, first_author: &str, year: Option<i32>) -> String {
        let surname = first_author
            .split_whitespace()
            .last()
            .unwrap_or(first_author);
        let year_str = year.map_or_else(String::new, |y| y.to_string());
        let raw = format!("{title}|{surname}|{year_str}");
        normalize_for_fingerprint(&raw)
    }
}

fn normalize_for_fingerprint(s: &str) -> String {
    let lowered = s.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '|')
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderWarning {
    pub database: String,
    pub message: String,
}

// ---------------------------------------------------------------------
// Artifact payloads — each embeds the shared header via `#[serde(flatten)]`
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectContext {
    #[serde(flatten)]
    pub header: ArtifactHeader,
    pub title: String,
    pub description: String,
    pub discipline: String,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemFraming {
    #[serde(flatten)]
    pub header: ArtifactHeader,
    pub problem_statement: String,
    pub goals: Vec<String>,
    pub scope_in: Vec<String>,
    pub scope_out: Vec<String>,
    pub stakeholders: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_gap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critique_report: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptModel {
    #[serde(flatten)]
    pub header: ArtifactHeader,
    pub concepts: Vec<Concept>,
    pub relations: Vec<ConceptRelation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchQuestionSet {
    #[serde(flatten)]
    pub header: ArtifactHeader,
    pub questions: Vec<ResearchQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConceptBlocks {
    #[serde(flatten)]
    pub header: ArtifactHeader,
    pub blocks: Vec<SearchConceptBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseQueryPlan {
    #[serde(flatten)]
    pub header: ArtifactHeader,
    pub queries: Vec<DatabaseQuery>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(flatten)]
    pub header: ArtifactHeader,
    pub total_results: usize,
    pub deduplicated_count: usize,
    pub databases_searched: Vec<String>,
    pub result_file_paths: Vec<String>,
    pub deduplication_stats: DeduplicationStats,
    pub execution_time_seconds: f64,
    #[serde(default)]
    pub warnings: Vec<ProviderWarning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningCriteria {
    #[serde(flatten)]
    pub header: ArtifactHeader,
    pub inclusion_criteria: Vec<String>,
    pub exclusion_criteria: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyExportBundle {
    #[serde(flatten)]
    pub header: ArtifactHeader,
    pub exported_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_case_and_punctuation_insensitive() {
        let a = Document::compute_fingerprint("Deep Learning!", "Jane Doe", Some(2020));
        let b = Document::compute_fingerprint("deep learning", "Doe", Some(2020));
        assert_eq!(a, b);
    }

    #[test]
    fn artifact_type_round_trips_through_str() {
        for t in ArtifactType::all() {
            assert_eq!(t.as_str(), t.to_string());
        }
    }

    #[test]
    fn artifact_type_parses_kebab_case_from_cli_flags() {
        use std::str::FromStr;
        assert_eq!(
            ArtifactType::from_str("database-query-plan").unwrap(),
            ArtifactType::DatabaseQueryPlan
        );
        assert_eq!(
            ArtifactType::from_str("ProjectContext").unwrap(),
            ArtifactType::ProjectContext
        );
        assert!(ArtifactType::from_str("not-a-type").is_err());
    }
}
