//! `database-query-plan`: compiles the approved `SearchConceptBlocks` into
//! one Boolean query string per target database, using [`DialectRegistry`]
//! and attaching a [`ComplexityAnalysis`] to each.

use async_trait::async_trait;
use slr_artifact::{AnyArtifact, ArtifactType, DatabaseQuery, DatabaseQueryPlan, SearchConceptBlocks};
use slr_query::{ComplexityAnalysis, ConceptBlock, DialectRegistry, FieldTag, QueryPlan, SearchTerm, analyze_with_dialect};
use slr_stage_api::{Services, Stage, StageResult};
use slr_utils::error::Result;
use slr_utils::types::ArtifactHeader;

const DEFAULT_DATABASES: &[&str] = &[
    "pubmed",
    "scopus",
    "openalex",
    "arxiv",
    "wos",
    "ieee",
    "crossref",
    "semantic_scholar",
];

#[derive(Debug, Clone, Default)]
pub struct DatabaseQueryPlanStage;

impl DatabaseQueryPlanStage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for DatabaseQueryPlanStage {
    fn id(&self) -> &'static str {
        "database-query-plan"
    }

    fn deps(&self) -> &'static [ArtifactType] {
        &[ArtifactType::SearchConceptBlocks]
    }

    fn produces(&self) -> ArtifactType {
        ArtifactType::DatabaseQueryPlan
    }

    async fn run(&self, services: &Services, inputs: Option<serde_json::Value>) -> Result<StageResult> {
        let concept_blocks: SearchConceptBlocks = services.require_approved(ArtifactType::SearchConceptBlocks)?;

        if concept_blocks.blocks.is_empty() {
            return Ok(StageResult::failure(
                self.id(),
                vec!["cannot compile a query plan from empty search concept blocks".to_string()],
            ));
        }

        let databases: Vec<String> = inputs
            .as_ref()
            .and_then(|v| v.get("databases"))
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .filter(|v: &Vec<String>| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASES.iter().map(|s| (*s).to_string()).collect());

        let plan = to_query_plan(&concept_blocks);
        let registry = DialectRegistry::new();

        let mut queries = Vec::with_capacity(databases.len());
        let mut warnings = Vec::new();
        for (i, database_name) in databases.iter().enumerate() {
            let dialect = match registry.get(database_name) {
                Ok(d) => d,
                Err(e) => {
                    warnings.push(e.to_string());
                    continue;
                }
            };

            let (boolean_query_string, compile_warnings) = dialect.compile(&plan);
            let complexity_analysis: ComplexityAnalysis = analyze_with_dialect(&plan, dialect);

            queries.push(DatabaseQuery {
                id: format!("{database_name}-{i}"),
                database_name: database_name.clone(),
                query_blocks: concept_blocks.blocks.iter().map(|b| b.label.clone()).collect(),
                boolean_query_string,
                notes: if compile_warnings.is_empty() {
                    None
                } else {
                    Some(compile_warnings.iter().map(|w| w.message.clone()).collect::<Vec<_>>().join("; "))
                },
                hit_count_estimate: None,
                complexity_analysis,
            });
        }

        if queries.is_empty() {
            return Ok(StageResult::failure(
                self.id(),
                vec!["none of the requested databases are recognized dialects".to_string()],
            ));
        }

        let header = ArtifactHeader::new(&services.project_id);
        let artifact = DatabaseQueryPlan { header, queries };

        Ok(StageResult::success(self.id(), AnyArtifact::DatabaseQueryPlan(artifact)).with_warnings(warnings))
    }
}

fn to_query_plan(concept_blocks: &SearchConceptBlocks) -> QueryPlan {
    let blocks = concept_blocks
        .blocks
        .iter()
        .map(|b| {
            let terms = b
                .terms_included
                .iter()
                .map(|t| SearchTerm::new(t, FieldTag::Keyword))
                .collect();
            ConceptBlock::new(b.label.clone(), terms)
        })
        .collect();
    QueryPlan::new(blocks)
}
