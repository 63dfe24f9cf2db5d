//! `strategy-export`: the pipeline's terminal stage. Consumes every
//! approved core artifact plus, best-effort, the `SearchResults` produced
//! by `query-execution`, and writes the CSV/BibTeX/RIS/Markdown bundle via
//! `slr_export::export_bundle`.

use async_trait::async_trait;
use slr_artifact::{
    AnyArtifact, ArtifactType, ConceptModel, DatabaseQueryPlan, Document, ProblemFraming,
    ProjectContext, ResearchQuestionSet, ScreeningCriteria, SearchResults, StrategyExportBundle,
};
use slr_export::{BundleInputs, export_bundle};
use slr_stage_api::{Services, Stage, StageResult};
use slr_utils::error::Result;
use slr_utils::types::ArtifactHeader;

#[derive(Debug, Clone, Default)]
pub struct StrategyExportStage;

impl StrategyExportStage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for StrategyExportStage {
    fn id(&self) -> &'static str {
        "strategy-export"
    }

    fn deps(&self) -> &'static [ArtifactType] {
        &[
            ArtifactType::ProjectContext,
            ArtifactType::ProblemFraming,
            ArtifactType::ConceptModel,
            ArtifactType::ResearchQuestionSet,
            ArtifactType::DatabaseQueryPlan,
            ArtifactType::ScreeningCriteria,
        ]
    }

    fn produces(&self) -> ArtifactType {
        ArtifactType::StrategyExportBundle
    }

    async fn run(&self, services: &Services, _inputs: Option<serde_json::Value>) -> Result<StageResult> {
        let project_context: ProjectContext = services.require_approved(ArtifactType::ProjectContext)?;
        let problem_framing: ProblemFraming = services.require_approved(ArtifactType::ProblemFraming)?;
        let concept_model: ConceptModel = services.require_approved(ArtifactType::ConceptModel)?;
        let research_questions: ResearchQuestionSet = services.require_approved(ArtifactType::ResearchQuestionSet)?;
        let query_plan: DatabaseQueryPlan = services.require_approved(ArtifactType::DatabaseQueryPlan)?;
        let screening_criteria: ScreeningCriteria = services.require_approved(ArtifactType::ScreeningCriteria)?;

        let search_results: Option<SearchResults> =
            services.store.load(&services.project_id, ArtifactType::SearchResults).ok();

        let mut documents = Vec::new();
        let mut warnings = Vec::new();
        if let Some(results) = &search_results {
            match read_documents(results) {
                Ok(docs) => documents = docs,
                Err(e) => warnings.push(format!("search results could not be read from disk: {e}")),
            }
        } else {
            warnings.push("no search results artifact found; exporting strategy without documents".to_string());
        }

        let inputs = BundleInputs {
            project_title: &project_context.title,
            documents: &documents,
            problem_framing: Some(&problem_framing),
            concept_model: Some(&concept_model),
            research_questions: Some(&research_questions),
            query_plan: Some(&query_plan),
            search_results: search_results.as_ref(),
            screening_criteria: Some(&screening_criteria),
        };

        let exported_files = export_bundle(&services.config.base_dir, &services.project_id, &inputs)?;

        let header = ArtifactHeader::new(&services.project_id);
        let artifact = StrategyExportBundle {
            header,
            exported_files,
            notes: if documents.is_empty() {
                Some("exported without a document set; run query-execution first for a complete bundle".to_string())
            } else {
                None
            },
        };

        Ok(StageResult::success(self.id(), AnyArtifact::StrategyExportBundle(artifact)).with_warnings(warnings))
    }
}

/// The most recently written result file wins: the deduplicated file, if
/// `SearchResults.result_file_paths` has one, otherwise the last
/// per-provider file.
fn read_documents(results: &SearchResults) -> std::result::Result<Vec<Document>, std::io::Error> {
    let Some(path) = results.result_file_paths.last() else {
        return Ok(Vec::new());
    };
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use slr_artifact::ArtifactStore;
    use slr_config::builder::test_config;
    use slr_providers::ProviderRegistry;
    use slr_query::{ComplexityAnalysis, ComplexityLevel};
    use slr_utils::types::ApprovalStatus;
    use std::sync::Arc;

    fn approved_services(dir: &std::path::Path) -> Services {
        let store = Arc::new(ArtifactStore::new(dir.to_str().unwrap()));

        let mut ctx_header = ArtifactHeader::new("proj-1");
        ctx_header.status = ApprovalStatus::Approved;
        let ctx = ProjectContext {
            header: ctx_header,
            title: "Remote Work Study".to_string(),
            description: "d".to_string(),
            discipline: String::new(),
            keywords: vec![],
            user_notes: None,
        };
        store.save("proj-1", ArtifactType::ProjectContext, &ctx).unwrap();

        let mut framing_header = ArtifactHeader::new("proj-1");
        framing_header.status = ApprovalStatus::Approved;
        let framing = ProblemFraming {
            header: framing_header,
            problem_statement: "stmt".to_string(),
            goals: vec![],
            scope_in: vec![],
            scope_out: vec![],
            stakeholders: vec![],
            research_gap: None,
            critique_report: None,
        };
        store.save("proj-1", ArtifactType::ProblemFraming, &framing).unwrap();

        let mut concept_header = ArtifactHeader::new("proj-1");
        concept_header.status = ApprovalStatus::Approved;
        let concept_model = ConceptModel { header: concept_header, concepts: vec![], relations: vec![] };
        store.save("proj-1", ArtifactType::ConceptModel, &concept_model).unwrap();

        let mut rq_header = ArtifactHeader::new("proj-1");
        rq_header.status = ApprovalStatus::Approved;
        let questions = ResearchQuestionSet { header: rq_header, questions: vec![] };
        store.save("proj-1", ArtifactType::ResearchQuestionSet, &questions).unwrap();

        let mut query_header = ArtifactHeader::new("proj-1");
        query_header.status = ApprovalStatus::Approved;
        let query_plan = DatabaseQueryPlan {
            header: query_header,
            queries: vec![slr_artifact::DatabaseQuery {
                id: "q-1".to_string(),
                database_name: "pubmed".to_string(),
                query_blocks: vec!["remote work".to_string()],
                boolean_query_string: "remote work".to_string(),
                notes: None,
                hit_count_estimate: None,
                complexity_analysis: ComplexityAnalysis {
                    level: ComplexityLevel::Broad,
                    total_terms: 1,
                    num_blocks: 1,
                    expected_results: "1k-10k".to_string(),
                    guidance: String::new(),
                    warnings: vec![],
                },
            }],
        };
        store.save("proj-1", ArtifactType::DatabaseQueryPlan, &query_plan).unwrap();

        let mut screening_header = ArtifactHeader::new("proj-1");
        screening_header.status = ApprovalStatus::Approved;
        let screening = ScreeningCriteria {
            header: screening_header,
            inclusion_criteria: vec!["inc".to_string()],
            exclusion_criteria: vec!["exc".to_string()],
        };
        store.save("proj-1", ArtifactType::ScreeningCriteria, &screening).unwrap();

        let config = test_config(camino::Utf8PathBuf::from_path_buf(dir.to_path_buf()).unwrap());
        Services::new("proj-1", config, store, None, Arc::new(ProviderRegistry::default()))
    }

    #[tokio::test]
    async fn exports_bundle_without_search_results() {
        let dir = tempfile::tempdir().unwrap();
        let stage = StrategyExportStage::new();
        let result = stage.run(&approved_services(dir.path()), None).await.unwrap();
        match result.draft_artifact {
            Some(AnyArtifact::StrategyExportBundle(bundle)) => {
                assert!(bundle.exported_files.iter().any(|p| p.ends_with("protocol.md")));
                assert!(bundle.notes.is_some());
            }
            _ => panic!("expected a StrategyExportBundle draft"),
        }
        assert!(!result.warnings.is_empty());
    }
}
