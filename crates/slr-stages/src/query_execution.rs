//! `query-execution`: runs the approved `DatabaseQueryPlan` against the
//! live provider registry through [`SearchExecutor`] and returns the
//! resulting `SearchResults`.

use async_trait::async_trait;
use slr_artifact::{AnyArtifact, ArtifactType, DatabaseQueryPlan};
use slr_executor::{ExecutorConfig, SearchExecutor};
use slr_stage_api::{Services, Stage, StageResult};
use slr_utils::error::Result;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct QueryExecutionStage;

impl QueryExecutionStage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for QueryExecutionStage {
    fn id(&self) -> &'static str {
        "query-execution"
    }

    fn deps(&self) -> &'static [ArtifactType] {
        &[ArtifactType::DatabaseQueryPlan]
    }

    fn produces(&self) -> ArtifactType {
        ArtifactType::SearchResults
    }

    async fn run(&self, services: &Services, _inputs: Option<serde_json::Value>) -> Result<StageResult> {
        let query_plan: DatabaseQueryPlan = services.require_approved(ArtifactType::DatabaseQueryPlan)?;

        if query_plan.queries.is_empty() {
            return Ok(StageResult::failure(
                self.id(),
                vec!["cannot execute an empty database query plan".to_string()],
            ));
        }

        let executor = SearchExecutor::with_registry(services.providers.clone(), services.config.base_dir.clone());
        let settings = &services.config.executor;
        let config = ExecutorConfig {
            max_results_per_db: settings.max_results_per_db,
            auto_deduplicate: services.config.dedup.enabled,
            concurrency: settings.concurrency,
            per_call_timeout: Duration::from_secs(settings.per_call_timeout_seconds),
            overall_timeout: Duration::from_secs(settings.overall_timeout_seconds),
        };

        let results = executor
            .execute(&services.project_id, &query_plan.queries, config, CancellationToken::new())
            .await?;

        let warnings = results.warnings.iter().map(|w| format!("{}: {}", w.database, w.message)).collect();

        Ok(StageResult::success(self.id(), AnyArtifact::SearchResults(results)).with_warnings(warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slr_artifact::{ArtifactStore, ComplexityAnalysis, DatabaseQuery};
    use slr_config::builder::test_config;
    use slr_providers::ProviderRegistry;
    use slr_query::ComplexityLevel;
    use slr_utils::types::{ApprovalStatus, ArtifactHeader};
    use std::sync::Arc;

    fn approved_services(dir: &std::path::Path) -> Services {
        let store = Arc::new(ArtifactStore::new(dir.to_str().unwrap()));
        let mut header = ArtifactHeader::new("proj-1");
        header.status = ApprovalStatus::Approved;
        let plan = DatabaseQueryPlan {
            header,
            queries: vec![DatabaseQuery {
                id: "q-1".to_string(),
                database_name: "not-a-real-database".to_string(),
                query_blocks: vec![],
                boolean_query_string: "(a) AND (b)".to_string(),
                notes: None,
                hit_count_estimate: None,
                complexity_analysis: ComplexityAnalysis {
                    level: ComplexityLevel::Balanced,
                    total_terms: 2,
                    num_blocks: 1,
                    expected_results: "100-1k".to_string(),
                    guidance: String::new(),
                    warnings: vec![],
                },
            }],
        };
        store.save("proj-1", ArtifactType::DatabaseQueryPlan, &plan).unwrap();

        let config = test_config(camino::Utf8PathBuf::from_path_buf(dir.to_path_buf()).unwrap());
        Services::new("proj-1", config, store, None, Arc::new(ProviderRegistry::default()))
    }

    #[tokio::test]
    async fn errors_when_no_executable_providers_match() {
        let dir = tempfile::tempdir().unwrap();
        let stage = QueryExecutionStage::new();
        let err = stage.run(&approved_services(dir.path()), None).await.unwrap_err();
        assert!(matches!(err, slr_utils::error::SlrError::Validation(_)));
    }
}
