//! The eight concrete pipeline stages (§4.6): each is a thin `Stage` impl
//! that loads its declared upstream dependencies through
//! `Services::require_approved`, does its work (deterministically, or via
//! the LLM drafter with a deterministic fallback), and returns a
//! `StageResult` for the orchestrator to persist. No stage writes to the
//! artifact store itself.

mod concept_expansion;
mod drafting;
mod heuristics;
mod problem_framing;
mod project_setup;
mod query_execution;
mod query_plan;
mod research_questions;
mod screening_criteria;
mod strategy_export;

pub use concept_expansion::SearchConceptExpansionStage;
pub use problem_framing::ProblemFramingStage;
pub use project_setup::ProjectSetupStage;
pub use query_execution::QueryExecutionStage;
pub use query_plan::DatabaseQueryPlanStage;
pub use research_questions::ResearchQuestionsStage;
pub use screening_criteria::ScreeningCriteriaStage;
pub use strategy_export::StrategyExportStage;

use slr_stage_api::Stage;
use std::sync::Arc;

/// All eight stages, in pipeline order, boxed for the orchestrator's
/// stage-name lookup table.
#[must_use]
pub fn all_stages() -> Vec<Arc<dyn Stage>> {
    vec![
        Arc::new(ProjectSetupStage::new()),
        Arc::new(ProblemFramingStage::new()),
        Arc::new(ResearchQuestionsStage::new()),
        Arc::new(SearchConceptExpansionStage::new()),
        Arc::new(DatabaseQueryPlanStage::new()),
        Arc::new(QueryExecutionStage::new()),
        Arc::new(ScreeningCriteriaStage::new()),
        Arc::new(StrategyExportStage::new()),
    ]
}
