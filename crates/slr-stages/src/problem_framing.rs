//! `problem-framing`: turns the approved `ProjectContext` into a problem
//! statement plus a first-pass `ConceptModel` (PICO-style concepts). Both
//! artifacts are produced from one stage run since the concept model is
//! downstream of the same framing work, not an independently approvable
//! unit until the controller says so.

use crate::drafting::{draft_with_fallback, model_metadata};
use crate::heuristics::slug;
use async_trait::async_trait;
use slr_artifact::{AnyArtifact, ArtifactType, Concept, ConceptModel, ConceptType, ProblemFraming, ProjectContext};
use slr_stage_api::{Services, Stage, StageResult};
use slr_utils::error::Result;
use slr_utils::types::ArtifactHeader;

#[derive(Debug, Clone, Default)]
pub struct ProblemFramingStage;

impl ProblemFramingStage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for ProblemFramingStage {
    fn id(&self) -> &'static str {
        "problem-framing"
    }

    fn deps(&self) -> &'static [ArtifactType] {
        &[ArtifactType::ProjectContext]
    }

    fn produces(&self) -> ArtifactType {
        ArtifactType::ProblemFraming
    }

    async fn run(&self, services: &Services, _inputs: Option<serde_json::Value>) -> Result<StageResult> {
        let project_context: ProjectContext = services.require_approved(ArtifactType::ProjectContext)?;

        let prompt = format!(
            "Write a one-paragraph problem statement for a systematic literature review titled '{}': {}",
            project_context.title, project_context.description
        );
        let outcome = draft_with_fallback(services, &prompt, |_| None, || project_context.description.clone()).await;

        let mut header = ArtifactHeader::new(&services.project_id);
        header.model_metadata = Some(model_metadata(&outcome));

        let goals = if project_context.keywords.is_empty() {
            vec!["Characterize the current state of the literature.".to_string()]
        } else {
            project_context
                .keywords
                .iter()
                .map(|k| format!("Understand how the literature addresses {k}."))
                .collect()
        };

        let framing = ProblemFraming {
            header,
            problem_statement: outcome.text,
            goals,
            scope_in: project_context.keywords.clone(),
            scope_out: Vec::new(),
            stakeholders: Vec::new(),
            research_gap: None,
            critique_report: None,
        };

        let concepts: Vec<Concept> = project_context
            .keywords
            .iter()
            .enumerate()
            .map(|(i, keyword)| Concept {
                id: slug(keyword, i),
                label: keyword.clone(),
                concept_type: classify_keyword(keyword),
                description: format!("Concept extracted from the project idea: {keyword}."),
            })
            .collect();

        let concept_model = ConceptModel {
            header: ArtifactHeader::new(&services.project_id),
            concepts,
            relations: Vec::new(),
        };

        Ok(StageResult::success(self.id(), AnyArtifact::ProblemFraming(framing))
            .with_extra_artifacts(vec![AnyArtifact::ConceptModel(concept_model)]))
    }
}

/// Heuristic PICO tagging: a handful of lexical cues decide the concept
/// type; anything unmatched stays `Other` rather than guessing.
fn classify_keyword(keyword: &str) -> ConceptType {
    const POPULATION_CUES: &[&str] = &["patient", "population", "participant", "cohort", "team", "worker"];
    const INTERVENTION_CUES: &[&str] = &["treatment", "intervention", "therapy", "remote", "training", "tool"];
    const OUTCOME_CUES: &[&str] = &["outcome", "performance", "productivity", "satisfaction", "mortality"];
    const METHOD_CUES: &[&str] = &["method", "design", "trial", "survey", "qualitative", "quantitative"];

    if POPULATION_CUES.iter().any(|cue| keyword.contains(cue)) {
        ConceptType::Population
    } else if INTERVENTION_CUES.iter().any(|cue| keyword.contains(cue)) {
        ConceptType::Intervention
    } else if OUTCOME_CUES.iter().any(|cue| keyword.contains(cue)) {
        ConceptType::Outcome
    } else if METHOD_CUES.iter().any(|cue| keyword.contains(cue)) {
        ConceptType::Method
    } else {
        ConceptType::Other
    }
}
