//! `screening-criteria`: derives inclusion/exclusion criteria from the
//! approved `ConceptModel` and `ProblemFraming`. Deterministic by design —
//! screening criteria gate what literature counts as evidence at all, so
//! this stage never calls the LLM drafter.

use async_trait::async_trait;
use slr_artifact::{AnyArtifact, ArtifactType, ConceptModel, ConceptType, ProblemFraming, ScreeningCriteria};
use slr_stage_api::{Services, Stage, StageResult};
use slr_utils::error::Result;
use slr_utils::types::ArtifactHeader;

#[derive(Debug, Clone, Default)]
pub struct ScreeningCriteriaStage;

impl ScreeningCriteriaStage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for ScreeningCriteriaStage {
    fn id(&self) -> &'static str {
        "screening-criteria"
    }

    fn deps(&self) -> &'static [ArtifactType] {
        &[ArtifactType::ConceptModel, ArtifactType::ProblemFraming]
    }

    fn produces(&self) -> ArtifactType {
        ArtifactType::ScreeningCriteria
    }

    async fn run(&self, services: &Services, _inputs: Option<serde_json::Value>) -> Result<StageResult> {
        let concept_model: ConceptModel = services.require_approved(ArtifactType::ConceptModel)?;
        let framing: ProblemFraming = services.require_approved(ArtifactType::ProblemFraming)?;

        if concept_model.concepts.is_empty() {
            return Ok(StageResult::failure(
                self.id(),
                vec!["cannot derive screening criteria from an empty concept model".to_string()],
            ));
        }

        let mut inclusion_criteria: Vec<String> = concept_model
            .concepts
            .iter()
            .map(|c| match c.concept_type {
                ConceptType::Population => format!("Studies involving {} as the population of interest.", c.label),
                ConceptType::Intervention => format!("Studies that examine {} as an intervention or exposure.", c.label),
                ConceptType::Outcome => format!("Studies that report {} as a measured outcome.", c.label),
                ConceptType::Comparison => format!("Studies that compare against {}.", c.label),
                ConceptType::Method => format!("Studies employing a {} methodology.", c.label),
                ConceptType::Context => format!("Studies situated in the {} context.", c.label),
                ConceptType::Other => format!("Studies substantively addressing {}.", c.label),
            })
            .collect();
        inclusion_criteria.push("Peer-reviewed or preprint full text available in English.".to_string());
        if !framing.goals.is_empty() {
            inclusion_criteria.push(format!("Studies relevant to: {}", framing.goals.join("; ")));
        }

        let mut exclusion_criteria = vec![
            "Non-English-language publications.".to_string(),
            "Duplicate or superseded publications of an already-included study.".to_string(),
        ];
        exclusion_criteria.extend(
            framing
                .scope_out
                .iter()
                .map(|scope| format!("Studies that are primarily about {scope}.")),
        );

        let header = ArtifactHeader::new(&services.project_id);
        let artifact = ScreeningCriteria {
            header,
            inclusion_criteria,
            exclusion_criteria,
        };

        Ok(StageResult::success(self.id(), AnyArtifact::ScreeningCriteria(artifact)))
    }
}
