//! `research-questions`: derives a `ResearchQuestionSet` from the approved
//! `ProblemFraming` and `ConceptModel`, linking each question back to the
//! concepts it's about.

use crate::drafting::{draft_with_fallback, model_metadata};
use crate::heuristics::slug;
use async_trait::async_trait;
use slr_artifact::{AnyArtifact, ArtifactType, ConceptModel, ProblemFraming, ResearchQuestion};
use slr_artifact::{QuestionPriority, QuestionType, ResearchQuestionSet};
use slr_stage_api::{Services, Stage, StageResult};
use slr_utils::error::Result;
use slr_utils::types::ArtifactHeader;

#[derive(Debug, Clone, Default)]
pub struct ResearchQuestionsStage;

impl ResearchQuestionsStage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for ResearchQuestionsStage {
    fn id(&self) -> &'static str {
        "research-questions"
    }

    fn deps(&self) -> &'static [ArtifactType] {
        &[ArtifactType::ProblemFraming, ArtifactType::ConceptModel]
    }

    fn produces(&self) -> ArtifactType {
        ArtifactType::ResearchQuestionSet
    }

    async fn run(&self, services: &Services, _inputs: Option<serde_json::Value>) -> Result<StageResult> {
        let framing: ProblemFraming = services.require_approved(ArtifactType::ProblemFraming)?;
        let concept_model: ConceptModel = services.require_approved(ArtifactType::ConceptModel)?;

        if concept_model.concepts.is_empty() {
            return Ok(StageResult::failure(
                self.id(),
                vec!["cannot derive research questions from an empty concept model".to_string()],
            ));
        }

        let prompt = format!(
            "Given the problem statement '{}', phrase one research question per concept.",
            framing.problem_statement
        );
        let outcome = draft_with_fallback(services, &prompt, |_| None, || framing.problem_statement.clone()).await;

        let questions: Vec<ResearchQuestion> = concept_model
            .concepts
            .iter()
            .enumerate()
            .map(|(i, concept)| ResearchQuestion {
                id: slug(&format!("rq-{}", concept.label), i),
                text: format!("How does {} relate to the outcomes described in this review?", concept.label),
                question_type: QuestionType::Descriptive,
                linked_concept_ids: vec![concept.id.clone()],
                priority: if i == 0 { QuestionPriority::Must } else { QuestionPriority::Nice },
                methodological_lens: None,
            })
            .collect();

        let mut header = ArtifactHeader::new(&services.project_id);
        header.model_metadata = Some(model_metadata(&outcome));

        let question_set = ResearchQuestionSet { header, questions };

        Ok(StageResult::success(self.id(), AnyArtifact::ResearchQuestionSet(question_set)))
    }
}
