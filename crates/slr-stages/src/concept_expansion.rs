//! `search-concept-expansion`: turns the approved `ConceptModel` and
//! `ResearchQuestionSet` into `SearchConceptBlocks` — one block per
//! concept, seeded with the concept's own label and optionally enriched
//! with LLM-suggested synonyms.

use crate::drafting::{draft_with_fallback, model_metadata};
use crate::heuristics::slug;
use async_trait::async_trait;
use slr_artifact::{AnyArtifact, ArtifactType, ConceptModel, ResearchQuestionSet, SearchConceptBlock, SearchConceptBlocks};
use slr_stage_api::{Services, Stage, StageResult};
use slr_utils::error::Result;
use slr_utils::types::ArtifactHeader;

#[derive(Debug, Clone, Default)]
pub struct SearchConceptExpansionStage;

impl SearchConceptExpansionStage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for SearchConceptExpansionStage {
    fn id(&self) -> &'static str {
        "search-concept-expansion"
    }

    fn deps(&self) -> &'static [ArtifactType] {
        &[ArtifactType::ConceptModel, ArtifactType::ResearchQuestionSet]
    }

    fn produces(&self) -> ArtifactType {
        ArtifactType::SearchConceptBlocks
    }

    async fn run(&self, services: &Services, _inputs: Option<serde_json::Value>) -> Result<StageResult> {
        let concept_model: ConceptModel = services.require_approved(ArtifactType::ConceptModel)?;
        let _questions: ResearchQuestionSet = services.require_approved(ArtifactType::ResearchQuestionSet)?;

        if concept_model.concepts.is_empty() {
            return Ok(StageResult::failure(
                self.id(),
                vec!["cannot expand search terms from an empty concept model".to_string()],
            ));
        }

        let mut blocks = Vec::with_capacity(concept_model.concepts.len());
        let mut last_outcome = None;
        for (i, concept) in concept_model.concepts.iter().enumerate() {
            let prompt = format!("List close synonyms for the search term '{}', comma-separated.", concept.label);
            let outcome = draft_with_fallback(services, &prompt, |_| None, || concept.label.clone()).await;

            let mut terms_included: Vec<String> = outcome
                .text
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            if !terms_included.iter().any(|t| t.eq_ignore_ascii_case(&concept.label)) {
                terms_included.insert(0, concept.label.clone());
            }

            blocks.push(SearchConceptBlock {
                id: slug(&concept.label, i),
                label: concept.label.clone(),
                description: Some(concept.description.clone()),
                terms_included,
                terms_excluded: Vec::new(),
            });
            last_outcome = Some(outcome);
        }

        let mut header = ArtifactHeader::new(&services.project_id);
        if let Some(outcome) = last_outcome {
            header.model_metadata = Some(model_metadata(&outcome));
        }

        let artifact = SearchConceptBlocks { header, blocks };
        Ok(StageResult::success(self.id(), AnyArtifact::SearchConceptBlocks(artifact)))
    }
}
