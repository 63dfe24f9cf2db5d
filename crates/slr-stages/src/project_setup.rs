//! `project-setup`: the pipeline's entry point. Takes a raw idea (no
//! upstream dependencies) and produces the root `ProjectContext` every
//! other stage eventually traces back to.

use crate::drafting::{draft_with_fallback, model_metadata};
use crate::heuristics::{derive_title, extract_keywords};
use async_trait::async_trait;
use slr_artifact::{AnyArtifact, ArtifactType, ProjectContext};
use slr_stage_api::{Services, Stage, StageResult};
use slr_utils::error::Result;
use slr_utils::types::ArtifactHeader;

#[derive(Debug, Clone, Default)]
pub struct ProjectSetupStage;

impl ProjectSetupStage {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for ProjectSetupStage {
    fn id(&self) -> &'static str {
        "project-setup"
    }

    fn deps(&self) -> &'static [ArtifactType] {
        &[]
    }

    fn produces(&self) -> ArtifactType {
        ArtifactType::ProjectContext
    }

    async fn run(&self, services: &Services, inputs: Option<serde_json::Value>) -> Result<StageResult> {
        let inputs = inputs.unwrap_or(serde_json::Value::Null);
        let idea = inputs
            .get("idea")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let Some(idea) = idea else {
            return Ok(StageResult::failure(
                self.id(),
                vec!["project-setup requires a non-empty 'idea' string in inputs".to_string()],
            ));
        };

        let title = inputs
            .get("title")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| derive_title(idea, 8));

        let discipline = inputs
            .get("discipline")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .unwrap_or_default();

        let prompt = format!(
            "Expand this rough systematic-literature-review idea into a one-paragraph project description. Idea: {idea}"
        );
        let outcome = draft_with_fallback(services, &prompt, |_| None, || idea.to_string()).await;

        let keywords = extract_keywords(idea, 10);

        let mut header = ArtifactHeader::new(&services.project_id);
        header.model_metadata = Some(model_metadata(&outcome));

        let artifact = ProjectContext {
            header,
            title,
            description: outcome.text,
            discipline,
            keywords,
            user_notes: inputs
                .get("user_notes")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
        };

        Ok(StageResult::success(self.id(), AnyArtifact::ProjectContext(artifact)))
    }
}
