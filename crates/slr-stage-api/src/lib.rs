//! The shared contract every pipeline stage implements (§4.6).
//!
//! Grounded on the teacher's `Phase` trait (`id()`, `deps()`, `run()`):
//! each stage declares the artifact types it reads, and the id it's
//! registered under, and runs as a pure function over [`Services`] plus
//! optional free-form inputs, returning a [`StageResult`]. Stages never
//! write to the artifact store themselves — the orchestrator persists
//! `draft_artifact` after a successful run, so a stage that panics or
//! returns an error can never leave a half-written artifact behind.

use async_trait::async_trait;
use slr_artifact::{AnyArtifact, ArtifactStore, ArtifactType};
use slr_config::Config;
use slr_llm::LLMDrafter;
use slr_providers::ProviderRegistry;
use slr_utils::error::Result;
use std::sync::Arc;

/// Everything a stage needs to do its work, threaded in by the
/// orchestrator rather than reached for as a global.
pub struct Services {
    pub project_id: String,
    pub config: Config,
    pub store: Arc<ArtifactStore>,
    pub drafter: Option<Arc<dyn LLMDrafter>>,
    pub providers: Arc<ProviderRegistry>,
}

impl Services {
    #[must_use]
    pub fn new(
        project_id: impl Into<String>,
        config: Config,
        store: Arc<ArtifactStore>,
        drafter: Option<Arc<dyn LLMDrafter>>,
        providers: Arc<ProviderRegistry>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            config,
            store,
            drafter,
            providers,
        }
    }

    /// Loads an approved (or approved-with-notes) upstream artifact, or
    /// fails with `PreconditionFailed` naming it. Stages call this once
    /// per declared dependency before doing any work.
    pub fn require_approved<T>(&self, artifact_type: ArtifactType) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        use slr_utils::error::SlrError;

        let header = match self.store.header(&self.project_id, artifact_type) {
            Ok(h) => h,
            Err(SlrError::NotFound { .. }) => {
                return Err(SlrError::PreconditionFailed(vec![artifact_type.as_str().to_string()]));
            }
            Err(e) => return Err(e),
        };
        if !header.status.gates_open() {
            return Err(SlrError::PreconditionFailed(vec![artifact_type.as_str().to_string()]));
        }
        self.store.load(&self.project_id, artifact_type)
    }
}

/// The result every stage returns. `draft_artifact` is `None` only on
/// total failure (see `validation_errors`); partial provider failures
/// still yield a draft plus non-fatal `warnings`.
#[derive(Debug, Clone)]
pub struct StageResult {
    pub stage_name: &'static str,
    pub draft_artifact: Option<AnyArtifact>,
    pub extra_artifacts: Vec<AnyArtifact>,
    pub metadata: serde_json::Value,
    pub prompts: Vec<String>,
    pub warnings: Vec<String>,
    pub validation_errors: Vec<String>,
}

impl StageResult {
    #[must_use]
    pub fn success(stage_name: &'static str, draft_artifact: AnyArtifact) -> Self {
        Self {
            stage_name,
            draft_artifact: Some(draft_artifact),
            extra_artifacts: Vec::new(),
            metadata: serde_json::Value::Null,
            prompts: Vec::new(),
            warnings: Vec::new(),
            validation_errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    #[must_use]
    pub fn with_prompts(mut self, prompts: Vec<String>) -> Self {
        self.prompts = prompts;
        self
    }

    #[must_use]
    pub fn with_extra_artifacts(mut self, extra: Vec<AnyArtifact>) -> Self {
        self.extra_artifacts = extra;
        self
    }

    #[must_use]
    pub fn failure(stage_name: &'static str, validation_errors: Vec<String>) -> Self {
        Self {
            stage_name,
            draft_artifact: None,
            extra_artifacts: Vec::new(),
            metadata: serde_json::Value::Null,
            prompts: Vec::new(),
            warnings: Vec::new(),
            validation_errors,
        }
    }
}

#[async_trait]
pub trait Stage: Send + Sync {
    /// Stable identifier, also the CLI/API stage name.
    fn id(&self) -> &'static str;

    /// Upstream artifact types that must be `approved`/`approved_with_notes`
    /// before this stage may run.
    fn deps(&self) -> &'static [ArtifactType];

    /// The artifact type this stage produces as its `draft_artifact`.
    fn produces(&self) -> ArtifactType;

    async fn run(&self, services: &Services, inputs: Option<serde_json::Value>) -> Result<StageResult>;
}
