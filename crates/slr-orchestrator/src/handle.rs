//! `Controller`: the stable facade over stage execution, artifact
//! persistence, and the HITL approval gate.
//!
//! Grounded on the teacher's `PhaseOrchestrator`/`OrchestratorHandle` split
//! (constructor takes a config, internal state does the resolving, the
//! handle is what every external caller holds) — here collapsed into one
//! type since there's no separate "internal vs. facade" split left once
//! the phase-rewind/workflow machinery is gone: every call is a single
//! `RunStage`, not a multi-phase workflow.

use chrono::{DateTime, Utc};
use slr_artifact::{AnyArtifact, ArtifactStore, ArtifactType};
use slr_config::Config;
use slr_llm::build_drafter;
use slr_providers::registry::RateConfig;
use slr_providers::ProviderRegistry;
use slr_stage_api::{Services, Stage, StageResult};
use slr_utils::error::{Result, SlrError};
use slr_utils::types::{ApprovalStatus, ModelMetadata};
use std::collections::HashMap;
use std::sync::Arc;

use crate::project_id::new_project_id;

/// A project's status as reported by `get_project`/`list_projects`.
#[derive(Debug, Clone)]
pub struct ProjectSummary {
    pub id: String,
    pub title: String,
    pub current_stage: Option<&'static str>,
    pub artifacts: HashMap<ArtifactType, ApprovalStatus>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Result of `approve_artifact`: whether the write succeeded and which
/// stages it unblocked.
#[derive(Debug, Clone)]
pub struct ApproveOutcome {
    pub next_available_stages: Vec<&'static str>,
}

pub struct Controller {
    config: Config,
    store: Arc<ArtifactStore>,
    drafter: Option<Arc<dyn slr_llm::LLMDrafter>>,
    providers: Arc<ProviderRegistry>,
    stages: Vec<Arc<dyn Stage>>,
}

impl Controller {
    /// Builds the controller from a resolved configuration: constructs the
    /// artifact store under `config.base_dir`, the drafter backend named
    /// by `config.llm.provider`, and the provider registry with
    /// `config.provider_rates` applied.
    pub fn new(config: Config) -> Result<Self> {
        let store = Arc::new(ArtifactStore::new(config.base_dir.clone()));
        let drafter = build_drafter(&config)?;
        let rates: HashMap<String, RateConfig> = config
            .provider_rates
            .iter()
            .map(|(name, rate)| {
                (
                    name.clone(),
                    RateConfig {
                        capacity: rate.capacity,
                        refill_per_second: rate.refill_per_second,
                    },
                )
            })
            .collect();
        let providers = Arc::new(ProviderRegistry::new(&rates));
        let stages = slr_stages::all_stages();
        Ok(Self {
            config,
            store,
            drafter,
            providers,
            stages,
        })
    }

    fn services(&self, project_id: impl Into<String>) -> Services {
        Services::new(
            project_id,
            self.config.clone(),
            self.store.clone(),
            self.drafter.clone(),
            self.providers.clone(),
        )
    }

    fn stage_by_id(&self, name: &str) -> Result<&Arc<dyn Stage>> {
        self.stages
            .iter()
            .find(|s| s.id() == name)
            .ok_or_else(|| SlrError::not_found("stage", name))
    }

    /// Persists a stage's `draft_artifact` and `extra_artifacts`, if any.
    /// A failed run (`draft_artifact = None`) is a no-op — stage runs that
    /// fail validation have no side effects.
    fn persist(&self, project_id: &str, result: &StageResult) -> Result<()> {
        if let Some(draft) = &result.draft_artifact {
            draft.save(&self.store, project_id)?;
        }
        for extra in &result.extra_artifacts {
            extra.save(&self.store, project_id)?;
        }
        Ok(())
    }

    /// `StartProject`: generates a project id from the raw idea and runs
    /// `project-setup`.
    pub async fn start_project(&self, raw_idea: &str) -> Result<(String, StageResult)> {
        let project_id = new_project_id(raw_idea, Utc::now().to_rfc3339().as_bytes());
        let stage = self.stage_by_id("project-setup")?;
        let services = self.services(project_id.clone());
        let inputs = serde_json::json!({ "idea": raw_idea });
        let result = stage.run(&services, Some(inputs)).await?;
        self.persist(&project_id, &result)?;
        Ok((project_id, result))
    }

    /// `RunStage`: resolves `stage_name`, checks that every declared
    /// dependency is gated open (delegated to the stage itself via
    /// `Services::require_approved`), invokes it, and persists the draft
    /// on success.
    pub async fn run_stage(
        &self,
        project_id: &str,
        stage_name: &str,
        inputs: Option<serde_json::Value>,
    ) -> Result<StageResult> {
        let stage = self.stage_by_id(stage_name)?;
        let services = self.services(project_id.to_string());
        let result = stage.run(&services, inputs).await?;
        self.persist(project_id, &result)?;
        Ok(result)
    }

    /// `ApproveArtifact`: applies `edits`, sets `status` (default
    /// `approved`), folds in `user_notes`, persists, and reports which
    /// stages are unblocked.
    pub fn approve_artifact(
        &self,
        project_id: &str,
        artifact_type: ArtifactType,
        edits: Option<serde_json::Value>,
        status: Option<ApprovalStatus>,
        user_notes: Option<String>,
    ) -> Result<ApproveOutcome> {
        let mut artifact = AnyArtifact::load(&self.store, project_id, artifact_type)?;

        if let Some(edits) = edits {
            artifact.apply_edits(edits)?;
        }

        let header = artifact.header_mut();
        header.status = status.unwrap_or(ApprovalStatus::Approved);
        header.updated_at = Utc::now();
        if let Some(notes) = user_notes {
            match &mut header.model_metadata {
                Some(meta) => meta.notes = Some(notes),
                None => header.model_metadata = Some(ModelMetadata::deterministic("approval-note", Some(notes))),
            }
        }

        artifact.save(&self.store, project_id)?;

        Ok(ApproveOutcome {
            next_available_stages: self.list_available_stages(project_id)?,
        })
    }

    /// `ListAvailableStages`: every stage whose declared dependencies are
    /// all gated open and whose own artifact hasn't already been approved.
    pub fn list_available_stages(&self, project_id: &str) -> Result<Vec<&'static str>> {
        let mut available = Vec::new();
        for stage in &self.stages {
            if self.is_already_approved(project_id, stage.produces()) {
                continue;
            }
            if stage.deps().iter().all(|dep| self.is_gated_open(project_id, *dep)) {
                available.push(stage.id());
            }
        }
        Ok(available)
    }

    fn is_gated_open(&self, project_id: &str, artifact_type: ArtifactType) -> bool {
        self.store
            .header(project_id, artifact_type)
            .map(|h| h.status.gates_open())
            .unwrap_or(false)
    }

    fn is_already_approved(&self, project_id: &str, artifact_type: ArtifactType) -> bool {
        self.is_gated_open(project_id, artifact_type)
    }

    /// `GetArtifact`: the raw JSON of one artifact, or `NotFound`.
    pub fn get_artifact(&self, project_id: &str, artifact_type: ArtifactType) -> Result<serde_json::Value> {
        Ok(AnyArtifact::load(&self.store, project_id, artifact_type)?.to_json())
    }

    /// `GetProject`: every artifact currently written for the project,
    /// plus a best-effort title (from `ProjectContext` if approved enough
    /// to have one) and timestamp bounds.
    pub fn get_project(&self, project_id: &str) -> Result<ProjectSummary> {
        let headers = self.store.list(project_id)?;
        if headers.is_empty() {
            return Err(SlrError::not_found("project", project_id));
        }

        let title = self
            .store
            .load::<slr_artifact::ProjectContext>(project_id, ArtifactType::ProjectContext)
            .map(|ctx| ctx.title)
            .unwrap_or_else(|_| project_id.to_string());

        let artifacts: HashMap<ArtifactType, ApprovalStatus> =
            headers.iter().map(|(ty, header)| (*ty, header.status)).collect();

        let created_at = headers.values().map(|h| h.created_at).min();
        let updated_at = headers.values().map(|h| h.updated_at).max();

        let current_stage = self
            .stages
            .iter()
            .find(|s| !self.is_already_approved(project_id, s.produces()))
            .map(|s| s.id());

        Ok(ProjectSummary {
            id: project_id.to_string(),
            title,
            current_stage,
            artifacts,
            created_at,
            updated_at,
        })
    }

    /// `ListProjects`: every subdirectory of `base_dir` that has at least
    /// one artifact written.
    pub fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        let mut summaries = Vec::new();
        let entries = match std::fs::read_dir(&self.config.base_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(summaries),
            Err(e) => return Err(SlrError::Io(e)),
        };
        for entry in entries {
            let entry = entry.map_err(SlrError::Io)?;
            if !entry.file_type().map_err(SlrError::Io)?.is_dir() {
                continue;
            }
            let Some(project_id) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            match self.get_project(&project_id) {
                Ok(summary) => summaries.push(summary),
                Err(SlrError::NotFound { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }
}
