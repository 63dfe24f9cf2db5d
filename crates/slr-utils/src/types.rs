//! Shared value types that cross crate boundaries: the artifact header, the
//! HITL approval state machine, and generator provenance metadata.
//!
//! Per the project's redesign notes, artifacts share only a minimal header —
//! no base class, no shared fields beyond what every artifact needs to be
//! gated and persisted. Each artifact type's own payload lives beside this
//! header in its owning crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// HITL gating state carried by every artifact.
///
/// A downstream stage may consume an upstream artifact only when its status
/// is [`Approved`](Self::Approved) or [`ApprovedWithNotes`](Self::ApprovedWithNotes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Draft,
    UnderReview,
    Approved,
    ApprovedWithNotes,
    RequiresRevision,
}

impl ApprovalStatus {
    /// True when a downstream stage may treat this artifact as satisfied.
    #[must_use]
    pub fn gates_open(self) -> bool {
        matches!(self, Self::Approved | Self::ApprovedWithNotes)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::ApprovedWithNotes => "approved_with_notes",
            Self::RequiresRevision => "requires_revision",
        }
    }
}

impl Default for ApprovalStatus {
    fn default() -> Self {
        Self::Draft
    }
}

/// Error returned by [`ApprovalStatus::from_str`] for an unrecognized name.
#[derive(Debug, Clone)]
pub struct UnknownApprovalStatus(pub String);

impl std::fmt::Display for UnknownApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized approval status '{}'", self.0)
    }
}

impl std::error::Error for UnknownApprovalStatus {}

impl std::str::FromStr for ApprovalStatus {
    type Err = UnknownApprovalStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "under_review" => Ok(Self::UnderReview),
            "approved" => Ok(Self::Approved),
            "approved_with_notes" => Ok(Self::ApprovedWithNotes),
            "requires_revision" => Ok(Self::RequiresRevision),
            _ => Err(UnknownApprovalStatus(s.to_string())),
        }
    }
}

/// Whether an artifact's content was produced by an LLM, a deterministic
/// fallback, a blend of both, or test fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    Llm,
    Deterministic,
    Hybrid,
    Mock,
}

/// Provenance attached to any artifact whose value was produced by a
/// generator (an `LLMDrafter` call or a deterministic fallback).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_name: String,
    pub mode: GenerationMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_version: Option<String>,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ModelMetadata {
    #[must_use]
    pub fn deterministic(model_name: impl Into<String>, notes: Option<String>) -> Self {
        Self {
            model_name: model_name.into(),
            mode: GenerationMode::Deterministic,
            prompt_version: None,
            generated_at: Utc::now(),
            notes,
        }
    }

    #[must_use]
    pub fn llm(model_name: impl Into<String>, prompt_version: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            mode: GenerationMode::Llm,
            prompt_version: Some(prompt_version.into()),
            generated_at: Utc::now(),
            notes: None,
        }
    }
}

/// Minimal header every artifact carries, per the no-base-class design
/// rule: `{project_id, status, timestamps, model_metadata?}`. Artifact
/// payload types embed this via `#[serde(flatten)]` rather than inheriting
/// from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    pub project_id: String,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_metadata: Option<ModelMetadata>,
}

impl ArtifactHeader {
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            project_id: project_id.into(),
            status: ApprovalStatus::Draft,
            created_at: now,
            updated_at: now,
            model_metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approved_and_approved_with_notes_open_gates() {
        assert!(ApprovalStatus::Approved.gates_open());
        assert!(ApprovalStatus::ApprovedWithNotes.gates_open());
        assert!(!ApprovalStatus::Draft.gates_open());
        assert!(!ApprovalStatus::UnderReview.gates_open());
        assert!(!ApprovalStatus::RequiresRevision.gates_open());
    }

    #[test]
    fn new_header_starts_as_draft() {
        let header = ArtifactHeader::new("proj-1");
        assert_eq!(header.status, ApprovalStatus::Draft);
        assert!(header.model_metadata.is_none());
    }

    #[test]
    fn approval_status_parses_kebab_case_from_cli_flags() {
        use std::str::FromStr;
        assert_eq!(
            ApprovalStatus::from_str("approved-with-notes").unwrap(),
            ApprovalStatus::ApprovedWithNotes
        );
        assert_eq!(ApprovalStatus::from_str("approved").unwrap(), ApprovalStatus::Approved);
        assert!(ApprovalStatus::from_str("nonsense").is_err());
    }
}
