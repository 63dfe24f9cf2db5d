//! Typed, versioned artifact storage with draft/approved gating.
//!
//! Each artifact type is a distinct struct embedding the shared
//! [`slr_utils::types::ArtifactHeader`] via `#[serde(flatten)]`; there is no
//! base `Artifact` class. [`store::ArtifactStore`] persists and loads them
//! atomically, one JSON file per `(project_id, ArtifactType)`.

pub mod any;
pub mod store;
pub mod types;

pub use any::AnyArtifact;
pub use slr_query::ComplexityAnalysis;
pub use store::ArtifactStore;
pub use types::{
    ArtifactType, Concept, ConceptModel, ConceptRelation, ConceptType, DatabaseQuery,
    DatabaseQueryPlan, DeduplicationStats, Document, ProblemFraming, ProjectContext,
    ProviderWarning, QuestionPriority, QuestionType, ResearchQuestion, ResearchQuestionSet,
    ScreeningCriteria, SearchConceptBlock, SearchConceptBlocks, SearchResults,
    StrategyExportBundle, UnknownArtifactType,
};
