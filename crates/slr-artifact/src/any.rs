//! A tagged variant over every artifact type, used at the three boundaries
//! that need to treat artifacts polymorphically — persisting a stage's
//! draft output, listing/describing a project's artifacts, and assembling
//! the export bundle. Per the redesign notes (§9 "Artifact polymorphism"),
//! this is a plain enum dispatched with a `match`, not a class hierarchy:
//! there is no shared `Artifact` trait beyond the header every payload
//! already embeds.

use crate::store::ArtifactStore;
use crate::types::{
    ArtifactType, ConceptModel, DatabaseQueryPlan, ProblemFraming, ProjectContext,
    ResearchQuestionSet, ScreeningCriteria, SearchConceptBlocks, SearchResults,
    StrategyExportBundle,
};
use slr_utils::error::Result;
use slr_utils::types::ArtifactHeader;

#[derive(Debug, Clone)]
pub enum AnyArtifact {
    ProjectContext(ProjectContext),
    ProblemFraming(ProblemFraming),
    ConceptModel(ConceptModel),
    ResearchQuestionSet(ResearchQuestionSet),
    SearchConceptBlocks(SearchConceptBlocks),
    DatabaseQueryPlan(DatabaseQueryPlan),
    SearchResults(SearchResults),
    ScreeningCriteria(ScreeningCriteria),
    StrategyExportBundle(StrategyExportBundle),
}

macro_rules! for_each_variant {
    ($self:expr, $binding:ident => $expr:expr) => {
        match $self {
            AnyArtifact::ProjectContext($binding) => $expr,
            AnyArtifact::ProblemFraming($binding) => $expr,
            AnyArtifact::ConceptModel($binding) => $expr,
            AnyArtifact::ResearchQuestionSet($binding) => $expr,
            AnyArtifact::SearchConceptBlocks($binding) => $expr,
            AnyArtifact::DatabaseQueryPlan($binding) => $expr,
            AnyArtifact::SearchResults($binding) => $expr,
            AnyArtifact::ScreeningCriteria($binding) => $expr,
            AnyArtifact::StrategyExportBundle($binding) => $expr,
        }
    };
}

impl AnyArtifact {
    #[must_use]
    pub fn artifact_type(&self) -> ArtifactType {
        match self {
            Self::ProjectContext(_) => ArtifactType::ProjectContext,
            Self::ProblemFraming(_) => ArtifactType::ProblemFraming,
            Self::ConceptModel(_) => ArtifactType::ConceptModel,
            Self::ResearchQuestionSet(_) => ArtifactType::ResearchQuestionSet,
            Self::SearchConceptBlocks(_) => ArtifactType::SearchConceptBlocks,
            Self::DatabaseQueryPlan(_) => ArtifactType::DatabaseQueryPlan,
            Self::SearchResults(_) => ArtifactType::SearchResults,
            Self::ScreeningCriteria(_) => ArtifactType::ScreeningCriteria,
            Self::StrategyExportBundle(_) => ArtifactType::StrategyExportBundle,
        }
    }

    #[must_use]
    pub fn header(&self) -> &ArtifactHeader {
        for_each_variant!(self, v => &v.header)
    }

    pub fn header_mut(&mut self) -> &mut ArtifactHeader {
        for_each_variant!(self, v => &mut v.header)
    }

    /// Persists this artifact under its own type's slot, dispatching to
    /// `ArtifactStore::save` through the matching concrete type.
    pub fn save(&self, store: &ArtifactStore, project_id: &str) -> Result<()> {
        for_each_variant!(self, v => store.save(project_id, self.artifact_type(), v))
    }

    /// Serializes to a `serde_json::Value` for transport-agnostic
    /// presentation (the `get_artifact` API in §6).
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        for_each_variant!(self, v => serde_json::to_value(v).expect("artifact payload always serializes"))
    }

    /// Loads whichever concrete type `artifact_type` names and wraps it.
    /// The one place the store's generic `load::<T>` meets the tagged enum,
    /// used by `ApproveArtifact`/`get_artifact` which only have a type tag
    /// to go on, not a static type parameter.
    pub fn load(store: &ArtifactStore, project_id: &str, artifact_type: ArtifactType) -> Result<Self> {
        Ok(match artifact_type {
            ArtifactType::ProjectContext => Self::ProjectContext(store.load(project_id, artifact_type)?),
            ArtifactType::ProblemFraming => Self::ProblemFraming(store.load(project_id, artifact_type)?),
            ArtifactType::ConceptModel => Self::ConceptModel(store.load(project_id, artifact_type)?),
            ArtifactType::ResearchQuestionSet => {
                Self::ResearchQuestionSet(store.load(project_id, artifact_type)?)
            }
            ArtifactType::SearchConceptBlocks => {
                Self::SearchConceptBlocks(store.load(project_id, artifact_type)?)
            }
            ArtifactType::DatabaseQueryPlan => Self::DatabaseQueryPlan(store.load(project_id, artifact_type)?),
            ArtifactType::SearchResults => Self::SearchResults(store.load(project_id, artifact_type)?),
            ArtifactType::ScreeningCriteria => Self::ScreeningCriteria(store.load(project_id, artifact_type)?),
            ArtifactType::StrategyExportBundle => {
                Self::StrategyExportBundle(store.load(project_id, artifact_type)?)
            }
        })
    }

    /// Applies a shallow JSON-merge of `edits` onto this artifact's payload
    /// (user-supplied field overrides from `ApproveArtifact`), re-validating
    /// by round-tripping through the concrete type so a malformed edit
    /// fails loudly instead of silently dropping fields.
    pub fn apply_edits(&mut self, edits: serde_json::Value) -> Result<()> {
        if edits.is_null() {
            return Ok(());
        }
        let merged = merge_json(self.to_json(), edits);
        for_each_variant!(self, v => {
            *v = serde_json::from_value(merged)
                .map_err(|e| slr_utils::error::SlrError::validation(format!("invalid artifact edits: {e}")))?;
            Ok(())
        })
    }
}

/// Shallow object merge: keys present in `patch` override `base`; nested
/// objects are merged recursively, everything else (arrays, scalars) is
/// replaced wholesale.
fn merge_json(base: serde_json::Value, patch: serde_json::Value) -> serde_json::Value {
    match (base, patch) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                let merged = match base_map.remove(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => value,
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, patch) => patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_type_matches_payload() {
        let artifact = AnyArtifact::ProjectContext(ProjectContext {
            header: ArtifactHeader::new("p1"),
            title: "T".to_string(),
            description: String::new(),
            discipline: String::new(),
            keywords: vec![],
            user_notes: None,
        });
        assert_eq!(artifact.artifact_type(), ArtifactType::ProjectContext);
    }

    #[test]
    fn apply_edits_overrides_only_named_fields() {
        let mut artifact = AnyArtifact::ProjectContext(ProjectContext {
            header: ArtifactHeader::new("p1"),
            title: "Original".to_string(),
            description: "desc".to_string(),
            discipline: "cs".to_string(),
            keywords: vec!["a".to_string()],
            user_notes: None,
        });
        artifact
            .apply_edits(serde_json::json!({ "title": "Revised" }))
            .unwrap();
        match &artifact {
            AnyArtifact::ProjectContext(p) => {
                assert_eq!(p.title, "Revised");
                assert_eq!(p.description, "desc");
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn load_round_trips_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(camino::Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap());
        let artifact = AnyArtifact::ProjectContext(ProjectContext {
            header: ArtifactHeader::new("p1"),
            title: "T".to_string(),
            description: String::new(),
            discipline: String::new(),
            keywords: vec![],
            user_notes: None,
        });
        artifact.save(&store, "p1").unwrap();
        let loaded = AnyArtifact::load(&store, "p1", ArtifactType::ProjectContext).unwrap();
        assert_eq!(loaded.artifact_type(), ArtifactType::ProjectContext);
    }
}
