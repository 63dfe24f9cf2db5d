//! Typed artifact storage: one JSON file per `(project_id, ArtifactType)`
//! under `<base_dir>/<project_id>/artifacts/<Type>.json`, written atomically
//! and canonicalized (JCS) before hashing, with a per-key write lock so two
//! stages can never interleave writes to the same artifact.

use crate::types::ArtifactType;
use camino::Utf8PathBuf;
use serde::Serialize;
use serde::de::DeserializeOwned;
use slr_utils::atomic_write::write_file_atomic;
use slr_utils::canonicalization::emit_jcs;
use slr_utils::error::{Result, SlrError};
use slr_utils::paths::{SandboxConfig, SandboxRoot, ensure_dir_all};
use slr_utils::types::ArtifactHeader;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Storage root for one project's artifacts, gated by a per-artifact-type
/// write lock so concurrent stage runs can't tear a file.
pub struct ArtifactStore {
    base_dir: Utf8PathBuf,
    locks: Mutex<HashMap<(String, ArtifactType), Arc<Mutex<()>>>>,
}

impl ArtifactStore {
    #[must_use]
    pub fn new(base_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, project_id: &str, artifact_type: ArtifactType) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock registry poisoned");
        locks
            .entry((project_id.to_string(), artifact_type))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn artifacts_dir(&self, project_id: &str) -> Utf8PathBuf {
        self.base_dir.join(project_id).join("artifacts")
    }

    fn artifact_path(&self, project_id: &str, artifact_type: ArtifactType) -> Utf8PathBuf {
        self.artifacts_dir(project_id)
            .join(format!("{}.json", artifact_type.as_str()))
    }

    fn sandboxed_artifact_path(
        &self,
        project_id: &str,
        artifact_type: ArtifactType,
    ) -> Result<Utf8PathBuf> {
        let dir = self.artifacts_dir(project_id);
        ensure_dir_all(&dir).map_err(SlrError::Io)?;
        let root = SandboxRoot::new(&dir, SandboxConfig::default())
            .map_err(|e| SlrError::Internal(format!("artifact sandbox error: {e}")))?;
        let rel = format!("{}.json", artifact_type.as_str());
        let sandboxed = root
            .join(&rel)
            .map_err(|e| SlrError::Internal(format!("artifact path rejected: {e}")))?;
        Utf8PathBuf::from_path_buf(sandboxed.to_path_buf())
            .map_err(|p| SlrError::Internal(format!("non-UTF-8 artifact path: {}", p.display())))
    }

    /// Serializes `value` with JCS and writes it atomically. Overwrites any
    /// existing artifact of the same type for this project.
    pub fn save<T: Serialize>(
        &self,
        project_id: &str,
        artifact_type: ArtifactType,
        value: &T,
    ) -> Result<()> {
        let guard = self.lock_for(project_id, artifact_type);
        let _held = guard.lock().expect("artifact lock poisoned");

        let path = self.sandboxed_artifact_path(project_id, artifact_type)?;
        let json = emit_jcs(value)?;
        write_file_atomic(&path, &json)
            .map_err(|e| SlrError::Internal(format!("atomic write failed: {e}")))?;
        Ok(())
    }

    /// Loads and deserializes the artifact of type `artifact_type`, or
    /// returns `SlrError::NotFound` if it hasn't been written yet.
    pub fn load<T: DeserializeOwned>(
        &self,
        project_id: &str,
        artifact_type: ArtifactType,
    ) -> Result<T> {
        let guard = self.lock_for(project_id, artifact_type);
        let _held = guard.lock().expect("artifact lock poisoned");

        let path = self.artifact_path(project_id, artifact_type);
        if !path.exists() {
            return Err(SlrError::not_found(artifact_type.as_str(), project_id));
        }
        let raw = std::fs::read_to_string(&path).map_err(SlrError::Io)?;
        serde_json::from_str(&raw).map_err(|e| SlrError::Corrupt {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// True if an artifact of this type has been saved for the project.
    #[must_use]
    pub fn exists(&self, project_id: &str, artifact_type: ArtifactType) -> bool {
        self.artifact_path(project_id, artifact_type).exists()
    }

    /// Reads just the shared header (status, version, timestamps) of an
    /// artifact, ignoring unknown payload fields.
    pub fn header(
        &self,
        project_id: &str,
        artifact_type: ArtifactType,
    ) -> Result<ArtifactHeader> {
        self.load(project_id, artifact_type)
    }

    /// Lists every artifact type currently present for a project, mapped to
    /// its header.
    pub fn list(&self, project_id: &str) -> Result<HashMap<ArtifactType, ArtifactHeader>> {
        let mut out = HashMap::new();
        for &artifact_type in ArtifactType::all() {
            if self.exists(project_id, artifact_type) {
                out.insert(artifact_type, self.header(project_id, artifact_type)?);
            }
        }
        Ok(out)
    }

    /// Deletes the entire project subtree (artifacts, search results,
    /// exports). Used by project teardown; not part of the spec's
    /// per-artifact contract but needed for cleanup in tests and CLI
    /// tooling.
    pub fn delete_project(&self, project_id: &str) -> Result<()> {
        let dir = self.base_dir.join(project_id);
        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(SlrError::Io)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
    struct Payload {
        #[serde(flatten)]
        header: ArtifactHeader,
        value: String,
    }

    fn sample_header() -> ArtifactHeader {
        ArtifactHeader::new("proj-1")
    }

    #[test]
    fn round_trips_an_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap());
        let payload = Payload {
            header: sample_header(),
            value: "hello".into(),
        };
        store
            .save("proj-1", ArtifactType::ProjectContext, &payload)
            .unwrap();
        assert!(store.exists("proj-1", ArtifactType::ProjectContext));
        let loaded: Payload = store.load("proj-1", ArtifactType::ProjectContext).unwrap();
        assert_eq!(loaded, payload);
    }

    #[test]
    fn missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap());
        let err = store
            .load::<Payload>("proj-1", ArtifactType::ProblemFraming)
            .unwrap_err();
        assert!(matches!(err, SlrError::NotFound { .. }));
    }

    #[test]
    fn corrupt_artifact_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap());
        let path = store.sandboxed_artifact_path("proj-1", ArtifactType::ConceptModel).unwrap();
        ensure_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        let err = store
            .load::<Payload>("proj-1", ArtifactType::ConceptModel)
            .unwrap_err();
        assert!(matches!(err, SlrError::Corrupt { .. }));
    }

    #[test]
    fn list_reports_only_present_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap());
        store
            .save(
                "proj-1",
                ArtifactType::ProjectContext,
                &Payload { header: sample_header(), value: "x".into() },
            )
            .unwrap();
        let listed = store.list("proj-1").unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed.contains_key(&ArtifactType::ProjectContext));
    }
}
