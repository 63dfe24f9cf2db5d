//! `StrategyExportBundle` assembly: writes CSV/BibTeX/RIS document exports
//! plus the Markdown protocol under `<project>/export/` and returns the
//! list of paths written.

use crate::exporter::Exporter;
use crate::markdown::render_markdown_protocol;
use crate::{BibtexExporter, CsvExporter, RisExporter};
use camino::Utf8PathBuf;
use slr_artifact::{
    ConceptModel, DatabaseQueryPlan, Document, ProblemFraming, ResearchQuestionSet,
    ScreeningCriteria, SearchResults,
};
use slr_utils::atomic_write::write_file_atomic;
use slr_utils::error::{Result, SlrError};
use slr_utils::paths::ensure_dir_all;

/// Everything `export_bundle` needs: the documents to serialize (already
/// deduplicated, if applicable) and the approved artifacts that feed the
/// Markdown protocol. Every field beyond `project_title` is optional —
/// a project partway through the pipeline still gets a best-effort export.
pub struct BundleInputs<'a> {
    pub project_title: &'a str,
    pub documents: &'a [Document],
    pub problem_framing: Option<&'a ProblemFraming>,
    pub concept_model: Option<&'a ConceptModel>,
    pub research_questions: Option<&'a ResearchQuestionSet>,
    pub query_plan: Option<&'a DatabaseQueryPlan>,
    pub search_results: Option<&'a SearchResults>,
    pub screening_criteria: Option<&'a ScreeningCriteria>,
}

/// Writes `papers.csv`, `papers.bib`, `papers.ris`, and `protocol.md` under
/// `<base_dir>/<project_id>/export/`, returning the paths written (relative
/// to nothing in particular — callers store these verbatim in
/// `StrategyExportBundle.exported_files`, matching the file-pointer pattern
/// used for `SearchResults`).
pub fn export_bundle(
    base_dir: &Utf8PathBuf,
    project_id: &str,
    inputs: &BundleInputs<'_>,
) -> Result<Vec<String>> {
    let export_dir = base_dir.join(project_id).join("export");
    ensure_dir_all(&export_dir).map_err(SlrError::Io)?;

    let mut written = Vec::new();

    for exporter in document_exporters() {
        let bytes = exporter.export(inputs.documents);
        let text = String::from_utf8(bytes).map_err(|e| {
            SlrError::Internal(format!("{} export produced invalid UTF-8: {e}", exporter.name()))
        })?;
        let path = export_dir.join(format!("papers.{}", exporter.extension()));
        write_file_atomic(&path, &text)
            .map_err(|e| SlrError::Internal(format!("writing {} export failed: {e}", exporter.name())))?;
        written.push(path.to_string());
    }

    let markdown = render_markdown_protocol(
        inputs.project_title,
        inputs.problem_framing,
        inputs.concept_model,
        inputs.research_questions,
        inputs.query_plan,
        inputs.search_results,
        inputs.screening_criteria,
    );
    let protocol_path = export_dir.join("protocol.md");
    write_file_atomic(&protocol_path, &markdown)
        .map_err(|e| SlrError::Internal(format!("writing protocol.md failed: {e}")))?;
    written.push(protocol_path.to_string());

    Ok(written)
}

fn document_exporters() -> Vec<Box<dyn Exporter>> {
    vec![
        Box::new(CsvExporter),
        Box::new(BibtexExporter),
        Box::new(RisExporter),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document {
            title: "A Study".to_string(),
            authors: vec!["Jane Doe".to_string()],
            year: Some(2023),
            venue: Some("Venue".to_string()),
            doi: None,
            url: None,
            abstract_text: None,
            citation_count: None,
            provider: "openalex".to_string(),
            arxiv_id: None,
            pubmed_id: None,
            fingerprint: "fp".to_string(),
        }
    }

    #[test]
    fn writes_all_four_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let documents = vec![doc()];
        let inputs = BundleInputs {
            project_title: "Test Project",
            documents: &documents,
            problem_framing: None,
            concept_model: None,
            research_questions: None,
            query_plan: None,
            search_results: None,
            screening_criteria: None,
        };
        let paths = export_bundle(&base, "proj-1", &inputs).unwrap();
        assert_eq!(paths.len(), 4);
        assert!(paths.iter().any(|p| p.ends_with("papers.csv")));
        assert!(paths.iter().any(|p| p.ends_with("papers.bib")));
        assert!(paths.iter().any(|p| p.ends_with("papers.ris")));
        assert!(paths.iter().any(|p| p.ends_with("protocol.md")));
        for path in &paths {
            assert!(std::path::Path::new(path).exists());
        }
    }
}
