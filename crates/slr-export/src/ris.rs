//! RIS export: standard tag/value pairs, one record per document.

use crate::exporter::Exporter;
use slr_artifact::Document;

pub struct RisExporter;

const MAX_AUTHORS: usize = 20;

fn line(tag: &str, value: &str) -> String {
    format!("{tag}  - {value}\n")
}

impl Exporter for RisExporter {
    fn name(&self) -> &'static str {
        "ris"
    }

    fn extension(&self) -> &'static str {
        "ris"
    }

    fn export(&self, documents: &[Document]) -> Vec<u8> {
        let mut out = String::new();
        for doc in documents {
            out.push_str(&line("TY", "JOUR"));
            out.push_str(&line("TI", &doc.title));
            for author in doc.authors.iter().take(MAX_AUTHORS) {
                out.push_str(&line("AU", author));
            }
            if let Some(year) = doc.year {
                out.push_str(&line("PY", &year.to_string()));
            }
            if let Some(venue) = &doc.venue {
                out.push_str(&line("JO", venue));
            }
            if let Some(doi) = &doc.doi {
                out.push_str(&line("DO", doi));
            }
            if let Some(url) = &doc.url {
                out.push_str(&line("UR", url));
            }
            if let Some(abstract_text) = &doc.abstract_text {
                out.push_str(&line("AB", abstract_text));
            }
            out.push_str(&line("KW", &doc.provider));
            out.push_str("ER  - \n\n");
        }
        out.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_authors_at_twenty() {
        let doc = Document {
            title: "T".to_string(),
            authors: (0..30).map(|i| format!("Author {i}")).collect(),
            year: None,
            venue: None,
            doi: None,
            url: None,
            abstract_text: None,
            citation_count: None,
            provider: "test".to_string(),
            arxiv_id: None,
            pubmed_id: None,
            fingerprint: "fp".to_string(),
        };
        let bytes = RisExporter.export(&[doc]);
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.matches("AU  - ").count(), 20);
        assert!(text.contains("ER  - "));
    }
}
