//! BibTeX export: one `@article` (venue known) or `@misc` entry per document.

use crate::exporter::Exporter;
use slr_artifact::Document;

pub struct BibtexExporter;

fn escape_braces(s: &str) -> String {
    s.replace('{', "\\{").replace('}', "\\}")
}

fn surname(author: &str) -> &str {
    author.split_whitespace().last().unwrap_or(author)
}

fn citation_key(doc: &Document, index: usize) -> String {
    let first_author = doc.authors.first().map(|s| surname(s)).unwrap_or("Unknown");
    let year = doc.year.map_or_else(|| "n.d.".to_string(), |y| y.to_string());
    format!("{first_author}{year}_{index}")
}

impl Exporter for BibtexExporter {
    fn name(&self) -> &'static str {
        "bibtex"
    }

    fn extension(&self) -> &'static str {
        "bib"
    }

    fn export(&self, documents: &[Document]) -> Vec<u8> {
        let mut out = String::new();
        for (index, doc) in documents.iter().enumerate() {
            let entry_type = if doc.venue.is_some() { "article" } else { "misc" };
            out.push_str(&format!("@{entry_type}{{{},\n", citation_key(doc, index)));
            out.push_str(&format!("  title = {{{}}},\n", escape_braces(&doc.title)));
            if !doc.authors.is_empty() {
                out.push_str(&format!(
                    "  author = {{{}}},\n",
                    escape_braces(&doc.authors.join(" and "))
                ));
            }
            if let Some(year) = doc.year {
                out.push_str(&format!("  year = {{{year}}},\n"));
            }
            if let Some(venue) = &doc.venue {
                out.push_str(&format!("  journal = {{{}}},\n", escape_braces(venue)));
            }
            if let Some(doi) = &doc.doi {
                out.push_str(&format!("  doi = {{{}}},\n", escape_braces(doi)));
            }
            if let Some(url) = &doc.url {
                out.push_str(&format!("  url = {{{}}},\n", escape_braces(url)));
            }
            out.push_str("}\n\n");
        }
        out.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document {
            title: "Nested {braces} here".to_string(),
            authors: vec!["Ada Lovelace".to_string(), "Grace Hopper".to_string()],
            year: Some(1950),
            venue: Some("Journal of Things".to_string()),
            doi: None,
            url: None,
            abstract_text: None,
            citation_count: None,
            provider: "test".to_string(),
            arxiv_id: None,
            pubmed_id: None,
            fingerprint: "fp".to_string(),
        }
    }

    #[test]
    fn uses_first_author_surname_and_year_in_key() {
        let bytes = BibtexExporter.export(&[doc()]);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("@article{Lovelace1950_0,"));
    }

    #[test]
    fn escapes_braces_in_title() {
        let bytes = BibtexExporter.export(&[doc()]);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("Nested \\{braces\\} here"));
    }

    #[test]
    fn uses_misc_when_venue_is_absent() {
        let mut d = doc();
        d.venue = None;
        let bytes = BibtexExporter.export(&[d]);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("@misc{"));
    }
}
