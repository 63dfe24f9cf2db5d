//! CSV export (RFC 4180) via the `csv` crate for correct quoting.

use crate::exporter::Exporter;
use slr_artifact::Document;

pub struct CsvExporter;

const ABSTRACT_MAX_CHARS: usize = 500;
const MAX_AUTHORS: usize = 10;

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn join_authors(authors: &[String]) -> String {
    authors
        .iter()
        .take(MAX_AUTHORS)
        .cloned()
        .collect::<Vec<_>>()
        .join("; ")
}

impl Exporter for CsvExporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn extension(&self) -> &'static str {
        "csv"
    }

    fn export(&self, documents: &[Document]) -> Vec<u8> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "title", "authors", "year", "venue", "doi", "url", "abstract", "citation_count",
                "provider",
            ])
            .expect("writing CSV header cannot fail");

        for doc in documents {
            writer
                .write_record([
                    doc.title.as_str(),
                    &join_authors(&doc.authors),
                    &doc.year.map_or_else(String::new, |y| y.to_string()),
                    doc.venue.as_deref().unwrap_or(""),
                    doc.doi.as_deref().unwrap_or(""),
                    doc.url.as_deref().unwrap_or(""),
                    &doc
                        .abstract_text
                        .as_deref()
                        .map(|a| truncate_chars(a, ABSTRACT_MAX_CHARS))
                        .unwrap_or_default(),
                    &doc
                        .citation_count
                        .map_or_else(String::new, |c| c.to_string()),
                    doc.provider.as_str(),
                ])
                .expect("writing a CSV record cannot fail");
        }

        writer.into_inner().expect("CSV writer never holds an open transaction")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document {
            title: "A, Title with \"quotes\"".to_string(),
            authors: (0..15).map(|i| format!("Author {i}")).collect(),
            year: Some(2022),
            venue: Some("Venue".to_string()),
            doi: None,
            url: None,
            abstract_text: Some("x".repeat(600)),
            citation_count: Some(7),
            provider: "openalex".to_string(),
            arxiv_id: None,
            pubmed_id: None,
            fingerprint: "fp".to_string(),
        }
    }

    #[test]
    fn caps_authors_and_truncates_abstract() {
        let csv_bytes = CsvExporter.export(&[sample()]);
        let text = String::from_utf8(csv_bytes).unwrap();
        let body_line = text.lines().nth(1).unwrap();
        assert!(body_line.contains("Author 9"));
        assert!(!body_line.contains("Author 10"));
        let record = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes())
            .into_records()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(record.get(6).unwrap().chars().count(), 500);
    }

    #[test]
    fn escapes_commas_and_quotes() {
        let csv_bytes = CsvExporter.export(&[sample()]);
        let text = String::from_utf8(csv_bytes).unwrap();
        assert!(text.contains("\"A, Title with \"\"quotes\"\"\""));
    }
}
