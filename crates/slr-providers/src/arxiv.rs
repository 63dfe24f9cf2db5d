//! arXiv provider: `https://export.arxiv.org/api/query`, an Atom feed.

use crate::provider::Provider;
use crate::rate_limit::{self, RateLimiter};
use crate::retry::{self, RetryPolicy};
use quick_xml::Reader;
use quick_xml::events::Event;
use slr_artifact::Document;
use slr_utils::error::{Result, SlrError};
use std::sync::Arc;

pub struct ArxivProvider {
    client: reqwest::Client,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
}

impl ArxivProvider {
    #[must_use]
    pub fn new(capacity: f64, refill_per_second: f64) -> Self {
        Self {
            client: reqwest::Client::new(),
            limiter: rate_limit::limiter_for("arxiv", capacity, refill_per_second),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Default)]
struct RawEntry {
    id: String,
    title: String,
    summary: String,
    authors: Vec<String>,
    published: String,
}

fn parse_atom_feed(xml: &str) -> Vec<RawEntry> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text = true;

    let mut entries = Vec::new();
    let mut current: Option<RawEntry> = None;
    let mut tag_stack: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "entry" {
                    current = Some(RawEntry::default());
                }
                tag_stack.push(name);
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().unwrap_or_default().to_string();
                if let (Some(entry), Some(tag)) = (current.as_mut(), tag_stack.last()) {
                    match tag.as_str() {
                        "id" => entry.id = text,
                        "title" => entry.title = text,
                        "summary" => entry.summary = text,
                        "name" => entry.authors.push(text),
                        "published" => entry.published = text,
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "entry" {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                }
                tag_stack.pop();
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }
    entries
}

fn year_from_published(published: &str) -> Option<i32> {
    published.get(0..4).and_then(|y| y.parse().ok())
}

fn arxiv_id_from_url(url: &str) -> Option<String> {
    url.rsplit('/').next().map(str::to_string)
}

impl From<RawEntry> for Document {
    fn from(entry: RawEntry) -> Self {
        let year = year_from_published(&entry.published);
        let first_author = entry.authors.first().cloned().unwrap_or_default();
        let fingerprint = Document::compute_fingerprint(&entry.title, &first_author, year);
        Document {
            title: entry.title,
            authors: entry.authors,
            year,
            venue: Some("arXiv".to_string()),
            doi: None,
            url: Some(entry.id.clone()),
            abstract_text: if entry.summary.is_empty() {
                None
            } else {
                Some(entry.summary)
            },
            citation_count: None,
            provider: "arxiv".to_string(),
            arxiv_id: arxiv_id_from_url(&entry.id),
            pubmed_id: None,
            fingerprint,
        }
    }
}

#[async_trait::async_trait]
impl Provider for ArxivProvider {
    fn name(&self) -> &'static str {
        "arxiv"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Document>> {
        let client = &self.client;
        retry::retry_with_backoff(self.retry, || async {
            self.limiter.acquire().await;
            let response = client
                .get("https://export.arxiv.org/api/query")
                .query(&[
                    ("search_query", format!("all:{query}")),
                    ("max_results", max_results.to_string()),
                ])
                .send()
                .await
                .map_err(|e| SlrError::Provider {
                    provider_name: "arxiv".into(),
                    message: e.to_string(),
                    retriable: true,
                })?;
            if response.status().is_server_error() {
                return Err(SlrError::Provider {
                    provider_name: "arxiv".into(),
                    message: format!("HTTP {}", response.status()),
                    retriable: true,
                });
            }
            if !response.status().is_success() {
                return Err(SlrError::Provider {
                    provider_name: "arxiv".into(),
                    message: format!("HTTP {}", response.status()),
                    retriable: false,
                });
            }
            let body = response.text().await.map_err(|e| SlrError::Provider {
                provider_name: "arxiv".into(),
                message: e.to_string(),
                retriable: true,
            })?;
            Ok(parse_atom_feed(&body).into_iter().map(Document::from).collect())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_atom_entry() {
        let xml = r#"<feed>
<entry>
<id>https://arxiv.org/abs/1234.5678</id>
<title>A Paper</title>
<summary>An abstract.</summary>
<published>2021-03-01T00:00:00Z</published>
<author><name>Ada Lovelace</name></author>
</entry>
</feed>"#;
        let entries = parse_atom_feed(xml);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "A Paper");
        assert_eq!(entries[0].authors, vec!["Ada Lovelace".to_string()]);
        assert_eq!(year_from_published(&entries[0].published), Some(2021));
        assert_eq!(arxiv_id_from_url(&entries[0].id), Some("1234.5678".to_string()));
    }
}
