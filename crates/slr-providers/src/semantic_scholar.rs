//! Semantic Scholar provider: `https://api.semanticscholar.org/graph/v1/paper/search`.

use crate::provider::Provider;
use crate::rate_limit::{self, RateLimiter};
use crate::retry::{self, RetryPolicy};
use serde::Deserialize;
use slr_artifact::Document;
use slr_utils::error::{Result, SlrError};
use std::sync::Arc;

pub struct SemanticScholarProvider {
    client: reqwest::Client,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
}

impl SemanticScholarProvider {
    #[must_use]
    pub fn new(capacity: f64, refill_per_second: f64) -> Self {
        Self {
            client: reqwest::Client::new(),
            limiter: rate_limit::limiter_for("semantic_scholar", capacity, refill_per_second),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Paper>,
}

#[derive(Deserialize)]
struct Paper {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<PaperAuthor>,
    year: Option<i32>,
    venue: Option<String>,
    #[serde(rename = "externalIds")]
    external_ids: Option<ExternalIds>,
    url: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(rename = "citationCount")]
    citation_count: Option<u64>,
}

#[derive(Deserialize)]
struct PaperAuthor {
    name: Option<String>,
}

#[derive(Deserialize)]
struct ExternalIds {
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(rename = "ArXiv")]
    arxiv: Option<String>,
    #[serde(rename = "PubMed")]
    pubmed: Option<String>,
}

impl From<Paper> for Document {
    fn from(paper: Paper) -> Self {
        let title = paper.title.unwrap_or_default();
        let authors: Vec<String> = paper.authors.into_iter().filter_map(|a| a.name).collect();
        let first_author = authors.first().cloned().unwrap_or_default();
        let fingerprint = Document::compute_fingerprint(&title, &first_author, paper.year);
        let (doi, arxiv_id, pubmed_id) = match paper.external_ids {
            Some(ids) => (ids.doi, ids.arxiv, ids.pubmed),
            None => (None, None, None),
        };
        Document {
            title,
            authors,
            year: paper.year,
            venue: paper.venue,
            doi,
            url: paper.url,
            abstract_text: paper.abstract_text,
            citation_count: paper.citation_count,
            provider: "semantic_scholar".to_string(),
            arxiv_id,
            pubmed_id,
            fingerprint,
        }
    }
}

#[async_trait::async_trait]
impl Provider for SemanticScholarProvider {
    fn name(&self) -> &'static str {
        "semantic_scholar"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Document>> {
        let client = &self.client;
        let limit = max_results.min(100).max(1);
        retry::retry_with_backoff(self.retry, || async {
            self.limiter.acquire().await;
            let response = client
                .get("https://api.semanticscholar.org/graph/v1/paper/search")
                .query(&[
                    ("query", query.to_string()),
                    ("limit", limit.to_string()),
                    (
                        "fields",
                        "title,authors,year,venue,externalIds,url,abstract,citationCount".to_string(),
                    ),
                ])
                .send()
                .await
                .map_err(|e| transient(&e))?;
            if response.status().as_u16() == 429 {
                return Err(SlrError::RateLimited {
                    provider_name: "semantic_scholar".into(),
                    retry_after_seconds: 1,
                });
            }
            if response.status().is_server_error() {
                return Err(SlrError::Provider {
                    provider_name: "semantic_scholar".into(),
                    message: format!("HTTP {}", response.status()),
                    retriable: true,
                });
            }
            if !response.status().is_success() {
                return Err(SlrError::Provider {
                    provider_name: "semantic_scholar".into(),
                    message: format!("HTTP {}", response.status()),
                    retriable: false,
                });
            }
            let parsed: SearchResponse = response.json().await.map_err(|e| transient(&e))?;
            Ok(parsed.data.into_iter().take(max_results).map(Document::from).collect())
        })
        .await
    }
}

fn transient(err: &reqwest::Error) -> SlrError {
    SlrError::Provider {
        provider_name: "semantic_scholar".to_string(),
        message: err.to_string(),
        retriable: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_external_ids() {
        let paper = Paper {
            title: Some("T".into()),
            authors: vec![],
            year: Some(2020),
            venue: None,
            external_ids: Some(ExternalIds {
                doi: Some("10.1/x".into()),
                arxiv: Some("2001.00001".into()),
                pubmed: None,
            }),
            url: None,
            abstract_text: None,
            citation_count: None,
        };
        let doc: Document = paper.into();
        assert_eq!(doc.doi.as_deref(), Some("10.1/x"));
        assert_eq!(doc.arxiv_id.as_deref(), Some("2001.00001"));
    }
}
