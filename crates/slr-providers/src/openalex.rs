//! OpenAlex provider: `https://api.openalex.org/works`.

use crate::provider::Provider;
use crate::rate_limit::{self, RateLimiter};
use crate::retry::{self, RetryPolicy};
use serde::Deserialize;
use slr_artifact::Document;
use slr_utils::error::{Result, SlrError};
use std::sync::Arc;

pub struct OpenAlexProvider {
    client: reqwest::Client,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
}

impl OpenAlexProvider {
    #[must_use]
    pub fn new(capacity: f64, refill_per_second: f64) -> Self {
        Self {
            client: reqwest::Client::new(),
            limiter: rate_limit::limiter_for("openalex", capacity, refill_per_second),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Deserialize)]
struct WorksResponse {
    results: Vec<Work>,
}

#[derive(Deserialize)]
struct Work {
    title: Option<String>,
    #[serde(default)]
    authorships: Vec<Authorship>,
    publication_year: Option<i32>,
    #[serde(default)]
    host_venue: Option<Venue>,
    doi: Option<String>,
    #[serde(default)]
    cited_by_count: Option<u64>,
    #[serde(default)]
    abstract_inverted_index: Option<serde_json::Map<String, serde_json::Value>>,
    id: Option<String>,
}

#[derive(Deserialize)]
struct Authorship {
    author: Option<Author>,
}

#[derive(Deserialize)]
struct Author {
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct Venue {
    display_name: Option<String>,
}

fn reconstruct_abstract(index: &serde_json::Map<String, serde_json::Value>) -> String {
    let mut positions: Vec<(usize, &str)> = Vec::new();
    for (word, slots) in index {
        if let Some(arr) = slots.as_array() {
            for slot in arr {
                if let Some(pos) = slot.as_u64() {
                    positions.push((pos as usize, word.as_str()));
                }
            }
        }
    }
    positions.sort_by_key(|(pos, _)| *pos);
    positions
        .into_iter()
        .map(|(_, word)| word)
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<Work> for Document {
    fn from(work: Work) -> Self {
        let title = work.title.unwrap_or_default();
        let authors: Vec<String> = work
            .authorships
            .into_iter()
            .filter_map(|a| a.author.and_then(|author| author.display_name))
            .collect();
        let first_author = authors.first().cloned().unwrap_or_default();
        let fingerprint = Document::compute_fingerprint(&title, &first_author, work.publication_year);
        Document {
            title,
            authors,
            year: work.publication_year,
            venue: work.host_venue.and_then(|v| v.display_name),
            doi: work.doi,
            url: work.id,
            abstract_text: work.abstract_inverted_index.as_ref().map(reconstruct_abstract),
            citation_count: work.cited_by_count,
            provider: "openalex".to_string(),
            arxiv_id: None,
            pubmed_id: None,
            fingerprint,
        }
    }
}

#[async_trait::async_trait]
impl Provider for OpenAlexProvider {
    fn name(&self) -> &'static str {
        "openalex"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Document>> {
        let client = &self.client;
        let per_page = max_results.min(200).max(1);
        retry::retry_with_backoff(self.retry, || async {
            self.limiter.acquire().await;
            let response = client
                .get("https://api.openalex.org/works")
                .query(&[
                    ("search", query.to_string()),
                    ("per-page", per_page.to_string()),
                ])
                .send()
                .await
                .map_err(|e| transient_error("openalex", &e))?;
            if response.status().as_u16() == 429 {
                return Err(SlrError::RateLimited {
                    provider_name: "openalex".into(),
                    retry_after_seconds: 1,
                });
            }
            if response.status().is_server_error() {
                return Err(SlrError::Provider {
                    provider_name: "openalex".into(),
                    message: format!("HTTP {}", response.status()),
                    retriable: true,
                });
            }
            if !response.status().is_success() {
                return Err(SlrError::Provider {
                    provider_name: "openalex".into(),
                    message: format!("HTTP {}", response.status()),
                    retriable: false,
                });
            }
            let parsed: WorksResponse = response
                .json()
                .await
                .map_err(|e| transient_error("openalex", &e))?;
            Ok(parsed
                .results
                .into_iter()
                .take(max_results)
                .map(Document::from)
                .collect())
        })
        .await
    }
}

fn transient_error(provider_name: &str, err: &reqwest::Error) -> SlrError {
    SlrError::Provider {
        provider_name: provider_name.to_string(),
        message: err.to_string(),
        retriable: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstructs_abstract_in_word_order() {
        let mut index = serde_json::Map::new();
        index.insert("world".into(), serde_json::json!([1]));
        index.insert("hello".into(), serde_json::json!([0]));
        assert_eq!(reconstruct_abstract(&index), "hello world");
    }
}
