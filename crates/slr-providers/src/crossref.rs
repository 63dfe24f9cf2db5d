//! Crossref provider: `https://api.crossref.org/works`.

use crate::provider::Provider;
use crate::rate_limit::{self, RateLimiter};
use crate::retry::{self, RetryPolicy};
use serde::Deserialize;
use slr_artifact::Document;
use slr_utils::error::{Result, SlrError};
use std::sync::Arc;

pub struct CrossrefProvider {
    client: reqwest::Client,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
}

impl CrossrefProvider {
    #[must_use]
    pub fn new(capacity: f64, refill_per_second: f64) -> Self {
        Self {
            client: reqwest::Client::new(),
            limiter: rate_limit::limiter_for("crossref", capacity, refill_per_second),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Deserialize)]
struct MessageWrapper {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    items: Vec<Item>,
}

#[derive(Deserialize)]
struct Item {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<CrossrefAuthor>,
    #[serde(rename = "container-title", default)]
    container_title: Vec<String>,
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
    #[serde(rename = "is-referenced-by-count")]
    is_referenced_by_count: Option<u64>,
    #[serde(rename = "published-print")]
    published_print: Option<DatePart>,
    #[serde(rename = "published-online")]
    published_online: Option<DatePart>,
    #[serde(rename = "abstract")]
    abstract_field: Option<String>,
}

#[derive(Deserialize)]
struct CrossrefAuthor {
    given: Option<String>,
    family: Option<String>,
}

#[derive(Deserialize)]
struct DatePart {
    #[serde(rename = "date-parts")]
    date_parts: Vec<Vec<i32>>,
}

impl DatePart {
    fn year(&self) -> Option<i32> {
        self.date_parts.first().and_then(|parts| parts.first()).copied()
    }
}

impl From<Item> for Document {
    fn from(item: Item) -> Self {
        let title = item.title.into_iter().next().unwrap_or_default();
        let authors: Vec<String> = item
            .author
            .into_iter()
            .map(|a| match (a.given, a.family) {
                (Some(given), Some(family)) => format!("{given} {family}"),
                (None, Some(family)) => family,
                (Some(given), None) => given,
                (None, None) => String::new(),
            })
            .filter(|s| !s.is_empty())
            .collect();
        let first_author = authors.first().cloned().unwrap_or_default();
        let year = item
            .published_print
            .as_ref()
            .and_then(DatePart::year)
            .or_else(|| item.published_online.as_ref().and_then(DatePart::year));
        let fingerprint = Document::compute_fingerprint(&title, &first_author, year);
        Document {
            title,
            authors,
            year,
            venue: item.container_title.into_iter().next(),
            doi: item.doi,
            url: item.url,
            abstract_text: item.abstract_field,
            citation_count: item.is_referenced_by_count,
            provider: "crossref".to_string(),
            arxiv_id: None,
            pubmed_id: None,
            fingerprint,
        }
    }
}

#[async_trait::async_trait]
impl Provider for CrossrefProvider {
    fn name(&self) -> &'static str {
        "crossref"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Document>> {
        let client = &self.client;
        let rows = max_results.min(1000).max(1);
        retry::retry_with_backoff(self.retry, || async {
            self.limiter.acquire().await;
            let response = client
                .get("https://api.crossref.org/works")
                .query(&[("query", query.to_string()), ("rows", rows.to_string())])
                .send()
                .await
                .map_err(|e| transient("crossref", &e))?;
            if response.status().as_u16() == 429 {
                return Err(SlrError::RateLimited {
                    provider_name: "crossref".into(),
                    retry_after_seconds: 1,
                });
            }
            if response.status().is_server_error() {
                return Err(SlrError::Provider {
                    provider_name: "crossref".into(),
                    message: format!("HTTP {}", response.status()),
                    retriable: true,
                });
            }
            if !response.status().is_success() {
                return Err(SlrError::Provider {
                    provider_name: "crossref".into(),
                    message: format!("HTTP {}", response.status()),
                    retriable: false,
                });
            }
            let parsed: MessageWrapper = response.json().await.map_err(|e| transient("crossref", &e))?;
            Ok(parsed
                .message
                .items
                .into_iter()
                .take(max_results)
                .map(Document::from)
                .collect())
        })
        .await
    }
}

fn transient(provider_name: &str, err: &reqwest::Error) -> SlrError {
    SlrError::Provider {
        provider_name: provider_name.to_string(),
        message: err.to_string(),
        retriable: true,
    }
}
