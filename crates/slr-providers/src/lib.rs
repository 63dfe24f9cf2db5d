//! Search provider clients: rate-limited, retrying, normalized to
//! [`slr_artifact::Document`].

pub mod arxiv;
pub mod crossref;
pub mod openalex;
pub mod provider;
pub mod rate_limit;
pub mod registry;
pub mod retry;
pub mod semantic_scholar;

pub use arxiv::ArxivProvider;
pub use crossref::CrossrefProvider;
pub use openalex::OpenAlexProvider;
pub use provider::Provider;
pub use rate_limit::RateLimiter;
pub use registry::{ProviderRegistry, RateConfig};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use semantic_scholar::SemanticScholarProvider;
