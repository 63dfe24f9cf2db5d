//! The `Provider` contract: one implementation per executable database.

use slr_artifact::Document;
use slr_utils::error::Result;

/// A search provider: given a compiled query string, returns normalized
/// documents. Implementations own their rate limiting and retry policy
/// internally (see [`crate::rate_limit`] and [`crate::retry`]) — callers
/// just await `search`.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// The database name this provider answers for, matching the
    /// `database_name` field on `DatabaseQuery` (e.g. `"openalex"`).
    fn name(&self) -> &'static str;

    /// Run `query` against the provider's API, capped at `max_results`.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Document>>;
}
