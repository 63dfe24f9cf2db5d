//! Search Executor: fans a `DatabaseQueryPlan` out to the providers that can
//! run it, persists each provider's results, deduplicates, and composes a
//! `SearchResults` artifact.
//!
//! Concurrency is bounded with a `tokio::sync::Semaphore` and cancellation
//! is cooperative via a `tokio_util::sync::CancellationToken` — the same
//! worker-pool-with-explicit-deadlines shape used elsewhere in this
//! codebase for concurrent subprocess runners.

use camino::Utf8PathBuf;
use chrono::Utc;
use slr_artifact::{DatabaseQuery, DeduplicationStats, Document, ProviderWarning, SearchResults};
use slr_providers::registry::ProviderRegistry;
use slr_utils::atomic_write::write_file_atomic;
use slr_utils::canonicalization::emit_jcs;
use slr_utils::error::{Result, SlrError};
use slr_utils::paths::ensure_dir_all;
use slr_utils::types::ArtifactHeader;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy)]
pub struct ExecutorConfig {
    pub max_results_per_db: usize,
    pub auto_deduplicate: bool,
    pub concurrency: usize,
    pub per_call_timeout: Duration,
    pub overall_timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_results_per_db: 100,
            auto_deduplicate: true,
            concurrency: 4,
            per_call_timeout: Duration::from_secs(60),
            overall_timeout: Duration::from_secs(5 * 60),
        }
    }
}

struct ProviderRun {
    database: String,
    outcome: std::result::Result<Vec<Document>, SlrError>,
}

pub struct SearchExecutor {
    providers: Arc<ProviderRegistry>,
    base_dir: Utf8PathBuf,
}

impl SearchExecutor {
    #[must_use]
    pub fn new(providers: ProviderRegistry, base_dir: impl Into<Utf8PathBuf>) -> Self {
        Self::with_registry(Arc::new(providers), base_dir)
    }

    /// Like [`Self::new`], but shares an already-constructed registry
    /// (and its live rate limiters) instead of owning a fresh one — used
    /// when a caller keeps one `ProviderRegistry` alive across stages.
    #[must_use]
    pub fn with_registry(providers: Arc<ProviderRegistry>, base_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            providers,
            base_dir: base_dir.into(),
        }
    }

    fn results_dir(&self, project_id: &str) -> Utf8PathBuf {
        self.base_dir.join(project_id).join("search_results")
    }

    /// Runs `plan` to completion (or until `cancellation` fires), returning
    /// the composed `SearchResults` artifact. Writes one result file per
    /// provider that returned documents, plus a deduplicated file when
    /// applicable; writes nothing if cancelled or if every executable
    /// provider failed.
    pub async fn execute(
        &self,
        project_id: &str,
        queries: &[DatabaseQuery],
        config: ExecutorConfig,
        cancellation: CancellationToken,
    ) -> Result<SearchResults> {
        let start = Instant::now();

        let mut executable: Vec<&DatabaseQuery> = Vec::new();
        let mut warnings = Vec::new();
        for query in queries {
            if self.providers.contains(&query.database_name) {
                executable.push(query);
            } else {
                warnings.push(ProviderWarning {
                    database: query.database_name.clone(),
                    message: "no executable provider registered for this database; syntax-only"
                        .to_string(),
                });
            }
        }
        if executable.is_empty() {
            return Err(SlrError::validation(
                "no executable databases in query plan",
            ));
        }

        let concurrency = config.concurrency.min(executable.len()).max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));

        let mut join_set: JoinSet<ProviderRun> = JoinSet::new();
        for query in &executable {
            let database = query.database_name.clone();
            let boolean_query = query.boolean_query_string.clone();
            let max_results = config.max_results_per_db;
            let providers = Arc::clone(&self.providers);
            let semaphore = Arc::clone(&semaphore);
            let cancellation = cancellation.clone();
            let per_call_timeout = config.per_call_timeout;

            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                if cancellation.is_cancelled() {
                    return ProviderRun {
                        database: database.clone(),
                        outcome: Err(SlrError::Internal("cancelled before dispatch".into())),
                    };
                }
                let outcome = tokio::select! {
                    biased;
                    () = cancellation.cancelled() => {
                        Err(SlrError::Internal("cancelled in flight".into()))
                    }
                    res = Self::run_one(providers, &database, &boolean_query, max_results, per_call_timeout) => res,
                };
                ProviderRun { database, outcome }
            });
        }

        let overall = tokio::time::timeout(config.overall_timeout, async {
            let mut runs = Vec::with_capacity(executable.len());
            while let Some(joined) = join_set.join_next().await {
                match joined {
                    Ok(run) => runs.push(run),
                    Err(join_err) => {
                        runs.push(ProviderRun {
                            database: "unknown".to_string(),
                            outcome: Err(SlrError::Internal(format!("task panicked: {join_err}"))),
                        });
                    }
                }
            }
            runs
        })
        .await;

        if cancellation.is_cancelled() {
            return Err(SlrError::Internal(
                "search execution cancelled; no results written".into(),
            ));
        }

        let runs = overall.map_err(|_| {
            SlrError::Timeout(config.overall_timeout)
        })?;

        let mut databases_searched = Vec::new();
        let mut result_file_paths = Vec::new();
        let mut all_documents: Vec<Document> = Vec::new();
        let mut total_results = 0usize;
        let mut providers_with_results = 0usize;

        // Preserve the order databases appear in the plan, not completion order.
        let mut by_database: std::collections::HashMap<String, std::result::Result<Vec<Document>, SlrError>> =
            runs.into_iter().map(|r| (r.database, r.outcome)).collect();

        for query in &executable {
            let Some(outcome) = by_database.remove(&query.database_name) else {
                continue;
            };
            match outcome {
                Ok(documents) => {
                    total_results += documents.len();
                    if !documents.is_empty() {
                        providers_with_results += 1;
                        let path = self.write_result_file(project_id, &query.database_name, &documents)?;
                        result_file_paths.push(path);
                    }
                    databases_searched.push(query.database_name.clone());
                    all_documents.extend(documents);
                }
                Err(err) => {
                    warnings.push(ProviderWarning {
                        database: query.database_name.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        if databases_searched.is_empty() {
            return Err(SlrError::validation(
                "every executable provider failed; no search results produced",
            ));
        }

        let mut deduplicated_count = total_results;
        let mut deduplication_stats = DeduplicationStats {
            original_count: total_results,
            duplicates_removed: 0,
            rate: 0.0,
        };

        if config.auto_deduplicate && providers_with_results >= 2 {
            let (unique, stats) = slr_dedup::deduplicate(all_documents);
            deduplicated_count = unique.len();
            let joined_providers = databases_searched.join("_");
            let path = self.write_dedup_file(project_id, &joined_providers, &unique)?;
            result_file_paths.push(path);
            deduplication_stats = stats;
        }

        Ok(SearchResults {
            header: ArtifactHeader::new(project_id),
            total_results,
            deduplicated_count,
            databases_searched,
            result_file_paths,
            deduplication_stats,
            execution_time_seconds: start.elapsed().as_secs_f64(),
            warnings,
        })
    }

    async fn run_one(
        providers: Arc<ProviderRegistry>,
        database: &str,
        boolean_query: &str,
        max_results: usize,
        per_call_timeout: Duration,
    ) -> std::result::Result<Vec<Document>, SlrError> {
        let Some(provider) = providers.get(database) else {
            return Err(SlrError::validation(format!(
                "no provider registered for '{database}'"
            )));
        };
        match tokio::time::timeout(per_call_timeout, provider.search(boolean_query, max_results)).await {
            Ok(result) => result,
            Err(_) => Err(SlrError::Timeout(per_call_timeout)),
        }
    }

    fn write_result_file(
        &self,
        project_id: &str,
        provider_name: &str,
        documents: &[Document],
    ) -> Result<String> {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        let filename = format!("{provider_name}_{timestamp}.json");
        self.write_json_file(project_id, &filename, documents)
    }

    fn write_dedup_file(
        &self,
        project_id: &str,
        joined_providers: &str,
        documents: &[Document],
    ) -> Result<String> {
        let timestamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        let filename = format!("deduplicated_{joined_providers}_{timestamp}.json");
        self.write_json_file(project_id, &filename, documents)
    }

    fn write_json_file(&self, project_id: &str, filename: &str, documents: &[Document]) -> Result<String> {
        let dir = self.results_dir(project_id);
        ensure_dir_all(&dir).map_err(SlrError::Io)?;
        let path = dir.join(filename);
        let json = emit_jcs(&documents)?;
        write_file_atomic(&path, &json)
            .map_err(|e| SlrError::Internal(format!("writing search result file failed: {e}")))?;
        Ok(path.to_string())
    }
}
