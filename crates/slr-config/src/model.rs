//! The resolved configuration surface (§6): storage root, LLM drafter
//! backend, executor tuning, per-provider rate overrides, and the
//! deduplication toggle. Every field is plain data — no behavior lives
//! here; [`crate::discovery`] and [`crate::builder`] are the only things
//! that construct a [`Config`].

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which backend drafts/critiques text artifacts. `Mock` and
/// `Deterministic` never make network calls; `Openai` is the only backend
/// requiring `api_key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Openai,
    Mock,
    #[default]
    Deterministic,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RetryConfig {
    pub attempts: u32,
    pub base_ms: u64,
    pub jitter_ratio: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_ms: 500,
            jitter_ratio: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ExecutorSettings {
    pub max_results_per_db: usize,
    pub concurrency: usize,
    pub per_call_timeout_seconds: u64,
    pub overall_timeout_seconds: u64,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            max_results_per_db: 100,
            concurrency: 4,
            per_call_timeout_seconds: 60,
            overall_timeout_seconds: 5 * 60,
            retry: RetryConfig::default(),
        }
    }
}

/// Per-provider token-bucket override, keyed by provider name
/// (`provider.<name>.rate.{capacity, refill_per_second}`).
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ProviderRate {
    pub capacity: f64,
    pub refill_per_second: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct DedupConfig {
    pub enabled: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// The fully resolved configuration, after layering CLI args over a
/// discovered TOML file over compiled-in defaults (see [`crate::discovery`]).
#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: Utf8PathBuf,
    pub llm: LlmConfig,
    pub executor: ExecutorSettings,
    pub provider_rates: HashMap<String, ProviderRate>,
    pub dedup: DedupConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: Utf8PathBuf::from(".slr-data"),
            llm: LlmConfig::default(),
            executor: ExecutorSettings::default(),
            provider_rates: HashMap::new(),
            dedup: DedupConfig::default(),
        }
    }
}

/// The on-disk shape of `.slr/config.toml`. Every section is optional so a
/// partial file (just `[llm]`, say) is valid; absent sections fall back to
/// [`Config::default`].
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    pub base_dir: Option<Utf8PathBuf>,
    pub llm: Option<LlmConfig>,
    pub executor: Option<ExecutorSettings>,
    #[serde(default)]
    pub provider: HashMap<String, ProviderSection>,
    pub dedup: Option<DedupConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProviderSection {
    pub rate: ProviderRate,
}
