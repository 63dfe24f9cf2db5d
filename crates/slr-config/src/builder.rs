//! Programmatic configuration, for embedders that want deterministic
//! behavior without touching the filesystem or environment (tests, a
//! future non-CLI front end).

use crate::model::{Config, DedupConfig, ExecutorSettings, LlmConfig, LlmProvider, ProviderRate};
use camino::Utf8PathBuf;
use slr_utils::error::Result;
use std::collections::HashMap;

impl Config {
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    #[must_use]
    pub fn base_dir(mut self, base_dir: impl Into<Utf8PathBuf>) -> Self {
        self.config.base_dir = base_dir.into();
        self
    }

    #[must_use]
    pub fn llm_provider(mut self, provider: LlmProvider) -> Self {
        self.config.llm.provider = provider;
        self
    }

    #[must_use]
    pub fn llm_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.llm.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn llm(mut self, llm: LlmConfig) -> Self {
        self.config.llm = llm;
        self
    }

    #[must_use]
    pub fn executor(mut self, executor: ExecutorSettings) -> Self {
        self.config.executor = executor;
        self
    }

    #[must_use]
    pub fn provider_rate(mut self, name: impl Into<String>, rate: ProviderRate) -> Self {
        self.config.provider_rates.insert(name.into(), rate);
        self
    }

    #[must_use]
    pub fn dedup_enabled(mut self, enabled: bool) -> Self {
        self.config.dedup = DedupConfig { enabled };
        self
    }

    pub fn build(self) -> Result<Config> {
        crate::validation::validate(&self.config)?;
        Ok(self.config)
    }
}

/// A config suitable for tests: an isolated base dir under `tmp`, mock LLM
/// backend, small executor timeouts so a hung test fails fast.
#[must_use]
pub fn test_config(base_dir: impl Into<Utf8PathBuf>) -> Config {
    Config {
        base_dir: base_dir.into(),
        llm: LlmConfig {
            provider: LlmProvider::Mock,
            api_key: None,
        },
        executor: ExecutorSettings {
            max_results_per_db: 10,
            concurrency: 2,
            per_call_timeout_seconds: 5,
            overall_timeout_seconds: 15,
            ..ExecutorSettings::default()
        },
        provider_rates: HashMap::new(),
        dedup: DedupConfig::default(),
    }
}
