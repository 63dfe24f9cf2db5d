//! Structural validation of a resolved [`Config`]. Separate from discovery
//! so the builder path (no file, no CLI) gets the same checks.

use crate::model::{Config, LlmProvider};
use slr_utils::error::{Result, SlrError};

pub fn validate(config: &Config) -> Result<()> {
    if config.executor.concurrency == 0 {
        return Err(SlrError::validation(
            "executor.concurrency must be at least 1",
        ));
    }
    if config.executor.max_results_per_db == 0 {
        return Err(SlrError::validation(
            "executor.max_results_per_db must be at least 1",
        ));
    }
    if config.executor.retry.attempts == 0 {
        return Err(SlrError::validation(
            "executor.retry.attempts must be at least 1",
        ));
    }
    if !(0.0..=1.0).contains(&config.executor.retry.jitter_ratio) {
        return Err(SlrError::validation(
            "executor.retry.jitter_ratio must be between 0.0 and 1.0",
        ));
    }
    if matches!(config.llm.provider, LlmProvider::Openai) && config.llm.api_key.is_none() {
        return Err(SlrError::validation(
            "llm.provider = openai requires llm.api_key",
        ));
    }
    for (name, rate) in &config.provider_rates {
        if rate.capacity <= 0.0 || rate.refill_per_second <= 0.0 {
            return Err(SlrError::validation(format!(
                "provider.{name}.rate must have positive capacity and refill_per_second"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProviderRate;

    #[test]
    fn zero_concurrency_is_rejected() {
        let mut config = Config::default();
        config.executor.concurrency = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn openai_without_api_key_is_rejected() {
        let mut config = Config::default();
        config.llm.provider = LlmProvider::Openai;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn non_positive_provider_rate_is_rejected() {
        let mut config = Config::default();
        config
            .provider_rates
            .insert("openalex".to_string(), ProviderRate { capacity: 0.0, refill_per_second: 1.0 });
        assert!(validate(&config).is_err());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }
}
