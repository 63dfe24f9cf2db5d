//! Selects the `LLMDrafter` backend from a resolved [`slr_config::Config`].
//! `llm.provider = deterministic` deliberately yields `None` — there is no
//! drafter to call, so callers must take the fallback path immediately
//! rather than attempt a call that would only fail.

use crate::drafter::LLMDrafter;
use crate::mock::MockDrafter;
use crate::openai::OpenAiDrafter;
use slr_config::{Config, LlmProvider};
use slr_utils::error::{Result, SlrError};
use std::sync::Arc;

pub fn build_drafter(config: &Config) -> Result<Option<Arc<dyn LLMDrafter>>> {
    match config.llm.provider {
        LlmProvider::Deterministic => Ok(None),
        LlmProvider::Mock => Ok(Some(Arc::new(MockDrafter::fixed(
            "[mock draft: configure llm.provider = openai for real output]",
        )))),
        LlmProvider::Openai => {
            let api_key = config.llm.api_key.clone().ok_or_else(|| {
                SlrError::validation("llm.provider = openai requires llm.api_key")
            })?;
            Ok(Some(Arc::new(OpenAiDrafter::new(api_key)?)))
        }
    }
}
