//! A stage-facing wrapper over `slr_llm::critique::run` that skips the
//! drafter call entirely when none is configured, rather than attempting
//! one that would only fail. The one place every LLM-backed stage goes
//! through, so the deterministic-fallback rule (§7) lives in one spot.

use slr_llm::critique::{self, CritiqueConfig, CritiqueOutcome};
use slr_stage_api::Services;
use slr_utils::types::GenerationMode;

pub async fn draft_with_fallback(
    services: &Services,
    prompt: &str,
    critique_prompt: impl FnMut(&str) -> Option<String>,
    fallback: impl FnOnce() -> String,
) -> CritiqueOutcome {
    match &services.drafter {
        Some(drafter) => {
            critique::run(drafter.as_ref(), prompt, critique_prompt, CritiqueConfig::default(), fallback).await
        }
        None => CritiqueOutcome {
            text: fallback(),
            model_name: "deterministic-fallback".to_string(),
            mode: GenerationMode::Deterministic,
            iterations_run: 0,
        },
    }
}

/// Provenance to attach to the header of an artifact built from `outcome`.
#[must_use]
pub fn model_metadata(outcome: &CritiqueOutcome) -> slr_utils::types::ModelMetadata {
    slr_utils::types::ModelMetadata {
        model_name: outcome.model_name.clone(),
        mode: outcome.mode,
        prompt_version: None,
        generated_at: chrono::Utc::now(),
        notes: if outcome.iterations_run > 0 {
            Some(format!("{} critique iteration(s)", outcome.iterations_run))
        } else {
            None
        },
    }
}
