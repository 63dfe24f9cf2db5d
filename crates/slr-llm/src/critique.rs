//! The draft→critique→refine loop (§9 "Critique loop for text artifacts"),
//! reworked from the source's implicit LLM loop into an explicit,
//! bounded finite state machine with a deterministic fallback path that
//! never calls the LLM.
//!
//! States: `Drafting -> Critiquing -> Refining -> Critiquing -> ... -> Done`,
//! capped at `max_iterations` critique/refine round trips (default 2).

use crate::drafter::LLMDrafter;
use slr_utils::types::GenerationMode;

#[derive(Debug, Clone, Copy)]
pub struct CritiqueConfig {
    pub max_iterations: u32,
}

impl Default for CritiqueConfig {
    fn default() -> Self {
        Self { max_iterations: 2 }
    }
}

#[derive(Debug, Clone)]
pub struct CritiqueOutcome {
    pub text: String,
    pub model_name: String,
    pub mode: GenerationMode,
    pub iterations_run: u32,
}

/// Runs the loop against `drafter`. `critique_prompt` builds the next
/// prompt from the current draft (e.g. "critique and improve: {draft}");
/// returning `None` from it signals the draft already satisfies the
/// caller's acceptance check, ending the loop early.
///
/// On any `LLMDrafter` error — at any point in the loop, including the
/// very first draft — this falls back to `deterministic_fallback()` and
/// tags the outcome `GenerationMode::Deterministic`, per the "LLM failures
/// use a deterministic fallback" error-handling rule. It never retries the
/// LLM itself; that's the backend's job.
pub async fn run(
    drafter: &dyn LLMDrafter,
    initial_prompt: &str,
    mut critique_prompt: impl FnMut(&str) -> Option<String>,
    config: CritiqueConfig,
    deterministic_fallback: impl FnOnce() -> String,
) -> CritiqueOutcome {
    let first = match drafter.draft(initial_prompt).await {
        Ok(output) => output,
        Err(_) => {
            return CritiqueOutcome {
                text: deterministic_fallback(),
                model_name: "deterministic-fallback".to_string(),
                mode: GenerationMode::Deterministic,
                iterations_run: 0,
            };
        }
    };

    let mut current = first.text;
    let model_name = first.model_name;
    let mut iterations_run = 0;

    for _ in 0..config.max_iterations {
        let Some(next_prompt) = critique_prompt(&current) else {
            break;
        };
        match drafter.draft(&next_prompt).await {
            Ok(refined) => {
                current = refined.text;
                iterations_run += 1;
            }
            Err(_) => break,
        }
    }

    CritiqueOutcome {
        text: current,
        model_name,
        mode: GenerationMode::Llm,
        iterations_run,
    }
}
