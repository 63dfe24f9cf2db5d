//! The `LLMDrafter` capability interface: the one seam through which any
//! stage reaches an LLM. Per the redesign notes, this interface is
//! deliberately narrow — a single `draft` call — so the critique loop
//! above it (see [`crate::critique`]) and the deterministic fallback below
//! it stay testable without a real network dependency.

use async_trait::async_trait;
use slr_utils::error::Result;
use slr_utils::types::GenerationMode;

/// One call's worth of drafted text, tagged with enough provenance to
/// populate an artifact's `ModelMetadata`.
#[derive(Debug, Clone)]
pub struct DraftOutput {
    pub text: String,
    pub model_name: String,
    pub mode: GenerationMode,
}

#[async_trait]
pub trait LLMDrafter: Send + Sync {
    /// Short name for logging and `ModelMetadata.model_name` when the
    /// backend doesn't report its own.
    fn name(&self) -> &'static str;

    /// Draft (or critique/refine — the prompt carries the distinction)
    /// text for `prompt`. Implementations do not retry; [`crate::critique`]
    /// owns the bounded iteration policy above this call.
    async fn draft(&self, prompt: &str) -> Result<DraftOutput>;
}
