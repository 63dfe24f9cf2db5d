//! The LLM capability interface (§9): a single narrow `LLMDrafter` trait,
//! a bounded draft→critique→refine loop above it, and the concrete
//! backends (`openai`, `mock`) selected by [`slr_config::LlmProvider`].
//! No LLM runtime is reimplemented here — this crate only ever makes one
//! HTTP call per `draft` and never re-derives model behavior.

pub mod critique;
pub mod drafter;
pub mod mock;
pub mod openai;
pub mod registry;

pub use critique::{CritiqueConfig, CritiqueOutcome};
pub use drafter::{DraftOutput, LLMDrafter};
pub use mock::MockDrafter;
pub use openai::OpenAiDrafter;
pub use registry::build_drafter;
