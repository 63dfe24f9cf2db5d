//! A canned-response drafter for tests: returns a fixed string (or cycles
//! through a scripted sequence) without ever touching the network. Distinct
//! from `llm.provider = mock`'s production use as a network-free
//! placeholder backend: [`crate::registry::build_drafter`] returns `None`
//! (not this drafter) for `llm.provider = deterministic`, since that mode
//! should never attempt an LLM call at all, not even a fake one.

use crate::drafter::{DraftOutput, LLMDrafter};
use async_trait::async_trait;
use slr_utils::error::Result;
use slr_utils::types::GenerationMode;
use std::sync::Mutex;

pub struct MockDrafter {
    responses: Mutex<Vec<String>>,
}

impl MockDrafter {
    /// A drafter that always returns `response`.
    #[must_use]
    pub fn fixed(response: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(vec![response.into()]),
        }
    }

    /// A drafter that returns each of `responses` in order, then keeps
    /// repeating the last one (for critique-loop tests that draft once and
    /// critique N times).
    #[must_use]
    pub fn scripted(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
        }
    }
}

#[async_trait]
impl LLMDrafter for MockDrafter {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn draft(&self, _prompt: &str) -> Result<DraftOutput> {
        let mut responses = self.responses.lock().expect("mock drafter lock poisoned");
        let text = if responses.len() > 1 {
            responses.remove(0)
        } else {
            responses.first().cloned().unwrap_or_default()
        };
        Ok(DraftOutput {
            text,
            model_name: "mock".to_string(),
            mode: GenerationMode::Mock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_returns_the_same_text_every_call() {
        let drafter = MockDrafter::fixed("hello");
        let a = drafter.draft("p").await.unwrap();
        let b = drafter.draft("p").await.unwrap();
        assert_eq!(a.text, "hello");
        assert_eq!(b.text, "hello");
        assert_eq!(a.mode, GenerationMode::Mock);
    }

    #[tokio::test]
    async fn scripted_advances_then_holds_on_last() {
        let drafter = MockDrafter::scripted(vec!["first".into(), "second".into()]);
        assert_eq!(drafter.draft("p").await.unwrap().text, "first");
        assert_eq!(drafter.draft("p").await.unwrap().text, "second");
        assert_eq!(drafter.draft("p").await.unwrap().text, "second");
    }
}
