//! An HTTP-backed drafter for OpenAI-compatible chat completion APIs — the
//! one real network backend the pipeline ships, selected by
//! `llm.provider = openai`. Grounded in the shape of a minimal chat
//! completions client: a `reqwest::Client`, a bearer token, one POST per
//! draft call, no retry (the critique loop above this decides whether to
//! fall back, not this backend).

use crate::drafter::{DraftOutput, LLMDrafter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use slr_utils::error::{Result, SlrError};
use slr_utils::types::GenerationMode;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct OpenAiDrafter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiDrafter {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SlrError::Internal(format!("building HTTP client failed: {e}")))?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl LLMDrafter for OpenAiDrafter {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn draft(&self, prompt: &str) -> Result<DraftOutput> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SlrError::Provider {
                provider_name: "openai".to_string(),
                message: e.to_string(),
                retriable: e.is_timeout() || e.is_connect(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retriable = status.is_server_error() || status.as_u16() == 429;
            let text = response.text().await.unwrap_or_default();
            return Err(SlrError::Provider {
                provider_name: "openai".to_string(),
                message: format!("HTTP {status}: {text}"),
                retriable,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| SlrError::Provider {
            provider_name: "openai".to_string(),
            message: format!("malformed response: {e}"),
            retriable: false,
        })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| SlrError::Provider {
                provider_name: "openai".to_string(),
                message: "response contained no choices".to_string(),
                retriable: false,
            })?;

        Ok(DraftOutput {
            text,
            model_name: self.model.clone(),
            mode: GenerationMode::Llm,
        })
    }
}
