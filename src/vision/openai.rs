//! OpenAI chat-completions hand photo validator.

use crate::error::{classify_api_error, NailVizError, Result};
use crate::vision::validator::{
    HandValidator, HAND_PHOTO_QUESTION, VALIDATION_ERROR_PREFIX, VALIDATION_MAX_TOKENS,
};
use crate::DEFAULT_BASE_URL;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default vision-capable chat model.
pub const DEFAULT_VISION_MODEL: &str = "gpt-4.1";

/// Builder for OpenAiHandValidator.
#[derive(Debug, Clone, Default)]
pub struct OpenAiHandValidatorBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl OpenAiHandValidatorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `OPENAI_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API base URL (default `https://api.openai.com/v1`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the chat model (default `gpt-4.1`).
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets a whole-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the validator, resolving the API key.
    pub fn build(self) -> Result<OpenAiHandValidator> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                NailVizError::Auth("OPENAI_API_KEY not set and no API key provided".into())
            })?;

        let mut client = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OpenAiHandValidator {
            client: client.build()?,
            api_key,
            completions_url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: self
                .model
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
        })
    }
}

/// Validates hand photos with a vision-capable chat model.
pub struct OpenAiHandValidator {
    client: reqwest::Client,
    api_key: String,
    completions_url: String,
    model: String,
}

impl OpenAiHandValidator {
    /// Creates a new `OpenAiHandValidatorBuilder`.
    pub fn builder() -> OpenAiHandValidatorBuilder {
        OpenAiHandValidatorBuilder::new()
    }

    /// Returns the chat model this validator calls.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn ask(&self, base64_image: &str, content_type: &str) -> Result<String> {
        let start = Instant::now();
        let body = ChatRequest::hand_photo_question(&self.model, base64_image, content_type);

        let response = self
            .client
            .post(&self.completions_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status.as_u16(), &text, &headers));
        }

        let chat: ChatResponse = response.json().await?;
        let answer = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                NailVizError::UnexpectedResponse("No answer in chat completion response".into())
            })?;

        tracing::info!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis() as u64,
            "hand photo validation answered"
        );

        Ok(answer.trim().to_string())
    }
}

#[async_trait]
impl HandValidator for OpenAiHandValidator {
    async fn check(&self, base64_image: &str, content_type: &str) -> String {
        match self.ask(base64_image, content_type).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(model = %self.model, error = %e, "hand photo validation failed");
                format!("{VALIDATION_ERROR_PREFIX} {e}")
            }
        }
    }

    fn name(&self) -> &str {
        "OpenAI vision"
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

impl ChatRequest {
    fn hand_photo_question(model: &str, base64_image: &str, content_type: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: HAND_PHOTO_QUESTION.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:{content_type};base64,{base64_image}"),
                        },
                    },
                ],
            }],
            max_tokens: VALIDATION_MAX_TOKENS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
