//! OpenAI image edit provider (gpt-image-1, dall-e-2).

use crate::error::{classify_api_error, NailVizError, Result};
use crate::image::provider::ImageEditor;
use crate::image::types::{EditRequest, GeneratedImage, GenerationMetadata, ImageFormat};
use crate::DEFAULT_BASE_URL;
use async_trait::async_trait;
use serde::Deserialize;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// OpenAI image models that support the edits endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpenAiImageModel {
    /// GPT Image 1 - always answers with base64 PNG.
    #[default]
    GptImage1,
    /// DALL-E 2 - needs `response_format=b64_json` to skip the URL round-trip.
    DallE2,
}

impl OpenAiImageModel {
    /// Returns the API model identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GptImage1 => "gpt-image-1",
            Self::DallE2 => "dall-e-2",
        }
    }
}

impl FromStr for OpenAiImageModel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "gpt-image-1" => Ok(Self::GptImage1),
            "dall-e-2" => Ok(Self::DallE2),
            other => Err(format!(
                "unsupported edit model '{other}' (expected gpt-image-1 or dall-e-2)"
            )),
        }
    }
}

impl std::fmt::Display for OpenAiImageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for OpenAiImageEditor.
#[derive(Debug, Clone, Default)]
pub struct OpenAiImageEditorBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: OpenAiImageModel,
    timeout: Option<Duration>,
}

impl OpenAiImageEditorBuilder {
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

    /// Sets the image model variant.
    pub fn model(mut self, model: OpenAiImageModel) -> Self {
        self.model = model;
        self
    }

    /// Sets a whole-request timeout. Without one, reqwest's defaults apply.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the editor, resolving the API key.
    pub fn build(self) -> Result<OpenAiImageEditor> {
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

        Ok(OpenAiImageEditor {
            client: client.build()?,
            api_key,
            edits_url: format!("{}/images/edits", base_url.trim_end_matches('/')),
            model: self.model,
        })
    }
}

/// OpenAI image edit provider.
pub struct OpenAiImageEditor {
    client: reqwest::Client,
    api_key: String,
    edits_url: String,
    model: OpenAiImageModel,
}

impl OpenAiImageEditor {
    /// Creates a new `OpenAiImageEditorBuilder`.
    pub fn builder() -> OpenAiImageEditorBuilder {
        OpenAiImageEditorBuilder::new()
    }

    /// Returns the model this editor calls.
    pub fn model(&self) -> OpenAiImageModel {
        self.model
    }

    fn build_form(&self, request: &EditRequest) -> Result<reqwest::multipart::Form> {
        let image_part = reqwest::multipart::Part::bytes(request.image.clone())
            .file_name(request.file_name.clone())
            .mime_str(&request.content_type)
            .map_err(|e| NailVizError::InvalidRequest(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .text("model", self.model.as_str())
            .text("prompt", request.prompt.clone())
            .text("n", "1")
            .part("image", image_part);

        if self.model == OpenAiImageModel::DallE2 {
            form = form.text("response_format", "b64_json");
        }

        Ok(form)
    }
}

#[async_trait]
impl ImageEditor for OpenAiImageEditor {
    async fn edit(&self, request: &EditRequest) -> Result<GeneratedImage> {
        let start = Instant::now();
        let form = self.build_form(request)?;

        tracing::debug!(
            model = self.model.as_str(),
            image_bytes = request.image.len(),
            prompt_chars = request.prompt.chars().count(),
            "sending image edit request"
        );

        let response = self
            .client
            .post(&self.edits_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "image edit request failed");
            return Err(classify_api_error(status.as_u16(), &text, &headers));
        }

        let openai_response: OpenAiImageResponse = response.json().await?;

        let b64 = openai_response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| {
                NailVizError::UnexpectedResponse("No images in OpenAI edit response".into())
            })?
            .b64_json
            .ok_or_else(|| {
                NailVizError::UnexpectedResponse(
                    "OpenAI edit response contained no base64 image data".into(),
                )
            })?;

        let data = {
            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(b64.trim())
                .map_err(|e| NailVizError::Decode(e.to_string()))?
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let format = ImageFormat::from_magic_bytes(&data).unwrap_or(ImageFormat::Png);

        tracing::info!(
            model = self.model.as_str(),
            duration_ms,
            size_bytes = data.len(),
            "image edit completed"
        );

        Ok(GeneratedImage::new(
            data,
            format,
            GenerationMetadata {
                model: Some(self.model.as_str().to_string()),
                duration_ms: Some(duration_ms),
            },
        ))
    }

    fn name(&self) -> &str {
        "OpenAI (gpt-image)"
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiImageResponse {
    data: Vec<OpenAiImageData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiImageData {
    #[serde(default)]
    b64_json: Option<String>,
}
