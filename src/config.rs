//! Process-wide configuration, built once at startup and passed down.

use crate::error::Result;
use crate::image::providers::{OpenAiImageEditor, OpenAiImageModel};
use crate::pipeline::NailArtPipeline;
use crate::vision::{OpenAiHandValidator, DEFAULT_VISION_MODEL};
use crate::DEFAULT_BASE_URL;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Default listen address for the web UI.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Default request body limit for uploads (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Everything needed to talk to the provider and serve the UI.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key. `None` defers to `OPENAI_API_KEY` at build time.
    pub api_key: Option<String>,
    /// API base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Model used for the edit call.
    pub edit_model: OpenAiImageModel,
    /// Vision model used for validation.
    pub vision_model: String,
    /// Whether to validate photos before editing.
    pub validate: bool,
    /// Directory for per-run scratch files.
    pub scratch_dir: PathBuf,
    /// Whole-request timeout for provider calls.
    pub timeout: Option<Duration>,
    /// Web UI listen address.
    pub bind: SocketAddr,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            edit_model: OpenAiImageModel::default(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            validate: true,
            scratch_dir: std::env::temp_dir(),
            timeout: None,
            bind: SocketAddr::from(([127, 0, 0, 1], 8501)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    /// Builds the edit client.
    pub fn image_editor(&self) -> Result<OpenAiImageEditor> {
        let mut builder = OpenAiImageEditor::builder()
            .base_url(&self.base_url)
            .model(self.edit_model);
        if let Some(key) = &self.api_key {
            builder = builder.api_key(key);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// Builds the validation client.
    pub fn hand_validator(&self) -> Result<OpenAiHandValidator> {
        let mut builder = OpenAiHandValidator::builder()
            .base_url(&self.base_url)
            .model(&self.vision_model);
        if let Some(key) = &self.api_key {
            builder = builder.api_key(key);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// Wires editor, optional validator and scratch directory into a pipeline.
    pub fn pipeline(&self) -> Result<NailArtPipeline> {
        let pipeline = NailArtPipeline::new(Arc::new(self.image_editor()?), &self.scratch_dir);
        if self.validate {
            Ok(pipeline.with_validator(Arc::new(self.hand_validator()?)))
        } else {
            Ok(pipeline)
        }
    }
}
