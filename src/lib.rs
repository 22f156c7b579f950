#![warn(missing_docs)]
//! NailViz - try on nail art with an AI image editor.
//!
//! A user uploads a photo of their hand and describes a nail-art style. The
//! photo is optionally checked by a vision model, then sent with an
//! instruction prompt to an image-edit endpoint, and the edited photo comes
//! back for display and download.
//!
//! # Quick Start
//!
//! ```no_run
//! use nailviz::{Config, RunInput, RunOutcome, StyleDescription, UploadedImage};
//!
//! #[tokio::main]
//! async fn main() -> nailviz::Result<()> {
//!     let pipeline = Config::default().pipeline()?;
//!     let input = RunInput::new(
//!         UploadedImage::from_path("hand.jpg")?,
//!         StyleDescription::new("galaxy theme")?,
//!     );
//!     if let RunOutcome::Generated { image, .. } = pipeline.run(&input).await {
//!         image.save("nail_art_result.png")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `nailviz` binary (web UI and one-shot generation)

mod config;
mod error;
pub mod image;
mod pipeline;
pub mod present;
pub mod prompt;
mod scratch;
pub mod vision;
pub mod web;

/// OpenAI API root used unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

// Re-export error types at crate root
pub use error::{NailVizError, Result};

pub use config::{Config, DEFAULT_BIND, DEFAULT_MAX_UPLOAD_BYTES};
pub use image::providers::{OpenAiImageEditor, OpenAiImageEditorBuilder, OpenAiImageModel};
pub use image::{EditRequest, GeneratedImage, ImageEditor, ImageFormat, UploadedImage};
pub use pipeline::{NailArtPipeline, RunInput, RunOutcome};
pub use prompt::{build_prompt, StyleDescription};
pub use scratch::ScratchFile;
pub use vision::{HandValidator, OpenAiHandValidator, ValidationVerdict};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{NailVizError, Result};
    pub use crate::image::{GeneratedImage, ImageEditor, UploadedImage};
    pub use crate::pipeline::{NailArtPipeline, RunInput, RunOutcome};
    pub use crate::prompt::StyleDescription;
    pub use crate::vision::HandValidator;
}
