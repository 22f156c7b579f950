//! The upload → validate → generate run.

use crate::error::NailVizError;
use crate::image::{EditRequest, GeneratedImage, ImageEditor, UploadedImage};
use crate::prompt::{build_prompt, StyleDescription};
use crate::scratch::ScratchFile;
use crate::vision::{HandValidator, ValidationVerdict};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Both inputs a run needs. Holding one means the form was complete.
#[derive(Debug, Clone)]
pub struct RunInput {
    /// The hand photo.
    pub image: UploadedImage,
    /// The requested nail-art style.
    pub style: StyleDescription,
}

impl RunInput {
    /// Creates run input from already-checked parts.
    pub fn new(image: UploadedImage, style: StyleDescription) -> Self {
        Self { image, style }
    }

    /// Gates a run on both inputs being present.
    ///
    /// Returns `None` when the image is missing or empty, or the style is
    /// blank. No run starts then, and nothing is written or sent.
    pub fn collect(image: Option<UploadedImage>, style: Option<&str>) -> Option<Self> {
        let style = StyleDescription::new(style?).ok()?;
        let image = image.filter(|image| !image.data.is_empty())?;
        Some(Self { image, style })
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The edit succeeded.
    Generated {
        /// Whether a validator accepted the photo first.
        validated: bool,
        /// The edited image.
        image: GeneratedImage,
    },
    /// The validator did not answer yes; generation was skipped.
    Rejected {
        /// Validator answer, verbatim.
        feedback: String,
    },
    /// Storing the upload or the edit call failed.
    Failed {
        /// Whether a validator accepted the photo first.
        validated: bool,
        /// What went wrong.
        error: NailVizError,
    },
}

impl RunOutcome {
    /// Returns the edited image if the run succeeded.
    pub fn image(&self) -> Option<&GeneratedImage> {
        match self {
            Self::Generated { image, .. } => Some(image),
            _ => None,
        }
    }

    /// Returns true if a validator accepted the photo during this run.
    pub fn validated(&self) -> bool {
        match self {
            Self::Generated { validated, .. } | Self::Failed { validated, .. } => *validated,
            Self::Rejected { .. } => false,
        }
    }

    /// Short label for logs and JSON output.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Generated { .. } => "generated",
            Self::Rejected { .. } => "rejected",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Runs the nail-art workflow against an editor and an optional validator.
pub struct NailArtPipeline {
    editor: Arc<dyn ImageEditor>,
    validator: Option<Arc<dyn HandValidator>>,
    scratch_dir: PathBuf,
}

impl NailArtPipeline {
    /// Creates a pipeline without validation, keeping scratch files in `scratch_dir`.
    pub fn new(editor: Arc<dyn ImageEditor>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            editor,
            validator: None,
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Checks every photo with `validator` before editing it.
    pub fn with_validator(mut self, validator: Arc<dyn HandValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Returns true if runs start with a validation step.
    pub fn validates(&self) -> bool {
        self.validator.is_some()
    }

    /// Executes one run. Never fails; every error ends up in the outcome.
    ///
    /// The scratch file is gone by the time this returns, whatever the outcome.
    pub async fn run(&self, input: &RunInput) -> RunOutcome {
        let start = Instant::now();

        let scratch = match ScratchFile::create(&self.scratch_dir, &input.image) {
            Ok(scratch) => scratch,
            Err(error) => {
                tracing::error!(error = %error, "failed to store upload");
                return RunOutcome::Failed {
                    validated: false,
                    error,
                };
            }
        };

        let outcome = self.run_with_scratch(&scratch, input).await;

        if let Err(e) = scratch.close() {
            tracing::warn!(error = %e, "failed to remove scratch file");
        }

        tracing::info!(
            status = outcome.status(),
            duration_ms = start.elapsed().as_millis() as u64,
            "nail art run finished"
        );
        outcome
    }

    async fn run_with_scratch(&self, scratch: &ScratchFile, input: &RunInput) -> RunOutcome {
        let image_bytes = match scratch.read().await {
            Ok(bytes) => bytes,
            Err(error) => {
                return RunOutcome::Failed {
                    validated: false,
                    error,
                }
            }
        };

        let validated = match &self.validator {
            Some(validator) => {
                let b64 = {
                    use base64::Engine;
                    base64::engine::general_purpose::STANDARD.encode(&image_bytes)
                };
                let feedback = validator.check(&b64, &input.image.content_type).await;
                match ValidationVerdict::from_feedback(feedback) {
                    ValidationVerdict::Accepted(_) => true,
                    ValidationVerdict::Rejected(feedback) => {
                        tracing::info!(validator = validator.name(), "hand photo rejected");
                        return RunOutcome::Rejected { feedback };
                    }
                }
            }
            None => false,
        };

        let request = EditRequest::new(build_prompt(&input.style), image_bytes).with_content_type(
            format!("image.{}", input.image.format.extension()),
            input.image.content_type.clone(),
        );

        match self.editor.edit(&request).await {
            Ok(image) => RunOutcome::Generated { validated, image },
            Err(error) => {
                tracing::error!(
                    editor = self.editor.name(),
                    error = %error,
                    "nail art generation failed"
                );
                RunOutcome::Failed { validated, error }
            }
        }
    }
}
