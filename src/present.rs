//! Turning a run outcome into what the user sees.

use crate::image::GeneratedImage;
use crate::pipeline::RunOutcome;
use serde::Serialize;

/// File name offered for the edited image.
pub const RESULT_FILE_NAME: &str = "nail_art_result.png";

/// MIME type offered for the edited image.
pub const RESULT_MIME_TYPE: &str = "image/png";

/// Caption shown under the edited image.
pub const RESULT_CAPTION: &str = "AI-Generated Nail Art";

/// Standing instruction shown until both inputs are present.
pub const START_HINT: &str = "Upload a hand image and type a nail art prompt to start.";

/// Severity of a status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    /// Green.
    Success,
    /// Amber.
    Warning,
    /// Blue.
    Info,
    /// Red.
    Error,
}

impl BannerKind {
    /// CSS class / label for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// A status message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    /// Severity.
    pub kind: BannerKind,
    /// Plain text, not yet escaped for HTML.
    pub message: String,
}

impl Banner {
    /// Creates a banner.
    pub fn new(kind: BannerKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Banners describing how a run went, in display order.
pub fn banners(outcome: &RunOutcome) -> Vec<Banner> {
    let accepted = Banner::new(
        BannerKind::Success,
        "Your hand photo looks great! Let's work our nail art magic...",
    );

    match outcome {
        RunOutcome::Generated { validated, .. } => {
            let mut out = Vec::new();
            if *validated {
                out.push(accepted);
            }
            out
        }
        RunOutcome::Rejected { feedback } => vec![
            Banner::new(
                BannerKind::Warning,
                "Your hand image may not be suitable for nail art generation.",
            ),
            Banner::new(BannerKind::Info, format!("Feedback: {feedback}")),
            Banner::new(
                BannerKind::Info,
                "Please re-upload a clear image of your hand with well-lit, visible fingernails.",
            ),
        ],
        RunOutcome::Failed { validated, error } => {
            let mut out = Vec::new();
            if *validated {
                out.push(accepted);
            }
            out.push(Banner::new(
                BannerKind::Error,
                format!("Error generating nail art: {error}"),
            ));
            out
        }
    }
}

/// The edited image as offered for download.
///
/// Holds the decoded provider bytes untouched; nothing is re-encoded.
#[derive(Debug, Clone, Copy)]
pub struct DownloadArtifact<'a> {
    /// Suggested file name.
    pub file_name: &'static str,
    /// Declared MIME type.
    pub mime_type: &'static str,
    /// The bytes, exactly as decoded from the provider response.
    pub bytes: &'a [u8],
}

impl<'a> DownloadArtifact<'a> {
    /// Wraps an edited image for download.
    pub fn new(image: &'a GeneratedImage) -> Self {
        Self {
            file_name: RESULT_FILE_NAME,
            mime_type: RESULT_MIME_TYPE,
            bytes: &image.data,
        }
    }

    /// Returns a `data:` URL carrying the bytes, for a download link.
    pub fn data_url(&self) -> String {
        use base64::Engine;
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(self.bytes)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NailVizError;
    use crate::image::{GenerationMetadata, ImageFormat};

    fn image(bytes: Vec<u8>) -> GeneratedImage {
        GeneratedImage::new(bytes, ImageFormat::Png, GenerationMetadata::default())
    }

    #[test]
    fn test_download_artifact_parity() {
        let generated = image(vec![0x89, 0x50, 0x4E, 0x47, 0, 255, 1]);
        let artifact = DownloadArtifact::new(&generated);

        assert_eq!(artifact.bytes, generated.data.as_slice());
        assert_eq!(artifact.file_name, "nail_art_result.png");
        assert_eq!(artifact.mime_type, "image/png");

        use base64::Engine;
        let url = artifact.data_url();
        let b64 = url.strip_prefix("data:image/png;base64,").unwrap();
        let decoded = base64::engine::general_purpose::STANDARD.decode(b64).unwrap();
        assert_eq!(decoded, generated.data);
    }

    #[test]
    fn test_rejection_banners_quote_feedback() {
        let outcome = RunOutcome::Rejected {
            feedback: "No, the lighting is too dark.".into(),
        };
        let banners = banners(&outcome);

        assert_eq!(banners[0].kind, BannerKind::Warning);
        assert_eq!(banners[1].message, "Feedback: No, the lighting is too dark.");
        assert!(banners[2].message.starts_with("Please re-upload"));
    }

    #[test]
    fn test_failure_banners() {
        let outcome = RunOutcome::Failed {
            validated: true,
            error: NailVizError::ContentBlocked("nope".into()),
        };
        let banners = banners(&outcome);

        assert_eq!(banners.len(), 2);
        assert_eq!(banners[0].kind, BannerKind::Success);
        assert_eq!(banners[1].kind, BannerKind::Error);
        assert_eq!(
            banners[1].message,
            "Error generating nail art: content blocked: nope"
        );
    }

    #[test]
    fn test_unvalidated_success_has_no_banner() {
        let outcome = RunOutcome::Generated {
            validated: false,
            image: image(vec![1]),
        };
        assert!(banners(&outcome).is_empty());
    }
}
