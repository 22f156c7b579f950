//! Core types for hand uploads and edited results.

use crate::error::{NailVizError, Result};
use std::path::Path;

/// Extensions the upload form accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format. Never accepted as an upload, but providers may answer with it.
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Maps an upload extension to a format. Only jpg, jpeg and png are accepted.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// A hand photo as submitted through the form or the CLI.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Raw bytes exactly as uploaded.
    pub data: Vec<u8>,
    /// Original file name (used only for its extension).
    pub file_name: String,
    /// MIME type sent along with the image.
    pub content_type: String,
    /// Format derived from the file extension.
    pub format: ImageFormat,
}

impl UploadedImage {
    /// Wraps uploaded bytes, rejecting anything that isn't a jpg, jpeg or png file.
    ///
    /// The check is on the extension only; the bytes are not sniffed. A declared
    /// content type is kept only when it is `image/png` or `image/jpeg`; anything
    /// else falls back to the extension's MIME type.
    pub fn new(
        data: Vec<u8>,
        file_name: impl Into<String>,
        content_type: Option<&str>,
    ) -> Result<Self> {
        let file_name = file_name.into();
        let format = Path::new(&file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageFormat::from_extension)
            .ok_or_else(|| {
                NailVizError::UnsupportedUpload(format!(
                    "'{}' is not a {} file",
                    file_name,
                    ACCEPTED_EXTENSIONS.join(", ")
                ))
            })?;

        let content_type = content_type
            .map(str::trim)
            .filter(|ct| matches!(*ct, "image/png" | "image/jpeg"))
            .unwrap_or(format.mime_type())
            .to_string();

        Ok(Self {
            data,
            file_name,
            content_type,
            format,
        })
    }

    /// Reads a hand photo from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Self::new(data, file_name, None)
    }

    /// Returns the size of the upload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Metadata about the generation process.
#[derive(Debug, Clone, Default)]
pub struct GenerationMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Generation duration in milliseconds.
    pub duration_ms: Option<u64>,
}

/// A request to edit a hand photo.
#[derive(Debug, Clone)]
pub struct EditRequest {
    /// Full instruction text sent to the model.
    pub prompt: String,
    /// Source image bytes.
    pub image: Vec<u8>,
    /// File name sent with the multipart image part.
    pub file_name: String,
    /// MIME type sent with the multipart image part.
    pub content_type: String,
}

impl EditRequest {
    /// Creates an edit request for the given prompt and PNG source image.
    pub fn new(prompt: impl Into<String>, image: Vec<u8>) -> Self {
        Self {
            prompt: prompt.into(),
            image,
            file_name: "image.png".to_string(),
            content_type: ImageFormat::Png.mime_type().to_string(),
        }
    }

    /// Overrides the format the source image is declared as.
    pub fn with_content_type(
        mut self,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        self.file_name = file_name.into();
        self.content_type = content_type.into();
        self
    }
}

/// An edited image with its data and metadata.
#[derive(Debug, Clone)]
#[must_use = "generated image should be displayed or saved"]
pub struct GeneratedImage {
    /// Raw image bytes, exactly as decoded from the provider response.
    pub data: Vec<u8>,
    /// Image format.
    pub format: ImageFormat,
    /// Generation metadata.
    pub metadata: GenerationMetadata,
}

impl GeneratedImage {
    /// Creates a new generated image.
    pub fn new(data: Vec<u8>, format: ImageFormat, metadata: GenerationMetadata) -> Self {
        Self {
            data,
            format,
            metadata,
        }
    }

    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }

    /// Encodes the image data as base64.
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Returns the image as a data URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            self.to_base64()
        )
    }
}
