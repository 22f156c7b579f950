//! Image editing module.

mod provider;
pub mod providers;
mod types;

pub use provider::ImageEditor;
pub use types::{
    EditRequest, GeneratedImage, GenerationMetadata, ImageFormat, UploadedImage,
    ACCEPTED_EXTENSIONS,
};
