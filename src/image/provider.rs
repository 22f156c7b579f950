//! Image editor trait.

use crate::error::Result;
use crate::image::types::{EditRequest, GeneratedImage};
use async_trait::async_trait;

/// Trait for services that apply a prompt to a source image.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    /// Edits the source image according to the request prompt.
    ///
    /// Called at most once per run; implementations must not retry.
    async fn edit(&self, request: &EditRequest) -> Result<GeneratedImage>;

    /// Returns the name of this editor for display.
    fn name(&self) -> &str;
}
