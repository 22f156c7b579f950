//! Image editing providers.

mod openai;

pub use openai::{OpenAiImageEditor, OpenAiImageEditorBuilder, OpenAiImageModel};
