//! Hand photo validation module.

mod openai;
mod validator;

pub use openai::{OpenAiHandValidator, OpenAiHandValidatorBuilder, DEFAULT_VISION_MODEL};
pub use validator::{
    HandValidator, ValidationVerdict, HAND_PHOTO_QUESTION, VALIDATION_ERROR_PREFIX,
    VALIDATION_MAX_TOKENS,
};
