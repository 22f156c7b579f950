//! Hand photo validator trait and verdict classification.

use async_trait::async_trait;

/// Question put to the vision model for every upload.
pub const HAND_PHOTO_QUESTION: &str = "Is this image clearly showing a human hand with visible \
fingernails in good lighting? Respond with 'yes' or 'no' and explain why briefly.";

/// Output token budget for the validator answer.
pub const VALIDATION_MAX_TOKENS: u32 = 100;

/// Prefix used when the validator call itself failed.
pub const VALIDATION_ERROR_PREFIX: &str = "error:";

/// Asks a vision model whether a photo is usable for nail art.
#[async_trait]
pub trait HandValidator: Send + Sync {
    /// Returns the model's answer, trimmed.
    ///
    /// Never fails: provider errors come back as text starting with
    /// [`VALIDATION_ERROR_PREFIX`], which classifies as a rejection.
    async fn check(&self, base64_image: &str, content_type: &str) -> String;

    /// Returns the name of this validator for display.
    fn name(&self) -> &str;
}

/// Outcome of a validation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationVerdict {
    /// The model said yes; generation may proceed.
    Accepted(String),
    /// Anything else, including validator errors.
    Rejected(String),
}

impl ValidationVerdict {
    /// Classifies a raw validator answer.
    ///
    /// Accepted iff the trimmed, lowercased answer starts with `yes`.
    pub fn from_feedback(feedback: impl Into<String>) -> Self {
        let feedback = feedback.into();
        if feedback.trim().to_lowercase().starts_with("yes") {
            Self::Accepted(feedback)
        } else {
            Self::Rejected(feedback)
        }
    }

    /// Returns true if generation may proceed.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Returns the validator text verbatim.
    pub fn feedback(&self) -> &str {
        match self {
            Self::Accepted(text) | Self::Rejected(text) => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_in_any_case_is_accepted() {
        for answer in [
            "yes",
            "Yes, this is a clear hand photo.",
            "YES. Nails are visible.",
            "  yes - well lit",
            "Yesss",
        ] {
            assert!(ValidationVerdict::from_feedback(answer).is_accepted(), "{answer}");
        }
    }

    #[test]
    fn test_anything_else_is_rejected() {
        for answer in [
            "No, the lighting is too dark.",
            "The image shows a hand. Yes.",
            "",
            "error: network error: connection refused",
            "Y es",
        ] {
            assert!(!ValidationVerdict::from_feedback(answer).is_accepted(), "{answer}");
        }
    }

    #[test]
    fn test_feedback_is_verbatim() {
        let verdict = ValidationVerdict::from_feedback("No, the lighting is too dark.");
        assert_eq!(verdict.feedback(), "No, the lighting is too dark.");
        assert_eq!(
            verdict,
            ValidationVerdict::Rejected("No, the lighting is too dark.".into())
        );
    }
}
