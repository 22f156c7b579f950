//! Nail-art instruction prompt.

use crate::error::{NailVizError, Result};

/// Free-text nail-art style typed by the user.
///
/// Always non-empty and single-line. Line breaks and runs of whitespace are
/// collapsed to one space, so the text cannot open a new paragraph in the
/// instruction block; otherwise it is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDescription(String);

impl StyleDescription {
    /// Normalizes and wraps a style string. Fails if nothing but whitespace remains.
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let collapsed = raw.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            return Err(NailVizError::InvalidRequest(
                "nail art style must not be empty".into(),
            ));
        }
        Ok(Self(collapsed))
    }

    /// Returns the normalized style text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StyleDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders the edit instructions for the given style.
pub fn build_prompt(style: &StyleDescription) -> String {
    format!(
        "You are a professional nail artist and image editor. Your task is to analyze the \
uploaded image, carefully identify the fingers and fingernails, and apply realistic and \
beautifully styled nail art in the style of: {style}.

Ensure the nail art aligns perfectly with the shape, size, and orientation of each nail. \
Maintain the original lighting and shadows of the hand to make the result appear \
photorealistic and natural.

Avoid any misplacement, missing edges, or unrealistic overlays. The final image should look \
like an unedited photo of a real hand with professionally done nail art in the requested style."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_style() {
        let style = StyleDescription::new("galaxy theme").unwrap();
        let prompt = build_prompt(&style);
        assert!(prompt.contains("in the style of: galaxy theme."));
        assert!(prompt.contains("shape, size, and orientation of each nail"));
        assert!(prompt.contains("lighting and shadows"));
        assert!(prompt.contains("unrealistic overlays"));
        assert_eq!(prompt.split("\n\n").count(), 3);
    }

    #[test]
    fn test_style_kept_verbatim() {
        let style = StyleDescription::new("Minimal French tips, 'glossy' & <pink>").unwrap();
        assert!(build_prompt(&style).contains("Minimal French tips, 'glossy' & <pink>"));
    }

    #[test]
    fn test_style_collapses_whitespace() {
        let style = StyleDescription::new("  floral\n\npastel\t ").unwrap();
        assert_eq!(style.as_str(), "floral pastel");
    }

    #[test]
    fn test_empty_style_rejected() {
        assert!(StyleDescription::new("").is_err());
        assert!(StyleDescription::new(" \n\t").is_err());
    }
}
