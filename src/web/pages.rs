//! HTML rendering for the single-page UI.

use crate::image::ACCEPTED_EXTENSIONS;
use crate::pipeline::RunOutcome;
use crate::present::{banners, Banner, BannerKind, DownloadArtifact, RESULT_CAPTION, START_HINT};
use maud::{html, Markup, PreEscaped, DOCTYPE};

const TITLE: &str = "AI Nail Art Generator";

const STYLE_PLACEHOLDER: &str =
    "e.g. 'floral pastel', 'galaxy theme', 'minimal French tips'";

const CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
       max-width: 720px; margin: 40px auto; padding: 0 20px; color: #222; }
h1 { margin-bottom: 4px; }
form { display: flex; flex-direction: column; gap: 12px; margin: 24px 0; }
input[type=text] { padding: 8px; font-size: 1em; }
button, a.download { padding: 10px 16px; font-size: 1em; border-radius: 6px; border: none;
       background: #d6336c; color: white; cursor: pointer; text-decoration: none;
       display: inline-block; width: fit-content; }
.banner { padding: 12px 16px; border-radius: 6px; margin: 8px 0; }
.success { background: #e6f4ea; color: #1e4620; }
.warning { background: #fff4e5; color: #663c00; }
.info { background: #e8f0fe; color: #0b3d91; }
.error { background: #fdecea; color: #611a15; }
figure { margin: 24px 0 12px; }
figure img { max-width: 100%; border-radius: 6px; }
figcaption { color: #666; text-align: center; margin-top: 6px; }
#spinner { color: #666; }
"#;

fn render_banners(banners: &[Banner]) -> Markup {
    html! {
        @for banner in banners {
            div class=(format!("banner {}", banner.kind.as_str())) { (banner.message) }
        }
    }
}

fn render_form(style: &str, validates: bool) -> Markup {
    let accept = ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");
    let spinner = if validates {
        "Validating your image, then generating your nail art..."
    } else {
        "Generating your nail art..."
    };

    html! {
        form method="post" action="/generate" enctype="multipart/form-data"
            onsubmit="document.getElementById('spinner').hidden = false" {
            label {
                "Upload your hand image"
                input type="file" name="image" accept=(accept);
            }
            label {
                "Enter the nail art style"
                input type="text" name="style" value=(style) placeholder=(STYLE_PLACEHOLDER);
            }
            button type="submit" { "Generate Nail Art" }
            p id="spinner" hidden { (spinner) }
        }
    }
}

fn render_page(body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (TITLE) }
                style { (PreEscaped(CSS)) }
            }
            body {
                h1 { "💅 " (TITLE) }
                p { "Upload a clear photo of your hand and describe the nail art style you want to try!" }
                (body)
            }
        }
    }
}

/// The empty form, or the form again after an incomplete or refused submission.
pub fn form_page(style: &str, validates: bool, notices: &[Banner]) -> Markup {
    render_page(html! {
        (render_form(style, validates))
        (render_banners(notices))
    })
}

/// The form followed by the outcome of a run.
pub fn result_page(style: &str, validates: bool, outcome: &RunOutcome) -> Markup {
    // One data URL serves both the preview and the download link.
    let download = outcome.image().map(|image| {
        let artifact = DownloadArtifact::new(image);
        (artifact, artifact.data_url())
    });

    render_page(html! {
        (render_form(style, validates))
        (render_banners(&banners(outcome)))
        @if let Some((artifact, data_url)) = &download {
            figure {
                img src=(data_url) alt=(RESULT_CAPTION);
                figcaption { "🎨 " (RESULT_CAPTION) }
            }
            a class="download" href=(data_url) download=(artifact.file_name) type=(artifact.mime_type) {
                "Download Image"
            }
        }
    })
}

/// Banner list shown before anything has been submitted.
pub fn start_notice() -> Vec<Banner> {
    vec![Banner::new(BannerKind::Info, START_HINT)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NailVizError;
    use crate::image::{GeneratedImage, GenerationMetadata, ImageFormat};

    #[test]
    fn test_form_page_restricts_uploads() {
        let html = form_page("", true, &start_notice()).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"accept=".jpg,.jpeg,.png""#));
        assert!(html.contains("Generate Nail Art"));
        assert!(html.contains(START_HINT));
        assert!(html.contains("Validating your image"));
    }

    #[test]
    fn test_style_is_escaped_when_echoed() {
        let html = form_page(r#""><img src=x>"#, false, &[]).into_string();
        assert!(!html.contains(r#""><img src=x>"#));
        assert!(html.contains("&quot;&gt;&lt;img src=x&gt;"));
    }

    #[test]
    fn test_banner_text_is_escaped() {
        let notices = [Banner::new(BannerKind::Warning, "<script>alert(1)</script>")];
        let html = form_page("", false, &notices).into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"<div class="banner warning">&lt;script&gt;alert(1)&lt;/script&gt;</div>"#));
    }

    #[test]
    fn test_result_page_offers_download() {
        let outcome = RunOutcome::Generated {
            validated: true,
            image: GeneratedImage::new(vec![1, 2, 3], ImageFormat::Png, GenerationMetadata::default()),
        };
        let html = result_page("galaxy theme", true, &outcome).into_string();
        assert!(html.contains(r#"download="nail_art_result.png""#));
        assert!(html.contains(r#"href="data:image/png;base64,AQID""#));
        assert!(html.contains(RESULT_CAPTION));
        assert!(html.contains("looks great"));
    }

    #[test]
    fn test_result_page_shares_one_data_url() {
        let outcome = RunOutcome::Generated {
            validated: false,
            image: GeneratedImage::new(vec![1, 2, 3], ImageFormat::Jpeg, GenerationMetadata::default()),
        };
        let html = result_page("galaxy theme", false, &outcome).into_string();
        assert!(html.contains(r#"<img src="data:image/png;base64,AQID""#));
        assert_eq!(html.matches("data:image/png;base64,AQID").count(), 2);
        assert!(!html.contains("data:image/jpeg"));
    }

    #[test]
    fn test_failed_page_has_no_image() {
        let outcome = RunOutcome::Failed {
            validated: false,
            error: NailVizError::Api {
                status: 500,
                message: "<b>down</b>".into(),
            },
        };
        let html = result_page("galaxy theme", false, &outcome).into_string();
        assert!(!html.contains("<figure>"));
        assert!(!html.contains("Download Image"));
        assert!(html.contains("Error generating nail art: API error: 500 - &lt;b&gt;down&lt;/b&gt;"));
    }
}
