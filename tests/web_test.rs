//! Web UI integration tests.
//!
//! Run with: `cargo test --test web_test`

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use nailviz::image::GenerationMetadata;
use nailviz::{
    EditRequest, GeneratedImage, HandValidator, ImageEditor, ImageFormat, NailArtPipeline,
    NailVizError,
};
use std::sync::{Arc, Mutex};

const RESULT_BYTES: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 9, 8, 7, 6];

#[derive(Default)]
struct StubEditor {
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait]
impl ImageEditor for StubEditor {
    async fn edit(&self, request: &EditRequest) -> nailviz::Result<GeneratedImage> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        if self.fail {
            return Err(NailVizError::RateLimited { retry_after: None });
        }
        Ok(GeneratedImage::new(
            RESULT_BYTES.to_vec(),
            ImageFormat::Png,
            GenerationMetadata::default(),
        ))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

struct StubValidator {
    answer: &'static str,
    calls: Mutex<usize>,
}

#[async_trait]
impl HandValidator for StubValidator {
    async fn check(&self, _base64_image: &str, _content_type: &str) -> String {
        *self.calls.lock().unwrap() += 1;
        self.answer.to_string()
    }

    fn name(&self) -> &str {
        "stub"
    }
}

struct TestApp {
    server: TestServer,
    editor: Arc<StubEditor>,
    validator: Option<Arc<StubValidator>>,
    scratch: tempfile::TempDir,
}

impl TestApp {
    fn new(editor: StubEditor, validator: Option<&'static str>) -> Self {
        let scratch = tempfile::tempdir().unwrap();
        let editor = Arc::new(editor);
        let validator = validator.map(|answer| {
            Arc::new(StubValidator {
                answer,
                calls: Mutex::new(0),
            })
        });
        let mut pipeline = NailArtPipeline::new(editor.clone(), scratch.path());
        if let Some(validator) = &validator {
            pipeline = pipeline.with_validator(validator.clone());
        }
        let app = nailviz::web::router(Arc::new(pipeline), 1024 * 1024);
        Self {
            server: TestServer::new(app).unwrap(),
            editor,
            validator,
            scratch,
        }
    }

    fn edit_calls(&self) -> usize {
        self.editor.prompts.lock().unwrap().len()
    }

    fn validator_calls(&self) -> usize {
        self.validator
            .as_ref()
            .map_or(0, |validator| *validator.calls.lock().unwrap())
    }

    fn scratch_is_empty(&self) -> bool {
        std::fs::read_dir(self.scratch.path()).unwrap().count() == 0
    }
}

fn hand_form(style: &str) -> MultipartForm {
    MultipartForm::new().add_text("style", style.to_string()).add_part(
        "image",
        Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3])
            .file_name("hand.jpg")
            .mime_type("image/jpeg"),
    )
}

#[tokio::test]
async fn test_index_shows_form_and_hint() {
    let app = TestApp::new(StubEditor::default(), Some("yes"));

    let response = app.server.get("/").await;

    assert_eq!(response.status_code(), 200);
    assert!(response
        .header("content-type")
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let html = response.text();
    assert!(html.contains("AI Nail Art Generator"));
    assert!(html.contains(r#"accept=".jpg,.jpeg,.png""#));
    assert!(html.contains("Upload a hand image and type a nail art prompt to start."));
}

#[tokio::test]
async fn test_missing_image_starts_nothing() {
    let app = TestApp::new(StubEditor::default(), Some("yes"));

    let form = MultipartForm::new().add_text("style", "galaxy theme");
    let response = app.server.post("/generate").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert!(response
        .text()
        .contains("Upload a hand image and type a nail art prompt to start."));
    assert_eq!(app.edit_calls(), 0);
    assert_eq!(app.validator_calls(), 0);
    assert!(app.scratch_is_empty());
}

#[tokio::test]
async fn test_missing_style_starts_nothing() {
    let app = TestApp::new(StubEditor::default(), Some("yes"));

    let response = app.server.post("/generate").multipart(hand_form("  ")).await;

    assert_eq!(response.status_code(), 200);
    assert!(!response.text().contains("Download Image"));
    assert_eq!(app.edit_calls(), 0);
    assert_eq!(app.validator_calls(), 0);
    assert!(app.scratch_is_empty());
}

#[tokio::test]
async fn test_accepted_photo_shows_result_and_download() {
    let app = TestApp::new(
        StubEditor::default(),
        Some("Yes, this is a clear hand photo."),
    );

    let response = app
        .server
        .post("/generate")
        .multipart(hand_form("galaxy theme"))
        .await;

    assert_eq!(response.status_code(), 200);
    let html = response.text();
    assert!(html.contains("Your hand photo looks great!"));
    assert!(html.contains("AI-Generated Nail Art"));
    assert!(html.contains(r#"download="nail_art_result.png""#));

    use base64::Engine;
    let expected = base64::engine::general_purpose::STANDARD.encode(RESULT_BYTES);
    assert!(html.contains(&format!(r#"href="data:image/png;base64,{expected}""#)));
    assert!(html.contains(&format!(r#"<img src="data:image/png;base64,{expected}""#)));
    assert_eq!(html.matches(expected.as_str()).count(), 2);

    let prompts = app.editor.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("galaxy theme"));
    drop(prompts);
    assert_eq!(app.validator_calls(), 1);
    assert!(app.scratch_is_empty());
}

#[tokio::test]
async fn test_rejected_photo_shows_feedback() {
    let app = TestApp::new(StubEditor::default(), Some("No, the lighting is too dark."));

    let response = app
        .server
        .post("/generate")
        .multipart(hand_form("galaxy theme"))
        .await;

    let html = response.text();
    assert!(html.contains("may not be suitable for nail art generation"));
    assert!(html.contains("Feedback: No, the lighting is too dark."));
    assert!(html.contains("Please re-upload a clear image"));
    assert!(!html.contains("Download Image"));
    assert_eq!(app.edit_calls(), 0);
    assert!(app.scratch_is_empty());
}

#[tokio::test]
async fn test_generation_error_shows_banner() {
    let app = TestApp::new(
        StubEditor {
            fail: true,
            ..Default::default()
        },
        Some("yes"),
    );

    let response = app
        .server
        .post("/generate")
        .multipart(hand_form("galaxy theme"))
        .await;

    assert_eq!(response.status_code(), 200);
    let html = response.text();
    assert!(html.contains(r#"class="banner error""#));
    assert!(html.contains("Error generating nail art: rate limited"));
    assert!(!html.contains("<figure>"));
    assert_eq!(app.edit_calls(), 1);
    assert!(app.scratch_is_empty());
}

#[tokio::test]
async fn test_unsupported_extension_is_refused() {
    let app = TestApp::new(StubEditor::default(), Some("yes"));

    let form = MultipartForm::new()
        .add_text("style", "galaxy theme")
        .add_part(
            "image",
            Part::bytes(b"GIF89a".to_vec())
                .file_name("hand.gif")
                .mime_type("image/gif"),
        );
    let response = app.server.post("/generate").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert!(response
        .text()
        .contains("Only jpg, jpeg and png images are supported"));
    assert_eq!(app.edit_calls(), 0);
    assert_eq!(app.validator_calls(), 0);
    assert!(app.scratch_is_empty());
}

#[tokio::test]
async fn test_without_validation_generates_directly() {
    let app = TestApp::new(StubEditor::default(), None);

    let response = app
        .server
        .post("/generate")
        .multipart(hand_form("minimal French tips"))
        .await;

    let html = response.text();
    assert!(!html.contains("looks great"));
    assert!(html.contains("Download Image"));
    assert_eq!(app.edit_calls(), 1);
}

#[tokio::test]
async fn test_style_is_escaped_in_result_page() {
    let app = TestApp::new(StubEditor::default(), None);

    let response = app
        .server
        .post("/generate")
        .multipart(hand_form(r#""><script>alert(1)</script>"#))
        .await;

    let html = response.text();
    assert!(!html.contains("<script>alert(1)</script>"));
    // The prompt still carries the text verbatim.
    assert!(app.editor.prompts.lock().unwrap()[0].contains("<script>alert(1)</script>"));
}

#[tokio::test]
async fn test_health_reports_validation() {
    let app = TestApp::new(StubEditor::default(), None);

    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["validation"], false);
}
