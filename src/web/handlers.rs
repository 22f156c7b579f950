//! Request handlers.

use crate::image::UploadedImage;
use crate::pipeline::RunInput;
use crate::present::{Banner, BannerKind};
use crate::web::pages;
use crate::web::AppState;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use maud::Markup;
use serde_json::json;

/// What the form submitted, before any checks.
#[derive(Debug, Default)]
struct FormFields {
    image: Option<(String, Option<String>, Vec<u8>)>,
    style: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<FormFields, MultipartError> {
    let mut fields = FormFields::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                // Browsers send an empty, nameless part when no file was picked.
                if !file_name.is_empty() || !data.is_empty() {
                    fields.image = Some((file_name, content_type, data.to_vec()));
                }
            }
            "style" => fields.style = Some(field.text().await?),
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    Ok(fields)
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Markup {
    pages::form_page("", state.pipeline.validates(), &pages::start_notice())
}

/// `POST /generate`
pub async fn generate(State(state): State<AppState>, multipart: Multipart) -> Response {
    let validates = state.pipeline.validates();

    let fields = match read_form(multipart).await {
        Ok(fields) => fields,
        Err(e) => {
            tracing::warn!(error = %e, "malformed upload");
            let notice = Banner::new(
                BannerKind::Error,
                format!("Could not read the upload: {}", e.body_text()),
            );
            return (e.status(), pages::form_page("", validates, &[notice])).into_response();
        }
    };
    let style = fields.style.unwrap_or_default();

    let image = match fields.image {
        Some((file_name, content_type, data)) => {
            match UploadedImage::new(data, file_name, content_type.as_deref()) {
                Ok(image) => Some(image),
                Err(e) => {
                    let notice = Banner::new(
                        BannerKind::Warning,
                        format!("Only jpg, jpeg and png images are supported ({e})."),
                    );
                    return (
                        StatusCode::BAD_REQUEST,
                        pages::form_page(&style, validates, &[notice]),
                    )
                        .into_response();
                }
            }
        }
        None => None,
    };

    let Some(input) = RunInput::collect(image, Some(style.as_str())) else {
        return pages::form_page(&style, validates, &pages::start_notice()).into_response();
    };

    tracing::info!(
        size_bytes = input.image.size(),
        content_type = %input.image.content_type,
        validates,
        "starting nail art run"
    );
    let outcome = state.pipeline.run(&input).await;

    pages::result_page(input.style.as_str(), validates, &outcome).into_response()
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "validation": state.pipeline.validates(),
    }))
}
