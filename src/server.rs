//! HTTP surface: a single `POST /analyze` endpoint over the pipeline.
//!
//! The handler accepts a multipart form with the PDF under the `file` field
//! and an optional `industry` text field, runs the full pipeline, and returns
//! `{"report": "..."}`. Upload problems are the client's fault (400);
//! anything that fails after a valid PDF was accepted is reported as a
//! generic 500 so provider error strings never leak to callers.

use crate::analyze;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::loader;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Maximum accepted upload size (50 MB covers any realistic paper).
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Shared per-process state: one pipeline config reused by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PipelineConfig>,
}

/// Build the application router.
pub fn app(config: PipelineConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/analyze", post(handle_analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(addr: SocketAddr, config: PipelineConfig) -> Result<(), PipelineError> {
    let router = app(config);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| PipelineError::Internal(format!("Failed to bind {addr}: {e}")))?;
    info!("Listening on http://{addr}");
    axum::serve(listener, router)
        .await
        .map_err(|e| PipelineError::Internal(format!("Server error: {e}")))
}

/// Parsed form fields from the multipart upload.
struct FormFields {
    pdf_bytes: Vec<u8>,
    industry: Option<String>,
}

/// Parse a multipart form upload into structured form fields.
async fn parse_multipart(mut multipart: Multipart) -> Result<FormFields, String> {
    let mut pdf_bytes: Option<Vec<u8>> = None;
    let mut industry: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read file data: {}", e))?
                    .to_vec();

                if !data.starts_with(b"%PDF") {
                    return Err("Uploaded file doesn't appear to be a valid PDF".to_string());
                }
                pdf_bytes = Some(data);
            }
            "industry" => {
                let val = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read industry: {}", e))?;
                if !val.is_empty() {
                    industry = Some(val);
                }
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    let pdf_bytes = pdf_bytes.ok_or("No file uploaded (expected multipart field 'file')")?;

    Ok(FormFields {
        pdf_bytes,
        industry,
    })
}

/// `POST /analyze` — run the pipeline over an uploaded PDF.
async fn handle_analyze(State(state): State<AppState>, multipart: Multipart) -> Response {
    let fields = match parse_multipart(multipart).await {
        Ok(f) => f,
        Err(msg) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response();
        }
    };

    let text = match loader::load_pdf_text(&fields.pdf_bytes) {
        Ok(t) => t,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Could not read PDF: {e}") })),
            )
                .into_response();
        }
    };

    // Per-request industry hint overrides the process-level config.
    let mut config = (*state.config).clone();
    if let Some(industry) = fields.industry {
        config.industry = Some(industry);
    }

    info!(
        "Analyzing upload: {} bytes, industry={:?}",
        fields.pdf_bytes.len(),
        config.industry
    );

    match analyze::analyze(&text, &config).await {
        Ok(output) => Json(json!({ "report": output.report })).into_response(),
        Err(e) => {
            error!("Pipeline failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Analysis failed" })),
            )
                .into_response()
        }
    }
}
