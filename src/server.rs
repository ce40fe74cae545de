//! Upload-and-download front end: post a sales export, get the invoice import back.

use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::error::ReportError;
use crate::output::{invoices_to_csv, output_file_name};
use crate::pipeline::Converter;
use crate::spreadsheet::read_orders;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const UPLOAD_FIELD: &str = "file";

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Daily sales to invoices</title></head>
<body>
<h1>Daily sales to invoices</h1>
<form action="/process" method="post" enctype="multipart/form-data">
  <input type="file" name="file" accept=".xlsx">
  <button type="submit">Convert</button>
</form>
</body>
</html>
"#;

#[derive(Clone)]
pub struct AppState {
    converter: Arc<Converter>,
}

impl AppState {
    pub fn new(converter: Converter) -> Self {
        Self {
            converter: Arc::new(converter),
        }
    }
}

enum UploadError {
    NoFile,
    NoSelection,
    InvalidType,
    Multipart(MultipartError),
    Report(ReportError),
    Internal(anyhow::Error),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        UploadError::Multipart(err)
    }
}

impl From<ReportError> for UploadError {
    fn from(err: ReportError) -> Self {
        UploadError::Report(err)
    }
}

impl From<anyhow::Error> for UploadError {
    fn from(err: anyhow::Error) -> Self {
        UploadError::Internal(err)
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            UploadError::NoFile => (StatusCode::BAD_REQUEST, "No file uploaded".to_string()),
            UploadError::NoSelection => (StatusCode::BAD_REQUEST, "No file selected".to_string()),
            UploadError::InvalidType => (
                StatusCode::BAD_REQUEST,
                "Invalid file type. Please upload an Excel file.".to_string(),
            ),
            UploadError::Multipart(err) => (err.status(), err.body_text()),
            UploadError::Report(err) => {
                warn!(error = %err, "rejected sales export");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            UploadError::Internal(err) => {
                error!(error = ?err, "failed to process upload");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}"))
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/process", post(process))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn process(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // A body that is not multipart carries no file at all.
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!(%rejection, "upload is not a multipart form");
            return UploadError::NoFile.into_response();
        }
    };

    match process_upload(state, multipart).await {
        Ok((file_name, csv)) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ],
            csv,
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

async fn process_upload(state: AppState, mut multipart: Multipart) -> Result<(String, Vec<u8>), UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let upload_name = field.file_name().unwrap_or_default().to_string();
        if upload_name.is_empty() {
            return Err(UploadError::NoSelection);
        }
        if !upload_name.to_ascii_lowercase().ends_with(".xlsx") {
            return Err(UploadError::InvalidType);
        }

        let bytes = field.bytes().await?;
        info!(file = %upload_name, size = bytes.len(), "processing upload");

        // Workbook parsing is CPU bound; keep it off the async workers.
        let csv = tokio::task::spawn_blocking(move || convert_upload(&state.converter, bytes))
            .await
            .context("conversion task failed")??;

        let file_name = output_file_name(chrono::Local::now().naive_local());
        return Ok((file_name, csv));
    }

    Err(UploadError::NoFile)
}

fn convert_upload(converter: &Converter, bytes: Bytes) -> Result<Vec<u8>, UploadError> {
    let rows = read_orders(Cursor::new(bytes))?;
    let conversion = converter.convert(&rows);
    if conversion.is_empty() {
        warn!(rows = rows.len(), "no valid order rows, returning a header-only file");
    }

    let csv = invoices_to_csv(&conversion.invoices).context("failed to write CSV")?;
    Ok(csv)
}
