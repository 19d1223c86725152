//! HTTP request handlers for the overlap engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::io::Cursor;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::compute_pairs;
use crate::cancellation::CancellationToken;
use crate::error::EngineError;

use super::request::{read_file_field, validate_upload};
use super::response::{ApiError, ApiErrorResponse, UploadResponse};
use super::state::AppState;

/// Path of the upload endpoint.
pub const UPLOAD_PATH: &str = "/api/employee/upload";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    let max_bytes = state.config().upload().max_bytes;

    Router::new()
        .route(UPLOAD_PATH, post(upload_handler))
        .layer(DefaultBodyLimit::max(max_bytes))
        .with_state(state)
}

/// Handler for POST /api/employee/upload.
///
/// Accepts a CSV upload and returns the ranked employee pairs.
async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing upload request");

    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!(correlation_id = %correlation_id, error = %rejection, "Rejected upload body");
            return ApiErrorResponse {
                status: rejection.status(),
                error: ApiError::with_details(
                    "INVALID_UPLOAD",
                    "Malformed upload",
                    rejection.body_text(),
                ),
            }
            .into_response();
        }
    };

    let file = match read_file_field(&mut multipart)
        .await
        .and_then(|file| validate_upload(file, state.config().upload()))
    {
        Ok(file) => file,
        Err(error) => {
            warn!(
                correlation_id = %correlation_id,
                code = %error.error.code,
                "Upload rejected"
            );
            return error.into_response();
        }
    };

    let reference_date = state.reference_date();
    info!(
        correlation_id = %correlation_id,
        file_name = %file.file_name,
        bytes = file.bytes.len(),
        reference_date = %reference_date,
        "Calculating employee pairs"
    );

    // Dropping this future (client disconnect) cancels the worker
    let cancel = CancellationToken::new();
    let guard = cancel.drop_guard();
    let worker_cancel = cancel.clone();
    let bytes = file.bytes;

    let start_time = Instant::now();
    let outcome = tokio::task::spawn_blocking(move || {
        compute_pairs(Cursor::new(bytes), &worker_cancel, reference_date)
    })
    .await;
    guard.disarm();

    match outcome {
        Ok(Ok(result)) => {
            info!(
                correlation_id = %correlation_id,
                pairs = result.pair_count(),
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            (StatusCode::OK, Json(UploadResponse::from(&result))).into_response()
        }
        Ok(Err(err)) => {
            if matches!(err, EngineError::Cancelled) {
                warn!(correlation_id = %correlation_id, "Upload cancelled by client");
            } else {
                warn!(correlation_id = %correlation_id, error = %err, "Calculation failed");
            }
            ApiErrorResponse::from(err).into_response()
        }
        Err(join_error) => {
            warn!(
                correlation_id = %correlation_id,
                error = %join_error,
                "Calculation task failed"
            );
            ApiErrorResponse::processing_failed(join_error.to_string()).into_response()
        }
    }
}
