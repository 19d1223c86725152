//! Upload request extraction for the overlap engine API.
//!
//! The upload endpoint takes `multipart/form-data` with the CSV in a part
//! named `file`. This module pulls that part out of the body and applies
//! the configured file checks before any parsing happens.

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;

use crate::config::UploadConfig;

use super::response::{ApiError, ApiErrorResponse};

/// Name of the multipart part carrying the CSV.
pub const FILE_FIELD: &str = "file";

/// A file received in an upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name, empty when none was sent.
    pub file_name: String,
    /// File contents.
    pub bytes: Bytes,
}

/// Reads the `file` part from a multipart body. Other parts are skipped.
pub async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<Option<UploadedFile>, ApiErrorResponse> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(Some(UploadedFile { file_name, bytes }));
    }

    Ok(None)
}

/// Rejects a missing or empty file, and files whose name does not carry an
/// allowed extension.
pub fn validate_upload(
    file: Option<UploadedFile>,
    upload: &UploadConfig,
) -> Result<UploadedFile, ApiErrorResponse> {
    let file = match file {
        Some(file) if !file.bytes.is_empty() => file,
        _ => return Err(ApiErrorResponse::bad_request(ApiError::no_file())),
    };

    if !upload.accepts_file_name(&file.file_name) {
        return Err(ApiErrorResponse::bad_request(ApiError::invalid_file_type(
            &upload.allowed_extensions,
        )));
    }

    Ok(file)
}

fn multipart_error(error: MultipartError) -> ApiErrorResponse {
    ApiErrorResponse {
        status: error.status(),
        error: ApiError::with_details("INVALID_UPLOAD", "Malformed upload", error.body_text()),
    }
}
