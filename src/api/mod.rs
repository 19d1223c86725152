//! HTTP API module for the overlap engine.
//!
//! This module provides the upload endpoint that runs the calculation on a
//! CSV file and returns the ranked employee pairs.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{UPLOAD_PATH, create_router};
pub use request::{FILE_FIELD, UploadedFile, read_file_field, validate_upload};
pub use response::{
    ApiError, ApiErrorResponse, CLIENT_CLOSED_REQUEST, NO_PAIRS_MESSAGE, PairView, ProjectView,
    UploadResponse,
};
pub use state::AppState;
