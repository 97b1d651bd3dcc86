use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

use crate::datastore::DatastoreError;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    pub resp_data: Option<T>,
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: error_codes::SUCCESS,
        msg: "success".into(),
        resp_data: Some(data),
    })
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code,
        msg,
        resp_data: None,
    })
}

/// Common mapping for datastore failures surfacing out of a workflow: a
/// rejected write is the caller's 400, everything else is a 500.
pub fn datastore_error_response<T>(e: &DatastoreError) -> (StatusCode, Json<ApiResponse<T>>) {
    match e {
        DatastoreError::Rejected(_) => (
            StatusCode::BAD_REQUEST,
            error_to_api_response(error_codes::WRITE_REJECTED, e.to_string()),
        ),
        DatastoreError::Transport(_) | DatastoreError::Decode(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_to_api_response(error_codes::INTERNAL_ERROR, e.to_string()),
        ),
    }
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const USER_EXISTS: i32 = 1001;
    pub const AUTH_FAILED: i32 = 1002;
    pub const NOT_FOUND: i32 = 1003;
    pub const DUPLICATE_SUBMISSION: i32 = 1004;
    pub const ALREADY_DECIDED: i32 = 1005;
    pub const WRITE_REJECTED: i32 = 1006;
    pub const INTERNAL_ERROR: i32 = 5000;
}
