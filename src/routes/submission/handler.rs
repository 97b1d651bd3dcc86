use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    AppState,
    datastore::{Submission, SubmissionStatus, SubmissionType},
    utils::{
        datastore_error_response, error_codes, error_to_api_response, success_to_api_response,
    },
};

use super::model::{self, CreateSubmissionError, CreateSubmissionRequest, SubmissionResponse};

#[derive(Debug, Deserialize)]
pub struct ListSubmissionsQuery {
    pub status: Option<SubmissionStatus>,
    pub submission_type: Option<SubmissionType>,
}

#[axum::debug_handler]
pub async fn create_submission(
    State(state): State<AppState>,
    Json(req): Json<CreateSubmissionRequest>,
) -> impl IntoResponse {
    match model::create_submission(
        state.store.as_ref(),
        state.analyzer.as_ref(),
        state.notifier.as_ref(),
        req,
    )
    .await
    {
        Ok(submission) => (
            StatusCode::OK,
            success_to_api_response(SubmissionResponse {
                message: "Submission created successfully".to_string(),
                submission,
            }),
        ),
        Err(e @ CreateSubmissionError::DuplicateImage) => (
            StatusCode::BAD_REQUEST,
            error_to_api_response(error_codes::DUPLICATE_SUBMISSION, e.to_string()),
        ),
        Err(e @ CreateSubmissionError::ParentNotFound(_)) => (
            StatusCode::BAD_REQUEST,
            error_to_api_response(error_codes::VALIDATION_ERROR, e.to_string()),
        ),
        Err(e @ CreateSubmissionError::InvalidParent(_)) => (
            StatusCode::BAD_REQUEST,
            error_to_api_response(error_codes::VALIDATION_ERROR, e.to_string()),
        ),
        Err(CreateSubmissionError::Store(e)) => datastore_error_response(&e),
    }
}

#[axum::debug_handler]
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(query): Query<ListSubmissionsQuery>,
) -> impl IntoResponse {
    let status = query.status.unwrap_or(SubmissionStatus::Approved);
    if status == SubmissionStatus::Resolved {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response::<Vec<Submission>>(
                error_codes::VALIDATION_ERROR,
                "status must be one of pending, approved, rejected".to_string(),
            ),
        );
    }

    match state
        .store
        .list_submissions(status, query.submission_type)
        .await
    {
        Ok(submissions) => (StatusCode::OK, success_to_api_response(submissions)),
        Err(e) => datastore_error_response::<Vec<Submission>>(&e),
    }
}

#[axum::debug_handler]
pub async fn get_submission(
    State(state): State<AppState>,
    Path(submission_id): Path<i64>,
) -> impl IntoResponse {
    match state.store.find_submission(submission_id).await {
        Ok(Some(submission)) => (StatusCode::OK, success_to_api_response(submission)),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            error_to_api_response(error_codes::NOT_FOUND, "Submission not found".to_string()),
        ),
        Err(e) => datastore_error_response::<Submission>(&e),
    }
}
