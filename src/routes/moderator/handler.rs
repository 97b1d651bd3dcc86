use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    AppState,
    datastore::{ModeratorApproval, Submission, SubmissionStatus, SubmissionType},
    points::PointsError,
    utils::{
        datastore_error_response, error_codes, error_to_api_response, success_to_api_response,
    },
};

use super::model::{self, ApprovalRequest, ApprovalResponse, ApproveError, ResolveError};

#[derive(Debug, Deserialize)]
pub struct PendingSubmissionsQuery {
    pub submission_type: SubmissionType,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub submission_id: i64,
    pub moderator_id: i64,
}

#[axum::debug_handler]
pub async fn pending_submissions(
    State(state): State<AppState>,
    Query(query): Query<PendingSubmissionsQuery>,
) -> impl IntoResponse {
    match state
        .store
        .list_submissions(SubmissionStatus::Pending, Some(query.submission_type))
        .await
    {
        Ok(submissions) => (StatusCode::OK, success_to_api_response(submissions)),
        Err(e) => datastore_error_response::<Vec<Submission>>(&e),
    }
}

#[axum::debug_handler]
pub async fn approve_submission(
    State(state): State<AppState>,
    Json(req): Json<ApprovalRequest>,
) -> impl IntoResponse {
    match model::approve(state.store.as_ref(), state.notifier.as_ref(), req).await {
        Ok(message) => (
            StatusCode::OK,
            success_to_api_response(ApprovalResponse { message }),
        ),
        Err(ApproveError::SubmissionNotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response(error_codes::NOT_FOUND, "Submission not found".to_string()),
        ),
        Err(e @ ApproveError::AlreadyDecided(_)) => (
            StatusCode::CONFLICT,
            error_to_api_response(error_codes::ALREADY_DECIDED, e.to_string()),
        ),
        Err(ApproveError::Points(PointsError::UserNotFound)) => (
            StatusCode::NOT_FOUND,
            error_to_api_response(
                error_codes::NOT_FOUND,
                "User not found for updating points".to_string(),
            ),
        ),
        Err(ApproveError::Points(PointsError::Store(e))) | Err(ApproveError::Store(e)) => {
            datastore_error_response(&e)
        }
    }
}

#[axum::debug_handler]
pub async fn resolve_submission(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> impl IntoResponse {
    match model::resolve(
        state.store.as_ref(),
        state.notifier.as_ref(),
        query.submission_id,
        query.moderator_id,
    )
    .await
    {
        Ok(message) => (
            StatusCode::OK,
            success_to_api_response(ApprovalResponse { message }),
        ),
        Err(ResolveError::SubmissionNotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response(error_codes::NOT_FOUND, "Submission not found".to_string()),
        ),
        Err(ResolveError::Points(PointsError::UserNotFound)) => (
            StatusCode::NOT_FOUND,
            error_to_api_response(
                error_codes::NOT_FOUND,
                "User not found for updating points".to_string(),
            ),
        ),
        Err(ResolveError::Points(PointsError::Store(e))) | Err(ResolveError::Store(e)) => {
            datastore_error_response(&e)
        }
    }
}

#[axum::debug_handler]
pub async fn list_approvals(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list_approvals().await {
        Ok(approvals) => (StatusCode::OK, success_to_api_response(approvals)),
        Err(e) => datastore_error_response::<Vec<ModeratorApproval>>(&e),
    }
}
