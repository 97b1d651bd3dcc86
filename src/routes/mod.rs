use axum::{
    Router,
    extract::Json,
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;

use crate::AppState;
use crate::utils::{ApiResponse, success_to_api_response};

pub mod moderator;
pub mod submission;
pub mod user;

#[derive(Debug, Serialize)]
struct Banner {
    message: String,
}

async fn root() -> (StatusCode, Json<ApiResponse<Banner>>) {
    (
        StatusCode::OK,
        success_to_api_response(Banner {
            message: "Smart Circular Cities API is running.".to_string(),
        }),
    )
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        // user routes
        .route("/login", post(user::login))
        .route("/users/create", post(user::create_user))
        .route("/users", get(user::list_users))
        .route("/leaderboard", get(user::leaderboard))
        // submission routes
        .route(
            "/submissions",
            post(submission::create_submission).get(submission::list_submissions),
        )
        .route("/submissions/{submission_id}", get(submission::get_submission))
        // moderator routes
        .route("/moderator/submissions", get(moderator::pending_submissions))
        .route("/moderator/approve", post(moderator::approve_submission))
        .route("/moderator/resolve", post(moderator::resolve_submission))
        .route("/moderator/approvals", get(moderator::list_approvals))
        .with_state(state)
}
