use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    datastore::User,
    utils::{
        datastore_error_response, error_codes, error_to_api_response, success_to_api_response,
    },
};

use super::model::{self, CreateUserError, CreateUserRequest, LoginError, LoginRequest,
    LoginResponse};

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    match model::login(state.store.as_ref(), req).await {
        Ok(user) => (
            StatusCode::OK,
            success_to_api_response(LoginResponse {
                message: "Login successful".to_string(),
                user,
            }),
        ),
        Err(LoginError::UnknownUser) => (
            StatusCode::NOT_FOUND,
            error_to_api_response(error_codes::NOT_FOUND, "User not found".to_string()),
        ),
        Err(LoginError::WrongPassword) => (
            StatusCode::UNAUTHORIZED,
            error_to_api_response(error_codes::AUTH_FAILED, "Incorrect password".to_string()),
        ),
        Err(LoginError::Store(e)) => datastore_error_response(&e),
    }
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> impl IntoResponse {
    match model::create_user(state.store.as_ref(), req).await {
        Ok(user) => (StatusCode::OK, success_to_api_response(user)),
        Err(CreateUserError::Taken) => (
            StatusCode::BAD_REQUEST,
            error_to_api_response(
                error_codes::USER_EXISTS,
                "Username or email already exists".to_string(),
            ),
        ),
        Err(CreateUserError::Store(e)) => datastore_error_response(&e),
    }
}

#[axum::debug_handler]
pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list_users().await {
        Ok(users) => (StatusCode::OK, success_to_api_response(users)),
        Err(e) => datastore_error_response::<Vec<User>>(&e),
    }
}

#[axum::debug_handler]
pub async fn leaderboard(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list_users_by_points().await {
        Ok(users) => (StatusCode::OK, success_to_api_response(users)),
        Err(e) => datastore_error_response::<Vec<User>>(&e),
    }
}
