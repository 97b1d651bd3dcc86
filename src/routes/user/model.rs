use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::datastore::{Datastore, DatastoreError, NewUser, Role, User};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("User not found")]
    UnknownUser,
    #[error("Incorrect password")]
    WrongPassword,
    #[error(transparent)]
    Store(#[from] DatastoreError),
}

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("Username or email already exists")]
    Taken,
    #[error(transparent)]
    Store(#[from] DatastoreError),
}

pub async fn login(store: &dyn Datastore, req: LoginRequest) -> Result<User, LoginError> {
    let user = store
        .find_user_by_username(&req.username)
        .await?
        .ok_or(LoginError::UnknownUser)?;

    // Plaintext compare against the stored column; see the hardening note on
    // `User::password`.
    if user.password != req.password {
        return Err(LoginError::WrongPassword);
    }

    Ok(user)
}

pub async fn create_user(
    store: &dyn Datastore,
    req: CreateUserRequest,
) -> Result<User, CreateUserError> {
    if store
        .username_or_email_taken(&req.username, &req.email)
        .await?
    {
        return Err(CreateUserError::Taken);
    }

    let user = store
        .insert_user(NewUser {
            username: req.username,
            email: req.email,
            password: req.password,
            role: req.role,
        })
        .await?;

    Ok(user)
}
