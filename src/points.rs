use thiserror::Error;

use crate::datastore::{Datastore, DatastoreError};

/// Award for an approved original report.
pub const ORIGINAL_APPROVAL_AWARD: i64 = 10;
/// Award for an approved solution to someone else's report.
pub const SOLUTION_APPROVAL_AWARD: i64 = 100;
/// Award for a moderator who resolves a report themselves.
pub const MODERATOR_RESOLVE_AWARD: i64 = 50;

#[derive(Debug, Error)]
pub enum PointsError {
    #[error("user not found for updating points")]
    UserNotFound,
    #[error(transparent)]
    Store(#[from] DatastoreError),
}

/// Read-modify-write against the user's balance. Not atomic: two concurrent
/// awards to the same user can read the same balance and lose an increment.
pub async fn award_points(
    store: &dyn Datastore,
    user_id: i64,
    delta: i64,
) -> Result<i64, PointsError> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or(PointsError::UserNotFound)?;

    let new_points = user.points + delta;
    store.update_user_points(user_id, new_points).await?;

    tracing::info!("awarded {delta} points to user {user_id} (now {new_points})");
    Ok(new_points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::{MemoryDatastore, NewUser, Role};

    async fn seed_user(store: &MemoryDatastore) -> i64 {
        store
            .insert_user(NewUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "secret".to_string(),
                role: Role::User,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn accumulates_across_awards() {
        let store = MemoryDatastore::new();
        let user_id = seed_user(&store).await;

        assert_eq!(award_points(&store, user_id, 10).await.unwrap(), 10);
        assert_eq!(award_points(&store, user_id, 100).await.unwrap(), 110);
        assert_eq!(
            store.find_user(user_id).await.unwrap().unwrap().points,
            110
        );
    }

    #[tokio::test]
    async fn unknown_user_is_an_error() {
        let store = MemoryDatastore::new();
        let err = award_points(&store, 999, 10).await.unwrap_err();
        assert!(matches!(err, PointsError::UserNotFound));
    }
}
