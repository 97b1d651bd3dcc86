use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analyzer::Analyzer;
use crate::datastore::{
    Datastore, DatastoreError, NewSubmission, Role, Submission, SubmissionStatus, SubmissionType,
};
use crate::notifier::{Notifier, notify_user};

/// Sliding window for the repeat-photo check on original reports.
pub const DUPLICATE_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
pub struct CreateSubmissionRequest {
    pub user_id: i64,
    pub submission_type: SubmissionType,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub image_url: String,
    pub parent_submission_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub message: String,
    pub submission: Submission,
}

#[derive(Debug, Error)]
pub enum CreateSubmissionError {
    #[error("Submission for this image URL already exists within the past week")]
    DuplicateImage,
    #[error("Parent submission {0} not found")]
    ParentNotFound(i64),
    #[error("{0}")]
    InvalidParent(String),
    #[error(transparent)]
    Store(#[from] DatastoreError),
}

/// Creates a submission: duplicate/parent checks, best-effort analysis,
/// persistence, then fire-and-forget notifications to the author and every
/// moderator. A persisted submission with failed notifications still counts
/// as created.
pub async fn create_submission(
    store: &dyn Datastore,
    analyzer: &dyn Analyzer,
    notifier: &dyn Notifier,
    req: CreateSubmissionRequest,
) -> Result<Submission, CreateSubmissionError> {
    match req.parent_submission_id {
        None => {
            // Repeat reports of the same photographed issue are spam; one
            // original per image URL per window.
            let since = Utc::now() - Duration::days(DUPLICATE_WINDOW_DAYS);
            if store
                .has_recent_original_with_image(&req.image_url, since)
                .await?
            {
                return Err(CreateSubmissionError::DuplicateImage);
            }
        }
        Some(parent_id) => {
            let parent = store
                .find_submission(parent_id)
                .await?
                .ok_or(CreateSubmissionError::ParentNotFound(parent_id))?;
            if !parent.is_original() {
                return Err(CreateSubmissionError::InvalidParent(
                    "Parent submission is itself a solution".to_string(),
                ));
            }
            if parent.submission_type != req.submission_type {
                return Err(CreateSubmissionError::InvalidParent(
                    "Parent submission has a different type".to_string(),
                ));
            }
        }
    }

    // Informational only; any analyzer failure becomes a tagged blob on the
    // record and never blocks creation.
    let analysis = analyzer.analyze(&req.description, &req.image_url).await;

    let submission = store
        .insert_submission(NewSubmission {
            user_id: req.user_id,
            submission_type: req.submission_type,
            location: req.location,
            latitude: req.latitude,
            longitude: req.longitude,
            description: req.description,
            image_url: req.image_url,
            status: SubmissionStatus::Pending,
            parent_submission_id: req.parent_submission_id,
            genai_analysis: analysis.to_value(),
        })
        .await?;

    notify_user(
        store,
        notifier,
        submission.user_id,
        "Submission Created",
        &format!(
            "Your submission '{}' has been created.",
            submission.description
        ),
    )
    .await;

    match store.list_users_by_role(Role::Moderator).await {
        Ok(moderators) => {
            for moderator in moderators {
                notifier
                    .send(
                        &moderator.email,
                        "New Submission Alert",
                        &format!(
                            "A new submission '{}' has been created.",
                            submission.description
                        ),
                    )
                    .await;
            }
        }
        Err(e) => tracing::warn!("could not list moderators for notification: {e}"),
    }

    Ok(submission)
}
