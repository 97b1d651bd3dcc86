use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::datastore::{
    Datastore, DatastoreError, Decision, NewApproval, SubmissionStatus,
};
use crate::notifier::{Notifier, notify_user};
use crate::points::{
    MODERATOR_RESOLVE_AWARD, ORIGINAL_APPROVAL_AWARD, PointsError, SOLUTION_APPROVAL_AWARD,
    award_points,
};

#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    pub moderator_id: i64,
    pub submission_id: i64,
    pub decision: Decision,
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApprovalResponse {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApproveError {
    #[error("Submission not found")]
    SubmissionNotFound,
    #[error("Submission was already decided (status: {})", .0.as_str())]
    AlreadyDecided(SubmissionStatus),
    #[error(transparent)]
    Points(#[from] PointsError),
    #[error(transparent)]
    Store(#[from] DatastoreError),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Submission not found")]
    SubmissionNotFound,
    #[error(transparent)]
    Points(#[from] PointsError),
    #[error(transparent)]
    Store(#[from] DatastoreError),
}

/// Records a moderator decision: status transition, audit record, then the
/// reward/notification fan-out for approvals. Steps are sequential and
/// non-transactional; a failure partway leaves the earlier steps applied.
pub async fn approve(
    store: &dyn Datastore,
    notifier: &dyn Notifier,
    req: ApprovalRequest,
) -> Result<String, ApproveError> {
    let submission = store
        .find_submission(req.submission_id)
        .await?
        .ok_or(ApproveError::SubmissionNotFound)?;

    // A decision fires exactly once per submission. Without this guard a
    // repeated approve call would award points again.
    if submission.status != SubmissionStatus::Pending {
        return Err(ApproveError::AlreadyDecided(submission.status));
    }

    store
        .update_submission_status(submission.id, req.decision.into())
        .await?;

    store
        .insert_approval(NewApproval {
            submission_id: req.submission_id,
            moderator_id: req.moderator_id,
            decision: req.decision,
            remarks: req.remarks,
        })
        .await?;

    if req.decision == Decision::Approved {
        match submission.parent_submission_id {
            None => {
                award_points(store, submission.user_id, ORIGINAL_APPROVAL_AWARD).await?;
                notify_user(
                    store,
                    notifier,
                    submission.user_id,
                    "Submission Approved",
                    &format!(
                        "Your submission '{}' has been approved.",
                        submission.description
                    ),
                )
                .await;
            }
            Some(parent_id) => {
                award_points(store, submission.user_id, SOLUTION_APPROVAL_AWARD).await?;
                store
                    .update_submission_status(parent_id, SubmissionStatus::Resolved)
                    .await?;

                match store.find_submission(parent_id).await {
                    Ok(Some(parent)) => {
                        notify_user(
                            store,
                            notifier,
                            parent.user_id,
                            "Your Request Has Been Solved",
                            "Your submission has been solved by a solution.",
                        )
                        .await;
                    }
                    Ok(None) => {
                        tracing::warn!("parent submission {parent_id} missing at notification")
                    }
                    Err(e) => tracing::warn!("could not look up parent {parent_id}: {e}"),
                }

                notify_user(
                    store,
                    notifier,
                    submission.user_id,
                    "Solution Accepted",
                    &format!(
                        "Your solution for the submission '{}' has been accepted.",
                        submission.description
                    ),
                )
                .await;
            }
        }
    }

    let message = match req.decision {
        Decision::Approved => "Submission approved and points awarded.",
        Decision::Rejected => "Submission rejected.",
    };
    Ok(message.to_string())
}

/// A moderator fixed the issue themselves: the submission resolves from any
/// prior status and the moderator takes the fixed resolution award.
pub async fn resolve(
    store: &dyn Datastore,
    notifier: &dyn Notifier,
    submission_id: i64,
    moderator_id: i64,
) -> Result<String, ResolveError> {
    let submission = store
        .find_submission(submission_id)
        .await?
        .ok_or(ResolveError::SubmissionNotFound)?;

    store
        .update_submission_status(submission_id, SubmissionStatus::Resolved)
        .await?;

    award_points(store, moderator_id, MODERATOR_RESOLVE_AWARD).await?;

    notify_user(
        store,
        notifier,
        submission.user_id,
        "Your Request Has Been Solved",
        &format!("Your submission '{}' has been solved.", submission.description),
    )
    .await;

    Ok(format!(
        "Submission resolved; moderator awarded {MODERATOR_RESOLVE_AWARD} points."
    ))
}
