use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::{
    Datastore, DatastoreError, ModeratorApproval, NewApproval, NewSubmission, NewUser, Role,
    Submission, SubmissionStatus, SubmissionType, User,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    submissions: Vec<Submission>,
    approvals: Vec<ModeratorApproval>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process implementation of [`Datastore`] backing the test suite.
/// Ids and creation timestamps are stamped on insert, mirroring the hosted
/// store's column defaults.
#[derive(Default)]
pub struct MemoryDatastore {
    tables: Mutex<Tables>,
}

impl MemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrites a submission's creation timestamp. Window tests use this to
    /// age records without waiting out the window.
    pub fn backdate_submission(&self, id: i64, created_at: DateTime<Utc>) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(sub) = tables.submissions.iter_mut().find(|s| s.id == id) {
            sub.created_at = created_at;
        }
    }
}

#[async_trait::async_trait]
impl Datastore for MemoryDatastore {
    async fn find_user(&self, id: i64) -> Result<Option<User>, DatastoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, DatastoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn username_or_email_taken(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, DatastoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .any(|u| u.username == username || u.email == email))
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatastoreError> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let user = User {
            id,
            username: user.username,
            email: user.email,
            role: user.role,
            password: user.password,
            points: 0,
            badges: Vec::new(),
            created_at: Some(Utc::now()),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, DatastoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.clone())
    }

    async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>, DatastoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    async fn list_users_by_points(&self) -> Result<Vec<User>, DatastoreError> {
        let mut users = self.tables.lock().unwrap().users.clone();
        // Stable sort keeps insertion order across equal point totals.
        users.sort_by(|a, b| b.points.cmp(&a.points));
        Ok(users)
    }

    async fn update_user_points(&self, id: i64, points: i64) -> Result<(), DatastoreError> {
        let mut tables = self.tables.lock().unwrap();
        match tables.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.points = points;
                Ok(())
            }
            None => Err(DatastoreError::Rejected(
                "update of users matched no rows".to_string(),
            )),
        }
    }

    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<Submission, DatastoreError> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let submission = Submission {
            id,
            user_id: submission.user_id,
            submission_type: submission.submission_type,
            location: submission.location,
            latitude: submission.latitude,
            longitude: submission.longitude,
            description: submission.description,
            image_url: submission.image_url,
            status: submission.status,
            parent_submission_id: submission.parent_submission_id,
            genai_analysis: Some(submission.genai_analysis),
            created_at: Utc::now(),
        };
        tables.submissions.push(submission.clone());
        Ok(submission)
    }

    async fn find_submission(&self, id: i64) -> Result<Option<Submission>, DatastoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.submissions.iter().find(|s| s.id == id).cloned())
    }

    async fn list_submissions(
        &self,
        status: SubmissionStatus,
        submission_type: Option<SubmissionType>,
    ) -> Result<Vec<Submission>, DatastoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .submissions
            .iter()
            .filter(|s| s.status == status)
            .filter(|s| submission_type.is_none_or(|ty| s.submission_type == ty))
            .cloned()
            .collect())
    }

    async fn has_recent_original_with_image(
        &self,
        image_url: &str,
        since: DateTime<Utc>,
    ) -> Result<bool, DatastoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.submissions.iter().any(|s| {
            s.image_url == image_url && s.parent_submission_id.is_none() && s.created_at >= since
        }))
    }

    async fn update_submission_status(
        &self,
        id: i64,
        status: SubmissionStatus,
    ) -> Result<(), DatastoreError> {
        let mut tables = self.tables.lock().unwrap();
        match tables.submissions.iter_mut().find(|s| s.id == id) {
            Some(sub) => {
                sub.status = status;
                Ok(())
            }
            None => Err(DatastoreError::Rejected(
                "update of submissions matched no rows".to_string(),
            )),
        }
    }

    async fn insert_approval(
        &self,
        approval: NewApproval,
    ) -> Result<ModeratorApproval, DatastoreError> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let approval = ModeratorApproval {
            id,
            submission_id: approval.submission_id,
            moderator_id: approval.moderator_id,
            decision: approval.decision,
            remarks: approval.remarks,
            created_at: Some(Utc::now()),
        };
        tables.approvals.push(approval.clone());
        Ok(approval)
    }

    async fn list_approvals(&self) -> Result<Vec<ModeratorApproval>, DatastoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.approvals.clone())
    }
}
