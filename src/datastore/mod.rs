use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod memory;
mod rest;

pub use memory::MemoryDatastore;
pub use rest::RestDatastore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionType {
    Power,
    Waste,
    Tree,
}

impl SubmissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionType::Power => "power",
            SubmissionType::Waste => "waste",
            SubmissionType::Tree => "tree",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
    Resolved,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
            SubmissionStatus::Resolved => "resolved",
        }
    }
}

/// A moderator's verdict on a submission. Distinct from `SubmissionStatus`
/// because `resolved` is never a direct decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl From<Decision> for SubmissionStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => SubmissionStatus::Approved,
            Decision::Rejected => SubmissionStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    // TODO: hash passwords before storing; plaintext compare is kept only to
    // match the hosted store's current contents (tracked hardening item).
    #[serde(skip_serializing)]
    pub password: String,
    pub points: i64,
    #[serde(default)]
    pub badges: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub user_id: i64,
    pub submission_type: SubmissionType,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub image_url: String,
    pub status: SubmissionStatus,
    pub parent_submission_id: Option<i64>,
    pub genai_analysis: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    /// Original report, as opposed to a solution for some parent report.
    pub fn is_original(&self) -> bool {
        self.parent_submission_id.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSubmission {
    pub user_id: i64,
    pub submission_type: SubmissionType,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub image_url: String,
    pub status: SubmissionStatus,
    pub parent_submission_id: Option<i64>,
    pub genai_analysis: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeratorApproval {
    pub id: i64,
    pub submission_id: i64,
    pub moderator_id: i64,
    pub decision: Decision,
    pub remarks: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewApproval {
    pub submission_id: i64,
    pub moderator_id: i64,
    pub decision: Decision,
    pub remarks: Option<String>,
}

#[derive(Debug, Error)]
pub enum DatastoreError {
    #[error("datastore request failed: {0}")]
    Transport(String),
    #[error("datastore rejected the write: {0}")]
    Rejected(String),
    #[error("unexpected datastore response: {0}")]
    Decode(String),
}

/// Record-level access to the hosted store's three collections. Filtered
/// select/insert/update only; workflow logic lives in the route models.
#[async_trait]
pub trait Datastore: Send + Sync {
    async fn find_user(&self, id: i64) -> Result<Option<User>, DatastoreError>;
    async fn find_user_by_username(&self, username: &str)
    -> Result<Option<User>, DatastoreError>;
    async fn username_or_email_taken(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, DatastoreError>;
    async fn insert_user(&self, user: NewUser) -> Result<User, DatastoreError>;
    async fn list_users(&self) -> Result<Vec<User>, DatastoreError>;
    async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>, DatastoreError>;
    async fn list_users_by_points(&self) -> Result<Vec<User>, DatastoreError>;
    async fn update_user_points(&self, id: i64, points: i64) -> Result<(), DatastoreError>;

    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<Submission, DatastoreError>;
    async fn find_submission(&self, id: i64) -> Result<Option<Submission>, DatastoreError>;
    async fn list_submissions(
        &self,
        status: SubmissionStatus,
        submission_type: Option<SubmissionType>,
    ) -> Result<Vec<Submission>, DatastoreError>;
    async fn has_recent_original_with_image(
        &self,
        image_url: &str,
        since: DateTime<Utc>,
    ) -> Result<bool, DatastoreError>;
    async fn update_submission_status(
        &self,
        id: i64,
        status: SubmissionStatus,
    ) -> Result<(), DatastoreError>;

    async fn insert_approval(
        &self,
        approval: NewApproval,
    ) -> Result<ModeratorApproval, DatastoreError>;
    async fn list_approvals(&self) -> Result<Vec<ModeratorApproval>, DatastoreError>;
}
