//! REST client for the hosted relational store.
//!
//! Filters are encoded as query parameters in the store's dialect
//! (`col=eq.value`, `col=is.null`, `or=(...)`, `order=col.desc`). Writes ask
//! for `return=representation`; a write that comes back with no rows is
//! treated as rejected.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{
    Datastore, DatastoreError, ModeratorApproval, NewApproval, NewSubmission, NewUser, Role,
    Submission, SubmissionStatus, SubmissionType, User,
};

pub struct RestDatastore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestDatastore {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }

    async fn rows<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<Vec<T>, DatastoreError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DatastoreError::Transport(format!("{status}: {body}")));
        }
        resp.json::<Vec<T>>()
            .await
            .map_err(|e| DatastoreError::Decode(e.to_string()))
    }

    async fn select<T: DeserializeOwned>(
        &self,
        collection: &str,
        filters: Vec<(&str, String)>,
    ) -> Result<Vec<T>, DatastoreError> {
        let mut query = vec![("select", "*".to_string())];
        query.extend(filters);

        let resp = self
            .http
            .get(self.collection_url(collection))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| DatastoreError::Transport(e.to_string()))?;

        Self::rows(resp).await
    }

    async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        collection: &str,
        record: &B,
    ) -> Result<T, DatastoreError> {
        let resp = self
            .http
            .post(self.collection_url(collection))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await
            .map_err(|e| DatastoreError::Transport(e.to_string()))?;

        let rows: Vec<T> = Self::rows(resp).await?;
        rows.into_iter().next().ok_or_else(|| {
            DatastoreError::Rejected(format!("insert into {collection} returned no rows"))
        })
    }

    async fn update(
        &self,
        collection: &str,
        filters: Vec<(&str, String)>,
        patch: serde_json::Value,
    ) -> Result<(), DatastoreError> {
        let resp = self
            .http
            .patch(self.collection_url(collection))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .query(&filters)
            .json(&patch)
            .send()
            .await
            .map_err(|e| DatastoreError::Transport(e.to_string()))?;

        let rows: Vec<serde_json::Value> = Self::rows(resp).await?;
        if rows.is_empty() {
            return Err(DatastoreError::Rejected(format!(
                "update of {collection} matched no rows"
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Datastore for RestDatastore {
    async fn find_user(&self, id: i64) -> Result<Option<User>, DatastoreError> {
        let rows = self
            .select::<User>("users", vec![("id", format!("eq.{id}"))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, DatastoreError> {
        let rows = self
            .select::<User>("users", vec![("username", format!("eq.{username}"))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn username_or_email_taken(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, DatastoreError> {
        let rows = self
            .select::<User>(
                "users",
                vec![("or", format!("(username.eq.{username},email.eq.{email})"))],
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatastoreError> {
        self.insert("users", &user).await
    }

    async fn list_users(&self) -> Result<Vec<User>, DatastoreError> {
        self.select("users", Vec::new()).await
    }

    async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>, DatastoreError> {
        self.select("users", vec![("role", format!("eq.{}", role.as_str()))])
            .await
    }

    async fn list_users_by_points(&self) -> Result<Vec<User>, DatastoreError> {
        self.select("users", vec![("order", "points.desc".to_string())])
            .await
    }

    async fn update_user_points(&self, id: i64, points: i64) -> Result<(), DatastoreError> {
        self.update(
            "users",
            vec![("id", format!("eq.{id}"))],
            serde_json::json!({ "points": points }),
        )
        .await
    }

    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<Submission, DatastoreError> {
        self.insert("submissions", &submission).await
    }

    async fn find_submission(&self, id: i64) -> Result<Option<Submission>, DatastoreError> {
        let rows = self
            .select::<Submission>("submissions", vec![("id", format!("eq.{id}"))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_submissions(
        &self,
        status: SubmissionStatus,
        submission_type: Option<SubmissionType>,
    ) -> Result<Vec<Submission>, DatastoreError> {
        let mut filters = vec![("status", format!("eq.{}", status.as_str()))];
        if let Some(ty) = submission_type {
            filters.push(("submission_type", format!("eq.{}", ty.as_str())));
        }
        self.select("submissions", filters).await
    }

    async fn has_recent_original_with_image(
        &self,
        image_url: &str,
        since: DateTime<Utc>,
    ) -> Result<bool, DatastoreError> {
        let rows = self
            .select::<Submission>(
                "submissions",
                vec![
                    ("image_url", format!("eq.{image_url}")),
                    ("parent_submission_id", "is.null".to_string()),
                    ("created_at", format!("gte.{}", since.to_rfc3339())),
                ],
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn update_submission_status(
        &self,
        id: i64,
        status: SubmissionStatus,
    ) -> Result<(), DatastoreError> {
        self.update(
            "submissions",
            vec![("id", format!("eq.{id}"))],
            serde_json::json!({ "status": status.as_str() }),
        )
        .await
    }

    async fn insert_approval(
        &self,
        approval: NewApproval,
    ) -> Result<ModeratorApproval, DatastoreError> {
        self.insert("moderator_approvals", &approval).await
    }

    async fn list_approvals(&self) -> Result<Vec<ModeratorApproval>, DatastoreError> {
        self.select("moderator_approvals", Vec::new()).await
    }
}
