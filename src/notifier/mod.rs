use async_trait::async_trait;

use crate::datastore::Datastore;

/// Fire-and-forget notification transport. Implementations log failures and
/// swallow them; no caller is ever told a notification was lost.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str);
}

/// Looks up the user's email and sends, swallowing lookup failures the same
/// way the transport swallows delivery failures.
pub async fn notify_user(
    store: &dyn Datastore,
    notifier: &dyn Notifier,
    user_id: i64,
    subject: &str,
    body: &str,
) {
    match store.find_user(user_id).await {
        Ok(Some(user)) => notifier.send(&user.email, subject, body).await,
        Ok(None) => tracing::warn!("user {user_id} not found for notification '{subject}'"),
        Err(e) => tracing::warn!("could not look up user {user_id} for notification: {e}"),
    }
}

/// Plain-text mail delivery through an HTTP relay API.
pub struct Mailer {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    sender: String,
}

impl Mailer {
    pub fn new(http: reqwest::Client, api_url: &str, api_key: &str, sender: &str) -> Self {
        Self {
            http,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            sender: sender.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for Mailer {
    async fn send(&self, recipient: &str, subject: &str, body: &str) {
        let message = serde_json::json!({
            "from": self.sender,
            "to": [recipient],
            "subject": subject,
            "text": body,
        });

        match self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&message)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!("email sent to {recipient}");
            }
            Ok(resp) => {
                tracing::error!(
                    "mail relay rejected message to {recipient}: {}",
                    resp.status()
                );
            }
            Err(e) => {
                tracing::error!("error sending email to {recipient}: {e}");
            }
        }
    }
}
