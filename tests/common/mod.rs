#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use backend::{
    AppState,
    analyzer::{Analysis, Analyzer, Verdict},
    config::Config,
    datastore::{Datastore, MemoryDatastore, NewUser, Role, User},
    notifier::Notifier,
};

/// Analyzer stub: always returns the same confident verdict.
pub struct StubAnalyzer;

#[async_trait]
impl Analyzer for StubAnalyzer {
    async fn analyze(&self, _description: &str, _image_url: &str) -> Analysis {
        Analysis::Verdict(Verdict {
            authenticity_flag: "Real".to_string(),
            confidence_score: "95%".to_string(),
            explanation: "Stubbed verdict.".to_string(),
        })
    }
}

/// Notifier fake that records every message instead of delivering it.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMail>>,
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn subjects_for(&self, recipient: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.recipient == recipient)
            .map(|m| m.subject)
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, recipient: &str, subject: &str, body: &str) {
        self.sent.lock().unwrap().push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
    }
}

pub struct TestContext {
    pub store: Arc<MemoryDatastore>,
    pub notifier: Arc<RecordingNotifier>,
    pub state: AppState,
}

pub fn test_context() -> TestContext {
    let store = Arc::new(MemoryDatastore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState {
        config: test_config(),
        store: store.clone(),
        analyzer: Arc::new(StubAnalyzer),
        notifier: notifier.clone(),
    };
    TestContext {
        store,
        notifier,
        state,
    }
}

fn test_config() -> Config {
    Config {
        datastore_url: "http://datastore.invalid".to_string(),
        datastore_api_key: "test-key".to_string(),
        analyzer_api_key: "test-key".to_string(),
        analyzer_model: "test-model".to_string(),
        mail_api_url: "http://mail.invalid".to_string(),
        mail_api_key: "test-key".to_string(),
        mail_sender: "noreply@example.com".to_string(),
        server_host: "::".to_string(),
        server_port: 0,
    }
}

pub async fn seed_user(store: &MemoryDatastore, username: &str, role: Role) -> User {
    store
        .insert_user(NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "secret".to_string(),
            role,
        })
        .await
        .unwrap()
}
