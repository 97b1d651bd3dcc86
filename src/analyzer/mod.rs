//! Generative image-analysis client.
//!
//! Best-effort by contract: every failure mode collapses into a tagged
//! [`Analysis`] variant and is persisted as a blob distinguishable from a
//! genuine verdict. Nothing here ever fails the submission that asked for it.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

const GENERATE_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Structured verdict parsed out of the model's free-text reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub authenticity_flag: String,
    pub confidence_score: String,
    pub explanation: String,
}

#[derive(Debug, Clone)]
pub enum Analysis {
    Verdict(Verdict),
    ImageUnavailable { error: String },
    RequestFailed { error: String },
    Unparseable { raw: String },
}

impl Analysis {
    /// Blob stored on the submission record.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Analysis::Verdict(verdict) => serde_json::json!({
                "result": "Yes, this seems legit",
                "analysis": verdict,
            }),
            Analysis::ImageUnavailable { error } => serde_json::json!({
                "result": "Error fetching image",
                "error": error,
            }),
            Analysis::RequestFailed { error } => serde_json::json!({
                "result": "Analysis unavailable",
                "error": error,
            }),
            Analysis::Unparseable { raw } => serde_json::json!({
                "result": "Analysis unavailable",
                "reason": "unparseable model output",
                "raw": raw,
            }),
        }
    }
}

#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, description: &str, image_url: &str) -> Analysis;
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

pub struct GeminiAnalyzer {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiAnalyzer {
    pub fn new(http: reqwest::Client, api_key: &str, model: &str) -> Self {
        Self {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    fn prompt(description: &str) -> String {
        format!(
            "You are an AI analyzing a submission for waste management and tree plantations.\n\
             The submission description is:\n\
             \"\"\"{description}\"\"\"\n\
             The submission's photo is attached.\n\n\
             Provide the result in strict JSON format (no extra text) with the following fields:\n\
             {{\n\
               \"authenticity_flag\": \"Real\" or \"Fake\",\n\
               \"confidence_score\": \"85%\",\n\
               \"explanation\": \"Detailed reason why the submission is real or fake.\"\n\
             }}\n\n\
             Ensure the output is valid JSON format only."
        )
    }

    async fn fetch_image(&self, image_url: &str) -> Result<String, String> {
        let bytes = self
            .http
            .get(image_url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| e.to_string())?
            .bytes()
            .await
            .map_err(|e| e.to_string())?;
        Ok(STANDARD.encode(&bytes))
    }

    async fn generate(&self, description: &str, image_base64: String) -> Result<String, String> {
        let url = format!(
            "{GENERATE_BASE_URL}/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "inline_data": { "mime_type": "image/jpeg", "data": image_base64 } },
                    { "text": Self::prompt(description) },
                ]
            }]
        });

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| e.to_string())?;

        let parsed: GenerateContentResponse =
            resp.json().await.map_err(|e| e.to_string())?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err("model returned no text".to_string());
        }
        Ok(text)
    }
}

/// First `{` through last `}`; the model wraps its JSON in prose and code
/// fences often enough that a strict parse of the whole reply fails.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn parse_model_text(text: String) -> Analysis {
    let parsed = extract_json_object(&text)
        .and_then(|json| serde_json::from_str::<Verdict>(json).ok());
    match parsed {
        Some(verdict) => Analysis::Verdict(verdict),
        None => Analysis::Unparseable { raw: text },
    }
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze(&self, description: &str, image_url: &str) -> Analysis {
        let image_base64 = match self.fetch_image(image_url).await {
            Ok(encoded) => encoded,
            Err(error) => {
                tracing::warn!("failed to fetch submission image {image_url}: {error}");
                return Analysis::ImageUnavailable { error };
            }
        };

        match self.generate(description, image_base64).await {
            Ok(text) => {
                tracing::debug!("raw analyzer response: {text}");
                parse_model_text(text)
            }
            Err(error) => {
                tracing::warn!("analyzer request failed: {error}");
                Analysis::RequestFailed { error }
            }
        }
    }
}
