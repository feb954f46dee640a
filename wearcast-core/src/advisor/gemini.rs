use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

use super::TextGenerator;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    base_url: String,
    model: String,
    http: Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Error envelope, e.g. `{"error":{"code":403,"message":"...","status":"PERMISSION_DENIED"}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build Gemini client, using defaults: {}", e);
                Client::new()
            });

        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            http,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn classify_failure(status: StatusCode, body: &str) -> Error {
    let (message, upstream_status) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => (env.error.message, env.error.status),
        Err(_) => (body.trim().to_string(), String::new()),
    };

    let denied = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || upstream_status == "PERMISSION_DENIED"
        || message.contains("PERMISSION_DENIED");

    if denied || message.contains("API key") {
        Error::AuthorizationError(message)
    } else if message.is_empty() {
        Error::GenerationError(format!("upstream returned status {status}"))
    } else {
        Error::GenerationError(message)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::ConfigurationError(
                "Gemini API key is missing.\n\
                 Hint: run `wearcast configure gemini` or set GEMINI_API_KEY."
                    .to_string(),
            )
        })?;

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        tracing::debug!("Sending prompt to {} ({})", self.model, url);

        let body = GenerateRequest { contents: [Content { parts: [Part { text: prompt }] }] };

        let res = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::warn!("Gemini request failed: {}", e);
                Error::GenerationError(format!("no response from the text generation service: {e}"))
            })?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| {
                Error::GenerationError(format!("failed to read response body: {}", e.without_url()))
            })?;

        if !status.is_success() {
            let err = classify_failure(status, &text);
            tracing::warn!("Gemini returned {}: {}", status, err);
            return Err(err);
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| Error::GenerationError(format!("unreadable response: {e}")))?;

        let reply: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if reply.trim().is_empty() {
            return Err(Error::EmptyResponse);
        }

        Ok(reply)
    }
}
