//! Remote completion boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use triage_error::{ApiError, ApiErrorKind};

use crate::ApiConfig;

/// Boundary to a remote text-completion service.
///
/// The prediction flow treats the remote call as an opaque asynchronous
/// operation producing raw completion text; implementations decide
/// transport and provider details. Failures are already classified as
/// [`ApiError`] values so the caller never sees raw transport errors.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    /// Send a prompt and return the raw completion text.
    async fn complete(&self, system_instruction: &str, prompt: &str) -> Result<String, ApiError>;

    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;

    /// Model identifier the transport talks to.
    fn model_name(&self) -> &str;
}

//
// ─── GEMINI ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
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
    #[serde(default)]
    text: String,
}

/// [`CompletionTransport`] implementation for the Gemini REST API.
///
/// Posts to the `generateContent` endpoint with a JSON response mime type,
/// so the model replies with the structured prediction payload rather than
/// prose.
pub struct GeminiTransport {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for GeminiTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiTransport")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiTransport {
    /// Default model for admission prediction.
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";

    /// Sampling temperature used for predictions.
    const TEMPERATURE: f32 = 0.5;

    /// Create a transport using the default model.
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_model(config, Self::DEFAULT_MODEL)
    }

    /// Create a transport targeting a specific model.
    pub fn with_model(config: &ApiConfig, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.gemini_api_key().clone(),
            base_url: config.api_base_url().clone(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn extract_text(envelope: GenerateContentResponse) -> Result<String, ApiError> {
        let text: String = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ApiError::new(
                ApiErrorKind::InvalidResponseFormat,
                "Model response contained no candidates",
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl CompletionTransport for GeminiTransport {
    #[instrument(skip(self, system_instruction, prompt), fields(model = %self.model))]
    async fn complete(&self, system_instruction: &str, prompt: &str) -> Result<String, ApiError> {
        let body = GenerateContentRequest {
            system_instruction: Content {
                parts: vec![Part {
                    text: system_instruction,
                }],
            },
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: Self::TEMPERATURE,
                response_mime_type: "application/json",
            },
        };

        debug!("sending generateContent request");

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                ApiError::upstream(
                    e.status().map(|status| status.as_u16()),
                    format!("Request to model API failed: {}", e),
                )
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::rate_limited(
                "Model API reported its request quota was exceeded",
            ));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ApiError::upstream(
                Some(status.as_u16()),
                format!("Model API returned {}: {}", status, detail),
            ));
        }

        let envelope: GenerateContentResponse = response.json().await.map_err(|e| {
            ApiError::with_source(
                ApiErrorKind::InvalidResponseFormat,
                "Failed to decode model API response envelope",
                e,
            )
        })?;

        Self::extract_text(envelope)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
