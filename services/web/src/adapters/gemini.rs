//! services/web/src/adapters/gemini.rs
//!
//! This module contains the adapter for Gemini's `generateContent` API with a
//! JSON response schema. It implements the `StructuredGenerationService` port.

use async_trait::async_trait;
use lessonflow_core::ports::{GenerationError, GenerationOutcome, StructuredGenerationService};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use super::extract_api_error;

//=========================================================================================
// Request / Response DTOs
//=========================================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
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
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `StructuredGenerationService` using the Gemini REST API.
#[derive(Clone)]
pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiAdapter {
    /// Creates a new `GeminiAdapter`.
    pub fn new(client: reqwest::Client, base_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }
}

//=========================================================================================
// `StructuredGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StructuredGenerationService for GeminiAdapter {
    async fn generate_structured(
        &self,
        system_instruction: &str,
        user_request: &str,
        response_schema: &Value,
    ) -> GenerationOutcome<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_instruction,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: user_request }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema,
            },
        };

        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            let msg = extract_api_error(&body).unwrap_or(body);
            error!(model = %self.model, %status, "Gemini API returned an error");
            return Err(GenerationError::Api(format!("{} {}", status, msg)));
        }

        let body: GenerateContentResponse = res
            .json()
            .await
            .map_err(|e| GenerationError::Internal(format!("unexpected Gemini reply: {e}")))?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        info!(model = %self.model, reply_len = text.len(), "Gemini structured reply received");
        Ok(text)
    }
}
