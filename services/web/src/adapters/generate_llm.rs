//! services/web/src/adapters/generate_llm.rs
//!
//! This module contains the adapter for Ollama-compatible `/api/generate` endpoints
//! (used for Qwen and Llama 3 models). It implements the `PromptCompletionService` port.

use std::time::Duration;

use async_trait::async_trait;
use lessonflow_core::ports::{GenerationError, GenerationOutcome, PromptCompletionService};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use super::extract_api_error;
use crate::config::OLLAMA_URL_PLACEHOLDER;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

//=========================================================================================
// Request DTOs
//=========================================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `PromptCompletionService` over plain HTTP.
#[derive(Clone)]
pub struct OllamaGenerateAdapter {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl OllamaGenerateAdapter {
    /// Creates a new `OllamaGenerateAdapter` with a 60 second request timeout.
    pub fn new(api_url: String, api_key: Option<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    /// True until a real host replaces the placeholder in the endpoint URL.
    pub fn is_configured(&self) -> bool {
        !self.api_url.contains(OLLAMA_URL_PLACEHOLDER)
    }
}

//=========================================================================================
// `PromptCompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl PromptCompletionService for OllamaGenerateAdapter {
    async fn complete_prompt(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
    ) -> GenerationOutcome<String> {
        if !self.is_configured() {
            return Err(GenerationError::EndpointNotConfigured);
        }

        let body = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: GenerateOptions { temperature },
        };

        let mut request = self.client.post(&self.api_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let start = std::time::Instant::now();
        let response = request.send().await.map_err(|e| {
            error!(%model, error = %e, "Generate endpoint call failed");
            GenerationError::Transport(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let msg = extract_api_error(&body).unwrap_or(body);
            error!(%model, %status, "Generate endpoint returned an error");
            let detail = format!("{} {}", status, msg);
            return Err(GenerationError::Transport(detail.trim_end().to_string()));
        }

        let raw = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        info!(
            %model,
            elapsed = ?start.elapsed(),
            body_len = raw.len(),
            "Generate endpoint replied"
        );

        let reply = serde_json::from_str::<Value>(&raw)
            .ok()
            .and_then(|data| data.get("response").and_then(Value::as_str).map(str::to_string));

        match reply {
            Some(text) => Ok(text.trim().to_string()),
            None => Err(GenerationError::MalformedResponse(raw)),
        }
    }
}
