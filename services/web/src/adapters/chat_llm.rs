//! services/web/src/adapters/chat_llm.rs
//!
//! This module contains the adapter for OpenAI-compatible chat-completion APIs
//! (DeepSeek by default). It implements the `ChatCompletionService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use lessonflow_core::ports::{ChatCompletionService, GenerationError, GenerationOutcome};
use tracing::{error, info};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ChatCompletionService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiChatAdapter {
    client: Client<OpenAIConfig>,
}

impl OpenAiChatAdapter {
    /// Creates a new `OpenAiChatAdapter`.
    pub fn new(client: Client<OpenAIConfig>) -> Self {
        Self { client }
    }

    /// Builds a client for the given API key and base URL.
    pub fn from_credentials(api_key: &str, api_base: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self::new(Client::with_config(config))
    }
}

fn build_error(e: OpenAIError) -> GenerationError {
    GenerationError::Internal(e.to_string())
}

//=========================================================================================
// `ChatCompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ChatCompletionService for OpenAiChatAdapter {
    /// Sends a system persona and a user prompt; returns the first choice's text.
    async fn complete_chat(
        &self,
        model: &str,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> GenerationOutcome<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()
                .map_err(build_error)?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user)
                .build()
                .map_err(build_error)?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .temperature(temperature)
            .build()
            .map_err(build_error)?;

        // Call the API and map the error into the generation taxonomy.
        let response = self.client.chat().create(request).await.map_err(|e| {
            error!(%model, error = %e, "Chat-completion API call failed");
            GenerationError::Transport(e.to_string())
        })?;

        if let Some(usage) = &response.usage {
            info!(
                %model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat-completion usage"
            );
        }

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                GenerationError::MalformedResponse(
                    "chat completion contained no message content".to_string(),
                )
            })
    }
}
