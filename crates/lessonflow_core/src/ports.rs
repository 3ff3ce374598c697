//! crates/lessonflow_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like session stores or LLM APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::Session;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for storage-like port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Every way a generation call can fail. Adapters convert their library errors
/// into one of these; nothing else crosses the generation boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("client not initialized")]
    ClientNotInitialized,
    #[error("endpoint not configured")]
    EndpointNotConfigured,
    #[error("unknown model: {0}")]
    UnknownModel(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("missing credential: {0}")]
    MissingCredential(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type GenerationOutcome<T> = Result<T, GenerationError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Sessions are only stored once something about them is worth keeping; an
/// anonymous visitor who never logs in or fills a cart leaves no entry behind.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Loads a stored session and marks it as accessed now.
    async fn get_session(&self, session_id: Uuid) -> PortResult<Session>;

    /// Inserts or replaces the stored session with this value (last write wins).
    async fn save_session(&self, session: Session) -> PortResult<()>;

    /// Drops every session last accessed before `cutoff`; returns how many were removed.
    async fn remove_idle_sessions(&self, cutoff: DateTime<Utc>) -> PortResult<usize>;
}

/// A chat-completion style API: a system message and a user message in, one reply out.
#[async_trait]
pub trait ChatCompletionService: Send + Sync {
    async fn complete_chat(
        &self,
        model: &str,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> GenerationOutcome<String>;
}

/// A generate-endpoint style API: one concatenated prompt in, one reply out.
#[async_trait]
pub trait PromptCompletionService: Send + Sync {
    async fn complete_prompt(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
    ) -> GenerationOutcome<String>;
}

/// A generative API that constrains its reply to a declared JSON schema.
/// Returns the raw reply text; parsing is the caller's job.
#[async_trait]
pub trait StructuredGenerationService: Send + Sync {
    async fn generate_structured(
        &self,
        system_instruction: &str,
        user_request: &str,
        response_schema: &Value,
    ) -> GenerationOutcome<String>;
}
