pub mod chat_llm;
pub mod gemini;
pub mod generate_llm;
pub mod session_store;

pub use chat_llm::OpenAiChatAdapter;
pub use gemini::GeminiAdapter;
pub use generate_llm::OllamaGenerateAdapter;
pub use session_store::{spawn_idle_sweeper, InMemorySessionStore};

use serde::Deserialize;

/// Try to extract a clean error message from a `{"error": {"message": ...}}` body.
pub(crate) fn extract_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct EWrap {
        error: EObj,
    }
    #[derive(Deserialize)]
    struct EObj {
        message: String,
    }
    serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
