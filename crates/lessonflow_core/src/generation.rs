//! crates/lessonflow_core/src/generation.rs
//!
//! Backend selection and dispatch for the study assistant.
//!
//! A model name is mapped to one of two backends. Each backend gets its own
//! payload shape: the chat backend receives the persona as a system message,
//! the generate backend receives a single prompt with the persona folded in.
//! Whatever happens downstream, callers always get a `GenerationResult`.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::ports::{ChatCompletionService, GenerationError, PromptCompletionService};

pub const DEFAULT_MODEL: &str = "deepseek-v3.2-chat";
pub const DEFAULT_SUBJECT: &str = "math";

/// Sampling temperature sent to both backends.
pub const TEMPERATURE: f32 = 0.7;

const DEFAULT_PERSONA: &str = "Just a helpful AI assistant.";

const SUBJECT_PERSONAS: &[(&str, &str)] = &[
    ("math", "An expert in school mathematics and exam preparation. Answer in detail."),
    ("physics", "A physics specialist in kinematics and dynamics. Use LaTeX formulas."),
    (
        "history",
        "A connoisseur of Russian and world history, focused on the exam format. \
         Use dates and facts.",
    ),
    (
        "chemistry",
        "A chemistry specialist in reactions and the periodic table. Use chemical formulas.",
    ),
    ("biology", "An expert in biology, genetics and ecology. Use proper terminology."),
    ("english", "A B1-B2 English teacher focusing on grammar and vocabulary."),
    ("literature", "An expert in Russian and foreign literature. Analyse the works."),
    ("art", "A specialist in art history and painting. Describe styles and periods."),
    ("programming", "An expert in basic programming and algorithms. Provide code examples."),
];

/// The system-role description for a subject, or a generic assistant persona.
pub fn persona_for(subject: &str) -> &'static str {
    SUBJECT_PERSONAS
        .iter()
        .find(|(known, _)| *known == subject)
        .map(|(_, persona)| *persona)
        .unwrap_or(DEFAULT_PERSONA)
}

/// Subjects with a dedicated persona, in display order.
pub fn known_subjects() -> impl Iterator<Item = &'static str> {
    SUBJECT_PERSONAS.iter().map(|(subject, _)| *subject)
}

//=========================================================================================
// Backend Selection
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelBackend {
    /// OpenAI-compatible chat completions (DeepSeek, GPT).
    ChatCompletion,
    /// Ollama-style `/api/generate` endpoint (Qwen, Llama 3).
    GenerateEndpoint,
}

/// Checked in order, so chat-style patterns win when a name matches both.
const MODEL_REGISTRY: &[(&str, ModelBackend)] = &[
    ("deepseek", ModelBackend::ChatCompletion),
    ("gpt", ModelBackend::ChatCompletion),
    ("qwen", ModelBackend::GenerateEndpoint),
    ("llama3", ModelBackend::GenerateEndpoint),
];

impl ModelBackend {
    pub fn for_model(model_name: &str) -> Result<Self, GenerationError> {
        let lowered = model_name.to_lowercase();
        MODEL_REGISTRY
            .iter()
            .find(|(pattern, _)| lowered.contains(pattern))
            .map(|(_, backend)| *backend)
            .ok_or_else(|| GenerationError::UnknownModel(model_name.to_string()))
    }
}

//=========================================================================================
// Request / Result
//=========================================================================================

/// A validated assistant request. The prompt is guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub subject: String,
    pub prompt: String,
    pub model: String,
}

impl GenerationRequest {
    /// Trims every field, fills in defaults for absent ones and rejects a blank prompt.
    pub fn new(
        subject: Option<&str>,
        prompt: Option<&str>,
        model: Option<&str>,
    ) -> Result<Self, GenerationError> {
        let prompt = prompt.unwrap_or_default().trim();
        if prompt.is_empty() {
            return Err(GenerationError::InvalidRequest(
                "prompt must not be empty".to_string(),
            ));
        }

        Ok(Self {
            subject: subject.unwrap_or(DEFAULT_SUBJECT).trim().to_string(),
            prompt: prompt.to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).trim().to_string(),
        })
    }

    pub fn persona(&self) -> &'static str {
        persona_for(&self.subject)
    }

    /// The single prompt sent to the generate endpoint.
    pub fn combined_prompt(&self) -> String {
        format!(
            "{}\n\nThe user asks: \"{}\"\n\nAnswer as fully and to the point as possible, \
             structuring the answer with Markdown.",
            self.persona(),
            self.prompt
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Success(String),
    Failure(GenerationError),
}

impl GenerationResult {
    /// The user-facing failure reason, if this is a failure.
    pub fn reason(&self) -> Option<String> {
        match self {
            GenerationResult::Success(_) => None,
            GenerationResult::Failure(e) => Some(e.to_string()),
        }
    }
}

impl From<Result<String, GenerationError>> for GenerationResult {
    fn from(result: Result<String, GenerationError>) -> Self {
        match result {
            Ok(text) => GenerationResult::Success(text),
            Err(e) => GenerationResult::Failure(e),
        }
    }
}

//=========================================================================================
// Dispatcher
//=========================================================================================

/// Routes assistant requests to the backend their model belongs to.
#[derive(Clone)]
pub struct GenerationDispatcher {
    chat: Option<Arc<dyn ChatCompletionService>>,
    prompt: Arc<dyn PromptCompletionService>,
}

impl GenerationDispatcher {
    /// `chat` is `None` when the chat client could not be configured at startup.
    pub fn new(
        chat: Option<Arc<dyn ChatCompletionService>>,
        prompt: Arc<dyn PromptCompletionService>,
    ) -> Self {
        Self { chat, prompt }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let backend = match ModelBackend::for_model(&request.model) {
            Ok(backend) => backend,
            Err(e) => return GenerationResult::Failure(e),
        };
        debug!(
            model = %request.model,
            ?backend,
            subject = %request.subject,
            "Dispatching generation request"
        );

        let result = match backend {
            ModelBackend::ChatCompletion => match &self.chat {
                Some(chat) => {
                    chat.complete_chat(
                        &request.model,
                        request.persona(),
                        &request.prompt,
                        TEMPERATURE,
                    )
                    .await
                }
                None => Err(GenerationError::ClientNotInitialized),
            },
            ModelBackend::GenerateEndpoint => {
                self.prompt
                    .complete_prompt(&request.model, &request.combined_prompt(), TEMPERATURE)
                    .await
            }
        };

        if let Err(e) = &result {
            warn!(model = %request.model, ?backend, error = %e, "Generation failed");
        }
        result.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    type ChatPort = Arc<dyn ChatCompletionService>;

    #[derive(Default)]
    struct RecordingChat {
        reply: Option<String>,
        calls: Mutex<Vec<(String, String, String, f32)>>,
    }

    #[async_trait]
    impl ChatCompletionService for RecordingChat {
        async fn complete_chat(
            &self,
            model: &str,
            system: &str,
            user: &str,
            temperature: f32,
        ) -> Result<String, GenerationError> {
            self.calls.lock().unwrap().push((
                model.to_string(),
                system.to_string(),
                user.to_string(),
                temperature,
            ));
            self.reply
                .clone()
                .ok_or_else(|| GenerationError::Transport("connection refused".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingPrompt {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl PromptCompletionService for RecordingPrompt {
        async fn complete_prompt(
            &self,
            model: &str,
            prompt: &str,
            _temperature: f32,
        ) -> Result<String, GenerationError> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string()));
            Ok("generated".to_string())
        }
    }

    fn request(model: &str) -> GenerationRequest {
        GenerationRequest::new(Some("math"), Some("What is a derivative?"), Some(model)).unwrap()
    }

    #[test]
    fn backend_selection_is_case_insensitive_and_chat_first() {
        for name in ["deepseek-v3.2-chat", "DeepSeek-Coder", "gpt-4o", "my-GPT"] {
            assert_eq!(ModelBackend::for_model(name), Ok(ModelBackend::ChatCompletion), "{name}");
        }
        for name in ["qwen2.5", "QWEN-max", "llama3:8b", "Llama3.1"] {
            assert_eq!(ModelBackend::for_model(name), Ok(ModelBackend::GenerateEndpoint), "{name}");
        }
        assert_eq!(
            ModelBackend::for_model("gpt-qwen-hybrid"),
            Ok(ModelBackend::ChatCompletion)
        );
        assert_eq!(
            ModelBackend::for_model("mistral-7b"),
            Err(GenerationError::UnknownModel("mistral-7b".to_string()))
        );
        // "llama2" is not "llama3".
        assert!(ModelBackend::for_model("llama2").is_err());
    }

    #[test]
    fn blank_prompt_is_rejected_and_defaults_apply() {
        assert!(matches!(
            GenerationRequest::new(Some("math"), Some("   \n\t"), None),
            Err(GenerationError::InvalidRequest(_))
        ));
        assert!(GenerationRequest::new(None, None, None).is_err());

        let req = GenerationRequest::new(None, Some("  hi  "), None).unwrap();
        assert_eq!(req.subject, DEFAULT_SUBJECT);
        assert_eq!(req.prompt, "hi");
        assert_eq!(req.model, DEFAULT_MODEL);
    }

    #[test]
    fn unknown_subject_gets_generic_persona() {
        assert_eq!(persona_for("astrology"), DEFAULT_PERSONA);
        assert!(persona_for("physics").contains("LaTeX"));
        assert_eq!(known_subjects().count(), 9);
        assert!(known_subjects().all(|s| persona_for(s) != DEFAULT_PERSONA));
    }

    #[test]
    fn combined_prompt_quotes_the_question() {
        let prompt = request("qwen2.5").combined_prompt();
        assert!(prompt.starts_with(persona_for("math")));
        assert!(prompt.contains("\"What is a derivative?\""));
        assert!(prompt.contains("Markdown"));
    }

    #[tokio::test]
    async fn chat_backend_returns_first_choice_text() {
        let chat = Arc::new(RecordingChat {
            reply: Some("A derivative measures...".to_string()),
            ..Default::default()
        });
        let prompt = Arc::new(RecordingPrompt::default());
        let dispatcher = GenerationDispatcher::new(Some(chat.clone() as ChatPort), prompt.clone());

        let result = dispatcher.generate(&request("deepseek-v3.2-chat")).await;

        assert_eq!(result, GenerationResult::Success("A derivative measures...".to_string()));
        let calls = chat.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, persona_for("math"));
        assert_eq!(calls[0].2, "What is a derivative?");
        assert_eq!(calls[0].3, TEMPERATURE);
        assert!(prompt.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn generate_backend_receives_combined_prompt() {
        let prompt = Arc::new(RecordingPrompt::default());
        let dispatcher = GenerationDispatcher::new(None, prompt.clone());

        let result = dispatcher.generate(&request("llama3")).await;

        assert!(matches!(result, GenerationResult::Success(_)));
        let calls = prompt.calls.lock().unwrap();
        assert_eq!(calls[0].0, "llama3");
        assert!(calls[0].1.contains("What is a derivative?"));
    }

    #[tokio::test]
    async fn missing_chat_client_is_a_failure_not_a_panic() {
        let dispatcher = GenerationDispatcher::new(None, Arc::new(RecordingPrompt::default()));
        let result = dispatcher.generate(&request("gpt-4o")).await;
        assert_eq!(result.reason().as_deref(), Some("client not initialized"));
    }

    #[tokio::test]
    async fn unknown_model_never_reaches_a_backend() {
        let chat = Arc::new(RecordingChat::default());
        let prompt = Arc::new(RecordingPrompt::default());
        let dispatcher = GenerationDispatcher::new(Some(chat.clone() as ChatPort), prompt.clone());

        let result = dispatcher.generate(&request("claude-2")).await;

        assert_eq!(result.reason().as_deref(), Some("unknown model: claude-2"));
        assert!(chat.calls.lock().unwrap().is_empty());
        assert!(prompt.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn backend_errors_become_failures() {
        let chat = Arc::new(RecordingChat::default());
        let dispatcher =
            GenerationDispatcher::new(Some(chat as ChatPort), Arc::new(RecordingPrompt::default()));
        let result = dispatcher.generate(&request("deepseek-chat")).await;
        assert_eq!(
            result,
            GenerationResult::Failure(GenerationError::Transport("connection refused".to_string()))
        );
    }
}
