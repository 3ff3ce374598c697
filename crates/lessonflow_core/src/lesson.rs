//! crates/lessonflow_core/src/lesson.rs
//!
//! Structured lesson-material generation: a lesson request is turned into a
//! single instruction, sent to a schema-constrained generative API, and the
//! reply is parsed into `LessonMaterials`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::ports::{GenerationError, GenerationOutcome, StructuredGenerationService};

pub const DEFAULT_LEVEL: &str = "basic";

pub const DEFAULT_SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant for creating structured educational materials. \
     Your response MUST be a single, valid JSON object, strictly following the specified \
     structure.";

//=========================================================================================
// Request
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonRequest {
    pub topic: String,
    pub class: String,
    pub goal: String,
    pub level: String,
}

impl LessonRequest {
    /// Trims all fields; `topic` is required, `level` defaults to "basic".
    pub fn new(
        topic: Option<&str>,
        class: Option<&str>,
        goal: Option<&str>,
        level: Option<&str>,
    ) -> Result<Self, GenerationError> {
        let topic = topic.unwrap_or_default().trim();
        if topic.is_empty() {
            return Err(GenerationError::InvalidRequest("Topic is required".to_string()));
        }

        Ok(Self {
            topic: topic.to_string(),
            class: class.unwrap_or_default().trim().to_string(),
            goal: goal.unwrap_or_default().trim().to_string(),
            level: level.unwrap_or(DEFAULT_LEVEL).trim().to_string(),
        })
    }

    pub fn instruction(&self) -> String {
        format!(
            "Generate learning materials, strictly following the structure and data below:\n\
             Topic: {}\n\
             Class: {}\n\
             Goal: {}\n\
             Difficulty level: {}\n",
            self.topic, self.class, self.goal, self.level
        )
    }
}

//=========================================================================================
// Materials
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub a: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestQuestion {
    #[serde(default)]
    pub q: String,
    /// Question kind, e.g. "mcq" or "tf".
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainerTask {
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub explain: String,
}

/// Lesson plan, flashcards, test and trainer tasks for one topic.
/// Missing fields default to empty; the remote schema is what enforces shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonMaterials {
    #[serde(default)]
    pub plan: String,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
    #[serde(default)]
    pub test: Vec<TestQuestion>,
    #[serde(default)]
    pub trainer: Vec<TrainerTask>,
}

impl LessonMaterials {
    pub fn parse(text: &str) -> GenerationOutcome<Self> {
        serde_json::from_str(text).map_err(|e| GenerationError::MalformedResponse(e.to_string()))
    }
}

/// The response schema declared to the generative API.
pub fn response_schema() -> Value {
    let string = |description: &str| json!({ "type": "STRING", "description": description });
    let array_of = |properties: Value| {
        json!({ "type": "ARRAY", "items": { "type": "OBJECT", "properties": properties } })
    };

    json!({
        "type": "OBJECT",
        "properties": {
            "plan": string("Detailed lesson plan."),
            "flashcards": array_of(json!({
                "q": string("Question"),
                "a": string("Answer"),
            })),
            "test": array_of(json!({
                "q": string("Test question"),
                "type": string("Question type (mcq/tf)"),
                "answer": string("Correct answer"),
                "explanation": string("Explanation"),
            })),
            "trainer": array_of(json!({
                "level": string("Task level (L1, L2)"),
                "task": string("Task text"),
                "answer": string("Correct answer"),
                "explain": string("Explanation of the solution"),
            })),
        }
    })
}

//=========================================================================================
// Planner
//=========================================================================================

/// Produces lesson materials through a structured generation backend.
#[derive(Clone)]
pub struct LessonPlanner {
    backend: Option<Arc<dyn StructuredGenerationService>>,
    system_instruction: String,
    schema: Value,
}

impl LessonPlanner {
    /// `backend` is `None` when no API credential was configured.
    pub fn new(
        backend: Option<Arc<dyn StructuredGenerationService>>,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            system_instruction: system_instruction.into(),
            schema: response_schema(),
        }
    }

    pub async fn generate(&self, request: &LessonRequest) -> GenerationOutcome<LessonMaterials> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            GenerationError::MissingCredential(
                "API key not found. Set the GEMINI_API_KEY environment variable.".to_string(),
            )
        })?;

        let text = backend
            .generate_structured(&self.system_instruction, &request.instruction(), &self.schema)
            .await?;

        match LessonMaterials::parse(&text) {
            Ok(materials) => {
                info!(
                    topic = %request.topic,
                    flashcards = materials.flashcards.len(),
                    test = materials.test.len(),
                    trainer = materials.trainer.len(),
                    "Lesson materials generated"
                );
                Ok(materials)
            }
            Err(e) => {
                warn!(
                    topic = %request.topic,
                    reply_len = text.len(),
                    error = %e,
                    "Model returned invalid JSON"
                );
                Err(e)
            }
        }
    }
}
