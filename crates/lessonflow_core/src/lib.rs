pub mod catalog;
pub mod domain;
pub mod generation;
pub mod lesson;
pub mod ports;

pub use catalog::{apply_promo, Catalog, PromoOutcome};
pub use domain::{Cart, Course, Flash, FlashLevel, Session};
pub use generation::{GenerationDispatcher, GenerationRequest, GenerationResult, ModelBackend};
pub use lesson::{LessonMaterials, LessonPlanner, LessonRequest};
pub use ports::{
    ChatCompletionService, GenerationError, GenerationOutcome, PortError, PortResult,
    PromptCompletionService, SessionRepository, StructuredGenerationService,
};
