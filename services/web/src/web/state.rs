//! services/web/src/web/state.rs
//!
//! Defines the shared states handed to the axum handlers of both applications.

use std::sync::Arc;

use lessonflow_core::catalog::Catalog;
use lessonflow_core::generation::GenerationDispatcher;
use lessonflow_core::lesson::LessonPlanner;
use lessonflow_core::ports::SessionRepository;

use crate::web::pages::Pages;

//=========================================================================================
// AppState (Storefront)
//=========================================================================================

/// The storefront's shared state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionRepository>,
    pub catalog: Arc<Catalog>,
    pub generator: GenerationDispatcher,
    /// Model used when an assistant request does not name one.
    pub default_model: String,
    pub pages: Arc<Pages>,
}

//=========================================================================================
// MaterialsState (Lesson-Material Generator)
//=========================================================================================

#[derive(Clone)]
pub struct MaterialsState {
    pub planner: LessonPlanner,
    pub pages: Arc<Pages>,
}
