//! services/web/src/web/materials.rs
//!
//! Handlers and OpenAPI definition for the lesson-material generator.

use crate::web::rest::{error_response, ErrorResponse};
use crate::web::state::MaterialsState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use lessonflow_core::lesson::LessonRequest;
use lessonflow_core::ports::GenerationError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::{OpenApi, ToSchema};

#[derive(OpenApi)]
#[openapi(
    paths(generate_materials_handler),
    components(schemas(LessonApiRequest, ErrorResponse)),
    tags(
        (name = "LessonFlow Materials API", description = "Structured lesson-material generation.")
    )
)]
pub struct MaterialsApiDoc;

/// A request for lesson materials on one topic.
#[derive(Deserialize, ToSchema)]
pub struct LessonApiRequest {
    pub topic: Option<String>,
    pub class: Option<String>,
    pub goal: Option<String>,
    /// `basic` when omitted.
    pub level: Option<String>,
}

/// GET /
pub async fn materials_page(State(state): State<Arc<MaterialsState>>) -> impl IntoResponse {
    state.pages.materials_index()
}

/// Generate a lesson plan, flashcards, a test and trainer tasks for a topic.
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = LessonApiRequest,
    responses(
        (status = 200, description = "Lesson materials: plan, flashcards, test and trainer"),
        (
            status = 400,
            description = "Body is not JSON or the topic is missing",
            body = ErrorResponse
        ),
        (
            status = 500,
            description = "Generation failed or the model returned invalid JSON",
            body = ErrorResponse
        )
    )
)]
pub async fn generate_materials_handler(
    State(state): State<Arc<MaterialsState>>,
    payload: Result<Json<LessonApiRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            warn!("Rejected materials request: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, "Missing JSON data");
        }
    };

    let request = match LessonRequest::new(
        req.topic.as_deref(),
        req.class.as_deref(),
        req.goal.as_deref(),
        req.level.as_deref(),
    ) {
        Ok(request) => request,
        Err(e) => return failure_response(e),
    };

    match state.planner.generate(&request).await {
        Ok(materials) => Json(materials).into_response(),
        Err(e) => {
            error!(topic = %request.topic, error = %e, "Lesson material generation failed");
            failure_response(e)
        }
    }
}

fn failure_response(err: GenerationError) -> Response {
    let message = match err {
        GenerationError::InvalidRequest(msg) => {
            return error_response(StatusCode::BAD_REQUEST, msg);
        }
        GenerationError::MissingCredential(msg) => msg,
        GenerationError::MalformedResponse(_) => {
            "Model returned invalid JSON. Try again or check the base prompt.".to_string()
        }
        GenerationError::Api(msg) => format!("Gemini API error: {}", msg),
        other => format!("Internal server error: {}", other),
    };
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}
