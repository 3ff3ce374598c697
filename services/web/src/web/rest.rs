//! services/web/src/web/rest.rs
//!
//! Contains the storefront's JSON API handlers and the master definition for its
//! OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use lessonflow_core::catalog::PromoOutcome;
use lessonflow_core::generation::{GenerationRequest, GenerationResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_handler,
        crate::web::cart::apply_promo_handler,
    ),
    components(
        schemas(GenerateRequest, GenerateResponse, PromoRequest, PromoResponse, ErrorResponse)
    ),
    tags(
        (
            name = "LessonFlow API",
            description = "Study assistant and cart endpoints of the LessonFlow storefront."
        )
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Response Structs
//=========================================================================================

/// A question for the study assistant.
#[derive(Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Subject whose persona answers; defaults to `math`.
    pub subject: Option<String>,
    pub prompt: Option<String>,
    /// Defaults to the configured default model.
    pub model: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct GenerateResponse {
    pub response: String,
}

#[derive(Deserialize, ToSchema)]
pub struct PromoRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Serialize, ToSchema)]
pub struct PromoResponse {
    pub success: bool,
    pub discounted_total: f64,
    pub message: String,
}

impl From<PromoOutcome> for PromoResponse {
    fn from(outcome: PromoOutcome) -> Self {
        Self {
            success: outcome.success,
            discounted_total: outcome.discounted_total,
            message: outcome.message,
        }
    }
}

/// The body of every JSON error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Ask the study assistant a question.
///
/// The model name selects the backend: DeepSeek and GPT models go to the chat API,
/// Qwen and Llama 3 models go to the generate endpoint.
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "The assistant's answer", body = GenerateResponse),
        (
            status = 400,
            description = "Body is not JSON or the prompt is empty",
            body = ErrorResponse
        ),
        (status = 503, description = "The generation backend failed", body = ErrorResponse)
    )
)]
pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            warn!("Rejected generate request: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, "Expected a JSON request body");
        }
    };

    let request = match GenerationRequest::new(
        req.subject.as_deref(),
        req.prompt.as_deref(),
        Some(req.model.as_deref().unwrap_or(&state.default_model)),
    ) {
        Ok(request) => request,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "The question must not be empty"),
    };

    match state.generator.generate(&request).await {
        GenerationResult::Success(response) => {
            info!(model = %request.model, subject = %request.subject, "Assistant answered");
            Json(GenerateResponse { response }).into_response()
        }
        failure => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            failure.reason().unwrap_or_default(),
        ),
    }
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}
