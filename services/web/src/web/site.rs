//! services/web/src/web/site.rs
//!
//! Landing page, the assistant UI and the informational pages.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use lessonflow_core::domain::Session;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::web::middleware::persist_session;
use crate::web::state::AppState;

#[derive(Deserialize)]
pub struct LandingQuery {
    add: Option<String>,
}

/// GET / - with `?add=<course_id>` this is a login-gated shortcut for adding to the cart.
pub async fn landing_page(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
    Query(query): Query<LandingQuery>,
) -> Result<Response, StatusCode> {
    let Some(course_id) = query.add else {
        let page = state.pages.landing(&state.catalog, session.is_logged_in())?;
        return Ok(page.into_response());
    };

    if !session.is_logged_in() {
        return Ok(Redirect::to("/register").into_response());
    }
    let added = session.cart.add(&course_id, &state.catalog);
    debug!(session_id = %session.id, %course_id, added, "Add to cart from landing page");
    persist_session(&state, session).await?;
    Ok(Redirect::to("/cart").into_response())
}

/// GET /generate
pub async fn assistant_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.pages.assistant(&state.default_model)
}

pub async fn rules_page(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> impl IntoResponse {
    state.pages.rules(session.is_logged_in())
}

pub async fn faq_page(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> impl IntoResponse {
    state.pages.faq(session.is_logged_in())
}

pub async fn pricing_page(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> impl IntoResponse {
    state.pages.pricing(&state.catalog, session.is_logged_in())
}

pub async fn about_page(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> impl IntoResponse {
    state.pages.about(session.is_logged_in())
}
