//! services/web/src/web/auth.rs
//!
//! Registration page and the stub login/logout handlers.
//!
//! There is no user database: logging in simply marks the session as belonging to
//! the placeholder user.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Extension,
};
use lessonflow_core::domain::Session;
use std::sync::Arc;
use tracing::info;

use crate::web::middleware::persist_session;
use crate::web::state::AppState;

/// GET /register
pub async fn register_page(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> impl IntoResponse {
    state.pages.register(session.is_logged_in())
}

/// POST /login
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
) -> Result<impl IntoResponse, StatusCode> {
    session.log_in();
    info!(session_id = %session.id, "Session logged in");
    persist_session(&state, session).await?;
    Ok(Redirect::to("/"))
}

/// GET /logout - the cart is kept.
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
) -> Result<impl IntoResponse, StatusCode> {
    if session.is_logged_in() {
        session.log_out();
        info!(session_id = %session.id, "Session logged out");
        persist_session(&state, session).await?;
    }
    Ok(Redirect::to("/"))
}
