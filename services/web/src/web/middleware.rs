//! services/web/src/web/middleware.rs
//!
//! Session middleware and the login gate for protected routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use lessonflow_core::domain::Session;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::web::state::AppState;

pub const SESSION_COOKIE: &str = "lessonflow_session";

/// Reads the session id from the `Cookie` header, if present and well-formed.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_header
        .split(';')
        .find_map(|c| c.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .and_then(|id| Uuid::parse_str(id).ok())
}

/// Middleware that loads the caller's session, or starts an unsaved one.
///
/// The `Session` value is inserted into the request extensions for handlers and the
/// login gate to use. A new session is only stored when a handler persists it, and
/// only then does the response carry its cookie.
pub async fn attach_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let existing = match session_id_from_headers(req.headers()) {
        Some(id) => state.sessions.get_session(id).await.ok(),
        None => None,
    };

    let (session, is_new) = match existing {
        Some(session) => (session, false),
        None => (Session::new(Uuid::new_v4()), true),
    };
    let session_id = session.id;

    req.extensions_mut().insert(session);
    let mut response = next.run(req).await;

    if is_new && state.sessions.get_session(session_id).await.is_ok() {
        debug!(%session_id, "Started new session");
        let cookie = format!("{}={}; HttpOnly; SameSite=Lax; Path=/", SESSION_COOKIE, session_id);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

/// Writes a handler's changes to the session back to the store.
pub async fn persist_session(state: &AppState, session: Session) -> Result<(), StatusCode> {
    let session_id = session.id;
    state.sessions.save_session(session).await.map_err(|e| {
        error!(%session_id, "Failed to save session: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Middleware for protected routes: anonymous visitors are sent to the registration page.
pub async fn require_login(
    Extension(session): Extension<Session>,
    req: Request,
    next: Next,
) -> Response {
    if !session.is_logged_in() {
        debug!(
            session_id = %session.id,
            path = %req.uri().path(),
            "Login required; redirecting"
        );
        return Redirect::to("/register").into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_cookie_among_others() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}; lang=en", SESSION_COOKIE, id))
                .unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn ignores_missing_or_garbled_cookies() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id_from_headers(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("lessonflow_session=not-a-uuid"),
        );
        assert_eq!(session_id_from_headers(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("lessonflow_session_old=abc"));
        assert_eq!(session_id_from_headers(&headers), None);
    }
}
