//! services/web/src/web/cart.rs
//!
//! Cart, checkout and promo-code handlers. All mutate the session's cart and write
//! the session back before responding.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use lessonflow_core::catalog::apply_promo;
use lessonflow_core::domain::{FlashLevel, Session};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::web::middleware::persist_session;
use crate::web::rest::{error_response, ErrorResponse, PromoRequest, PromoResponse};
use crate::web::state::AppState;

/// GET /cart - shows pending flash messages once.
pub async fn cart_page(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
) -> Result<impl IntoResponse, StatusCode> {
    let flashes = session.take_flashes();
    let page = {
        let items = session.cart.items(&state.catalog);
        state.pages.cart(&items, session.cart.total(&state.catalog), &flashes)?
    };
    if !flashes.is_empty() {
        persist_session(&state, session).await?;
    }
    Ok(page)
}

/// GET /cart/add/{course_id} - unknown ids and duplicates are ignored.
pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let added = session.cart.add(&course_id, &state.catalog);
    debug!(session_id = %session.id, %course_id, added, "Add to cart");
    persist_session(&state, session).await?;
    Ok(Redirect::to("/cart"))
}

/// GET /cart/clear
pub async fn clear_cart(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
) -> Result<impl IntoResponse, StatusCode> {
    session.cart.clear();
    persist_session(&state, session).await?;
    Ok(Redirect::to("/cart"))
}

/// GET /cart/checkout
pub async fn checkout_page(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
) -> Result<Response, StatusCode> {
    if session.cart.is_empty() {
        session.flash(FlashLevel::Warning, "Cart is empty");
        persist_session(&state, session).await?;
        return Ok(Redirect::to("/cart").into_response());
    }

    let items = session.cart.items(&state.catalog);
    let page = state.pages.checkout(&items, session.cart.total(&state.catalog))?;
    Ok(page.into_response())
}

/// POST /cart/buy - there is no payment step; the purchase just empties the cart.
pub async fn buy(
    State(state): State<Arc<AppState>>,
    Extension(mut session): Extension<Session>,
) -> Result<impl IntoResponse, StatusCode> {
    let total = session.cart.total(&state.catalog);
    info!(
        session_id = %session.id,
        items = session.cart.course_ids().len(),
        total,
        "Purchase completed"
    );
    session.cart.clear();
    persist_session(&state, session).await?;
    state.pages.purchase_success()
}

/// Apply a promo code to the current cart total.
///
/// Codes are matched case-insensitively after trimming. Unknown codes leave the
/// total unchanged and report `success: false`.
#[utoipa::path(
    post,
    path = "/cart/apply-promo",
    request_body = PromoRequest,
    responses(
        (status = 200, description = "Promo code evaluated", body = PromoResponse),
        (status = 400, description = "Body is not JSON", body = ErrorResponse)
    )
)]
pub async fn apply_promo_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    payload: Result<Json<PromoRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            warn!("Rejected promo request: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, "Expected a JSON request body");
        }
    };

    let outcome = apply_promo(&req.code, session.cart.total(&state.catalog));
    debug!(session_id = %session.id, success = outcome.success, "Promo code applied");
    Json(PromoResponse::from(outcome)).into_response()
}
