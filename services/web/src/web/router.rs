//! services/web/src/web/router.rs
//!
//! Assembles the axum routers for both applications.

use axum::{
    http::{header::CONTENT_TYPE, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::web::{
    auth::{login_handler, logout_handler, register_page},
    cart::{add_to_cart, apply_promo_handler, buy, cart_page, checkout_page, clear_cart},
    materials::{generate_materials_handler, materials_page, MaterialsApiDoc},
    middleware::{attach_session, require_login},
    rest::{generate_handler, ApiDoc},
    site::{about_page, assistant_page, faq_page, landing_page, pricing_page, rules_page},
    state::{AppState, MaterialsState},
};

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

/// The storefront: public pages, login-gated cart and assistant pages, and the JSON API.
pub fn storefront_router(state: Arc<AppState>) -> Router {
    // Public routes (no login required)
    let public_routes = Router::new()
        .route("/", get(landing_page))
        .route("/register", get(register_page))
        .route("/login", post(login_handler))
        .route("/logout", get(logout_handler))
        .route("/rules", get(rules_page))
        .route("/faq", get(faq_page))
        .route("/pricing", get(pricing_page))
        .route("/about", get(about_page))
        .route("/api/generate", post(generate_handler))
        .route("/cart/apply-promo", post(apply_promo_handler));

    // Protected routes (login required)
    let protected_routes = Router::new()
        .route("/generate", get(assistant_page))
        .route("/cart", get(cart_page))
        .route("/cart/add/{course_id}", get(add_to_cart))
        .route("/cart/clear", get(clear_cart))
        .route("/cart/checkout", get(checkout_page))
        .route("/cart/buy", post(buy))
        .route_layer(axum_middleware::from_fn(require_login));

    let site_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), attach_session))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state);

    Router::new()
        .merge(site_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// The lesson-material generator: a form page and one JSON endpoint.
pub fn materials_router(state: Arc<MaterialsState>) -> Router {
    let api_router = Router::new()
        .route("/", get(materials_page))
        .route("/api/generate", post(generate_materials_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state);

    Router::new().merge(api_router).merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", MaterialsApiDoc::openapi()),
    )
}
