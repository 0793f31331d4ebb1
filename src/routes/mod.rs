//! HTTP route handlers.
//!
//! Check results must always be live, so the API and the check page are
//! served with `no-store`. Static assets get a long cache.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod api;
pub mod check;
pub mod health;

use axum::{
    middleware,
    response::Redirect,
    routing::get,
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_NO_STORE, CACHE_CONTROL_STATIC};
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Path of the JSON check endpoint
pub const API_CHECK_PATH: &str = "/api/supabase-check";

/// Path of the check page
pub const CHECK_PAGE_PATH: &str = "/supabase-check";

/// Creates the Axum router with all routes and cache headers.
pub fn create_router(state: AppState) -> Router {
    // Checks - never cached, results must reflect the upstream right now
    let check_routes = Router::new()
        .route(API_CHECK_PATH, get(api::check_defaults).post(api::check))
        .route(CHECK_PAGE_PATH, get(check::page).post(check::submit))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    let static_routes = Router::new()
        .nest_service("/static", ServeDir::new(&state.config.ui.static_dir))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_STATIC),
        ));

    // Health check - liveness only, never touches the upstream
    let health_routes = Router::new().route("/health", get(health::health));

    Router::new()
        .route("/", get(|| async { Redirect::to(CHECK_PAGE_PATH) }))
        .merge(check_routes)
        .merge(health_routes)
        .merge(static_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
