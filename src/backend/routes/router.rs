/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Public routes (`/health`, `/ws`, signup and login)
 * 2. Protected API routes, wrapped in the auth middleware
 * 3. Fallback handler (404)
 *
 * The WebSocket endpoint authenticates its own handshake because browsers
 * cannot set headers on upgrade requests; the token may come in the query.
 */

use axum::{middleware, routing::get, Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::middleware::auth_middleware;
use crate::backend::realtime::ws_handler;
use crate::backend::routes::api_routes::{configure_protected_routes, configure_public_routes};
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Route Details
///
/// ## Public
///
/// - `GET /health` - Liveness probe
/// - `GET /ws` - WebSocket upgrade (token in query or header)
/// - `POST /api/auth/signup`, `POST /api/auth/login`
///
/// ## Protected
///
/// Everything else under `/api`, see `api_routes`.
pub fn create_router(app_state: AppState) -> Router {
    let protected = configure_protected_routes(Router::new()).route_layer(
        middleware::from_fn_with_state(app_state.clone(), auth_middleware),
    );

    let router = Router::new()
        .route("/health", get(health))
        .route("/ws", get(ws_handler));

    configure_public_routes(router)
        .merge(protected)
        .fallback(|| async { BackendError::not_found("Route not found") })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
