//! API route configuration.

use crate::api::handlers::{
    delete_link_handler, health_handler, link_analytics_handler, list_links_handler,
    owner_analytics_handler, redirect_handler, resolve_handler, shorten_handler,
    update_link_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, patch},
};

/// Owner routes, identified by the `X-User-Id` header.
///
/// # Endpoints
///
/// - `GET    /urls`                 - List the owner's links
/// - `POST   /urls`                 - Create a short link
/// - `PATCH  /urls/{id}`            - Update destination and/or code
/// - `DELETE /urls/{id}`            - Delete a link
/// - `GET    /urls/{id}/analytics`  - Click counters of one link
/// - `GET    /analytics`            - Owner's aggregated counters
pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_links_handler).post(shorten_handler))
        .route(
            "/urls/{id}",
            patch(update_link_handler).delete(delete_link_handler),
        )
        .route("/urls/{id}/analytics", get(link_analytics_handler))
        .route("/analytics", get(owner_analytics_handler))
        .route_layer(middleware::from_fn(auth::layer))
}

/// Public API routes.
///
/// - `GET /resolve/{code}` - Destination of a code as JSON
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/resolve/{code}", get(resolve_handler))
}

/// Routes served at the root: the redirect and the health check.
pub fn root_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
}
