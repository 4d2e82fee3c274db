//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`            - Short link redirect (public)
//! - `GET  /health`            - Health check: store, daily reset (public)
//! - `/api/v1/resolve/{code}`  - JSON resolution (public)
//! - `/api/v1/*`               - Owner API (`X-User-Id` required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api::middleware::{rate_limit, tracing};
use crate::api::routes::{owner_routes, public_routes, root_routes};
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let api_router = Router::new()
        .merge(rate_limit::apply(
            owner_routes(),
            rate_limit::OWNER,
            behind_proxy,
        ))
        .merge(rate_limit::apply(
            public_routes(),
            rate_limit::PUBLIC,
            behind_proxy,
        ));

    let router = Router::new()
        .merge(rate_limit::apply(
            root_routes(),
            rate_limit::PUBLIC,
            behind_proxy,
        ))
        .nest("/api/v1", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
