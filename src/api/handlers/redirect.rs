//! Handlers for short code resolution.

use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};
use tracing::debug;

use crate::api::dto::analytics::ResolveResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its destination.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Click Tracking
///
/// The click is recorded on a spawned task; the redirect does not wait for
/// it and recording failures never affect the response.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let destination = resolve_and_count(&state, code).await?;
    Ok(Redirect::temporary(&destination))
}

/// Resolves a short code to its destination as JSON.
///
/// # Endpoint
///
/// `GET /api/v1/resolve/{code}`
///
/// Counts a click exactly like [`redirect_handler`].
pub async fn resolve_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ResolveResponse>, AppError> {
    let original_url = resolve_and_count(&state, code).await?;
    Ok(Json(ResolveResponse { original_url }))
}

async fn resolve_and_count(state: &AppState, code: String) -> Result<String, AppError> {
    let link = state.link_service.resolve(&code).await?;
    debug!(code = %link.code, "Resolved short code");

    // Detached: the handle is dropped, the task keeps running.
    drop(state.click_recorder.record_click_async(code, link.owner_id));

    Ok(link.destination_url)
}
