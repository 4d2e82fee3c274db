//! Handler for per-owner analytics.

use axum::{Extension, Json, extract::State};
use chrono::Utc;

use crate::api::dto::analytics::OwnerAnalyticsResponse;
use crate::api::middleware::Owner;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the calling owner's aggregated counters.
///
/// # Endpoint
///
/// `GET /api/v1/analytics`
///
/// # Response
///
/// ```json
/// {
///   "user_id": "8d2e...",
///   "total_urls": 3,
///   "total_clicks": 120,
///   "avg_daily_clicks": 12.0,
///   "created_at": "...",
///   "updated_at": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns 404 if the owner never created a link.
pub async fn owner_analytics_handler(
    State(state): State<AppState>,
    Extension(Owner(owner_id)): Extension<Owner>,
) -> Result<Json<OwnerAnalyticsResponse>, AppError> {
    let record = state.analytics.get(owner_id).await?;
    Ok(Json(OwnerAnalyticsResponse::new(record, Utc::now())))
}
