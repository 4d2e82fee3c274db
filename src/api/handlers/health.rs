//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::application::jobs::SchedulerState;
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Store**: Reads store-wide link totals
/// 2. **Daily reset**: Reports the scheduler state; a stopped scheduler is
///    degraded, an absent one (no scheduler in this process) is fine
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "42 links, 1200 clicks" },
///     "daily_reset": {
///       "status": "ok",
///       "scheduler": { "state": "armed", "next_reset": "2025-03-10T18:30:00Z" }
///     }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store = check_store(&state).await;
    let daily_reset = check_daily_reset(&state);

    let all_healthy = store.is_ok() && daily_reset.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { store, daily_reset },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks store connectivity by reading link totals.
async fn check_store(state: &AppState) -> CheckStatus {
    match state.links.totals().await {
        Ok(totals) => CheckStatus::ok(format!(
            "{} links, {} clicks",
            totals.links, totals.total_clicks
        )),
        Err(e) => CheckStatus::error(format!("Store error: {}", e)),
    }
}

fn check_daily_reset(state: &AppState) -> CheckStatus {
    let Some(reset_state) = &state.reset_state else {
        return CheckStatus::ok("Not scheduled in this process");
    };

    let current = *reset_state.borrow();
    let mut check = match current {
        SchedulerState::Stopped => CheckStatus::error("Scheduler stopped"),
        _ => CheckStatus::ok("Running"),
    };
    check.scheduler = Some(current);
    check
}
