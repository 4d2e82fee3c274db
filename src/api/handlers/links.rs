//! Handlers for link management endpoints (list, update, delete, analytics).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::analytics::LinkAnalyticsResponse;
use crate::api::dto::shorten::{LinkListResponse, LinkResponse};
use crate::api::dto::update_link::UpdateLinkRequest;
use crate::api::middleware::Owner;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the calling owner's links, newest first.
///
/// # Endpoint
///
/// `GET /api/v1/urls`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(Owner(owner_id)): Extension<Owner>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_links(owner_id).await?;

    let items: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| {
            let short_url = state.short_url(&link.code);
            LinkResponse::new(link, short_url)
        })
        .collect();

    Ok(Json(LinkListResponse {
        total: items.len(),
        items,
    }))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /api/v1/urls/{id}`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.org", "short_code": "new-code" }
/// ```
///
/// Both fields are optional. Changing the code frees the old one.
///
/// # Errors
///
/// - 400 if a field is invalid
/// - 404 if the link does not exist or belongs to someone else
/// - 409 if the new code is taken
pub async fn update_link_handler(
    State(state): State<AppState>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .update_link(
            owner_id,
            id,
            payload.url.as_deref(),
            payload.short_code.as_deref(),
        )
        .await?;

    let short_url = state.short_url(&link.code);
    Ok(Json(LinkResponse::new(link, short_url)))
}

/// Deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/v1/urls/{id}`
///
/// Returns `204 No Content`. The owner's URL count drops by one; clicks the
/// link received stay in the owner's totals.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the click counters of one link.
///
/// # Endpoint
///
/// `GET /api/v1/urls/{id}/analytics`
pub async fn link_analytics_handler(
    State(state): State<AppState>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<Json<LinkAnalyticsResponse>, AppError> {
    let link = state.link_service.get_owned_link(owner_id, id).await?;
    Ok(Json(link.into()))
}
