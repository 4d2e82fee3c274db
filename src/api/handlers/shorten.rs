//! Handler for link creation endpoint.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{CreateLinkRequest, LinkResponse};
use crate::api::middleware::Owner;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for the calling owner.
///
/// # Endpoint
///
/// `POST /api/v1/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/landing",
///   "short_code": "spring-sale"
/// }
/// ```
///
/// `short_code` is optional; a random 5-character code is generated when it
/// is absent.
///
/// # Response
///
/// `201 Created` with the new link:
///
/// ```json
/// {
///   "id": "6f1c...",
///   "code": "spring-sale",
///   "short_url": "https://nano.example/spring-sale",
///   "original_url": "https://example.com/landing",
///   "total_clicks": 0,
///   "daily_clicks": 0,
///   "last_clicked_at": null,
///   "created_at": "...",
///   "updated_at": "..."
/// }
/// ```
///
/// # Errors
///
/// - 400 if the URL or short code is invalid
/// - 409 if the short code is already taken
/// - 503 if the store is unavailable
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_short_link(owner_id, &payload.url, payload.short_code.as_deref())
        .await?;

    let short_url = state.short_url(&link.code);
    Ok((StatusCode::CREATED, Json(LinkResponse::new(link, short_url))))
}
