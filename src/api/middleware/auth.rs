//! Owner identification from the upstream gateway.

use axum::{extract::Request, middleware::Next, response::Response};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated owner of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(pub Uuid);

/// Resolves the request owner from the `X-User-Id` header.
///
/// Authentication itself happens upstream; the gateway in front of this
/// service verifies the caller and forwards their user id. The parsed
/// [`Owner`] is stored in request extensions for handlers.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing or not a UUID.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/urls", get(list_links_handler))
///     .route_layer(middleware::from_fn(auth::layer));
/// ```
pub async fn layer(mut req: Request, next: Next) -> Result<Response, AppError> {
    let owner = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
        .map(Owner)
        .ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "X-User-Id header is missing or invalid" }),
            )
        })?;

    req.extensions_mut().insert(owner);

    Ok(next.run(req).await)
}
