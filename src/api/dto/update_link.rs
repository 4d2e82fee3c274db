//! DTO for the link update endpoint.

use serde::Deserialize;
use validator::Validate;

use super::shorten::{MAX_URL_CHARS, SHORT_CODE_REGEX};

/// Request body for `PATCH /api/v1/urls/{id}`.
///
/// Both fields are optional; only provided fields are changed.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    /// New destination URL.
    #[validate(length(min = 1, max = MAX_URL_CHARS))]
    #[validate(url(message = "Invalid URL format"))]
    pub url: Option<String>,

    /// New short code.
    #[validate(length(min = 4, max = 32))]
    #[validate(regex(path = *SHORT_CODE_REGEX, message = "Invalid short code"))]
    pub short_code: Option<String>,
}
