//! DTOs for link creation and link listings.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::ShortLink;
use crate::utils::url_validation::MAX_URL_LENGTH;

/// Characters accepted in a caller-chosen short code.
/// [`MAX_URL_LENGTH`] as the `u64` bound the `length` validator takes.
pub(crate) const MAX_URL_CHARS: u64 = MAX_URL_LENGTH as u64;

pub(crate) static SHORT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static regex"));

/// Request to create one short link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Destination URL (absolute HTTP/HTTPS).
    #[validate(length(min = 1, max = MAX_URL_CHARS))]
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Preferred short code; generated when absent.
    #[validate(length(min = 4, max = 32))]
    #[validate(regex(path = *SHORT_CODE_REGEX, message = "Invalid short code"))]
    pub short_code: Option<String>,
}

/// JSON representation of a short link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: Uuid,
    pub code: String,
    pub short_url: String,
    pub original_url: String,
    pub total_clicks: i64,
    pub daily_clicks: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: ShortLink, short_url: String) -> Self {
        Self {
            id: link.id,
            code: link.code,
            short_url,
            original_url: link.destination_url,
            total_clicks: link.total_clicks,
            daily_clicks: link.daily_clicks,
            last_clicked_at: link.last_clicked_at,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// An owner's links, newest first.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkResponse>,
}
