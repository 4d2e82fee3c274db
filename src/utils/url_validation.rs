//! Destination URL validation.

use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Maximum accepted destination length.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur while validating a destination URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,
}

/// Checks that `input` is an absolute HTTP(S) URL with a host.
///
/// Returns the trimmed input unchanged; destinations are stored exactly as
/// submitted so redirects reproduce them byte for byte.
///
/// # Errors
///
/// Rejects malformed URLs and schemes such as `javascript:`, `data:` or `file:`.
pub fn validate_destination(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlValidationError::UnsupportedProtocol);
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed.to_string())
}

impl From<UrlValidationError> for AppError {
    fn from(e: UrlValidationError) -> Self {
        AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert_eq!(
            validate_destination("https://example.com/path?q=1").unwrap(),
            "https://example.com/path?q=1"
        );
        assert!(validate_destination("http://localhost:8080").is_ok());
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            validate_destination("  https://example.com  ").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_rejects_dangerous_schemes() {
        assert!(matches!(
            validate_destination("javascript:alert(1)"),
            Err(UrlValidationError::UnsupportedProtocol)
        ));
        assert!(validate_destination("file:///etc/passwd").is_err());
        assert!(validate_destination("data:text/html,hi").is_err());
    }

    #[test]
    fn test_rejects_relative_and_garbage() {
        assert!(matches!(
            validate_destination("not-a-url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(validate_destination("/relative/path").is_err());
        assert!(validate_destination("").is_err());
    }

    #[test]
    fn test_rejects_overlong_urls() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            validate_destination(&url),
            Err(UrlValidationError::TooLong)
        ));
    }

    #[test]
    fn test_converts_into_validation_error() {
        let err: AppError = validate_destination("ftp://example.com").unwrap_err().into();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
