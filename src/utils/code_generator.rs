//! Short code generation and validation utilities.
//!
//! Random codes are drawn uniformly from the 62 ASCII alphanumerics using the
//! thread-local generator, which is seeded from the operating system, so
//! codes are not predictable across restarts. They are collision-resistant,
//! not secret.

use crate::error::AppError;
use rand::Rng;
use serde_json::json;

/// Symbols a generated code is drawn from.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default length of generated codes (62^5 ≈ 916 million combinations).
pub const DEFAULT_CODE_LENGTH: usize = 5;

/// Bounds accepted for a configured generated-code length.
pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 16;

/// Bounds for caller-preferred codes.
const CUSTOM_CODE_MIN: usize = 4;
const CUSTOM_CODE_MAX: usize = 32;

/// Codes that would shadow service routes.
pub const RESERVED_CODES: &[&str] = &["api", "health", "admin", "static"];

/// Produces random fixed-length codes. Pure: no I/O, no shared state.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    length: usize,
}

impl CodeGenerator {
    /// Creates a generator for codes of `length` symbols.
    ///
    /// The length is clamped to [`MIN_CODE_LENGTH`]..=[`MAX_CODE_LENGTH`].
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(MIN_CODE_LENGTH, MAX_CODE_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Generates one candidate code.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let code = CodeGenerator::default().generate();
    /// assert_eq!(code.len(), 5);
    /// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    /// ```
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

/// Validates a caller-preferred short code.
///
/// # Rules
///
/// - Length: 4-32 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot start or end with `-` or `_`
/// - Cannot be a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < CUSTOM_CODE_MIN || code.len() > CUSTOM_CODE_MAX {
        return Err(AppError::bad_request(
            "Custom code must be 4-32 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens and underscores",
            json!({ "code": code }),
        ));
    }

    let is_separator = |c: char| c == '-' || c == '_';
    if code.starts_with(is_separator) || code.ends_with(is_separator) {
        return Err(AppError::bad_request(
            "Custom code cannot start or end with a hyphen or underscore",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code.to_ascii_lowercase().as_str()) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
