//! Unique short code allocation.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, validate_custom_code};

/// Upper bound on generated candidates per allocation.
///
/// At the default length the code space holds ~916 million codes, so hitting
/// this cap means the store is close to saturation for the configured length.
pub const MAX_CANDIDATES: usize = 64;

/// Finds short codes that are not yet used by any link.
///
/// The allocator only reads: it checks existence and hands the code back to
/// the caller, who performs the insert. The existence check is a fast path;
/// the store's uniqueness constraint still decides when two writers race for
/// the same code, and the loser receives [`AppError::Conflict`] from the
/// insert.
pub struct CodeAllocator<L: LinkRepository + ?Sized> {
    links: Arc<L>,
    generator: CodeGenerator,
}

impl<L: LinkRepository + ?Sized> CodeAllocator<L> {
    pub fn new(links: Arc<L>, generator: CodeGenerator) -> Self {
        Self { links, generator }
    }

    /// Returns a code that was unused at the time of the check.
    ///
    /// - With `preferred`: validates it and returns it unchanged if absent.
    /// - Without: draws random candidates until one is absent.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the preferred code is malformed
    /// - [`AppError::Conflict`] if the preferred code is taken
    /// - Store errors from the existence check abort the attempt immediately;
    ///   they are never retried here
    /// - [`AppError::Internal`] if [`MAX_CANDIDATES`] candidates all collided
    pub async fn allocate(&self, preferred: Option<&str>) -> Result<String, AppError> {
        match preferred {
            Some(code) => self.claim_preferred(code).await,
            None => self.generate_unique().await,
        }
    }

    async fn claim_preferred(&self, code: &str) -> Result<String, AppError> {
        validate_custom_code(code)?;

        if self.links.exists(code).await? {
            return Err(AppError::conflict(
                "Short code already exists",
                json!({ "code": code }),
            ));
        }

        Ok(code.to_string())
    }

    async fn generate_unique(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_CANDIDATES {
            let candidate = self.generator.generate();

            if !self.links.exists(&candidate).await? {
                if attempt > 1 {
                    debug!(attempt, "Allocated short code after collisions");
                }
                return Ok(candidate);
            }
        }

        warn!(
            length = self.generator.length(),
            "Every generated short code collided"
        );
        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions", "attempts": MAX_CANDIDATES }),
        ))
    }
}
