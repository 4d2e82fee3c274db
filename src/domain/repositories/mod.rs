//! Repository trait definitions for the domain layer.
//!
//! Together these traits form the store interface the core depends on.
//! Implementations are constructed once at startup and injected into the
//! services and the reset scheduler; nothing reaches for a global handle.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short links, code existence, click counters, daily reset
//! - [`AnalyticsRepository`] - Per-owner analytics upserts
//!
//! # Testing
//!
//! Mock implementations are generated via `mockall` for unit tests.
//! See `tests/repository_pg.rs` for PostgreSQL integration tests.

pub mod analytics_repository;
pub mod link_repository;

pub use analytics_repository::AnalyticsRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
