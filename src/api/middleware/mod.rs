//! HTTP middleware for request processing and protection.
//!
//! Provides owner identification, rate limiting, and observability middleware.

pub mod auth;
pub mod rate_limit;
pub mod tracing;

pub use auth::Owner;
