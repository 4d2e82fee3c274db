//! Application layer: services orchestrating the domain, and background jobs.
//!
//! Services consume repository traits and give HTTP handlers and the admin
//! CLI a storage-agnostic API.
//!
//! # Services
//!
//! - [`services::LinkService`] - Short link lifecycle
//! - [`services::CodeAllocator`] - Collision-free code allocation
//! - [`services::ClickRecorder`] - Click counting off the request path
//! - [`services::AnalyticsAggregator`] - Per-owner counters
//!
//! # Jobs
//!
//! - [`jobs::DailyResetScheduler`] - Zeroes daily click counters at local midnight

pub mod jobs;
pub mod services;
