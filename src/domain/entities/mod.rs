//! Core domain entities.
//!
//! Entities are plain data structures mirroring the rows of the backing store.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A short code mapped to a destination URL, with click counters
//! - [`AnalyticsRecord`] - Per-owner aggregate of links and clicks
//!
//! Creation and partial updates use separate input types (`NewShortLink`,
//! `ShortLinkPatch`, `AnalyticsDelta`).

pub mod analytics;
pub mod short_link;

pub use analytics::{AnalyticsDelta, AnalyticsRecord};
pub use short_link::{LinkTotals, NewShortLink, ShortLink, ShortLinkPatch};
