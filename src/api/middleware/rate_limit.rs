//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Token bucket parameters.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub per_second: u64,
    pub burst: u32,
}

/// Public endpoints: redirects and resolution.
pub const PUBLIC: Limits = Limits {
    per_second: 2,
    burst: 100,
};

/// Owner endpoints: link management and analytics.
pub const OWNER: Limits = Limits {
    per_second: 1,
    burst: 20,
};

/// Applies a per-client-IP rate limiter to `router`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// - `behind_proxy = false`: the socket peer address (requires
///   `into_make_service_with_connect_info`)
/// - `behind_proxy = true`: `X-Forwarded-For` / `X-Real-IP` / `Forwarded`,
///   falling back to the peer address; enable only behind a trusted proxy
///
/// # Example
///
/// ```rust,ignore
/// let api = rate_limit::apply(api::routes::api_routes(), rate_limit::OWNER, behind_proxy);
/// ```
pub fn apply<S>(router: Router<S>, limits: Limits, behind_proxy: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if behind_proxy {
        let config = GovernorConfigBuilder::default()
            .per_second(limits.per_second)
            .burst_size(limits.burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("non-zero rate limit");
        router.layer(GovernorLayer::new(Arc::new(config)))
    } else {
        let config = GovernorConfigBuilder::default()
            .per_second(limits.per_second)
            .burst_size(limits.burst)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("non-zero rate limit");
        router.layer(GovernorLayer::new(Arc::new(config)))
    }
}
