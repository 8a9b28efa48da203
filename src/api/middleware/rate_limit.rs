//! Per-client rate limiting using the token bucket algorithm.

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::net::IpAddr;
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

pub type RateLimitLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Keys requests by client IP address.
///
/// With `behind_proxy` set the address is read from `Forwarded`,
/// `X-Forwarded-For` or `X-Real-IP` and falls back to the peer address.
/// Without it only the socket peer address is used, so clients cannot
/// spoof their key through headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIpKeyExtractor {
    behind_proxy: bool,
}

impl ClientIpKeyExtractor {
    pub fn new(behind_proxy: bool) -> Self {
        Self { behind_proxy }
    }
}

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.behind_proxy {
            SmartIpKeyExtractor.extract(req)
        } else {
            PeerIpKeyExtractor.extract(req)
        }
    }
}

fn build(
    behind_proxy: bool,
    per_second: u64,
    burst_size: u32,
) -> Option<GovernorConfig<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>>> {
    GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor::new(behind_proxy))
        .per_second(per_second)
        .burst_size(burst_size)
        .finish()
}

/// Creates the rate limiter applied to every route.
///
/// # Limits
///
/// - **Rate**: 1 token replenished every 2 seconds
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// Returns `None` only for a zero period or burst, which the constants
/// here never produce.
pub fn layer(behind_proxy: bool) -> Option<RateLimitLayer> {
    build(behind_proxy, 2, 100).map(|conf| GovernorLayer::new(Arc::new(conf)))
}

/// Creates a stricter rate limiter for the credential endpoints under
/// `/api/auth`.
///
/// # Limits
///
/// - **Rate**: 1 token replenished every second
/// - **Burst**: 10 requests
///
/// # Example
///
/// ```rust,ignore
/// let auth = Router::new()
///     .route("/login", post(login_handler))
///     .layer(rate_limit::secure_layer(behind_proxy));
/// ```
pub fn secure_layer(behind_proxy: bool) -> Option<RateLimitLayer> {
    build(behind_proxy, 1, 10).map(|conf| GovernorLayer::new(Arc::new(conf)))
}
