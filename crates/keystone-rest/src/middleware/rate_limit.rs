//! Per-client rate limiting.

use crate::responses::AppError;
use axum::{
    body::Body,
    extract::{ConnectInfo, OriginalUri, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use keystone_core::{KeystoneError, KeystoneResult};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::warn;

/// Key used when the connection's peer address is unknown.
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Keyed rate limiter counting requests per client IP.
#[derive(Clone)]
pub struct ClientRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl ClientRateLimiter {
    /// Creates a limiter allowing `requests` per minute for each client.
    ///
    /// A zero quota is raised to one request per minute.
    pub fn per_minute(requests: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
        }
    }

    /// Records one request from `client`.
    pub fn check(&self, client: IpAddr) -> KeystoneResult<()> {
        self.limiter
            .check_key(&client)
            .map_err(|_| KeystoneError::RateLimitExceeded)
    }
}

impl std::fmt::Debug for ClientRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRateLimiter").finish_non_exhaustive()
    }
}

/// Rejects requests over the client's quota with 429.
pub async fn rate_limit_middleware(
    State(limiter): State<ClientRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(UNKNOWN_CLIENT, |info| info.0.ip());

    if let Err(error) = limiter.check(client) {
        let path = request
            .extensions()
            .get::<OriginalUri>()
            .map_or_else(|| request.uri().path(), |uri| uri.0.path())
            .to_string();
        warn!("Rate limit exceeded for client {}", client);
        return AppError::from(error).with_path(path).into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_is_per_client() {
        let limiter = ClientRateLimiter::per_minute(2);
        let alice: IpAddr = "10.0.0.1".parse().unwrap();
        let bob: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.check(alice).is_ok());
        assert!(limiter.check(alice).is_ok());
        assert!(matches!(limiter.check(alice), Err(KeystoneError::RateLimitExceeded)));

        assert!(limiter.check(bob).is_ok());
    }

    #[test]
    fn test_clones_share_counters() {
        let limiter = ClientRateLimiter::per_minute(1);
        let shared = limiter.clone();

        assert!(limiter.check(UNKNOWN_CLIENT).is_ok());
        assert!(shared.check(UNKNOWN_CLIENT).is_err());
    }

    #[test]
    fn test_zero_quota_allows_one() {
        let limiter = ClientRateLimiter::per_minute(0);
        assert!(limiter.check(UNKNOWN_CLIENT).is_ok());
        assert!(limiter.check(UNKNOWN_CLIENT).is_err());
    }
}
