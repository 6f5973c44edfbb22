use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use flourish_config::RateLimitConfig;
use flourish_core::ApiError;
use governor::clock::DefaultClock;
use governor::state::keyed::DashMapStateStore;
use governor::{Quota, RateLimiter};

use crate::error::AppError;

type KeyedLimiter = RateLimiter<String, DashMapStateStore<String>, DefaultClock>;

/// Per-client request limiter
pub struct ClientLimiter {
    limiter: KeyedLimiter,
}

impl ClientLimiter {
    /// Allow `requests` per `window`, as a burst that refills evenly
    pub fn new(config: &RateLimitConfig) -> anyhow::Result<Self> {
        let window = config.window_duration()?;
        if window.is_zero() {
            anyhow::bail!("rate limit window must be greater than 0");
        }

        let burst = NonZeroU32::new(config.requests)
            .ok_or_else(|| anyhow::anyhow!("rate limit requests must be greater than 0"))?;
        let period = Duration::from_secs_f64(window.as_secs_f64() / f64::from(config.requests));

        let quota = Quota::with_period(period)
            .ok_or_else(|| anyhow::anyhow!("invalid rate limit period"))?
            .allow_burst(burst);

        Ok(Self {
            limiter: RateLimiter::dashmap(quota),
        })
    }

    /// `Err(retry_after_secs)` when `key` is over its limit
    pub fn check(&self, key: &str) -> Result<(), u64> {
        self.limiter.check_key(&key.to_owned()).map_err(|not_until| {
            let wait = not_until.wait_time_from(governor::clock::Clock::now(&DefaultClock::default()));
            wait.as_secs().max(1)
        })
    }
}

/// Reject clients over their request budget with 429
pub async fn rate_limit_middleware(limiter: Arc<ClientLimiter>, request: Request, next: Next) -> Response {
    if let Some(ip) = client_ip(&request)
        && let Err(retry_after) = limiter.check(&ip)
    {
        tracing::debug!(%ip, retry_after, "rate limit exceeded");

        let mut response = AppError(ApiError::RateLimited).into_response();
        if let Ok(value) = retry_after.to_string().parse() {
            response.headers_mut().insert(http::header::RETRY_AFTER, value);
        }
        return response;
    }

    next.run(request).await
}

fn client_ip(request: &Request) -> Option<String> {
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        return Some(first.trim().to_owned());
    }

    if let Some(real_ip) = request.headers().get("x-real-ip")
        && let Ok(val) = real_ip.to_str()
    {
        return Some(val.trim().to_owned());
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(requests: u32, window: &str) -> ClientLimiter {
        ClientLimiter::new(&RateLimitConfig {
            requests,
            window: window.to_owned(),
        })
        .unwrap()
    }

    #[test]
    fn burst_then_reject() {
        let limiter = limiter(2, "1m");
        assert!(limiter.check("1.2.3.4").is_ok());
        assert!(limiter.check("1.2.3.4").is_ok());

        let retry_after = limiter.check("1.2.3.4").unwrap_err();
        assert!((1..=30).contains(&retry_after));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = limiter(1, "1h");
        assert!(limiter.check("a").is_ok());
        assert!(limiter.check("a").is_err());
        assert!(limiter.check("b").is_ok());
    }

    #[test]
    fn zero_requests_rejected() {
        let result = ClientLimiter::new(&RateLimitConfig {
            requests: 0,
            window: "1m".to_owned(),
        });
        assert!(result.is_err());
    }
}
