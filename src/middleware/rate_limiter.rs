use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use axum::{
    middleware::Next,
    response::{IntoResponse, Response},
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
};
use crate::config::{AppState, Config};
use crate::utils::api_response::ResponseBuilder;

struct Windows {
    hits: HashMap<IpAddr, Vec<Instant>>,
    last_sweep: Instant,
}

/// In-memory sliding window limiter keyed by client address.
pub struct RateLimiter {
    windows: RwLock<Windows>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            windows: RwLock::new(Windows {
                hits: HashMap::new(),
                last_sweep: Instant::now(),
            }),
            max_requests,
            window,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.rate_limit_max, Duration::from_secs(cfg.rate_limit_window_secs))
    }

    /// Records the request and reports whether it is within the window's budget.
    pub async fn check_rate_limit(&self, client: IpAddr) -> bool {
        let mut windows = self.windows.write().await;
        let now = Instant::now();
        let cutoff = now.checked_sub(self.window).unwrap_or(now);

        // Once per window, forget clients that went quiet
        if now.duration_since(windows.last_sweep) >= self.window {
            windows.hits.retain(|_, hits| {
                hits.retain(|&timestamp| timestamp > cutoff);
                !hits.is_empty()
            });
            windows.last_sweep = now;
        }

        let entry = windows.hits.entry(client).or_default();
        entry.retain(|&timestamp| timestamp > cutoff);

        if entry.len() >= self.max_requests {
            return false;
        }

        entry.push(now);
        true
    }

    pub async fn tracked_clients(&self) -> usize {
        self.windows.read().await.hits.len()
    }
}

/// Peer address of the connection. `X-Forwarded-For` is only honoured when the
/// server is configured to sit behind a trusted proxy.
pub fn client_ip(request: &Request, trust_proxy_headers: bool) -> Option<IpAddr> {
    if trust_proxy_headers {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok());
        if forwarded.is_some() {
            return forwarded;
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client = match client_ip(&request, state.config.trust_proxy_headers) {
        Some(ip) => ip,
        None => {
            tracing::error!("No client address on request; serve with connect info");
            return ResponseBuilder::error::<()>(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred",
            ).into_response();
        }
    };

    if !state.rate_limiter.check_rate_limit(client).await {
        tracing::warn!("Rate limit exceeded for {}", client);
        return ResponseBuilder::error::<()>(
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMIT_EXCEEDED",
            "Too many requests. Please try again later.",
        ).into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([10, 0, 0, last])
    }

    #[tokio::test]
    async fn blocks_after_budget_is_spent() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.check_rate_limit(ip(1)).await);
        assert!(limiter.check_rate_limit(ip(1)).await);
        assert!(!limiter.check_rate_limit(ip(1)).await);
    }

    #[tokio::test]
    async fn clients_are_counted_separately() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check_rate_limit(ip(1)).await);
        assert!(limiter.check_rate_limit(ip(2)).await);
        assert!(!limiter.check_rate_limit(ip(1)).await);
    }

    #[tokio::test]
    async fn window_expiry_frees_budget() {
        let limiter = RateLimiter::new(1, Duration::from_millis(20));
        assert!(limiter.check_rate_limit(ip(1)).await);
        assert!(!limiter.check_rate_limit(ip(1)).await);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(limiter.check_rate_limit(ip(1)).await);
    }

    #[tokio::test]
    async fn quiet_clients_are_swept() {
        let limiter = RateLimiter::new(5, Duration::from_millis(20));
        for n in 1..=3 {
            limiter.check_rate_limit(ip(n)).await;
        }
        assert_eq!(limiter.tracked_clients().await, 3);

        tokio::time::sleep(Duration::from_millis(40)).await;
        limiter.check_rate_limit(ip(9)).await;
        assert_eq!(limiter.tracked_clients().await, 1);
    }

    fn request(forwarded: Option<&str>, peer: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder();
        if let Some(value) = forwarded {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        if let Some(peer) = peer {
            req.extensions_mut().insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        }
        req
    }

    #[test]
    fn forwarded_header_ignored_unless_trusted() {
        let req = request(Some("203.0.113.7, 10.0.0.1"), Some("192.0.2.1:5000"));
        assert_eq!(client_ip(&req, false), Some("192.0.2.1".parse().unwrap()));
        assert_eq!(client_ip(&req, true), Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn garbage_forwarded_header_falls_back_to_peer() {
        let req = request(Some("not-an-ip"), Some("192.0.2.1:5000"));
        assert_eq!(client_ip(&req, true), Some("192.0.2.1".parse().unwrap()));
        assert_eq!(client_ip(&request(None, None), false), None);
    }
}
