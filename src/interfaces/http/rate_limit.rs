//! Per-client throttle for the login endpoint
//!
//! Fixed one-minute windows keyed by client address. Addresses come from
//! the connection when the server was started with connect info, else from
//! the first `X-Forwarded-For` hop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use tracing::warn;

use crate::interfaces::http::common::ApiResponse;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    requests: u32,
}

#[derive(Clone)]
pub struct LoginRateLimiter {
    windows: Arc<DashMap<String, Window>>,
    max_requests: u32,
    window: Duration,
}

impl LoginRateLimiter {
    pub fn new(per_minute: u32) -> Self {
        Self::with_window(per_minute, Duration::from_secs(60))
    }

    pub fn with_window(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            max_requests: max_requests.max(1),
            window,
        }
    }

    /// Count one attempt for `key`. Returns false when the window is full.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        if self.windows.len() > 10_000 {
            self.windows
                .retain(|_, w| now.duration_since(w.started) < self.window);
        }

        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            requests: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                requests: 0,
            };
        }
        if entry.requests >= self.max_requests {
            return false;
        }
        entry.requests += 1;
        true
    }
}

fn client_key(request: &Request<Body>) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn login_rate_limit_middleware(
    State(limiter): State<LoginRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&request);
    if !limiter.check(&key) {
        warn!(client = %key, "Login rate limit exceeded");
        metrics::counter!("flexcars_login_throttled_total").increment(1);
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ApiResponse::<()>::error(
                "Too many login attempts, try again later",
            )),
        )
            .into_response();
    }
    next.run(request).await
}
