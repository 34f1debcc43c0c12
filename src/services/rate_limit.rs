use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::{AppError, Result};
use crate::state::AppState;

struct Window {
    started_at: Instant,
    count: u32,
}

/// Keyed fixed-window request counter. A window admits up to
/// `max_requests`; the first request after the window elapses starts a
/// fresh one. Stale windows are swept lazily on access.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, Window>>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    /// Record a request for `key`. Returns an error carrying the seconds
    /// until the window resets when the limit is exceeded.
    pub fn check(&self, key: &str) -> Result<()> {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap();
        windows.retain(|_, w| now.duration_since(w.started_at) < self.window);

        match windows.get_mut(key) {
            Some(window) => {
                if window.count >= self.max_requests {
                    let elapsed = now.duration_since(window.started_at);
                    let retry_after = self.window.saturating_sub(elapsed);
                    return Err(AppError::RateLimited {
                        retry_after_secs: retry_after.as_secs().max(1),
                    });
                }
                window.count += 1;
                Ok(())
            }
            None => {
                windows.insert(
                    key.to_string(),
                    Window {
                        started_at: now,
                        count: 1,
                    },
                );
                Ok(())
            }
        }
    }
}

/// Axum middleware applying the process-wide limiter to API routes.
/// Clients are keyed by the first `x-forwarded-for` entry, falling back
/// to a shared bucket when the header is absent.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let key = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "local".to_string());

    if let Err(err) = state.rate_limiter.check(&key) {
        tracing::warn!("Rate limit exceeded for client {}", key);
        return Err(err);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_up_to_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(limiter.check("client").is_ok());
        }
    }

    #[test]
    fn test_rejects_over_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            limiter.check("client").unwrap();
        }

        match limiter.check("client") {
            Err(AppError::RateLimited { retry_after_secs }) => {
                assert!(retry_after_secs >= 1);
            }
            other => panic!("expected rate limit rejection, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        limiter.check("a").unwrap();
        assert!(limiter.check("b").is_ok());
        assert!(limiter.check("a").is_err());
    }

    #[test]
    fn test_fresh_window_admits_again() {
        let limiter = RateLimiter::new(1, Duration::from_millis(20));
        limiter.check("client").unwrap();
        assert!(limiter.check("client").is_err());

        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.check("client").is_ok());
    }
}
