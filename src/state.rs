use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::{CacheService, RateLimiter};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub cache: CacheService,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let cache = CacheService::new(Duration::from_secs(config.cache_ttl_secs));
        let rate_limiter = RateLimiter::new(
            config.rate_limit_max_requests,
            Duration::from_secs(config.rate_limit_window_secs),
        );
        Self {
            db,
            config: Arc::new(config),
            cache,
            rate_limiter,
        }
    }
}
