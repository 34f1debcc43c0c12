pub mod accounts;
pub mod cache;
pub mod content;
pub mod rate_limit;
pub mod ratings;

pub use cache::CacheService;
pub use rate_limit::RateLimiter;
pub use ratings::RatingSummary;
