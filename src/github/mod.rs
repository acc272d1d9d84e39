pub mod api;
pub mod client;
pub mod rate_limiter;
pub mod paginator;

pub use api::GitHubApi;
pub use client::GitHubClient;
pub use rate_limiter::RateLimiter;
pub use paginator::{PageCursor, PageFetcher, Paginated, PaginationPolicy, Paginator, StopReason};
