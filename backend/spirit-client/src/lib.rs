pub mod cache;
pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod monitor;
pub mod registry;
pub mod retry;
pub mod token_store;

#[cfg(test)]
mod tests;

pub use cache::{CachePolicy, ResponseCache};
pub use classifier::{ErrorClassifier, ErrorDisposition, ErrorHandler, RawFailure};
pub use client::{
    ApiResponse, Recovered, RequestOptions, ServiceHealthReport, SpiritualApiClient,
};
pub use config::DashboardConfig;
pub use error::{ClientError, ConfigError, ErrorContext, ErrorKind, Severity, SpiritualError};
pub use fallback::FallbackCatalog;
pub use monitor::{NetworkEvent, NetworkStatusMonitor, Subscription};
pub use registry::ServiceRegistry;
pub use retry::{FixedJitter, JitterSource, RandomJitter, RetryPolicy, with_retry};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

pub const CLIENT_NAME: &str = "spiritual-dashboard";
pub const CLIENT_VERSION: &str = "1.0.0";
pub const USER_AGENT: &str = const_format::concatcp!(CLIENT_NAME, "/", CLIENT_VERSION);
