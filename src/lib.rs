//! edgestat
//!
//! Probes every IPv4 edge behind a domain with requests pinned to that edge,
//! breaks the round trip down into DNS, TCP, TLS, server processing and
//! content transfer phases, and shows the results as a console trace, a live
//! terminal dashboard, or a concurrent burst.

pub mod app;
pub mod cli;
pub mod config;
pub mod client;
pub mod dashboard;
pub mod dns;
pub mod error;
pub mod executor;
pub mod history;
pub mod latency;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, LatencyPhases, ProbeResult, ReqOptions, Target};
pub use types::{Edge, Protocol};
pub use latency::CumulativeLatency;
pub use history::{HistoryBox, StatusClass, WindowedSeries};
pub use probe::{EdgeProber, ProbeExecutor};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Version with the commit and build time stamped by build.rs
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_HTTP_PORT: u16 = 80;
    pub const DEFAULT_HTTPS_PORT: u16 = 443;
    pub const DEFAULT_THREADS: u32 = 1;
    pub const MAX_THREADS: u32 = 1024;
    pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(500);
    pub const DIAL_TIMEOUT: Duration = Duration::from_secs(5);
    pub const TLS_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);
    pub const BYTE_RANGE: &str = "bytes=0-1";
    pub const SERIES_CAPACITY: usize = 9;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
