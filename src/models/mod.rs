//! Data models and structures for edgestat

pub mod config;
pub mod probe;
pub mod target;

// Re-export main model types
pub use config::Config;
pub use probe::{LatencyPhases, ProbeResult, SelectedHeaders};
pub use target::{ReqOptions, Target};
