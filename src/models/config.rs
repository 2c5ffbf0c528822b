//! Configuration data model and validation

use crate::models::{ReqOptions, Target};
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
///
/// Resolved once at startup; probes only ever see the [`Target`] and
/// [`ReqOptions`] derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// `protocol://host/path` to request from every edge
    #[serde(default)]
    pub url: Option<String>,

    /// Domain whose A records are probed, defaults to the URL's host
    #[serde(default)]
    pub resolve_target: Option<String>,

    /// Port override
    #[serde(default)]
    pub port: Option<u16>,

    /// Concurrent tasks in burst mode
    #[serde(default = "default_threads")]
    pub threads: u32,

    /// Host header override
    #[serde(default)]
    pub host_header: Option<String>,

    #[serde(default)]
    pub referer: Option<String>,

    #[serde(default)]
    pub authorization: Option<String>,

    /// Burst mode
    #[serde(default)]
    pub attack_mode: bool,

    /// Live dashboard mode
    #[serde(default)]
    pub dashboard: bool,

    /// Skip certificate verification on the pinned HTTPS dial
    #[serde(default)]
    pub insecure: bool,

    /// Sweeps per burst task, 0 for no limit
    #[serde(default)]
    pub sweeps: u64,

    /// Pause after each dashboard render
    #[serde(default = "default_refresh_ms")]
    pub refresh_interval_ms: u64,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            resolve_target: None,
            port: None,
            threads: default_threads(),
            host_header: None,
            referer: None,
            authorization: None,
            attack_mode: false,
            dashboard: false,
            insecure: false,
            sweeps: 0,
            refresh_interval_ms: default_refresh_ms(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Dashboard pause as a Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Validate the configuration and return the first hard error
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(AppError::config("Thread count must be greater than 0"));
        }

        if self.threads > crate::defaults::MAX_THREADS {
            return Err(AppError::config(format!(
                "Thread count cannot exceed {}",
                crate::defaults::MAX_THREADS
            )));
        }

        if self.port == Some(0) {
            return Err(AppError::config("Port must be between 1 and 65535"));
        }

        if self.refresh_interval_ms == 0 {
            return Err(AppError::config("Refresh interval must be greater than 0"));
        }

        if let Some(target) = &self.resolve_target {
            if target.trim().contains(char::is_whitespace) {
                return Err(AppError::config(format!("Invalid resolve target '{}'", target)));
            }
        }

        // Protocol errors keep their own category so they exit the same way
        // regardless of where they are caught.
        if self.url.is_some() {
            self.to_target()?;
        }

        Ok(())
    }

    /// Build the immutable probe target
    pub fn to_target(&self) -> Result<Target> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| AppError::config("No URL given to request"))?;
        Target::parse(url, self.resolve_target.as_deref(), self.port)
    }

    /// Build the immutable request options
    pub fn req_options(&self) -> ReqOptions {
        ReqOptions::new(
            self.host_header.clone(),
            self.referer.clone(),
            self.authorization.clone(),
            self.attack_mode,
        )
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(target) = std::env::var("EDGESTAT_TARGET") {
            let target = target.trim();
            if !target.is_empty() {
                self.resolve_target = Some(target.to_string());
            }
        }

        if let Ok(port) = std::env::var("EDGESTAT_PORT") {
            let parsed: u16 = port.parse()
                .map_err(|e| AppError::config(format!("Invalid EDGESTAT_PORT value '{}': {}", port, e)))?;
            self.port = Some(parsed);
        }

        if let Ok(threads) = std::env::var("EDGESTAT_THREADS") {
            self.threads = threads.parse()
                .map_err(|e| AppError::config(format!("Invalid EDGESTAT_THREADS value '{}': {}", threads, e)))?;
        }

        if let Ok(insecure) = std::env::var("EDGESTAT_INSECURE") {
            self.insecure = insecure.parse()
                .map_err(|e| AppError::config(format!("Invalid EDGESTAT_INSECURE value '{}': {}", insecure, e)))?;
        }

        if let Ok(refresh) = std::env::var("EDGESTAT_REFRESH_MS") {
            self.refresh_interval_ms = refresh.parse()
                .map_err(|e| AppError::config(format!("Invalid EDGESTAT_REFRESH_MS value '{}': {}", refresh, e)))?;
        }

        if let Ok(enable_color) = std::env::var("EDGESTAT_ENABLE_COLOR") {
            self.enable_color = enable_color.parse()
                .map_err(|e| AppError::config(format!("Invalid EDGESTAT_ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_threads() -> u32 {
    crate::defaults::DEFAULT_THREADS
}

fn default_refresh_ms() -> u64 {
    crate::defaults::DEFAULT_REFRESH_INTERVAL.as_millis() as u64
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Protocol;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.refresh_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_threads_invalid() {
        let config = Config { threads: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_too_many_threads_invalid() {
        let config = Config { threads: 5000, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_port_invalid() {
        let config = Config { port: Some(0), ..Config::default() };
        assert_eq!(config.validate().unwrap_err().category(), "CONFIG");
    }

    #[test]
    fn test_unsupported_protocol_is_protocol_error() {
        let config = Config {
            url: Some("gopher://example.com/".to_string()),
            ..Config::default()
        };
        assert_eq!(config.validate().unwrap_err().category(), "PROTOCOL");
    }

    #[test]
    fn test_to_target_and_options() {
        let config = Config {
            url: Some("https://www.example.com/index.html".to_string()),
            resolve_target: Some("edge.example.net".to_string()),
            host_header: Some("alt.example.com".to_string()),
            referer: Some(String::new()),
            attack_mode: true,
            ..Config::default()
        };

        let target = config.to_target().unwrap();
        assert_eq!(target.protocol, Protocol::Https);
        assert_eq!(target.resolve_target, "edge.example.net");

        let opts = config.req_options();
        assert_eq!(opts.host.as_deref(), Some("alt.example.com"));
        assert_eq!(opts.referer, None);
        assert_eq!(opts.range(), None);
    }

    #[test]
    fn test_missing_url_is_config_error() {
        assert_eq!(Config::default().to_target().unwrap_err().category(), "CONFIG");
    }
}
