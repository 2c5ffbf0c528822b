//! Probe result and latency phase data models

use crate::error::AppError;
use crate::types::Edge;
use hyper::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Durations of the individual phases of one pinned request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyPhases {
    /// Resolving the dial address
    pub dns: Duration,

    /// Establishing the TCP connection to the edge
    pub tcp_connect: Duration,

    /// TLS handshake, present only for HTTPS
    pub tls_handshake: Option<Duration>,

    /// From the request being written to the response head arriving
    pub server_processing: Duration,

    /// Reading the full response body
    pub content_transfer: Duration,
}

impl LatencyPhases {
    /// Sum of every phase
    pub fn total(&self) -> Duration {
        self.dns
            + self.tcp_connect
            + self.tls_handshake.unwrap_or(Duration::ZERO)
            + self.server_processing
            + self.content_transfer
    }

    pub fn dns_ms(&self) -> f64 {
        self.dns.as_secs_f64() * 1000.0
    }

    pub fn tcp_ms(&self) -> f64 {
        self.tcp_connect.as_secs_f64() * 1000.0
    }

    pub fn tls_ms(&self) -> Option<f64> {
        self.tls_handshake.map(|d| d.as_secs_f64() * 1000.0)
    }

    pub fn server_ms(&self) -> f64 {
        self.server_processing.as_secs_f64() * 1000.0
    }

    pub fn total_ms(&self) -> f64 {
        self.total().as_secs_f64() * 1000.0
    }
}

/// The response headers the dashboard and logs care about
///
/// Missing headers are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedHeaders {
    pub server: String,
    pub date: String,
    pub last_modified: String,
    pub etag: String,
    pub age: String,
    pub expires: String,
    pub cache_control: String,
    pub content_type: String,
    pub content_length: String,
    pub access_control_allow_origin: String,
    pub via: String,
}

impl SelectedHeaders {
    /// Pick the selected headers out of a response header map
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: &str| -> String {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };

        Self {
            server: get("server"),
            date: get("date"),
            last_modified: get("last-modified"),
            etag: get("etag"),
            age: get("age"),
            expires: get("expires"),
            cache_control: get("cache-control"),
            content_type: get("content-type"),
            content_length: get("content-length"),
            access_control_allow_origin: get("access-control-allow-origin"),
            via: get("via"),
        }
    }
}

/// Outcome of one probe against one edge
///
/// When `error` is set every other field holds its zero value, so callers
/// must check [`is_success`](Self::is_success) before reading anything else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeResult {
    /// Edge that served the response
    pub edge: Option<Edge>,

    /// HTTP status code
    pub status: u16,

    /// Canonical reason phrase for the status
    pub reason: String,

    pub headers: SelectedHeaders,

    /// Every response header in arrival order, for the console dump
    pub response_headers: Vec<(String, String)>,

    /// Headers the probe added to the request, in the order they were sent
    pub request_headers: Vec<(String, String)>,

    /// Base64 of the SHA-256 digest of the response body
    pub content_hash: String,

    pub phases: LatencyPhases,

    pub error: Option<AppError>,
}

impl ProbeResult {
    /// Error-carrying result with every other field zeroed
    pub fn failed(error: AppError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// "200 OK" style status line
    pub fn status_line(&self) -> String {
        if self.reason.is_empty() {
            self.status.to_string()
        } else {
            format!("{} {}", self.status, self.reason)
        }
    }

    /// Turn the result into a `Result`, consuming the error if present
    pub fn into_result(self) -> crate::error::Result<Self> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    #[test]
    fn test_phase_total_includes_tls_when_present() {
        let phases = LatencyPhases {
            dns: Duration::from_millis(1),
            tcp_connect: Duration::from_millis(10),
            tls_handshake: Some(Duration::from_millis(20)),
            server_processing: Duration::from_millis(30),
            content_transfer: Duration::from_millis(4),
        };
        assert_eq!(phases.total(), Duration::from_millis(65));
        assert_eq!(phases.tls_ms(), Some(20.0));

        let plain = LatencyPhases { tls_handshake: None, ..phases };
        assert_eq!(plain.total(), Duration::from_millis(45));
        assert_eq!(plain.tls_ms(), None);
    }

    #[test]
    fn test_failed_result_is_zero_valued() {
        let result = ProbeResult::failed(AppError::transport("connection refused"));

        assert!(!result.is_success());
        assert_eq!(result.status, 0);
        assert!(result.edge.is_none());
        assert!(result.content_hash.is_empty());
        assert_eq!(result.phases, LatencyPhases::default());
        assert_eq!(result.headers, SelectedHeaders::default());
        assert!(result.into_result().is_err());
    }

    #[test]
    fn test_selected_headers_from_map() {
        let mut map = HeaderMap::new();
        map.insert("server", HeaderValue::from_static("edge-cache"));
        map.insert("age", HeaderValue::from_static("42"));
        map.insert("access-control-allow-origin", HeaderValue::from_static("*"));

        let selected = SelectedHeaders::from_headers(&map);
        assert_eq!(selected.server, "edge-cache");
        assert_eq!(selected.age, "42");
        assert_eq!(selected.access_control_allow_origin, "*");
        assert!(selected.via.is_empty());
    }

    #[test]
    fn test_status_line() {
        let result = ProbeResult {
            status: 206,
            reason: "Partial Content".to_string(),
            ..ProbeResult::default()
        };
        assert_eq!(result.status_line(), "206 Partial Content");
    }
}
