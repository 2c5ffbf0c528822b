//! Cumulative latency aggregation
//!
//! Phase durations are summed in protocol order: DNS, TCP, TLS (HTTPS only),
//! server processing, content transfer. Every phase is a non-negative
//! `Duration`, so each running sum is at least the one before it.

use crate::models::LatencyPhases;
use serde::Serialize;
use std::time::Duration;

/// Running sums over [`LatencyPhases`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CumulativeLatency {
    /// DNS
    pub dns: Duration,
    /// DNS + TCP
    pub tcp: Duration,
    /// DNS + TCP + TLS, HTTPS only
    pub tls: Option<Duration>,
    /// Everything up to the response head
    pub server: Duration,
    /// Everything including the body
    pub total: Duration,
}

impl CumulativeLatency {
    pub fn from_phases(phases: &LatencyPhases) -> Self {
        let dns = phases.dns;
        let tcp = dns + phases.tcp_connect;
        let tls = phases.tls_handshake.map(|handshake| tcp + handshake);
        let server = tls.unwrap_or(tcp) + phases.server_processing;
        let total = server + phases.content_transfer;

        Self { dns, tcp, tls, server, total }
    }

    /// The running sums in display order, skipping TLS for plain HTTP
    pub fn steps(&self) -> Vec<Duration> {
        let mut steps = Vec::with_capacity(5);
        steps.push(self.dns);
        steps.push(self.tcp);
        if let Some(tls) = self.tls {
            steps.push(tls);
        }
        steps.push(self.server);
        steps.push(self.total);
        steps
    }
}

/// Whole milliseconds, the unit every trace line uses
pub fn millis(duration: Duration) -> u128 {
    duration.as_millis()
}
