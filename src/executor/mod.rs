//! Concurrent burst execution
//!
//! N tokio tasks start together behind a barrier and sweep the edge list
//! over and over. Each task owns its handles; the only shared mutable state
//! is a pair of atomic counters.

use crate::{
    error::{AppError, Result},
    output::ConsoleRenderer,
    probe::EdgeProber,
    types::Edge,
};
use futures::future::join_all;
use serde::Serialize;
use std::{
    io::Write,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tokio::sync::Barrier;

/// Totals of a finished burst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BurstSummary {
    /// Completed sweeps across every task
    pub requests: u64,
    /// Probes that returned an error
    pub failures: u64,
    pub elapsed: Duration,
}

/// Drives a prober from many tasks at once
pub struct BurstExecutor {
    prober: Arc<dyn EdgeProber>,
    edges: Arc<Vec<Edge>>,
    threads: usize,
    max_sweeps: Option<u64>,
    renderer: ConsoleRenderer,
    echo: bool,
    requests: Arc<AtomicU64>,
    failures: Arc<AtomicU64>,
}

impl BurstExecutor {
    pub fn new(prober: Arc<dyn EdgeProber>, edges: Vec<Edge>) -> Self {
        Self {
            prober,
            edges: Arc::new(edges),
            threads: crate::defaults::DEFAULT_THREADS as usize,
            max_sweeps: None,
            renderer: ConsoleRenderer::new(false),
            echo: true,
            requests: Arc::new(AtomicU64::new(0)),
            failures: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = threads.max(1) as usize;
        self
    }

    /// Sweeps per task; `None` runs until the process is stopped
    pub fn with_max_sweeps(mut self, max_sweeps: Option<u64>) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.renderer = ConsoleRenderer::new(use_color);
        self
    }

    /// Print a status line per probe
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Shared sweep counter
    pub fn request_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.requests)
    }

    /// Run every task to completion
    ///
    /// A failed probe is counted and reported on its own line; the task
    /// carries on with the next edge.
    pub async fn run(&self) -> Result<BurstSummary> {
        if self.edges.is_empty() {
            return Err(AppError::resolution("no edges to probe"));
        }

        let started = Instant::now();
        let barrier = Arc::new(Barrier::new(self.threads));

        let tasks: Vec<_> = (0..self.threads)
            .map(|_| {
                let prober = Arc::clone(&self.prober);
                let edges = Arc::clone(&self.edges);
                let barrier = Arc::clone(&barrier);
                let requests = Arc::clone(&self.requests);
                let failures = Arc::clone(&self.failures);
                let renderer = self.renderer;
                let echo = self.echo;
                let max_sweeps = self.max_sweeps;

                tokio::spawn(async move {
                    barrier.wait().await;

                    let mut sweeps = 0u64;
                    while max_sweeps.map_or(true, |max| sweeps < max) {
                        for &edge in edges.iter() {
                            let result = prober.probe(edge).await;
                            let line = match &result.error {
                                Some(error) => {
                                    failures.fetch_add(1, Ordering::Relaxed);
                                    renderer.burst_failure(edge, &error.to_string())
                                }
                                None => renderer.burst_line(result.status, requests.load(Ordering::Relaxed), edge),
                            };
                            if echo {
                                let mut stdout = std::io::stdout().lock();
                                let _ = stdout.write_all(line.as_bytes());
                                let _ = stdout.flush();
                            }
                        }
                        requests.fetch_add(1, Ordering::Relaxed);
                        sweeps += 1;
                    }
                })
            })
            .collect();

        for outcome in join_all(tasks).await {
            outcome.map_err(|e| AppError::internal(format!("burst task failed: {}", e)))?;
        }

        Ok(BurstSummary {
            requests: self.requests.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            elapsed: started.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProbeResult;
    use async_trait::async_trait;

    /// Fails every probe against 10.0.0.2
    struct SplitProber;

    #[async_trait]
    impl EdgeProber for SplitProber {
        async fn probe(&self, edge: Edge) -> ProbeResult {
            if edge.to_string() == "10.0.0.2" {
                return ProbeResult::failed(AppError::transport("connection reset"));
            }
            ProbeResult {
                edge: Some(edge),
                status: 200,
                ..ProbeResult::default()
            }
        }
    }

    fn edges() -> Vec<Edge> {
        vec!["10.0.0.1".parse().unwrap(), "10.0.0.2".parse().unwrap()]
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_fatal() {
        let summary = BurstExecutor::new(Arc::new(SplitProber), edges())
            .with_threads(3)
            .with_max_sweeps(Some(5))
            .with_echo(false)
            .run()
            .await
            .unwrap();

        assert_eq!(summary.requests, 15);
        assert_eq!(summary.failures, 15);
    }

    #[tokio::test]
    async fn test_zero_sweeps_does_nothing() {
        let executor = BurstExecutor::new(Arc::new(SplitProber), edges())
            .with_threads(2)
            .with_max_sweeps(Some(0))
            .with_echo(false);
        let summary = executor.run().await.unwrap();
        assert_eq!(summary.requests, 0);
        assert_eq!(executor.request_counter().load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_empty_edge_list_is_error() {
        let err = BurstExecutor::new(Arc::new(SplitProber), Vec::new())
            .with_echo(false)
            .run()
            .await
            .unwrap_err();
        assert_eq!(err.category(), "DNS");
    }
}
