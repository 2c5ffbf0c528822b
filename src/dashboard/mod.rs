//! Live dashboard
//!
//! A single cooperative loop probes every edge in order, pushes the results
//! into a [`DashboardSurface`] and sleeps between probes. The loop knows
//! nothing about terminals; [`terminal::TerminalSurface`] is the ratatui
//! implementation used by the binary.

pub mod terminal;

pub use terminal::TerminalSurface;

use crate::{
    error::Result,
    history::{HistoryPanels, StatusClass, WindowedSeries},
    latency::millis,
    models::ProbeResult,
    probe::EdgeProber,
    types::Edge,
};
use chrono::Local;
use std::time::Duration;

/// Table cell contents for one edge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeCell {
    pub status: String,
    pub total_ms: String,
    pub server: String,
    pub age: String,
}

impl EdgeCell {
    pub fn from_result(result: &ProbeResult) -> Self {
        Self {
            status: result.status.to_string(),
            total_ms: format!("{}ms", millis(result.phases.total())),
            server: result.headers.server.clone(),
            age: result.headers.age.clone(),
        }
    }
}

/// Where the dashboard draws
pub trait DashboardSurface {
    /// Replace the table cell of the edge at `index`
    fn set_cell(&mut self, index: usize, cell: EdgeCell);

    /// Replace every bar chart series
    fn set_series(&mut self, series: &WindowedSeries);

    /// Bar color for the edge at `index`
    fn set_color(&mut self, index: usize, class: Option<StatusClass>);

    fn set_history(&mut self, panels: &HistoryPanels);

    /// Completed ticks, shown in the table title
    fn set_request_count(&mut self, count: u64);

    fn render_all(&mut self) -> Result<()>;

    /// Non-blocking check for a quit key
    fn poll_quit(&mut self) -> Result<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    Running,
    Terminated,
}

/// Probe-render-sleep loop over a fixed edge list
pub struct DashboardLoop<P, S> {
    prober: P,
    surface: S,
    edges: Vec<Edge>,
    series: WindowedSeries,
    history: HistoryPanels,
    colors: Vec<Option<StatusClass>>,
    request_count: u64,
    refresh: Duration,
    max_ticks: Option<u64>,
    state: DashboardState,
}

impl<P: EdgeProber, S: DashboardSurface> DashboardLoop<P, S> {
    pub fn new(prober: P, surface: S, edges: Vec<Edge>) -> Self {
        Self {
            prober,
            surface,
            series: WindowedSeries::new(edges.clone()),
            colors: vec![None; edges.len()],
            edges,
            history: HistoryPanels::default(),
            request_count: 0,
            refresh: crate::defaults::DEFAULT_REFRESH_INTERVAL,
            max_ticks: None,
            state: DashboardState::Running,
        }
    }

    /// Pause after each probe
    pub fn with_refresh(mut self, refresh: Duration) -> Self {
        self.refresh = refresh;
        self
    }

    /// Stop after this many full ticks
    pub fn with_max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Run until the operator quits, a probe fails, or the tick limit is hit
    pub async fn run(&mut self) -> Result<DashboardState> {
        while self.state == DashboardState::Running {
            if let Some(max) = self.max_ticks {
                if self.request_count >= max {
                    break;
                }
            }
            self.tick().await?;
        }
        Ok(self.state)
    }

    /// One pass over every edge
    ///
    /// The quit key is checked before each probe, so a quit mid-tick leaves
    /// the remaining edges unprobed. A failed probe ends the loop with its
    /// error.
    pub async fn tick(&mut self) -> Result<DashboardState> {
        for index in 0..self.edges.len() {
            if self.surface.poll_quit()? {
                self.state = DashboardState::Terminated;
                return Ok(self.state);
            }

            let edge = self.edges[index];
            let mut result = self.prober.probe(edge).await;
            if let Some(error) = result.error.take() {
                return Err(error);
            }

            self.surface.set_cell(index, EdgeCell::from_result(&result));

            self.series.record(index, result.edge, result.status);
            self.surface.set_series(&self.series);

            self.colors[index] = StatusClass::next(result.status, self.colors[index]);
            self.surface.set_color(index, self.colors[index]);

            self.history.record(result.status, &result.content_hash, Local::now());
            self.surface.set_history(&self.history);

            self.surface.render_all()?;
            tokio::time::sleep(self.refresh).await;
        }

        self.request_count += 1;
        self.surface.set_request_count(self.request_count);
        Ok(self.state)
    }

    pub fn state(&self) -> DashboardState {
        self.state
    }

    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    pub fn history(&self) -> &HistoryPanels {
        &self.history
    }

    pub fn series(&self) -> &WindowedSeries {
        &self.series
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}
