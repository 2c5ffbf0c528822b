//! In-memory history structures behind the dashboard panels
//!
//! [`HistoryBox`] is an ordered set of observed values with a title slot,
//! [`WindowedSeries`] is the per-edge sample buffer behind the bar chart, and
//! [`StatusClass`] maps a status code onto the chart's bar color.

use crate::types::Edge;
use chrono::{DateTime, Local};

/// Ordered, deduplicating list of observed values
///
/// The first slot is reserved for the panel header and is never removed.
/// Values are compared by equality on insert, which is linear in the number
/// of distinct values seen so far rather than in the number of probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryBox {
    header: String,
    values: Vec<String>,
}

impl HistoryBox {
    pub fn new<S: Into<String>>(header: S) -> Self {
        Self {
            header: header.into(),
            values: Vec::new(),
        }
    }

    /// Insert `value` unless it is already present; returns whether it was new
    pub fn add<S: Into<String>>(&mut self, value: S) -> bool {
        let value = value.into();
        if self.contains(&value) {
            return false;
        }
        self.values.push(value);
        true
    }

    /// Copy of the full sequence, header first
    pub fn get(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.values.len() + 1);
        out.push(self.header.clone());
        out.extend(self.values.iter().cloned());
        out
    }

    /// Remove a value; the header slot cannot be removed
    pub fn remove(&mut self, value: &str) -> bool {
        match self.values.iter().position(|v| v == value) {
            Some(pos) => {
                self.values.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Number of values, not counting the header
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// The three history panels of a dashboard session
#[derive(Debug, Clone)]
pub struct HistoryPanels {
    pub status_codes: HistoryBox,
    pub content_hashes: HistoryBox,
    pub first_seen: HistoryBox,
}

impl Default for HistoryPanels {
    fn default() -> Self {
        Self {
            status_codes: HistoryBox::new("StatusCode"),
            content_hashes: HistoryBox::new("ContentHash"),
            first_seen: HistoryBox::new("FirstSeen"),
        }
    }
}

impl HistoryPanels {
    /// Record one successful probe
    ///
    /// The timestamp is kept only when this update added a status code or a
    /// content hash not seen before. Returns whether anything new was seen.
    pub fn record(&mut self, status: u16, content_hash: &str, seen_at: DateTime<Local>) -> bool {
        let new_status = self.status_codes.add(status.to_string());
        let new_hash = self.content_hashes.add(content_hash);

        if new_status || new_hash {
            self.first_seen.add(seen_at.format("%H:%M:%S").to_string());
            true
        } else {
            false
        }
    }
}

/// What a [`WindowedSeries::record`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesUpdate {
    /// Sample appended
    Appended,
    /// The serving edge did not match the iterated edge
    Skipped,
    /// The last edge filled up and every series was cleared
    Reset,
}

/// Per-edge rolling buffer of status-code samples
///
/// Every series holds at most `capacity` samples. When the series of the
/// last edge in iteration order reaches exactly `capacity`, all series are
/// cleared in the same update. A non-last edge that is already full drops
/// its oldest sample before appending.
#[derive(Debug, Clone)]
pub struct WindowedSeries {
    edges: Vec<Edge>,
    samples: Vec<Vec<f64>>,
    capacity: usize,
}

impl WindowedSeries {
    pub fn new(edges: Vec<Edge>) -> Self {
        Self::with_capacity(edges, crate::defaults::SERIES_CAPACITY)
    }

    pub fn with_capacity(edges: Vec<Edge>, capacity: usize) -> Self {
        let samples = vec![Vec::with_capacity(capacity); edges.len()];
        Self {
            edges,
            samples,
            capacity: capacity.max(1),
        }
    }

    /// Record a sample for the edge at `index`
    ///
    /// `served_by` is the edge the probe reports as having answered; the
    /// sample is dropped when it differs from the iterated edge.
    pub fn record(&mut self, index: usize, served_by: Option<Edge>, status: u16) -> SeriesUpdate {
        let Some(&edge) = self.edges.get(index) else {
            return SeriesUpdate::Skipped;
        };
        if served_by != Some(edge) {
            return SeriesUpdate::Skipped;
        }

        let series = &mut self.samples[index];
        if series.len() >= self.capacity {
            series.remove(0);
        }
        series.push(f64::from(status));

        if index + 1 == self.edges.len() && series.len() == self.capacity {
            self.clear();
            return SeriesUpdate::Reset;
        }

        SeriesUpdate::Appended
    }

    /// Samples for the edge at `index`
    pub fn series(&self, index: usize) -> &[f64] {
        self.samples.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        for series in &mut self.samples {
            series.clear();
        }
    }
}

/// Bar color class derived from a status code's leading digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Redirect,
    ClientError,
    ServerError,
}

impl StatusClass {
    /// Class for 2xx through 5xx, `None` for anything else
    pub fn from_status(status: u16) -> Option<Self> {
        match status / 100 {
            2 => Some(Self::Success),
            3 => Some(Self::Redirect),
            4 => Some(Self::ClientError),
            5 => Some(Self::ServerError),
            _ => None,
        }
    }

    /// Next bar color: the status's class, or `previous` when it has none
    pub fn next(status: u16, previous: Option<Self>) -> Option<Self> {
        Self::from_status(status).or(previous)
    }
}
