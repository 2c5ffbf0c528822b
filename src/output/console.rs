//! Console rendering for single-shot traces and burst status lines

use crate::{
    latency::{millis, CumulativeLatency},
    models::{ProbeResult, Target},
    types::{Edge, Protocol},
};
use colored::*;
use std::{fmt::Write as _, time::Duration};

/// Names longer than this are abbreviated in the header dump
const MAX_HEADER_NAME: usize = 14;

/// Field names shorter than this get an extra tab
const SHORT_FIELD: usize = 8;

/// Shorten a long header name
///
/// Every hyphen-separated word but the last is reduced to its first
/// character: `Access-Control-Allow-Origin` becomes `ACA-Origin`. Names of
/// 14 bytes or fewer are returned unchanged; a long name with no hyphen
/// keeps only the leading `-`.
pub fn abbreviate_header(name: &str) -> String {
    if name.len() <= MAX_HEADER_NAME {
        return name.to_string();
    }

    let words: Vec<&str> = name.split('-').collect();
    let Some((last, front)) = words.split_last() else {
        return name.to_string();
    };

    let initials: String = front.iter().filter_map(|w| w.chars().next()).collect();
    format!("{}-{}", initials, last)
}

/// Tab run that aligns a value after `field`
pub fn field_separator(field: &str) -> &'static str {
    if field.len() < SHORT_FIELD {
        "\t\t"
    } else {
        "\t"
    }
}

/// Renders probe results as plain or colored console text
#[derive(Debug, Clone, Copy)]
pub struct ConsoleRenderer {
    use_color: bool,
}

impl ConsoleRenderer {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.use_color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// `field<tabs>value` with the field dimmed
    pub fn format_field(&self, field: &str, value: &str) -> String {
        format!("{}{}{}", self.paint(field, Color::BrightBlack), field_separator(field), value)
    }

    /// Status line colored by class: red for 5xx, yellow for 4xx, green otherwise
    pub fn status_line(&self, result: &ProbeResult) -> String {
        let line = result.status_line();
        let color = match result.status / 100 {
            5 => Color::BrightRed,
            4 => Color::BrightYellow,
            _ => Color::BrightGreen,
        };
        self.paint(&line, color)
    }

    /// Full trace block for one edge: latency table, request and response headers
    pub fn trace(&self, target: &Target, edge: Edge, result: &ProbeResult) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "\n\t=============={} [{}]==============",
            self.paint(&target.resolve_target, Color::BrightYellow),
            self.paint(&edge.to_string(), Color::BrightYellow)
        );
        let _ = writeln!(out, "\n{}", self.paint("Trace HTTP Latency", Color::BrightWhite));
        out.push_str(&self.latency_block(target.protocol, result));

        let _ = writeln!(out, "{}", self.paint("Request Headers", Color::BrightWhite));
        for (name, value) in &result.request_headers {
            let _ = writeln!(out, "{}", self.format_field(name, value));
        }
        out.push('\n');

        let _ = writeln!(out, "{}", self.paint("Response Headers", Color::BrightWhite));
        let _ = writeln!(out, "{}", self.format_field("Status", &self.status_line(result)));
        for (name, value) in &result.response_headers {
            let _ = writeln!(out, "{}", self.format_field(&abbreviate_header(name), value));
        }
        out.push('\n');

        out
    }

    /// Phase durations with their running totals
    pub fn latency_block(&self, protocol: Protocol, result: &ProbeResult) -> String {
        let phases = &result.phases;
        let cumulative = CumulativeLatency::from_phases(phases);
        let ms = |d: Duration| self.paint(&format!("{}ms", millis(d)), Color::BrightMagenta);

        let mut out = String::new();
        let _ = writeln!(out, "\tDNS Lookup:\t\t{}", ms(phases.dns));
        let _ = writeln!(out, "\tTCP Connection:\t\t{}\t\t\t\t{}", ms(phases.tcp_connect), ms(cumulative.tcp));
        if protocol == Protocol::Https {
            let handshake = phases.tls_handshake.unwrap_or_default();
            let _ = writeln!(
                out,
                "\tTLS Handshake:\t\t{}\t\t\t\t{}",
                ms(handshake),
                ms(cumulative.tls.unwrap_or(cumulative.tcp))
            );
        }
        let _ = writeln!(
            out,
            "\tServer Processing:\t{}\t\t\t\t{}",
            ms(phases.server_processing),
            ms(cumulative.server)
        );
        let _ = writeln!(
            out,
            "\tContent Transfer:\t{}\t\t\t{}",
            ms(phases.content_transfer),
            ms(cumulative.total)
        );
        out.push('\n');
        out
    }

    /// Carriage-return status line for burst mode
    ///
    /// Non-2xx responses name the edge and end the line so they stay visible.
    pub fn burst_line(&self, status: u16, count: u64, edge: Edge) -> String {
        let code = status.to_string();
        let painted = match status / 100 {
            2 => self.paint(&code, Color::BrightGreen),
            4 => self.paint(&code, Color::BrightYellow),
            5 => self.paint(&code, Color::BrightRed),
            _ => self.paint(&code, Color::BrightCyan),
        };

        if status / 100 == 2 {
            format!("\rStatus Code: {}, Request Count: {}", painted, count)
        } else {
            format!(
                "\rStatus Code: {}, Request Count: {}, IP: {}\n",
                painted,
                count,
                self.paint(&edge.to_string(), Color::BrightYellow)
            )
        }
    }

    /// One-line report for a burst probe that failed outright
    pub fn burst_failure(&self, edge: Edge, message: &str) -> String {
        format!("\r{} {} {}\n", self.paint("[err]", Color::Red), edge, message)
    }
}
