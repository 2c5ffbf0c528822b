//! Console output
//!
//! Trace blocks for single-shot requests and the status line printed by
//! burst mode. The dashboard draws through its own terminal surface.

mod console;

pub use console::{abbreviate_header, field_separator, ConsoleRenderer};
