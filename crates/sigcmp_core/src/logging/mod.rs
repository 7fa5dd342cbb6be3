//! Logging infrastructure for SigCmp.
//!
//! This module provides:
//! - `tracing` subscriber setup for hosts that want the library's events
//! - [`LogSink`], an explicitly injected sink (callback and/or file) used by
//!   [`Comparator`](crate::comparison::Comparator) instead of global state
//! - Compact mode with a tail buffer for error diagnosis
//!
//! # Example
//!
//! ```no_run
//! use sigcmp_core::logging::{LogConfig, LogSink};
//!
//! let sink = LogSink::new("bench_run", LogConfig::default())
//!     .with_callback(Box::new(|line| println!("{}", line)));
//!
//! sink.phase("Delay estimation");
//! sink.info("delay = 12 samples");
//! sink.success("Comparison finished");
//! ```

mod sink;
mod types;

pub use sink::{LogSink, LogSinkBuilder};
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr with timestamps
///
/// Intended for the host application, never called by the library. Returns
/// an error instead of panicking when a global subscriber is already set.
pub fn init_tracing(default_level: LogLevel) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_filter(default_level).into()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .try_init()
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

/// Convert LogLevel to a subscriber level filter.
fn level_filter(level: LogLevel) -> LevelFilter {
    LevelFilter::from_level(level.to_tracing_level())
}
