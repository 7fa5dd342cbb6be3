//! SigCmp Core - measured vs. reference signal comparison.
//!
//! This crate contains the numeric pipeline used to validate a measured
//! signal (e.g. a sensor under test) against a reference recording:
//!
//! - [`signal`]: input normalization and invalid-value handling
//! - [`sections`]: fixed-window mean / standard deviation / mode
//! - [`comparison`]: delay estimation, alignment and error metrics
//! - [`config`] and [`logging`]: TOML settings and log sinks
//!
//! Every computation is a pure function over copied input, so calls can run
//! concurrently from independent threads.

pub mod comparison;
pub mod config;
pub mod logging;
pub mod models;
pub mod sections;
pub mod signal;

pub use comparison::{
    align, calc_accuracy, calc_corrcoef, calc_corrfunc, calc_delay, calc_mean_abs_error,
    calc_mean_error, calc_mean_sq_error, calc_root_mean_sq_error, compare, AlignedPair,
    ComparisonConfig, ComparisonReport, Comparator,
};
pub use sections::{calc_section_average, calc_section_mode, calc_section_std_dev};
pub use signal::{
    drop_invalid, interpolate_invalid, normalize, Column, InvalidValues, SignalError,
    SignalInput, SignalResult, Table,
};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
