//! Measured vs. reference comparison.
//!
//! This module estimates the integer delay between a measured and a reference
//! signal, aligns them, and computes similarity and error metrics.
//!
//! # Architecture
//!
//! The pipeline consists of pure functions that [`Comparator`] composes:
//!
//! 1. **Correlation** (`correlation`): interpolate invalid values, mean-centre
//!    and compute the full cross-correlation (direct or FFT).
//!
//! 2. **Delay** (`delay`): lag of the first correlation maximum.
//!
//! 3. **Alignment** (`align`): shift the measured signal by the delay and
//!    match both sides by position, padding with NaN.
//!
//! 4. **Metrics** (`metrics`): Pearson coefficient, ME, MAE, MSE, RMSE and
//!    accuracy over the positions present on both sides.
//!
//! # Usage
//!
//! ```
//! use sigcmp_core::comparison::{calc_delay, compare};
//! use sigcmp_core::signal::InvalidValues;
//!
//! let reference: Vec<f64> = (0..200).map(|i| (i as f64 * 0.13).sin()).collect();
//! let measured = reference.clone();
//!
//! assert_eq!(calc_delay(&measured, &reference, InvalidValues::none()).unwrap(), 0);
//!
//! let report = compare(&measured, &reference, InvalidValues::none(), None, 0.0).unwrap();
//! assert!((report.corrcoef - 1.0).abs() < 1e-9);
//! assert_eq!(report.accuracy, 1.0);
//! ```

mod align;
mod comparator;
pub mod correlation;
mod delay;
mod metrics;
pub mod types;

pub use align::{align, align_with, shift};
pub use comparator::Comparator;
pub use correlation::calc_corrfunc;
pub use delay::{calc_delay, estimate_delay, find_peak};
pub use metrics::{
    calc_accuracy, calc_corrcoef, calc_mean_abs_error, calc_mean_error, calc_mean_sq_error,
    calc_root_mean_sq_error, compare, compare_with, PairMetrics,
};
pub use types::{
    AlignedPair, ComparisonConfig, ComparisonReport, DelayEstimate, DEFAULT_ACCURACY_THRESHOLD,
    DEFAULT_FFT_THRESHOLD,
};
