//! Section-wise (fixed window) aggregation.
//!
//! A signal is trimmed by `offset`, padded with NaN up to a whole number of
//! windows, split into consecutive non-overlapping rows and each row is reduced
//! to one value. The trailing partial window is padded, never dropped.
//!
//! Reducers are trait objects so the statistic can be picked from
//! configuration; every reducer ignores missing samples and maps an
//! all-missing row to NaN.

mod mean;
mod mode;
mod std_dev;

pub use mean::MeanReducer;
pub use mode::ModeReducer;
pub use std_dev::StdDevReducer;

use serde::{Deserialize, Serialize};

use crate::models::SectionStatistic;
use crate::signal::{normalize, SignalError, SignalInput, SignalResult};

/// Window specification for section aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionWindow {
    /// Samples per window (must be > 0).
    pub window: usize,
    /// Samples dropped from the start before windowing.
    pub offset: usize,
}

impl SectionWindow {
    /// Create a window specification.
    pub fn new(window: usize, offset: usize) -> Self {
        Self { window, offset }
    }

    /// Number of windows produced for a signal of `len` samples.
    pub fn section_count(&self, len: usize) -> usize {
        if self.window == 0 {
            return 0;
        }
        len.saturating_sub(self.offset).div_ceil(self.window)
    }
}

/// Trait for per-window reduction strategies.
pub trait SectionReducer: Send + Sync {
    /// Name of this statistic.
    fn name(&self) -> &'static str;

    /// Reduce one window. `row` may contain NaN padding or missing samples.
    fn reduce(&self, row: &[f64]) -> f64;
}

/// Create a reducer for the given statistic.
pub fn get_reducer(statistic: SectionStatistic) -> Box<dyn SectionReducer> {
    match statistic {
        SectionStatistic::Mean => Box::new(MeanReducer),
        SectionStatistic::StdDev => Box::new(StdDevReducer),
        SectionStatistic::Mode => Box::new(ModeReducer),
    }
}

/// Split a signal into NaN-padded rows of `window.window` samples.
///
/// # Errors
/// [`SignalError::InvalidConfiguration`] for a zero window or an offset past
/// the end of the signal. An offset equal to the length yields no rows.
pub fn partition(values: &[f64], window: &SectionWindow) -> SignalResult<Vec<Vec<f64>>> {
    if window.window == 0 {
        return Err(SignalError::InvalidConfiguration(
            "section window must be greater than zero".to_string(),
        ));
    }
    if window.offset > values.len() {
        return Err(SignalError::InvalidConfiguration(format!(
            "section offset {} exceeds signal length {}",
            window.offset,
            values.len()
        )));
    }

    let rows = values[window.offset..]
        .chunks(window.window)
        .map(|chunk| {
            let mut row = chunk.to_vec();
            row.resize(window.window, f64::NAN);
            row
        })
        .collect();

    Ok(rows)
}

/// Reduce each window of a signal with the given statistic.
pub fn calc_section_statistic(
    input: impl Into<SignalInput>,
    window: SectionWindow,
    statistic: SectionStatistic,
) -> SignalResult<Vec<f64>> {
    let values = normalize(input)?;
    let rows = partition(&values, &window)?;
    let reducer = get_reducer(statistic);

    tracing::trace!(
        statistic = reducer.name(),
        sections = rows.len(),
        window = window.window,
        offset = window.offset,
        "Reducing sections"
    );

    Ok(rows.iter().map(|row| reducer.reduce(row)).collect())
}

/// Mean of each window.
pub fn calc_section_average(
    input: impl Into<SignalInput>,
    window: usize,
    offset: usize,
) -> SignalResult<Vec<f64>> {
    calc_section_statistic(input, SectionWindow::new(window, offset), SectionStatistic::Mean)
}

/// Population standard deviation of each window.
pub fn calc_section_std_dev(
    input: impl Into<SignalInput>,
    window: usize,
    offset: usize,
) -> SignalResult<Vec<f64>> {
    calc_section_statistic(
        input,
        SectionWindow::new(window, offset),
        SectionStatistic::StdDev,
    )
}

/// Most frequent value of each window.
pub fn calc_section_mode(
    input: impl Into<SignalInput>,
    window: usize,
    offset: usize,
) -> SignalResult<Vec<f64>> {
    calc_section_statistic(input, SectionWindow::new(window, offset), SectionStatistic::Mode)
}

/// Non-missing samples of a row.
fn present(row: &[f64]) -> impl Iterator<Item = f64> + '_ {
    row.iter().copied().filter(|v| !v.is_nan())
}
