//! Mean section reducer.

use super::{present, SectionReducer};

/// Mean reducer: arithmetic mean of the non-missing samples.
pub struct MeanReducer;

impl SectionReducer for MeanReducer {
    fn name(&self) -> &'static str {
        "mean"
    }

    fn reduce(&self, row: &[f64]) -> f64 {
        let (sum, count) = present(row).fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
        if count == 0 {
            return f64::NAN;
        }
        sum / count as f64
    }
}
