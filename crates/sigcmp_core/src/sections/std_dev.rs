//! Standard deviation section reducer.
//!
//! Uses the population form (divide by n), so a window with a single
//! present sample reduces to 0.0.

use super::{present, SectionReducer};

/// Standard deviation reducer over the non-missing samples.
pub struct StdDevReducer;

impl SectionReducer for StdDevReducer {
    fn name(&self) -> &'static str {
        "std_dev"
    }

    fn reduce(&self, row: &[f64]) -> f64 {
        let values: Vec<f64> = present(row).collect();
        if values.is_empty() {
            return f64::NAN;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        variance.sqrt()
    }
}
