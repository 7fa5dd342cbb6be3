//! Mode (most common value) section reducer.
//!
//! Ties resolve to the smallest tied value.

use super::{present, SectionReducer};

/// Mode reducer: most frequent non-missing sample in the window.
pub struct ModeReducer;

impl SectionReducer for ModeReducer {
    fn name(&self) -> &'static str {
        "mode"
    }

    fn reduce(&self, row: &[f64]) -> f64 {
        let mut values: Vec<f64> = present(row).collect();
        values.sort_by(f64::total_cmp);

        let mut best = f64::NAN;
        let mut best_count = 0usize;
        let mut idx = 0;
        while idx < values.len() {
            let value = values[idx];
            let run = values[idx..].iter().take_while(|&&v| v == value).count();
            // Strictly greater keeps the smallest value among equal counts
            if run > best_count {
                best = value;
                best_count = run;
            }
            idx += run;
        }

        best
    }
}
