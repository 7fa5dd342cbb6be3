//! Core types for signal comparison.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisSettings;
use crate::models::CorrelationBackend;
use crate::signal::{Column, InvalidValues};

/// Default size (`len(meas) * len(ref)`) above which `Auto` switches to FFT.
pub const DEFAULT_FFT_THRESHOLD: usize = 1 << 22;

/// Default absolute-error threshold for accuracy.
pub const DEFAULT_ACCURACY_THRESHOLD: f64 = 0.0;

/// Configuration shared by delay estimation, alignment and metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Literal values treated as missing on both signals.
    pub invalid_values: InvalidValues,
    /// How the cross-correlation is computed.
    pub backend: CorrelationBackend,
    /// Size threshold for `CorrelationBackend::Auto`.
    pub fft_threshold: usize,
    /// Absolute-error threshold used by accuracy in reports.
    pub accuracy_threshold: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            invalid_values: InvalidValues::none(),
            backend: CorrelationBackend::Auto,
            fft_threshold: DEFAULT_FFT_THRESHOLD,
            accuracy_threshold: DEFAULT_ACCURACY_THRESHOLD,
        }
    }
}

impl ComparisonConfig {
    /// Default configuration with the given invalid values.
    pub fn with_invalid_values(invalid: impl Into<InvalidValues>) -> Self {
        Self {
            invalid_values: invalid.into(),
            ..Self::default()
        }
    }

    /// Direct-sum configuration with the given invalid values.
    ///
    /// Used by the free functions so the first correlation maximum is exact
    /// regardless of input size.
    pub fn exact(invalid: impl Into<InvalidValues>) -> Self {
        Self {
            backend: CorrelationBackend::Direct,
            ..Self::with_invalid_values(invalid)
        }
    }

    /// Whether the FFT path is used for signals of the given lengths.
    pub fn use_fft(&self, meas_len: usize, ref_len: usize) -> bool {
        match self.backend {
            CorrelationBackend::Direct => false,
            CorrelationBackend::Fft => true,
            CorrelationBackend::Auto => meas_len.saturating_mul(ref_len) > self.fft_threshold,
        }
    }
}

impl From<&AnalysisSettings> for ComparisonConfig {
    fn from(settings: &AnalysisSettings) -> Self {
        Self {
            invalid_values: InvalidValues::new(settings.invalid_values.clone()),
            backend: settings.correlation_backend,
            fft_threshold: settings.fft_threshold,
            accuracy_threshold: settings.accuracy_threshold,
        }
    }
}

/// Result of a delay estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayEstimate {
    /// Integer lag in samples (positive: measured gets padded on alignment).
    pub delay: i64,
    /// Cross-correlation value at the peak.
    pub peak: f64,
    /// Measured length after invalid-value interpolation.
    pub meas_len: usize,
    /// Reference length after invalid-value interpolation.
    pub ref_len: usize,
}

/// Two position-matched signals of equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPair {
    /// Shifted measured signal, named `"meas"`.
    pub meas: Column,
    /// Reference signal, named `"ref"`.
    pub reference: Column,
    /// Delay that was applied to the measured signal.
    pub delay: i64,
}

impl AlignedPair {
    /// Number of aligned positions (missing ones included).
    pub fn len(&self) -> usize {
        self.meas.len()
    }

    /// Check if the pair has no positions.
    pub fn is_empty(&self) -> bool {
        self.meas.is_empty()
    }

    /// `(meas, ref)` samples at positions where both sides are present.
    pub fn complete_pairs(&self) -> Vec<(f64, f64)> {
        self.meas
            .values
            .iter()
            .zip(self.reference.values.iter())
            .filter(|(m, r)| !m.is_nan() && !r.is_nan())
            .map(|(&m, &r)| (m, r))
            .collect()
    }

    /// Split into the aligned measured and aligned reference columns.
    pub fn into_columns(self) -> (Column, Column) {
        (self.meas, self.reference)
    }
}

/// All metrics for one measured/reference comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    /// Delay applied to the measured signal.
    pub delay: i64,
    /// Whether the delay was estimated (false when supplied by the caller).
    pub delay_estimated: bool,
    /// Length of the aligned pair.
    pub aligned_len: usize,
    /// Positions where both sides are present.
    pub overlap: usize,
    /// Pearson correlation coefficient (NaN for constant data).
    pub corrcoef: f64,
    /// Mean of `meas - ref`.
    pub mean_error: f64,
    /// Mean of `|meas - ref|`.
    pub mean_abs_error: f64,
    /// Mean of `(meas - ref)^2`.
    pub mean_sq_error: f64,
    /// Square root of the mean squared error.
    pub root_mean_sq_error: f64,
    /// Absolute-error threshold used for accuracy.
    pub threshold: f64,
    /// Fraction of positions within the threshold.
    pub accuracy: f64,
}

impl ComparisonReport {
    /// Serialize the report as pretty JSON (NaN becomes `null`).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
