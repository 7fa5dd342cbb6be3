//! Similarity and error metrics on an aligned pair.
//!
//! Every metric aligns first (estimating the delay unless one is supplied),
//! then keeps only the positions present on both sides. An empty overlap is
//! an error; a constant series only makes the correlation coefficient NaN.

use super::align::align_with;
use super::types::{AlignedPair, ComparisonConfig, ComparisonReport};
use crate::signal::{InvalidValues, SignalError, SignalInput, SignalResult};

/// Metrics over the complete (missing-free) positions of an aligned pair.
#[derive(Debug, Clone)]
pub struct PairMetrics {
    pairs: Vec<(f64, f64)>,
}

impl PairMetrics {
    /// Build from an aligned pair.
    ///
    /// # Errors
    /// [`SignalError::UndefinedStatistic`] if no position is present on both sides.
    pub fn from_aligned(aligned: &AlignedPair) -> SignalResult<Self> {
        Self::from_pairs(aligned.complete_pairs())
    }

    /// Build from `(meas, ref)` samples, dropping any pair with a NaN.
    pub fn from_pairs(pairs: Vec<(f64, f64)>) -> SignalResult<Self> {
        let pairs: Vec<(f64, f64)> = pairs
            .into_iter()
            .filter(|(m, r)| !m.is_nan() && !r.is_nan())
            .collect();
        if pairs.is_empty() {
            return Err(SignalError::UndefinedStatistic(
                "no overlapping samples between measured and reference".to_string(),
            ));
        }
        Ok(Self { pairs })
    }

    /// Number of positions used.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Always false; construction rejects an empty overlap.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pearson correlation coefficient.
    ///
    /// NaN when either side has zero variance.
    pub fn corrcoef(&self) -> f64 {
        let n = self.pairs.len() as f64;
        let mean_m = self.pairs.iter().map(|(m, _)| m).sum::<f64>() / n;
        let mean_r = self.pairs.iter().map(|(_, r)| r).sum::<f64>() / n;

        let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
        for (m, r) in &self.pairs {
            let dm = m - mean_m;
            let dr = r - mean_r;
            sxy += dm * dr;
            sxx += dm * dm;
            syy += dr * dr;
        }

        if sxx == 0.0 || syy == 0.0 {
            tracing::warn!(samples = self.pairs.len(), "Correlation undefined for constant series");
            return f64::NAN;
        }

        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    }

    /// Mean of `meas - ref`.
    pub fn mean_error(&self) -> f64 {
        self.mean_of(|m, r| m - r)
    }

    /// Mean of `|meas - ref|`.
    pub fn mean_abs_error(&self) -> f64 {
        self.mean_of(|m, r| (m - r).abs())
    }

    /// Mean of `(meas - ref)^2`.
    pub fn mean_sq_error(&self) -> f64 {
        self.mean_of(|m, r| (m - r).powi(2))
    }

    /// Square root of the mean squared error.
    pub fn root_mean_sq_error(&self) -> f64 {
        self.mean_sq_error().sqrt()
    }

    /// Fraction of positions with `|meas - ref| <= threshold`.
    ///
    /// # Errors
    /// [`SignalError::InvalidConfiguration`] for a negative or NaN threshold.
    pub fn accuracy(&self, threshold: f64) -> SignalResult<f64> {
        validate_threshold(threshold)?;
        let within = self
            .pairs
            .iter()
            .filter(|(m, r)| (m - r).abs() <= threshold)
            .count();
        Ok(within as f64 / self.pairs.len() as f64)
    }

    fn mean_of(&self, f: impl Fn(f64, f64) -> f64) -> f64 {
        self.pairs.iter().map(|&(m, r)| f(m, r)).sum::<f64>() / self.pairs.len() as f64
    }
}

fn validate_threshold(threshold: f64) -> SignalResult<()> {
    if threshold.is_nan() || threshold < 0.0 {
        return Err(SignalError::InvalidConfiguration(format!(
            "accuracy threshold must be >= 0, got {}",
            threshold
        )));
    }
    Ok(())
}

/// Align and collect the metric inputs in one step.
pub(crate) fn aligned_metrics(
    meas: SignalInput,
    reference: SignalInput,
    config: &ComparisonConfig,
    delay: Option<i64>,
) -> SignalResult<PairMetrics> {
    let (aligned, _) = align_with(meas, reference, config, delay)?;
    PairMetrics::from_aligned(&aligned)
}

fn metrics_for(
    meas: impl Into<SignalInput>,
    reference: impl Into<SignalInput>,
    invalid: impl Into<InvalidValues>,
    delay: Option<i64>,
) -> SignalResult<PairMetrics> {
    let config = ComparisonConfig::exact(invalid);
    aligned_metrics(meas.into(), reference.into(), &config, delay)
}

/// Pearson correlation coefficient of the aligned pair.
pub fn calc_corrcoef(
    meas: impl Into<SignalInput>,
    reference: impl Into<SignalInput>,
    invalid: impl Into<InvalidValues>,
    delay: Option<i64>,
) -> SignalResult<f64> {
    Ok(metrics_for(meas, reference, invalid, delay)?.corrcoef())
}

/// Mean error (ME) of the aligned pair.
pub fn calc_mean_error(
    meas: impl Into<SignalInput>,
    reference: impl Into<SignalInput>,
    invalid: impl Into<InvalidValues>,
    delay: Option<i64>,
) -> SignalResult<f64> {
    Ok(metrics_for(meas, reference, invalid, delay)?.mean_error())
}

/// Mean absolute error (MAE) of the aligned pair.
pub fn calc_mean_abs_error(
    meas: impl Into<SignalInput>,
    reference: impl Into<SignalInput>,
    invalid: impl Into<InvalidValues>,
    delay: Option<i64>,
) -> SignalResult<f64> {
    Ok(metrics_for(meas, reference, invalid, delay)?.mean_abs_error())
}

/// Mean squared error (MSE) of the aligned pair.
pub fn calc_mean_sq_error(
    meas: impl Into<SignalInput>,
    reference: impl Into<SignalInput>,
    invalid: impl Into<InvalidValues>,
    delay: Option<i64>,
) -> SignalResult<f64> {
    Ok(metrics_for(meas, reference, invalid, delay)?.mean_sq_error())
}

/// Root mean squared error (RMSE) of the aligned pair.
pub fn calc_root_mean_sq_error(
    meas: impl Into<SignalInput>,
    reference: impl Into<SignalInput>,
    invalid: impl Into<InvalidValues>,
    delay: Option<i64>,
) -> SignalResult<f64> {
    Ok(metrics_for(meas, reference, invalid, delay)?.root_mean_sq_error())
}

/// Fraction of aligned positions whose absolute error is within `threshold`.
pub fn calc_accuracy(
    meas: impl Into<SignalInput>,
    reference: impl Into<SignalInput>,
    threshold: f64,
    invalid: impl Into<InvalidValues>,
    delay: Option<i64>,
) -> SignalResult<f64> {
    validate_threshold(threshold)?;
    metrics_for(meas, reference, invalid, delay)?.accuracy(threshold)
}

/// Align once and compute every metric.
pub fn compare(
    meas: impl Into<SignalInput>,
    reference: impl Into<SignalInput>,
    invalid: impl Into<InvalidValues>,
    delay: Option<i64>,
    threshold: f64,
) -> SignalResult<ComparisonReport> {
    let config = ComparisonConfig {
        accuracy_threshold: threshold,
        ..ComparisonConfig::exact(invalid)
    };
    compare_with(meas.into(), reference.into(), &config, delay)
}

/// Build a full report with an explicit configuration.
pub fn compare_with(
    meas: SignalInput,
    reference: SignalInput,
    config: &ComparisonConfig,
    delay: Option<i64>,
) -> SignalResult<ComparisonReport> {
    validate_threshold(config.accuracy_threshold)?;

    let (aligned, estimate) = align_with(meas, reference, config, delay)?;
    let metrics = PairMetrics::from_aligned(&aligned)?;

    Ok(ComparisonReport {
        delay: aligned.delay,
        delay_estimated: estimate.is_some(),
        aligned_len: aligned.len(),
        overlap: metrics.len(),
        corrcoef: metrics.corrcoef(),
        mean_error: metrics.mean_error(),
        mean_abs_error: metrics.mean_abs_error(),
        mean_sq_error: metrics.mean_sq_error(),
        root_mean_sq_error: metrics.root_mean_sq_error(),
        threshold: config.accuracy_threshold,
        accuracy: metrics.accuracy(config.accuracy_threshold)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Table;
    use std::f64::consts::PI;

    fn sinusoid(phase: f64) -> Vec<f64> {
        (0..100)
            .map(|i| (2.0 * PI * (i as f64 * 0.01) + phase).sin())
            .collect()
    }

    fn labeled(values: Vec<f64>, first_label: usize) -> Table {
        let labels: Vec<String> = (0..values.len())
            .map(|i| (i + first_label).to_string())
            .collect();
        Table::from_column(values).with_row_labels(labels)
    }

    #[test]
    fn in_phase_sinusoids_correlate_to_one() {
        let r =
            calc_corrcoef(sinusoid(0.0), sinusoid(0.0), InvalidValues::none(), Some(0)).unwrap();
        assert!((r - 1.0).abs() < 1e-6, "got {}", r);
    }

    #[test]
    fn opposite_phase_sinusoids_correlate_to_minus_one() {
        let r =
            calc_corrcoef(sinusoid(0.0), sinusoid(PI), InvalidValues::none(), Some(0)).unwrap();
        assert!((r + 1.0).abs() < 1e-6, "got {}", r);
    }

    #[test]
    fn tables_with_mismatched_labels_compare_by_position() {
        let meas = labeled(sinusoid(0.0), 0);
        let same = labeled(sinusoid(0.0), 50);
        let opposite = labeled(sinusoid(PI), 50);

        let r = calc_corrcoef(&meas, same, InvalidValues::none(), Some(0)).unwrap();
        assert!((r - 1.0).abs() < 1e-6, "got {}", r);
        let r = calc_corrcoef(&meas, opposite, InvalidValues::none(), Some(0)).unwrap();
        assert!((r + 1.0).abs() < 1e-6, "got {}", r);
    }

    #[test]
    fn transposed_table_compares_like_a_column() {
        let meas = labeled(sinusoid(0.0), 0).transpose();
        let opposite = labeled(sinusoid(PI), 50);
        let r = calc_corrcoef(meas, opposite, InvalidValues::none(), Some(0)).unwrap();
        assert!((r + 1.0).abs() < 1e-6, "got {}", r);
    }

    #[test]
    fn constant_series_gives_nan_not_error() {
        let reference = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let r = calc_corrcoef(vec![2.0; 5], reference, InvalidValues::none(), Some(0)).unwrap();
        assert!(r.is_nan());
    }

    #[test]
    fn error_metrics() {
        let meas = vec![2.0, 4.0, 6.0, 8.0];
        let reference = vec![1.0, 5.0, 6.0, 10.0];
        // differences: 1, -1, 0, -2
        let none = InvalidValues::none;
        assert_eq!(calc_mean_error(&meas, &reference, none(), Some(0)).unwrap(), -0.5);
        assert_eq!(calc_mean_abs_error(&meas, &reference, none(), Some(0)).unwrap(), 1.0);
        assert_eq!(calc_mean_sq_error(&meas, &reference, none(), Some(0)).unwrap(), 1.5);
        let rmse = calc_root_mean_sq_error(&meas, &reference, none(), Some(0)).unwrap();
        assert!((rmse - 1.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn missing_positions_are_excluded() {
        let meas = vec![1.0, f64::NAN, 3.0, -9.0];
        let reference = vec![2.0, 100.0, 3.0, 4.0];
        // Only positions 0 and 2 survive
        assert_eq!(calc_mean_abs_error(meas, reference, -9.0, Some(0)).unwrap(), 0.5);
    }

    #[test]
    fn accuracy_counts_within_threshold() {
        let meas = vec![1.0, 2.0, 3.0, 4.0];
        let reference = vec![1.0, 2.5, 5.0, 4.0];
        let acc = calc_accuracy(&meas, &reference, 0.5, InvalidValues::none(), Some(0)).unwrap();
        assert_eq!(acc, 0.75);
    }

    #[test]
    fn accuracy_is_monotonic_in_threshold() {
        let meas: Vec<f64> = (0..50).map(|i| (i as f64 * 0.3).sin()).collect();
        let reference: Vec<f64> = (0..50)
            .map(|i| (i as f64 * 0.3).sin() + 0.02 * i as f64)
            .collect();
        let mut last = 0.0;
        for t in [0.0, 0.1, 0.25, 0.5, 0.75, 1.0, 2.0] {
            let acc = calc_accuracy(&meas, &reference, t, InvalidValues::none(), Some(0)).unwrap();
            assert!(acc >= last, "threshold {}: {} < {}", t, acc, last);
            assert!((0.0..=1.0).contains(&acc));
            last = acc;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn identical_signals_are_fully_accurate_at_zero() {
        let x = vec![0.5, 1.5, -2.0, 3.25];
        assert_eq!(calc_accuracy(&x, &x, 0.0, InvalidValues::none(), Some(0)).unwrap(), 1.0);
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let err =
            calc_accuracy(vec![1.0], vec![1.0], -0.1, InvalidValues::none(), Some(0)).unwrap_err();
        assert!(matches!(err, SignalError::InvalidConfiguration(_)));
    }

    #[test]
    fn empty_overlap_is_an_error() {
        let err = calc_mean_error(vec![1.0, 2.0], vec![3.0, 4.0], InvalidValues::none(), Some(2))
            .unwrap_err();
        assert!(matches!(err, SignalError::UndefinedStatistic(_)));
    }

    #[test]
    fn metrics_use_estimated_delay() {
        let mut reference = vec![0.0; 80];
        let mut meas = vec![0.0; 80];
        for (i, v) in [1.0, 4.0, 8.0, 4.0, 1.0].iter().enumerate() {
            reference[40 + i] = *v;
            meas[46 + i] = *v;
        }
        let mae = calc_mean_abs_error(&meas, &reference, InvalidValues::none(), None).unwrap();
        assert_eq!(mae, 0.0);
        let report = compare(meas, reference, InvalidValues::none(), None, 0.0).unwrap();
        assert_eq!(report.delay, -6);
        assert!(report.delay_estimated);
        assert_eq!(report.overlap, 74);
        assert_eq!(report.accuracy, 1.0);
    }

    #[test]
    fn report_serializes_nan_as_null() {
        let report = compare(vec![1.0, 1.0], vec![1.0, 1.0], InvalidValues::none(), Some(0), 0.0)
            .unwrap();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"corrcoef\": null"));
        assert!(json.contains("\"accuracy\": 1.0"));
    }
}
