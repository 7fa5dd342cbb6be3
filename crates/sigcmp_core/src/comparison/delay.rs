//! Integer delay estimation from the cross-correlation peak.
//!
//! The delay is `(len(ref) - 1) - argmax(c)`. A positive delay means the
//! measured signal reaches a feature at an earlier index than the reference
//! and is padded on alignment; a negative delay means its leading samples are
//! dropped.

use super::correlation::{cross_correlate, prepare};
use super::types::{ComparisonConfig, DelayEstimate};
use crate::signal::{InvalidValues, SignalError, SignalInput, SignalResult};

/// Estimate the delay between a measured and a reference signal.
///
/// Both signals are interpolated independently, so their lengths may differ;
/// the lag is still measured from the reference's zero-lag index. Always
/// uses the direct correlation sum; see [`estimate_delay`] for other backends.
///
/// # Errors
/// [`SignalError::UndefinedStatistic`] if either signal is empty after
/// interpolation or the correlation is not finite.
pub fn calc_delay(
    meas: impl Into<SignalInput>,
    reference: impl Into<SignalInput>,
    invalid: impl Into<InvalidValues>,
) -> SignalResult<i64> {
    let config = ComparisonConfig::exact(invalid);
    estimate_delay(meas.into(), reference.into(), &config).map(|estimate| estimate.delay)
}

/// Estimate the delay with an explicit configuration.
pub fn estimate_delay(
    meas: SignalInput,
    reference: SignalInput,
    config: &ComparisonConfig,
) -> SignalResult<DelayEstimate> {
    let (meas, reference) = prepare(meas, reference, config)?;
    let correlation = cross_correlate(&meas, &reference, config);
    let (peak_idx, peak) = find_peak(&correlation)?;

    let delay = (reference.len() as i64 - 1) - peak_idx as i64;

    tracing::debug!(
        delay,
        peak,
        meas_len = meas.len(),
        ref_len = reference.len(),
        "Estimated delay"
    );

    Ok(DelayEstimate {
        delay,
        peak,
        meas_len: meas.len(),
        ref_len: reference.len(),
    })
}

/// Index and value of the first maximum.
///
/// Later values must be strictly greater to replace the current peak, so ties
/// resolve to the lowest index.
pub fn find_peak(correlation: &[f64]) -> SignalResult<(usize, f64)> {
    if correlation.iter().any(|v| v.is_nan()) {
        return Err(SignalError::UndefinedStatistic(
            "cross-correlation contains NaN".to_string(),
        ));
    }

    let mut peak: Option<(usize, f64)> = None;
    for (idx, &value) in correlation.iter().enumerate() {
        match peak {
            Some((_, best)) if value <= best => {}
            _ => peak = Some((idx, value)),
        }
    }

    peak.ok_or_else(|| {
        SignalError::UndefinedStatistic("argmax of empty cross-correlation".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CorrelationBackend;

    fn pulse(len: usize, at: usize) -> Vec<f64> {
        let mut values = vec![0.0; len];
        for (i, v) in [1.0, 3.0, 5.0, 3.0, 1.0].iter().enumerate() {
            values[at + i] = *v;
        }
        values
    }

    fn sine(len: usize) -> Vec<f64> {
        (0..len).map(|i| (i as f64 * 0.1).sin() + 0.3 * (i as f64 * 0.037).cos()).collect()
    }

    #[test]
    fn self_delay_is_zero() {
        let x = sine(300);
        assert_eq!(calc_delay(&x, &x, InvalidValues::none()).unwrap(), 0);

        let p = pulse(64, 20);
        assert_eq!(calc_delay(&p, &p, InvalidValues::none()).unwrap(), 0);
    }

    #[test]
    fn earlier_measured_signal_gives_positive_delay() {
        let reference = pulse(100, 40);
        let meas = pulse(100, 33);
        assert_eq!(calc_delay(meas, reference, InvalidValues::none()).unwrap(), 7);
    }

    #[test]
    fn later_measured_signal_gives_negative_delay() {
        let reference = pulse(100, 30);
        let meas = pulse(100, 42);
        assert_eq!(calc_delay(meas, reference, InvalidValues::none()).unwrap(), -12);
    }

    #[test]
    fn different_lengths_are_supported() {
        let reference = pulse(80, 50);
        let meas = pulse(120, 45);
        assert_eq!(calc_delay(meas, reference, InvalidValues::none()).unwrap(), 5);
    }

    #[test]
    fn invalid_values_are_interpolated_first() {
        let reference = pulse(100, 40);
        let mut meas = pulse(100, 35);
        meas[10] = -999.0;
        meas[80] = -999.0;
        assert_eq!(calc_delay(meas, reference, -999.0).unwrap(), 5);
    }

    #[test]
    fn fft_backend_agrees_with_direct() {
        let reference = pulse(500, 200);
        let meas = pulse(500, 260);
        let mut config = ComparisonConfig::default();
        config.backend = CorrelationBackend::Fft;
        let fft = estimate_delay(meas.clone().into(), reference.clone().into(), &config).unwrap();
        config.backend = CorrelationBackend::Direct;
        let direct = estimate_delay(meas.into(), reference.into(), &config).unwrap();
        assert_eq!(fft.delay, -60);
        assert_eq!(direct.delay, -60);
    }

    #[test]
    fn empty_after_interpolation_is_an_error() {
        let err = calc_delay(vec![-1.0, -1.0], vec![1.0, 2.0], -1.0).unwrap_err();
        assert!(matches!(err, SignalError::UndefinedStatistic(_)));
    }

    #[test]
    fn ties_resolve_to_first_maximum() {
        assert_eq!(find_peak(&[1.0, 3.0, 2.0, 3.0]).unwrap(), (1, 3.0));
    }

    #[test]
    fn nan_correlation_is_rejected() {
        assert!(find_peak(&[1.0, f64::NAN]).is_err());
        assert!(find_peak(&[]).is_err());
    }
}
