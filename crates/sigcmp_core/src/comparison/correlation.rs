//! Full cross-correlation of two mean-centred signals.
//!
//! The output has `len(meas) + len(ref) - 1` values, with
//! `c[i] = sum_n meas[n + i - (len(ref) - 1)] * ref[n]`, so index
//! `len(ref) - 1` is the zero-lag term.

use rustfft::{num_complex::Complex, FftPlanner};

use super::types::ComparisonConfig;
use crate::signal::{interpolate_invalid, InvalidValues, SignalError, SignalInput, SignalResult};

/// Interpolate, mean-centre and cross-correlate two signals.
///
/// # Errors
/// [`SignalError::UndefinedStatistic`] if either signal is empty after
/// invalid-value interpolation.
pub fn calc_corrfunc(
    meas: impl Into<SignalInput>,
    reference: impl Into<SignalInput>,
    invalid: impl Into<InvalidValues>,
) -> SignalResult<Vec<f64>> {
    let config = ComparisonConfig::exact(invalid);
    let (meas, reference) = prepare(meas.into(), reference.into(), &config)?;
    Ok(cross_correlate(&meas, &reference, &config))
}

/// Interpolate both signals independently and mean-centre them.
pub(crate) fn prepare(
    meas: SignalInput,
    reference: SignalInput,
    config: &ComparisonConfig,
) -> SignalResult<(Vec<f64>, Vec<f64>)> {
    let meas = interpolate_invalid(meas, &config.invalid_values)?;
    let reference = interpolate_invalid(reference, &config.invalid_values)?;

    if meas.is_empty() || reference.is_empty() {
        return Err(SignalError::UndefinedStatistic(format!(
            "cross-correlation of empty signal (meas: {} samples, ref: {} samples)",
            meas.len(),
            reference.len()
        )));
    }

    if meas.len() != reference.len() {
        tracing::debug!(
            meas_len = meas.len(),
            ref_len = reference.len(),
            "Correlating signals of different length"
        );
    }

    Ok((mean_center(&meas), mean_center(&reference)))
}

/// Subtract the mean from every sample.
pub fn mean_center(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| v - mean).collect()
}

/// Full cross-correlation using the configured backend.
pub fn cross_correlate(meas: &[f64], reference: &[f64], config: &ComparisonConfig) -> Vec<f64> {
    if meas.is_empty() || reference.is_empty() {
        return Vec::new();
    }
    if config.use_fft(meas.len(), reference.len()) {
        cross_correlate_fft(meas, reference)
    } else {
        cross_correlate_direct(meas, reference)
    }
}

/// Exact lag-by-lag cross-correlation.
pub fn cross_correlate_direct(meas: &[f64], reference: &[f64]) -> Vec<f64> {
    let (lm, lr) = (meas.len() as isize, reference.len() as isize);
    if lm == 0 || lr == 0 {
        return Vec::new();
    }

    (0..(lm + lr - 1))
        .map(|i| {
            let k = i - (lr - 1);
            let start = (-k).max(0);
            let end = lr.min(lm - k);
            (start..end)
                .map(|n| meas[(n + k) as usize] * reference[n as usize])
                .sum::<f64>()
        })
        .collect()
}

/// FFT-based cross-correlation via the convolution theorem.
///
/// Matches [`cross_correlate_direct`] up to floating point rounding, so exact
/// ties between lags may resolve differently.
pub fn cross_correlate_fft(meas: &[f64], reference: &[f64]) -> Vec<f64> {
    if meas.is_empty() || reference.is_empty() {
        return Vec::new();
    }

    // Large enough to hold every lag without circular wrap-around
    let correlation_len = meas.len() + reference.len() - 1;
    let fft_len = correlation_len.next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_len);
    let ifft = planner.plan_fft_inverse(fft_len);

    let mut meas_complex: Vec<Complex<f64>> =
        meas.iter().map(|&x| Complex::new(x, 0.0)).collect();
    meas_complex.resize(fft_len, Complex::new(0.0, 0.0));

    let mut ref_complex: Vec<Complex<f64>> =
        reference.iter().map(|&x| Complex::new(x, 0.0)).collect();
    ref_complex.resize(fft_len, Complex::new(0.0, 0.0));

    fft.process(&mut meas_complex);
    fft.process(&mut ref_complex);

    let mut product: Vec<Complex<f64>> = meas_complex
        .iter()
        .zip(ref_complex.iter())
        .map(|(a, b)| a * b.conj())
        .collect();

    ifft.process(&mut product);

    // Lag k lives at index k mod fft_len; negative lags wrap to the end
    let scale = 1.0 / fft_len as f64;
    let ref_last = reference.len() as isize - 1;
    (0..correlation_len as isize)
        .map(|i| {
            let k = i - ref_last;
            let idx = k.rem_euclid(fft_len as isize) as usize;
            product[idx].re * scale
        })
        .collect()
}
