//! Invalid-value masking and backward interpolation.
//!
//! Sensor error codes are first replaced with NaN, then gaps are filled from
//! the nearest later valid sample. Anything that cannot be filled (a trailing
//! run) is dropped.

use super::normalize::{normalize, to_column};
use super::types::{Column, InvalidValues, SignalInput, SignalResult};

/// Replace every invalid literal with NaN, keeping all positions.
pub fn drop_invalid(
    input: impl Into<SignalInput>,
    invalid: impl Into<InvalidValues>,
) -> SignalResult<Column> {
    let mut column = to_column(input, "value")?;
    mask_invalid(&mut column.values, &invalid.into());
    Ok(column)
}

/// Mask invalid values and fill the gaps by backward interpolation.
///
/// Interior gaps are filled linearly between the bracketing valid samples,
/// a leading gap takes the first valid sample, and a trailing gap is removed.
/// The result is therefore never longer than the input, and is empty when
/// every sample is invalid.
pub fn interpolate_invalid(
    input: impl Into<SignalInput>,
    invalid: impl Into<InvalidValues>,
) -> SignalResult<Vec<f64>> {
    let mut values = normalize(input)?;
    mask_invalid(&mut values, &invalid.into());
    let filled = interpolate_backward(&values);

    if filled.len() < values.len() {
        tracing::trace!(
            input_len = values.len(),
            output_len = filled.len(),
            "Dropped unfillable trailing samples"
        );
    }

    Ok(filled)
}

/// Replace invalid literals with NaN in place.
pub(crate) fn mask_invalid(values: &mut [f64], invalid: &InvalidValues) {
    if invalid.is_empty() {
        return;
    }
    for value in values.iter_mut() {
        if invalid.contains(*value) {
            *value = f64::NAN;
        }
    }
}

/// Fill NaN runs from later valid samples, dropping the unfillable tail.
///
/// Fills that cannot be computed (a gap next to an infinity) are dropped too,
/// so the output never holds NaN.
pub(crate) fn interpolate_backward(values: &[f64]) -> Vec<f64> {
    let valid: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .map(|(i, _)| i)
        .collect();

    let (first, last) = match (valid.first(), valid.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Vec::new(),
    };

    let mut out = Vec::with_capacity(last + 1);
    out.extend(std::iter::repeat(values[first]).take(first));

    // Walk consecutive valid pairs; everything between them is a gap
    for pair in valid.windows(2) {
        let (p, q) = (pair[0], pair[1]);
        let (vp, vq) = (values[p], values[q]);
        out.push(vp);
        let span = (q - p) as f64;
        for i in (p + 1)..q {
            let t = (i - p) as f64 / span;
            out.push(vp + (vq - vp) * t);
        }
    }
    out.push(values[last]);

    // A gap bordering an infinity interpolates to NaN
    out.retain(|v| !v.is_nan());
    out
}
