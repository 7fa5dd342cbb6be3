//! Delay-corrected alignment of a measured signal onto a reference.
//!
//! The measured signal is shifted by the delay, then both sides are matched by
//! position and the shorter one is padded with NaN so the pair has equal
//! length. Invalid literals are masked as missing on both sides.

use super::delay::estimate_delay;
use super::types::{AlignedPair, ComparisonConfig, DelayEstimate};
use crate::signal::{
    mask_invalid, to_column, InvalidValues, SignalError, SignalInput, SignalResult,
};

/// Align a measured signal to a reference.
///
/// With `delay == None` the delay is estimated from the cross-correlation;
/// `Some(d)` is applied as-is.
pub fn align(
    meas: impl Into<SignalInput>,
    reference: impl Into<SignalInput>,
    invalid: impl Into<InvalidValues>,
    delay: Option<i64>,
) -> SignalResult<AlignedPair> {
    let config = ComparisonConfig::exact(invalid);
    align_with(meas.into(), reference.into(), &config, delay).map(|(pair, _)| pair)
}

/// Align with an explicit configuration.
///
/// Also returns the delay estimate when one was computed.
pub fn align_with(
    meas: SignalInput,
    reference: SignalInput,
    config: &ComparisonConfig,
    delay: Option<i64>,
) -> SignalResult<(AlignedPair, Option<DelayEstimate>)> {
    let (delay, estimate) = match delay {
        Some(d) => (d, None),
        None => {
            let estimate = estimate_delay(meas.clone(), reference.clone(), config)?;
            (estimate.delay, Some(estimate))
        }
    };

    let mut meas = to_column(meas, "meas")?;
    let mut reference = to_column(reference, "ref")?;
    mask_invalid(&mut meas.values, &config.invalid_values);
    mask_invalid(&mut reference.values, &config.invalid_values);

    meas.values = shift(meas.values, delay)?;

    // Outer match by position
    let len = meas.len().max(reference.len());
    meas.values.resize(len, f64::NAN);
    reference.values.resize(len, f64::NAN);

    tracing::debug!(
        delay,
        aligned_len = len,
        missing_meas = meas.missing_count(),
        missing_ref = reference.missing_count(),
        "Aligned signals"
    );

    Ok((
        AlignedPair {
            meas,
            reference,
            delay,
        },
        estimate,
    ))
}

/// Apply a delay to a sequence.
///
/// Positive: prepend `delay` NaN samples. Negative: drop the first `|delay|`
/// samples.
///
/// # Errors
/// [`SignalError::InvalidConfiguration`] if a negative delay drops more
/// samples than the sequence holds, or a positive delay pads it past what
/// can be allocated.
pub fn shift(values: Vec<f64>, delay: i64) -> SignalResult<Vec<f64>> {
    let magnitude = usize::try_from(delay.unsigned_abs()).map_err(|_| {
        SignalError::InvalidConfiguration(format!("delay {} out of range", delay))
    })?;

    if delay > 0 {
        let too_long = || {
            SignalError::InvalidConfiguration(format!(
                "delay {} pads the measured signal beyond addressable length",
                delay
            ))
        };
        let total = magnitude.checked_add(values.len()).ok_or_else(too_long)?;
        let mut shifted = Vec::new();
        shifted.try_reserve_exact(total).map_err(|_| too_long())?;
        shifted.resize(magnitude, f64::NAN);
        shifted.extend(values);
        Ok(shifted)
    } else if delay < 0 {
        if magnitude > values.len() {
            return Err(SignalError::InvalidConfiguration(format!(
                "delay {} drops more samples than the measured signal has ({})",
                delay,
                values.len()
            )));
        }
        Ok(values[magnitude..].to_vec())
    } else {
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Table;

    #[test]
    fn zero_delay_round_trips() {
        let x = vec![1.0, 4.0, f64::NAN, 2.0, 8.0];
        let pair = align(&x, &x, InvalidValues::none(), Some(0)).unwrap();
        assert_eq!(pair.meas.name, "meas");
        assert_eq!(pair.reference.name, "ref");

        let expected: Vec<(f64, f64)> = vec![(1.0, 1.0), (4.0, 4.0), (2.0, 2.0), (8.0, 8.0)];
        assert_eq!(pair.complete_pairs(), expected);
        assert_eq!(pair.meas.dropna(), vec![1.0, 4.0, 2.0, 8.0]);
        assert_eq!(pair.reference.dropna(), vec![1.0, 4.0, 2.0, 8.0]);
    }

    #[test]
    fn positive_delay_pads_measured() {
        let reference = vec![0.0, 0.0, 1.0, 2.0, 3.0];
        let pair = align(vec![1.0, 2.0, 3.0], reference, InvalidValues::none(), Some(2)).unwrap();
        assert_eq!(pair.len(), 5);
        assert!(pair.meas.values[0].is_nan());
        assert!(pair.meas.values[1].is_nan());
        assert_eq!(&pair.meas.values[2..], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn negative_delay_drops_leading_measured() {
        let pair = align(vec![9.0, 9.0, 1.0, 2.0], vec![1.0, 2.0], InvalidValues::none(), Some(-2))
            .unwrap();
        assert_eq!(pair.meas.values, vec![1.0, 2.0]);
        assert_eq!(pair.reference.values, vec![1.0, 2.0]);
    }

    #[test]
    fn shorter_side_is_padded() {
        let pair = align(vec![1.0, 2.0, 3.0, 4.0], vec![1.0, 2.0], InvalidValues::none(), Some(0))
            .unwrap();
        assert_eq!(pair.meas.len(), pair.reference.len());
        assert_eq!(pair.len(), 4);
        assert_eq!(pair.reference.missing_count(), 2);
    }

    #[test]
    fn invalid_values_are_masked() {
        let pair = align(vec![1.0, -1.0, 3.0], vec![1.0, 2.0, -1.0], -1.0, Some(0)).unwrap();
        assert_eq!(pair.complete_pairs(), vec![(1.0, 1.0)]);
    }

    #[test]
    fn estimated_delay_aligns_features() {
        let mut reference = vec![0.0; 60];
        let mut meas = vec![0.0; 60];
        for (i, v) in [2.0, 6.0, 9.0, 6.0, 2.0].iter().enumerate() {
            reference[30 + i] = *v;
            meas[22 + i] = *v;
        }
        let pair = align(meas, reference, InvalidValues::none(), None).unwrap();
        assert_eq!(pair.delay, 8);
        assert_eq!(pair.meas.values[32], 9.0);
        assert_eq!(pair.reference.values[32], 9.0);
    }

    #[test]
    fn supplied_delay_is_not_reestimated() {
        let config = ComparisonConfig::default();
        let (pair, estimate) =
            align_with(vec![1.0, 2.0].into(), vec![1.0, 2.0].into(), &config, Some(1)).unwrap();
        assert!(estimate.is_none());
        assert_eq!(pair.delay, 1);
    }

    #[test]
    fn labeled_tables_align_by_position() {
        let meas = Table::from_column(vec![1.0, 2.0, 3.0]).with_row_labels(["0", "1", "2"]);
        let reference = Table::from_column(vec![1.0, 2.0, 3.0]).with_row_labels(["50", "51", "52"]);
        let pair = align(meas, reference, InvalidValues::none(), Some(0)).unwrap();
        assert_eq!(pair.complete_pairs().len(), 3);
    }

    #[test]
    fn unallocatable_positive_delay_is_rejected() {
        let err = align(vec![1.0, 2.0], vec![1.0, 2.0], InvalidValues::none(), Some(i64::MAX))
            .unwrap_err();
        assert!(matches!(err, SignalError::InvalidConfiguration(_)));

        let err = shift(vec![1.0], 1 << 60).unwrap_err();
        assert!(matches!(err, SignalError::InvalidConfiguration(_)));
    }

    #[test]
    fn oversized_negative_delay_is_rejected() {
        let err = align(vec![1.0], vec![1.0], InvalidValues::none(), Some(-3)).unwrap_err();
        assert!(matches!(err, SignalError::InvalidConfiguration(_)));
    }
}
