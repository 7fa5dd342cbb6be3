//! Input normalization.
//!
//! Converts any accepted [`SignalInput`] into a flat numeric sequence or a
//! single named column. Every other component calls into here first, so the
//! functions are pure and always return an owned copy.

use super::types::{Column, SignalError, SignalInput, SignalResult};

/// Flatten an input into an ordered numeric sequence.
///
/// - scalars become a one-element sequence
/// - sequences are copied as-is
/// - tables are flattened row-major (labels ignored)
/// - text is parsed as one or more numbers separated by commas or whitespace
///
/// # Errors
/// [`SignalError::TypeConversion`] when a table is ragged or text is not numeric.
pub fn normalize(input: impl Into<SignalInput>) -> SignalResult<Vec<f64>> {
    match input.into() {
        SignalInput::Scalar(value) => Ok(vec![value]),
        SignalInput::Sequence(values) => Ok(values),
        SignalInput::Table(table) => table.flatten(),
        SignalInput::Text(text) => parse_text(&text),
    }
}

/// Normalize an input into a single named column.
pub fn to_column(input: impl Into<SignalInput>, name: &str) -> SignalResult<Column> {
    Ok(Column::new(name, normalize(input)?))
}

/// Best-effort numeric conversion for textual input.
fn parse_text(text: &str) -> SignalResult<Vec<f64>> {
    let tokens: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return Err(SignalError::TypeConversion(
            "text input contains no values".to_string(),
        ));
    }

    tokens
        .iter()
        .map(|token| {
            token.parse::<f64>().map_err(|_| {
                SignalError::TypeConversion(format!("'{}' is not a number", token))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::types::Table;

    #[test]
    fn scalar_becomes_single_element() {
        assert_eq!(normalize(1).unwrap(), vec![1.0]);
        assert_eq!(normalize(2.5).unwrap(), vec![2.5]);
    }

    #[test]
    fn sequence_is_preserved_in_order() {
        let values = vec![3.0, 1.0, 2.0];
        assert_eq!(normalize(&values).unwrap(), values);
    }

    #[test]
    fn table_is_flattened_row_major() {
        let table = Table::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(normalize(table).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn transposed_table_flattens_to_same_sequence() {
        let column = Table::from_column(vec![1.0, 2.0, 3.0]);
        let row = column.transpose();
        assert_eq!(normalize(&column).unwrap(), normalize(&row).unwrap());
    }

    #[test]
    fn numeric_text_is_parsed() {
        assert_eq!(normalize("1.5").unwrap(), vec![1.5]);
        assert_eq!(normalize("1, 2 3").unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn non_numeric_text_is_a_conversion_error() {
        let err = normalize("abc").unwrap_err();
        assert!(matches!(err, SignalError::TypeConversion(_)));
        assert!(normalize("   ").is_err());
    }

    #[test]
    fn column_carries_name() {
        let column = to_column(vec![1.0, 2.0], "meas").unwrap();
        assert_eq!(column.name, "meas");
        assert_eq!(column.len(), 2);
    }
}
