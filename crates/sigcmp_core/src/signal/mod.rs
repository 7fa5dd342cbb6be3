//! Signal input handling.
//!
//! Two building blocks used by every other module:
//!
//! 1. **Normalization** (`normalize`): turn a scalar, sequence, table or
//!    numeric text into an owned `Vec<f64>` (or a named [`Column`]).
//!
//! 2. **Invalid values** (`invalid`): mask sensor error codes as missing and
//!    fill the gaps by backward interpolation.
//!
//! # Usage
//!
//! ```
//! use sigcmp_core::signal::{interpolate_invalid, normalize, Table};
//!
//! let table = Table::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
//! assert_eq!(normalize(table).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
//!
//! let filled = interpolate_invalid(vec![0.0, -1.0, 2.0, -1.0], -1.0).unwrap();
//! assert_eq!(filled, vec![0.0, 1.0, 2.0]);
//! ```

mod invalid;
mod normalize;
pub mod types;

pub use invalid::{drop_invalid, interpolate_invalid};
pub(crate) use invalid::mask_invalid;
pub use normalize::{normalize, to_column};
pub use types::{Column, InvalidValues, SignalError, SignalInput, SignalResult, Table};
