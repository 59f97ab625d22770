//! Checked float-to-integer conversions

use crate::{Error, Result};

/// Safely convert f64 to i64 with bounds checking
///
/// # Errors
///
/// Returns an error if the value is not finite or outside i64 range
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is safe
#[allow(clippy::cast_precision_loss)] // i64 bounds are only approximate in f64
pub fn f64_to_i64(value: f64) -> Result<i64> {
    // i64::MAX is not representable; 2^63 is the first value that overflows
    if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Ok(value as i64)
    } else {
        Err(Error::InvalidInput(format!(
            "Value {value} cannot be safely converted to i64"
        )))
    }
}
