//! Numeric helpers for rounding and rendering angles and timestamps.

pub mod safe_cast;

use crate::Result;
use safe_cast::f64_to_i64;

/// Round an angle to the nearest whole degree
#[must_use]
pub fn round_degrees(degrees: f64) -> f64 {
    degrees.round()
}

/// Round a timestamp to millisecond precision, the capture resolution
#[must_use]
pub fn round_timestamp(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

/// Render seconds with three decimals for tabular output
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    format!("{seconds:.3}")
}

/// Convert elapsed seconds to whole milliseconds
///
/// # Errors
///
/// Returns an error if the value is not finite or does not fit in i64
pub fn seconds_to_millis(seconds: f64) -> Result<i64> {
    f64_to_i64((seconds * 1000.0).round())
}
