//! Error types for the angle comparison library.

use crate::types::{Joint, Source};
use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Proximal and distal landmarks coincide, so no limb vector exists
    #[error("Degenerate vector: landmarks coincide")]
    DegenerateVector,

    /// A sample arrived with a timestamp earlier than its predecessor
    #[error("Out-of-order sample for {joint} ({stream}): {received:.3}s after {previous:.3}s")]
    OutOfOrderSample {
        /// Joint the sample belongs to
        joint: Joint,
        /// Stream the sample came from
        stream: Source,
        /// Timestamp of the last accepted sample
        previous: f64,
        /// Timestamp of the rejected sample
        received: f64,
    },

    /// A required pose landmark is not present in the frame
    #[error("Missing landmark: index {0}")]
    MissingLandmark(usize),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A capture loop panicked while holding the session lock
    #[error("Session lock poisoned")]
    SessionPoisoned,

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tabular read or write failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Event log serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
