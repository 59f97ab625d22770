//! Constants used throughout the library

/// Pose topology indices (33-point body model)
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;

/// Number of landmarks in a full body pose
pub const NUM_POSE_LANDMARKS: usize = 33;

/// Live-vs-reference tolerance band, degrees
pub const DEFAULT_TOLERANCE_DEG: f64 = 3.0;

/// Fixed target angle (arm horizontal) and its band, degrees
pub const DEFAULT_FIXED_TARGET_DEG: f64 = 90.0;
pub const DEFAULT_FIXED_TARGET_TOLERANCE_DEG: f64 = 1.0;

/// Match event deduplication windows, milliseconds
pub const DEFAULT_DEDUP_WINDOW_MS: i64 = 2000;
pub const DEFAULT_FIXED_TARGET_WINDOW_MS: i64 = 1000;

/// Extremum extraction parameters
pub const DEFAULT_EXTREMUM_PROXIMITY_DEG: f64 = 4.0;
pub const DEFAULT_EXTREMUM_MIN_GAP_S: f64 = 8.0;
/// Shoulder adducted against the torso; lower readings are measurement floor
pub const DEFAULT_MIN_FLOOR_DEG: f64 = 3.0;

/// Correlation verdict thresholds
pub const DEFAULT_MAX_TIME_DIFF_S: f64 = 3.0;
pub const DEFAULT_MAX_ANGLE_DIFF_DEG: f64 = 5.0;

/// Sliding history length for local peak detection
pub const PEAK_HISTORY_LEN: usize = 3;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
