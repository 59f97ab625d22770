//! Configuration management for angle comparison sessions

use crate::constants::{
    DEFAULT_DEDUP_WINDOW_MS, DEFAULT_EXTREMUM_MIN_GAP_S, DEFAULT_EXTREMUM_PROXIMITY_DEG,
    DEFAULT_FIXED_TARGET_DEG, DEFAULT_FIXED_TARGET_TOLERANCE_DEG, DEFAULT_FIXED_TARGET_WINDOW_MS,
    DEFAULT_MAX_ANGLE_DIFF_DEG, DEFAULT_MAX_TIME_DIFF_S, DEFAULT_MIN_FLOOR_DEG, DEFAULT_TOLERANCE_DEG,
};
use crate::correlation::CorrelationSettings;
use crate::events::MatchEventLog;
use crate::extrema::ExtractionSettings;
use crate::matcher::{FlagPolicy, MatchSettings};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Real-time tolerance matching
    pub matching: MatchingConfig,

    /// Match event deduplication
    pub event_log: EventLogConfig,

    /// Extremum extraction
    pub extraction: ExtractionConfig,

    /// Cross-series correlation
    pub correlation: CorrelationConfig,

    /// Export destination
    pub export: ExportConfig,
}

/// Tolerance matching parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Band around the reference extremum, degrees
    pub tolerance_deg: f64,

    /// Fixed target angle, degrees
    pub fixed_target_deg: f64,

    /// Band around the fixed target, degrees
    pub fixed_target_tolerance_deg: f64,

    /// Match flag behaviour (sticky, reevaluate)
    pub flag_policy: FlagPolicy,
}

/// Event log windows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventLogConfig {
    /// Window for any (joint, angle type) pair, milliseconds
    pub dedup_window_ms: i64,

    /// Additional window for fixed-target events, milliseconds
    pub fixed_target_window_ms: i64,
}

/// Extremum extraction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Distance from the global extremum that still counts, degrees
    pub proximity_deg: f64,

    /// Minimum spacing between points of one category, seconds
    pub min_gap_s: f64,

    /// Floor for the global minimum, degrees
    pub min_floor_deg: f64,

    /// Round angles to whole degrees before extraction
    pub round_to_degree: bool,
}

/// Correlation verdict thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Largest accepted time difference, seconds
    pub max_time_diff_s: f64,

    /// Largest accepted angle difference, degrees
    pub max_angle_diff_deg: f64,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory receiving the tables and event log
    pub output_dir: PathBuf,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            tolerance_deg: DEFAULT_TOLERANCE_DEG,
            fixed_target_deg: DEFAULT_FIXED_TARGET_DEG,
            fixed_target_tolerance_deg: DEFAULT_FIXED_TARGET_TOLERANCE_DEG,
            flag_policy: FlagPolicy::Sticky,
        }
    }
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            dedup_window_ms: DEFAULT_DEDUP_WINDOW_MS,
            fixed_target_window_ms: DEFAULT_FIXED_TARGET_WINDOW_MS,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            proximity_deg: DEFAULT_EXTREMUM_PROXIMITY_DEG,
            min_gap_s: DEFAULT_EXTREMUM_MIN_GAP_S,
            min_floor_deg: DEFAULT_MIN_FLOOR_DEG,
            round_to_degree: true,
        }
    }
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            max_time_diff_s: DEFAULT_MAX_TIME_DIFF_S,
            max_angle_diff_deg: DEFAULT_MAX_ANGLE_DIFF_DEG,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Matcher thresholds from this configuration
    #[must_use]
    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            tolerance: self.matching.tolerance_deg,
            fixed_target: self.matching.fixed_target_deg,
            fixed_target_tolerance: self.matching.fixed_target_tolerance_deg,
            flag_policy: self.matching.flag_policy,
        }
    }

    /// Empty event log with the configured windows
    #[must_use]
    pub fn event_log(&self) -> MatchEventLog {
        MatchEventLog::new(self.event_log.dedup_window_ms, self.event_log.fixed_target_window_ms)
    }

    /// Extractor thresholds from this configuration
    #[must_use]
    pub fn extraction_settings(&self) -> ExtractionSettings {
        ExtractionSettings {
            proximity: self.extraction.proximity_deg,
            min_gap: self.extraction.min_gap_s,
            min_floor: self.extraction.min_floor_deg,
            round_to_degree: self.extraction.round_to_degree,
        }
    }

    /// Correlator thresholds from this configuration
    #[must_use]
    pub fn correlation_settings(&self) -> CorrelationSettings {
        CorrelationSettings {
            max_time_diff: self.correlation.max_time_diff_s,
            max_angle_diff: self.correlation.max_angle_diff_deg,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("Tolerance", self.matching.tolerance_deg),
            ("Fixed target tolerance", self.matching.fixed_target_tolerance_deg),
            ("Extremum proximity", self.extraction.proximity_deg),
            ("Extremum minimum gap", self.extraction.min_gap_s),
            ("Maximum time difference", self.correlation.max_time_diff_s),
            ("Maximum angle difference", self.correlation.max_angle_diff_deg),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigError(format!(
                    "{name} must be a finite, non-negative number, got {value}"
                )));
            }
        }

        if !(0.0..=180.0).contains(&self.matching.fixed_target_deg) {
            return Err(Error::ConfigError(
                "Fixed target angle must be between 0 and 180 degrees".to_string(),
            ));
        }
        if !(0.0..=180.0).contains(&self.extraction.min_floor_deg) {
            return Err(Error::ConfigError(
                "Minimum floor must be between 0 and 180 degrees".to_string(),
            ));
        }

        if self.event_log.dedup_window_ms < 0 || self.event_log.fixed_target_window_ms < 0 {
            return Err(Error::ConfigError(
                "Deduplication windows must be non-negative".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Pose Angle Compare Configuration

# Real-time matching against the reference running extrema
matching:
  tolerance_deg: 3.0
  fixed_target_deg: 90.0
  fixed_target_tolerance_deg: 1.0
  flag_policy: "sticky"

# Match event deduplication
event_log:
  dedup_window_ms: 2000
  fixed_target_window_ms: 1000

# Extremum extraction
extraction:
  proximity_deg: 4.0
  min_gap_s: 8.0
  min_floor_deg: 3.0
  round_to_degree: true

# Correlation verdicts
correlation:
  max_time_diff_s: 3.0
  max_angle_diff_deg: 5.0

# Output
export:
  output_dir: "results"
"#;
