//! Debounced extremum extraction over a completed angle series.
//!
//! Raw per-frame angles hover around a true extremum for many frames while
//! the arm is held at the end of its range. The extractor keeps one point
//! per physical event by requiring a minimum time gap between accepted
//! points of the same category.

use crate::constants::{DEFAULT_EXTREMUM_MIN_GAP_S, DEFAULT_EXTREMUM_PROXIMITY_DEG, DEFAULT_MIN_FLOOR_DEG};
use crate::types::AngleSample;
use crate::utils::round_degrees;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of an extracted point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtremumCategory {
    /// Near the series minimum
    #[serde(rename = "Min Value")]
    MinValue,
    /// Near the series maximum
    #[serde(rename = "Max Value")]
    MaxValue,
}

impl ExtremumCategory {
    /// Label used in tabular exports
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ExtremumCategory::MinValue => "Min Value",
            ExtremumCategory::MaxValue => "Max Value",
        }
    }
}

impl fmt::Display for ExtremumCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One accepted near-extremum occurrence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremumPoint {
    /// Seconds since session start, as captured
    pub timestamp: f64,
    /// Near-minimum or near-maximum
    pub category: ExtremumCategory,
    /// Angle, degrees
    pub degrees: f64,
}

/// Extraction thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionSettings {
    /// How close to the global extremum a sample must be, degrees
    pub proximity: f64,
    /// Minimum spacing between accepted points of one category, seconds
    pub min_gap: f64,
    /// Floor applied to the global minimum, degrees
    pub min_floor: f64,
    /// Round angles to whole degrees before extraction
    pub round_to_degree: bool,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            proximity: DEFAULT_EXTREMUM_PROXIMITY_DEG,
            min_gap: DEFAULT_EXTREMUM_MIN_GAP_S,
            min_floor: DEFAULT_MIN_FLOOR_DEG,
            round_to_degree: true,
        }
    }
}

/// Output of one extraction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Accepted points in series order
    pub points: Vec<ExtremumPoint>,
    /// Series minimum after the floor clamp; `None` for series too short to extract
    pub global_min: Option<f64>,
    /// Series maximum; `None` for series too short to extract
    pub global_max: Option<f64>,
}

impl Extraction {
    /// Points of one category, in series order
    pub fn of_category(&self, category: ExtremumCategory) -> impl Iterator<Item = &ExtremumPoint> {
        self.points.iter().filter(move |point| point.category == category)
    }
}

/// Extracts debounced near-min and near-max points
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtremumExtractor {
    settings: ExtractionSettings,
}

impl ExtremumExtractor {
    /// Create an extractor
    #[must_use]
    pub fn new(settings: ExtractionSettings) -> Self {
        Self { settings }
    }

    /// Extract points from one joint's series from one source.
    ///
    /// Non-finite angles are skipped. Fewer than two usable samples yields an
    /// empty extraction with no global extrema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfOrderSample`] if timestamps decrease.
    pub fn extract(&self, series: &[AngleSample]) -> Result<Extraction> {
        let samples: Vec<(f64, f64)> = series
            .iter()
            .filter(|sample| sample.degrees.is_finite())
            .map(|sample| (sample.timestamp, self.normalize(sample.degrees)))
            .collect();

        if let Some(pair) = series.windows(2).find(|pair| pair[1].timestamp < pair[0].timestamp) {
            return Err(Error::OutOfOrderSample {
                joint: pair[1].joint,
                stream: pair[1].source,
                previous: pair[0].timestamp,
                received: pair[1].timestamp,
            });
        }

        if samples.len() < 2 {
            return Ok(Extraction::default());
        }

        let raw_min = samples.iter().map(|&(_, deg)| deg).fold(f64::INFINITY, f64::min);
        let global_max = samples.iter().map(|&(_, deg)| deg).fold(f64::NEG_INFINITY, f64::max);
        let global_min = raw_min.max(self.settings.min_floor);

        let mut points = Vec::new();
        let mut last_min: Option<f64> = None;
        let mut last_max: Option<f64> = None;

        for &(timestamp, degrees) in &samples {
            for (target, category, last) in [
                (global_min, ExtremumCategory::MinValue, &mut last_min),
                (global_max, ExtremumCategory::MaxValue, &mut last_max),
            ] {
                if (degrees - target).abs() > self.settings.proximity {
                    continue;
                }
                if last.is_some_and(|previous| timestamp - previous < self.settings.min_gap) {
                    continue;
                }

                *last = Some(timestamp);
                points.push(ExtremumPoint {
                    timestamp,
                    category,
                    degrees,
                });
            }
        }

        Ok(Extraction {
            points,
            global_min: Some(global_min),
            global_max: Some(global_max),
        })
    }

    fn normalize(&self, degrees: f64) -> f64 {
        if self.settings.round_to_degree {
            round_degrees(degrees)
        } else {
            degrees
        }
    }
}
