//! Cross-series correlation of extracted extrema.
//!
//! Every reference point is paired with the live point closest to it in
//! time, ties broken by the smaller angle difference and then by list
//! order. The pair passes when both differences are inside the verdict
//! thresholds.

use crate::constants::{DEFAULT_MAX_ANGLE_DIFF_DEG, DEFAULT_MAX_TIME_DIFF_S};
use crate::extrema::{ExtremumCategory, ExtremumPoint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final judgment for one reference point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Live motion reached the reference extremum close enough in time and angle
    #[serde(rename = "Good")]
    Good,
    /// No live point, or the nearest one is too far off
    #[serde(rename = "Not Good")]
    NotGood,
}

impl Verdict {
    /// Label used in tabular exports
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Good => "Good",
            Verdict::NotGood => "Not Good",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Nearest live point and its distance to the reference point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveMatch {
    /// The selected live point
    pub point: ExtremumPoint,
    /// `|reference.timestamp - live.timestamp|`, seconds
    pub time_delta: f64,
    /// `|reference.degrees - live.degrees|`, degrees
    pub angle_delta: f64,
}

/// Correlation outcome for one reference point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationResult {
    /// Reference-side point
    pub reference: ExtremumPoint,
    /// Nearest live point, absent only when the live list is empty
    pub live_match: Option<LiveMatch>,
    /// Pass/fail
    pub verdict: Verdict,
}

impl CorrelationResult {
    /// Category of the reference point
    #[must_use]
    pub fn reference_category(&self) -> ExtremumCategory {
        self.reference.category
    }
}

/// Verdict thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationSettings {
    /// Largest accepted time difference, seconds
    pub max_time_diff: f64,
    /// Largest accepted angle difference, degrees
    pub max_angle_diff: f64,
}

impl Default for CorrelationSettings {
    fn default() -> Self {
        Self {
            max_time_diff: DEFAULT_MAX_TIME_DIFF_S,
            max_angle_diff: DEFAULT_MAX_ANGLE_DIFF_DEG,
        }
    }
}

/// Pairs reference extrema with live extrema
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossSeriesCorrelator {
    settings: CorrelationSettings,
}

impl CrossSeriesCorrelator {
    /// Create a correlator
    #[must_use]
    pub fn new(settings: CorrelationSettings) -> Self {
        Self { settings }
    }

    /// One result per reference point, in reference order
    #[must_use]
    pub fn correlate(&self, reference: &[ExtremumPoint], live: &[ExtremumPoint]) -> Vec<CorrelationResult> {
        reference
            .iter()
            .map(|&point| {
                let live_match = Self::nearest(&point, live);
                let verdict = match live_match {
                    Some(m)
                        if m.time_delta <= self.settings.max_time_diff
                            && m.angle_delta <= self.settings.max_angle_diff =>
                    {
                        Verdict::Good
                    }
                    _ => Verdict::NotGood,
                };

                CorrelationResult {
                    reference: point,
                    live_match,
                    verdict,
                }
            })
            .collect()
    }

    fn nearest(reference: &ExtremumPoint, live: &[ExtremumPoint]) -> Option<LiveMatch> {
        live.iter()
            .map(|&point| LiveMatch {
                point,
                time_delta: (reference.timestamp - point.timestamp).abs(),
                angle_delta: (reference.degrees - point.degrees).abs(),
            })
            // min_by keeps the first of equal elements, so list order is the final tie-break
            .min_by(|a, b| {
                a.time_delta
                    .total_cmp(&b.time_delta)
                    .then_with(|| a.angle_delta.total_cmp(&b.angle_delta))
            })
    }
}

/// Share of results with a [`Verdict::Good`] verdict, `None` when empty
#[must_use]
pub fn pass_rate(results: &[CorrelationResult]) -> Option<f64> {
    if results.is_empty() {
        return None;
    }
    let good = results.iter().filter(|r| r.verdict == Verdict::Good).count();
    Some(good as f64 / results.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn point(timestamp: f64, category: ExtremumCategory, degrees: f64) -> ExtremumPoint {
        ExtremumPoint {
            timestamp,
            category,
            degrees,
        }
    }

    #[test]
    fn test_nearest_in_time_is_good() {
        let reference = [point(10.0, ExtremumCategory::MaxValue, 150.0)];
        let live = [
            point(9.0, ExtremumCategory::MaxValue, 148.0),
            point(20.0, ExtremumCategory::MaxValue, 152.0),
        ];

        let results = CrossSeriesCorrelator::default().correlate(&reference, &live);
        assert_eq!(results.len(), 1);

        let m = results[0].live_match.unwrap();
        assert_eq!(m.point.timestamp, 9.0);
        assert_eq!(m.time_delta, 1.0);
        assert_eq!(m.angle_delta, 2.0);
        assert_eq!(results[0].verdict, Verdict::Good);
    }

    #[test]
    fn test_far_in_time_is_not_good() {
        let reference = [point(5.0, ExtremumCategory::MinValue, 20.0)];
        let live = [point(30.0, ExtremumCategory::MinValue, 20.0)];

        let results = CrossSeriesCorrelator::default().correlate(&reference, &live);
        assert_eq!(results[0].live_match.unwrap().time_delta, 25.0);
        assert_eq!(results[0].verdict, Verdict::NotGood);
    }

    #[test]
    fn test_tie_broken_by_angle() {
        let reference = [point(10.0, ExtremumCategory::MaxValue, 150.0)];
        let live = [
            point(8.0, ExtremumCategory::MaxValue, 140.0),
            point(12.0, ExtremumCategory::MaxValue, 151.0),
        ];

        let results = CrossSeriesCorrelator::default().correlate(&reference, &live);
        assert_eq!(results[0].live_match.unwrap().point.timestamp, 12.0);
    }

    #[test]
    fn test_full_tie_keeps_first() {
        let reference = [point(10.0, ExtremumCategory::MaxValue, 150.0)];
        let live = [
            point(8.0, ExtremumCategory::MaxValue, 148.0),
            point(12.0, ExtremumCategory::MaxValue, 152.0),
        ];

        let results = CrossSeriesCorrelator::default().correlate(&reference, &live);
        assert_eq!(results[0].live_match.unwrap().point.timestamp, 8.0);
    }

    #[test]
    fn test_empty_live_side() {
        let reference = [
            point(1.0, ExtremumCategory::MinValue, 5.0),
            point(9.0, ExtremumCategory::MaxValue, 150.0),
        ];

        let results = CrossSeriesCorrelator::default().correlate(&reference, &[]);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.live_match.is_none() && r.verdict == Verdict::NotGood));
        assert_eq!(pass_rate(&results), Some(0.0));
    }

    #[test]
    fn test_thresholds_inclusive() {
        let reference = [point(10.0, ExtremumCategory::MaxValue, 150.0)];
        let live = [point(13.0, ExtremumCategory::MaxValue, 145.0)];

        let results = CrossSeriesCorrelator::default().correlate(&reference, &live);
        assert_eq!(results[0].verdict, Verdict::Good);
    }

    #[test]
    fn test_preserves_reference_order() {
        let reference = [
            point(30.0, ExtremumCategory::MinValue, 5.0),
            point(10.0, ExtremumCategory::MaxValue, 150.0),
        ];
        let live = [point(10.0, ExtremumCategory::MaxValue, 150.0)];

        let results = CrossSeriesCorrelator::default().correlate(&reference, &live);
        assert_eq!(results[0].reference.timestamp, 30.0);
        assert_eq!(results[1].reference_category(), ExtremumCategory::MaxValue);
        assert_eq!(results[1].verdict, Verdict::Good);
        assert_eq!(pass_rate(&results), Some(0.5));
        assert_eq!(pass_rate(&[]), None);
    }

    proptest! {
        #[test]
        fn prop_correlation_deterministic(
            reference in proptest::collection::vec((0.0..100.0f64, 0.0..180.0f64), 0..20),
            live in proptest::collection::vec((0.0..100.0f64, 0.0..180.0f64), 0..20),
        ) {
            let to_points = |v: &[(f64, f64)]| -> Vec<ExtremumPoint> {
                v.iter().map(|&(t, d)| point(t, ExtremumCategory::MaxValue, d)).collect()
            };
            let reference = to_points(&reference);
            let live = to_points(&live);

            let correlator = CrossSeriesCorrelator::default();
            let first = correlator.correlate(&reference, &live);
            let second = correlator.correlate(&reference, &live);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.len(), reference.len());

            for result in &first {
                match result.live_match {
                    Some(m) => {
                        // No live point is strictly closer in time
                        for l in &live {
                            prop_assert!(m.time_delta <= (result.reference.timestamp - l.timestamp).abs());
                        }
                    }
                    None => prop_assert!(live.is_empty()),
                }
            }
        }
    }
}
