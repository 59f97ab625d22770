//! Real-time tolerance matching of the live stream against the reference
//! stream's running extrema.

use crate::constants::{DEFAULT_FIXED_TARGET_DEG, DEFAULT_FIXED_TARGET_TOLERANCE_DEG, DEFAULT_TOLERANCE_DEG};
use crate::events::{AngleType, MatchEvent};
use crate::tracker::RunningExtrema;
use crate::types::{Joint, JointMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `target - tolerance <= angle <= target + tolerance`
#[must_use]
pub fn within_tolerance(angle: f64, target: f64, tolerance: f64) -> bool {
    angle >= target - tolerance && angle <= target + tolerance
}

/// How a joint's match flag reacts when the reference sits at an extremum
/// but the live angle does not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagPolicy {
    /// Once set, the flag stays set for the session
    #[default]
    Sticky,
    /// The flag follows the latest live check at a reference extremum
    Reevaluate,
}

/// Matching thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchSettings {
    /// Band around the running extremum, degrees
    pub tolerance: f64,
    /// Fixed target angle, degrees
    pub fixed_target: f64,
    /// Band around the fixed target, degrees
    pub fixed_target_tolerance: f64,
    /// Flag behaviour on a failed live check
    pub flag_policy: FlagPolicy,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE_DEG,
            fixed_target: DEFAULT_FIXED_TARGET_DEG,
            fixed_target_tolerance: DEFAULT_FIXED_TARGET_TOLERANCE_DEG,
            flag_policy: FlagPolicy::Sticky,
        }
    }
}

/// Result of evaluating one reference sample
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// Joint's match flag after evaluation
    pub matching: bool,
    /// Events produced by this sample, before deduplication
    pub events: Vec<MatchEvent>,
}

/// Holds the per-joint match flags
#[derive(Debug, Clone, Default)]
pub struct ToleranceMatcher {
    settings: MatchSettings,
    flags: JointMap<bool>,
}

impl ToleranceMatcher {
    /// Create a matcher with all flags cleared
    #[must_use]
    pub fn new(settings: MatchSettings) -> Self {
        Self {
            settings,
            flags: JointMap::default(),
        }
    }

    /// Evaluate one reference sample.
    ///
    /// A min (max) match needs the reference angle itself near its running
    /// min (max) and the latest live angle near the same value. The fixed
    /// target is checked on the reference angle alone.
    pub fn evaluate(
        &mut self,
        joint: Joint,
        reference_angle: f64,
        extrema: RunningExtrema,
        live_angle: Option<f64>,
        now: DateTime<Utc>,
    ) -> MatchOutcome {
        let tolerance = self.settings.tolerance;
        let mut events = Vec::new();

        for (target, angle_type) in [(extrema.min, AngleType::Min), (extrema.max, AngleType::Max)] {
            if !within_tolerance(reference_angle, target, tolerance) {
                continue;
            }

            match live_angle.filter(|&live| within_tolerance(live, target, tolerance)) {
                Some(live) => {
                    self.flags[joint] = true;
                    events.push(MatchEvent::new(now, joint, angle_type, live));
                }
                None => {
                    if self.settings.flag_policy == FlagPolicy::Reevaluate {
                        self.flags[joint] = false;
                    }
                }
            }
        }

        if within_tolerance(
            reference_angle,
            self.settings.fixed_target,
            self.settings.fixed_target_tolerance,
        ) {
            events.push(MatchEvent::new(now, joint, AngleType::FixedTarget, reference_angle));
        }

        MatchOutcome {
            matching: self.flags[joint],
            events,
        }
    }

    /// Current flag for `joint`
    #[must_use]
    pub fn is_matching(&self, joint: Joint) -> bool {
        self.flags[joint]
    }

    /// Thresholds in use
    #[must_use]
    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn extrema(min: f64, max: f64) -> RunningExtrema {
        RunningExtrema { min, max }
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(0).unwrap()
    }

    #[test]
    fn test_within_tolerance_inclusive() {
        assert!(within_tolerance(87.0, 90.0, 3.0));
        assert!(within_tolerance(93.0, 90.0, 3.0));
        assert!(!within_tolerance(93.01, 90.0, 3.0));
        assert!(!within_tolerance(f64::INFINITY, 90.0, 3.0));
    }

    #[test]
    fn test_boundary_example_live_near_both_extrema() {
        // Reference saw 88, 90, 89: a live 89 is within 3° of both
        let mut matcher = ToleranceMatcher::default();
        let outcome = matcher.evaluate(Joint::LeftWrist, 89.0, extrema(88.0, 90.0), Some(89.0), now());

        assert!(outcome.matching);
        let types: Vec<AngleType> = outcome.events.iter().map(|e| e.angle_type).collect();
        assert_eq!(types, vec![AngleType::Min, AngleType::Max, AngleType::FixedTarget]);
    }

    #[test]
    fn test_reference_away_from_extremum_does_not_match() {
        let mut matcher = ToleranceMatcher::default();
        let outcome = matcher.evaluate(Joint::LeftWrist, 60.0, extrema(10.0, 150.0), Some(10.0), now());

        assert!(!outcome.matching);
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_no_live_sample_yet() {
        let mut matcher = ToleranceMatcher::default();
        let outcome = matcher.evaluate(Joint::RightWrist, 10.0, extrema(10.0, 150.0), None, now());

        assert!(!outcome.matching);
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_sticky_flag_survives_failed_check() {
        let mut matcher = ToleranceMatcher::default();
        matcher.evaluate(Joint::LeftWrist, 150.0, extrema(10.0, 150.0), Some(149.0), now());
        assert!(matcher.is_matching(Joint::LeftWrist));

        // Reference back at its max, live far away: sticky flag stays set
        let outcome = matcher.evaluate(Joint::LeftWrist, 150.0, extrema(10.0, 150.0), Some(40.0), now());
        assert!(outcome.matching);
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_reevaluate_flag_clears_on_failed_check() {
        let settings = MatchSettings {
            flag_policy: FlagPolicy::Reevaluate,
            ..MatchSettings::default()
        };
        let mut matcher = ToleranceMatcher::new(settings);

        matcher.evaluate(Joint::LeftWrist, 150.0, extrema(10.0, 150.0), Some(149.0), now());
        assert!(matcher.is_matching(Joint::LeftWrist));

        let outcome = matcher.evaluate(Joint::LeftWrist, 150.0, extrema(10.0, 150.0), Some(40.0), now());
        assert!(!outcome.matching);

        // Unrelated frame (reference mid-range) leaves the flag alone
        matcher.evaluate(Joint::LeftWrist, 150.0, extrema(10.0, 150.0), Some(150.0), now());
        let outcome = matcher.evaluate(Joint::LeftWrist, 80.0, extrema(10.0, 150.0), Some(0.0), now());
        assert!(outcome.matching);
    }

    #[test]
    fn test_fixed_target_uses_reference_only() {
        let mut matcher = ToleranceMatcher::default();
        let outcome = matcher.evaluate(Joint::RightWrist, 90.8, extrema(10.0, 150.0), None, now());

        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].angle_type, AngleType::FixedTarget);
        assert_eq!(outcome.events[0].angle, 90.8);

        let outcome = matcher.evaluate(Joint::RightWrist, 91.2, extrema(10.0, 150.0), None, now());
        assert!(outcome.events.is_empty());
    }
}
