//! Running extremum tracking for the reference stream and latest-value
//! tracking for the live stream.

use crate::types::{Joint, JointMap, Source};

/// Running minimum and maximum of the reference angles seen so far
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningExtrema {
    /// Smallest angle observed, `+inf` before the first sample
    pub min: f64,
    /// Largest angle observed, `-inf` before the first sample
    pub max: f64,
}

impl Default for RunningExtrema {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl RunningExtrema {
    /// Whether at least one sample has been folded in
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.min <= self.max
    }

    fn update(&mut self, angle: f64) {
        self.min = self.min.min(angle);
        self.max = self.max.max(angle);
    }
}

/// State after an update, echoing what changed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerUpdate {
    /// Reference sample folded into the running extrema
    Extrema(RunningExtrema),
    /// Live sample replaced the latest live angle
    Live(f64),
}

/// Per-joint running state. Extrema only tighten; nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct RunningExtremumTracker {
    extrema: JointMap<RunningExtrema>,
    live: JointMap<Option<f64>>,
}

impl RunningExtremumTracker {
    /// Create a tracker with no samples
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one angle into the state for `(joint, source)`
    ///
    /// Non-finite angles are ignored for the reference extrema so a single bad
    /// frame cannot poison `min`/`max` for the rest of the session.
    pub fn update(&mut self, joint: Joint, source: Source, angle: f64) -> TrackerUpdate {
        match source {
            Source::Reference => {
                let extrema = &mut self.extrema[joint];
                if angle.is_finite() {
                    extrema.update(angle);
                }
                TrackerUpdate::Extrema(*extrema)
            }
            Source::Live => {
                self.live[joint] = Some(angle);
                TrackerUpdate::Live(angle)
            }
        }
    }

    /// Running extrema of the reference stream for `joint`
    #[must_use]
    pub fn extrema(&self, joint: Joint) -> RunningExtrema {
        self.extrema[joint]
    }

    /// Latest live angle for `joint`, if any live sample arrived yet
    #[must_use]
    pub fn live(&self, joint: Joint) -> Option<f64> {
        self.live[joint]
    }
}
