//! Local peak detection over a short sliding history of angles.
//!
//! A peak is reported one sample late: once three samples are buffered, the
//! middle one is a maximum if it is strictly above both neighbours and a
//! minimum if strictly below both. Plateaus never count.

use crate::constants::PEAK_HISTORY_LEN;
use std::collections::VecDeque;

/// Kind of local turning point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakKind {
    /// Middle sample above both neighbours
    Maximum,
    /// Middle sample below both neighbours
    Minimum,
}

/// A detected turning point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Maximum or minimum
    pub kind: PeakKind,
    /// Angle at the turning point, degrees
    pub degrees: f64,
}

/// Peak detector with a three-sample window
#[derive(Debug, Clone)]
pub struct PeakDetector {
    history: VecDeque<f64>,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PeakDetector {
    /// Create an empty detector
    #[must_use]
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(PEAK_HISTORY_LEN),
        }
    }

    /// Push a new angle and report whether the previous one was a peak
    pub fn update(&mut self, angle: f64) -> Option<Peak> {
        if self.history.len() >= PEAK_HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(angle);

        if self.history.len() < PEAK_HISTORY_LEN {
            return None;
        }

        let (prev, current, next) = (self.history[0], self.history[1], self.history[2]);
        let kind = if current > prev && current > next {
            PeakKind::Maximum
        } else if current < prev && current < next {
            PeakKind::Minimum
        } else {
            return None;
        };

        Some(Peak { kind, degrees: current })
    }

    /// Forget the buffered history
    pub fn reset(&mut self) {
        self.history.clear();
    }
}
