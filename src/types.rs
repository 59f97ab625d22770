//! Core value types shared by the real-time and batch paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Tracked joint. Each joint's angle is measured on the shoulder→wrist limb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Joint {
    /// Left shoulder→wrist limb
    LeftWrist,
    /// Right shoulder→wrist limb
    RightWrist,
}

impl Joint {
    /// All joints, in export order
    pub const ALL: [Joint; 2] = [Joint::LeftWrist, Joint::RightWrist];

    /// Human readable label used in status messages
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Joint::LeftWrist => "Left Wrist",
            Joint::RightWrist => "Right Wrist",
        }
    }

    /// Key used in tabular exports and file names
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Joint::LeftWrist => "leftWrist",
            Joint::RightWrist => "rightWrist",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Which stream a sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Pre-recorded exemplar ("clip")
    Reference,
    /// Real-time capture ("patient")
    Live,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Reference => f.write_str("reference"),
            Source::Live => f.write_str("live"),
        }
    }
}

/// One angle measurement for one joint from one stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSample {
    /// Seconds since session start
    pub timestamp: f64,
    /// Joint measured
    pub joint: Joint,
    /// Stream the measurement came from
    pub source: Source,
    /// Limb angle from vertical, degrees
    pub degrees: f64,
}

impl AngleSample {
    /// Create a new sample
    #[must_use]
    pub fn new(timestamp: f64, joint: Joint, source: Source, degrees: f64) -> Self {
        Self {
            timestamp,
            joint,
            source,
            degrees,
        }
    }
}

/// Fixed-size per-joint storage with compile-time checked keys
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointMap<T> {
    /// Value for [`Joint::LeftWrist`]
    pub left_wrist: T,
    /// Value for [`Joint::RightWrist`]
    pub right_wrist: T,
}

impl<T> JointMap<T> {
    /// Build a map by evaluating `f` for each joint
    pub fn from_fn(mut f: impl FnMut(Joint) -> T) -> Self {
        Self {
            left_wrist: f(Joint::LeftWrist),
            right_wrist: f(Joint::RightWrist),
        }
    }

    /// Iterate over `(joint, value)` pairs in export order
    pub fn iter(&self) -> impl Iterator<Item = (Joint, &T)> {
        [
            (Joint::LeftWrist, &self.left_wrist),
            (Joint::RightWrist, &self.right_wrist),
        ]
        .into_iter()
    }
}

impl<T> Index<Joint> for JointMap<T> {
    type Output = T;

    fn index(&self, joint: Joint) -> &T {
        match joint {
            Joint::LeftWrist => &self.left_wrist,
            Joint::RightWrist => &self.right_wrist,
        }
    }
}

impl<T> IndexMut<Joint> for JointMap<T> {
    fn index_mut(&mut self, joint: Joint) -> &mut T {
        match joint {
            Joint::LeftWrist => &mut self.left_wrist,
            Joint::RightWrist => &mut self.right_wrist,
        }
    }
}

/// One value per stream
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SourcePair<T> {
    /// Value for [`Source::Reference`]
    pub reference: T,
    /// Value for [`Source::Live`]
    pub live: T,
}

impl<T> Index<Source> for SourcePair<T> {
    type Output = T;

    fn index(&self, source: Source) -> &T {
        match source {
            Source::Reference => &self.reference,
            Source::Live => &self.live,
        }
    }
}

impl<T> IndexMut<Source> for SourcePair<T> {
    fn index_mut(&mut self, source: Source) -> &mut T {
        match source {
            Source::Reference => &mut self.reference,
            Source::Live => &mut self.live,
        }
    }
}
