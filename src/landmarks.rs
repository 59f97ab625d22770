//! Typed pose landmark frames as delivered by the pose-estimation producer.

use crate::constants::{LEFT_SHOULDER, LEFT_WRIST, NUM_POSE_LANDMARKS, RIGHT_SHOULDER, RIGHT_WRIST};
use crate::types::Joint;
use crate::{Error, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One landmark position in normalized `[0, 1]` image space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, left to right
    pub x: f64,
    /// Vertical position, top to bottom
    pub y: f64,
    /// Depth relative to the hips; unused for limb angles
    pub z: f64,
}

impl Landmark {
    /// Create a new landmark
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Position as a vector
    #[must_use]
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// Landmark indices of the proximal and distal ends of a joint's limb
#[must_use]
pub fn limb_indices(joint: Joint) -> (usize, usize) {
    match joint {
        Joint::LeftWrist => (LEFT_SHOULDER, LEFT_WRIST),
        Joint::RightWrist => (RIGHT_SHOULDER, RIGHT_WRIST),
    }
}

/// All landmarks detected in one processed frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseFrame {
    /// Seconds since session start
    pub timestamp: f64,
    /// Landmarks keyed by topology index
    pub landmarks: BTreeMap<usize, Landmark>,
}

impl PoseFrame {
    /// Create an empty frame
    #[must_use]
    pub fn new(timestamp: f64) -> Self {
        Self {
            timestamp,
            landmarks: BTreeMap::new(),
        }
    }

    /// Builder-style landmark insertion
    #[must_use]
    pub fn with_landmark(mut self, index: usize, landmark: Landmark) -> Self {
        self.landmarks.insert(index, landmark);
        self
    }

    /// Look up a landmark by topology index
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLandmark`] if the producer did not report it.
    pub fn landmark(&self, index: usize) -> Result<&Landmark> {
        self.landmarks.get(&index).ok_or(Error::MissingLandmark(index))
    }

    /// The (proximal, distal) landmark pair for a joint's limb
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLandmark`] if either end is absent.
    pub fn arm(&self, joint: Joint) -> Result<(&Landmark, &Landmark)> {
        let (proximal, distal) = limb_indices(joint);
        Ok((self.landmark(proximal)?, self.landmark(distal)?))
    }
}

/// One row of a landmark table: a single landmark of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRow {
    /// Seconds since session start
    pub timestamp: f64,
    /// Topology index
    pub landmark: usize,
    /// Normalized x
    pub x: f64,
    /// Normalized y
    pub y: f64,
    /// Relative depth
    pub z: f64,
}

/// Group consecutive rows sharing a timestamp into frames.
///
/// Rows are not reordered; a timestamp that reappears after a different one
/// starts a new frame.
#[must_use]
pub fn frames_from_rows(rows: &[LandmarkRow]) -> Vec<PoseFrame> {
    let mut frames: Vec<PoseFrame> = Vec::new();

    for row in rows {
        let landmark = Landmark::new(row.x, row.y, row.z);
        match frames.last_mut() {
            Some(frame) if frame.timestamp == row.timestamp => {
                frame.landmarks.insert(row.landmark, landmark);
            }
            _ => frames.push(PoseFrame::new(row.timestamp).with_landmark(row.landmark, landmark)),
        }
    }

    frames
}

/// Read a landmark table from CSV with a `timestamp,landmark,x,y,z` header
///
/// # Errors
///
/// - [`Error::Csv`] if the file is missing or a row fails to parse
/// - [`Error::InvalidInput`] if a row names an index outside the pose topology
pub fn read_landmark_rows<P: AsRef<std::path::Path>>(path: P) -> Result<Vec<LandmarkRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<LandmarkRow>, _>>()?;

    if let Some(row) = rows.iter().find(|row| row.landmark >= NUM_POSE_LANDMARKS) {
        return Err(Error::InvalidInput(format!(
            "Landmark index {} at {:.3}s is outside the {NUM_POSE_LANDMARKS}-point topology",
            row.landmark, row.timestamp
        )));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(timestamp: f64, landmark: usize) -> LandmarkRow {
        LandmarkRow {
            timestamp,
            landmark,
            x: 0.5,
            y: 0.5,
            z: 0.0,
        }
    }

    #[test]
    fn test_arm_lookup() {
        let frame = PoseFrame::new(0.0)
            .with_landmark(LEFT_SHOULDER, Landmark::new(0.4, 0.3, 0.0))
            .with_landmark(LEFT_WRIST, Landmark::new(0.4, 0.6, 0.0));

        let (shoulder, wrist) = frame.arm(Joint::LeftWrist).unwrap();
        assert_eq!(shoulder.y, 0.3);
        assert_eq!(wrist.y, 0.6);

        match frame.arm(Joint::RightWrist) {
            Err(Error::MissingLandmark(index)) => assert_eq!(index, RIGHT_SHOULDER),
            other => panic!("Expected MissingLandmark, got {other:?}"),
        }
    }

    #[test]
    fn test_frames_from_rows_groups_by_timestamp() {
        let rows = vec![row(0.0, 11), row(0.0, 15), row(0.033, 11), row(0.033, 15), row(0.066, 11)];
        let frames = frames_from_rows(&rows);

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].landmarks.len(), 2);
        assert_eq!(frames[2].landmarks.len(), 1);
        assert_eq!(frames[1].timestamp, 0.033);
    }

    #[test]
    fn test_frames_from_rows_empty() {
        assert!(frames_from_rows(&[]).is_empty());
    }
}
