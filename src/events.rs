//! Match events and the deduplicating, append-only event log.

use crate::constants::{DEFAULT_DEDUP_WINDOW_MS, DEFAULT_FIXED_TARGET_WINDOW_MS};
use crate::types::Joint;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the live angle matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AngleType {
    /// Reference running minimum
    Min,
    /// Reference running maximum
    Max,
    /// Fixed target angle (arm horizontal)
    FixedTarget,
}

impl fmt::Display for AngleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleType::Min => f.write_str("min"),
            AngleType::Max => f.write_str("max"),
            AngleType::FixedTarget => f.write_str("fixedTarget"),
        }
    }
}

/// A recorded match transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Wall-clock instant the match was observed
    pub timestamp: DateTime<Utc>,
    /// Joint that matched
    #[serde(rename = "wrist")]
    pub joint: Joint,
    /// Human readable status line
    pub status: String,
    /// Which target was matched
    #[serde(rename = "angleType")]
    pub angle_type: AngleType,
    /// Angle that triggered the event, degrees: the live angle for
    /// min/max matches, the reference angle for the fixed target
    pub angle: f64,
}

impl MatchEvent {
    /// Build an event with the standard status line for its target
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, joint: Joint, angle_type: AngleType, angle: f64) -> Self {
        let status = match angle_type {
            AngleType::Min | AngleType::Max => {
                format!("{} is matching the reference {} angle", joint.label(), angle_type)
            }
            AngleType::FixedTarget => format!("{} reached the fixed target angle", joint.label()),
        };

        Self {
            timestamp,
            joint,
            status,
            angle_type,
            angle,
        }
    }
}

/// Append-only log that suppresses near-duplicate events.
///
/// An event is dropped when an entry with the same joint and angle type
/// already lies within the dedup window of it. Fixed-target events must
/// additionally clear their own, shorter window first.
#[derive(Debug, Clone)]
pub struct MatchEventLog {
    dedup_window: Duration,
    fixed_target_window: Duration,
    events: Vec<MatchEvent>,
}

impl Default for MatchEventLog {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_WINDOW_MS, DEFAULT_FIXED_TARGET_WINDOW_MS)
    }
}

impl MatchEventLog {
    /// Create an empty log with the given windows in milliseconds
    #[must_use]
    pub fn new(dedup_window_ms: i64, fixed_target_window_ms: i64) -> Self {
        Self {
            dedup_window: Duration::milliseconds(dedup_window_ms),
            fixed_target_window: Duration::milliseconds(fixed_target_window_ms),
            events: Vec::new(),
        }
    }

    /// Append `event` unless it duplicates a stored one. Returns whether it was stored.
    pub fn record(&mut self, event: MatchEvent) -> bool {
        if event.angle_type == AngleType::FixedTarget
            && self.has_neighbour(&event, self.fixed_target_window)
        {
            debug!("Suppressed duplicate {} event for {}", event.angle_type, event.joint);
            return false;
        }

        if self.has_neighbour(&event, self.dedup_window) {
            debug!("Suppressed duplicate {} event for {}", event.angle_type, event.joint);
            return false;
        }

        info!("{} ({:.1}°)", event.status, event.angle);
        self.events.push(event);
        true
    }

    fn has_neighbour(&self, event: &MatchEvent, window: Duration) -> bool {
        self.events.iter().any(|stored| {
            stored.joint == event.joint
                && stored.angle_type == event.angle_type
                && (stored.timestamp - event.timestamp).abs() <= window
        })
    }

    /// Stored events in insertion order
    #[must_use]
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    /// Number of stored events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been stored yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consume the log, yielding its events
    #[must_use]
    pub fn into_events(self) -> Vec<MatchEvent> {
        self.events
    }
}
