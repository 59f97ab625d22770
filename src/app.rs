//! Offline comparison run: replay recorded landmark tables through a session
//! and export the results.

use crate::{
    clock::ManualClock,
    config::Config,
    correlation::pass_rate,
    error::Result,
    export::export_report,
    landmarks::{frames_from_rows, read_landmark_rows, PoseFrame},
    peak_detector::PeakKind,
    session::Session,
    types::{JointMap, Source, SourcePair},
    utils::seconds_to_millis,
};
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Landmark table of the reference recording
    pub reference: PathBuf,
    /// Landmark table of the live recording
    pub live: PathBuf,
    /// Directory receiving the exports
    pub output_dir: PathBuf,
    /// Thresholds and windows
    pub settings: Config,
}

impl AppConfig {
    /// Configuration with default settings and their output directory
    #[must_use]
    pub fn new(reference: impl Into<PathBuf>, live: impl Into<PathBuf>) -> Self {
        let settings = Config::default();
        Self {
            reference: reference.into(),
            live: live.into(),
            output_dir: settings.export.output_dir.clone(),
            settings,
        }
    }
}

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Frames replayed per stream
    pub frames: SourcePair<usize>,
    /// Events in the deduplicated log
    pub events: usize,
    /// Share of reference extrema judged Good, per joint
    pub pass_rates: JointMap<Option<f64>>,
    /// Files written, in export order
    pub written: Vec<PathBuf>,
}

/// Replays two recordings through one comparison session
pub struct ComparisonApp {
    config: AppConfig,
    clock: Arc<ManualClock>,
    started_millis: i64,
    session: Session,
}

impl ComparisonApp {
    /// Create a new application anchored at the current instant
    pub fn new(config: AppConfig) -> Result<Self> {
        Self::with_start(config, Utc::now())
    }

    /// Create a new application whose frame time zero maps to `started`.
    ///
    /// Event timestamps are `started` plus the frame timestamp, so two
    /// replays anchored at the same instant produce identical logs.
    pub fn with_start(config: AppConfig, started: DateTime<Utc>) -> Result<Self> {
        info!("Initializing comparison session at {}", started.to_rfc3339());

        let started_millis = started.timestamp_millis();
        let clock = Arc::new(ManualClock::new(started_millis));
        let session = Session::with_clock(&config.settings, clock.clone())?;

        Ok(Self {
            config,
            clock,
            started_millis,
            session,
        })
    }

    /// Load both recordings, replay them, and export the report
    pub fn run(mut self) -> Result<RunSummary> {
        info!("Loading reference landmarks from {}", self.config.reference.display());
        let reference = frames_from_rows(&read_landmark_rows(&self.config.reference)?);
        info!("Loading live landmarks from {}", self.config.live.display());
        let live = frames_from_rows(&read_landmark_rows(&self.config.live)?);

        let frames = SourcePair {
            reference: reference.len(),
            live: live.len(),
        };
        info!("Replaying {} reference and {} live frames", frames.reference, frames.live);

        for (source, frame) in merge_streams(reference, live) {
            self.clock
                .set_millis(self.started_millis.saturating_add(seconds_to_millis(frame.timestamp)?));
            let update = self.session.process_frame(source, &frame)?;

            for joint in &update.joints {
                if let Some(peak) = joint.peak {
                    let kind = match peak.kind {
                        PeakKind::Maximum => "maximum",
                        PeakKind::Minimum => "minimum",
                    };
                    debug!(
                        "{} {source} local {kind} {:.1}° before {:.3}s",
                        joint.joint, peak.degrees, update.timestamp
                    );
                }
            }
        }

        let report = self.session.finish()?;
        let written = export_report(&self.config.output_dir, &report)?;
        let pass_rates = JointMap::from_fn(|joint| pass_rate(&report.joints[joint].correlation));

        info!("Comparison finished with {} match events", report.events.len());

        Ok(RunSummary {
            frames,
            events: report.events.len(),
            pass_rates,
            written,
        })
    }
}

/// Interleave two frame streams by timestamp.
///
/// Each stream keeps its own order. On equal timestamps the live frame goes
/// first, so a reference frame is matched against the live angle captured
/// at the same instant.
#[must_use]
pub fn merge_streams(reference: Vec<PoseFrame>, live: Vec<PoseFrame>) -> Vec<(Source, PoseFrame)> {
    let mut merged = Vec::with_capacity(reference.len() + live.len());
    let mut reference = reference.into_iter().peekable();
    let mut live = live.into_iter().peekable();

    loop {
        let source = match (reference.peek(), live.peek()) {
            (Some(r), Some(l)) if r.timestamp < l.timestamp => Source::Reference,
            (Some(_), Some(_)) | (None, Some(_)) => Source::Live,
            (Some(_), None) => Source::Reference,
            (None, None) => break,
        };

        let next = match source {
            Source::Reference => reference.next(),
            Source::Live => live.next(),
        };
        if let Some(frame) = next {
            merged.push((source, frame));
        }
    }

    merged
}
