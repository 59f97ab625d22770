//! Session orchestration: the per-frame real-time path and the end-of-session
//! batch path.
//!
//! Each frame from either stream is processed to completion before the next
//! one from that stream is accepted. Samples must arrive in non-decreasing
//! timestamp order per joint and stream; a sample earlier than its
//! predecessor is rejected with [`Error::OutOfOrderSample`] rather than
//! reordered.

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::correlation::{CorrelationResult, CrossSeriesCorrelator, Verdict};
use crate::events::{MatchEvent, MatchEventLog};
use crate::extrema::{Extraction, ExtremumExtractor};
use crate::geometry::limb_angle_from_vertical;
use crate::landmarks::{Landmark, PoseFrame};
use crate::matcher::ToleranceMatcher;
use crate::peak_detector::{Peak, PeakDetector};
use crate::tracker::{RunningExtrema, RunningExtremumTracker};
use crate::types::{AngleSample, Joint, JointMap, Source, SourcePair};
use crate::utils::round_timestamp;
use crate::{Error, Result};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};

/// Per-joint state after one sample, for overlays
#[derive(Debug, Clone, PartialEq)]
pub struct JointUpdate {
    /// Joint updated
    pub joint: Joint,
    /// Angle just computed, degrees
    pub angle: f64,
    /// Reference running extrema
    pub extrema: RunningExtrema,
    /// Latest live angle
    pub live: Option<f64>,
    /// Match flag
    pub matching: bool,
    /// Turning point completed by this sample in its own stream
    pub peak: Option<Peak>,
    /// Events that made it into the log
    pub recorded: Vec<MatchEvent>,
}

/// Result of processing one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUpdate {
    /// Stream the frame came from
    pub source: Source,
    /// Frame time, seconds
    pub timestamp: f64,
    /// Joints with a valid angle this frame
    pub joints: Vec<JointUpdate>,
    /// Joints skipped because their landmarks coincided
    pub skipped: Vec<Joint>,
}

/// Batch results for one joint
#[derive(Debug, Clone, PartialEq)]
pub struct JointReport {
    /// Raw angle series per stream
    pub series: SourcePair<Vec<AngleSample>>,
    /// Extracted extrema per stream
    pub extraction: SourcePair<Extraction>,
    /// One entry per reference extremum point
    pub correlation: Vec<CorrelationResult>,
}

/// Everything produced once a session ends
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    /// Per-joint batch results
    pub joints: JointMap<JointReport>,
    /// Deduplicated match events, in insertion order
    pub events: Vec<MatchEvent>,
}

/// One comparison session between a reference and a live stream
pub struct Session {
    clock: Arc<dyn Clock>,
    series: JointMap<SourcePair<Vec<AngleSample>>>,
    tracker: RunningExtremumTracker,
    matcher: ToleranceMatcher,
    event_log: MatchEventLog,
    peaks: JointMap<SourcePair<PeakDetector>>,
    extractor: ExtremumExtractor,
    correlator: CrossSeriesCorrelator,
}

impl Session {
    /// Create a session reading the system clock
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a session with an injected clock
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        info!("Starting comparison session");

        Ok(Self {
            clock,
            series: JointMap::default(),
            tracker: RunningExtremumTracker::new(),
            matcher: ToleranceMatcher::new(config.match_settings()),
            event_log: config.event_log(),
            peaks: JointMap::default(),
            extractor: ExtremumExtractor::new(config.extraction_settings()),
            correlator: CrossSeriesCorrelator::new(config.correlation_settings()),
        })
    }

    /// Compute both limb angles from a frame and feed them through the
    /// real-time path.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingLandmark`] if a shoulder or wrist is absent
    /// - [`Error::OutOfOrderSample`] if the frame is older than the last one
    /// - [`Error::InvalidInput`] for a negative or non-finite timestamp
    pub fn process_frame(&mut self, source: Source, frame: &PoseFrame) -> Result<FrameUpdate> {
        let timestamp = round_timestamp(frame.timestamp);
        validate_timestamp(timestamp)?;

        // Validate the whole frame before touching any state
        let mut arms: Vec<(Joint, Landmark, Landmark)> = Vec::with_capacity(Joint::ALL.len());
        for joint in Joint::ALL {
            let (proximal, distal) = frame.arm(joint)?;
            self.check_order(joint, source, timestamp)?;
            arms.push((joint, *proximal, *distal));
        }

        let mut update = FrameUpdate {
            source,
            timestamp,
            joints: Vec::with_capacity(arms.len()),
            skipped: Vec::new(),
        };

        for (joint, proximal, distal) in arms {
            match limb_angle_from_vertical(&proximal.position(), &distal.position()) {
                Ok(angle) => {
                    let sample = AngleSample::new(timestamp, joint, source, angle);
                    update.joints.push(self.push_sample(sample)?);
                }
                Err(Error::DegenerateVector) => {
                    warn!("Skipping {joint} at {timestamp:.3}s ({source}): shoulder and wrist coincide");
                    update.skipped.push(joint);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(update)
    }

    /// Feed one pre-computed angle through the real-time path
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfOrderSample`] if the sample is older than its predecessor
    /// - [`Error::InvalidInput`] for a negative or non-finite timestamp or a non-finite angle
    pub fn push_sample(&mut self, sample: AngleSample) -> Result<JointUpdate> {
        let AngleSample {
            timestamp,
            joint,
            source,
            degrees,
        } = sample;

        validate_timestamp(timestamp)?;
        if !degrees.is_finite() {
            return Err(Error::InvalidInput(format!(
                "Non-finite angle for {joint} at {timestamp:.3}s"
            )));
        }
        self.check_order(joint, source, timestamp)?;

        self.series[joint][source].push(sample);
        self.tracker.update(joint, source, degrees);
        let peak = self.peaks[joint][source].update(degrees);

        let mut recorded = Vec::new();
        if source == Source::Reference {
            let outcome = self.matcher.evaluate(
                joint,
                degrees,
                self.tracker.extrema(joint),
                self.tracker.live(joint),
                self.clock.now(),
            );
            for event in outcome.events {
                if self.event_log.record(event.clone()) {
                    recorded.push(event);
                }
            }
        }

        debug!("{joint} {source} {timestamp:.3}s: {degrees:.1}°");

        Ok(JointUpdate {
            joint,
            angle: degrees,
            extrema: self.tracker.extrema(joint),
            live: self.tracker.live(joint),
            matching: self.matcher.is_matching(joint),
            peak,
            recorded,
        })
    }

    fn check_order(&self, joint: Joint, source: Source, timestamp: f64) -> Result<()> {
        match self.series[joint][source].last() {
            Some(previous) if timestamp < previous.timestamp => Err(Error::OutOfOrderSample {
                joint,
                stream: source,
                previous: previous.timestamp,
                received: timestamp,
            }),
            _ => Ok(()),
        }
    }

    /// Reference running extrema for `joint`
    #[must_use]
    pub fn extrema(&self, joint: Joint) -> RunningExtrema {
        self.tracker.extrema(joint)
    }

    /// Latest live angle for `joint`
    #[must_use]
    pub fn live_angle(&self, joint: Joint) -> Option<f64> {
        self.tracker.live(joint)
    }

    /// Match flag for `joint`
    #[must_use]
    pub fn is_matching(&self, joint: Joint) -> bool {
        self.matcher.is_matching(joint)
    }

    /// Events recorded so far
    #[must_use]
    pub fn events(&self) -> &[MatchEvent] {
        self.event_log.events()
    }

    /// Buffered series for one joint and stream
    #[must_use]
    pub fn series(&self, joint: Joint, source: Source) -> &[AngleSample] {
        &self.series[joint][source]
    }

    /// End the session: extract extrema from every buffered series and
    /// correlate reference against live per joint.
    ///
    /// # Errors
    ///
    /// Propagates extraction errors; none occur for series built through
    /// this session since ordering is enforced on entry.
    pub fn finish(self) -> Result<SessionReport> {
        let Session {
            series,
            event_log,
            extractor,
            correlator,
            ..
        } = self;

        let build = |series: SourcePair<Vec<AngleSample>>| -> Result<JointReport> {
            let extraction = SourcePair {
                reference: extractor.extract(&series.reference)?,
                live: extractor.extract(&series.live)?,
            };
            let correlation = correlator.correlate(&extraction.reference.points, &extraction.live.points);

            Ok(JointReport {
                series,
                extraction,
                correlation,
            })
        };

        let JointMap {
            left_wrist,
            right_wrist,
        } = series;
        let joints = JointMap {
            left_wrist: build(left_wrist)?,
            right_wrist: build(right_wrist)?,
        };

        for (joint, report) in joints.iter() {
            let good = report
                .correlation
                .iter()
                .filter(|r| r.verdict == Verdict::Good)
                .count();
            info!(
                "{joint}: {good}/{} reference extrema matched, {} reference and {} live samples",
                report.correlation.len(),
                report.series.reference.len(),
                report.series.live.len()
            );
        }

        Ok(SessionReport {
            joints,
            events: event_log.into_events(),
        })
    }
}

fn validate_timestamp(timestamp: f64) -> Result<()> {
    if timestamp.is_finite() && timestamp >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "Timestamp must be finite and non-negative, got {timestamp}"
        )))
    }
}

/// A session shared between independent capture loops.
///
/// Every call takes the single session lock, so the two streams are
/// serialized and running extrema cannot race.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    /// Wrap a session for shared use
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Session>> {
        self.inner.lock().map_err(|_| Error::SessionPoisoned)
    }

    /// Run `f` with exclusive access to the session
    pub fn with_session<T>(&self, f: impl FnOnce(&mut Session) -> T) -> Result<T> {
        let mut session = self.lock()?;
        Ok(f(&mut session))
    }

    /// See [`Session::process_frame`]
    pub fn process_frame(&self, source: Source, frame: &PoseFrame) -> Result<FrameUpdate> {
        self.lock()?.process_frame(source, frame)
    }

    /// See [`Session::push_sample`]
    pub fn push_sample(&self, sample: AngleSample) -> Result<JointUpdate> {
        self.lock()?.push_sample(sample)
    }

    /// Snapshot of the reference running extrema
    pub fn extrema(&self, joint: Joint) -> Result<RunningExtrema> {
        Ok(self.lock()?.extrema(joint))
    }

    /// Snapshot of the match flag
    pub fn is_matching(&self, joint: Joint) -> Result<bool> {
        Ok(self.lock()?.is_matching(joint))
    }

    /// Finish the session once every other handle has been dropped
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if another handle is still alive
    /// - [`Error::SessionPoisoned`] if a capture loop panicked mid-update
    pub fn finish(self) -> Result<SessionReport> {
        let mutex = Arc::try_unwrap(self.inner)
            .map_err(|_| Error::InvalidInput("Session is still shared by a capture loop".to_string()))?;
        let session = mutex.into_inner().map_err(|_| Error::SessionPoisoned)?;
        session.finish()
    }
}
