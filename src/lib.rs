//! Joint-angle comparison between a reference recording and a live capture.
//!
//! This library scores how closely a live performer reproduces the arm
//! motion of a reference clip. It works on pose landmarks (shoulders and
//! wrists) delivered per frame by an external pose-estimation model:
//! - Limb angles are measured against the image vertical with `nalgebra`
//! - Reference running extrema drive real-time tolerance matching
//! - Matches are written to a deduplicating event log
//! - After the session, debounced extrema are correlated across the two streams
//!
//! The processing pipeline per frame:
//! 1. Compute the shoulder→wrist angle for each joint
//! 2. Fold reference angles into the running min/max
//! 3. Check the latest live angle against the reference extrema and a fixed target
//! 4. Record surviving match events
//!
//! # Examples
//!
//! ## Real-time Matching
//!
//! ```no_run
//! use pose_angle_compare::{
//!     config::Config,
//!     landmarks::{Landmark, PoseFrame},
//!     session::Session,
//!     types::Source,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new(&Config::default())?;
//!
//! // Shoulders are topology indices 11/12, wrists 15/16
//! let frame = PoseFrame::new(0.033)
//!     .with_landmark(11, Landmark::new(0.60, 0.30, 0.0))
//!     .with_landmark(15, Landmark::new(0.90, 0.30, 0.0))
//!     .with_landmark(12, Landmark::new(0.40, 0.30, 0.0))
//!     .with_landmark(16, Landmark::new(0.40, 0.60, 0.0));
//!
//! let update = session.process_frame(Source::Reference, &frame)?;
//! for joint in &update.joints {
//!     println!(
//!         "{}: {:.1}° (min {:.1}°, max {:.1}°) matching={}",
//!         joint.joint, joint.angle, joint.extrema.min, joint.extrema.max, joint.matching
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Extremum Correlation
//!
//! ```no_run
//! use pose_angle_compare::{
//!     correlation::CrossSeriesCorrelator,
//!     extrema::ExtremumExtractor,
//!     types::{AngleSample, Joint, Source},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let reference: Vec<AngleSample> = [(0.0, 12.0), (5.0, 150.0), (14.0, 10.0)]
//!     .iter()
//!     .map(|&(t, deg)| AngleSample::new(t, Joint::LeftWrist, Source::Reference, deg))
//!     .collect();
//! let live: Vec<AngleSample> = [(0.4, 14.0), (6.0, 146.0), (15.0, 11.0)]
//!     .iter()
//!     .map(|&(t, deg)| AngleSample::new(t, Joint::LeftWrist, Source::Live, deg))
//!     .collect();
//!
//! let extractor = ExtremumExtractor::default();
//! let reference = extractor.extract(&reference)?;
//! let live = extractor.extract(&live)?;
//!
//! for result in CrossSeriesCorrelator::default().correlate(&reference.points, &live.points) {
//!     println!("{} at {:.3}s: {}", result.reference.category, result.reference.timestamp, result.verdict);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Complete Session Example
//!
//! ```no_run
//! use pose_angle_compare::{
//!     config::Config,
//!     export::export_report,
//!     session::{Session, SharedSession},
//!     types::{AngleSample, Joint, Source},
//! };
//! use std::thread;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let shared = SharedSession::new(Session::new(&Config::default())?);
//!
//! // One capture loop per stream
//! let handles: Vec<_> = [Source::Reference, Source::Live]
//!     .into_iter()
//!     .map(|source| {
//!         let shared = shared.clone();
//!         thread::spawn(move || -> pose_angle_compare::Result<()> {
//!             for i in 0..300 {
//!                 let t = f64::from(i) / 30.0;
//!                 let deg = 80.0 + 70.0 * (t / 2.0).sin();
//!                 shared.push_sample(AngleSample::new(t, Joint::RightWrist, source, deg))?;
//!             }
//!             Ok(())
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().expect("capture loop panicked")?;
//! }
//!
//! let report = shared.finish()?;
//! export_report("results", &report)?;
//! # Ok(())
//! # }
//! ```

/// Joint, stream, and sample types shared across the crate
pub mod types;

/// Landmark indices and default thresholds
pub mod constants;

/// Error types and result handling
pub mod error;

/// Limb and joint angle computation
pub mod geometry;

/// Pose landmark frames and tabular landmark input
pub mod landmarks;

/// Running min/max of the reference stream and latest live angle
pub mod tracker;

/// Injectable wall clock for event timestamps
pub mod clock;

/// Match events and the deduplicating event log
pub mod events;

/// Real-time tolerance matching against the reference extrema
pub mod matcher;

/// Three-sample local peak detection
pub mod peak_detector;

/// Debounced extremum extraction over a finished series
pub mod extrema;

/// Nearest-in-time correlation of reference and live extrema
pub mod correlation;

/// Session orchestration for both streams
pub mod session;

/// CSV and JSON exports
pub mod export;

/// Utility functions for rounding and numeric conversions
pub mod utils;

/// Main application module
pub mod app;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
