//! End-of-session tabular and JSON exports.
//!
//! Column names and row order are consumed by spreadsheet tooling and must
//! stay stable.

use crate::correlation::CorrelationResult;
use crate::events::MatchEvent;
use crate::extrema::ExtremumPoint;
use crate::session::SessionReport;
use crate::types::{AngleSample, Joint, Source};
use crate::utils::format_timestamp;
use crate::Result;
use log::info;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header of the raw angle series table
pub const ANGLE_SERIES_HEADER: [&str; 3] = ["Timestamp", "Wrist", "Degrees"];

/// Header of the extrema table
pub const EXTREMA_HEADER: [&str; 4] = ["Wrist", "MinMax", "Timestamp", "Deg"];

/// Header of the correlation table
pub const CORRELATION_HEADER: [&str; 7] = [
    "ClipMinMax",
    "ClipTimestamp",
    "ClipDeg",
    "PatientMinMax",
    "PatientTimestamp",
    "PatientDeg",
    "Comments",
];

/// Write raw angle samples, one row per sample in the given order
pub fn write_angle_series<W: Write>(writer: W, samples: &[AngleSample]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(ANGLE_SERIES_HEADER)?;

    for sample in samples {
        csv.write_record([
            format_timestamp(sample.timestamp),
            sample.joint.key().to_string(),
            format!("{:.2}", sample.degrees),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Write extracted points grouped by joint, each group in series order
pub fn write_extrema<'a, W, I>(writer: W, groups: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = (Joint, &'a [ExtremumPoint])>,
{
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(EXTREMA_HEADER)?;

    for (joint, points) in groups {
        for point in points {
            csv.write_record([
                joint.key().to_string(),
                point.category.label().to_string(),
                format_timestamp(point.timestamp),
                point.degrees.to_string(),
            ])?;
        }
    }

    csv.flush()?;
    Ok(())
}

/// Write one joint's correlation table in reference order.
///
/// A reference point without any live counterpart leaves the three patient
/// cells empty.
pub fn write_correlation<W: Write>(writer: W, results: &[CorrelationResult]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CORRELATION_HEADER)?;

    for result in results {
        let (patient_category, patient_timestamp, patient_degrees) = match &result.live_match {
            Some(m) => (
                m.point.category.label().to_string(),
                format_timestamp(m.point.timestamp),
                m.point.degrees.to_string(),
            ),
            None => (String::new(), String::new(), String::new()),
        };

        csv.write_record([
            result.reference.category.label().to_string(),
            format_timestamp(result.reference.timestamp),
            result.reference.degrees.to_string(),
            patient_category,
            patient_timestamp,
            patient_degrees,
            result.verdict.label().to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Write the event log as a JSON array
pub fn write_event_log<W: Write>(writer: W, events: &[MatchEvent]) -> Result<()> {
    serde_json::to_writer_pretty(writer, events)?;
    Ok(())
}

/// File name of the raw series table for one stream
#[must_use]
pub fn angle_series_file_name(source: Source) -> String {
    format!("{source}_angles.csv")
}

/// File name of the extrema table for one stream
#[must_use]
pub fn extrema_file_name(source: Source) -> String {
    format!("{source}_extrema.csv")
}

/// File name of the correlation table for one joint
#[must_use]
pub fn correlation_file_name(joint: Joint) -> String {
    format!("correlation_{}.csv", joint.key())
}

/// File name of the event log
pub const EVENT_LOG_FILE_NAME: &str = "match_events.json";

/// Write every table and the event log into `dir`, creating it if needed.
///
/// Returns the written paths in a stable order.
pub fn export_report<P: AsRef<Path>>(dir: P, report: &SessionReport) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();

    for source in [Source::Reference, Source::Live] {
        let samples: Vec<AngleSample> = report
            .joints
            .iter()
            .flat_map(|(_, joint)| joint.series[source].iter().copied())
            .collect();
        let path = dir.join(angle_series_file_name(source));
        write_angle_series(File::create(&path)?, &samples)?;
        written.push(path);

        let groups = report
            .joints
            .iter()
            .map(|(joint, joint_report)| (joint, joint_report.extraction[source].points.as_slice()));
        let path = dir.join(extrema_file_name(source));
        write_extrema(File::create(&path)?, groups)?;
        written.push(path);
    }

    for (joint, joint_report) in report.joints.iter() {
        let path = dir.join(correlation_file_name(joint));
        write_correlation(File::create(&path)?, &joint_report.correlation)?;
        written.push(path);
    }

    let path = dir.join(EVENT_LOG_FILE_NAME);
    write_event_log(File::create(&path)?, &report.events)?;
    written.push(path);

    info!("Exported {} files to {}", written.len(), dir.display());
    Ok(written)
}
