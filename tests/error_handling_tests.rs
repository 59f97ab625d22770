//! Error handling tests for all modules


use pose_angle_compare::{
    config::Config,
    error::{Error, Result},
    extrema::ExtremumExtractor,
    landmarks::{read_landmark_rows, PoseFrame},
    session::{Session, SharedSession},
    types::{AngleSample, Joint, Source},
    utils::{safe_cast::f64_to_i64, seconds_to_millis},
};
use std::io::Write;
use test_helpers::{arm_frame, samples};

#[test]
fn test_out_of_order_frame_rejected() {
    let mut session = Session::new(&Config::default()).unwrap();
    session.process_frame(Source::Reference, &arm_frame(2.0, 30.0, 30.0)).unwrap();

    let result = session.process_frame(Source::Reference, &arm_frame(1.5, 30.0, 30.0));
    match result {
        Err(Error::OutOfOrderSample {
            joint,
            stream,
            previous,
            received,
        }) => {
            assert_eq!(joint, Joint::LeftWrist);
            assert_eq!(stream, Source::Reference);
            assert_eq!(previous, 2.0);
            assert_eq!(received, 1.5);
        }
        other => panic!("Expected OutOfOrderSample, got {other:?}"),
    }

    // Nothing from the rejected frame was stored
    assert_eq!(session.series(Joint::RightWrist, Source::Reference).len(), 1);
}

#[test]
fn test_out_of_order_error_message() {
    let err = Error::OutOfOrderSample {
        joint: Joint::RightWrist,
        stream: Source::Live,
        previous: 3.0,
        received: 2.5,
    };
    assert_eq!(err.to_string(), "Out-of-order sample for rightWrist (live): 2.500s after 3.000s");
}

#[test]
fn test_missing_landmark_is_fatal() {
    let mut session = Session::new(&Config::default()).unwrap();
    let result = session.process_frame(Source::Live, &PoseFrame::new(0.0));

    assert!(matches!(result, Err(Error::MissingLandmark(11))));
}

#[test]
fn test_invalid_timestamps() {
    let mut session = Session::new(&Config::default()).unwrap();

    for timestamp in [-0.5, f64::NAN, f64::INFINITY] {
        let result = session.push_sample(AngleSample::new(timestamp, Joint::LeftWrist, Source::Live, 10.0));
        assert!(matches!(result, Err(Error::InvalidInput(_))), "Timestamp {timestamp} should be rejected");
    }

    let result = session.process_frame(Source::Live, &arm_frame(-1.0, 10.0, 10.0));
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_extractor_rejects_unsorted_series() {
    let series = samples(Joint::LeftWrist, Source::Live, &[(5.0, 10.0), (4.0, 20.0)]);
    let result = ExtremumExtractor::default().extract(&series);
    assert!(matches!(result, Err(Error::OutOfOrderSample { .. })));
}

#[test]
fn test_invalid_config_rejected_by_session() {
    let mut config = Config::default();
    config.correlation.max_angle_diff_deg = -5.0;

    match Session::new(&config) {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("Maximum angle difference")),
        Err(other) => panic!("Expected ConfigError, got {other:?}"),
        Ok(_) => panic!("Expected ConfigError"),
    }
}

#[test]
fn test_config_file_errors() {
    // Missing file
    let result = Config::from_file("/nonexistent/config.yaml");
    assert!(matches!(result, Err(Error::Io(_))));

    // Malformed YAML
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "matching: [not, a, map").unwrap();
    let result = Config::from_file(file.path());
    assert!(matches!(result, Err(Error::ConfigError(_))));

    // Unknown flag policy
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "matching:\n  flag_policy: sometimes").unwrap();
    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn test_config_round_trip_through_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.yaml");

    let mut config = Config::default();
    config.matching.tolerance_deg = 5.0;
    config.to_file(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.matching.tolerance_deg, 5.0);
    loaded.validate()
}

#[test]
fn test_landmark_table_errors() {
    let result = read_landmark_rows("/nonexistent/landmarks.csv");
    assert!(matches!(result, Err(Error::Csv(_))));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,landmark,x,y,z\n0.0,eleven,0.5,0.5,0.0").unwrap();
    let result = read_landmark_rows(file.path());
    assert!(matches!(result, Err(Error::Csv(_))));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,landmark,x,y,z\n0.0,11,0.5,0.5,0.0\n0.0,40,0.5,0.5,0.0").unwrap();
    let result = read_landmark_rows(file.path());
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_shared_session_poisoned() {
    let shared = SharedSession::new(Session::new(&Config::default()).unwrap());

    let worker = shared.clone();
    let handle = std::thread::spawn(move || {
        worker.with_session(|_session: &mut Session| -> usize { panic!("capture loop crashed") })
    });
    assert!(handle.join().is_err());

    let result = shared.push_sample(AngleSample::new(0.0, Joint::LeftWrist, Source::Live, 10.0));
    assert!(matches!(result, Err(Error::SessionPoisoned)));
    assert!(matches!(shared.finish(), Err(Error::SessionPoisoned)));
}

#[test]
fn test_safe_cast_errors() {
    assert!(f64_to_i64(f64::NAN).is_err());
    assert!(f64_to_i64(1e300).is_err());
    assert!(seconds_to_millis(f64::INFINITY).is_err());
    assert_eq!(seconds_to_millis(2.0006).unwrap(), 2001);
}
