//! Tests for command-line argument parsing
//!
//! Note: These tests verify the argument parser configuration by creating
//! a test parser with the same structure as the main application.

use clap::{Arg, ArgAction, Command as ClapCommand};
use std::path::PathBuf;

/// Create a command with the same argument structure as the main binary
fn create_test_command() -> ClapCommand {
    ClapCommand::new("pose-angle-compare")
        .version("0.1.0")
        .about("Compare reference and live joint-angle series at flexion extrema")
        .arg(
            Arg::new("reference")
                .short('r')
                .long("reference")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true)
                .help("Landmark CSV of the reference (clip) recording"),
        )
        .arg(
            Arg::new("live")
                .short('l')
                .long("live")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .required(true)
                .help("Landmark CSV of the live (patient) recording"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Output directory"),
        )
        .arg(
            Arg::new("config")
                .short('C')
                .long("config")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Enable debug output"),
        )
}

#[test]
fn test_help_argument() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["pose-angle-compare", "--help"]);

    // Help should cause an error (but a specific help error)
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn test_missing_required_arguments() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["pose-angle-compare"]);

    assert!(result.is_err());
    assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::MissingRequiredArgument);

    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["pose-angle-compare", "--reference", "clip.csv"]);
    assert!(result.is_err());
}

#[test]
fn test_minimal_arguments() {
    let cmd = create_test_command();
    let matches = cmd
        .try_get_matches_from(vec!["pose-angle-compare", "--reference", "clip.csv", "--live", "patient.csv"])
        .unwrap();

    assert_eq!(matches.get_one::<PathBuf>("reference"), Some(&PathBuf::from("clip.csv")));
    assert_eq!(matches.get_one::<PathBuf>("live"), Some(&PathBuf::from("patient.csv")));
    assert_eq!(matches.get_one::<PathBuf>("output"), None);
    assert_eq!(matches.get_one::<PathBuf>("config"), None);
    assert!(!matches.get_flag("debug"));
}

#[test]
fn test_short_flags() {
    let cmd = create_test_command();
    let matches = cmd
        .try_get_matches_from(vec![
            "pose-angle-compare",
            "-r",
            "clip.csv",
            "-l",
            "patient.csv",
            "-o",
            "out",
            "-C",
            "settings.yaml",
            "-d",
        ])
        .unwrap();

    assert_eq!(matches.get_one::<PathBuf>("output"), Some(&PathBuf::from("out")));
    assert_eq!(matches.get_one::<PathBuf>("config"), Some(&PathBuf::from("settings.yaml")));
    assert!(matches.get_flag("debug"));
}

#[test]
fn test_unknown_argument_rejected() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec![
        "pose-angle-compare",
        "--reference",
        "clip.csv",
        "--live",
        "patient.csv",
        "--cam",
        "0",
    ]);

    assert!(result.is_err());
    assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::UnknownArgument);
}
