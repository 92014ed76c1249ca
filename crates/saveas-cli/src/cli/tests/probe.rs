//! Tests for probe, config, completions and man.

use super::parse;
use crate::cli::{Cli, CliCommand, Profile};
use clap::Parser;

#[test]
fn cli_parse_probe_defaults() {
    match parse(&["saveas", "probe"]) {
        CliCommand::Probe {
            profile,
            user_agent,
            no_download_attr,
            legacy_blob,
            safari,
            no_file_reader,
            json,
        } => {
            assert_eq!(profile, Profile::Desktop);
            assert!(user_agent.is_none());
            assert!(!no_download_attr);
            assert!(!legacy_blob);
            assert!(!safari);
            assert!(!no_file_reader);
            assert!(!json);
        }
        _ => panic!("expected Probe"),
    }
}

#[test]
fn cli_parse_probe_overrides() {
    match parse(&[
        "saveas",
        "probe",
        "--profile",
        "old-safari",
        "--user-agent",
        "Custom/1.0",
        "--no-download-attr",
        "--legacy-blob",
        "--json",
    ]) {
        CliCommand::Probe {
            profile,
            user_agent,
            no_download_attr,
            legacy_blob,
            json,
            ..
        } => {
            assert_eq!(profile, Profile::OldSafari);
            assert_eq!(user_agent.as_deref(), Some("Custom/1.0"));
            assert!(no_download_attr);
            assert!(legacy_blob);
            assert!(json);
        }
        _ => panic!("expected Probe"),
    }
}

#[test]
fn cli_parse_probe_rejects_unknown_profile() {
    assert!(Cli::try_parse_from(["saveas", "probe", "--profile", "netscape"]).is_err());
}

#[test]
fn profiles_map_to_host_profiles() {
    assert!(!Profile::Headless.host_profile().has_document);
    assert!(Profile::LegacyBlob.host_profile().legacy_save_blob);
    assert!(Profile::OldSafari.host_profile().safari_family);
    assert!(Profile::Desktop.host_profile().anchor_download);
}

#[test]
fn cli_parse_config() {
    match parse(&["saveas", "config"]) {
        CliCommand::Config => {}
        _ => panic!("expected Config"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["saveas", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_man() {
    match parse(&["saveas", "man"]) {
        CliCommand::Man => {}
        _ => panic!("expected Man"),
    }
}
