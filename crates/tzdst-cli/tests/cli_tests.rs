//! Integration tests for the `tzdst` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the zone, zones,
//! window and rules subcommands through the actual binary, against both the
//! IANA database and a JSON zone fixture.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the zones.json fixture.
fn zones_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/zones.json")
}

/// Helper: path to the broken.json fixture.
fn broken_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/broken.json")
}

/// Helper: a `tzdst` command with no configuration leaking in from the environment.
fn tzdst() -> Command {
    let mut cmd = Command::cargo_bin("tzdst").unwrap();
    cmd.env_remove("TZDST_YEAR")
        .env_remove("TZDST_FROM_YEAR")
        .env_remove("TZDST_TO_YEAR")
        .env_remove("TZDST_ZONES_FILE");
    cmd
}

/// Helper: run and parse stdout as JSON.
fn run_json(args: &[&str]) -> serde_json::Value {
    let output = tzdst().args(args).output().unwrap();
    assert!(
        output.status.success(),
        "tzdst {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// zone subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn zone_report_for_berlin() {
    let json = run_json(&[
        "zone",
        "Europe/Berlin",
        "--year",
        "2025",
        "--at",
        "2025-07-01T10:00:00Z",
    ]);

    assert_eq!(json["zone"], "Europe/Berlin");
    assert_eq!(json["currentTime"], "2025-07-01T12:00:00");
    assert_eq!(json["isDst"], true);
    assert_eq!(json["dstStart"], "2025-03-30T02:00:00");
    assert_eq!(json["dstEnd"], "2025-10-26T03:00:00");
}

#[test]
fn zone_accepts_windows_id() {
    let json = run_json(&[
        "zone",
        "W. Europe Standard Time",
        "--year",
        "2025",
        "--at",
        "2025-01-15T10:00:00Z",
    ]);

    assert_eq!(json["zone"], "Europe/Berlin");
    assert_eq!(json["isDst"], false);
    assert_eq!(json["dstStart"], "2025-03-30T02:00:00");
}

#[test]
fn zone_year_defaults_to_current_year_in_zone() {
    // 23:30 UTC on New Year's Eve is already 2026 in Berlin.
    let json = run_json(&["zone", "Europe/Berlin", "--at", "2025-12-31T23:30:00Z"]);
    assert_eq!(json["currentTime"], "2026-01-01T00:30:00");
    assert_eq!(json["dstStart"], "2026-03-29T02:00:00");
}

#[test]
fn zone_year_from_environment() {
    let output = tzdst()
        .env("TZDST_YEAR", "2024")
        .args(["zone", "Europe/Berlin", "--at", "2025-07-01T10:00:00Z"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["dstStart"], "2024-03-31T02:00:00");
}

#[test]
fn zone_without_dst_has_null_window() {
    let json = run_json(&["zone", "Asia/Tokyo", "--year", "2025"]);
    assert_eq!(json["isDst"], false);
    assert!(json["dstStart"].is_null());
    assert!(json["dstEnd"].is_null());
}

#[test]
fn unknown_zone_fails() {
    tzdst()
        .args(["zone", "Mars/Olympus_Mons"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mars/Olympus_Mons"));
}

#[test]
fn invalid_instant_fails() {
    tzdst()
        .args(["zone", "Europe/Berlin", "--at", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RFC 3339"));
}

// ─────────────────────────────────────────────────────────────────────────────
// zones subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn zones_reports_each_zone_in_order() {
    let json = run_json(&[
        "zones",
        "Europe/Berlin",
        "America/New_York",
        "Australia/Sydney",
        "--year",
        "2025",
        "--at",
        "2025-01-15T12:00:00Z",
    ]);

    let reports = json.as_array().expect("array of reports");
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0]["zone"], "Europe/Berlin");
    assert_eq!(reports[1]["dstStart"], "2025-03-09T02:00:00");
    assert_eq!(reports[1]["dstEnd"], "2025-11-02T02:00:00");
    assert_eq!(reports[2]["isDst"], true);
    assert_eq!(reports[2]["dstStart"], "2025-10-05T02:00:00");
    assert_eq!(reports[2]["dstEnd"], "2025-04-06T03:00:00");
}

#[test]
fn zones_fails_when_any_zone_is_unknown() {
    tzdst()
        .args(["zones", "Europe/Berlin", "Atlantis/Capital"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Could not find timezone"));
}

#[test]
fn zones_requires_at_least_one_zone() {
    tzdst().arg("zones").assert().failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// window and rules subcommands
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn window_for_new_york() {
    let json = run_json(&["window", "America/New_York", "--year", "2025"]);
    assert_eq!(json["dstStart"], "2025-03-09T02:00:00");
    assert_eq!(json["dstEnd"], "2025-11-02T02:00:00");
}

#[test]
fn window_outside_rule_span_is_null() {
    let json = run_json(&[
        "window",
        "Europe/Berlin",
        "--year",
        "2025",
        "--from-year",
        "2000",
        "--to-year",
        "2010",
    ]);
    assert!(json.is_null());
}

#[test]
fn inverted_year_span_fails() {
    tzdst()
        .args(["rules", "Europe/Berlin", "--from-year", "2030", "--to-year", "2020"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--from-year"));
}

#[test]
fn rules_lists_floating_transitions() {
    let json = run_json(&[
        "rules",
        "Europe/Berlin",
        "--from-year",
        "2000",
        "--to-year",
        "2030",
    ]);

    let rules = json.as_array().expect("array of rules");
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0]["date_start"], "2000-01-01");
    assert_eq!(rules[0]["date_end"], "2030-12-31");
    assert_eq!(rules[0]["daylight_transition_start"]["kind"], "floating");
    assert_eq!(rules[0]["daylight_transition_start"]["week"], "last");
    assert_eq!(rules[0]["daylight_transition_end"]["time_of_day"], "03:00:00");
}

// ─────────────────────────────────────────────────────────────────────────────
// --zones-file
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn zones_file_replaces_iana_database() {
    let json = run_json(&[
        "--zones-file",
        zones_json_path(),
        "zone",
        "Test/Eastern",
        "--year",
        "2025",
        "--at",
        "2025-06-01T12:00:00Z",
    ]);

    assert_eq!(json["currentTime"], "2025-06-01T08:00:00");
    assert_eq!(json["isDst"], true);
    assert_eq!(json["dstStart"], "2025-03-09T02:00:00");
    assert_eq!(json["dstEnd"], "2025-11-02T02:00:00");

    tzdst()
        .args(["--zones-file", zones_json_path(), "zone", "Europe/Berlin"])
        .assert()
        .failure();
}

#[test]
fn zones_file_invalid_fixed_date_fails() {
    tzdst()
        .args([
            "--zones-file",
            zones_json_path(),
            "window",
            "Test/BadFixed",
            "--year",
            "2025",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2025-02-30"));
}

#[test]
fn zones_file_missing_fails() {
    tzdst()
        .args(["--zones-file", "/nonexistent/zones.json", "zone", "Test/Eastern"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn zones_file_malformed_fails() {
    tzdst()
        .args(["--zones-file", broken_json_path(), "zone", "Test/Eastern"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse zone definitions"));
}

// ─────────────────────────────────────────────────────────────────────────────
// General
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    tzdst()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("zone"))
        .stdout(predicate::str::contains("window"))
        .stdout(predicate::str::contains("rules"));
}

#[test]
fn unknown_subcommand_fails() {
    tzdst()
        .arg("bogus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("unrecognized")));
}
