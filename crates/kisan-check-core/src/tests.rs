// crates/kisan-check-core/src/tests.rs
// ============================================================================
// Module: Kisan Check Core Unit Tests
// Description: Unit coverage for fixtures, listing helpers, and reports.
// Purpose: Validate the pure logic that does not need a live registry.
// Dependencies: serde_json, tempfile
// ============================================================================

//! ## Overview
//! Unit coverage for fixture integrity, listing order checks, and the run
//! accumulator. Registry behaviour is covered by the integration tests.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::client::ProbeError;
use crate::client::ProbeErrorKind;
use crate::client::contains_ignore_case;
use crate::client::preview;
use crate::fixtures;
use crate::model::CheckId;
use crate::model::FarmerRecord;
use crate::model::REQUIRED_RESPONSE_FIELDS;
use crate::model::StoredFarmer;
use crate::report::CaseResult;
use crate::report::TestResult;
use crate::report::TestRun;
use crate::runner::sorted_newest_first;

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|ch| ch.is_ascii_digit())
}

/// Counts the registry rules `record` violates.
fn violations(record: &FarmerRecord) -> usize {
    let mandatory = [
        &record.name,
        &record.mobile,
        &record.village,
        &record.district,
        &record.state,
        &record.pincode,
        &record.farm_size,
        &record.crop_type,
        &record.farming_method,
    ];
    let missing = mandatory.iter().filter(|field| field.is_none()).count();
    let bad_mobile = record.mobile.as_deref().is_some_and(|mobile| !is_digits(mobile, 10));
    let bad_pincode = record.pincode.as_deref().is_some_and(|pincode| !is_digits(pincode, 6));
    missing + usize::from(bad_mobile) + usize::from(bad_pincode)
}

fn listed(registered_at: Option<&str>, mobile: &str) -> StoredFarmer {
    let mut fields = Map::new();
    for key in REQUIRED_RESPONSE_FIELDS {
        fields.insert(key.to_string(), Value::String(format!("{key}-value")));
    }
    fields.insert("mobile".to_string(), Value::String(mobile.to_string()));
    match registered_at {
        Some(value) => {
            fields.insert("registeredAt".to_string(), Value::String(value.to_string()));
        }
        None => {
            fields.remove("registeredAt");
        }
    }
    StoredFarmer::new(Value::Object(fields))
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

#[test]
fn positive_fixtures_satisfy_every_rule() {
    for record in [
        fixtures::valid_registration(),
        fixtures::duplicate_registration(),
        fixtures::persistence_probe(),
    ] {
        assert_eq!(violations(&record), 0, "fixture {record:?} should be valid");
    }
}

#[test]
fn duplicate_fixture_reuses_registered_mobile() {
    assert_eq!(
        fixtures::valid_registration().mobile,
        fixtures::duplicate_registration().mobile
    );
    assert_ne!(
        fixtures::valid_registration().name,
        fixtures::duplicate_registration().name
    );
}

#[test]
fn validation_cases_break_exactly_one_rule() {
    let cases = fixtures::validation_cases();
    assert_eq!(cases.len(), 5);
    for case in &cases {
        assert_eq!(violations(&case.record), 1, "case {} must break one rule", case.name);
        assert_ne!(case.record.mobile.as_deref(), Some(fixtures::REGISTERED_MOBILE));
        assert_ne!(case.record.mobile.as_deref(), Some(fixtures::PERSISTENCE_PROBE_MOBILE));
    }
}

#[test]
fn registration_payload_uses_camel_case_and_omits_unset_fields() {
    let value = serde_json::to_value(fixtures::persistence_probe()).expect("serialize");
    let object = value.as_object().expect("object");
    assert!(object.contains_key("farmSize"));
    assert!(object.contains_key("farmingMethod"));
    assert!(!object.contains_key("email"));
    assert!(!object.contains_key("id"));
    assert!(!object.contains_key("registeredAt"));
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

#[test]
fn contains_ignore_case_matches_mixed_case() {
    assert!(contains_ignore_case("Invalid Mobile Number. Must be 10 digits.", "invalid mobile"));
    assert!(contains_ignore_case("इस मोबाइल नंबर से पहले", "मोबाइल नंबर"));
    assert!(!contains_ignore_case("pincode is required", "name is required"));
}

#[test]
fn preview_truncates_long_bodies() {
    let long = "x".repeat(600);
    let short = preview(&long);
    assert!(short.ends_with("..."));
    assert_eq!(short.chars().count(), 515);
    assert_eq!(preview("short"), "short");
}

#[test]
fn stored_farmer_reports_missing_fields() {
    let complete = listed(Some("2026-01-01T00:00:00.000Z"), "9876543210");
    assert!(complete.missing_fields().is_empty());
    let partial = listed(None, "9876543210");
    assert_eq!(partial.missing_fields(), vec!["registeredAt"]);
    let scalar = StoredFarmer::new(json!("farmer"));
    assert_eq!(scalar.missing_fields(), REQUIRED_RESPONSE_FIELDS.to_vec());
}

#[test]
fn stored_farmer_renders_string_and_numeric_ids() {
    assert_eq!(StoredFarmer::new(json!({ "id": "  abc  " })).id().as_deref(), Some("abc"));
    assert_eq!(StoredFarmer::new(json!({ "id": 7 })).id().as_deref(), Some("7"));
    assert_eq!(StoredFarmer::new(json!({ "id": null })).id(), None);
}

#[test]
fn error_kinds_classify_variants() {
    let status = ProbeError::Status {
        expected: 201,
        actual: 500,
        body: String::new(),
    };
    assert_eq!(status.kind(), ProbeErrorKind::Shape);
    let transport = ProbeError::Transport {
        message: "refused".to_string(),
    };
    assert_eq!(transport.kind(), ProbeErrorKind::Transport);
    assert!(transport.to_string().contains("refused"));
}

// ============================================================================
// SECTION: Listing Order
// ============================================================================

#[test]
fn sorted_newest_first_accepts_descending_and_ties() {
    let farmers = vec![
        listed(Some("2026-01-01T00:00:05.000Z"), "1111111111"),
        listed(Some("2026-01-01T00:00:05.000Z"), "2222222222"),
        listed(Some("2026-01-01T00:00:01.000Z"), "3333333333"),
    ];
    assert!(sorted_newest_first(&farmers));
    assert!(sorted_newest_first(&farmers[..1]));
    assert!(sorted_newest_first(&[]));
}

#[test]
fn sorted_newest_first_checks_the_whole_sequence() {
    let farmers = vec![
        listed(Some("2026-01-01T00:00:05.000Z"), "1111111111"),
        listed(Some("2026-01-01T00:00:04.000Z"), "2222222222"),
        listed(Some("2026-01-01T00:00:09.000Z"), "3333333333"),
    ];
    assert!(!sorted_newest_first(&farmers));
}

#[test]
fn sorted_newest_first_compares_offsets_chronologically() {
    let farmers = vec![
        listed(Some("2026-01-01T05:00:00+05:30"), "1111111111"),
        listed(Some("2026-01-01T00:00:00Z"), "2222222222"),
    ];
    assert!(!sorted_newest_first(&farmers));
}

// ============================================================================
// SECTION: Run Accumulator
// ============================================================================

#[test]
fn test_run_tallies_and_replaces_results() {
    let mut run = TestRun::new("http://registry.test/api");
    run.record(TestResult::pass(CheckId::HealthCheck, "ok"));
    run.record(TestResult::failed(CheckId::DuplicateCheck, ProbeErrorKind::Shape, "nope"));
    assert_eq!(run.summary().passed, 1);
    assert_eq!(run.summary().total, 2);
    assert!(!run.succeeded());
    assert_eq!(run.exit_status(), 1);

    run.record(TestResult::pass(CheckId::DuplicateCheck, "now ok"));
    assert_eq!(run.results().len(), 2);
    assert_eq!(run.results()[1].check, CheckId::DuplicateCheck);
    assert!(run.succeeded());
    assert_eq!(run.exit_status(), 0);
    assert_eq!(run.get(CheckId::DuplicateCheck).map(|r| r.message.as_str()), Some("now ok"));
}

#[test]
fn warnings_do_not_change_the_verdict() {
    let mut run = TestRun::new("http://registry.test/api");
    run.record(
        TestResult::pass(CheckId::GetFarmersWithData, "Retrieved 2 farmers")
            .with_warning("Farmers are not sorted by registeredAt (newest first)"),
    );
    let summary = run.summary();
    assert_eq!(summary.warnings, 1);
    assert!(summary.succeeded());
    assert_eq!(run.exit_status(), 0);
}

#[test]
fn report_renders_markdown_sections() {
    let mut run = TestRun::new("http://registry.test/api");
    run.record(
        TestResult::failed(CheckId::Validation, ProbeErrorKind::Semantic, "4/5")
            .with_sub_results(vec![
                CaseResult::pass("Missing Name", "Correctly rejected: name is required"),
                CaseResult::fail(
                    "Invalid Pincode (5 digits)",
                    &ProbeError::Semantic {
                        expected: "error containing \"Invalid pincode\"".to_string(),
                        actual: "error \"boom\"".to_string(),
                    },
                ),
            ]),
    );
    run.finish();
    let markdown = run.report().expect("report").render_markdown();
    assert!(markdown.contains("## Status"));
    assert!(markdown.contains("- Result: 0/1 checks passed"));
    assert!(markdown.contains("[FAIL] Registration Validation (`validation`): 4/5"));
    assert!(markdown.contains("  - [PASS] Missing Name"));
    assert!(markdown.contains("## Warnings\n\n- None"));
}

#[test]
fn report_writes_canonical_json() {
    let mut run = TestRun::new("http://registry.test/api");
    run.record(
        TestResult::pass(CheckId::HealthCheck, "Server is running properly")
            .with_details(json!({ "status": "ok" })),
    );
    run.finish();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("report.json");
    run.report().expect("report").write_json(&path).expect("write json");

    let bytes = std::fs::read(&path).expect("read json");
    let value: Value = serde_json::from_slice(&bytes).expect("parse json");
    assert_eq!(value["api_root"], "http://registry.test/api");
    assert_eq!(value["summary"]["passed"], 1);
    assert_eq!(value["summary"]["total"], 1);
    assert_eq!(value["succeeded"], true);
    assert_eq!(value["results"][0]["check"], "health_check");
    assert!(value["results"][0].get("warnings").is_none());
    let text = String::from_utf8(bytes).expect("utf8");
    assert!(!text.contains('\n'), "canonical JSON is compact");
}

#[test]
fn report_write_reports_io_errors() {
    let run = TestRun::new("http://registry.test/api");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("report.md");
    let err = run.report().expect("report").write_markdown(&path).expect_err("missing dir");
    assert!(err.to_string().contains("report.md"));
}
