// crates/kisan-check-core/src/runner.rs
// ============================================================================
// Module: Conformance Runner
// Description: Sequential execution of the fixed registry checklist.
// Purpose: Turn probe outcomes into ordered results without aborting early.
// Dependencies: crate::client, crate::fixtures, crate::report, tracing
// ============================================================================

//! ## Overview
//! [`run_conformance`] walks [`CheckId::ALL`] once, in order, and records one
//! [`TestResult`] per check. Probe errors are converted into failed results on
//! the spot, so a failing step never halts later steps.
//! Invariants:
//! - No branching, no retries, no cleanup of written records.
//! - The observer sees `check_started` before `check_finished` for each check.
//! - Listing order and listing membership are soft checks (warnings only).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::time::Instant;

use serde_json::json;

use crate::client::FarmerApiClient;
use crate::client::PersistenceOutcome;
use crate::client::ProbeErrorKind;
use crate::fixtures;
use crate::fixtures::REGISTERED_MOBILE;
use crate::model::CheckId;
use crate::model::DUPLICATE_MOBILE_PHRASE;
use crate::model::StoredFarmer;
use crate::model::parse_timestamp;
use crate::report::CaseResult;
use crate::report::TestResult;
use crate::report::TestRun;

// ============================================================================
// SECTION: Observer
// ============================================================================

/// Progress hooks invoked while the checklist runs.
pub trait RunObserver {
    /// Called before `check` issues its first request.
    fn check_started(&mut self, check: CheckId);

    /// Called once `result` is final.
    fn check_finished(&mut self, result: &TestResult);
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn check_started(&mut self, _check: CheckId) {}

    fn check_finished(&mut self, _result: &TestResult) {}
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runs every check against the registry behind `client`.
///
/// Always returns a finished run with one result per check; callers decide
/// the exit status from [`TestRun::succeeded`].
pub fn run_conformance(client: &FarmerApiClient, observer: &mut dyn RunObserver) -> TestRun {
    let mut run = TestRun::new(client.api_root());
    for check in CheckId::ALL {
        observer.check_started(check);
        let started = Instant::now();
        let result = execute(client, check).with_duration(started.elapsed());
        tracing::debug!(
            check = check.key(),
            passed = result.passed,
            duration_ms = result.duration_ms,
            "check finished"
        );
        observer.check_finished(&result);
        run.record(result);
    }
    run.finish();
    run
}

/// Dispatches a single check.
fn execute(client: &FarmerApiClient, check: CheckId) -> TestResult {
    match check {
        CheckId::HealthCheck => health_check(client),
        CheckId::GetFarmersEmpty => list_before_writes(client),
        CheckId::DbConnection => db_connection(client),
        CheckId::FarmerRegistration => farmer_registration(client),
        CheckId::DuplicateCheck => duplicate_check(client),
        CheckId::Validation => validation(client),
        CheckId::GetFarmersWithData => list_with_data(client),
    }
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// `GET /api/health`.
fn health_check(client: &FarmerApiClient) -> TestResult {
    let check = CheckId::HealthCheck;
    match client.check_health() {
        Ok(health) => TestResult::pass(check, "Server is running properly").with_details(json!({
            "status": health.status,
            "message": health.message,
        })),
        Err(err) => TestResult::from_error(check, &err),
    }
}

/// `GET /api/farmers` before this run writes anything.
fn list_before_writes(client: &FarmerApiClient) -> TestResult {
    let check = CheckId::GetFarmersEmpty;
    match client.list_farmers() {
        Ok(farmers) => TestResult::pass(check, format!("Retrieved {} farmers", farmers.len()))
            .with_details(json!({ "count": farmers.len() })),
        Err(err) => TestResult::from_error(check, &err),
    }
}

/// Throwaway write proving the backing store is reachable.
fn db_connection(client: &FarmerApiClient) -> TestResult {
    let check = CheckId::DbConnection;
    match client.probe_persistence(&fixtures::persistence_probe()) {
        Ok(PersistenceOutcome::Registered) => {
            TestResult::pass(check, "Database connection working - farmer registered")
        }
        Ok(PersistenceOutcome::DuplicateDetected) => {
            TestResult::pass(check, "Database connection working - duplicate detection working")
        }
        Err(err) => TestResult::from_error(check, &err),
    }
}

/// Registers the valid fixture.
fn farmer_registration(client: &FarmerApiClient) -> TestResult {
    let check = CheckId::FarmerRegistration;
    match client.register_farmer(&fixtures::valid_registration()) {
        Ok(stored) => {
            let id = stored.id().unwrap_or_default();
            TestResult::pass(check, format!("Farmer registered successfully with ID: {id}"))
                .with_details(json!({
                    "id": id,
                    "mobile": stored.mobile(),
                    "registeredAt": stored.registered_at(),
                }))
        }
        Err(err) => TestResult::from_error(check, &err),
    }
}

/// Re-registers the mobile claimed by the valid registration.
fn duplicate_check(client: &FarmerApiClient) -> TestResult {
    let check = CheckId::DuplicateCheck;
    match client.expect_rejection(&fixtures::duplicate_registration(), DUPLICATE_MOBILE_PHRASE) {
        Ok(error) => TestResult::pass(check, "Correctly rejected duplicate mobile number")
            .with_details(json!({ "error": error })),
        Err(err) => TestResult::from_error(check, &err),
    }
}

/// Runs the validation table and folds it into one result.
fn validation(client: &FarmerApiClient) -> TestResult {
    let check = CheckId::Validation;
    let cases = fixtures::validation_cases();
    let total = cases.len();
    let mut first_failure: Option<ProbeErrorKind> = None;
    let sub_results: Vec<CaseResult> = cases
        .iter()
        .map(|case| match client.expect_rejection(&case.record, case.expected_error) {
            Ok(error) => CaseResult::pass(case.name, format!("Correctly rejected: {error}")),
            Err(err) => {
                first_failure.get_or_insert(err.kind());
                CaseResult::fail(case.name, &err)
            }
        })
        .collect();
    let passed = sub_results.iter().filter(|case| case.passed).count();
    let message = format!("{passed}/{total} validation cases rejected as expected");
    let result = match first_failure {
        None => TestResult::pass(check, message),
        Some(kind) => TestResult::failed(check, kind, message),
    };
    result.with_sub_results(sub_results)
}

/// `GET /api/farmers` after the writes above.
fn list_with_data(client: &FarmerApiClient) -> TestResult {
    let check = CheckId::GetFarmersWithData;
    let farmers = match client.list_farmers() {
        Ok(farmers) => farmers,
        Err(err) => return TestResult::from_error(check, &err),
    };
    let Some(first) = farmers.first() else {
        return TestResult::failed(
            check,
            ProbeErrorKind::Semantic,
            "No farmers found after registration",
        );
    };
    let missing = first.missing_fields();
    if !missing.is_empty() {
        return TestResult::failed(
            check,
            ProbeErrorKind::Shape,
            format!("Missing fields in farmer record: {}", missing.join(", ")),
        );
    }
    let mut result = TestResult::pass(check, format!("Retrieved {} farmers", farmers.len()))
        .with_details(json!({ "count": farmers.len() }));
    if !sorted_newest_first(&farmers) {
        result = result.with_warning("Farmers are not sorted by registeredAt (newest first)");
    }
    if !farmers.iter().any(|farmer| farmer.mobile() == Some(REGISTERED_MOBILE)) {
        result = result.with_warning(format!(
            "Listing does not contain the farmer with mobile {REGISTERED_MOBILE}"
        ));
    }
    result
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when `registeredAt` is non-increasing across the listing.
///
/// Parsed timestamps are compared when both sides parse; otherwise the raw
/// strings are compared, which matches chronological order for ISO-8601 UTC.
pub(crate) fn sorted_newest_first(farmers: &[StoredFarmer]) -> bool {
    farmers.windows(2).all(|pair| match pair {
        [newer, older] => {
            compare_registered_at(newer.registered_at(), older.registered_at()) != Ordering::Less
        }
        _ => true,
    })
}

/// Orders two optional `registeredAt` values.
fn compare_registered_at(left: Option<&str>, right: Option<&str>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => match (parse_timestamp(left), parse_timestamp(right)) {
            (Some(left), Some(right)) => left.cmp(&right),
            _ => left.cmp(right),
        },
        (left, right) => left.cmp(&right),
    }
}
