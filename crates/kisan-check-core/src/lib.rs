// crates/kisan-check-core/src/lib.rs
// ============================================================================
// Module: Kisan Check Core Library
// Description: Conformance checks for the farmer registry HTTP API.
// Purpose: Probe a running registry and fold every outcome into a report.
// Dependencies: reqwest, serde, serde_json, serde_jcs, thiserror, time, toml, url
// ============================================================================

//! ## Overview
//! Kisan Check exercises a remote farmer registry (`/api/health` and
//! `/api/farmers`) as a black box. The [`FarmerApiClient`] issues one blocking
//! request per probe, the [`run_conformance`] runner walks the fixed checklist,
//! and every outcome lands in a [`TestRun`] accumulator.
//! Invariants:
//! - Checks run in [`CheckId::ALL`] order, exactly once each.
//! - Probe failures are recorded, never propagated; later checks always run.
//! - Soft findings become warnings and never change a check verdict.
//!
//! Security posture: registry responses are untrusted and only inspected, never
//! executed or persisted beyond optional report artifacts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod config;
pub mod fixtures;
pub mod model;
pub mod report;
pub mod runner;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::FarmerApiClient;
pub use client::HealthStatus;
pub use client::PersistenceOutcome;
pub use client::ProbeError;
pub use client::ProbeErrorKind;
pub use config::CheckerConfig;
pub use config::ConfigError;
pub use config::ConfigOverrides;
pub use model::CheckId;
pub use model::FarmerRecord;
pub use model::StoredFarmer;
pub use report::CaseResult;
pub use report::ReportError;
pub use report::RunReport;
pub use report::RunSummary;
pub use report::TestResult;
pub use report::TestRun;
pub use runner::NoopObserver;
pub use runner::RunObserver;
pub use runner::run_conformance;
