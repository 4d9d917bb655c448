// crates/kisan-check-core/src/fixtures.rs
// ============================================================================
// Module: Registration Fixtures
// Description: Positive records and the invalid-field validation table.
// Purpose: Keep every request body the checker sends in one place.
// Dependencies: crate::model
// ============================================================================

//! ## Overview
//! Positive fixtures use realistic Hindi sample data. The validation table
//! holds five records that each break exactly one registry rule, paired with
//! the substring the rejection message must contain.
//! Invariants:
//! - [`duplicate_registration`] reuses the mobile of [`valid_registration`].
//! - Validation mobiles never collide with the positive fixtures, so a
//!   validation case is never rejected as a duplicate instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::model::FarmerRecord;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Mobile registered by the valid registration and reused by the duplicate check.
pub const REGISTERED_MOBILE: &str = "9876543210";

/// Mobile used by the persistence probe.
pub const PERSISTENCE_PROBE_MOBILE: &str = "9999999999";

// ============================================================================
// SECTION: Positive Fixtures
// ============================================================================

/// A complete, valid registration.
#[must_use]
pub fn valid_registration() -> FarmerRecord {
    FarmerRecord::registration(
        "राजेश कुमार",
        REGISTERED_MOBILE,
        "सरायपुर",
        "मेरठ",
        "उत्तर प्रदेश",
        "250001",
        "2.5",
        "धान",
        "जैविक",
    )
    .with_email("rajesh@example.com")
}

/// A different farmer claiming the mobile of [`valid_registration`].
#[must_use]
pub fn duplicate_registration() -> FarmerRecord {
    FarmerRecord::registration(
        "सुरेश कुमार",
        REGISTERED_MOBILE,
        "रामपुर",
        "गाजियाबाद",
        "उत्तर प्रदेश",
        "201001",
        "1.5",
        "गेहूं",
        "पारंपरिक",
    )
    .with_email("suresh@example.com")
}

/// Throwaway record written to prove the backing store is reachable.
#[must_use]
pub fn persistence_probe() -> FarmerRecord {
    FarmerRecord::registration(
        "डेटाबेस टेस्ट",
        PERSISTENCE_PROBE_MOBILE,
        "टेस्ट गांव",
        "टेस्ट जिला",
        "टेस्ट राज्य",
        "999999",
        "1.0",
        "टेस्ट फसल",
        "टेस्ट विधि",
    )
}

// ============================================================================
// SECTION: Validation Table
// ============================================================================

/// One negative registration case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationCase {
    /// Case label used in reports.
    pub name: &'static str,
    /// Record with exactly one invalid field.
    pub record: FarmerRecord,
    /// Substring the rejection message must contain (case-insensitive).
    pub expected_error: &'static str,
}

/// Valid baseline for the validation table, varied per case by `mobile`.
fn validation_baseline(mobile: &str) -> FarmerRecord {
    FarmerRecord::registration(
        "Test Farmer",
        mobile,
        "Test Village",
        "Test District",
        "Test State",
        "123456",
        "1.0",
        "Test Crop",
        "Test Method",
    )
}

/// The five invalid-field cases, in execution order.
#[must_use]
pub fn validation_cases() -> Vec<ValidationCase> {
    vec![
        ValidationCase {
            name: "Missing Name",
            record: FarmerRecord {
                name: None,
                ..validation_baseline("9876543211")
            },
            expected_error: "name is required",
        },
        ValidationCase {
            name: "Invalid Mobile (9 digits)",
            record: validation_baseline("987654321"),
            expected_error: "Invalid mobile number",
        },
        ValidationCase {
            name: "Invalid Mobile (11 digits)",
            record: validation_baseline("98765432111"),
            expected_error: "Invalid mobile number",
        },
        ValidationCase {
            name: "Invalid Pincode (5 digits)",
            record: FarmerRecord {
                pincode: Some("12345".to_string()),
                ..validation_baseline("9876543212")
            },
            expected_error: "Invalid pincode",
        },
        ValidationCase {
            name: "Invalid Pincode (7 digits)",
            record: FarmerRecord {
                pincode: Some("1234567".to_string()),
                ..validation_baseline("9876543213")
            },
            expected_error: "Invalid pincode",
        },
    ]
}
