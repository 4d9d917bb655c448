// crates/kisan-check-core/src/model.rs
// ============================================================================
// Module: Farmer Registry Model
// Description: Wire types for farmer records and the fixed check catalog.
// Purpose: Share typed records between probes, fixtures, and reports.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! [`FarmerRecord`] mirrors the registry's camelCase JSON object. Every field
//! is optional so fixtures can omit fields on purpose and responses can be
//! inspected for missing keys. [`StoredFarmer`] keeps the raw value the server
//! returned so shape checks see exactly what was sent.
//! Invariants:
//! - [`REQUIRED_RESPONSE_FIELDS`] is the contract for every stored record.
//! - [`CheckId::ALL`] is the execution order of the checklist.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Keys every farmer returned by the registry must carry.
pub const REQUIRED_RESPONSE_FIELDS: [&str; 11] = [
    "id",
    "name",
    "mobile",
    "village",
    "district",
    "state",
    "pincode",
    "farmSize",
    "cropType",
    "farmingMethod",
    "registeredAt",
];

/// Phrase ("mobile number") the registry uses in duplicate-mobile rejections.
pub const DUPLICATE_MOBILE_PHRASE: &str = "मोबाइल नंबर";

// ============================================================================
// SECTION: Farmer Record
// ============================================================================

/// Farmer registration record as sent to and returned by `/api/farmers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerRecord {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Farmer name (mandatory on registration).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Ten-digit mobile number, unique across the registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    /// Optional contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Village name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    /// District name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    /// State name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Six-digit postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    /// Farm size in acres, as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_size: Option<String>,
    /// Primary crop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_type: Option<String>,
    /// Farming method (organic, traditional, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farming_method: Option<String>,
    /// Server-assigned registration timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<String>,
}

impl FarmerRecord {
    /// Builds a registration payload with every mandatory field set.
    #[must_use]
    #[allow(clippy::too_many_arguments, reason = "Mirrors the flat registration form.")]
    pub fn registration(
        name: &str,
        mobile: &str,
        village: &str,
        district: &str,
        state: &str,
        pincode: &str,
        farm_size: &str,
        crop_type: &str,
        farming_method: &str,
    ) -> Self {
        Self {
            name: Some(name.to_string()),
            mobile: Some(mobile.to_string()),
            village: Some(village.to_string()),
            district: Some(district.to_string()),
            state: Some(state.to_string()),
            pincode: Some(pincode.to_string()),
            farm_size: Some(farm_size.to_string()),
            crop_type: Some(crop_type.to_string()),
            farming_method: Some(farming_method.to_string()),
            ..Self::default()
        }
    }

    /// Sets the optional email.
    #[must_use]
    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }
}

// ============================================================================
// SECTION: Stored Farmers
// ============================================================================

/// A farmer value returned by the registry, kept verbatim for shape checks.
///
/// Listing entries are not required to be objects; a non-object entry simply
/// lacks every required field.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFarmer {
    /// Raw JSON value as returned by the server.
    value: Value,
}

impl StoredFarmer {
    /// Wraps a raw JSON value.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self {
            value,
        }
    }

    /// Returns the raw JSON value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the string value of `key`, if present and a string.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(Value::as_str)
    }

    /// Returns the `id` rendered as text; strings are trimmed, numbers printed.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.value.get("id")? {
            Value::String(id) => Some(id.trim().to_string()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Returns the `registeredAt` value, if present.
    #[must_use]
    pub fn registered_at(&self) -> Option<&str> {
        self.text("registeredAt")
    }

    /// Returns the `mobile` value, if present.
    #[must_use]
    pub fn mobile(&self) -> Option<&str> {
        self.text("mobile")
    }

    /// Lists the required keys this value lacks.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.value.as_object().map_or_else(|| REQUIRED_RESPONSE_FIELDS.to_vec(), missing_fields)
    }
}

/// Lists the entries of [`REQUIRED_RESPONSE_FIELDS`] absent from `object`.
#[must_use]
pub fn missing_fields(object: &Map<String, Value>) -> Vec<&'static str> {
    REQUIRED_RESPONSE_FIELDS.iter().copied().filter(|field| !object.contains_key(*field)).collect()
}

/// Parses an RFC 3339 registration timestamp.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).ok()
}

// ============================================================================
// SECTION: Check Catalog
// ============================================================================

/// The fixed conformance checklist.
///
/// # Invariants
/// - Keys are stable snake_case labels used in reports.
/// - [`CheckId::ALL`] order is the execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    /// `GET /api/health` answers `status == "ok"`.
    HealthCheck,
    /// `GET /api/farmers` answers a well-formed listing before any writes.
    GetFarmersEmpty,
    /// A write reaches the backing store (created or rejected as duplicate).
    DbConnection,
    /// A valid registration is accepted with a complete record.
    FarmerRegistration,
    /// A second registration with the same mobile is rejected.
    DuplicateCheck,
    /// The five invalid-field fixtures are rejected.
    Validation,
    /// The listing after writes is non-empty, well-shaped, and newest first.
    GetFarmersWithData,
}

impl CheckId {
    /// Every check in execution order.
    pub const ALL: [Self; 7] = [
        Self::HealthCheck,
        Self::GetFarmersEmpty,
        Self::DbConnection,
        Self::FarmerRegistration,
        Self::DuplicateCheck,
        Self::Validation,
        Self::GetFarmersWithData,
    ];

    /// Returns the stable report key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::HealthCheck => "health_check",
            Self::GetFarmersEmpty => "get_farmers_empty",
            Self::DbConnection => "db_connection",
            Self::FarmerRegistration => "farmer_registration",
            Self::DuplicateCheck => "duplicate_check",
            Self::Validation => "validation",
            Self::GetFarmersWithData => "get_farmers_with_data",
        }
    }

    /// Returns the English display title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::HealthCheck => "Health Check",
            Self::GetFarmersEmpty => "Get Farmers (Empty)",
            Self::DbConnection => "Database Connection",
            Self::FarmerRegistration => "Farmer Registration (Valid)",
            Self::DuplicateCheck => "Duplicate Mobile Check",
            Self::Validation => "Registration Validation",
            Self::GetFarmersWithData => "Get Farmers (With Data)",
        }
    }
}
