// crates/kisan-check-core/src/client.rs
// ============================================================================
// Module: Farmer Registry Client
// Description: Blocking HTTP probes against the farmer registry API.
// Purpose: Send one request per probe and classify the response.
// Dependencies: reqwest, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`FarmerApiClient`] wraps a blocking `reqwest` client bound to the registry
//! API root. Each probe builds one request, sends it, branches on the status
//! code, decodes JSON, and asserts the response shape.
//! Invariants:
//! - Every request carries the configured timeout and `Accept: application/json`.
//! - Probes never retry; failures come back as [`ProbeError`] values.
//! - Transport, shape, and semantic failures stay distinguishable via
//!   [`ProbeError::kind`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Instant;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::CheckerConfig;
use crate::model::DUPLICATE_MOBILE_PHRASE;
use crate::model::FarmerRecord;
use crate::model::StoredFarmer;
use crate::model::parse_timestamp;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Health endpoint path relative to the API root.
const HEALTH_PATH: &str = "/health";
/// Farmer collection path relative to the API root.
const FARMERS_PATH: &str = "/farmers";
/// Maximum number of body characters echoed into error messages.
const BODY_PREVIEW_CHARS: usize = 512;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Classification of a probe failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeErrorKind {
    /// Timeout, DNS, refused connection, or undecodable body.
    Transport,
    /// Unexpected status code or JSON body outside the contract.
    Shape,
    /// Status matches but the content is wrong.
    Semantic,
}

impl ProbeErrorKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Shape => "shape",
            Self::Semantic => "semantic",
        }
    }
}

/// Failure of a single probe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The request could not complete or the body could not be decoded.
    #[error("connection error: {message}")]
    Transport {
        /// Underlying error text.
        message: String,
    },
    /// The server answered with an unexpected status code.
    #[error("expected HTTP {expected}, got {actual}: {body}")]
    Status {
        /// Expected status code.
        expected: u16,
        /// Observed status code.
        actual: u16,
        /// Observed body (truncated).
        body: String,
    },
    /// The JSON body does not match the contract.
    #[error("unexpected response format: {reason}: {body}")]
    Shape {
        /// What was wrong with the body.
        reason: String,
        /// Observed body (truncated).
        body: String,
    },
    /// The body is well-formed but says the wrong thing.
    #[error("expected {expected}, got {actual}")]
    Semantic {
        /// Expected content.
        expected: String,
        /// Observed content.
        actual: String,
    },
}

impl ProbeError {
    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> ProbeErrorKind {
        match self {
            Self::Transport {
                ..
            } => ProbeErrorKind::Transport,
            Self::Status {
                ..
            }
            | Self::Shape {
                ..
            } => ProbeErrorKind::Shape,
            Self::Semantic {
                ..
            } => ProbeErrorKind::Semantic,
        }
    }

    /// Builds a transport error from a `reqwest` failure.
    fn transport(error: &reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            format!("request timed out: {error}")
        } else {
            error.to_string()
        };
        Self::Transport {
            message,
        }
    }

    /// Builds a shape error for `body`.
    fn shape(reason: impl Into<String>, body: &Value) -> Self {
        Self::Shape {
            reason: reason.into(),
            body: preview(&body.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Probe Payloads
// ============================================================================

/// Health endpoint body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Reported status, `"ok"` when healthy.
    pub status: String,
    /// Optional human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcome of a persistence probe write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceOutcome {
    /// The probe record was stored.
    Registered,
    /// The probe record already existed and was rejected as a duplicate.
    DuplicateDetected,
}

/// Raw HTTP response captured for classification.
struct ApiResponse {
    /// Response status code.
    status: StatusCode,
    /// Response body text.
    body: String,
}

impl ApiResponse {
    /// Fails unless the status equals `expected`.
    fn expect_status(&self, expected: StatusCode) -> Result<(), ProbeError> {
        if self.status == expected {
            return Ok(());
        }
        Err(ProbeError::Status {
            expected: expected.as_u16(),
            actual: self.status.as_u16(),
            body: preview(&self.body),
        })
    }

    /// Decodes the body as JSON.
    fn json(&self) -> Result<Value, ProbeError> {
        serde_json::from_str(&self.body).map_err(|err| ProbeError::Transport {
            message: format!("malformed JSON response: {err}"),
        })
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Blocking client for the farmer registry API.
#[derive(Debug, Clone)]
pub struct FarmerApiClient {
    /// Underlying HTTP client with the configured timeout.
    client: Client,
    /// API root, e.g. `https://host/api`.
    api_root: String,
}

impl FarmerApiClient {
    /// Builds a client for the configured registry.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: &CheckerConfig) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| ProbeError::transport(&err))?;
        Ok(Self {
            client,
            api_root: config.api_root(),
        })
    }

    /// Returns the API root this client targets.
    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// `GET /api/health`; succeeds on HTTP 200 with `status == "ok"`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] on transport failure, wrong status, or a status
    /// other than `"ok"`.
    pub fn check_health(&self) -> Result<HealthStatus, ProbeError> {
        let response = self.get(HEALTH_PATH)?;
        response.expect_status(StatusCode::OK)?;
        let body = response.json()?;
        let health: HealthStatus = serde_json::from_value(body.clone())
            .map_err(|_| ProbeError::shape("status field missing or not a string", &body))?;
        if health.status != "ok" {
            return Err(ProbeError::Semantic {
                expected: "status \"ok\"".to_string(),
                actual: format!("status \"{}\"", health.status),
            });
        }
        Ok(health)
    }

    /// `GET /api/farmers`; succeeds on HTTP 200 with `success == true` and a
    /// `farmers` array. Entries are returned verbatim, objects or not.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] on transport failure, wrong status, or a body
    /// outside the listing contract.
    pub fn list_farmers(&self) -> Result<Vec<StoredFarmer>, ProbeError> {
        let response = self.get(FARMERS_PATH)?;
        response.expect_status(StatusCode::OK)?;
        let body = response.json()?;
        if !success_flag(&body) {
            return Err(ProbeError::shape("success flag is not true", &body));
        }
        let Some(entries) = body.get("farmers").and_then(Value::as_array) else {
            return Err(ProbeError::shape("farmers is not an array", &body));
        };
        Ok(entries.iter().cloned().map(StoredFarmer::new).collect())
    }

    /// `POST /api/farmers`; succeeds on HTTP 201 with `success == true` and a
    /// complete `farmer` record.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] on transport failure, wrong status, missing
    /// fields (named in the error), an empty `id`, or a `registeredAt` that is
    /// not an RFC 3339 timestamp.
    pub fn register_farmer(&self, record: &FarmerRecord) -> Result<StoredFarmer, ProbeError> {
        let response = self.post(FARMERS_PATH, record)?;
        response.expect_status(StatusCode::CREATED)?;
        let body = response.json()?;
        if !success_flag(&body) {
            return Err(ProbeError::shape("success flag is not true", &body));
        }
        let Some(farmer) = body.get("farmer").filter(|farmer| farmer.is_object()) else {
            return Err(ProbeError::shape("farmer object missing", &body));
        };
        let stored = StoredFarmer::new(farmer.clone());
        let missing = stored.missing_fields();
        if !missing.is_empty() {
            return Err(ProbeError::shape(
                format!("missing fields in response: {}", missing.join(", ")),
                &body,
            ));
        }
        let id = stored.id().unwrap_or_default();
        if id.is_empty() {
            return Err(ProbeError::Semantic {
                expected: "non-empty id".to_string(),
                actual: format!("id {}", stored.value()["id"]),
            });
        }
        let registered_at = stored.registered_at().unwrap_or_default();
        if parse_timestamp(registered_at).is_none() {
            return Err(ProbeError::Semantic {
                expected: "RFC 3339 registeredAt".to_string(),
                actual: format!("registeredAt {}", stored.value()["registeredAt"]),
            });
        }
        Ok(stored)
    }

    /// `POST /api/farmers`; succeeds on HTTP 400 whose `error` contains
    /// `expected` (case-insensitive). Returns the server's error text.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] on transport failure, a non-400 status, a missing
    /// `error` field, or an error text without `expected`.
    pub fn expect_rejection(
        &self,
        record: &FarmerRecord,
        expected: &str,
    ) -> Result<String, ProbeError> {
        let response = self.post(FARMERS_PATH, record)?;
        response.expect_status(StatusCode::BAD_REQUEST)?;
        let body = response.json()?;
        let error = error_text(&body)?;
        if !contains_ignore_case(error, expected) {
            return Err(ProbeError::Semantic {
                expected: format!("error containing \"{expected}\""),
                actual: format!("error \"{error}\""),
            });
        }
        Ok(error.to_string())
    }

    /// `POST /api/farmers` with a throwaway record to prove the backing store
    /// is reachable: HTTP 201, or HTTP 400 naming a duplicate mobile number.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] on transport failure, any other status, or a 400
    /// for a reason other than a duplicate mobile number.
    pub fn probe_persistence(
        &self,
        record: &FarmerRecord,
    ) -> Result<PersistenceOutcome, ProbeError> {
        let response = self.post(FARMERS_PATH, record)?;
        match response.status {
            StatusCode::CREATED => Ok(PersistenceOutcome::Registered),
            StatusCode::BAD_REQUEST => {
                let body = response.json()?;
                let error = error_text(&body)?;
                if contains_ignore_case(error, DUPLICATE_MOBILE_PHRASE) {
                    Ok(PersistenceOutcome::DuplicateDetected)
                } else {
                    Err(ProbeError::Semantic {
                        expected: "created or duplicate-mobile rejection".to_string(),
                        actual: format!("error \"{error}\""),
                    })
                }
            }
            _ => Err(ProbeError::Status {
                expected: StatusCode::CREATED.as_u16(),
                actual: response.status.as_u16(),
                body: preview(&response.body),
            }),
        }
    }

    /// Sends a GET request to `path` under the API root.
    fn get(&self, path: &str) -> Result<ApiResponse, ProbeError> {
        let url = self.endpoint(path);
        send("GET", &url, self.client.get(&url))
    }

    /// Sends a JSON POST request to `path` under the API root.
    fn post(&self, path: &str, record: &FarmerRecord) -> Result<ApiResponse, ProbeError> {
        let url = self.endpoint(path);
        send("POST", &url, self.client.post(&url).json(record))
    }

    /// Joins `path` onto the API root.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_root)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Sends a prepared request and captures status and body.
fn send(
    method: &'static str,
    url: &str,
    request: RequestBuilder,
) -> Result<ApiResponse, ProbeError> {
    let started = Instant::now();
    let response = request.header(ACCEPT, "application/json").send().map_err(|err| {
        tracing::warn!(method, url, error = %err, "registry request failed");
        ProbeError::transport(&err)
    })?;
    let status = response.status();
    let body = response.text().map_err(|err| {
        tracing::warn!(method, url, error = %err, "registry response body unreadable");
        ProbeError::transport(&err)
    })?;
    tracing::debug!(
        method,
        url,
        status = status.as_u16(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        body_bytes = body.len(),
        "registry request completed"
    );
    Ok(ApiResponse {
        status,
        body,
    })
}

/// Returns true when the body carries `success: true`.
fn success_flag(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool).unwrap_or(false)
}

/// Extracts the `error` string from a rejection body.
fn error_text(body: &Value) -> Result<&str, ProbeError> {
    body.get("error")
        .and_then(Value::as_str)
        .ok_or_else(|| ProbeError::shape("error field missing", body))
}

/// Case-insensitive substring match.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Truncates a body for inclusion in error messages.
pub(crate) fn preview(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(BODY_PREVIEW_CHARS).collect();
    if chars.next().is_some() { format!("{head}...") } else { head }
}
