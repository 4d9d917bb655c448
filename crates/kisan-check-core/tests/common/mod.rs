// crates/kisan-check-core/tests/common/mod.rs
// ============================================================================
// Module: Stub Farmer Registry
// Description: In-process registry used by the integration tests.
// Purpose: Serve /api/health and /api/farmers with configurable misbehaviour.
// Dependencies: tiny_http, serde_json, kisan-check-core
// ============================================================================

//! ## Overview
//! [`StubRegistry`] binds an ephemeral `tiny_http` server and applies the same
//! rules as the production registry: required fields, ten-digit mobile,
//! six-digit pincode, unique mobile, newest-first listing. [`StubBehavior`]
//! switches individual rules off to exercise failure paths.
//!
//! Timestamps are synthetic and strictly increasing per write so ordering
//! assertions are deterministic.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test-only stub favors direct unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::TcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use kisan_check_core::CheckerConfig;
use kisan_check_core::FarmerApiClient;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Request;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fields the registry requires on registration, in validation order.
const REQUIRED_FIELDS: [&str; 9] = [
    "name",
    "mobile",
    "village",
    "district",
    "state",
    "pincode",
    "farmSize",
    "cropType",
    "farmingMethod",
];

/// Duplicate-mobile rejection text ("already registered with this mobile number").
pub const DUPLICATE_ERROR: &str = "इस मोबाइल नंबर से पहले ही रजिस्ट्रेशन हो चुका है।";

// ============================================================================
// SECTION: Behaviour
// ============================================================================

/// Knobs for registry misbehaviour.
#[derive(Debug, Clone)]
pub struct StubBehavior {
    /// Value reported by `/api/health`.
    pub health_status: &'static str,
    /// Whether the listing is returned newest first.
    pub sort_newest_first: bool,
    /// Whether duplicate mobiles are rejected.
    pub enforce_unique_mobile: bool,
    /// Fields stripped from stored records.
    pub omit_response_fields: Vec<&'static str>,
    /// Whether the listing body is broken JSON.
    pub malformed_listing: bool,
    /// Whether writes are acknowledged with 201 but never stored.
    pub drop_writes: bool,
    /// Replaces the synthetic `registeredAt` on every write.
    pub registered_at_override: Option<&'static str>,
    /// Mobiles left out of the listing even though they are stored.
    pub hidden_mobiles: Vec<&'static str>,
}

impl Default for StubBehavior {
    fn default() -> Self {
        Self {
            health_status: "ok",
            sort_newest_first: true,
            enforce_unique_mobile: true,
            omit_response_fields: Vec::new(),
            malformed_listing: false,
            drop_writes: false,
            registered_at_override: None,
            hidden_mobiles: Vec::new(),
        }
    }
}

// ============================================================================
// SECTION: Stub Server
// ============================================================================

/// Running stub registry; stops on drop.
pub struct StubRegistry {
    /// Base URL, e.g. `http://127.0.0.1:40123`.
    base_url: String,
    /// Stored records in insertion order.
    records: Arc<Mutex<Vec<Value>>>,
    /// Stop flag for the serving thread.
    stop: Arc<AtomicBool>,
    /// Serving thread.
    handle: Option<JoinHandle<()>>,
}

impl StubRegistry {
    /// Starts a stub with default, well-behaved rules.
    pub fn start_default() -> Self {
        Self::start(StubBehavior::default())
    }

    /// Starts a stub with `behavior`.
    pub fn start(behavior: StubBehavior) -> Self {
        let server = Server::http("127.0.0.1:0").expect("bind stub registry");
        let addr = server.server_addr().to_ip().expect("stub ip address");
        let records = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));
        let thread_records = Arc::clone(&records);
        let thread_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !thread_stop.load(Ordering::SeqCst) {
                match server.recv_timeout(Duration::from_millis(25)) {
                    Ok(Some(request)) => handle_request(request, &behavior, &thread_records),
                    Ok(None) => {}
                    Err(_) => break,
                }
            }
        });
        Self {
            base_url: format!("http://{addr}"),
            records,
            stop,
            handle: Some(handle),
        }
    }

    /// Returns the stub base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns a snapshot of stored records, oldest first.
    pub fn records(&self) -> Vec<Value> {
        self.records.lock().expect("records lock").clone()
    }

    /// Builds a client targeting this stub.
    pub fn client(&self) -> FarmerApiClient {
        client_for(&self.base_url)
    }
}

impl Drop for StubRegistry {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Builds a client for `base_url` with a short timeout.
pub fn client_for(base_url: &str) -> FarmerApiClient {
    let config = CheckerConfig::new(base_url, Duration::from_secs(5)).expect("stub config");
    FarmerApiClient::new(&config).expect("client")
}

/// Returns a base URL on which nothing is listening.
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{addr}")
}

// ============================================================================
// SECTION: Routing
// ============================================================================

/// Routes one request and writes the JSON response.
fn handle_request(mut request: Request, behavior: &StubBehavior, records: &Mutex<Vec<Value>>) {
    let path = request.url().split('?').next().unwrap_or_default().to_string();
    let method = request.method().as_str().to_ascii_uppercase();
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);

    let (status, payload) = match (method.as_str(), path.as_str()) {
        ("GET", "/api/health") => (
            200,
            json!({ "status": behavior.health_status, "message": "Server is running" }).to_string(),
        ),
        ("GET", "/api/farmers") => list(behavior, records),
        ("POST", "/api/farmers") => register(&body, behavior, records),
        _ => (404, json!({ "error": "Not found" }).to_string()),
    };
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("content type header");
    let response = Response::from_string(payload).with_status_code(status).with_header(header);
    let _ = request.respond(response);
}

/// `GET /api/farmers`.
fn list(behavior: &StubBehavior, records: &Mutex<Vec<Value>>) -> (u16, String) {
    if behavior.malformed_listing {
        return (200, "{\"success\": true, \"farmers\": [".to_string());
    }
    let mut farmers = records.lock().expect("records lock").clone();
    farmers.retain(|farmer| {
        let mobile = farmer.get("mobile").and_then(Value::as_str).unwrap_or_default();
        !behavior.hidden_mobiles.contains(&mobile)
    });
    if behavior.sort_newest_first {
        farmers.reverse();
    }
    (200, json!({ "success": true, "farmers": farmers }).to_string())
}

/// `POST /api/farmers`.
fn register(body: &str, behavior: &StubBehavior, records: &Mutex<Vec<Value>>) -> (u16, String) {
    let Ok(Value::Object(input)) = serde_json::from_str::<Value>(body) else {
        return (500, json!({ "error": "Failed to register farmer" }).to_string());
    };
    if let Some(error) = validate(&input) {
        return (400, json!({ "error": error }).to_string());
    }
    let mut stored = records.lock().expect("records lock");
    let mobile = text(&input, "mobile");
    if behavior.enforce_unique_mobile
        && stored.iter().any(|record| record.get("mobile").and_then(Value::as_str) == Some(mobile))
    {
        return (400, json!({ "error": DUPLICATE_ERROR }).to_string());
    }
    let sequence = stored.len();
    let mut farmer = Map::new();
    farmer.insert("id".to_string(), json!(format!("00000000-0000-4000-8000-{sequence:012}")));
    for field in REQUIRED_FIELDS {
        farmer.insert(field.to_string(), json!(text(&input, field)));
    }
    farmer.insert("email".to_string(), json!(text(&input, "email")));
    let registered_at = behavior.registered_at_override.map_or_else(
        || format!("2026-01-01T00:{:02}:{:02}.000Z", sequence / 60, sequence % 60),
        str::to_string,
    );
    farmer.insert("registeredAt".to_string(), json!(registered_at));
    for field in &behavior.omit_response_fields {
        farmer.remove(*field);
    }
    let farmer = Value::Object(farmer);
    if !behavior.drop_writes {
        stored.push(farmer.clone());
    }
    (
        201,
        json!({ "success": true, "message": "रजिस्ट्रेशन सफल!", "farmer": farmer }).to_string(),
    )
}

/// Returns the first validation error for `input`.
fn validate(input: &Map<String, Value>) -> Option<String> {
    for field in REQUIRED_FIELDS {
        if text(input, field).is_empty() {
            return Some(format!("{field} is required"));
        }
    }
    if !is_digits(text(input, "mobile"), 10) {
        return Some("Invalid mobile number. Must be 10 digits.".to_string());
    }
    if !is_digits(text(input, "pincode"), 6) {
        return Some("Invalid pincode. Must be 6 digits.".to_string());
    }
    None
}

/// Returns the string value of `key`, or an empty string.
fn text<'a>(input: &'a Map<String, Value>, key: &str) -> &'a str {
    input.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Returns true when `value` is exactly `len` ASCII digits.
fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|byte| byte.is_ascii_digit())
}
