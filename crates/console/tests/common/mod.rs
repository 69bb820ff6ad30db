//! Common test utilities for integration tests.
//!
//! Starts an in-process fake of the fleet service on an ephemeral port. The
//! fake keeps its collections in memory, checks the bearer token and records
//! every request it receives.

// Helpers are shared by several test binaries; not all of them use each one.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use fake::faker::lorem::en::Word;
use fake::Fake;
use fleet_console::cli::Console;
use fleet_console::client::ApiClient;
use fleet_console::config::ServiceConfig;
use fleet_console::session::{Session, SessionStore};
use serde_json::{json, Value};

pub const TEST_EMAIL: &str = "admin@test.com";
pub const TEST_PASSWORD: &str = "1234";
pub const TEST_TOKEN: &str = "test-token";

/// One request as the fake service saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Default)]
struct FakeState {
    collections: Mutex<HashMap<String, Vec<Value>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    next_id: Mutex<u64>,
    failing: Mutex<HashSet<String>>,
    failing_reads: Mutex<HashSet<String>>,
}

impl FakeState {
    fn record(&self, method: &Method, uri: &Uri, headers: &HeaderMap, body: &Bytes) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.clone(),
            path: uri.path().to_string(),
            body: serde_json::from_slice(body).ok(),
            authorization: header("authorization"),
            request_id: header("x-request-id"),
        });
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {}", TEST_TOKEN))
            .unwrap_or(false)
    }

    fn check(&self, collection: &str, headers: &HeaderMap) -> Option<Response> {
        if !Self::authorized(headers) {
            return Some(
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"message": "Token missing or invalid"})),
                )
                    .into_response(),
            );
        }
        if self.failing.lock().unwrap().contains(collection) {
            return Some(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"message": "Internal server error"})),
                )
                    .into_response(),
            );
        }
        None
    }

    fn next_id(&self, collection: &str) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("{}-{}", collection, next)
    }

    /// Groups come back with their terminals embedded; chats keep bare ids.
    fn populate(&self, collection: &str, mut record: Value) -> Value {
        if collection != "grupos" {
            return record;
        }
        let terminals = self
            .collections
            .lock()
            .unwrap()
            .get("terminales")
            .cloned()
            .unwrap_or_default();
        if let Some(refs) = record.get_mut("terminals").and_then(Value::as_array_mut) {
            for item in refs.iter_mut() {
                if let Some(found) = terminals.iter().find(|t| t["_id"] == *item) {
                    *item = found.clone();
                }
            }
        }
        record
    }
}

async fn login(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.record(&method, &uri, &headers, &body);
    let credentials: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    if credentials["email"] != TEST_EMAIL {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "User not found"})),
        )
            .into_response()
    } else if credentials["password"] == TEST_PASSWORD {
        Json(json!({
            "token": TEST_TOKEN,
            "user": {"email": TEST_EMAIL}
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        )
            .into_response()
    }
}

async fn list(
    State(state): State<Arc<FakeState>>,
    Path(collection): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(&method, &uri, &headers, &Bytes::new());
    if let Some(rejection) = state.check(&collection, &headers) {
        return rejection;
    }
    if state.failing_reads.lock().unwrap().contains(&collection) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"message": "Service unavailable"})),
        )
            .into_response();
    }
    let records = state
        .collections
        .lock()
        .unwrap()
        .get(&collection)
        .cloned()
        .unwrap_or_default();
    Json(records).into_response()
}

async fn create(
    State(state): State<Arc<FakeState>>,
    Path(collection): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.record(&method, &uri, &headers, &body);
    if let Some(rejection) = state.check(&collection, &headers) {
        return rejection;
    }

    let mut record: Value = serde_json::from_slice(&body).unwrap_or_else(|_| json!({}));
    record["_id"] = Value::String(state.next_id(&collection));
    let record = state.populate(&collection, record);

    state
        .collections
        .lock()
        .unwrap()
        .entry(collection)
        .or_default()
        .push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update(
    State(state): State<Arc<FakeState>>,
    Path((collection, id)): Path<(String, String)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.record(&method, &uri, &headers, &body);
    if let Some(rejection) = state.check(&collection, &headers) {
        return rejection;
    }

    let mut changes: Value = serde_json::from_slice(&body).unwrap_or_else(|_| json!({}));
    changes["_id"] = Value::String(id.clone());
    let changes = state.populate(&collection, changes);

    let mut collections = state.collections.lock().unwrap();
    let records = collections.entry(collection).or_default();
    match records.iter_mut().find(|r| r["_id"] == id.as_str()) {
        Some(record) => {
            if let (Some(target), Some(source)) = (record.as_object_mut(), changes.as_object()) {
                for (key, value) in source {
                    target.insert(key.clone(), value.clone());
                }
            }
            Json(record.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Not found"}))).into_response(),
    }
}

async fn remove(
    State(state): State<Arc<FakeState>>,
    Path((collection, id)): Path<(String, String)>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(&method, &uri, &headers, &Bytes::new());
    if let Some(rejection) = state.check(&collection, &headers) {
        return rejection;
    }

    let mut collections = state.collections.lock().unwrap();
    let records = collections.entry(collection).or_default();
    let before = records.len();
    records.retain(|r| r["_id"] != id.as_str());
    if records.len() == before {
        (StatusCode::NOT_FOUND, Json(json!({"message": "Not found"}))).into_response()
    } else {
        Json(json!({"message": "Deleted"})).into_response()
    }
}

/// The fake fleet service.
pub struct FakeService {
    pub base_url: String,
    state: Arc<FakeState>,
}

impl FakeService {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/:collection", get(list).post(create))
            .route("/api/:collection/:id", put(update).delete(remove))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake service");
        let addr = listener.local_addr().expect("Fake service has no address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake service stopped");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Replaces a collection, e.g. `seed("terminales", ...)`.
    pub fn seed(&self, collection: &str, records: Vec<Value>) {
        self.state
            .collections
            .lock()
            .unwrap()
            .insert(collection.to_string(), records);
    }

    pub fn records(&self, collection: &str) -> Vec<Value> {
        self.state
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests other than GET.
    pub fn writes(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != Method::GET)
            .collect()
    }

    /// Makes every request to `collection` answer 500.
    pub fn fail(&self, collection: &str) {
        self.state
            .failing
            .lock()
            .unwrap()
            .insert(collection.to_string());
    }

    /// Makes listing `collection` answer 503 while writes keep working.
    pub fn fail_reads(&self, collection: &str) {
        self.state
            .failing_reads
            .lock()
            .unwrap()
            .insert(collection.to_string());
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            base_url: self.base_url.clone(),
            request_timeout_secs: 5,
            connect_timeout_secs: 5,
        }
    }

    pub fn client(&self, session: Session) -> ApiClient {
        ApiClient::new(&self.service_config(), session).expect("Failed to build client")
    }

    pub fn authenticated_client(&self) -> ApiClient {
        self.client(Session::with_token(TEST_TOKEN))
    }

    /// Console with a logged-in session and a throwaway session file.
    pub fn console(&self, json: bool) -> Console {
        Console::new(self.authenticated_client(), SessionStore::new(temp_session_path()), json)
    }
}

/// Unique session file path under the OS temp dir.
pub fn temp_session_path() -> PathBuf {
    std::env::temp_dir()
        .join("fleet-console-tests")
        .join(format!("{}.json", uuid::Uuid::new_v4()))
}

/// Random record name.
pub fn unique_name() -> String {
    let word: String = Word().fake();
    format!("{}-{}", word, &uuid::Uuid::new_v4().to_string()[..8])
}

pub fn terminal_json(id: &str, name: &str, battery: i32, wifi: i32) -> Value {
    json!({"_id": id, "name": name, "batteryLevel": battery, "wifiLevel": wifi})
}

pub fn group_json(id: &str, name: &str, connected: bool, terminals: Vec<Value>) -> Value {
    json!({"_id": id, "name": name, "isConnected": connected, "terminals": terminals})
}

pub fn chat_json(id: &str, name: &str, active: bool, terminals: &[&str]) -> Value {
    json!({
        "_id": id,
        "name": name,
        "isActive": active,
        "terminals": terminals,
        "participants": terminals.len()
    })
}

/// Catalog of three terminals: t-a, t-b and t-c.
pub fn seed_catalog(service: &FakeService) -> Vec<Value> {
    let catalog = vec![
        terminal_json("t-a", "Alpha", 90, 80),
        terminal_json("t-b", "Bravo", 60, 40),
        terminal_json("t-c", "Charlie", 20, 10),
    ];
    service.seed("terminales", catalog.clone());
    catalog
}
