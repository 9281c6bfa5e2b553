//! Stub backend served by axum on an ephemeral port

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use library_web::{
    api::HttpCatalogApi,
    config::AppConfig,
    services::{clock::FixedClock, storage::MemoryStorage},
    Services,
};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

pub fn book(isbn: &str, title: &str, available: bool) -> Value {
    json!({
        "isbn": isbn,
        "title": title,
        "authors": "Test Author",
        "publication_year": 2001,
        "pages": 300,
        "publisher": "Test Press",
        "genre": "Fiction",
        "availability": if available { "Available" } else { "Checked Out" },
    })
}

/// `count` available books with distinct ISBNs
pub fn catalogue(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| book(&format!("97800000{:05}", i), &format!("Book {}", i), true))
        .collect()
}

/// How the stub answers
#[derive(Clone)]
pub struct Stub {
    pub books: Vec<Value>,
    pub search_fails: bool,
    pub checkout_reply: (StatusCode, Value),
    /// Serve the borrower, loans, fines and history endpoints
    pub profile_endpoints: bool,
    pub loans: Vec<Value>,
    pub fines: Vec<Value>,
    pub history: Vec<Value>,
}

impl Default for Stub {
    fn default() -> Self {
        Self {
            books: vec![
                book("9780441013593", "Dune", true),
                book("9780451524935", "1984", false),
            ],
            search_fails: false,
            checkout_reply: (
                StatusCode::OK,
                json!({"success": true, "message": "Book checked out successfully", "loan_id": 42, "due_date": "2024-06-29"}),
            ),
            profile_endpoints: true,
            loans: Vec::new(),
            fines: Vec::new(),
            history: Vec::new(),
        }
    }
}

/// Requests the stub received
#[derive(Clone, Default)]
pub struct Recorder {
    pub searches: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub checkouts: Arc<Mutex<Vec<Value>>>,
    pub profile_hits: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn last_search(&self) -> HashMap<String, String> {
        self.searches.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn checkouts(&self) -> Vec<Value> {
        self.checkouts.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct StubState {
    stub: Arc<Stub>,
    recorder: Recorder,
}

pub struct RunningStub {
    pub base_url: String,
    pub recorder: Recorder,
    handle: JoinHandle<()>,
}

impl RunningStub {
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.api.base_url = self.base_url.clone();
        config
    }

    /// Services wired to this stub, an in-memory store and a frozen clock
    pub fn services(&self, storage: MemoryStorage) -> Services {
        let config = self.config();
        let api = HttpCatalogApi::new(&config.api).unwrap();
        Services::with_parts(
            config,
            Arc::new(api),
            Arc::new(storage),
            Arc::new(FixedClock(today())),
        )
    }
}

impl Drop for RunningStub {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn(stub: Stub) -> RunningStub {
    let recorder = Recorder::default();
    let state = StubState {
        stub: Arc::new(stub),
        recorder: recorder.clone(),
    };

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/search", get(search))
        .route("/api/checkout", post(checkout))
        .route("/api/borrower/:card_id", get(borrower))
        .route("/api/loans/:card_id", get(loans))
        .route("/api/fines", get(fines))
        .route("/api/history/:card_id", get(history))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    RunningStub {
        base_url: format!("http://{}/api", addr),
        recorder,
        handle,
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "database": "connected"}))
}

async fn search(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.recorder.searches.lock().unwrap().push(params.clone());
    if state.stub.search_fails {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "error": "Database error"})),
        );
    }

    let q = params.get("q").cloned().unwrap_or_default().to_lowercase();
    let status = params.get("status").cloned().unwrap_or_default();
    let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);
    let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);

    let matching: Vec<&Value> = state
        .stub
        .books
        .iter()
        .filter(|b| {
            q.is_empty()
                || b["isbn"].as_str().unwrap_or_default().contains(&q)
                || b["title"].as_str().unwrap_or_default().to_lowercase().contains(&q)
        })
        .filter(|b| match status.as_str() {
            "available" => b["availability"] == "Available",
            "checked-out" => b["availability"] != "Available",
            _ => true,
        })
        .collect();
    let total = matching.len();
    let books: Vec<&Value> = matching.into_iter().skip(offset).take(limit).collect();

    (
        StatusCode::OK,
        Json(json!({"success": true, "books": books, "total": total, "limit": limit, "offset": offset})),
    )
}

async fn checkout(State(state): State<StubState>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.recorder.checkouts.lock().unwrap().push(body);
    let (status, reply) = state.stub.checkout_reply.clone();
    (status, Json(reply))
}

fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"success": false, "error": "Not found"})),
    )
}

async fn borrower(State(state): State<StubState>, Path(card_id): Path<String>) -> (StatusCode, Json<Value>) {
    state.recorder.profile_hits.lock().unwrap().push(format!("borrower/{}", card_id));
    if !state.stub.profile_endpoints {
        return not_found();
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "borrower": {
                "card_id": card_id.parse::<u64>().unwrap_or_default(),
                "name": "Ada Lovelace",
                "email": "ada@example.org",
                "phone": "555-0100",
                "address": "12 Analytical Row",
                "ssn": "123456789",
                "member_since": "2020-03-01",
                "total_books": 7,
            }
        })),
    )
}

async fn loans(State(state): State<StubState>, Path(card_id): Path<String>) -> (StatusCode, Json<Value>) {
    state.recorder.profile_hits.lock().unwrap().push(format!("loans/{}", card_id));
    if !state.stub.profile_endpoints {
        return not_found();
    }
    (
        StatusCode::OK,
        Json(json!({"success": true, "loans": state.stub.loans})),
    )
}

async fn fines(State(state): State<StubState>) -> (StatusCode, Json<Value>) {
    state.recorder.profile_hits.lock().unwrap().push("fines".to_string());
    if !state.stub.profile_endpoints {
        return not_found();
    }
    (
        StatusCode::OK,
        Json(json!({"success": true, "fines": state.stub.fines})),
    )
}

async fn history(State(state): State<StubState>, Path(card_id): Path<String>) -> (StatusCode, Json<Value>) {
    state.recorder.profile_hits.lock().unwrap().push(format!("history/{}", card_id));
    if !state.stub.profile_endpoints {
        return not_found();
    }
    (
        StatusCode::OK,
        Json(json!({"success": true, "history": state.stub.history})),
    )
}
