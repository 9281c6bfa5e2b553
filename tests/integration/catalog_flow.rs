//! Catalog controller and session against the stub backend

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use tokio::sync::mpsc;

use library_web::{
    dispatch::{CatalogEvent, Shortcut},
    models::StatusFilter,
    services::{session::CatalogSession, storage::MemoryStorage},
    view::{catalog::ResultsBody, PageControl},
};

use crate::support::{catalogue, spawn, Stub};

#[tokio::test]
async fn test_search_sends_query_filter_and_offset() {
    let backend = spawn(Stub {
        books: catalogue(30),
        ..Stub::default()
    })
    .await;
    let mut catalog = backend.services(MemoryStorage::new()).catalog();

    catalog.set_search("book", StatusFilter::Available, 2);
    catalog.perform_search().await;

    let params = backend.recorder.last_search();
    assert_eq!(params["q"], "book");
    assert_eq!(params["status"], "available");
    assert_eq!(params["limit"], "12");
    assert_eq!(params["offset"], "12");

    assert_eq!(catalog.state().total_results, 30);
    assert_eq!(catalog.state().books.len(), 12);
    assert_eq!(catalog.state().total_pages(), 3);
    assert!(catalog.ui().error_panel.is_none());
}

#[tokio::test]
async fn test_all_filter_sends_empty_status() {
    let backend = spawn(Stub::default()).await;
    let mut catalog = backend.services(MemoryStorage::new()).catalog();

    catalog.initialize().await;

    let params = backend.recorder.last_search();
    assert_eq!(params["status"], "");
    assert_eq!(params["offset"], "0");
    let rendered = catalog.render();
    assert_eq!(rendered.title, "All Books");
    assert_eq!(rendered.count, "2");
}

#[tokio::test]
async fn test_server_error_falls_back_to_sample_books() {
    let backend = spawn(Stub {
        search_fails: true,
        ..Stub::default()
    })
    .await;
    let mut catalog = backend.services(MemoryStorage::new()).catalog();

    catalog.perform_search().await;

    let panel = catalog.ui().error_panel.clone().unwrap();
    assert_eq!(
        panel,
        "Search failed: Database error. Make sure the backend server is running."
    );
    let titles: Vec<&str> = catalog.state().books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["The Great Gatsby", "To Kill a Mockingbird"]);

    let rendered = catalog.render();
    assert!(rendered.error.is_some());
    assert!(matches!(rendered.body, ResultsBody::Cards { ref cards } if cards.len() == 2));
}

#[tokio::test]
async fn test_unreachable_backend_raises_health_panel() {
    let mut config = library_web::AppConfig::default();
    // Nothing listens on the discard port
    config.api.base_url = "http://127.0.0.1:9/api".to_string();
    config.api.health_timeout_ms = 500;
    config.api.timeout_ms = 500;
    let services = library_web::Services::with_parts(
        config.clone(),
        std::sync::Arc::new(library_web::api::HttpCatalogApi::new(&config.api).unwrap()),
        std::sync::Arc::new(MemoryStorage::new()),
        std::sync::Arc::new(library_web::services::clock::SystemClock),
    );
    let mut catalog = services.catalog();

    let health = catalog.check_health().await;
    assert!(!health.is_healthy());
    assert_eq!(
        catalog.ui().error_panel.as_deref(),
        Some("API is not responding. Please start the backend server.")
    );
}

#[tokio::test]
async fn test_non_numeric_card_sends_no_request() {
    let backend = spawn(Stub::default()).await;
    let mut catalog = backend.services(MemoryStorage::new()).catalog();
    catalog.perform_search().await;

    catalog.checkout("9780441013593", "12ab").await;

    assert!(backend.recorder.checkouts().is_empty());
    let notification = catalog.ui().notification.clone().unwrap();
    assert!(notification.is_error());
    assert_eq!(notification.message, "Please enter a valid numeric Card ID.");
}

#[tokio::test]
async fn test_checkout_posts_numeric_card_id() {
    let backend = spawn(Stub::default()).await;
    let mut catalog = backend.services(MemoryStorage::new()).catalog();
    catalog.perform_search().await;

    catalog.checkout("9780441013593", "1001").await;

    assert_eq!(
        backend.recorder.checkouts(),
        vec![json!({"isbn": "9780441013593", "card_id": 1001})]
    );
    assert_eq!(
        catalog.ui().notification.as_ref().map(|n| n.message.as_str()),
        Some("Successfully checked out \"Dune\" to borrower 1001")
    );
    assert!(catalog.ui().refresh_pending);
}

#[tokio::test]
async fn test_rejected_checkout_shows_backend_message() {
    let backend = spawn(Stub {
        checkout_reply: (
            StatusCode::BAD_REQUEST,
            json!({"success": false, "error": "Borrower has reached the loan limit"}),
        ),
        ..Stub::default()
    })
    .await;
    let mut catalog = backend.services(MemoryStorage::new()).catalog();
    catalog.perform_search().await;
    let before = catalog.state().clone();

    catalog.checkout("9780441013593", "1001").await;

    assert_eq!(backend.recorder.checkouts().len(), 1);
    assert_eq!(catalog.state(), &before);
    assert!(!catalog.ui().refresh_pending);
    assert_eq!(
        catalog.ui().notification.as_ref().map(|n| n.message.as_str()),
        Some("Checkout failed: Borrower has reached the loan limit")
    );
}

#[tokio::test]
async fn test_last_page_disables_next() {
    let backend = spawn(Stub {
        books: catalogue(50),
        ..Stub::default()
    })
    .await;
    let mut catalog = backend.services(MemoryStorage::new()).catalog();
    catalog.set_search("", StatusFilter::All, 5);
    catalog.perform_search().await;

    assert_eq!(catalog.state().page, 5);
    assert_eq!(catalog.state().books.len(), 2);

    let pagination = catalog.render().pagination;
    assert_eq!(pagination.first(), Some(&PageControl::Previous { enabled: true }));
    assert_eq!(pagination.last(), Some(&PageControl::Next { enabled: false }));
    assert!(pagination.contains(&PageControl::Page {
        number: 5,
        active: true
    }));

    // Next on the last page maps to no action
    assert!(catalog.handle(CatalogEvent::NextClicked).is_none());
}

#[tokio::test]
async fn test_session_pages_with_arrow_keys() {
    let backend = spawn(Stub {
        books: catalogue(50),
        ..Stub::default()
    })
    .await;
    let catalog = backend.services(MemoryStorage::new()).catalog();
    let mut session = CatalogSession::new(catalog);
    session.start().await;

    let (tx, rx) = mpsc::channel(8);
    let handle = tokio::spawn(session.run(rx, |_| {}));

    // Let the initial search land before paging
    tokio::time::sleep(Duration::from_millis(300)).await;
    tx.send(CatalogEvent::Key(Shortcut::ArrowRight)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    tx.send(CatalogEvent::Key(Shortcut::ArrowRight)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    drop(tx);

    let catalog = handle.await.unwrap();
    assert_eq!(catalog.state().page, 3);
    assert_eq!(backend.recorder.last_search()["offset"], "24");
    assert_eq!(backend.recorder.search_count(), 3);
}
