//! Profile loading, fallbacks and local mutations against the stub backend

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::json;

use library_web::{
    api::HttpCatalogApi,
    dispatch::ProfileEvent,
    models::{PaymentMethod, Theme},
    services::{
        clock::FixedClock,
        profile::{self, DataSource, ProfileController, ProfileLoad, ENTRY_PAGE},
        storage::{FileStorage, MemoryStorage, Storage, CARD_ID_KEY},
    },
    Services,
};

use crate::support::{spawn, today, RunningStub, Stub};

fn ready(load: ProfileLoad) -> ProfileController {
    match load {
        ProfileLoad::Ready(controller) => *controller,
        ProfileLoad::Redirect(redirect) => panic!("unexpected redirect to {}", redirect.target),
    }
}

fn stub_with_records() -> Stub {
    Stub {
        loans: vec![
            json!({"loan_id": 7, "isbn": "9780441013593", "title": "Dune", "authors": "Frank Herbert",
                   "date_out": "2024-05-27", "due_date": "2024-06-10", "date_in": null}),
            json!({"loan_id": 8, "isbn": "9780451524935", "title": "1984", "authors": "George Orwell",
                   "date_out": "2024-06-10", "due_date": "2024-06-24", "date_in": null}),
        ],
        fines: vec![
            json!({"card_id": 1001, "loan_id": 7, "book_title": "Dune", "isbn": "9780441013593",
                   "due_date": "2024-06-10", "days_overdue": 5, "fine_amt": "1.25", "paid": 0}),
            json!({"card_id": 2002, "loan_id": 9, "book_title": "Emma", "isbn": "9780141439587",
                   "due_date": "2024-06-01", "days_overdue": 14, "fine_amt": "3.50", "paid": 0}),
        ],
        history: vec![
            json!({"isbn": "9780061120084", "title": "To Kill a Mockingbird", "authors": "Harper Lee",
                   "checkout_date": "2024-06-02", "return_date": "2024-06-09", "rating": 5, "favorite": 1}),
            json!({"isbn": "9780141439518", "title": "Pride and Prejudice", "authors": "Jane Austen",
                   "checkout_date": "2023-01-10", "return_date": "2023-02-01", "rating": 3, "favorite": 0}),
        ],
        ..Stub::default()
    }
}

fn services_with(backend: &RunningStub, storage: Arc<dyn Storage>, default_card_id: &str) -> Services {
    let mut config = backend.config();
    config.profile.default_card_id = default_card_id.to_string();
    let api = HttpCatalogApi::new(&config.api).unwrap();
    Services::with_parts(config, Arc::new(api), storage, Arc::new(FixedClock(today())))
}

#[tokio::test]
async fn test_profile_loads_from_dedicated_endpoints() {
    let backend = spawn(stub_with_records()).await;
    let services = backend.services(MemoryStorage::new());

    let controller = ready(services.profile(None).await.unwrap());
    let state = controller.state();

    assert_eq!(state.card_id.as_str(), "1001");
    assert_eq!(state.borrower.name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(state.sources.borrower, DataSource::Backend);
    assert_eq!(state.sources.loans, DataSource::Backend);
    assert_eq!(state.sources.fines, DataSource::Backend);
    assert_eq!(state.sources.history, DataSource::Backend);

    // Other patrons' fines are dropped
    assert_eq!(state.fines.len(), 1);
    assert_eq!(state.fines[0].loan_id, 7);

    let summary = controller.loan_summary();
    assert_eq!(summary.active, 2);
    assert_eq!(summary.overdue, 1);

    let stats = controller.history_stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.this_month, 1);
    assert_eq!(stats.favorites, 1);

    let hits = backend.recorder.profile_hits.lock().unwrap().clone();
    assert_eq!(hits, ["borrower/1001", "loans/1001", "fines", "history/1001"]);
    assert_eq!(backend.recorder.search_count(), 0);
}

#[tokio::test]
async fn test_missing_endpoints_synthesize_from_search() {
    let backend = spawn(Stub {
        profile_endpoints: false,
        ..Stub::default()
    })
    .await;
    let services = backend.services(MemoryStorage::new());

    let controller = ready(services.profile(Some("1001")).await.unwrap());
    let state = controller.state();

    assert_eq!(state.sources.borrower, DataSource::Synthesized);
    assert_eq!(state.sources.loans, DataSource::Synthesized);
    assert_eq!(state.sources.fines, DataSource::Synthesized);
    assert_eq!(state.sources.history, DataSource::Synthesized);

    assert_eq!(state.loans.len(), 2);
    assert_eq!(state.loans[0].title, "Dune");
    assert_eq!(state.history.len(), 2);
    // Synthesized loans are not yet due, so nothing is owed
    assert!(state.fines.is_empty());

    let limits: Vec<String> = backend
        .recorder
        .searches
        .lock()
        .unwrap()
        .iter()
        .map(|params| params["limit"].clone())
        .collect();
    assert_eq!(limits, ["1", "10", "20"]);
}

#[tokio::test]
async fn test_dead_backend_uses_placeholders() {
    let backend = spawn(Stub {
        profile_endpoints: false,
        search_fails: true,
        ..Stub::default()
    })
    .await;
    let services = backend.services(MemoryStorage::new());

    let controller = ready(services.profile(None).await.unwrap());
    let state = controller.state();

    assert_eq!(state.sources.borrower, DataSource::Placeholder);
    assert_eq!(state.sources.loans, DataSource::Placeholder);
    assert_eq!(state.sources.history, DataSource::Placeholder);
    assert_eq!(state.sources.fines, DataSource::Synthesized);
    assert_eq!(state.borrower.name.as_deref(), Some("Library User"));

    // One placeholder loan is six days overdue at the default daily rate
    let totals = controller.fine_totals();
    assert_eq!(totals.unpaid_items, 1);
    assert_eq!(totals.unpaid, Decimal::from_str("1.50").unwrap());

    let rendered = controller.render();
    assert_eq!(rendered.user_name, "Library User");
    assert_eq!(rendered.fines.unpaid_total, "$1.50");
}

#[tokio::test]
async fn test_card_param_is_remembered() {
    let backend = spawn(stub_with_records()).await;
    let storage = MemoryStorage::new();
    let services = backend.services(storage.clone());

    let first = ready(services.profile(Some("2002")).await.unwrap());
    assert_eq!(first.state().card_id.as_str(), "2002");
    assert_eq!(storage.get(CARD_ID_KEY).unwrap().as_deref(), Some("2002"));

    // A stored card wins over a later parameter
    let second = ready(services.profile(Some("3003")).await.unwrap());
    assert_eq!(second.state().card_id.as_str(), "2002");
}

#[tokio::test]
async fn test_no_card_redirects_to_entry_page() {
    let backend = spawn(Stub::default()).await;
    let services = services_with(&backend, Arc::new(MemoryStorage::new()), "");

    match services.profile(None).await.unwrap() {
        ProfileLoad::Redirect(redirect) => assert_eq!(redirect.target, ENTRY_PAGE),
        ProfileLoad::Ready(_) => panic!("expected a redirect"),
    }
    assert!(backend.recorder.profile_hits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_renew_and_pay_are_local() {
    let backend = spawn(stub_with_records()).await;
    let services = backend.services(MemoryStorage::new());
    let mut controller = ready(services.profile(None).await.unwrap());

    assert!(controller.handle(ProfileEvent::LoanToggled {
        loan_id: 7,
        selected: true
    }));
    assert!(controller.handle(ProfileEvent::RenewSelectedClicked));
    let renewed = controller
        .state()
        .loans
        .iter()
        .find(|loan| loan.loan_id == 7)
        .unwrap();
    assert_eq!(renewed.due_date, chrono::NaiveDate::from_ymd_opt(2024, 6, 24).unwrap());
    assert!(controller.state().selected_loans.is_empty());
    assert_eq!(controller.loan_summary().overdue, 0);

    assert!(controller.handle(ProfileEvent::PayFinesClicked));
    assert!(controller.handle(ProfileEvent::PaymentMethodChosen(PaymentMethod::Cash)));
    assert!(controller.handle(ProfileEvent::ConfirmPaymentClicked));
    assert_eq!(controller.fine_totals().unpaid_items, 0);
    assert_eq!(
        controller.state().notification.as_ref().map(|n| n.message.as_str()),
        Some("Fines paid successfully via cash!")
    );

    // Nothing went back to the server
    assert!(backend.recorder.checkouts().is_empty());
}

#[tokio::test]
async fn test_logout_forgets_card() {
    let backend = spawn(stub_with_records()).await;
    let storage = MemoryStorage::new();
    let services = backend.services(storage.clone());
    let mut controller = ready(services.profile(Some("2002")).await.unwrap());

    assert!(controller.handle(ProfileEvent::LogoutClicked));

    assert_eq!(storage.get(CARD_ID_KEY).unwrap(), None);
    let redirect = controller.state().redirect.clone().unwrap();
    assert_eq!(redirect.target, ENTRY_PAGE);
    assert_eq!(redirect.after, Duration::from_millis(1500));
}

#[tokio::test]
async fn test_theme_survives_restart_in_file_storage() {
    let dir = std::env::temp_dir().join(format!("library-web-profile-{}", std::process::id()));
    let path = dir.join("storage.json");
    let _ = std::fs::remove_file(&path);

    let backend = spawn(stub_with_records()).await;
    profile::save_theme(&FileStorage::new(&path), Theme::Dark).unwrap();

    let services = services_with(&backend, Arc::new(FileStorage::new(&path)), "1001");
    let controller = ready(services.profile(Some("1001")).await.unwrap());
    assert_eq!(controller.state().theme, Theme::Dark);

    let reopened = FileStorage::new(&path);
    assert_eq!(reopened.get(CARD_ID_KEY).unwrap().as_deref(), Some("1001"));

    let _ = std::fs::remove_dir_all(&dir);
}
