//! Catalog search controller
//!
//! Owns the search state (query, filter, page, results) and the transient UI
//! state around it. Network calls are split into a synchronous `begin_*`
//! step, the request itself, and a `finish_*` step, so a front-end can keep
//! reading input while a request is outstanding.

use std::sync::Arc;

use crate::api::{CatalogApi, CheckoutReceipt, CheckoutRequest, HealthStatus};
use crate::config::CatalogConfig;
use crate::dispatch::{dispatch_catalog, CatalogAction, CatalogContext, CatalogEvent};
use crate::error::{AppError, AppResult};
use crate::models::{Book, CardId, SearchPage, SearchQuery, StatusFilter};
use crate::services::fallback;
use crate::view::{self, CatalogView, Notification};

/// Search parameters and the last page of results
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub filter: StatusFilter,
    pub page: u32,
    pub page_size: u32,
    pub total_results: u64,
    pub books: Vec<Book>,
}

impl SearchState {
    pub fn new(page_size: u32) -> Self {
        Self {
            query: String::new(),
            filter: StatusFilter::All,
            page: 1,
            page_size: page_size.max(1),
            total_results: 0,
            books: Vec::new(),
        }
    }

    /// Never less than one, even for an empty result set
    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.page_size);
        let pages = self.total_results.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Highest page whose offset still fits a request
    pub fn max_page(&self) -> u32 {
        (u32::MAX / self.page_size).saturating_add(1)
    }

    pub fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.total_pages());
    }

    pub fn to_query(&self) -> SearchQuery {
        SearchQuery::for_page(&self.query, self.filter, self.page, self.page_size)
    }

    /// Replace the results wholesale
    pub fn apply(&mut self, page: SearchPage) {
        self.books = page.books;
        self.total_results = page.total;
        self.clamp_page();
    }

    pub fn title(&self) -> String {
        if !self.query.is_empty() {
            format!("Search Results for \"{}\"", self.query)
        } else {
            match self.filter {
                StatusFilter::Available => "Available Books".to_string(),
                StatusFilter::CheckedOut => "Checked Out Books".to_string(),
                StatusFilter::All => "All Books".to_string(),
            }
        }
    }

    pub fn find(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.isbn == isbn)
    }
}

/// Transient presentation state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogUi {
    /// Set while a search or checkout is outstanding
    pub loading: bool,
    /// Message of the error panel, shown above the results
    pub error_panel: Option<String>,
    /// Book shown in the details modal
    pub details: Option<Book>,
    pub notification: Option<Notification>,
    /// Bumped on every notification, including a repeat of the same message
    pub notification_seq: u64,
    pub search_focused: bool,
    /// A refreshing search is due after a successful checkout
    pub refresh_pending: bool,
}

/// What the driver must do after an action was applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEffect {
    /// Only the rendering changed
    Render,
    /// (Re)arm the debounce timer
    Debounce,
    /// Run a search now
    Search,
    /// Run a checkout for the given book and card input
    Checkout { isbn: String, card_input: String },
}

pub struct CatalogController {
    api: Arc<dyn CatalogApi>,
    config: CatalogConfig,
    state: SearchState,
    ui: CatalogUi,
}

impl CatalogController {
    pub fn new(api: Arc<dyn CatalogApi>, config: CatalogConfig) -> Self {
        Self {
            state: SearchState::new(config.page_size),
            ui: CatalogUi::default(),
            api,
            config,
        }
    }

    pub fn api(&self) -> Arc<dyn CatalogApi> {
        Arc::clone(&self.api)
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn ui(&self) -> &CatalogUi {
        &self.ui
    }

    pub fn render(&self) -> CatalogView {
        view::catalog::render(&self.state, &self.ui, self.config.max_page_buttons)
    }

    pub fn context(&self) -> CatalogContext {
        CatalogContext {
            search_focused: self.ui.search_focused,
            page: self.state.page,
            total_pages: self.state.total_pages(),
        }
    }

    /// Translate a raw event through the dispatch table and apply it
    pub fn handle(&mut self, event: CatalogEvent) -> Option<CatalogEffect> {
        let action = dispatch_catalog(event, self.context())?;
        Some(self.apply(action))
    }

    pub fn apply(&mut self, action: CatalogAction) -> CatalogEffect {
        match action {
            CatalogAction::UpdateQuery(text) => {
                self.state.query = text.trim().to_string();
                CatalogEffect::Debounce
            }
            CatalogAction::SearchFirstPage => {
                self.state.page = 1;
                CatalogEffect::Search
            }
            CatalogAction::SetFilter(filter) => {
                self.state.filter = filter;
                self.state.page = 1;
                CatalogEffect::Search
            }
            CatalogAction::GoToPage(page) => {
                self.state.page = page;
                self.state.clamp_page();
                CatalogEffect::Search
            }
            CatalogAction::ClearQuery => {
                self.state.query.clear();
                self.state.page = 1;
                self.ui.search_focused = true;
                CatalogEffect::Search
            }
            CatalogAction::FocusSearch => {
                self.ui.search_focused = true;
                CatalogEffect::Render
            }
            CatalogAction::Blur => {
                self.ui.search_focused = false;
                CatalogEffect::Render
            }
            CatalogAction::ShowDetails(isbn) => {
                self.show_details(&isbn);
                CatalogEffect::Render
            }
            CatalogAction::CloseDetails => {
                self.ui.details = None;
                CatalogEffect::Render
            }
            CatalogAction::Checkout { isbn, card_input } => {
                CatalogEffect::Checkout { isbn, card_input }
            }
            CatalogAction::Retry => CatalogEffect::Search,
            CatalogAction::DismissNotification => {
                self.ui.notification = None;
                CatalogEffect::Render
            }
        }
    }

    /// Preset the search parameters without running a search. The page is
    /// clamped once the results arrive.
    pub fn set_search(&mut self, query: &str, filter: StatusFilter, page: u32) {
        self.state.query = query.trim().to_string();
        self.state.filter = filter;
        self.state.page = page.clamp(1, self.state.max_page());
    }

    /// The debounce timer elapsed: search the current text from page 1
    pub fn debounce_elapsed(&mut self) -> CatalogEffect {
        self.state.page = 1;
        CatalogEffect::Search
    }

    fn show_details(&mut self, isbn: &str) {
        match self.state.find(isbn) {
            Some(book) => self.ui.details = Some(book.clone()),
            None => self.notify(Notification::error(format!(
                "Book {} is not in the current results.",
                isbn
            ))),
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        self.ui.notification = Some(notification);
        self.ui.notification_seq += 1;
    }

    pub fn dismiss_notification(&mut self) {
        self.ui.notification = None;
    }

    // -- health ---------------------------------------------------------

    /// Probe the backend; an unhealthy answer raises the error panel.
    pub async fn check_health(&mut self) -> HealthStatus {
        let health = match self.api.health().await {
            Ok(health) => health,
            Err(e) => HealthStatus::unreachable(e.to_string()),
        };
        if !health.is_healthy() {
            tracing::warn!("Backend unhealthy: {:?}", health.message);
            self.ui.error_panel =
                Some("API is not responding. Please start the backend server.".to_string());
        }
        health
    }

    /// Initial page load: health probe, then the first search
    pub async fn initialize(&mut self) {
        tracing::info!("Initializing catalog");
        self.check_health().await;
        self.perform_search().await;
    }

    // -- search ---------------------------------------------------------

    /// Enter the loading state; `None` when a request is already outstanding.
    pub fn begin_search(&mut self) -> Option<SearchQuery> {
        if self.ui.loading {
            tracing::debug!("Search ignored, a request is already in flight");
            return None;
        }
        self.ui.loading = true;
        Some(self.state.to_query())
    }

    /// Leave the loading state with the outcome of the request started by
    /// [`begin_search`](Self::begin_search).
    pub fn finish_search(&mut self, result: AppResult<SearchPage>) {
        self.ui.loading = false;
        match result {
            Ok(page) => {
                tracing::debug!("Search returned {} of {} books", page.books.len(), page.total);
                self.ui.error_panel = None;
                self.state.apply(page);
            }
            Err(e) => {
                tracing::error!(category = ?e.category(), "Search error: {}", e);
                self.ui.error_panel = Some(format!(
                    "Search failed: {}. Make sure the backend server is running.",
                    e.user_message()
                ));
                self.use_sample_data();
            }
        }
    }

    pub async fn perform_search(&mut self) {
        let Some(query) = self.begin_search() else {
            return;
        };
        let result = self.api.search(&query).await;
        self.finish_search(result);
    }

    fn use_sample_data(&mut self) {
        tracing::warn!("Falling back to sample books");
        let page = fallback::sample_page(
            &self.state.query,
            self.state.filter,
            self.state.page,
            self.state.page_size,
        );
        self.state.apply(page);
    }

    // -- checkout -------------------------------------------------------

    /// Validate a checkout locally. Rejections surface as an error
    /// notification and never reach the network.
    pub fn begin_checkout(&mut self, isbn: &str, card_input: &str) -> Option<CheckoutRequest> {
        match self.validate_checkout(isbn, card_input) {
            Ok(request) => {
                self.ui.loading = true;
                Some(request)
            }
            Err(e) => {
                tracing::debug!("Checkout rejected locally: {}", e);
                self.notify(Notification::error(e.user_message()));
                None
            }
        }
    }

    fn validate_checkout(&self, isbn: &str, card_input: &str) -> AppResult<CheckoutRequest> {
        if self.ui.loading {
            return Err(AppError::Validation(
                "Please wait for the current request to finish.".to_string(),
            ));
        }
        let book = self
            .state
            .find(isbn)
            .or(self.ui.details.as_ref().filter(|b| b.isbn == isbn))
            .ok_or_else(|| {
                AppError::Validation(format!("Book {} is not in the current results.", isbn))
            })?;
        if !book.is_available() {
            return Err(AppError::Validation(
                "This book is currently checked out.".to_string(),
            ));
        }
        let card: CardId = card_input.parse()?;
        Ok(CheckoutRequest {
            isbn: book.isbn.clone(),
            card_id: card.as_number()?,
        })
    }

    pub fn finish_checkout(
        &mut self,
        request: &CheckoutRequest,
        result: AppResult<CheckoutReceipt>,
    ) {
        self.ui.loading = false;
        match result {
            Ok(receipt) => {
                let title = self
                    .state
                    .find(&request.isbn)
                    .or(self.ui.details.as_ref())
                    .map(|b| b.title.clone())
                    .unwrap_or_else(|| request.isbn.clone());
                tracing::info!(
                    "Checked out {} to card {} (loan {:?})",
                    request.isbn,
                    request.card_id,
                    receipt.loan_id
                );
                self.notify(Notification::success(format!(
                    "Successfully checked out \"{}\" to borrower {}",
                    title, request.card_id
                )));
                self.ui.refresh_pending = true;
            }
            Err(e) => {
                tracing::error!(category = ?e.category(), "Checkout error: {}", e);
                self.notify(Notification::error(format!(
                    "Checkout failed: {}",
                    e.user_message()
                )));
            }
        }
    }

    pub async fn checkout(&mut self, isbn: &str, card_input: &str) {
        let Some(request) = self.begin_checkout(isbn, card_input) else {
            return;
        };
        let result = self.api.checkout(&request).await;
        self.finish_checkout(&request, result);
    }

    /// The post-checkout delay elapsed: close the modal and search again
    pub fn refresh_due(&mut self) -> CatalogEffect {
        self.ui.refresh_pending = false;
        self.ui.details = None;
        CatalogEffect::Search
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockCatalogApi;
    use crate::models::Availability;

    fn book(isbn: &str, title: &str, availability: Availability) -> Book {
        Book {
            isbn: isbn.to_string(),
            title: title.to_string(),
            authors: Some("Frank Herbert".to_string()),
            publication_year: Some(1965),
            pages: Some(412),
            publisher: Some("Chilton".to_string()),
            genre: Some("Science Fiction".to_string()),
            language: None,
            total_checkouts: None,
            availability,
        }
    }

    fn controller(api: MockCatalogApi) -> CatalogController {
        CatalogController::new(Arc::new(api), CatalogConfig::default())
    }

    #[test]
    fn test_total_pages_and_clamp() {
        let mut state = SearchState::new(12);
        assert_eq!(state.total_pages(), 1);
        state.total_results = 50;
        assert_eq!(state.total_pages(), 5);
        state.total_results = 48;
        assert_eq!(state.total_pages(), 4);

        state.page = 9;
        state.clamp_page();
        assert_eq!(state.page, 4);
        state.page = 0;
        state.clamp_page();
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_results_title() {
        let mut state = SearchState::new(12);
        assert_eq!(state.title(), "All Books");
        state.filter = StatusFilter::CheckedOut;
        assert_eq!(state.title(), "Checked Out Books");
        state.query = "dune".to_string();
        assert_eq!(state.title(), "Search Results for \"dune\"");
    }

    #[tokio::test]
    async fn test_search_sends_offset_and_status() {
        let mut api = MockCatalogApi::new();
        api.expect_search()
            .withf(|q| q.q == "dune" && q.offset == 24 && q.limit == 12 && q.status == StatusFilter::Available)
            .times(1)
            .returning(|_| {
                Ok(SearchPage {
                    books: vec![],
                    total: 50,
                })
            });

        let mut catalog = controller(api);
        catalog.apply(CatalogAction::UpdateQuery("  dune ".into()));
        catalog.apply(CatalogAction::SetFilter(StatusFilter::Available));
        catalog.state.total_results = 50;
        catalog.apply(CatalogAction::GoToPage(3));
        catalog.perform_search().await;

        assert_eq!(catalog.state().page, 3);
        assert_eq!(catalog.state().total_pages(), 5);
        assert!(!catalog.ui().loading);
    }

    #[tokio::test]
    async fn test_failed_search_shows_panel_and_sample() {
        let mut api = MockCatalogApi::new();
        api.expect_search().returning(|_| {
            Err(AppError::HttpStatus {
                status: 500,
                message: None,
            })
        });

        let mut catalog = controller(api);
        catalog.perform_search().await;

        assert_eq!(catalog.state().books.len(), 2);
        assert_eq!(catalog.state().total_results, 2);
        let panel = catalog.ui().error_panel.clone().unwrap();
        assert!(panel.contains("HTTP error! status: 500"), "{}", panel);
    }

    #[tokio::test]
    async fn test_failed_search_on_later_page_still_shows_sample() {
        let mut api = MockCatalogApi::new();
        api.expect_search()
            .withf(|q| q.offset == 24)
            .returning(|_| Err(AppError::Transport("connection refused".into())));

        let mut catalog = controller(api);
        catalog.set_search("", StatusFilter::All, 3);
        catalog.perform_search().await;

        assert_eq!(catalog.state().page, 1);
        assert_eq!(catalog.state().total_results, 2);
        assert_eq!(catalog.state().books.len(), 2);
        assert!(catalog.ui().error_panel.is_some());
    }

    #[tokio::test]
    async fn test_huge_page_does_not_overflow_offset() {
        let mut api = MockCatalogApi::new();
        api.expect_health().returning(|| {
            Ok(HealthStatus {
                status: "healthy".to_string(),
                database: None,
                message: None,
            })
        });
        api.expect_search()
            .withf(|q| q.offset == (u32::MAX / 12) * 12)
            .times(1)
            .returning(|_| {
                Ok(SearchPage {
                    books: vec![],
                    total: 50,
                })
            });

        let mut catalog = controller(api);
        catalog.set_search("", StatusFilter::All, 400_000_000);
        assert_eq!(catalog.state().page, catalog.state().max_page());
        catalog.initialize().await;

        assert_eq!(catalog.state().page, 5);
    }

    #[test]
    fn test_repeated_notification_bumps_sequence() {
        let mut catalog = controller(MockCatalogApi::new());
        catalog.notify(Notification::error("Please enter a valid numeric Card ID."));
        let first = catalog.ui().notification_seq;
        catalog.notify(Notification::error("Please enter a valid numeric Card ID."));
        assert_eq!(catalog.ui().notification_seq, first + 1);
    }

    #[test]
    fn test_in_flight_search_is_ignored() {
        let mut catalog = controller(MockCatalogApi::new());
        assert!(catalog.begin_search().is_some());
        assert!(catalog.begin_search().is_none());
        catalog.finish_search(Ok(SearchPage::default()));
        assert!(catalog.begin_search().is_some());
    }

    #[tokio::test]
    async fn test_non_numeric_card_makes_no_request() {
        let mut api = MockCatalogApi::new();
        api.expect_checkout().times(0);

        let mut catalog = controller(api);
        catalog.state.apply(SearchPage {
            books: vec![book("9780441013593", "Dune", Availability::Available)],
            total: 1,
        });
        catalog.checkout("9780441013593", "abc").await;

        let notification = catalog.ui().notification.clone().unwrap();
        assert!(notification.is_error());
        assert_eq!(notification.message, "Please enter a valid numeric Card ID.");
        assert!(!catalog.ui().loading);
    }

    #[tokio::test]
    async fn test_unavailable_book_rejected_locally() {
        let mut api = MockCatalogApi::new();
        api.expect_checkout().times(0);

        let mut catalog = controller(api);
        catalog.state.apply(SearchPage {
            books: vec![book("1", "Dune", Availability::CheckedOut)],
            total: 1,
        });
        catalog.checkout("1", "1001").await;
        assert_eq!(
            catalog.ui().notification.as_ref().map(|n| n.message.as_str()),
            Some("This book is currently checked out.")
        );
    }

    #[tokio::test]
    async fn test_successful_checkout_schedules_refresh() {
        let mut api = MockCatalogApi::new();
        api.expect_checkout()
            .withf(|r| r.isbn == "1" && r.card_id == 1001)
            .times(1)
            .returning(|_| Ok(CheckoutReceipt::default()));

        let mut catalog = controller(api);
        catalog.state.apply(SearchPage {
            books: vec![book("1", "Dune", Availability::Available)],
            total: 1,
        });
        catalog.apply(CatalogAction::ShowDetails("1".into()));
        catalog.checkout("1", "1001").await;

        assert!(catalog.ui().refresh_pending);
        assert_eq!(
            catalog.ui().notification.as_ref().map(|n| n.message.as_str()),
            Some("Successfully checked out \"Dune\" to borrower 1001")
        );
        assert_eq!(catalog.refresh_due(), CatalogEffect::Search);
        assert!(catalog.ui().details.is_none());
    }

    #[tokio::test]
    async fn test_failed_checkout_leaves_state_unchanged() {
        let mut api = MockCatalogApi::new();
        api.expect_checkout().returning(|_| {
            Err(AppError::HttpStatus {
                status: 400,
                message: Some("Book is already checked out".to_string()),
            })
        });

        let mut catalog = controller(api);
        catalog.state.apply(SearchPage {
            books: vec![book("1", "Dune", Availability::Available)],
            total: 1,
        });
        let before = catalog.state().clone();
        catalog.checkout("1", "1001").await;

        assert_eq!(catalog.state(), &before);
        assert!(!catalog.ui().refresh_pending);
        assert_eq!(
            catalog.ui().notification.as_ref().map(|n| n.message.as_str()),
            Some("Checkout failed: Book is already checked out")
        );
    }

    #[tokio::test]
    async fn test_unhealthy_backend_raises_panel() {
        let mut api = MockCatalogApi::new();
        api.expect_health()
            .returning(|| Err(AppError::Transport("connection refused".into())));

        let mut catalog = controller(api);
        let health = catalog.check_health().await;
        assert!(!health.is_healthy());
        assert!(catalog.ui().error_panel.is_some());
    }

    #[test]
    fn test_clear_resets_query_and_page() {
        let mut catalog = controller(MockCatalogApi::new());
        catalog.apply(CatalogAction::UpdateQuery("dune".into()));
        catalog.state.total_results = 100;
        catalog.apply(CatalogAction::GoToPage(4));
        assert_eq!(catalog.apply(CatalogAction::ClearQuery), CatalogEffect::Search);
        assert_eq!(catalog.state().query, "");
        assert_eq!(catalog.state().page, 1);
        assert!(catalog.ui().search_focused);
    }
}
