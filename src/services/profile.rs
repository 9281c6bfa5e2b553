//! Patron profile controller
//!
//! Loads the patron's identity, loans, fines and reading history, each with a
//! three-tier fallback, then applies local-only mutations on top. Nothing in
//! here writes back to the backend.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use validator::Validate;

use crate::api::CatalogApi;
use crate::config::ProfileConfig;
use crate::dispatch::{dispatch_profile, ProfileAction, ProfileContext, ProfileEvent};
use crate::error::AppResult;
use crate::models::{
    Borrower, CardId, ContactUpdate, Fine, FineTotals, HistoryEntry, HistoryFilter, HistoryStats,
    Loan, LoanSummary, PaymentMethod, ProfileSection, Theme,
};
use crate::services::clock::Clock;
use crate::services::fallback;
use crate::services::storage::{Storage, CARD_ID_KEY, THEME_KEY};
use crate::view::{self, Notification, ProfileView};

/// Page the patron is sent back to when no card is known or on logout
pub const ENTRY_PAGE: &str = "index.html";

/// Where a profile record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Dedicated endpoint
    #[default]
    Backend,
    /// Built from a generic search response, or derived from other records
    Synthesized,
    /// Static stand-in
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct DataSources {
    pub borrower: DataSource,
    pub loans: DataSource,
    pub fines: DataSource,
    pub history: DataSource,
}

/// Navigation away from the profile
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Redirect {
    pub target: String,
    pub after: Duration,
}

impl Redirect {
    pub fn to_entry(after: Duration) -> Self {
        Self {
            target: ENTRY_PAGE.to_string(),
            after,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileState {
    pub card_id: CardId,
    pub borrower: Borrower,
    pub loans: Vec<Loan>,
    pub fines: Vec<Fine>,
    pub history: Vec<HistoryEntry>,
    pub sources: DataSources,
    pub section: ProfileSection,
    pub history_filter: HistoryFilter,
    pub selected_loans: BTreeSet<i64>,
    /// Edit form contents while the personal info form is open
    pub editing: Option<ContactUpdate>,
    pub payment_open: bool,
    pub payment_method: PaymentMethod,
    pub theme: Theme,
    pub notification: Option<Notification>,
    pub redirect: Option<Redirect>,
}

/// Outcome of opening the profile
pub enum ProfileLoad {
    Ready(Box<ProfileController>),
    Redirect(Redirect),
}

/// Resolve the card to show: stored card, then `param` (persisted when used),
/// then `default_card_id`. `None` when nothing usable is found.
pub fn resolve_card_id(
    storage: &dyn Storage,
    param: Option<&str>,
    default_card_id: &str,
) -> AppResult<Option<CardId>> {
    if let Some(stored) = storage.get(CARD_ID_KEY)? {
        match stored.parse::<CardId>() {
            Ok(card) => return Ok(Some(card)),
            Err(_) => tracing::warn!("Ignoring malformed stored card id {:?}", stored),
        }
    }

    if let Some(param) = param.filter(|p| !p.trim().is_empty()) {
        match param.parse::<CardId>() {
            Ok(card) => {
                storage.set(CARD_ID_KEY, card.as_str())?;
                return Ok(Some(card));
            }
            Err(_) => tracing::warn!("Ignoring malformed card id parameter {:?}", param),
        }
    }

    if default_card_id.trim().is_empty() {
        return Ok(None);
    }
    Ok(default_card_id.parse::<CardId>().ok())
}

pub struct ProfileController {
    api: Arc<dyn CatalogApi>,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    config: ProfileConfig,
    state: ProfileState,
}

impl ProfileController {
    /// Resolve the card and load every section in order
    pub async fn open(
        api: Arc<dyn CatalogApi>,
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        config: ProfileConfig,
        card_param: Option<&str>,
    ) -> AppResult<ProfileLoad> {
        let Some(card_id) = resolve_card_id(storage.as_ref(), card_param, &config.default_card_id)?
        else {
            tracing::info!("No card id available, redirecting to {}", ENTRY_PAGE);
            return Ok(ProfileLoad::Redirect(Redirect::to_entry(Duration::ZERO)));
        };

        tracing::info!("Loading profile for card {}", card_id);
        let theme = load_theme(storage.as_ref());
        let mut controller = Self {
            state: ProfileState {
                borrower: fallback::placeholder_borrower(card_id.as_str()),
                card_id,
                loans: Vec::new(),
                fines: Vec::new(),
                history: Vec::new(),
                sources: DataSources::default(),
                section: ProfileSection::Personal,
                history_filter: HistoryFilter::All,
                selected_loans: BTreeSet::new(),
                editing: None,
                payment_open: false,
                payment_method: PaymentMethod::default(),
                theme,
                notification: None,
                redirect: None,
            },
            api,
            storage,
            clock,
            config,
        };

        controller.load_borrower().await;
        controller.load_loans().await;
        controller.load_fines().await;
        controller.load_history().await;

        Ok(ProfileLoad::Ready(Box::new(controller)))
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn render(&self) -> ProfileView {
        view::profile::render(&self.state, self.today(), self.config.due_soon_days)
    }

    // -- loading --------------------------------------------------------

    async fn load_borrower(&mut self) {
        let card = self.state.card_id.clone();
        let (borrower, source) = match self.api.borrower(&card).await {
            Ok(borrower) => (borrower, DataSource::Backend),
            Err(e) => {
                tracing::warn!("Borrower endpoint failed for {}: {}", card, e);
                let probe = self
                    .api
                    .search(&fallback::probe_query(fallback::BORROWER_PROBE_LIMIT))
                    .await;
                match probe
                    .ok()
                    .and_then(|page| fallback::borrower_from_search(card.as_str(), &page, self.today()))
                {
                    Some(borrower) => (borrower, DataSource::Synthesized),
                    None => (fallback::placeholder_borrower(card.as_str()), DataSource::Placeholder),
                }
            }
        };
        self.state.borrower = borrower;
        self.state.sources.borrower = source;
    }

    async fn load_loans(&mut self) {
        let card = self.state.card_id.clone();
        let (loans, source) = match self.api.loans(&card).await {
            Ok(loans) => (loans, DataSource::Backend),
            Err(e) => {
                tracing::warn!("Loans endpoint failed for {}: {}", card, e);
                match self
                    .api
                    .search(&fallback::probe_query(fallback::LOANS_PROBE_LIMIT))
                    .await
                {
                    Ok(page) => (
                        fallback::loans_from_books(&page.books, self.today()),
                        DataSource::Synthesized,
                    ),
                    Err(_) => (fallback::placeholder_loans(self.today()), DataSource::Placeholder),
                }
            }
        };
        tracing::debug!("Loaded {} loans ({:?})", loans.len(), source);
        self.state.loans = loans;
        self.state.sources.loans = source;
    }

    /// Fines for this card; derived from the overdue loans when the endpoint fails.
    async fn load_fines(&mut self) {
        let card = self.state.card_id.clone();
        let (fines, source) = match self.api.fines().await {
            Ok(fines) => (
                fines
                    .into_iter()
                    .filter(|fine| fine.card_id.as_deref() == Some(card.as_str()))
                    .collect(),
                DataSource::Backend,
            ),
            Err(e) => {
                tracing::warn!("Fines endpoint failed: {}", e);
                (
                    fallback::fines_from_loans(&self.state.loans, self.today(), self.config.fine_rate),
                    DataSource::Synthesized,
                )
            }
        };
        self.state.fines = fines;
        self.state.sources.fines = source;
    }

    async fn load_history(&mut self) {
        let card = self.state.card_id.clone();
        let (history, source) = match self.api.history(&card).await {
            Ok(history) => (history, DataSource::Backend),
            Err(e) => {
                tracing::warn!("History endpoint failed for {}: {}", card, e);
                match self
                    .api
                    .search(&fallback::probe_query(fallback::HISTORY_PROBE_LIMIT))
                    .await
                {
                    Ok(page) => (
                        fallback::history_from_books(&page.books, self.today()),
                        DataSource::Synthesized,
                    ),
                    Err(_) => (fallback::placeholder_history(self.today()), DataSource::Placeholder),
                }
            }
        };
        self.state.history = history;
        self.state.sources.history = source;
    }

    // -- events ---------------------------------------------------------

    pub fn context(&self) -> ProfileContext {
        ProfileContext {
            has_loans: !self.state.loans.is_empty(),
            has_fines: !self.state.fines.is_empty(),
            payment_open: self.state.payment_open,
        }
    }

    /// Translate a raw event through the dispatch table and apply it.
    /// Returns `false` when the event maps to no action.
    pub fn handle(&mut self, event: ProfileEvent) -> bool {
        match dispatch_profile(event, self.context()) {
            Some(action) => {
                self.apply(action);
                true
            }
            None => false,
        }
    }

    pub fn apply(&mut self, action: ProfileAction) {
        match action {
            ProfileAction::ShowSection(section) => self.show_section(section),
            ProfileAction::BeginEdit => self.begin_edit(),
            ProfileAction::CancelEdit => self.cancel_edit(),
            ProfileAction::SubmitContact(update) => self.submit_contact(update),
            ProfileAction::SelectLoan { loan_id, selected } => self.select_loan(loan_id, selected),
            ProfileAction::RenewSelected => self.renew_selected(),
            ProfileAction::RenewSingle(loan_id) => self.renew_single(loan_id),
            ProfileAction::OpenPayment => self.state.payment_open = true,
            ProfileAction::ChoosePaymentMethod(method) => self.state.payment_method = method,
            ProfileAction::PayFines => self.pay_fines(),
            ProfileAction::ClosePayment => self.state.payment_open = false,
            ProfileAction::FilterHistory(filter) => self.state.history_filter = filter,
            ProfileAction::SetTheme(theme) => self.set_theme(theme),
            ProfileAction::Logout => self.logout(),
            ProfileAction::DismissNotification => self.state.notification = None,
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.state.notification = Some(notification);
    }

    pub fn show_section(&mut self, section: ProfileSection) {
        self.state.section = section;
    }

    // -- personal info --------------------------------------------------

    pub fn begin_edit(&mut self) {
        self.state.editing = Some(self.state.borrower.contact());
    }

    /// Close the form; reopening starts from the current values again
    pub fn cancel_edit(&mut self) {
        self.state.editing = None;
    }

    pub fn submit_contact(&mut self, update: ContactUpdate) {
        if let Err(e) = update.validate() {
            let error = crate::error::AppError::from(e);
            self.notify(Notification::error(error.user_message()));
            self.state.editing = Some(update);
            return;
        }
        self.state.borrower.apply_contact(&update);
        self.state.editing = None;
        self.notify(Notification::success("Personal information updated successfully!"));
    }

    // -- loans ----------------------------------------------------------

    pub fn select_loan(&mut self, loan_id: i64, selected: bool) {
        if selected {
            self.state.selected_loans.insert(loan_id);
        } else {
            self.state.selected_loans.remove(&loan_id);
        }
    }

    pub fn loan_summary(&self) -> LoanSummary {
        LoanSummary::compute(&self.state.loans, self.today())
    }

    pub fn renew_single(&mut self, loan_id: i64) {
        let days = self.config.renewal_days;
        match self.state.loans.iter_mut().find(|l| l.loan_id == loan_id) {
            Some(loan) => {
                loan.renew(days);
                tracing::debug!("Renewed loan {} until {}", loan_id, loan.due_date);
                self.notify(Notification::success("Book renewed successfully!"));
            }
            None => self.notify(Notification::error(format!("Loan {} not found.", loan_id))),
        }
    }

    pub fn renew_selected(&mut self) {
        if self.state.selected_loans.is_empty() {
            self.notify(Notification::error("Please select at least one loan to renew"));
            return;
        }
        let days = self.config.renewal_days;
        let selected = std::mem::take(&mut self.state.selected_loans);
        let mut renewed = 0;
        for loan in self
            .state
            .loans
            .iter_mut()
            .filter(|l| selected.contains(&l.loan_id))
        {
            loan.renew(days);
            renewed += 1;
        }
        self.notify(Notification::success(format!(
            "Renewed {} book(s) successfully!",
            renewed
        )));
    }

    // -- fines ----------------------------------------------------------

    pub fn fine_totals(&self) -> FineTotals {
        FineTotals::compute(&self.state.fines)
    }

    pub fn pay_fines(&mut self) {
        for fine in &mut self.state.fines {
            fine.paid = true;
        }
        self.state.payment_open = false;
        let method = self.state.payment_method;
        tracing::info!("Marked {} fines paid via {}", self.state.fines.len(), method);
        self.notify(Notification::success(format!(
            "Fines paid successfully via {}!",
            method
        )));
    }

    // -- history --------------------------------------------------------

    pub fn visible_history(&self) -> Vec<&HistoryEntry> {
        self.state
            .history_filter
            .apply(&self.state.history, self.today())
    }

    pub fn history_stats(&self) -> HistoryStats {
        HistoryStats::compute(&self.state.history, self.today())
    }

    // -- settings -------------------------------------------------------

    pub fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
        match save_theme(self.storage.as_ref(), theme) {
            Ok(()) => self.notify(Notification::success(format!(
                "Theme changed to {} mode",
                theme
            ))),
            Err(e) => {
                tracing::error!("Failed to persist theme: {}", e);
                self.notify(Notification::error(e.user_message()));
            }
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = forget_card(self.storage.as_ref()) {
            tracing::error!("Failed to clear stored card id: {}", e);
        }
        tracing::info!("Logged out card {}", self.state.card_id);
        self.notify(Notification::success("Logged out successfully"));
        self.state.redirect = Some(Redirect::to_entry(self.config.logout_delay()));
    }
}

pub fn save_theme(storage: &dyn Storage, theme: Theme) -> AppResult<()> {
    storage.set(THEME_KEY, theme.as_str())
}

/// Drop the remembered card so the next visit starts from the entry page
pub fn forget_card(storage: &dyn Storage) -> AppResult<()> {
    storage.remove(CARD_ID_KEY)
}

/// Saved theme, light when nothing (or garbage) is stored
pub fn load_theme(storage: &dyn Storage) -> Theme {
    match storage.get(THEME_KEY) {
        Ok(Some(raw)) => raw.parse().unwrap_or_default(),
        Ok(None) => Theme::default(),
        Err(e) => {
            tracing::warn!("Could not read saved theme: {}", e);
            Theme::default()
        }
    }
}
