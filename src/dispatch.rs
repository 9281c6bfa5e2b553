//! Event to action tables for both controllers.
//!
//! Front-ends translate raw input into events; these tables decide which
//! controller action (if any) an event maps to, given the little context
//! needed for guards such as boundary pages or disabled buttons.

use crate::models::{ContactUpdate, HistoryFilter, PaymentMethod, ProfileSection, StatusFilter, Theme};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Keyboard shortcuts recognised on the catalog page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl/Cmd + K
    FocusSearch,
    Escape,
    ArrowLeft,
    ArrowRight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    /// Search box content changed
    Input(String),
    /// Enter pressed in the search box
    Submit,
    ClearClicked,
    FilterClicked(StatusFilter),
    PageClicked(u32),
    PreviousClicked,
    NextClicked,
    Key(Shortcut),
    SearchBlurred,
    DetailsClicked(String),
    CloseDetails,
    CheckoutClicked { isbn: String, card_input: String },
    RetryClicked,
    DismissNotification,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogAction {
    /// Store the text and (re)arm the debounce timer
    UpdateQuery(String),
    /// Back to page 1 and search immediately
    SearchFirstPage,
    SetFilter(StatusFilter),
    GoToPage(u32),
    /// Empty the query, search from page 1 and focus the box
    ClearQuery,
    FocusSearch,
    Blur,
    ShowDetails(String),
    CloseDetails,
    Checkout { isbn: String, card_input: String },
    Retry,
    DismissNotification,
}

/// Catalog state consulted by the dispatch guards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogContext {
    pub search_focused: bool,
    pub page: u32,
    pub total_pages: u32,
}

pub fn dispatch_catalog(event: CatalogEvent, ctx: CatalogContext) -> Option<CatalogAction> {
    use CatalogAction as A;
    use CatalogEvent as E;

    let action = match event {
        E::Input(text) => A::UpdateQuery(text),
        E::Submit => A::SearchFirstPage,
        E::ClearClicked => A::ClearQuery,
        E::FilterClicked(filter) => A::SetFilter(filter),
        E::PageClicked(page) => A::GoToPage(page),
        E::PreviousClicked if ctx.page > 1 => A::GoToPage(ctx.page - 1),
        E::NextClicked if ctx.page < ctx.total_pages => A::GoToPage(ctx.page + 1),
        E::Key(Shortcut::FocusSearch) => A::FocusSearch,
        E::Key(Shortcut::Escape) if ctx.search_focused => A::ClearQuery,
        E::Key(Shortcut::ArrowLeft) if !ctx.search_focused && ctx.page > 1 => {
            A::GoToPage(ctx.page - 1)
        }
        E::Key(Shortcut::ArrowRight) if !ctx.search_focused && ctx.page < ctx.total_pages => {
            A::GoToPage(ctx.page + 1)
        }
        E::SearchBlurred => A::Blur,
        E::DetailsClicked(isbn) => A::ShowDetails(isbn),
        E::CloseDetails => A::CloseDetails,
        E::CheckoutClicked { isbn, card_input } => A::Checkout { isbn, card_input },
        E::RetryClicked => A::Retry,
        E::DismissNotification => A::DismissNotification,
        _ => return None,
    };
    Some(action)
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileEvent {
    MenuClicked(ProfileSection),
    EditClicked,
    CancelEditClicked,
    ContactSubmitted(ContactUpdate),
    LoanToggled { loan_id: i64, selected: bool },
    RenewSelectedClicked,
    RenewClicked(i64),
    PayFinesClicked,
    PaymentMethodChosen(PaymentMethod),
    ConfirmPaymentClicked,
    ModalCloseClicked,
    HistoryFilterChanged(HistoryFilter),
    ThemeClicked(Theme),
    LogoutClicked,
    DismissNotification,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileAction {
    ShowSection(ProfileSection),
    BeginEdit,
    CancelEdit,
    SubmitContact(ContactUpdate),
    SelectLoan { loan_id: i64, selected: bool },
    RenewSelected,
    RenewSingle(i64),
    OpenPayment,
    ChoosePaymentMethod(PaymentMethod),
    PayFines,
    ClosePayment,
    FilterHistory(HistoryFilter),
    SetTheme(Theme),
    Logout,
    DismissNotification,
}

/// Profile state consulted by the dispatch guards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileContext {
    pub has_loans: bool,
    pub has_fines: bool,
    pub payment_open: bool,
}

pub fn dispatch_profile(event: ProfileEvent, ctx: ProfileContext) -> Option<ProfileAction> {
    use ProfileAction as A;
    use ProfileEvent as E;

    let action = match event {
        E::MenuClicked(section) => A::ShowSection(section),
        E::EditClicked => A::BeginEdit,
        E::CancelEditClicked => A::CancelEdit,
        E::ContactSubmitted(update) => A::SubmitContact(update),
        E::LoanToggled { loan_id, selected } => A::SelectLoan { loan_id, selected },
        E::RenewSelectedClicked if ctx.has_loans => A::RenewSelected,
        E::RenewClicked(loan_id) => A::RenewSingle(loan_id),
        E::PayFinesClicked if ctx.has_fines => A::OpenPayment,
        E::PaymentMethodChosen(method) if ctx.payment_open => A::ChoosePaymentMethod(method),
        E::ConfirmPaymentClicked if ctx.payment_open => A::PayFines,
        E::ModalCloseClicked if ctx.payment_open => A::ClosePayment,
        E::HistoryFilterChanged(filter) => A::FilterHistory(filter),
        E::ThemeClicked(theme) => A::SetTheme(theme),
        E::LogoutClicked => A::Logout,
        E::DismissNotification => A::DismissNotification,
        _ => return None,
    };
    Some(action)
}
