//! Profile dashboard view-models

use chrono::NaiveDate;
use serde::Serialize;

use super::notification::Notification;
use super::{format_date, format_money};
use crate::models::borrower::format_ssn;
use crate::models::{
    ContactUpdate, Fine, FineTotals, HistoryEntry, HistoryFilter, HistoryStats, Loan, LoanStatus,
    LoanSummary, PaymentMethod, ProfileSection, Theme,
};
use crate::services::profile::{DataSources, ProfileState, Redirect};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItem {
    pub section: ProfileSection,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalView {
    pub full_name: String,
    pub card_number: String,
    pub ssn: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub member_since: String,
    pub total_borrowed: String,
    /// Open edit form, prefilled
    pub edit_form: Option<ContactUpdate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanRow {
    pub loan_id: i64,
    pub title: String,
    pub author_line: String,
    pub isbn_line: String,
    pub date_out: String,
    pub due_date: String,
    pub days_left: String,
    pub days_left_class: &'static str,
    pub status: LoanStatus,
    pub status_label: &'static str,
    pub selected: bool,
}

impl LoanRow {
    pub fn new(loan: &Loan, today: NaiveDate, due_soon_days: i64, selected: bool) -> Self {
        let days_left = loan.days_left(today);
        let status = loan.status(today, due_soon_days);
        let (days_left_text, days_left_class) = match status {
            LoanStatus::Overdue => (format!("Overdue by {} days", days_left.abs()), "urgent"),
            LoanStatus::DueSoon => (days_left.to_string(), "warning"),
            LoanStatus::Good => (days_left.to_string(), "good"),
        };
        Self {
            loan_id: loan.loan_id,
            title: loan.title.clone(),
            author_line: by_line(loan.authors.as_deref()),
            isbn_line: format!("ISBN: {}", loan.isbn),
            date_out: format_date(Some(loan.date_out)),
            due_date: format_date(Some(loan.due_date)),
            days_left: days_left_text,
            days_left_class,
            status,
            status_label: status.label(),
            selected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoansView {
    pub summary: LoanSummary,
    pub rows: Vec<LoanRow>,
    pub renew_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FineRow {
    pub book_title: String,
    pub isbn: String,
    pub due_date: String,
    pub days_overdue: i64,
    pub amount: String,
    pub paid: bool,
    pub status_label: &'static str,
}

impl From<&Fine> for FineRow {
    fn from(fine: &Fine) -> Self {
        Self {
            book_title: fine.book_title.clone().unwrap_or_else(|| "Unknown Book".to_string()),
            isbn: fine.isbn.clone().unwrap_or_else(|| "N/A".to_string()),
            due_date: format_date(fine.due_date),
            days_overdue: fine.days_overdue,
            amount: format_money(fine.amount),
            paid: fine.paid,
            status_label: if fine.paid { "Paid" } else { "Unpaid" },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentDialog {
    pub amount: String,
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinesView {
    pub totals: FineTotals,
    pub unpaid_total: String,
    pub paid_total: String,
    pub overdue_items: usize,
    pub rows: Vec<FineRow>,
    pub pay_enabled: bool,
    pub dialog: Option<PaymentDialog>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub title: String,
    pub author_line: String,
    pub isbn: String,
    pub read: String,
    pub returned: String,
    pub stars: String,
    pub favorite: bool,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        let stars = usize::from(entry.stars());
        Self {
            title: entry.title.clone(),
            author_line: by_line(entry.authors.as_deref()),
            isbn: entry.isbn.clone(),
            read: format_date(Some(entry.checkout_date)),
            returned: entry
                .return_date
                .map(|d| format_date(Some(d)))
                .unwrap_or_else(|| "Not returned".to_string()),
            stars: format!("{}{}", "★".repeat(stars), "☆".repeat(5 - stars)),
            favorite: entry.favorite,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryView {
    pub filter: HistoryFilter,
    pub stats: HistoryStats,
    /// No history at all, as opposed to nothing matching the filter
    pub empty: bool,
    pub rows: Vec<HistoryRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsView {
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub user_name: String,
    pub card_id: String,
    pub menu: Vec<MenuItem>,
    pub active_section: ProfileSection,
    pub personal: PersonalView,
    pub loans: LoansView,
    pub fines: FinesView,
    pub history: HistoryView,
    pub settings: SettingsView,
    pub sources: DataSources,
    pub notification: Option<Notification>,
    pub redirect: Option<Redirect>,
}

pub fn render(state: &ProfileState, today: NaiveDate, due_soon_days: i64) -> ProfileView {
    let borrower = &state.borrower;
    let text = |value: &Option<String>, fallback: &str| match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => fallback.to_string(),
    };

    let personal = PersonalView {
        full_name: text(&borrower.name, "Library User"),
        card_number: if borrower.card_id.is_empty() {
            state.card_id.to_string()
        } else {
            borrower.card_id.clone()
        },
        ssn: borrower
            .ssn
            .as_deref()
            .map(format_ssn)
            .unwrap_or_else(|| "123-45-6789".to_string()),
        email: text(&borrower.email, "user@library.edu"),
        phone: text(&borrower.phone, "(555) 123-4567"),
        address: text(&borrower.address, "123 Library Lane"),
        member_since: borrower
            .member_since
            .map(|d| format_date(Some(d)))
            .unwrap_or_else(|| "January 15, 2024".to_string()),
        total_borrowed: borrower
            .total_books
            .filter(|n| *n > 0)
            .map(|n| n.to_string())
            .unwrap_or_else(|| "24".to_string()),
        edit_form: state.editing.clone(),
    };

    let loans = LoansView {
        summary: LoanSummary::compute(&state.loans, today),
        rows: state
            .loans
            .iter()
            .map(|loan| {
                let selected = state.selected_loans.contains(&loan.loan_id);
                LoanRow::new(loan, today, due_soon_days, selected)
            })
            .collect(),
        renew_enabled: !state.loans.is_empty(),
    };

    let totals = FineTotals::compute(&state.fines);
    let fines = FinesView {
        totals,
        unpaid_total: format_money(totals.unpaid),
        paid_total: format_money(totals.paid),
        overdue_items: totals.unpaid_items,
        rows: state.fines.iter().map(FineRow::from).collect(),
        pay_enabled: !state.fines.is_empty(),
        dialog: state.payment_open.then(|| PaymentDialog {
            amount: format_money(totals.unpaid),
            method: state.payment_method,
        }),
    };

    let history = HistoryView {
        filter: state.history_filter,
        stats: HistoryStats::compute(&state.history, today),
        empty: state.history.is_empty(),
        rows: state
            .history_filter
            .apply(&state.history, today)
            .into_iter()
            .map(HistoryRow::from)
            .collect(),
    };

    ProfileView {
        user_name: personal.full_name.clone(),
        card_id: personal.card_number.clone(),
        menu: ProfileSection::ALL
            .into_iter()
            .map(|section| MenuItem {
                section,
                active: section == state.section,
            })
            .collect(),
        active_section: state.section,
        personal,
        loans,
        fines,
        history,
        settings: SettingsView { theme: state.theme },
        sources: state.sources,
        notification: state.notification.clone(),
        redirect: state.redirect.clone(),
    }
}

fn by_line(authors: Option<&str>) -> String {
    format!(
        "by {}",
        authors.filter(|a| !a.trim().is_empty()).unwrap_or("Unknown Author")
    )
}
