//! Rendering: state in, view-models out.
//!
//! Every render rebuilds the whole fragment from controller state. The
//! [`text`] module turns view-models into terminal output.

pub mod catalog;
pub mod notification;
pub mod pagination;
pub mod profile;
pub mod text;

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub use catalog::CatalogView;
pub use notification::{Notification, NotificationKind, NOTIFICATION_TTL};
pub use pagination::PageControl;
pub use profile::ProfileView;

/// `1234567` → `1,234,567`
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Long US form, e.g. `January 15, 2024`; `N/A` when missing.
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => "N/A".to_string(),
    }
}

pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}
