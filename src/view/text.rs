//! Plain-text rendering of the view-models for the terminal front-end

use std::fmt::Write;

use super::catalog::{CatalogView, DetailsModal, ResultsBody};
use super::notification::{Notification, NotificationKind};
use super::pagination::PageControl;
use super::profile::ProfileView;
use crate::models::ProfileSection;

const RULE: &str = "----------------------------------------------------------------";

pub fn notification_line(notification: &Notification) -> String {
    let marker = match notification.kind {
        NotificationKind::Success => "[ok]",
        NotificationKind::Error => "[error]",
    };
    format!("{} {}", marker, notification.message)
}

pub fn pagination_line(controls: &[PageControl]) -> String {
    controls
        .iter()
        .map(|control| match control {
            PageControl::Previous { enabled: true } => "< Previous".to_string(),
            PageControl::Previous { enabled: false } => "(< Previous)".to_string(),
            PageControl::Page { number, active: true } => format!("[{}]", number),
            PageControl::Page { number, .. } => number.to_string(),
            PageControl::Ellipsis => "...".to_string(),
            PageControl::Next { enabled: true } => "Next >".to_string(),
            PageControl::Next { enabled: false } => "(Next >)".to_string(),
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn details(modal: &DetailsModal) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", modal.title);
    for row in &modal.rows {
        let _ = writeln!(out, "  {:<10} {}", format!("{}:", row.label), row.value);
    }
    let _ = writeln!(out, "  {:<10} {}", "Status:", modal.status_label);
    if modal.can_checkout {
        let _ = writeln!(out, "  (:checkout <ISBN> <CARD_ID> to check out)");
    }
    out
}

pub fn catalog(view: &CatalogView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} results)", view.title, view.count);
    let _ = writeln!(out, "{}", RULE);

    if view.loading {
        let _ = writeln!(out, "Loading...");
    }

    if let Some(error) = &view.error {
        let _ = writeln!(out, "!! {}", error.heading);
        let _ = writeln!(out, "   {}", error.message);
        let _ = writeln!(out, "   Please make sure:");
        for item in &error.checklist {
            let _ = writeln!(out, "    - {}", item);
        }
        let _ = writeln!(out, "   (:retry to {})", error.retry_label.to_lowercase());
        let _ = writeln!(out, "{}", RULE);
    }

    match &view.body {
        ResultsBody::NoResults { heading, hint } => {
            let _ = writeln!(out, "{}", heading);
            let _ = writeln!(out, "{}", hint);
        }
        ResultsBody::Cards { cards } => {
            for card in cards {
                let _ = writeln!(out, "{} [{}]", card.title, card.status_label);
                let _ = writeln!(out, "  {}", card.authors);
                let _ = writeln!(
                    out,
                    "  ISBN {} | {} | {} | {} | {}",
                    card.isbn, card.year, card.pages, card.publisher, card.genre
                );
            }
        }
    }

    if !view.pagination.is_empty() {
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "{}", pagination_line(&view.pagination));
    }

    if let Some(modal) = &view.details {
        let _ = writeln!(out, "{}", RULE);
        out.push_str(&details(modal));
    }

    if let Some(notification) = &view.notification {
        let _ = writeln!(out, "{}", notification_line(notification));
    }
    out
}

pub fn profile(view: &ProfileView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (card {})", view.user_name, view.card_id);
    let menu: Vec<String> = view
        .menu
        .iter()
        .map(|item| {
            if item.active {
                format!("[{}]", item.section.as_str())
            } else {
                item.section.as_str().to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "{}", menu.join(" | "));
    let _ = writeln!(out, "{}", RULE);

    match view.active_section {
        ProfileSection::Personal => personal(&mut out, view),
        ProfileSection::Loans => loans(&mut out, view),
        ProfileSection::Fines => fines(&mut out, view),
        ProfileSection::History => history(&mut out, view),
        ProfileSection::Settings => {
            let _ = writeln!(out, "Theme: {}", view.settings.theme);
        }
    }

    if let Some(notification) = &view.notification {
        let _ = writeln!(out, "{}", notification_line(notification));
    }
    if let Some(redirect) = &view.redirect {
        let _ = writeln!(out, "Redirecting to {}", redirect.target);
    }
    out
}

fn personal(out: &mut String, view: &ProfileView) {
    let p = &view.personal;
    let rows = [
        ("Full name", &p.full_name),
        ("Card number", &p.card_number),
        ("SSN", &p.ssn),
        ("Email", &p.email),
        ("Phone", &p.phone),
        ("Address", &p.address),
        ("Member since", &p.member_since),
        ("Books borrowed", &p.total_borrowed),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{:<15} {}", label, value);
    }
}

fn loans(out: &mut String, view: &ProfileView) {
    let loans = &view.loans;
    let _ = writeln!(
        out,
        "Current loans: {}   Overdue: {}",
        loans.summary.active, loans.summary.overdue
    );
    if loans.rows.is_empty() {
        let _ = writeln!(out, "No active loans");
        let _ = writeln!(out, "You don't have any books checked out at the moment.");
        return;
    }
    for row in &loans.rows {
        let mark = if row.selected { "[x]" } else { "[ ]" };
        let _ = writeln!(out, "{} #{} {} {}", mark, row.loan_id, row.title, row.author_line);
        let _ = writeln!(
            out,
            "      {} | out {} | due {} | {} ({})",
            row.isbn_line, row.date_out, row.due_date, row.days_left, row.status_label
        );
    }
}

fn fines(out: &mut String, view: &ProfileView) {
    let fines = &view.fines;
    let _ = writeln!(
        out,
        "Outstanding: {}   Overdue items: {}   Paid: {}",
        fines.unpaid_total, fines.overdue_items, fines.paid_total
    );
    if fines.rows.is_empty() {
        let _ = writeln!(out, "No fines outstanding. Great job!");
        return;
    }
    for row in &fines.rows {
        let _ = writeln!(
            out,
            "{} | {} | due {} | {} days | {} | {}",
            row.book_title, row.isbn, row.due_date, row.days_overdue, row.amount, row.status_label
        );
    }
    if let Some(dialog) = &fines.dialog {
        let _ = writeln!(out, "Pay {} by {}?", dialog.amount, dialog.method);
    }
}

fn history(out: &mut String, view: &ProfileView) {
    let history = &view.history;
    let _ = writeln!(
        out,
        "Books read: {}   This month: {}   Favorites: {}   (filter: {})",
        history.stats.total,
        history.stats.this_month,
        history.stats.favorites,
        history.filter.as_str()
    );
    if history.empty {
        let _ = writeln!(out, "No reading history");
        let _ = writeln!(
            out,
            "Your reading history will appear here once you check out books."
        );
        return;
    }
    for row in &history.rows {
        let heart = if row.favorite { " <3" } else { "" };
        let _ = writeln!(out, "{} {} {}{}", row.stars, row.title, row.author_line, heart);
        let _ = writeln!(
            out,
            "      ISBN: {} | Read: {} | Returned: {}",
            row.isbn, row.read, row.returned
        );
    }
}
