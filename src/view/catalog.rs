//! Catalog page view-models

use serde::Serialize;

use super::format_count;
use super::notification::Notification;
use super::pagination::{page_controls, PageControl};
use crate::models::{Book, StatusFilter};
use crate::services::catalog::{CatalogUi, SearchState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookCard {
    pub isbn: String,
    pub title: String,
    pub authors: String,
    pub year: String,
    pub pages: String,
    pub publisher: String,
    pub genre: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub checkout_enabled: bool,
    pub checkout_label: &'static str,
}

impl BookCard {
    pub fn from_book(book: &Book) -> Self {
        let available = book.is_available();
        Self {
            isbn: text_or(Some(&book.isbn), "N/A"),
            title: text_or(Some(&book.title), "Untitled"),
            authors: text_or(book.authors.as_deref(), "Unknown Author"),
            year: book
                .publication_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            pages: book
                .pages
                .map(|p| format!("{} pages", p))
                .unwrap_or_else(|| "Pages unknown".to_string()),
            publisher: text_or(book.publisher.as_deref(), "Unknown"),
            genre: text_or(book.genre.as_deref(), "Uncategorized"),
            status_label: book.availability.as_str(),
            status_class: book.availability.css_class(),
            checkout_enabled: available,
            checkout_label: if available { "Check Out" } else { "Unavailable" },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

/// Book details modal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsModal {
    pub title: String,
    pub rows: Vec<DetailRow>,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub can_checkout: bool,
}

impl DetailsModal {
    pub fn from_book(book: &Book) -> Self {
        let rows = vec![
            DetailRow {
                label: "Authors",
                value: text_or(book.authors.as_deref(), "Unknown"),
            },
            DetailRow {
                label: "ISBN",
                value: text_or(Some(&book.isbn), "N/A"),
            },
            DetailRow {
                label: "Publisher",
                value: text_or(book.publisher.as_deref(), "Unknown"),
            },
            DetailRow {
                label: "Year",
                value: book
                    .publication_year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
            },
            DetailRow {
                label: "Pages",
                value: book
                    .pages
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
            },
            DetailRow {
                label: "Genre",
                value: text_or(book.genre.as_deref(), "Uncategorized"),
            },
        ];
        Self {
            title: text_or(Some(&book.title), "Untitled"),
            rows,
            status_label: book.availability.as_str(),
            status_class: book.availability.css_class(),
            can_checkout: book.is_available(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPanel {
    pub heading: &'static str,
    pub message: String,
    pub checklist: Vec<&'static str>,
    pub retry_label: &'static str,
}

impl ErrorPanel {
    pub fn new(message: &str) -> Self {
        Self {
            heading: "Error Loading Books",
            message: message.to_string(),
            checklist: vec![
                "The backend server is running",
                "The database is properly set up",
                "Check the logs for details",
            ],
            retry_label: "Retry",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultsBody {
    Cards { cards: Vec<BookCard> },
    NoResults { heading: &'static str, hint: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterButton {
    pub filter: StatusFilter,
    pub active: bool,
    pub disabled: bool,
}

/// Whole catalog page, re-derived from state on every render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogView {
    pub title: String,
    pub count: String,
    pub query: String,
    pub clear_visible: bool,
    pub inputs_disabled: bool,
    pub loading: bool,
    pub filters: Vec<FilterButton>,
    pub error: Option<ErrorPanel>,
    pub body: ResultsBody,
    pub pagination: Vec<PageControl>,
    pub details: Option<DetailsModal>,
    pub notification: Option<Notification>,
}

pub fn render(state: &SearchState, ui: &CatalogUi, max_page_buttons: u32) -> CatalogView {
    let body = if state.books.is_empty() {
        ResultsBody::NoResults {
            heading: "No books found",
            hint: if state.query.is_empty() {
                "Start typing to search for books"
            } else {
                "Try a different search term or filter"
            },
        }
    } else {
        ResultsBody::Cards {
            cards: state.books.iter().map(BookCard::from_book).collect(),
        }
    };

    let filters = [StatusFilter::All, StatusFilter::Available, StatusFilter::CheckedOut]
        .into_iter()
        .map(|filter| FilterButton {
            filter,
            active: filter == state.filter,
            disabled: ui.loading,
        })
        .collect();

    CatalogView {
        title: state.title(),
        count: format_count(state.total_results),
        query: state.query.clone(),
        clear_visible: !state.query.is_empty(),
        inputs_disabled: ui.loading,
        loading: ui.loading,
        filters,
        error: ui.error_panel.as_deref().map(ErrorPanel::new),
        body,
        pagination: page_controls(state.page, state.total_pages(), max_page_buttons),
        details: ui.details.as_ref().map(DetailsModal::from_book),
        notification: ui.notification.clone(),
    }
}

/// Trimmed `value`, or `fallback` when missing or blank
fn text_or(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}
