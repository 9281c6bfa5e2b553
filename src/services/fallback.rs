//! Substitute data used when the backend is unreachable or unhelpful.
//!
//! Two tiers exist: records synthesized from a generic search response, and
//! static placeholders that need no backend at all.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{
    Availability, Book, Borrower, Fine, HistoryEntry, Loan, SearchPage, SearchQuery, StatusFilter,
};

/// Search sizes used when synthesizing profile records
pub const BORROWER_PROBE_LIMIT: u32 = 1;
pub const LOANS_PROBE_LIMIT: u32 = 10;
pub const HISTORY_PROBE_LIMIT: u32 = 20;

const SYNTHESIZED_LOANS: usize = 3;

/// Unfiltered first page of `limit` books
pub fn probe_query(limit: u32) -> SearchQuery {
    SearchQuery::for_page("", StatusFilter::All, 1, limit)
}

pub fn sample_books() -> Vec<Book> {
    vec![
        Book {
            isbn: "9780743273565".to_string(),
            title: "The Great Gatsby".to_string(),
            authors: Some("F. Scott Fitzgerald".to_string()),
            publication_year: Some(1925),
            pages: Some(180),
            publisher: Some("Scribner".to_string()),
            genre: Some("Fiction".to_string()),
            language: None,
            total_checkouts: None,
            availability: Availability::Available,
        },
        Book {
            isbn: "9780446310789".to_string(),
            title: "To Kill a Mockingbird".to_string(),
            authors: Some("Harper Lee".to_string()),
            publication_year: Some(1960),
            pages: Some(281),
            publisher: Some("J.B. Lippincott & Co.".to_string()),
            genre: Some("Fiction".to_string()),
            language: None,
            total_checkouts: None,
            availability: Availability::CheckedOut,
        },
    ]
}

/// Sample books matching `q` and `status`, paginated the same way the backend does.
/// A page past the end is clamped to the last one.
pub fn sample_page(q: &str, status: StatusFilter, page: u32, page_size: u32) -> SearchPage {
    let matching: Vec<Book> = sample_books()
        .into_iter()
        .filter(|book| book.matches_text(q) && status.matches(book.availability))
        .collect();
    let total = matching.len() as u64;
    let page_size = page_size.max(1);
    let last_page = u32::try_from(total.div_ceil(u64::from(page_size)).max(1)).unwrap_or(u32::MAX);
    let page = page.clamp(1, last_page);
    let offset = (page - 1) as usize * page_size as usize;
    let books = matching
        .into_iter()
        .skip(offset)
        .take(page_size as usize)
        .collect();
    SearchPage { books, total }
}

pub fn placeholder_borrower(card_id: &str) -> Borrower {
    Borrower {
        card_id: card_id.to_string(),
        name: Some("Library User".to_string()),
        email: Some("user@library.edu".to_string()),
        phone: Some("(555) 123-4567".to_string()),
        address: Some("123 Library Lane".to_string()),
        ssn: Some("123-45-6789".to_string()),
        member_since: NaiveDate::from_ymd_opt(2024, 1, 15),
        total_books: Some(24),
    }
}

/// Patron record built from a search probe; `None` when the catalog is empty.
pub fn borrower_from_search(card_id: &str, page: &SearchPage, today: NaiveDate) -> Option<Borrower> {
    if page.books.is_empty() {
        return None;
    }
    Some(Borrower {
        member_since: Some(today),
        total_books: Some(page.total as i64),
        ..placeholder_borrower(card_id)
    })
}

/// Up to three active loans, staggered a week apart, for the first books found
pub fn loans_from_books(books: &[Book], today: NaiveDate) -> Vec<Loan> {
    books
        .iter()
        .take(SYNTHESIZED_LOANS)
        .enumerate()
        .map(|(i, book)| {
            let i = i as i64;
            Loan {
                loan_id: 1000 + i,
                isbn: book.isbn.clone(),
                title: book.title.clone(),
                authors: book.authors.clone(),
                date_out: today - Duration::days(7 * i),
                due_date: today + Duration::days((SYNTHESIZED_LOANS as i64 - i) * 7),
                date_in: None,
            }
        })
        .collect()
}

/// Static loans: one overdue, one in good standing
pub fn placeholder_loans(today: NaiveDate) -> Vec<Loan> {
    let books = sample_books();
    vec![
        Loan {
            loan_id: 1000,
            isbn: books[0].isbn.clone(),
            title: books[0].title.clone(),
            authors: books[0].authors.clone(),
            date_out: today - Duration::days(20),
            due_date: today - Duration::days(6),
            date_in: None,
        },
        Loan {
            loan_id: 1001,
            isbn: books[1].isbn.clone(),
            title: books[1].title.clone(),
            authors: books[1].authors.clone(),
            date_out: today - Duration::days(5),
            due_date: today + Duration::days(9),
            date_in: None,
        },
    ]
}

pub fn fines_from_loans(loans: &[Loan], today: NaiveDate, daily_rate: Decimal) -> Vec<Fine> {
    loans
        .iter()
        .filter_map(|loan| Fine::from_overdue_loan(loan, today, daily_rate))
        .collect()
}

/// Reading history spaced thirty days apart, newest first.
///
/// Ratings cycle 1 to 5 and every fourth entry is a favourite. The newest
/// entry is still out, so it has no return date.
pub fn history_from_books(books: &[Book], today: NaiveDate) -> Vec<HistoryEntry> {
    books
        .iter()
        .enumerate()
        .map(|(i, book)| {
            let offset = i as i64;
            let returned = today - Duration::days(30 * (offset - 1));
            HistoryEntry {
                isbn: book.isbn.clone(),
                title: book.title.clone(),
                authors: book.authors.clone(),
                checkout_date: today - Duration::days(30 * offset),
                return_date: (returned <= today).then_some(returned),
                rating: (i % 5) as u8 + 1,
                favorite: i % 4 == 0,
            }
        })
        .collect()
}

pub fn placeholder_history(today: NaiveDate) -> Vec<HistoryEntry> {
    history_from_books(&sample_books(), today)
}
