//! Data models for the library web client

pub mod book;
pub mod borrower;
pub mod de;
pub mod enums;
pub mod fine;
pub mod history;
pub mod loan;

// Re-export commonly used types
pub use book::{Book, SearchPage, SearchQuery};
pub use borrower::{Borrower, CardId, ContactUpdate};
pub use enums::{
    Availability, HistoryFilter, LoanStatus, PaymentMethod, ProfileSection, StatusFilter, Theme,
};
pub use fine::{Fine, FineTotals};
pub use history::{HistoryEntry, HistoryStats};
pub use loan::{Loan, LoanSummary};
