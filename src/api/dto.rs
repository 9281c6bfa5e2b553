//! Wire envelopes exchanged with the catalog backend.
//!
//! Every endpoint answers `{success, ..., error?}`; a `false` success flag is
//! turned into [`AppError::Api`] before the payload reaches a controller.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Book, Borrower, Fine, HistoryEntry, Loan};

fn ensure_success(success: bool, error: Option<String>, fallback: &str) -> AppResult<()> {
    if success {
        Ok(())
    } else {
        Err(AppError::Api(error.unwrap_or_else(|| fallback.to_string())))
    }
}

/// Body of a failing response, used to recover the backend's message
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub error: Option<String>,
}

impl SearchEnvelope {
    pub fn into_result(self) -> AppResult<(Vec<Book>, u64)> {
        ensure_success(self.success, self.error, "Search failed")?;
        Ok((self.books, self.total))
    }
}

#[derive(Debug, Serialize)]
pub struct CheckoutRequest {
    pub isbn: String,
    pub card_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub loan_id: Option<i64>,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Confirmation of a successful checkout
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckoutReceipt {
    pub message: Option<String>,
    pub loan_id: Option<i64>,
    pub due_date: Option<String>,
}

impl CheckoutEnvelope {
    pub fn into_result(self) -> AppResult<CheckoutReceipt> {
        ensure_success(self.success, self.error, "Checkout failed")?;
        Ok(CheckoutReceipt {
            message: self.message,
            loan_id: self.loan_id,
            due_date: self.due_date,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BorrowerEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub borrower: Option<Borrower>,
    #[serde(default)]
    pub error: Option<String>,
}

impl BorrowerEnvelope {
    pub fn into_result(self) -> AppResult<Borrower> {
        ensure_success(self.success, self.error, "Borrower lookup failed")?;
        self.borrower
            .ok_or_else(|| AppError::Api("Borrower missing from response".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoansEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub loans: Vec<Loan>,
    #[serde(default)]
    pub error: Option<String>,
}

impl LoansEnvelope {
    pub fn into_result(self) -> AppResult<Vec<Loan>> {
        ensure_success(self.success, self.error, "Loans lookup failed")?;
        Ok(self.loans)
    }
}

#[derive(Debug, Deserialize)]
pub struct FinesEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub fines: Vec<Fine>,
    #[serde(default)]
    pub error: Option<String>,
}

impl FinesEnvelope {
    pub fn into_result(self) -> AppResult<Vec<Fine>> {
        ensure_success(self.success, self.error, "Fines lookup failed")?;
        Ok(self.fines)
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HistoryEnvelope {
    pub fn into_result(self) -> AppResult<Vec<HistoryEntry>> {
        ensure_success(self.success, self.error, "History lookup failed")?;
        Ok(self.history)
    }
}
