//! Loan (borrow) model and related types

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::de::{flexible_date, opt_flexible_date, string_or_number};
use super::enums::LoanStatus;

/// Loan held by the patron, as returned by the loans endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: i64,
    #[serde(deserialize_with = "string_or_number")]
    pub isbn: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(deserialize_with = "flexible_date")]
    pub date_out: NaiveDate,
    #[serde(deserialize_with = "flexible_date")]
    pub due_date: NaiveDate,
    #[serde(default, deserialize_with = "opt_flexible_date")]
    pub date_in: Option<NaiveDate>,
}

impl Loan {
    /// Not yet returned
    pub fn is_active(&self) -> bool {
        self.date_in.is_none()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_active() && self.due_date < today
    }

    /// Whole days until the due date; negative once overdue
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    pub fn status(&self, today: NaiveDate, due_soon_days: i64) -> LoanStatus {
        let days_left = self.days_left(today);
        if days_left < 0 {
            LoanStatus::Overdue
        } else if days_left <= due_soon_days {
            LoanStatus::DueSoon
        } else {
            LoanStatus::Good
        }
    }

    /// Push the due date forward by `days`
    pub fn renew(&mut self, days: i64) {
        self.due_date += Duration::days(days);
    }
}

/// Counters shown above the loans list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LoanSummary {
    pub active: usize,
    pub overdue: usize,
}

impl LoanSummary {
    pub fn compute(loans: &[Loan], today: NaiveDate) -> Self {
        Self {
            active: loans.iter().filter(|l| l.is_active()).count(),
            overdue: loans.iter().filter(|l| l.is_overdue(today)).count(),
        }
    }
}
