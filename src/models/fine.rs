//! Fine model and totals

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, BoolFromInt, PickFirst};

use super::de::{opt_flexible_date, opt_string_or_number};
use super::loan::Loan;

/// Fine accrued on an overdue loan
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fine {
    /// Only present on the fines endpoint, which returns every patron's fines
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub card_id: Option<String>,
    #[serde(default)]
    pub loan_id: i64,
    #[serde(default)]
    pub book_title: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default, deserialize_with = "opt_flexible_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub days_overdue: i64,
    #[serde(rename = "fine_amt", alias = "amount", default)]
    pub amount: Decimal,
    #[serde_as(as = "PickFirst<(_, BoolFromInt)>")]
    #[serde(default)]
    pub paid: bool,
}

impl Fine {
    /// Fine for a loan still out past its due date; `None` when nothing is owed.
    pub fn from_overdue_loan(loan: &Loan, today: NaiveDate, daily_rate: Decimal) -> Option<Self> {
        if !loan.is_overdue(today) {
            return None;
        }
        let days_overdue = (today - loan.due_date).num_days().max(0);
        Some(Self {
            card_id: None,
            loan_id: loan.loan_id,
            book_title: Some(loan.title.clone()),
            isbn: Some(loan.isbn.clone()),
            due_date: Some(loan.due_date),
            days_overdue,
            amount: (Decimal::from(days_overdue) * daily_rate).round_dp(2),
            paid: false,
        })
    }
}

/// Aggregates shown on the fines section and in the payment dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FineTotals {
    pub total: Decimal,
    pub unpaid: Decimal,
    pub paid: Decimal,
    pub unpaid_items: usize,
}

impl FineTotals {
    pub fn compute(fines: &[Fine]) -> Self {
        fines.iter().fold(Self::default(), |mut acc, fine| {
            acc.total += fine.amount;
            if fine.paid {
                acc.paid += fine.amount;
            } else {
                acc.unpaid += fine.amount;
                acc.unpaid_items += 1;
            }
            acc
        })
    }
}
