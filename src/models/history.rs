//! Reading history entries

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, BoolFromInt, PickFirst};

use super::de::{flexible_date, opt_flexible_date, string_or_number};
use super::enums::HistoryFilter;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub isbn: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(deserialize_with = "flexible_date")]
    pub checkout_date: NaiveDate,
    #[serde(default, deserialize_with = "opt_flexible_date")]
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub rating: u8,
    #[serde_as(as = "PickFirst<(_, BoolFromInt)>")]
    #[serde(default)]
    pub favorite: bool,
}

impl HistoryEntry {
    /// Rating clamped into the displayable 0–5 star range
    pub fn stars(&self) -> u8 {
        self.rating.min(5)
    }
}

impl HistoryFilter {
    pub fn matches(&self, entry: &HistoryEntry, today: NaiveDate) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::LastMonth => today
                .checked_sub_months(Months::new(1))
                .map(|since| entry.checkout_date >= since)
                .unwrap_or(true),
            HistoryFilter::LastYear => today
                .checked_sub_months(Months::new(12))
                .map(|since| entry.checkout_date >= since)
                .unwrap_or(true),
            HistoryFilter::Favorites => entry.favorite,
        }
    }

    pub fn apply<'a>(&self, entries: &'a [HistoryEntry], today: NaiveDate) -> Vec<&'a HistoryEntry> {
        entries.iter().filter(|e| self.matches(e, today)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HistoryStats {
    pub total: usize,
    pub this_month: usize,
    pub favorites: usize,
}

impl HistoryStats {
    pub fn compute(entries: &[HistoryEntry], today: NaiveDate) -> Self {
        Self {
            total: entries.len(),
            this_month: entries
                .iter()
                .filter(|e| {
                    e.checkout_date.year() == today.year() && e.checkout_date.month() == today.month()
                })
                .count(),
            favorites: entries.iter().filter(|e| e.favorite).count(),
        }
    }
}
