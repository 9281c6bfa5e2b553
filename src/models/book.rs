//! Book (catalog search result) model and query types

use serde::{Deserialize, Serialize};

use super::de::string_or_number;
use super::enums::{Availability, StatusFilter};

/// Book as returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(deserialize_with = "string_or_number")]
    pub isbn: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub pages: Option<i32>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub total_checkouts: Option<i64>,
    pub availability: Availability,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.availability == Availability::Available
    }

    /// Case-insensitive match on title or authors; an empty needle matches everything.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle)
            || self
                .authors
                .as_deref()
                .map(|a| a.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }
}

/// Parameters of one search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: String,
    pub status: StatusFilter,
    pub limit: u32,
    pub offset: u32,
}

impl SearchQuery {
    /// Query for the given 1-based page
    pub fn for_page(q: &str, status: StatusFilter, page: u32, page_size: u32) -> Self {
        Self {
            q: q.to_string(),
            status,
            limit: page_size,
            offset: page.saturating_sub(1).saturating_mul(page_size),
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.q.clone()),
            ("status", self.status.query_value().to_string()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ]
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPage {
    pub books: Vec<Book>,
    pub total: u64,
}
