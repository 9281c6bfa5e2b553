//! Borrower (patron) model, card identifiers and contact edits

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::de::{opt_flexible_date, opt_string_or_number, string_or_number};
use crate::error::{AppError, AppResult};

static CARD_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+$").unwrap_or_else(|e| panic!("card id regex failed to compile: {e}"))
});

/// Patron library card number (digits only)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric form sent in checkout requests
    pub fn as_number(&self) -> AppResult<u64> {
        self.0
            .parse()
            .map_err(|_| AppError::Validation("Card ID is too large.".to_string()))
    }
}

impl std::str::FromStr for CardId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !CARD_ID_PATTERN.is_match(s) {
            return Err(AppError::Validation(
                "Please enter a valid numeric Card ID.".to_string(),
            ));
        }
        Ok(CardId(s.to_string()))
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Patron identity and contact details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borrower {
    #[serde(deserialize_with = "string_or_number")]
    pub card_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub ssn: Option<String>,
    #[serde(default, deserialize_with = "opt_flexible_date")]
    pub member_since: Option<NaiveDate>,
    #[serde(default)]
    pub total_books: Option<i64>,
}

impl Borrower {
    pub fn apply_contact(&mut self, update: &ContactUpdate) {
        self.name = Some(update.name.trim().to_string());
        self.email = Some(update.email.trim().to_string());
        self.phone = Some(update.phone.trim().to_string());
        self.address = Some(update.address.trim().to_string());
    }

    /// Current values, used to prefill (or reset) the edit form
    pub fn contact(&self) -> ContactUpdate {
        ContactUpdate {
            name: self.name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            phone: self.phone.clone().unwrap_or_default(),
            address: self.address.clone().unwrap_or_default(),
        }
    }
}

/// Format a nine-digit SSN as `123-45-6789`; other inputs are returned unchanged.
pub fn format_ssn(ssn: &str) -> String {
    let digits: String = ssn.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 9 {
        return ssn.to_string();
    }
    format!("{}-{}-{}", &digits[..3], &digits[3..5], &digits[5..])
}

/// Personal information edit form
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize, Validate)]
pub struct ContactUpdate {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(max = 32, message = "Phone number is too long"))]
    pub phone: String,
    #[validate(length(max = 200, message = "Address is too long"))]
    pub address: String,
}
