//! Shared client enums

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// Whether a copy can be loaned right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Availability {
    Available,
    CheckedOut,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "Available",
            Availability::CheckedOut => "Checked Out",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::CheckedOut => "checked-out",
        }
    }
}

impl From<String> for Availability {
    fn from(s: String) -> Self {
        // Circulation desks report "IN" for shelved copies
        match s.trim() {
            "Available" | "IN" => Availability::Available,
            _ => Availability::CheckedOut,
        }
    }
}

impl From<Availability> for String {
    fn from(a: Availability) -> Self {
        a.as_str().to_string()
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StatusFilter
// ---------------------------------------------------------------------------

/// Catalog filter buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    Available,
    CheckedOut,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Available => "available",
            StatusFilter::CheckedOut => "checked-out",
        }
    }

    /// Value of the `status` query parameter (empty for no filtering)
    pub fn query_value(&self) -> &'static str {
        match self {
            StatusFilter::All => "",
            other => other.as_str(),
        }
    }

    pub fn matches(&self, availability: Availability) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Available => availability == Availability::Available,
            StatusFilter::CheckedOut => availability == Availability::CheckedOut,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(StatusFilter::All),
            "available" => Ok(StatusFilter::Available),
            "checked-out" | "checked_out" | "checkedout" => Ok(StatusFilter::CheckedOut),
            _ => Err(format!("Invalid status filter: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// LoanStatus
// ---------------------------------------------------------------------------

/// Urgency of an active loan, derived from its due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanStatus {
    Overdue,
    DueSoon,
    Good,
}

impl LoanStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Overdue => "Overdue",
            LoanStatus::DueSoon => "Due Soon",
            LoanStatus::Good => "Good",
        }
    }
}

// ---------------------------------------------------------------------------
// ProfileSection
// ---------------------------------------------------------------------------

/// Dashboard sections; exactly one is visible at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileSection {
    #[default]
    Personal,
    Loans,
    Fines,
    History,
    Settings,
}

impl ProfileSection {
    pub const ALL: [ProfileSection; 5] = [
        ProfileSection::Personal,
        ProfileSection::Loans,
        ProfileSection::Fines,
        ProfileSection::History,
        ProfileSection::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileSection::Personal => "personal",
            ProfileSection::Loans => "loans",
            ProfileSection::Fines => "fines",
            ProfileSection::History => "history",
            ProfileSection::Settings => "settings",
        }
    }
}

impl std::str::FromStr for ProfileSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileSection::ALL
            .into_iter()
            .find(|section| section.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Invalid profile section: {}", s))
    }
}

// ---------------------------------------------------------------------------
// HistoryFilter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryFilter {
    #[default]
    All,
    LastMonth,
    LastYear,
    Favorites,
}

impl HistoryFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryFilter::All => "all",
            HistoryFilter::LastMonth => "last-month",
            HistoryFilter::LastYear => "last-year",
            HistoryFilter::Favorites => "favorites",
        }
    }
}

impl std::str::FromStr for HistoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(HistoryFilter::All),
            "last-month" => Ok(HistoryFilter::LastMonth),
            "last-year" => Ok(HistoryFilter::LastYear),
            "favorites" | "favourites" => Ok(HistoryFilter::Favorites),
            _ => Err(format!("Invalid history filter: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Invalid theme: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// PaymentMethod
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Cash,
    Online,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Online => "online",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "card" => Ok(PaymentMethod::Card),
            "cash" => Ok(PaymentMethod::Cash),
            "online" => Ok(PaymentMethod::Online),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}
