//! Query options for listing quakes.
//!
//! # Invariants
//! - Blank search text matches every location name.
//! - A date filter covers exactly one UTC calendar day, half-open.
//! - Ordering is total: ties on the sort key fall back to `code` in the
//!   same direction, so flipping the order reverses the sequence exactly.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Field used to order the quake list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Time,
    Magnitude,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Magnitude => "magnitude",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "time" => Some(Self::Time),
            "magnitude" | "mag" => Some(Self::Magnitude),
            _ => None,
        }
    }
}

/// Direction for [`SortKey`] ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Search/sort parameters for the quake list.
///
/// Defaults to every quake, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuakeQuery {
    /// Case-insensitive substring matched against the location name.
    pub search_text: String,
    /// Restricts results to one UTC calendar day.
    pub search_date: Option<NaiveDate>,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
}

impl QuakeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_search_date(mut self, date: Option<NaiveDate>) -> Self {
        self.search_date = date;
        self
    }

    pub fn sorted_by(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort_key = key;
        self.sort_order = order;
        self
    }

    /// Trimmed search text, or `None` when the filter is blank.
    pub fn normalized_search_text(&self) -> Option<&str> {
        let trimmed = self.search_text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Half-open `[start, end)` time window for `search_date`.
    ///
    /// Returns `None` when no date filter is set or the day is at the edge of
    /// the representable calendar.
    pub fn date_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let date = self.search_date?;
        let start = date.and_hms_opt(0, 0, 0)?.and_utc();
        let end = date
            .checked_add_days(Days::new(1))?
            .and_hms_opt(0, 0, 0)?
            .and_utc();
        Some((start, end))
    }

    /// Advances to the next sort preset.
    ///
    /// Cycle: time desc -> time asc -> magnitude desc -> magnitude asc -> time desc.
    pub fn cycle_sort(&mut self) {
        let (key, order) = match (self.sort_key, self.sort_order) {
            (SortKey::Time, SortOrder::Descending) => (SortKey::Time, SortOrder::Ascending),
            (SortKey::Time, SortOrder::Ascending) => {
                (SortKey::Magnitude, SortOrder::Descending)
            }
            (SortKey::Magnitude, SortOrder::Descending) => {
                (SortKey::Magnitude, SortOrder::Ascending)
            }
            (SortKey::Magnitude, SortOrder::Ascending) => (SortKey::Time, SortOrder::Descending),
        };
        self.sort_key = key;
        self.sort_order = order;
    }

    /// Short human-readable description, e.g. `magnitude desc`.
    pub fn sort_label(&self) -> String {
        format!("{} {}", self.sort_key.as_str(), self.sort_order.as_str())
    }
}
