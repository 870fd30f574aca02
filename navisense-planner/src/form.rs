//! Auxiliary trip form fields collected alongside the wizard selections.
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Travelling party size as offered by the group selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupSize {
    Solo,
    Couple,
    Small,
    Medium,
    Large,
}

impl GroupSize {
    pub const ALL: [Self; 5] = [
        Self::Solo,
        Self::Couple,
        Self::Small,
        Self::Medium,
        Self::Large,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Couple => "couple",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Number of travellers used for per-person splits.
    #[must_use]
    pub const fn headcount(self) -> u32 {
        match self {
            Self::Solo => 1,
            Self::Couple => 2,
            Self::Small => 4,
            Self::Medium => 8,
            Self::Large => 12,
        }
    }
}

impl fmt::Display for GroupSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GroupSize {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownOption::new("group size", s))
    }
}

/// Returned when parsing an option id that is not on the offered list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownOption {
    #[must_use]
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Free-form fields of the planner that are not part of the step selections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TripForm {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub accommodation: Option<String>,
    #[serde(default)]
    pub group_size: Option<GroupSize>,
    #[serde(default)]
    pub special_needs: Option<String>,
    #[serde(default)]
    pub total_budget: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl TripForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Departure plus `nights`, when a departure is set.
    #[must_use]
    pub fn end_date(&self, nights: u32) -> Option<NaiveDate> {
        self.start_date
            .and_then(|start| start.checked_add_days(Days::new(u64::from(nights))))
    }

    /// Nights implied by an end date; `None` unless the end falls after the start.
    #[must_use]
    pub fn nights_until(&self, end: NaiveDate) -> Option<u32> {
        let start = self.start_date?;
        let diff = (end - start).num_days();
        if diff > 0 {
            u32::try_from(diff).ok()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Trim a text input, mapping blank input to `None`.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}
