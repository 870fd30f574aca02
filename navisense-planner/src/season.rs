//! Season lookup and seasonal travel insights
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

const DEFAULT_SEASON_DATA: &str = include_str!("../static/data/seasons.json");

/// One of the four fixed season buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Self; 4] = [Self::Spring, Self::Summer, Self::Autumn, Self::Winter];

    /// Bucket a calendar month (1-12). Anything outside Mar-Nov is winter.
    #[must_use]
    pub const fn for_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }

    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        Self::for_month(date.month())
    }

    /// Parse an ISO `YYYY-MM-DD` date and bucket it; empty or invalid input has no season.
    #[must_use]
    pub fn for_date_str(date: &str) -> Option<Self> {
        NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .ok()
            .map(Self::for_date)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Spring => "🌸 Spring",
            Self::Summer => "☀️ Summer",
            Self::Autumn => "🍂 Autumn",
            Self::Winter => "❄️ Winter",
        }
    }

    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Spring => "#f59e0b",
            Self::Summer => "#ef4444",
            Self::Autumn => "#f97316",
            Self::Winter => "#06b6d4",
        }
    }
}

/// Static insight block shown alongside the itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SeasonInsight {
    pub badge: String,
    pub body: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SeasonInsights {
    #[serde(default)]
    pub insights: HashMap<Season, SeasonInsight>,
}

impl SeasonInsights {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_SEASON_DATA).unwrap_or_default()
    }

    /// Shared copy of the embedded insight table.
    #[must_use]
    pub fn shared() -> &'static Self {
        static INSIGHTS: OnceLock<SeasonInsights> = OnceLock::new();
        INSIGHTS.get_or_init(Self::load_from_static)
    }

    #[must_use]
    pub fn insight(&self, season: Season) -> Option<&SeasonInsight> {
        self.insights.get(&season)
    }
}
