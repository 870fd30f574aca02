//! Derived view computations. Everything here is a pure function of the
//! wizard, the trip form, the store or a service response.
use chrono::NaiveDate;
use rand::RngCore;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::OnceLock;

use crate::constants::TIPS_SHOWN;
use crate::itinerary::{ItineraryStore, capitalize};
use crate::response::WeatherReport;
use crate::season::{Season, SeasonInsights};
use crate::wizard::{BudgetTier, Pace};

const DEFAULT_TIPS_DATA: &str = include_str!("../static/data/tips.json");

/// `"{n+1} Days / {n} Nights"`.
#[must_use]
pub fn duration_label(nights: u32) -> String {
    format!("{} Days / {nights} Nights", u64::from(nights) + 1)
}

/// Local tips shown when the service sends none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TipsPool {
    #[serde(default)]
    pub pool: Vec<String>,
}

impl TipsPool {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_TIPS_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn shared() -> &'static Self {
        static POOL: OnceLock<TipsPool> = OnceLock::new();
        POOL.get_or_init(Self::load_from_static)
    }

    /// Server tips when there are any, else distinct random picks from the pool.
    #[must_use]
    pub fn select(&self, server_tips: &[String], rng: &mut dyn RngCore) -> Vec<String> {
        if !server_tips.is_empty() {
            return server_tips.to_vec();
        }
        self.pool
            .choose_multiple(rng, TIPS_SHOWN)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chip {
    pub text: String,
    /// Accent colour, only set on the season chip.
    pub color: Option<&'static str>,
}

impl Chip {
    fn plain(text: String) -> Self {
        Self { text, color: None }
    }
}

/// Inputs for the context chip row above the itinerary.
#[derive(Debug, Clone, Copy)]
pub struct ChipInputs<'a> {
    pub start_date: Option<NaiveDate>,
    pub budget: Option<BudgetTier>,
    pub purposes: &'a [String],
    pub pace: Option<Pace>,
    pub nights: u32,
}

#[must_use]
pub fn context_chips(inputs: &ChipInputs<'_>) -> Vec<Chip> {
    let mut chips = Vec::new();
    if let Some(season) = inputs.start_date.map(Season::for_date) {
        chips.push(Chip {
            text: season.label().to_string(),
            color: Some(season.color()),
        });
    }
    if let Some(tier) = inputs.budget {
        chips.push(Chip::plain(tier.label().to_string()));
    }
    chips.extend(
        inputs
            .purposes
            .iter()
            .map(|p| Chip::plain(format!("🎯 {}", capitalize(p)))),
    );
    if let Some(pace) = inputs.pace {
        chips.push(Chip::plain(format!("⏩ {} Pace", capitalize(pace.id()))));
    }
    if inputs.nights > 0 {
        chips.push(Chip::plain(format!("🌙 {} Nights", inputs.nights)));
    }
    chips
}

/// Season card for the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonCard {
    pub season: Season,
    pub label: &'static str,
    pub color: &'static str,
    pub badge: String,
    pub body: String,
    pub tips: Vec<String>,
}

#[must_use]
pub fn season_card(start_date: Option<NaiveDate>) -> Option<SeasonCard> {
    let season = Season::for_date(start_date?);
    let insight = SeasonInsights::shared().insight(season)?;
    Some(SeasonCard {
        season,
        label: season.label(),
        color: season.color(),
        badge: insight.badge.clone(),
        body: insight.body.clone(),
        tips: insight.tips.clone(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherCard {
    pub condition: String,
    /// `↑{max}°C · ↓{min}°C`, with `?` for a missing reading.
    pub temperature: String,
    pub rain: Option<String>,
    pub tip: String,
}

fn reading(value: Option<f64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

/// Only shown when the report names a condition.
#[must_use]
pub fn weather_card(report: Option<&WeatherReport>) -> Option<WeatherCard> {
    let report = report?;
    let condition = report
        .condition
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())?;
    Some(WeatherCard {
        condition: condition.to_string(),
        temperature: format!(
            "↑{}°C · ↓{}°C",
            reading(report.temp_max_c),
            reading(report.temp_min_c)
        ),
        rain: report
            .rain_mm
            .filter(|mm| *mm > 0.0)
            .map(|mm| format!("🌧️ {mm} mm expected")),
        tip: format!("💡 {}", report.tip.as_deref().unwrap_or_default()),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItineraryHeader {
    pub title: String,
    pub meta: String,
}

#[must_use]
pub fn itinerary_header(
    origin: &str,
    destination: &str,
    start_date: Option<NaiveDate>,
    nights: u32,
) -> ItineraryHeader {
    let mut meta = format!("{origin} → {destination}");
    if let Some(start) = start_date {
        let _ = write!(meta, " · Departing {}", start.format("%B %-d, %Y"));
    }
    let _ = write!(meta, " · {} Days", u64::from(nights) + 1);
    ItineraryHeader {
        title: format!("Your {destination} Itinerary"),
        meta,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryCounts {
    pub days: u32,
    pub nights: u32,
    pub activities: usize,
}

#[must_use]
pub fn summary_counts(nights: u32, store: &ItineraryStore) -> SummaryCounts {
    SummaryCounts {
        days: nights.saturating_add(1),
        nights,
        activities: store.activity_count(),
    }
}

#[must_use]
pub fn share_message(destination: &str) -> String {
    let to = destination.trim();
    let to = if to.is_empty() { "your destination" } else { to };
    format!("🌍 Check out my AI-crafted {to} itinerary on Navisense!")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    #[test]
    fn duration_counts_days_from_nights() {
        assert_eq!(duration_label(0), "1 Days / 0 Nights");
        assert_eq!(duration_label(5), "6 Days / 5 Nights");
        assert_eq!(duration_label(u32::MAX), format!("4294967296 Days / {} Nights", u32::MAX));
    }

    #[test]
    fn tips_prefer_server_then_pool() {
        let pool = TipsPool::load_from_static();
        assert_eq!(pool.pool.len(), 12);
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let server = vec!["Pack light".to_string()];
        assert_eq!(pool.select(&server, &mut rng), server);
        let picked = pool.select(&[], &mut rng);
        assert_eq!(picked.len(), TIPS_SHOWN);
        let distinct: HashSet<_> = picked.iter().collect();
        assert_eq!(distinct.len(), TIPS_SHOWN);
        assert!(picked.iter().all(|t| pool.pool.contains(t)));
    }

    #[test]
    fn chips_follow_selection_order() {
        let purposes = vec!["food".to_string(), "culture".to_string()];
        let chips = context_chips(&ChipInputs {
            start_date: NaiveDate::from_ymd_opt(2026, 7, 1),
            budget: Some(BudgetTier::Luxury),
            purposes: &purposes,
            pace: Some(Pace::Slow),
            nights: 4,
        });
        let texts: Vec<&str> = chips.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(
            texts,
            [
                "☀️ Summer",
                "👑 Luxury Tier",
                "🎯 Food",
                "🎯 Culture",
                "⏩ Slow Pace",
                "🌙 4 Nights"
            ]
        );
        assert_eq!(chips[0].color, Some("#ef4444"));

        let bare = context_chips(&ChipInputs {
            start_date: None,
            budget: None,
            purposes: &[],
            pace: None,
            nights: 2,
        });
        assert_eq!(bare.len(), 1);
    }

    #[test]
    fn season_card_needs_a_date() {
        assert!(season_card(None).is_none());
        let card = season_card(NaiveDate::from_ymd_opt(2026, 1, 10)).unwrap();
        assert_eq!(card.season, Season::Winter);
        assert_eq!(card.tips.len(), 3);
    }

    #[test]
    fn weather_card_rules() {
        assert!(weather_card(None).is_none());
        assert!(weather_card(Some(&WeatherReport::default())).is_none());
        let card = weather_card(Some(&WeatherReport {
            condition: Some("Showers".to_string()),
            temp_max_c: Some(28.5),
            temp_min_c: None,
            rain_mm: Some(12.0),
            tip: None,
        }))
        .unwrap();
        assert_eq!(card.temperature, "↑28.5°C · ↓?°C");
        assert_eq!(card.rain.as_deref(), Some("🌧️ 12 mm expected"));
        assert_eq!(card.tip, "💡 ");
        let dry = weather_card(Some(&WeatherReport {
            condition: Some("Clear".to_string()),
            rain_mm: Some(0.0),
            ..WeatherReport::default()
        }))
        .unwrap();
        assert!(dry.rain.is_none());
    }

    #[test]
    fn header_and_share_text() {
        let header = itinerary_header("Delhi", "Manali", NaiveDate::from_ymd_opt(2026, 3, 5), 4);
        assert_eq!(header.title, "Your Manali Itinerary");
        assert_eq!(header.meta, "Delhi → Manali · Departing March 5, 2026 · 5 Days");
        let undated = itinerary_header("Delhi", "Manali", None, 1);
        assert_eq!(undated.meta, "Delhi → Manali · 2 Days");
        assert_eq!(
            share_message(" "),
            "🌍 Check out my AI-crafted your destination itinerary on Navisense!"
        );
        assert_eq!(
            share_message("Goa"),
            "🌍 Check out my AI-crafted Goa itinerary on Navisense!"
        );
    }

    #[test]
    fn summary_counts_use_store() {
        let store = ItineraryStore::new();
        assert_eq!(
            summary_counts(3, &store),
            SummaryCounts {
                days: 4,
                nights: 3,
                activities: 0
            }
        );
    }
}
