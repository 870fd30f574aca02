//! Wire shapes returned by the itinerary service.
use serde::{Deserialize, Serialize};

use crate::itinerary::Alternative;
use crate::money::{deserialize_amount, deserialize_optional_amount};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlanResponse {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub days: Vec<PlanDay>,
    #[serde(default)]
    pub budget_summary: Option<BudgetSummary>,
    #[serde(default)]
    pub weather: Option<WeatherReport>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub cached: bool,
    /// Application-level failure reported with a success status.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlanDay {
    #[serde(default)]
    pub day: Option<u32>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub activities: Vec<PlanActivity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlanActivity {
    /// Kept as text so an unexpected period does not reject the whole plan.
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub cost_inr: u64,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

/// Server-computed spend per category, in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BudgetSummary {
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub accommodation_inr: u64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub food_inr: u64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub transport_inr: u64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub activities_inr: u64,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub total_inr: Option<u64>,
}

impl BudgetSummary {
    #[must_use]
    pub const fn category_sum(&self) -> u64 {
        self.accommodation_inr
            .saturating_add(self.food_inr)
            .saturating_add(self.transport_inr)
            .saturating_add(self.activities_inr)
    }

    /// A summary without any category spend is treated as absent, whatever its total says.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        self.category_sum() > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WeatherReport {
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub temp_max_c: Option<f64>,
    #[serde(default)]
    pub temp_min_c: Option<f64>,
    #[serde(default)]
    pub rain_mm: Option<f64>,
    #[serde(default)]
    pub tip: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_service_payload() {
        let json = r#"{
            "destination": "Kyoto, Japan",
            "days": [
                {
                    "day": 1,
                    "theme": "Temples",
                    "activities": [
                        {
                            "period": "morning",
                            "title": "Fushimi Inari",
                            "description": "Torii gates at dawn",
                            "category": "culture",
                            "cost_inr": 0,
                            "alternatives": [
                                {"title": "Kinkaku-ji", "description": "Golden pavilion", "category": "sightseeing", "cost_inr": 450.0}
                            ]
                        }
                    ]
                }
            ],
            "budget_summary": {"accommodation_inr": 30000, "food_inr": 12000, "transport_inr": 6000, "activities_inr": 4000, "total_inr": 52000},
            "weather": {"condition": "Clear", "temp_max_c": 21.5, "temp_min_c": null, "rain_mm": 0, "tip": "Layers"},
            "tips": ["Carry cash"],
            "cached": true
        }"#;
        let response: PlanResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.days.len(), 1);
        let activity = &response.days[0].activities[0];
        assert_eq!(activity.alternatives[0].cost_inr, 450);
        let summary = response.budget_summary.unwrap();
        assert_eq!(summary.category_sum(), 52_000);
        assert!(summary.is_usable());
        assert_eq!(response.weather.unwrap().temp_min_c, None);
        assert!(response.cached);
        assert!(response.error.is_none());
    }

    #[test]
    fn error_payload_parses_with_empty_plan() {
        let response: PlanResponse =
            serde_json::from_str(r#"{"error": "quota exhausted"}"#).unwrap();
        assert_eq!(response.error.as_deref(), Some("quota exhausted"));
        assert!(response.days.is_empty());
    }

    #[test]
    fn zero_summary_is_not_usable() {
        assert!(!BudgetSummary::default().is_usable());
        let total_only = BudgetSummary {
            total_inr: Some(50_000),
            ..BudgetSummary::default()
        };
        assert!(!total_only.is_usable());
    }
}
