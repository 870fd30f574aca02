//! Budget breakdown shown beside the itinerary.
//!
//! Either the server's per-category summary or a per-night estimate from the
//! tier rate table. The total is always the sum of the category lines.
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BUDGET, FALLBACK_HEADCOUNT};
use crate::form::GroupSize;
use crate::money::{round_f64_to_u64, rounded_div, u64_to_f64};
use crate::response::BudgetSummary;
use crate::wizard::BudgetTier;

/// Per-night rupee rates for one budget tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CategoryRates {
    pub hotel: u64,
    pub food: u64,
    pub transport: u64,
    pub activities: u64,
}

impl CategoryRates {
    #[must_use]
    pub const fn per_night(&self) -> u64 {
        self.hotel
            .saturating_add(self.food)
            .saturating_add(self.transport)
            .saturating_add(self.activities)
    }

    #[must_use]
    pub fn times(&self, nights: u32) -> Self {
        let n = u64::from(nights);
        Self {
            hotel: self.hotel.saturating_mul(n),
            food: self.food.saturating_mul(n),
            transport: self.transport.saturating_mul(n),
            activities: self.activities.saturating_mul(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetCategory {
    Accommodation,
    Food,
    Transport,
    Activities,
}

impl BudgetCategory {
    pub const ALL: [Self; 4] = [
        Self::Accommodation,
        Self::Food,
        Self::Transport,
        Self::Activities,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Accommodation => "🏨 Accommodation",
            Self::Food => "🍽️ Food & Dining",
            Self::Transport => "🚘 Transport",
            Self::Activities => "🎟️ Activities",
        }
    }

    const fn pick(self, amounts: &CategoryRates) -> u64 {
        match self {
            Self::Accommodation => amounts.hotel,
            Self::Food => amounts.food,
            Self::Transport => amounts.transport,
            Self::Activities => amounts.activities,
        }
    }
}

/// Where the figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetSource {
    Estimated,
    Service,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetLine {
    pub category: BudgetCategory,
    pub label: &'static str,
    pub amount: u64,
    /// Bar width relative to the largest line, 0..=100.
    pub bar_pct: u8,
    pub per_person: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetBreakdown {
    pub lines: Vec<BudgetLine>,
    pub total: u64,
    pub headcount: u32,
    pub per_person: Option<u64>,
    pub source: BudgetSource,
}

impl BudgetBreakdown {
    /// Rate-table estimate for `nights`; no tier falls back to moderate.
    #[must_use]
    pub fn estimate(tier: Option<BudgetTier>, nights: u32, group: Option<GroupSize>) -> Self {
        let amounts = tier.unwrap_or(DEFAULT_BUDGET).rates().times(nights);
        Self::from_amounts(&amounts, group, BudgetSource::Estimated)
    }

    /// Server figures. The summary's `total_inr` is ignored in favour of the
    /// category sum so the total and the lines never disagree.
    #[must_use]
    pub fn from_summary(summary: &BudgetSummary, group: Option<GroupSize>) -> Self {
        let amounts = CategoryRates {
            hotel: summary.accommodation_inr,
            food: summary.food_inr,
            transport: summary.transport_inr,
            activities: summary.activities_inr,
        };
        if let Some(reported) = summary.total_inr
            && reported != amounts.per_night()
        {
            log::debug!(
                "service total {reported} differs from category sum {}",
                amounts.per_night()
            );
        }
        Self::from_amounts(&amounts, group, BudgetSource::Service)
    }

    /// Server summary when it is usable, otherwise the estimate.
    #[must_use]
    pub fn resolve(
        summary: Option<&BudgetSummary>,
        tier: Option<BudgetTier>,
        nights: u32,
        group: Option<GroupSize>,
    ) -> Self {
        match summary {
            Some(summary) if summary.is_usable() => Self::from_summary(summary, group),
            _ => Self::estimate(tier, nights, group),
        }
    }

    fn from_amounts(amounts: &CategoryRates, group: Option<GroupSize>, source: BudgetSource) -> Self {
        let headcount = group.map_or(FALLBACK_HEADCOUNT, GroupSize::headcount);
        let split = |value: u64| (headcount > 1).then(|| rounded_div(value, headcount));
        let max = BudgetCategory::ALL
            .iter()
            .map(|c| c.pick(amounts))
            .max()
            .unwrap_or(0)
            .max(1);

        let lines: Vec<BudgetLine> = BudgetCategory::ALL
            .into_iter()
            .map(|category| {
                let amount = category.pick(amounts);
                let pct = round_f64_to_u64(u64_to_f64(amount) / u64_to_f64(max) * 100.0);
                BudgetLine {
                    category,
                    label: category.label(),
                    amount,
                    bar_pct: u8::try_from(pct.min(100)).unwrap_or(100),
                    per_person: split(amount),
                }
            })
            .collect();
        let total = lines.iter().map(|l| l.amount).sum();

        Self {
            lines,
            total,
            headcount,
            per_person: split(total),
            source,
        }
    }

    #[must_use]
    pub fn line(&self, category: BudgetCategory) -> Option<&BudgetLine> {
        self.lines.iter().find(|l| l.category == category)
    }
}
