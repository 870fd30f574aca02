//! Centralized planner constants.
//!
//! Wizard limits, request defaults, the per-night budget rate table and the
//! loader timing live here so validation, request assembly and the derived
//! views agree on a single set of numbers.

use crate::budget::CategoryRates;
use crate::form::GroupSize;
use crate::wizard::{BudgetTier, Pace};

// Wizard -------------------------------------------------------------------
pub const TOTAL_STEPS: u8 = 4;
pub const DEFAULT_NIGHTS: u32 = 5;
/// Upper bound accepted by the itinerary service.
pub const MAX_NIGHTS: u32 = 90;

// Request defaults ---------------------------------------------------------
pub const DEFAULT_BUDGET: BudgetTier = BudgetTier::Moderate;
pub const DEFAULT_PACE: Pace = Pace::Moderate;
pub const DEFAULT_GROUP_SIZE: GroupSize = GroupSize::Couple;
pub const DEFAULT_CURRENCY: &str = "INR";
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const GENERATE_PLAN_PATH: &str = "/generate-plan";
pub const API_BASE_ENV_VAR: &str = "NAVISENSE_API_BASE";

// Budget rates (per night, INR) ---------------------------------------------
pub const RATES_BUDGET: CategoryRates = CategoryRates {
    hotel: 2_500,
    food: 1_500,
    transport: 1_200,
    activities: 1_000,
};
pub const RATES_MODERATE: CategoryRates = CategoryRates {
    hotel: 7_500,
    food: 4_000,
    transport: 2_000,
    activities: 2_500,
};
pub const RATES_PREMIUM: CategoryRates = CategoryRates {
    hotel: 16_000,
    food: 8_000,
    transport: 4_000,
    activities: 6_000,
};
pub const RATES_LUXURY: CategoryRates = CategoryRates {
    hotel: 37_000,
    food: 16_000,
    transport: 8_000,
    activities: 12_000,
};

// Derived views ------------------------------------------------------------
pub const TIPS_SHOWN: usize = 4;
/// Headcount used when the group size is unknown.
pub const FALLBACK_HEADCOUNT: u32 = 2;

// Loader -------------------------------------------------------------------
pub const LOADER_STEP_MIN_MS: u64 = 900;
pub const LOADER_STEP_MAX_MS: u64 = 1_300;
pub const LOADER_SETTLE_MS: u64 = 400;
/// Share of the progress bar covered by the step animation before settling.
pub const LOADER_BAR_CEILING_PCT: u8 = 92;
pub const LOADER_STEPS: [&str; 5] = [
    "Reading your preferences",
    "Checking season & weather",
    "Matching activities to your pace",
    "Balancing the budget",
    "Polishing your itinerary",
];
