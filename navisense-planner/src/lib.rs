//! Navisense trip planner core
//!
//! Platform-agnostic planning logic: the four-step wizard, request assembly,
//! the itinerary store with its activity substitution engine, and the derived
//! views rendered around an itinerary. No UI or network dependencies; the
//! service is reached through the [`PlanTransport`] trait (behind the `async`
//! feature) which platform crates implement.

pub mod action;
pub mod budget;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod form;
pub mod itinerary;
pub mod loader;
pub mod money;
pub mod planner;
pub mod request;
pub mod response;
pub mod season;
pub mod substitution;
pub mod transport;
pub mod views;
pub mod wizard;

// Re-export commonly used types
pub use action::{Action, Outcome};
pub use budget::{BudgetBreakdown, BudgetCategory, BudgetLine, BudgetSource, CategoryRates};
pub use catalog::{ActivityCatalog, CatalogEntry, MockCatalog, mock_itinerary};
pub use config::{ConfigError, PlannerConfig};
pub use form::{GroupSize, TripForm, UnknownOption};
pub use itinerary::{
    Activity, Alternative, Day, DayCard, ItineraryStore, Period, SlotView, TagStyle, ViewMode,
    days_from_response, tag_style,
};
pub use loader::{LoaderProgress, LoaderStepState, LoaderTiming};
pub use money::{cost_label, format_inr, group_indian};
pub use planner::{
    GenerateError, Notice, NoticeKind, PendingPlan, PlanReport, PlanSource, Planner,
};
pub use request::{PlanRequest, build_request};
pub use response::{BudgetSummary, PlanActivity, PlanDay, PlanResponse, WeatherReport};
pub use season::{Season, SeasonInsight, SeasonInsights};
pub use substitution::{ModifyContext, ModifyFlow, SubstitutionError, substitute};
pub use transport::{PlanError, check_response, interpret_response};
pub use views::{
    Chip, ChipInputs, ItineraryHeader, SeasonCard, SummaryCounts, TipsPool, WeatherCard,
    context_chips, duration_label, itinerary_header, season_card, share_message, summary_counts,
    weather_card,
};
pub use wizard::{BudgetTier, FieldTarget, Pace, StepStatus, ValidationError, WizardState};

#[cfg(feature = "async")]
pub use transport::PlanTransport;
