//! Step wizard state machine and its validation rules.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::budget::CategoryRates;
use crate::constants::{
    DEFAULT_NIGHTS, MAX_NIGHTS, RATES_BUDGET, RATES_LUXURY, RATES_MODERATE, RATES_PREMIUM,
    TOTAL_STEPS,
};
use crate::form::{TripForm, UnknownOption};

/// Spending tier chosen on step 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Budget,
    Moderate,
    Premium,
    Luxury,
}

impl BudgetTier {
    pub const ALL: [Self; 4] = [Self::Budget, Self::Moderate, Self::Premium, Self::Luxury];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Moderate => "moderate",
            Self::Premium => "premium",
            Self::Luxury => "luxury",
        }
    }

    /// Chip label shown in the itinerary context strip.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Budget => "🎒 Budget Tier",
            Self::Moderate => "🏨 Moderate Tier",
            Self::Premium => "✨ Premium Tier",
            Self::Luxury => "👑 Luxury Tier",
        }
    }

    /// Per-night spend by category.
    #[must_use]
    pub const fn rates(self) -> CategoryRates {
        match self {
            Self::Budget => RATES_BUDGET,
            Self::Moderate => RATES_MODERATE,
            Self::Premium => RATES_PREMIUM,
            Self::Luxury => RATES_LUXURY,
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for BudgetTier {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownOption::new("budget tier", s))
    }
}

/// Daily rhythm chosen on step 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Slow,
    Moderate,
    Fast,
}

impl Pace {
    pub const ALL: [Self; 3] = [Self::Slow, Self::Moderate, Self::Fast];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Moderate => "moderate",
            Self::Fast => "fast",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Moderate => "Moderate",
            Self::Fast => "Fast",
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Pace {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownOption::new("pace", s))
    }
}

/// Input a rejected step points the renderer at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldTarget {
    Origin,
    Destination,
    StartDate,
    Nights,
    BudgetTier,
    Purposes,
    Pace,
    Currency,
}

impl FieldTarget {
    /// Groups (card sets, button grids) shake; single inputs get an error border and focus.
    #[must_use]
    pub const fn is_group(self) -> bool {
        matches!(self, Self::BudgetTier | Self::Purposes | Self::Pace)
    }
}

/// Local validation failure blocking a step transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your starting location")]
    MissingOrigin,
    #[error("Please enter your destination")]
    MissingDestination,
    #[error("Please pick a departure date")]
    MissingStartDate,
    #[error("Departure date {start} is before today ({today})")]
    StartDateInPast { start: NaiveDate, today: NaiveDate },
    #[error("Nights must be between 1 and {max} (got {nights})")]
    InvalidNights { nights: u32, max: u32 },
    #[error("Please select a budget tier")]
    MissingBudget,
    #[error("Please select at least one travel purpose")]
    MissingPurpose,
    #[error("Please select your travel pace")]
    MissingPace,
    #[error("Currency must be a three-letter code (got {0:?})")]
    InvalidCurrency(String),
}

impl ValidationError {
    #[must_use]
    pub const fn target(&self) -> FieldTarget {
        match self {
            Self::MissingOrigin => FieldTarget::Origin,
            Self::MissingDestination => FieldTarget::Destination,
            Self::MissingStartDate | Self::StartDateInPast { .. } => FieldTarget::StartDate,
            Self::InvalidNights { .. } => FieldTarget::Nights,
            Self::MissingBudget => FieldTarget::BudgetTier,
            Self::MissingPurpose => FieldTarget::Purposes,
            Self::MissingPace => FieldTarget::Pace,
            Self::InvalidCurrency(_) => FieldTarget::Currency,
        }
    }
}

/// Progress indicator state of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Active,
    Future,
}

/// Selections collected across the four wizard steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    current_step: u8,
    pub selected_budget: Option<BudgetTier>,
    selected_purposes: Vec<String>,
    pub selected_pace: Option<Pace>,
    checkpoints: Vec<String>,
    nights: u32,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            current_step: 1,
            selected_budget: None,
            selected_purposes: Vec::new(),
            selected_pace: None,
            checkpoints: Vec::new(),
            nights: DEFAULT_NIGHTS,
        }
    }
}

impl WizardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn current_step(&self) -> u8 {
        self.current_step
    }

    #[must_use]
    pub const fn total_steps(&self) -> u8 {
        TOTAL_STEPS
    }

    #[must_use]
    pub const fn is_final_step(&self) -> bool {
        self.current_step == TOTAL_STEPS
    }

    /// Steps behind the current one have been passed through validation.
    #[must_use]
    pub const fn is_step_completed(&self, step: u8) -> bool {
        step >= 1 && step < self.current_step
    }

    #[must_use]
    pub const fn step_status(&self, step: u8) -> StepStatus {
        if self.is_step_completed(step) {
            StepStatus::Completed
        } else if step == self.current_step {
            StepStatus::Active
        } else {
            StepStatus::Future
        }
    }

    /// Whether the connector between `step` and `step + 1` is filled.
    #[must_use]
    pub const fn connector_filled(&self, step: u8) -> bool {
        self.current_step > step
    }

    /// Check the rules for `step` against the current selections and form.
    ///
    /// # Errors
    ///
    /// Returns the first rule the step violates.
    pub fn validate(
        &self,
        step: u8,
        form: &TripForm,
        today: NaiveDate,
    ) -> Result<(), ValidationError> {
        match step {
            1 => {
                if form.origin.trim().is_empty() {
                    return Err(ValidationError::MissingOrigin);
                }
                if form.destination.trim().is_empty() {
                    return Err(ValidationError::MissingDestination);
                }
            }
            2 => {
                let start = form.start_date.ok_or(ValidationError::MissingStartDate)?;
                if start < today {
                    return Err(ValidationError::StartDateInPast { start, today });
                }
                if self.nights == 0 || self.nights > MAX_NIGHTS {
                    return Err(ValidationError::InvalidNights {
                        nights: self.nights,
                        max: MAX_NIGHTS,
                    });
                }
            }
            3 => {
                if self.selected_budget.is_none() {
                    return Err(ValidationError::MissingBudget);
                }
            }
            4 => {
                if self.selected_purposes.is_empty() {
                    return Err(ValidationError::MissingPurpose);
                }
                if self.selected_pace.is_none() {
                    return Err(ValidationError::MissingPace);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Validate every step in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error.
    pub fn validate_all(&self, form: &TripForm, today: NaiveDate) -> Result<(), ValidationError> {
        (1..=TOTAL_STEPS).try_for_each(|step| self.validate(step, form, today))
    }

    /// Move forward one step once the current step validates. The final step stays put.
    ///
    /// # Errors
    ///
    /// Returns the validation failure; the current step is unchanged.
    pub fn advance(&mut self, form: &TripForm, today: NaiveDate) -> Result<u8, ValidationError> {
        self.validate(self.current_step, form, today)?;
        if self.current_step < TOTAL_STEPS {
            self.current_step += 1;
        }
        Ok(self.current_step)
    }

    /// Move back one step, never below the first.
    pub fn retreat(&mut self) -> u8 {
        if self.current_step > 1 {
            self.current_step -= 1;
        }
        self.current_step
    }

    pub const fn select_budget(&mut self, tier: BudgetTier) {
        self.selected_budget = Some(tier);
    }

    pub const fn select_pace(&mut self, pace: Pace) {
        self.selected_pace = Some(pace);
    }

    /// Toggle a purpose on or off, returning whether it is now selected.
    pub fn toggle_purpose(&mut self, purpose: &str) -> bool {
        let purpose = purpose.trim();
        if purpose.is_empty() {
            return false;
        }
        if let Some(idx) = self.selected_purposes.iter().position(|p| p == purpose) {
            self.selected_purposes.remove(idx);
            false
        } else {
            self.selected_purposes.push(purpose.to_string());
            true
        }
    }

    #[must_use]
    pub fn selected_purposes(&self) -> &[String] {
        &self.selected_purposes
    }

    /// Append a checkpoint; blank and duplicate names are ignored.
    pub fn add_checkpoint(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.checkpoints.iter().any(|c| c == name) {
            return false;
        }
        self.checkpoints.push(name.to_string());
        true
    }

    pub fn remove_checkpoint(&mut self, name: &str) -> bool {
        let before = self.checkpoints.len();
        self.checkpoints.retain(|c| c != name);
        self.checkpoints.len() != before
    }

    #[must_use]
    pub fn checkpoints(&self) -> &[String] {
        &self.checkpoints
    }

    #[must_use]
    pub const fn nights(&self) -> u32 {
        self.nights
    }

    pub const fn set_nights(&mut self, nights: u32) {
        self.nights = nights;
    }

    /// Return to the initial selections in place.
    pub fn reset(&mut self) {
        self.current_step = 1;
        self.selected_budget = None;
        self.selected_purposes.clear();
        self.selected_pace = None;
        self.checkpoints.clear();
        self.nights = DEFAULT_NIGHTS;
    }
}
