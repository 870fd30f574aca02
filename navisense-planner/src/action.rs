//! User intents accepted by [`crate::Planner::dispatch`] and what they did.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::form::GroupSize;
use crate::itinerary::ViewMode;
use crate::wizard::{BudgetTier, Pace, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Action {
    AdvanceStep,
    RetreatStep,
    SelectBudget(BudgetTier),
    TogglePurpose(String),
    SelectPace(Pace),
    AddCheckpoint(String),
    RemoveCheckpoint(String),
    SetNights(u32),
    SetOrigin(String),
    SetDestination(String),
    SetStartDate(Option<NaiveDate>),
    /// Derive nights from an end date; ignored unless it is after the start.
    SetEndDate(NaiveDate),
    SetAccommodation(Option<String>),
    SetGroupSize(Option<GroupSize>),
    SetSpecialNeeds(Option<String>),
    SetTotalBudget(Option<f64>),
    SetCurrency(Option<String>),
    OpenModify {
        day: usize,
        activity: usize,
    },
    SelectAlternative(usize),
    CloseModify,
    SubstituteActivity {
        day: usize,
        activity: usize,
        alternative: usize,
    },
    ToggleDay(usize),
    SetViewMode(ViewMode),
    DismissNotice,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed; re-render whatever depends on it.
    Updated,
    /// Nothing to do (stale index, duplicate checkpoint, unchanged value).
    Ignored,
    StepChanged(u8),
    /// Advance refused; the renderer marks the target field.
    Blocked(ValidationError),
    ModifyOpened {
        day: usize,
        activity: usize,
    },
    /// Only this slot needs re-rendering.
    Substituted {
        day: usize,
        activity: usize,
    },
    DayToggled {
        day: usize,
        expanded: bool,
    },
}

impl Outcome {
    #[must_use]
    pub const fn changed(&self) -> bool {
        !matches!(self, Self::Ignored | Self::Blocked(_))
    }
}
