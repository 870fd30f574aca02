//! Simulated generation loader.
//!
//! The progress model is pure; the timed playback needs the `async` feature.
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    LOADER_BAR_CEILING_PCT, LOADER_SETTLE_MS, LOADER_STEP_MAX_MS, LOADER_STEP_MIN_MS, LOADER_STEPS,
};

const fn default_step_min_ms() -> u64 {
    LOADER_STEP_MIN_MS
}

const fn default_step_max_ms() -> u64 {
    LOADER_STEP_MAX_MS
}

const fn default_settle_ms() -> u64 {
    LOADER_SETTLE_MS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderTiming {
    #[serde(default = "default_step_min_ms")]
    pub step_min_ms: u64,
    #[serde(default = "default_step_max_ms")]
    pub step_max_ms: u64,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for LoaderTiming {
    fn default() -> Self {
        Self {
            step_min_ms: LOADER_STEP_MIN_MS,
            step_max_ms: LOADER_STEP_MAX_MS,
            settle_ms: LOADER_SETTLE_MS,
        }
    }
}

impl LoaderTiming {
    /// No delays at all; used by drivers that do not animate.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            step_min_ms: 0,
            step_max_ms: 0,
            settle_ms: 0,
        }
    }

    /// One randomized delay per loader step.
    #[must_use]
    pub fn step_delays(&self, rng: &mut dyn RngCore) -> Vec<Duration> {
        let (lo, hi) = if self.step_min_ms <= self.step_max_ms {
            (self.step_min_ms, self.step_max_ms)
        } else {
            (self.step_max_ms, self.step_min_ms)
        };
        LOADER_STEPS
            .iter()
            .map(|_| Duration::from_millis(rng.gen_range(lo..=hi)))
            .collect()
    }

    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderStepState {
    Pending,
    Active,
    Done,
}

/// Loader overlay state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoaderProgress {
    visible: bool,
    active: Option<usize>,
    done: usize,
    bar_pct: u8,
}

impl LoaderProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub const fn bar_pct(&self) -> u8 {
        self.bar_pct
    }

    #[must_use]
    pub const fn completed_steps(&self) -> usize {
        self.done
    }

    #[must_use]
    pub fn step_state(&self, step: usize) -> LoaderStepState {
        if step < self.done {
            LoaderStepState::Done
        } else if self.active == Some(step) {
            LoaderStepState::Active
        } else {
            LoaderStepState::Pending
        }
    }

    /// Show the overlay with every step pending.
    pub fn show(&mut self) {
        *self = Self {
            visible: true,
            ..Self::default()
        };
    }

    /// Mark `step` active and move the bar to its share of the ceiling.
    pub fn begin_step(&mut self, step: usize) {
        let total = LOADER_STEPS.len();
        let step = step.min(total.saturating_sub(1));
        self.active = Some(step);
        let pct = (step + 1) * usize::from(LOADER_BAR_CEILING_PCT) / total.max(1);
        self.bar_pct = u8::try_from(pct).unwrap_or(LOADER_BAR_CEILING_PCT);
    }

    pub fn finish_step(&mut self) {
        if let Some(step) = self.active.take() {
            self.done = self.done.max(step + 1);
        }
    }

    /// All steps done, bar full.
    pub fn settle(&mut self) {
        self.active = None;
        self.done = LOADER_STEPS.len();
        self.bar_pct = 100;
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Play the loader through every step, then settle.
#[cfg(feature = "async")]
pub async fn play(progress: &mut LoaderProgress, delays: &[Duration], settle: Duration) {
    progress.show();
    for (step, delay) in delays.iter().enumerate() {
        progress.begin_step(step);
        tokio::time::sleep(*delay).await;
        progress.finish_step();
    }
    progress.settle();
    tokio::time::sleep(settle).await;
}
