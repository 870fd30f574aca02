//! Activity substitution: swap an activity for one of its alternatives.
//!
//! The displaced activity is appended to the alternatives so it can be picked
//! back, minus its cost.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::itinerary::{Activity, ItineraryStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubstitutionError {
    #[error("no activity at day {day}, slot {activity}")]
    MissingActivity { day: usize, activity: usize },
    #[error("activity at day {day}, slot {activity} has no alternative {alternative}")]
    MissingAlternative {
        day: usize,
        activity: usize,
        alternative: usize,
    },
    #[error("no activity is open for modification")]
    NoContext,
}

/// Swap in place and return the updated activity. No other slot is touched.
///
/// # Errors
///
/// Returns [`SubstitutionError`] when any index is stale; the store is left
/// unchanged in that case.
pub fn substitute(
    store: &mut ItineraryStore,
    day: usize,
    activity: usize,
    alternative: usize,
) -> Result<&Activity, SubstitutionError> {
    let slot = store
        .activity_mut(day, activity)
        .ok_or(SubstitutionError::MissingActivity { day, activity })?;
    if alternative >= slot.alternatives.len() {
        return Err(SubstitutionError::MissingAlternative {
            day,
            activity,
            alternative,
        });
    }

    let chosen = slot.alternatives.remove(alternative);
    let displaced = slot.as_alternative();
    slot.alternatives.push(displaced);
    slot.tags = chosen.tags();
    slot.title = chosen.title;
    slot.desc = chosen.description;
    Ok(&*slot)
}

/// The slot currently open in the modify dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyContext {
    pub day: usize,
    pub activity: usize,
}

/// Two-phase modify flow: open a slot, then pick or close.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyFlow {
    context: Option<ModifyContext>,
}

impl ModifyFlow {
    #[must_use]
    pub const fn context(&self) -> Option<ModifyContext> {
        self.context
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.context.is_some()
    }

    /// Open the dialog for an existing slot. Unknown slots leave it closed.
    ///
    /// # Errors
    ///
    /// Returns [`SubstitutionError::MissingActivity`] for a slot that does
    /// not exist.
    pub fn open<'a>(
        &mut self,
        store: &'a ItineraryStore,
        day: usize,
        activity: usize,
    ) -> Result<&'a Activity, SubstitutionError> {
        let found = store
            .activity(day, activity)
            .ok_or(SubstitutionError::MissingActivity { day, activity })?;
        self.context = Some(ModifyContext { day, activity });
        Ok(found)
    }

    /// Substitute using the open context, then close. A failed substitution
    /// keeps the dialog open.
    ///
    /// # Errors
    ///
    /// Returns [`SubstitutionError::NoContext`] when nothing is open, or the
    /// engine's error for a stale context or alternative.
    pub fn select<'a>(
        &mut self,
        store: &'a mut ItineraryStore,
        alternative: usize,
    ) -> Result<&'a Activity, SubstitutionError> {
        let ctx = self.context.ok_or(SubstitutionError::NoContext)?;
        let updated = substitute(store, ctx.day, ctx.activity, alternative)?;
        self.context = None;
        Ok(updated)
    }

    pub const fn close(&mut self) {
        self.context = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::{Alternative, Day, Period};
    use smallvec::smallvec;

    fn store() -> ItineraryStore {
        let fort = Activity {
            period: Period::Morning,
            title: "Old Fort".to_string(),
            desc: "Ramparts".to_string(),
            tags: smallvec!["Culture".to_string(), "₹300".to_string()],
            alternatives: vec![
                Alternative {
                    title: "Spice Market".to_string(),
                    description: "Stalls".to_string(),
                    category: "food".to_string(),
                    cost_inr: 1_250,
                },
                Alternative {
                    title: "Lake Walk".to_string(),
                    description: "Promenade".to_string(),
                    category: "leisure".to_string(),
                    cost_inr: 0,
                },
            ],
        };
        let lunch = Activity {
            period: Period::Midday,
            title: "Thali".to_string(),
            desc: "Lunch".to_string(),
            tags: smallvec!["Food".to_string(), "Free".to_string()],
            alternatives: Vec::new(),
        };
        let mut store = ItineraryStore::new();
        store.set_itinerary(vec![Day {
            title: "Day 1".to_string(),
            subtitle: String::new(),
            activities: vec![fort, lunch],
        }]);
        store
    }

    #[test]
    fn swaps_and_keeps_return_path() {
        let mut store = store();
        let updated = substitute(&mut store, 0, 0, 0).unwrap().clone();
        assert_eq!(updated.title, "Spice Market");
        assert_eq!(updated.desc, "Stalls");
        assert_eq!(updated.tags.as_slice(), ["Food", "₹1,250"]);
        assert_eq!(updated.alternatives.len(), 2);
        assert_eq!(updated.alternatives[0].title, "Lake Walk");
        assert_eq!(updated.alternatives[1].title, "Old Fort");
        assert_eq!(updated.alternatives[1].category, "culture");
        assert_eq!(updated.period, Period::Morning);
        assert_eq!(store.activity(0, 1).unwrap().title, "Thali");
    }

    #[test]
    fn round_trip_restores_text_but_not_cost() {
        let mut store = store();
        substitute(&mut store, 0, 0, 0).unwrap();
        let back = substitute(&mut store, 0, 0, 1).unwrap();
        assert_eq!(back.title, "Old Fort");
        assert_eq!(back.desc, "Ramparts");
        assert_eq!(back.tags.as_slice(), ["Culture", "Free"]);
    }

    #[test]
    fn stale_indices_leave_store_untouched() {
        let mut store = store();
        let before = store.days().to_vec();
        assert_eq!(
            substitute(&mut store, 3, 0, 0).unwrap_err(),
            SubstitutionError::MissingActivity { day: 3, activity: 0 }
        );
        assert!(matches!(
            substitute(&mut store, 0, 1, 0),
            Err(SubstitutionError::MissingAlternative { .. })
        ));
        assert_eq!(store.days(), before.as_slice());
    }

    #[test]
    fn modify_flow_open_select_close() {
        let mut store = store();
        let mut flow = ModifyFlow::default();
        assert_eq!(flow.select(&mut store, 0), Err(SubstitutionError::NoContext));
        assert!(flow.open(&store, 0, 9).is_err());
        assert!(!flow.is_open());

        flow.open(&store, 0, 0).unwrap();
        assert_eq!(flow.context(), Some(ModifyContext { day: 0, activity: 0 }));
        assert_eq!(flow.select(&mut store, 1).unwrap().title, "Lake Walk");
        assert!(!flow.is_open());

        flow.open(&store, 0, 0).unwrap();
        flow.close();
        assert_eq!(flow.select(&mut store, 0), Err(SubstitutionError::NoContext));
    }

    #[test]
    fn missing_alternative_keeps_dialog_open() {
        let mut store = store();
        let before = store.days().to_vec();
        let mut flow = ModifyFlow::default();
        flow.open(&store, 0, 0).unwrap();
        assert!(matches!(
            flow.select(&mut store, 5),
            Err(SubstitutionError::MissingAlternative { .. })
        ));
        assert_eq!(flow.context(), Some(ModifyContext { day: 0, activity: 0 }));
        assert_eq!(store.days(), before.as_slice());
        assert_eq!(flow.select(&mut store, 0).unwrap().title, "Spice Market");
        assert!(!flow.is_open());
    }
}
