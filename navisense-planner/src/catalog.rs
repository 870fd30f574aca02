//! Activity catalog used for offline itineraries.
//!
//! The catalog is a trait seam so callers can swap the bundled table for
//! fixtures; sampling draws from a caller-supplied RNG.
use rand::RngCore;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::itinerary::{
    Activity, Alternative, Day, Period, TagList, category_from_tags, day_subtitle,
};

const DEFAULT_ACTIVITY_DATA: &str = include_str!("../static/data/activities.json");

/// Alternatives offered per sampled slot.
pub const MOCK_ALTERNATIVES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CatalogEntry {
    pub title: String,
    pub desc: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CatalogEntry {
    fn to_alternative(&self) -> Alternative {
        Alternative {
            title: self.title.clone(),
            description: self.desc.clone(),
            category: category_from_tags(&self.tags),
            cost_inr: 0,
        }
    }
}

/// Source of activities per period.
pub trait ActivityCatalog {
    fn entries(&self, period: Period) -> &[CatalogEntry];

    /// Pick one entry for `period`, offering other entries of the same
    /// period as alternatives.
    fn sample(&self, period: Period, rng: &mut dyn RngCore) -> Option<Activity> {
        let pool = self.entries(period);
        let picked = pool.choose(&mut *rng)?;
        let alternatives = pool
            .iter()
            .filter(|e| e.title != picked.title)
            .collect::<Vec<_>>()
            .choose_multiple(&mut *rng, MOCK_ALTERNATIVES)
            .map(|e| e.to_alternative())
            .collect();
        Some(Activity {
            period,
            title: picked.title.clone(),
            desc: picked.desc.clone(),
            tags: picked.tags.iter().cloned().collect::<TagList>(),
            alternatives,
        })
    }
}

/// The bundled catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct MockCatalog {
    entries: HashMap<Period, Vec<CatalogEntry>>,
}

impl MockCatalog {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_ACTIVITY_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn from_entries(entries: HashMap<Period, Vec<CatalogEntry>>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ActivityCatalog for MockCatalog {
    fn entries(&self, period: Period) -> &[CatalogEntry] {
        self.entries.get(&period).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Offline itinerary of `nights + 1` days, one sampled activity per period.
#[must_use]
pub fn mock_itinerary(
    catalog: &dyn ActivityCatalog,
    rng: &mut dyn RngCore,
    destination: &str,
    nights: u32,
) -> Vec<Day> {
    let count = usize::try_from(nights).unwrap_or(usize::MAX).saturating_add(1);
    (0..count)
        .map(|index| {
            Day {
                title: format!("Day {}: Exploration", index + 1),
                subtitle: day_subtitle(index, count, destination),
                activities: Period::ALL
                    .into_iter()
                    .filter_map(|period| catalog.sample(period, rng))
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn bundled_catalog_covers_every_period() {
        let catalog = MockCatalog::load_from_static();
        assert_eq!(catalog.len(), 20);
        for period in Period::ALL {
            assert_eq!(catalog.entries(period).len(), 5);
        }
    }

    #[test]
    fn sampling_is_seeded() {
        let catalog = MockCatalog::load_from_static();
        let a = catalog.sample(Period::Evening, &mut ChaCha20Rng::seed_from_u64(9));
        let b = catalog.sample(Period::Evening, &mut ChaCha20Rng::seed_from_u64(9));
        assert_eq!(a, b);
        let a = a.unwrap();
        assert_eq!(a.period, Period::Evening);
        assert_eq!(a.alternatives.len(), MOCK_ALTERNATIVES);
        assert!(a.alternatives.iter().all(|alt| alt.title != a.title));
    }

    #[test]
    fn empty_catalog_yields_empty_days() {
        let catalog = MockCatalog::default();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let days = mock_itinerary(&catalog, &mut rng, "Nowhere", 1);
        assert_eq!(days.len(), 2);
        assert!(days.iter().all(|d| d.activities.is_empty()));
    }

    #[test]
    fn mock_itinerary_spans_nights_plus_one() {
        let catalog = MockCatalog::load_from_static();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let days = mock_itinerary(&catalog, &mut rng, "Goa", 3);
        assert_eq!(days.len(), 4);
        assert_eq!(days[0].subtitle, "Arrive & begin exploring Goa");
        assert_eq!(days[3].subtitle, "Final day in Goa");
        assert_eq!(days[1].activities.len(), 4);
        assert_eq!(days[1].activities[3].period, Period::Evening);
    }

    #[test]
    fn blank_first_tag_uses_default_category() {
        let entry = CatalogEntry {
            title: "Ghats".to_string(),
            desc: "Steps".to_string(),
            tags: vec![" ".to_string(), "Free".to_string()],
        };
        assert_eq!(entry.to_alternative().category, "sightseeing");
    }
}
