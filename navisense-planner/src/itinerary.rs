//! Itinerary model, the store that owns it and the per-day render rules.
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::fmt;
use std::str::FromStr;

use crate::form::UnknownOption;
use crate::money::{cost_label, deserialize_amount};
use crate::response::PlanResponse;

/// Activity tags; almost always a category plus a cost label.
pub type TagList = SmallVec<[String; 2]>;

const DEFAULT_CATEGORY: &str = "sightseeing";
const DEFAULT_THEME: &str = "Exploration";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Morning,
    Midday,
    Afternoon,
    Evening,
}

impl Period {
    pub const ALL: [Self; 4] = [Self::Morning, Self::Midday, Self::Afternoon, Self::Evening];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Midday => "midday",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        }
    }

    /// Clock time printed on the timeline slot.
    #[must_use]
    pub const fn time_label(self) -> &'static str {
        match self {
            Self::Morning => "07:00",
            Self::Midday => "12:00",
            Self::Afternoon => "15:30",
            Self::Evening => "19:30",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Period {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownOption::new("period", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub cost_inr: u64,
}

impl Alternative {
    /// Tags an activity carries once this alternative is chosen.
    #[must_use]
    pub fn tags(&self) -> TagList {
        activity_tags(Some(&self.category), self.cost_inr)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub period: Period,
    pub title: String,
    pub desc: String,
    #[serde(default)]
    pub tags: TagList,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

impl Activity {
    /// Stand-in alternative for this activity once it is displaced.
    ///
    /// The category comes from the first tag; the cost is not recoverable.
    #[must_use]
    pub fn as_alternative(&self) -> Alternative {
        Alternative {
            title: self.title.clone(),
            description: self.desc.clone(),
            category: category_from_tags(&self.tags),
            cost_inr: 0,
        }
    }

    #[must_use]
    pub fn can_modify(&self) -> bool {
        !self.alternatives.is_empty()
    }
}

/// Lowercased first tag, or the default category when it is missing or blank.
pub(crate) fn category_from_tags(tags: &[String]) -> String {
    tags.first()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map_or_else(|| DEFAULT_CATEGORY.to_string(), str::to_lowercase)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub title: String,
    pub subtitle: String,
    pub activities: Vec<Activity>,
}

impl Day {
    /// Sequence badge for a zero-based day index.
    #[must_use]
    pub fn badge(index: usize) -> String {
        format!("D{}", index + 1)
    }
}

/// Uppercase the first character, leaving the rest untouched.
#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// `[Capitalized(category) or "Activity", cost label]`.
#[must_use]
pub fn activity_tags(category: Option<&str>, cost_inr: u64) -> TagList {
    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map_or_else(|| "Activity".to_string(), capitalize);
    smallvec![category, cost_label(cost_inr)]
}

/// Tag colour classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStyle {
    Food,
    Sight,
    Activity,
    Travel,
}

impl TagStyle {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Sight => "sight",
            Self::Activity => "activity",
            Self::Travel => "travel",
        }
    }
}

/// Ordered keyword table; the first keyword contained in a tag wins.
pub const TAG_STYLES: [(&str, TagStyle); 8] = [
    ("Food", TagStyle::Food),
    ("Sightseeing", TagStyle::Sight),
    ("Culture", TagStyle::Sight),
    ("Adventure", TagStyle::Activity),
    ("Relaxation", TagStyle::Activity),
    ("Leisure", TagStyle::Activity),
    ("Nightlife", TagStyle::Travel),
    ("Transport", TagStyle::Travel),
];

#[must_use]
pub fn tag_style(tag: &str) -> Option<TagStyle> {
    TAG_STYLES
        .iter()
        .find(|(keyword, _)| tag.contains(keyword))
        .map(|&(_, style)| style)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Timeline,
    Compact,
}

/// Single source of truth for the rendered itinerary.
///
/// Replacing and reading are public; in-place edits go through the
/// substitution engine only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItineraryStore {
    days: Vec<Day>,
    expanded: Vec<bool>,
    view_mode: ViewMode,
}

impl ItineraryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole itinerary and return its activity count.
    ///
    /// Day expansion resets: the first day opens, the rest collapse.
    pub fn set_itinerary(&mut self, days: Vec<Day>) -> usize {
        self.expanded = (0..days.len()).map(|i| i == 0).collect();
        self.days = days;
        let count = self.activity_count();
        log::info!("itinerary replaced: {} days, {count} activities", self.days.len());
        count
    }

    pub fn clear(&mut self) {
        self.days.clear();
        self.expanded.clear();
        self.view_mode = ViewMode::default();
    }

    #[must_use]
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    #[must_use]
    pub fn day(&self, index: usize) -> Option<&Day> {
        self.days.get(index)
    }

    #[must_use]
    pub fn activity(&self, day: usize, activity: usize) -> Option<&Activity> {
        self.days.get(day)?.activities.get(activity)
    }

    pub(crate) fn activity_mut(&mut self, day: usize, activity: usize) -> Option<&mut Activity> {
        self.days.get_mut(day)?.activities.get_mut(activity)
    }

    #[must_use]
    pub fn activity_count(&self) -> usize {
        self.days.iter().map(|d| d.activities.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    #[must_use]
    pub fn is_expanded(&self, day: usize) -> bool {
        self.expanded.get(day).copied().unwrap_or(false)
    }

    /// Flip a day's expansion; `None` for an unknown day.
    pub fn toggle_day(&mut self, day: usize) -> Option<bool> {
        let flag = self.expanded.get_mut(day)?;
        *flag = !*flag;
        Some(*flag)
    }

    #[must_use]
    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub const fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Render model for one day.
    #[must_use]
    pub fn render_day(&self, index: usize) -> Option<DayCard> {
        let day = self.days.get(index)?;
        let mut slots: Vec<SlotView> = day
            .activities
            .iter()
            .enumerate()
            .map(|(activity_index, activity)| SlotView {
                activity_index,
                time: activity.period.time_label(),
                period: activity.period,
                title: activity.title.clone(),
                desc: activity.desc.clone(),
                tags: activity
                    .tags
                    .iter()
                    .map(|text| TagView {
                        text: text.clone(),
                        style: tag_style(text),
                    })
                    .collect(),
                can_modify: activity.can_modify(),
            })
            .collect();
        slots.sort_by_key(|s| s.period);
        Some(DayCard {
            index,
            badge: Day::badge(index),
            title: day.title.clone(),
            subtitle: day.subtitle.clone(),
            expanded: self.is_expanded(index),
            slots,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagView {
    pub text: String,
    pub style: Option<TagStyle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    /// Position in the day's data, which may differ from render order.
    pub activity_index: usize,
    pub period: Period,
    pub time: &'static str,
    pub title: String,
    pub desc: String,
    pub tags: Vec<TagView>,
    pub can_modify: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCard {
    pub index: usize,
    pub badge: String,
    pub title: String,
    pub subtitle: String,
    pub expanded: bool,
    pub slots: Vec<SlotView>,
}

pub(crate) fn day_subtitle(index: usize, count: usize, destination: &str) -> String {
    if index == 0 {
        format!("Arrive & begin exploring {destination}")
    } else if index + 1 == count {
        format!("Final day in {destination}")
    } else {
        "Full day exploration".to_string()
    }
}

/// Convert a service plan into store days.
///
/// `fallback_destination` is used when the response omits its destination.
#[must_use]
pub fn days_from_response(response: &PlanResponse, fallback_destination: &str) -> Vec<Day> {
    let destination = response
        .destination
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(fallback_destination);
    let count = response.days.len();

    response
        .days
        .iter()
        .enumerate()
        .map(|(index, plan_day)| {
            let number = plan_day
                .day
                .unwrap_or_else(|| u32::try_from(index + 1).unwrap_or(u32::MAX));
            let theme = plan_day
                .theme
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_THEME);
            let activities = plan_day
                .activities
                .iter()
                .map(|a| Activity {
                    period: a
                        .period
                        .as_deref()
                        .and_then(|p| p.parse().ok())
                        .unwrap_or(Period::Morning),
                    title: a.title.clone(),
                    desc: a.description.clone(),
                    tags: activity_tags(a.category.as_deref(), a.cost_inr),
                    alternatives: a.alternatives.clone(),
                })
                .collect();
            Day {
                title: format!("Day {number}: {theme}"),
                subtitle: day_subtitle(index, count, destination),
                activities,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{PlanActivity, PlanDay};

    fn activity(period: Period, title: &str, alternatives: usize) -> Activity {
        Activity {
            period,
            title: title.to_string(),
            desc: format!("{title} desc"),
            tags: smallvec!["Culture".to_string(), "Free".to_string()],
            alternatives: (0..alternatives)
                .map(|i| Alternative {
                    title: format!("alt {i}"),
                    description: String::new(),
                    category: "food".to_string(),
                    cost_inr: 100,
                })
                .collect(),
        }
    }

    fn two_days() -> Vec<Day> {
        vec![
            Day {
                title: "Day 1".to_string(),
                subtitle: "Arrive".to_string(),
                activities: vec![
                    activity(Period::Evening, "Dinner", 0),
                    activity(Period::Morning, "Fort", 2),
                ],
            },
            Day {
                title: "Day 2".to_string(),
                subtitle: "Leave".to_string(),
                activities: vec![activity(Period::Midday, "Market", 1)],
            },
        ]
    }

    #[test]
    fn set_itinerary_counts_and_expands_first_day() {
        let mut store = ItineraryStore::new();
        assert_eq!(store.set_itinerary(two_days()), 3);
        assert!(store.is_expanded(0));
        assert!(!store.is_expanded(1));
        assert_eq!(store.toggle_day(1), Some(true));
        assert_eq!(store.toggle_day(0), Some(false));
        assert_eq!(store.toggle_day(7), None);
        assert_eq!(store.set_itinerary(Vec::new()), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn render_orders_by_period_and_gates_modify() {
        let mut store = ItineraryStore::new();
        store.set_itinerary(two_days());
        let card = store.render_day(0).unwrap();
        assert_eq!(card.badge, "D1");
        assert!(card.expanded);
        assert_eq!(card.slots[0].time, "07:00");
        assert_eq!(card.slots[0].activity_index, 1);
        assert!(card.slots[0].can_modify);
        assert_eq!(card.slots[1].time, "19:30");
        assert!(!card.slots[1].can_modify);
        assert_eq!(card.slots[0].tags[0].style, Some(TagStyle::Sight));
        assert_eq!(card.slots[0].tags[1].style, None);
        assert!(store.render_day(2).is_none());
    }

    #[test]
    fn tag_styles_use_first_keyword_match() {
        assert_eq!(tag_style("Street Food"), Some(TagStyle::Food));
        assert_eq!(tag_style("Culture"), Some(TagStyle::Sight));
        assert_eq!(tag_style("Leisure"), Some(TagStyle::Activity));
        assert_eq!(tag_style("Nightlife"), Some(TagStyle::Travel));
        assert_eq!(tag_style("Food & Culture"), Some(TagStyle::Food));
        // Matching is case sensitive, like the keyword table.
        assert_eq!(tag_style("food"), None);
        assert_eq!(tag_style("₹1,200"), None);
    }

    #[test]
    fn displaced_activity_becomes_alternative() {
        let mut a = activity(Period::Morning, "Fort", 0);
        let alt = a.as_alternative();
        assert_eq!(alt.title, "Fort");
        assert_eq!(alt.description, "Fort desc");
        assert_eq!(alt.category, "culture");
        assert_eq!(alt.cost_inr, 0);
        a.tags.clear();
        assert_eq!(a.as_alternative().category, "sightseeing");
        a.tags = smallvec![String::new(), "Free".to_string()];
        assert_eq!(a.as_alternative().category, "sightseeing");
        a.tags = smallvec!["  Food ".to_string()];
        assert_eq!(a.as_alternative().category, "food");
    }

    #[test]
    fn tags_capitalize_category_and_label_cost() {
        assert_eq!(
            activity_tags(Some("adventure"), 1_500).to_vec(),
            vec!["Adventure".to_string(), "₹1,500".to_string()]
        );
        assert_eq!(
            activity_tags(None, 0).to_vec(),
            vec!["Activity".to_string(), "Free".to_string()]
        );
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("élan"), "Élan");
    }

    #[test]
    fn adapts_service_days() {
        let response = PlanResponse {
            destination: Some("Jaipur".to_string()),
            days: vec![
                PlanDay {
                    day: Some(1),
                    theme: Some("Forts".to_string()),
                    activities: vec![PlanActivity {
                        period: Some("afternoon".to_string()),
                        title: "Amber Fort".to_string(),
                        description: "Hilltop fort".to_string(),
                        category: Some("culture".to_string()),
                        cost_inr: 500,
                        alternatives: Vec::new(),
                    }],
                },
                PlanDay {
                    day: None,
                    theme: None,
                    activities: vec![PlanActivity {
                        period: Some("brunch".to_string()),
                        title: "Lassi".to_string(),
                        ..PlanActivity::default()
                    }],
                },
                PlanDay::default(),
            ],
            ..PlanResponse::default()
        };
        let days = days_from_response(&response, "Elsewhere");
        assert_eq!(days[0].title, "Day 1: Forts");
        assert_eq!(days[0].subtitle, "Arrive & begin exploring Jaipur");
        assert_eq!(days[0].activities[0].period, Period::Afternoon);
        assert_eq!(days[0].activities[0].tags.as_slice(), ["Culture", "₹500"]);
        assert_eq!(days[1].title, "Day 2: Exploration");
        assert_eq!(days[1].subtitle, "Full day exploration");
        assert_eq!(days[1].activities[0].period, Period::Morning);
        assert_eq!(days[1].activities[0].tags.as_slice(), ["Activity", "Free"]);
        assert_eq!(days[2].subtitle, "Final day in Jaipur");
    }
}
