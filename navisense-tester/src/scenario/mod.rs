use anyhow::Result;
use chrono::{Days, NaiveDate};
use navisense_planner::{Action, BudgetTier, GroupSize, Pace, Planner};
use rand::{Rng, SeedableRng};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

pub mod logic;
pub mod service;

pub const SERVICE_SCENARIO: &str = "service-generate";

const ROUTES: &[(&str, &str)] = &[
    ("Mumbai", "Goa"),
    ("Delhi", "Jaipur"),
    ("Bengaluru", "Coorg"),
    ("Chennai", "Pondicherry"),
    ("Kolkata", "Darjeeling"),
    ("Kochi", "Munnar"),
];

const PURPOSES: &[&str] = &["adventure", "culture", "food", "nature", "relaxation", "spiritual"];

/// Per-iteration inputs handed to a scenario check.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioCtx {
    pub seed: u64,
    pub today: NaiveDate,
    pub verbose: bool,
}

impl ScenarioCtx {
    #[must_use]
    pub fn rng(&self) -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(self.seed)
    }

    #[must_use]
    pub fn planner(&self) -> Planner {
        Planner::new(self.today, self.seed)
    }

    /// A planner whose wizard passes every step, with seeded selections.
    #[must_use]
    pub fn ready_planner(&self) -> Planner {
        let mut rng = self.rng();
        let mut planner = self.planner();
        let (origin, destination) = ROUTES.choose(&mut rng).copied().unwrap_or(ROUTES[0]);
        let lead_days = rng.gen_range(1..=120);
        let nights = rng.gen_range(1..=7);
        let tier = BudgetTier::ALL.choose(&mut rng).copied();
        let pace = Pace::ALL.choose(&mut rng).copied();
        let group = GroupSize::ALL.choose(&mut rng).copied();

        let mut actions = vec![
            Action::SetOrigin(origin.to_string()),
            Action::SetDestination(destination.to_string()),
            Action::SetStartDate(self.today.checked_add_days(Days::new(lead_days))),
            Action::SetNights(nights),
            Action::SetGroupSize(group),
        ];
        actions.extend(tier.map(Action::SelectBudget));
        actions.extend(pace.map(Action::SelectPace));
        for purpose in PURPOSES.choose_multiple(&mut rng, 2) {
            actions.push(Action::TogglePurpose((*purpose).to_string()));
        }
        for action in actions {
            planner.dispatch(action);
        }
        planner
    }
}

pub type LogicCheck = fn(&ScenarioCtx) -> Result<()>;

/// A named check run once per seed and iteration.
#[derive(Debug, Clone, Copy)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub check: LogicCheck,
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<&'static TestScenario> {
    logic::SCENARIOS.iter().find(|s| s.key == key)
}

#[must_use]
pub fn is_service_scenario(key: &str) -> bool {
    key == SERVICE_SCENARIO
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    let mut listing: Vec<_> = logic::SCENARIOS
        .iter()
        .map(|s| (s.key, s.description))
        .collect();
    listing.push((SERVICE_SCENARIO, service::DESCRIPTION));
    listing
}

/// Every scenario key, for `--scenarios all`.
pub fn all_keys() -> Vec<String> {
    list_scenarios()
        .into_iter()
        .map(|(key, _)| key.to_string())
        .collect()
}
