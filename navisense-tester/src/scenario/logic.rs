//! Offline scenarios driven straight through the planner API.
use anyhow::{Context, Result, bail, ensure};
use chrono::{Datelike, Days, NaiveDate};
use navisense_planner::{
    Action, BudgetBreakdown, BudgetTier, GenerateError, GroupSize, Outcome, PlanResponse,
    PlanSource, Season, ValidationError, constants::MAX_NIGHTS, season_card,
};
use rand::Rng;
use rand::seq::SliceRandom;

use super::{ScenarioCtx, TestScenario};

pub const SCENARIOS: &[TestScenario] = &[
    TestScenario {
        key: "smoke",
        name: "Smoke",
        description: "Fill the wizard and build an offline itinerary",
        check: smoke,
    },
    TestScenario {
        key: "validation-gates",
        name: "Validation Gates",
        description: "Each step refuses to advance on its own missing fields",
        check: validation_gates,
    },
    TestScenario {
        key: "request-defaults",
        name: "Request Defaults",
        description: "Optional fields fall back to defaults; currency is normalised",
        check: request_defaults,
    },
    TestScenario {
        key: "substitution-roundtrip",
        name: "Substitution Round Trip",
        description: "Swapping an activity and swapping back restores it",
        check: substitution_roundtrip,
    },
    TestScenario {
        key: "stale-modify",
        name: "Stale Modify",
        description: "Out-of-range modify requests change nothing",
        check: stale_modify,
    },
    TestScenario {
        key: "budget-estimates",
        name: "Budget Estimates",
        description: "Estimated totals equal the sum of their category lines",
        check: budget_estimates,
    },
    TestScenario {
        key: "checkpoint-dedup",
        name: "Checkpoint Dedup",
        description: "Checkpoints stay trimmed and unique",
        check: checkpoint_dedup,
    },
    TestScenario {
        key: "season-buckets",
        name: "Season Buckets",
        description: "Every start date maps to its meteorological season",
        check: season_buckets,
    },
    TestScenario {
        key: "day-cards",
        name: "Day Cards",
        description: "Rendered day cards are time-ordered with one day expanded",
        check: day_cards,
    },
    TestScenario {
        key: "reset-supersedes",
        name: "Reset Supersedes",
        description: "A reply arriving after a reset is dropped",
        check: reset_supersedes,
    },
];

fn smoke(ctx: &ScenarioCtx) -> Result<()> {
    let mut planner = ctx.ready_planner();
    let request = planner.build_request().context("ready wizard rejected")?;
    let count = planner.generate_offline()?;

    let days = u32::try_from(planner.store().days().len())?;
    ensure!(
        days == request.days(),
        "expected {} days, got {days}",
        request.days()
    );
    ensure!(count == planner.store().activity_count(), "activity count drifted");
    ensure!(count > 0, "offline itinerary is empty");

    let report = planner.report().context("no report after generation")?;
    ensure!(report.source == PlanSource::Offline, "wrong plan source");
    ensure!(
        report.header.title == format!("Your {} Itinerary", request.destination),
        "unexpected header {:?}",
        report.header.title
    );
    ensure!(report.tips.len() == 4, "expected four tips");
    ensure!(report.season.is_some(), "missing season card");
    Ok(())
}

fn validation_gates(ctx: &ScenarioCtx) -> Result<()> {
    let mut planner = ctx.planner();
    expect_blocked(&mut planner, &ValidationError::MissingOrigin)?;
    planner.dispatch(Action::SetOrigin("Pune".to_string()));
    expect_blocked(&mut planner, &ValidationError::MissingDestination)?;
    ensure!(planner.wizard().current_step() == 1, "moved on a failed advance");

    planner.dispatch(Action::SetDestination("Lonavala".to_string()));
    ensure!(
        planner.dispatch(Action::AdvanceStep) == Outcome::StepChanged(2),
        "valid step 1 did not advance"
    );

    let yesterday = ctx.today.pred_opt().context("date underflow")?;
    planner.dispatch(Action::SetStartDate(Some(yesterday)));
    let outcome = planner.dispatch(Action::AdvanceStep);
    ensure!(
        matches!(outcome, Outcome::Blocked(ValidationError::StartDateInPast { .. })),
        "past start accepted: {outcome:?}"
    );

    planner.dispatch(Action::SetStartDate(Some(ctx.today)));
    for nights in [0, MAX_NIGHTS + 1] {
        planner.dispatch(Action::SetNights(nights));
        let outcome = planner.dispatch(Action::AdvanceStep);
        ensure!(
            matches!(outcome, Outcome::Blocked(ValidationError::InvalidNights { .. })),
            "{nights} nights accepted: {outcome:?}"
        );
    }
    ensure!(planner.wizard().current_step() == 2, "step 2 gate leaked");
    Ok(())
}

fn expect_blocked(planner: &mut navisense_planner::Planner, expected: &ValidationError) -> Result<()> {
    match planner.dispatch(Action::AdvanceStep) {
        Outcome::Blocked(err) if &err == expected => Ok(()),
        other => bail!("expected {expected:?}, got {other:?}"),
    }
}

fn request_defaults(ctx: &ScenarioCtx) -> Result<()> {
    let mut planner = ctx.ready_planner();
    planner.dispatch(Action::SetGroupSize(None));
    planner.dispatch(Action::SetCurrency(None));
    planner.dispatch(Action::SetAccommodation(Some("   ".to_string())));
    let request = planner.build_request()?;
    ensure!(request.group_size == GroupSize::Couple, "group default");
    ensure!(request.currency == "INR", "currency default");
    ensure!(request.accommodation.is_none(), "blank accommodation kept");
    ensure!(
        !request.origin.is_empty() && !request.destination.is_empty(),
        "blank endpoint"
    );

    planner.dispatch(Action::SetCurrency(Some(" usd ".to_string())));
    ensure!(planner.build_request()?.currency == "USD", "currency not upper-cased");

    planner.dispatch(Action::SetCurrency(Some("rupees".to_string())));
    ensure!(
        matches!(planner.build_request(), Err(ValidationError::InvalidCurrency(_))),
        "malformed currency accepted"
    );
    Ok(())
}

fn substitution_roundtrip(ctx: &ScenarioCtx) -> Result<()> {
    let mut planner = ctx.ready_planner();
    planner.generate_offline()?;
    let mut rng = ctx.rng();
    let (day, activity) = pick_slot(&planner, &mut rng).context("no modifiable slot")?;
    let before = planner.store().days().to_vec();
    let original = before[day].activities[activity].clone();
    let chosen = original.alternatives[0].title.clone();

    ensure!(
        planner.dispatch(Action::OpenModify { day, activity })
            == Outcome::ModifyOpened { day, activity },
        "modify did not open"
    );
    planner.dispatch(Action::SelectAlternative(0));
    let swapped = planner.store().activity(day, activity).context("slot vanished")?.clone();
    ensure!(swapped.title == chosen, "title not replaced");
    ensure!(swapped.period == original.period, "period changed");
    ensure!(
        swapped.alternatives.len() == original.alternatives.len(),
        "alternative count changed"
    );
    ensure!(!planner.modify().is_open(), "modify left open");

    let back = swapped.alternatives.len() - 1;
    planner.dispatch(Action::SubstituteActivity {
        day,
        activity,
        alternative: back,
    });
    let restored = planner.store().activity(day, activity).context("slot vanished")?;
    ensure!(restored.title == original.title, "title not restored");
    ensure!(restored.desc == original.desc, "description not restored");

    for (d, day_data) in planner.store().days().iter().enumerate() {
        for (a, slot) in day_data.activities.iter().enumerate() {
            if (d, a) != (day, activity) && slot != &before[d].activities[a] {
                bail!("slot {d}/{a} changed during substitution");
            }
        }
    }
    Ok(())
}

fn pick_slot(planner: &navisense_planner::Planner, rng: &mut impl Rng) -> Option<(usize, usize)> {
    let slots: Vec<(usize, usize)> = planner
        .store()
        .days()
        .iter()
        .enumerate()
        .flat_map(|(d, day)| {
            day.activities
                .iter()
                .enumerate()
                .filter(|(_, a)| a.can_modify())
                .map(move |(a, _)| (d, a))
        })
        .collect();
    slots.choose(rng).copied()
}

fn stale_modify(ctx: &ScenarioCtx) -> Result<()> {
    let mut planner = ctx.ready_planner();
    planner.generate_offline()?;
    let snapshot = planner.store().days().to_vec();
    let past_end = snapshot.len();

    let attempts = [
        Action::SubstituteActivity {
            day: past_end,
            activity: 0,
            alternative: 0,
        },
        Action::SubstituteActivity {
            day: 0,
            activity: 0,
            alternative: 99,
        },
        Action::OpenModify {
            day: 0,
            activity: 99,
        },
        Action::SelectAlternative(0),
        Action::ToggleDay(past_end),
    ];
    for action in attempts {
        let label = format!("{action:?}");
        ensure!(
            planner.dispatch(action) == Outcome::Ignored,
            "{label} was not ignored"
        );
    }
    ensure!(planner.store().days() == snapshot.as_slice(), "store mutated");
    Ok(())
}

fn budget_estimates(ctx: &ScenarioCtx) -> Result<()> {
    let mut rng = ctx.rng();
    for _ in 0..16 {
        let tier = BudgetTier::ALL.choose(&mut rng).copied();
        let group = GroupSize::ALL.choose(&mut rng).copied();
        let nights = rng.gen_range(1..=MAX_NIGHTS);
        let breakdown = BudgetBreakdown::estimate(tier, nights, group);
        let sum: u64 = breakdown.lines.iter().map(|l| l.amount).sum();
        ensure!(
            breakdown.total == sum,
            "{tier:?}/{group:?}/{nights}: total {} != {sum}",
            breakdown.total
        );
        ensure!(
            breakdown.lines.iter().any(|l| l.bar_pct == 100),
            "no full-width bar"
        );
        let shared = group.is_none_or(|g| g.headcount() > 1);
        ensure!(
            breakdown.per_person.is_some() == shared,
            "per-person split mismatch for {group:?}"
        );
    }
    Ok(())
}

fn checkpoint_dedup(ctx: &ScenarioCtx) -> Result<()> {
    let mut rng = ctx.rng();
    let mut planner = ctx.planner();
    let names = ["Hampi", "Badami", "Aihole", "Pattadakal"];
    for _ in 0..12 {
        let name = names.choose(&mut rng).copied().unwrap_or("Hampi");
        let padded = if rng.gen_bool(0.5) {
            format!("  {name} ")
        } else {
            name.to_string()
        };
        planner.dispatch(Action::AddCheckpoint(padded));
    }
    planner.dispatch(Action::AddCheckpoint("   ".to_string()));

    let checkpoints = planner.wizard().checkpoints();
    for (i, name) in checkpoints.iter().enumerate() {
        ensure!(name.trim() == name, "untrimmed checkpoint {name:?}");
        ensure!(!name.is_empty(), "blank checkpoint stored");
        ensure!(
            !checkpoints[i + 1..].contains(name),
            "duplicate checkpoint {name:?}"
        );
    }
    Ok(())
}

fn season_buckets(ctx: &ScenarioCtx) -> Result<()> {
    let mut rng = ctx.rng();
    let jan_first = NaiveDate::from_ymd_opt(ctx.today.year(), 1, 1).context("bad year")?;
    for _ in 0..32 {
        let date = jan_first
            .checked_add_days(Days::new(rng.gen_range(0..365)))
            .context("date overflow")?;
        let expected = match date.month() {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        };
        let season = Season::for_date(date);
        ensure!(season == expected, "{date} mapped to {season:?}");
        let card = season_card(Some(date)).context("no season card")?;
        ensure!(card.season == season, "card season mismatch for {date}");
    }
    Ok(())
}

fn day_cards(ctx: &ScenarioCtx) -> Result<()> {
    let mut planner = ctx.ready_planner();
    planner.generate_offline()?;
    let store = planner.store();
    for index in 0..store.days().len() {
        let card = store.render_day(index).context("missing card")?;
        ensure!(card.badge == format!("D{}", index + 1), "badge {}", card.badge);
        ensure!(card.expanded == (index == 0), "day {index} expansion");
        ensure!(
            card.slots.windows(2).all(|w| w[0].period <= w[1].period),
            "day {index} slots out of order"
        );
        ensure!(
            card.slots.iter().all(|s| s.time == s.period.time_label()),
            "time label mismatch"
        );
    }
    Ok(())
}

fn reset_supersedes(ctx: &ScenarioCtx) -> Result<()> {
    let mut planner = ctx.ready_planner();
    let pending = planner.begin_generation(false)?;
    ensure!(planner.loader().is_visible(), "loader hidden while pending");
    planner.dispatch(Action::Reset);
    match planner.complete_generation(pending, Ok(PlanResponse::default())) {
        Err(GenerateError::Superseded { .. }) => {}
        other => bail!("stale reply not dropped: {other:?}"),
    }
    ensure!(planner.store().is_empty(), "stale reply rendered");
    ensure!(planner.report().is_none(), "stale report kept");
    Ok(())
}
