//! Checks against a running itinerary service.
use anyhow::{Context, Result, ensure};
use navisense_planner::{PlanSource, PlanTransport, PlannerConfig};

use super::ScenarioCtx;

pub const DESCRIPTION: &str = "Generate and regenerate against the live itinerary service";

/// Generate, inspect the rendered report, then regenerate.
pub async fn generate_and_regenerate(
    transport: &dyn PlanTransport,
    config: &PlannerConfig,
    ctx: &ScenarioCtx,
) -> Result<()> {
    let mut planner = ctx.ready_planner().with_config(config.clone());
    let request = planner.build_request()?;

    let count = planner
        .generate(transport)
        .await
        .with_context(|| format!("generate {} -> {}", request.origin, request.destination))?;
    ensure!(
        count == planner.store().activity_count(),
        "reported {count} activities, store holds {}",
        planner.store().activity_count()
    );
    ensure!(!planner.loader().is_visible(), "loader still visible");
    ensure!(planner.notice().is_none(), "unexpected notice");

    let report = planner.report().context("no report after generation")?;
    ensure!(report.source == PlanSource::Service, "wrong plan source");
    ensure!(report.request == request, "report request differs from sent");
    let line_sum: u64 = report.budget.lines.iter().map(|l| l.amount).sum();
    ensure!(
        report.budget.total == line_sum,
        "budget total {} != line sum {line_sum}",
        report.budget.total
    );
    ensure!(!report.tips.is_empty(), "no tips rendered");
    if let Some(first) = planner.store().days().first() {
        ensure!(first.title.starts_with("Day 1"), "first day titled {:?}", first.title);
        ensure!(planner.store().is_expanded(0), "first day collapsed");
    }

    let generation = planner.generation();
    planner
        .regenerate(transport)
        .await
        .context("regenerate")?;
    ensure!(
        planner.generation() == generation + 1,
        "regeneration did not issue a new ticket"
    );
    if ctx.verbose {
        log::info!(
            "service returned {} days ({} activities, cached: {})",
            planner.store().days().len(),
            planner.store().activity_count(),
            planner.report().is_some_and(|r| r.cached)
        );
    }
    Ok(())
}
