use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use navisense_planner::{PlanTransport, PlannerConfig};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::scenario::{SERVICE_SCENARIO, ScenarioCtx, TestScenario, service};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

/// Runs offline scenarios against the planner core.
pub struct LogicTester {
    today: NaiveDate,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(today: NaiveDate, verbose: bool) -> Self {
        Self { today, verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (seed: {seed})",
                        scenario.name.bright_white()
                    );
                }
                let mut tally = Tally::new(self.verbose);
                for i in 0..iterations {
                    let ctx = ScenarioCtx {
                        seed: iteration_seed(seed, i),
                        today: self.today,
                        verbose: self.verbose,
                    };
                    let start = Instant::now();
                    let outcome = (scenario.check)(&ctx);
                    tally.record(i, iterations, ctx.seed, outcome, start.elapsed());
                }
                tally.into_result(scenario.name, seed, iterations)
            })
            .collect()
    }
}

/// Runs the live-service scenario through a transport.
pub struct ServiceTester<'a> {
    transport: &'a dyn PlanTransport,
    config: PlannerConfig,
    today: NaiveDate,
    verbose: bool,
}

impl<'a> ServiceTester<'a> {
    pub const fn new(
        transport: &'a dyn PlanTransport,
        config: PlannerConfig,
        today: NaiveDate,
        verbose: bool,
    ) -> Self {
        Self {
            transport,
            config,
            today,
            verbose,
        }
    }

    pub async fn run(&self, seeds: &[u64], iterations: usize) -> Vec<ScenarioResult> {
        let mut results = Vec::with_capacity(seeds.len());
        for &seed in seeds {
            if self.verbose {
                println!(
                    "🛰️  Testing scenario: {} (seed: {seed})",
                    SERVICE_SCENARIO.bright_white()
                );
            }
            let mut tally = Tally::new(self.verbose);
            for i in 0..iterations {
                let ctx = ScenarioCtx {
                    seed: iteration_seed(seed, i),
                    today: self.today,
                    verbose: self.verbose,
                };
                let start = Instant::now();
                let outcome =
                    service::generate_and_regenerate(self.transport, &self.config, &ctx).await;
                tally.record(i, iterations, ctx.seed, outcome, start.elapsed());
            }
            results.push(tally.into_result(SERVICE_SCENARIO, seed, iterations));
        }
        results
    }
}

fn iteration_seed(seed: u64, iteration: usize) -> u64 {
    seed.wrapping_add(u64::try_from(iteration).unwrap_or(u64::MAX))
}

struct Tally {
    verbose: bool,
    successes: usize,
    failures: Vec<String>,
    performance_data: Vec<Duration>,
}

impl Tally {
    const fn new(verbose: bool) -> Self {
        Self {
            verbose,
            successes: 0,
            failures: Vec::new(),
            performance_data: Vec::new(),
        }
    }

    fn record(
        &mut self,
        iteration: usize,
        iterations: usize,
        seed: u64,
        outcome: Result<()>,
        elapsed: Duration,
    ) {
        match outcome {
            Ok(()) => {
                self.successes += 1;
                self.performance_data.push(elapsed);
                if self.verbose {
                    println!(
                        "  ✅ Iteration {}/{iterations} passed ({elapsed:?})",
                        iteration + 1
                    );
                }
            }
            Err(err) => {
                let message = format!("Iteration {} (seed {seed}): {err:#}", iteration + 1);
                if self.verbose {
                    println!(
                        "  ❌ Iteration {}/{iterations} failed: {}",
                        iteration + 1,
                        format!("{err:#}").red()
                    );
                }
                self.failures.push(message);
            }
        }
    }

    fn into_result(self, scenario_name: &str, seed: u64, iterations: usize) -> ScenarioResult {
        let average_duration = if self.performance_data.is_empty() {
            Duration::ZERO
        } else {
            self.performance_data.iter().sum::<Duration>()
                / u32::try_from(self.performance_data.len()).unwrap_or(1)
        };
        ScenarioResult {
            scenario_name: scenario_name.to_string(),
            seed,
            passed: self.failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: self.successes,
            failures: self.failures,
            average_duration,
            performance_data: self.performance_data,
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::get_scenario;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn failing(_ctx: &ScenarioCtx) -> Result<()> {
        anyhow::bail!("always fails")
    }

    #[test]
    fn runs_one_result_per_seed() {
        let tester = LogicTester::new(today(), false);
        let smoke = get_scenario("smoke").unwrap();
        let results = tester.run_scenario(smoke, &[1, 2, 3], 2);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.passed));
        assert!(results.iter().all(|r| r.successful_iterations == 2));
        assert_eq!(results[1].seed, 2);
    }

    #[test]
    fn failures_carry_iteration_and_seed() {
        let scenario = TestScenario {
            key: "failing",
            name: "Failing",
            description: "",
            check: failing,
        };
        let results = LogicTester::new(today(), false).run_scenario(&scenario, &[10], 2);
        let result = &results[0];
        assert!(!result.passed);
        assert_eq!(result.successful_iterations, 0);
        assert_eq!(result.failures[1], "Iteration 2 (seed 11): always fails");
        assert_eq!(result.average_duration, Duration::ZERO);
    }

    #[test]
    fn durations_serialize_as_millis() {
        let result = ScenarioResult {
            scenario_name: "Smoke".to_string(),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
            performance_data: vec![Duration::from_millis(12)],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 12);
        assert_eq!(json["performance_data"][0], 12);
        let back: ScenarioResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.average_duration, Duration::from_millis(12));
    }

    #[test]
    fn iteration_seed_wraps() {
        assert_eq!(iteration_seed(u64::MAX, 1), 0);
    }
}
