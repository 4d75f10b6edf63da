use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::scenarios::Scenario;
use super::season::{SeasonMetrics, play_season};

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
    #[serde(skip)]
    pub last_metrics: Option<SeasonMetrics>,
}

pub struct LogicTester {
    verbose: bool,
    days_override: Option<u32>,
}

impl LogicTester {
    pub const fn new(verbose: bool) -> Self {
        Self {
            verbose,
            days_override: None,
        }
    }

    /// Play every season for `days` days instead of the scenario's length.
    #[must_use]
    pub const fn with_days(mut self, days: Option<u32>) -> Self {
        self.days_override = days;
        self
    }

    pub fn run_scenario(
        &self,
        scenario: &Scenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (seed: {seed}, iterations: {iterations})",
                        scenario.name.bright_white()
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &Scenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut plan = scenario.plan;
        if let Some(days) = self.days_override {
            plan.days = days;
        }

        let mut successes = 0;
        let mut failures = Vec::new();
        let mut durations = Vec::with_capacity(iterations);
        let mut last_metrics = None;

        for i in 0..iterations {
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let start_time = Instant::now();
            let summary = play_season(&plan, iteration_seed);
            let outcome = scenario.evaluate(&summary);
            let duration = start_time.elapsed();
            durations.push(duration);

            match outcome {
                Some(err) => {
                    log::warn!("{} seed {iteration_seed}: {err}", scenario.key);
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{iterations} failed: {}",
                            i + 1,
                            err.clone().red()
                        );
                    }
                    failures.push(format!(
                        "Iteration {} (seed {iteration_seed}, days {}, races {}, reputation {}): {err}",
                        i + 1,
                        summary.metrics.days_played,
                        summary.metrics.races_run,
                        summary.metrics.reputation,
                    ));
                }
                None => {
                    successes += 1;
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{iterations} passed ({duration:?}) races:{} wins:{} prizes:{} foals:{}",
                            i + 1,
                            summary.metrics.races_run,
                            summary.metrics.wins,
                            summary.metrics.prizes,
                            summary.metrics.foals
                        );
                    }
                }
            }
            last_metrics = Some(summary.metrics);
        }

        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration: average(&durations),
            last_metrics,
        }
    }
}

fn average(durations: &[Duration]) -> Duration {
    if durations.is_empty() {
        return Duration::ZERO;
    }
    durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(u32::MAX)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::scenarios::find_scenario;

    #[test]
    fn runs_one_result_per_seed() {
        let scenario = find_scenario("smoke").unwrap();
        let tester = LogicTester::new(false).with_days(Some(5));
        let results = tester.run_scenario(&scenario, &[1, 2, 3], 2);
        assert_eq!(results.len(), 3);
        for (result, seed) in results.iter().zip([1, 2, 3]) {
            assert_eq!(result.seed, seed);
            assert_eq!(result.iterations_run, 2);
            assert_eq!(result.scenario_name, "Smoke Test");
            assert_eq!(result.last_metrics.as_ref().unwrap().days_played, 5);
        }
    }

    #[test]
    fn zero_iterations_pass_vacuously() {
        let scenario = find_scenario("smoke").unwrap();
        let result = LogicTester::new(false).run_single_scenario(&scenario, 9, 0);
        assert!(result.passed);
        assert_eq!(result.average_duration, Duration::ZERO);
        assert!(result.last_metrics.is_none());
    }

    #[test]
    fn result_serializes_duration_as_millis() {
        let result = ScenarioResult {
            scenario_name: "Smoke Test".into(),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
            last_metrics: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 12);
        assert!(json.get("last_metrics").is_none());
    }
}
