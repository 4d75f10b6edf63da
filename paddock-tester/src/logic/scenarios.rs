use anyhow::{Result, ensure};
use paddock_game::{GameDate, Horse, Intensity, Stat, Tier, market_horses, sale_value};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

use super::season::{SeasonPlan, SeasonSummary, play_season};

/// Check run against a finished season.
pub type Expectation = fn(&SeasonSummary) -> Result<()>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("Unknown scenario: {key} (try --list-scenarios)")]
    Unknown { key: String },
}

#[derive(Clone)]
pub struct Scenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub plan: SeasonPlan,
    pub expectations: Vec<Expectation>,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("key", &self.key)
            .field("plan", &self.plan)
            .field("expectations", &self.expectations.len())
            .finish()
    }
}

impl Scenario {
    fn new(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        plan: SeasonPlan,
    ) -> Self {
        Self {
            key,
            name,
            description,
            plan,
            expectations: vec![bounds_hold],
        }
    }

    fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// First failing expectation, if any.
    #[must_use]
    pub fn evaluate(&self, summary: &SeasonSummary) -> Option<String> {
        self.expectations
            .iter()
            .find_map(|expectation| expectation(summary).err())
            .map(|err| err.to_string())
    }
}

#[must_use]
pub fn catalog() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "smoke",
            "Smoke Test",
            "Two weeks with the starter horse",
            SeasonPlan::default().with_days(14),
        )
        .with_expectation(schedule_stays_full)
        .with_expectation(books_balance),
        Scenario::new(
            "season",
            "Racing Season",
            "Four months racing a two-horse stable",
            SeasonPlan::default().with_stable_size(2),
        )
        .with_expectation(books_balance)
        .with_expectation(raced_at_least_once)
        .with_expectation(history_is_capped_newest_first),
        Scenario::new(
            "breeding",
            "Breeding Program",
            "Half a year breeding a mare whenever her cooldown allows",
            SeasonPlan::default().with_days(180).with_breeding(),
        )
        .with_expectation(produced_a_foal)
        .with_expectation(foals_respect_stat_floor)
        .with_expectation(dam_cooldown_respected),
        Scenario::new(
            "circuit",
            "Circuit Progression",
            "A long season with hard training to chase tier unlocks",
            SeasonPlan::default()
                .with_days(240)
                .with_stable_size(3)
                .with_intensity(Intensity::Intense),
        )
        .with_expectation(tiers_unlock_in_order)
        .with_expectation(reputation_matches_history)
        .with_expectation(history_is_capped_newest_first),
        Scenario::new(
            "determinism",
            "Deterministic Replay",
            "Replays each seed and compares the serialized state",
            SeasonPlan::default().with_days(45).with_stable_size(2),
        )
        .with_expectation(replays_identically),
        Scenario::new(
            "market",
            "Market Listings",
            "Lists horses against the season's final rating",
            SeasonPlan::default().with_days(30),
        )
        .with_expectation(market_listings_are_priced),
    ]
}

/// # Errors
///
/// Returns [`ScenarioError::Unknown`] for keys not in the catalog.
pub fn find_scenario(key: &str) -> Result<Scenario, ScenarioError> {
    catalog()
        .into_iter()
        .find(|scenario| scenario.key == key)
        .ok_or_else(|| ScenarioError::Unknown {
            key: key.to_string(),
        })
}

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

fn bounds_hold(summary: &SeasonSummary) -> Result<()> {
    ensure!(
        summary.violations.is_empty(),
        "{} violation(s), first: {}",
        summary.violations.len(),
        summary.violations.first().map_or("", String::as_str)
    );
    for horse in summary.stable.iter().chain(&summary.foals) {
        ensure!(horse.within_bounds(), "{} is out of bounds", horse.name);
    }
    ensure!(
        summary.end == summary.start.plus_days(summary.metrics.days_played),
        "season ended on {} after {} days",
        summary.end,
        summary.metrics.days_played
    );
    Ok(())
}

fn schedule_stays_full(summary: &SeasonSummary) -> Result<()> {
    let circuit = &summary.circuit;
    let days = circuit.scheduled_days();
    ensure!(
        days == circuit.config().schedule_days,
        "expected {} scheduled days, found {days}",
        circuit.config().schedule_days
    );
    let today = circuit.date();
    for race in circuit.races() {
        ensure!(
            race.has_run || race.schedule_day.is_none_or(|d| d >= today),
            "unrun race {} is dated in the past",
            race.id
        );
    }
    Ok(())
}

fn books_balance(summary: &SeasonSummary) -> Result<()> {
    for horse in &summary.stable {
        let paid: u64 = horse.races.iter().map(|r| r.prize).sum();
        ensure!(
            horse.earnings == paid,
            "{} earned {} but records sum to {paid}",
            horse.name,
            horse.earnings
        );
        let wins = horse.races.iter().filter(|r| r.position == 1).count();
        ensure!(
            horse.races_won as usize == wins,
            "{} has {} wins recorded against {wins} first places",
            horse.name,
            horse.races_won
        );
    }
    let total: u64 = summary.stable.iter().map(|h| h.earnings).sum();
    ensure!(
        total == summary.metrics.prizes,
        "stable earned {total} but races paid {}",
        summary.metrics.prizes
    );
    Ok(())
}

fn raced_at_least_once(summary: &SeasonSummary) -> Result<()> {
    ensure!(
        summary.metrics.races_run > 0,
        "no race entered in {} days",
        summary.metrics.days_played
    );
    Ok(())
}

fn history_is_capped_newest_first(summary: &SeasonSummary) -> Result<()> {
    let circuit = &summary.circuit;
    let history = circuit.history();
    ensure!(
        history.len() <= circuit.config().max_history,
        "history holds {} entries",
        history.len()
    );
    ensure!(
        history.windows(2).all(|w| w[0].date >= w[1].date),
        "history is not newest first"
    );
    let expected = summary.metrics.races_run.min(circuit.config().max_history);
    ensure!(
        history.len() == expected,
        "history holds {} entries for {} races",
        history.len(),
        summary.metrics.races_run
    );
    Ok(())
}

fn produced_a_foal(summary: &SeasonSummary) -> Result<()> {
    ensure!(!summary.foals.is_empty(), "no foal in {} days", summary.metrics.days_played);
    ensure!(summary.foals.len() == summary.breedings.len(), "foal count mismatch");
    Ok(())
}

fn foals_respect_stat_floor(summary: &SeasonSummary) -> Result<()> {
    for foal in &summary.foals {
        for stat in Stat::ALL {
            let value = foal.stats.get(stat);
            ensure!(
                (10..=100).contains(&value),
                "{} has {stat} {value}",
                foal.name
            );
        }
        ensure!(foal.age == 0, "{} was born aged {}", foal.name, foal.age);
    }
    Ok(())
}

fn dam_cooldown_respected(summary: &SeasonSummary) -> Result<()> {
    for (idx, later) in summary.breedings.iter().enumerate() {
        let previous = summary.breedings[..idx]
            .iter()
            .rev()
            .find(|b| b.dam == later.dam);
        if let Some(previous) = previous {
            let gap = later.date.days_since(&previous.date);
            ensure!(gap >= 30, "dam {} bred again after {gap} days", later.dam.as_str());
        }
    }
    Ok(())
}

fn tiers_unlock_in_order(summary: &SeasonSummary) -> Result<()> {
    let circuit = &summary.circuit;
    let unlocked = circuit.unlocked_tiers();
    ensure!(
        unlocked == &Tier::ALL[..unlocked.len()],
        "unlocked tiers out of order: {unlocked:?}"
    );
    let config = circuit.config();
    for tier in Tier::ALL {
        if circuit.reputation() >= config.unlock_threshold(tier) {
            ensure!(
                circuit.is_unlocked(tier),
                "{tier:?} locked at reputation {}",
                circuit.reputation()
            );
        }
    }
    Ok(())
}

fn reputation_matches_history(summary: &SeasonSummary) -> Result<()> {
    let mut replay = summary.circuit.clone();
    let recomputed = replay.calculate_reputation();
    ensure!(
        recomputed == summary.circuit.reputation(),
        "reputation {} but history scores {recomputed}",
        summary.circuit.reputation()
    );
    Ok(())
}

fn replays_identically(summary: &SeasonSummary) -> Result<()> {
    let replay = play_season(&summary.plan, summary.seed);
    ensure!(
        replay.metrics == summary.metrics,
        "metrics diverged on replay"
    );
    ensure!(
        replay.fingerprint()? == summary.fingerprint()?,
        "state diverged on replay"
    );
    Ok(())
}

fn market_listings_are_priced(summary: &SeasonSummary) -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(summary.seed);
    let today: GameDate = summary.end;
    let listings: Vec<Horse> = market_horses(8, summary.metrics.average_rating, today, &mut rng);
    ensure!(listings.len() == 8, "expected 8 listings");
    for horse in &listings {
        ensure!(horse.within_bounds(), "{} listed out of bounds", horse.name);
        ensure!(
            horse.sale_price == sale_value(horse),
            "{} listed at {} instead of {}",
            horse.name,
            horse.sale_price,
            sale_value(horse)
        );
        ensure!(horse.sale_price > 0, "{} listed for nothing", horse.name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keys_are_unique_and_listed() {
        let keys: Vec<&str> = catalog().iter().map(|s| s.key).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), keys.len());
        assert_eq!(list_scenarios().len(), keys.len());
    }

    #[test]
    fn unknown_scenario_is_reported() {
        let err = find_scenario("derby-day").unwrap_err();
        assert_eq!(
            err,
            ScenarioError::Unknown {
                key: "derby-day".into()
            }
        );
        assert!(err.to_string().contains("--list-scenarios"));
    }

    #[test]
    fn smoke_scenario_passes_for_default_seed() {
        let scenario = find_scenario("smoke").unwrap();
        let summary = play_season(&scenario.plan, 1337);
        assert_eq!(scenario.evaluate(&summary), None);
    }

    #[test]
    fn evaluate_reports_recorded_violations() {
        let scenario = find_scenario("smoke").unwrap();
        let mut summary = play_season(&scenario.plan.with_days(2), 5);
        summary.violations.push("day 1: Comet left its bounds".into());
        let failure = scenario.evaluate(&summary).unwrap();
        assert!(failure.contains("Comet left its bounds"));
    }

    #[test]
    fn tampered_earnings_break_the_books() {
        let mut summary = play_season(&SeasonPlan::default().with_days(3), 8);
        summary.stable[0].earnings += 1;
        assert!(books_balance(&summary).is_err());
    }
}
