//! The race circuit: a rolling schedule of races, the player's results
//! history, and the reputation that unlocks higher tiers.
//!
//! The circuit owns its races. Entering and running go through it so that
//! results land in the history, which drives reputation. Tiers only unlock;
//! a reputation slump never takes one away.
mod catalog;
mod config;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::calendar::GameDate;
use crate::horse::{Horse, HorseId};
use crate::names::generate_id;
use crate::race::{
    EntryError, EntryReport, Race, RaceKind, RaceResult, RaceSummary, RunError, Tier,
    add_entrant, check_eligibility,
};
use crate::rng::{chance, pick, roll_unit};

pub use catalog::{CatalogError, RaceCatalog, RaceTemplate};
pub use config::{CircuitConfig, CircuitConfigError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    #[error("Race not found: {id}")]
    RaceNotFound { id: String },
    #[error(transparent)]
    Entry(#[from] EntryError),
    #[error(transparent)]
    Run(#[from] RunError),
}

/// One run race as remembered by the circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub race_id: String,
    pub race_name: String,
    pub date: Option<GameDate>,
    /// Kept here so reputation does not depend on the race still being scheduled.
    pub tier: Tier,
    pub results: Vec<RaceResult>,
    pub player_results: Vec<RaceResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorseHistoryEntry {
    pub race_id: String,
    pub race_name: String,
    pub date: Option<GameDate>,
    pub tier: Tier,
    pub position: u32,
    pub prize: u64,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReport {
    /// Written as the envelope's `message` by [`crate::Outcome`].
    #[serde(skip)]
    pub message: String,
    pub added_races: usize,
    pub scheduled_days: u32,
    pub races: usize,
    pub reputation: u32,
    pub unlocked_tiers: Vec<Tier>,
}

/// Relative share of the daily card before normalizing over unlocked tiers.
const fn schedule_weight(tier: Tier) -> f64 {
    match tier {
        Tier::Low => 0.5,
        Tier::Medium => 0.3,
        Tier::High => 0.15,
        Tier::Elite => 0.05,
    }
}

const fn position_points(position: u32) -> u32 {
    match position {
        1 => 10,
        2 => 5,
        3 => 3,
        4 => 1,
        _ => 0,
    }
}

/// Extra reputation for a top-three finish.
const fn podium_bonus(tier: Tier) -> u32 {
    match tier {
        Tier::Low => 0,
        Tier::Medium => 2,
        Tier::High => 5,
        Tier::Elite => 10,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    date: GameDate,
    races: Vec<Race>,
    reputation: u32,
    unlocked_tiers: Vec<Tier>,
    history: Vec<HistoryEntry>,
    player_horse_ids: Vec<HorseId>,
    #[serde(default)]
    config: CircuitConfig,
    #[serde(skip, default = "RaceCatalog::bundled")]
    catalog: RaceCatalog,
}

impl Circuit {
    /// Empty circuit on `date` with the bundled catalog and default tuning.
    #[must_use]
    pub fn new(date: GameDate) -> Self {
        Self {
            date,
            races: Vec::new(),
            reputation: 0,
            unlocked_tiers: vec![Tier::Low],
            history: Vec::new(),
            player_horse_ids: Vec::new(),
            config: CircuitConfig::default(),
            catalog: RaceCatalog::bundled(),
        }
    }

    /// # Errors
    ///
    /// Returns the first configuration violation; see [`CircuitConfig::validate`].
    pub fn with_config(
        date: GameDate,
        config: CircuitConfig,
        catalog: RaceCatalog,
    ) -> Result<Self, CircuitConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            catalog,
            ..Self::new(date)
        })
    }

    #[must_use]
    pub const fn date(&self) -> GameDate {
        self.date
    }

    #[must_use]
    pub const fn reputation(&self) -> u32 {
        self.reputation
    }

    #[must_use]
    pub fn unlocked_tiers(&self) -> &[Tier] {
        &self.unlocked_tiers
    }

    #[must_use]
    pub fn is_unlocked(&self, tier: Tier) -> bool {
        self.unlocked_tiers.contains(&tier)
    }

    #[must_use]
    pub fn races(&self) -> &[Race] {
        &self.races
    }

    /// Newest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    #[must_use]
    pub fn player_horse_ids(&self) -> &[HorseId] {
        &self.player_horse_ids
    }

    #[must_use]
    pub const fn config(&self) -> &CircuitConfig {
        &self.config
    }

    #[must_use]
    pub fn race(&self, id: &str) -> Option<&Race> {
        self.races.iter().find(|r| r.id == id)
    }

    pub fn race_mut(&mut self, id: &str) -> Option<&mut Race> {
        self.races.iter_mut().find(|r| r.id == id)
    }

    /// Weighted tier draw over the unlocked tiers.
    pub fn select_tier<R>(&self, rng: &mut R) -> Tier
    where
        R: Rng + ?Sized,
    {
        let total: f64 = self
            .unlocked_tiers
            .iter()
            .map(|t| schedule_weight(*t))
            .sum();
        if total <= 0.0 {
            return Tier::Low;
        }
        let mut roll = roll_unit(rng) * total;
        for tier in &self.unlocked_tiers {
            let weight = schedule_weight(*tier);
            if roll < weight {
                return *tier;
            }
            roll -= weight;
        }
        self.unlocked_tiers.last().copied().unwrap_or(Tier::Low)
    }

    /// A fresh card for `date`; does not touch the schedule.
    pub fn generate_races_for_day<R>(&self, date: GameDate, rng: &mut R) -> Vec<Race>
    where
        R: Rng + ?Sized,
    {
        let weekend = date.is_weekend();
        let count = if weekend {
            self.config.weekend_races
        } else {
            self.config.weekday_races
        };

        let mut races = Vec::new();
        for _ in 0..count {
            let tier = self.select_tier(rng);
            let kind = if chance(rng, self.config.jump_chance) {
                RaceKind::Jump
            } else {
                RaceKind::Flat
            };
            let options = self.catalog.templates_for(tier, kind);
            let Some(template) = pick(rng, &options) else {
                log::debug!("no {tier} {kind:?} template; slot left empty on {date}");
                continue;
            };
            races.push(template.instantiate(generate_id(rng, "race"), date, false, rng));
        }

        if weekend
            && chance(rng, self.config.special_chance)
            && let Some(special) = self.special_race(date, rng)
        {
            races.push(special);
        }
        log::debug!("{date}: {} races on the card", races.len());
        races
    }

    /// Special race of a random unlocked tier above low, or the low special.
    pub fn special_race<R>(&self, date: GameDate, rng: &mut R) -> Option<Race>
    where
        R: Rng + ?Sized,
    {
        let higher: Vec<Tier> = self
            .unlocked_tiers
            .iter()
            .copied()
            .filter(|t| *t > Tier::Low)
            .collect();
        let tier = pick(rng, &higher).copied().unwrap_or(Tier::Low);
        let template = self
            .catalog
            .special_for(tier)
            .or_else(|| self.catalog.special_for(Tier::Low))?;
        Some(template.instantiate(generate_id(rng, "race"), date, true, rng))
    }

    /// Drop every unrun race and schedule `days` consecutive days from today.
    /// Returns the number of races added.
    pub fn generate_schedule<R>(&mut self, days: u32, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        self.races.retain(|race| race.has_run);
        let added = self.schedule_from(self.date, days, rng);
        log::info!("scheduled {added} races over {days} days from {}", self.date);
        added
    }

    fn schedule_from<R>(&mut self, start: GameDate, days: u32, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        let mut added = 0;
        for offset in 0..days {
            let card = self.generate_races_for_day(start.plus_days(offset), rng);
            added += card.len();
            self.races.extend(card);
        }
        added
    }

    /// Distinct days that still have an unrun race.
    #[must_use]
    pub fn scheduled_days(&self) -> u32 {
        let days: BTreeSet<GameDate> = self
            .races
            .iter()
            .filter(|r| !r.has_run)
            .filter_map(|r| r.schedule_day)
            .collect();
        u32::try_from(days.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn races_for_day(&self, date: GameDate) -> Vec<&Race> {
        self.races
            .iter()
            .filter(|r| r.schedule_day == Some(date))
            .collect()
    }

    /// Upcoming, open races the horse could enter right now.
    #[must_use]
    pub fn eligible_races(&self, horse: &Horse) -> Vec<&Race> {
        self.races
            .iter()
            .filter(|r| !r.has_run && !r.is_full() && !r.is_entered(&horse.id))
            .filter(|r| r.schedule_day.is_none_or(|day| day >= self.date))
            .filter(|r| check_eligibility(r, horse).is_eligible)
            .collect()
    }

    fn find_race_mut(&mut self, id: &str) -> Result<&mut Race, CircuitError> {
        self.races.iter_mut().find(|r| r.id == id).ok_or_else(|| {
            log::warn!("race {id} is not on the schedule");
            CircuitError::RaceNotFound { id: id.to_string() }
        })
    }

    /// Enter a player horse and remember it as player-owned.
    ///
    /// # Errors
    ///
    /// [`CircuitError::RaceNotFound`] for an unknown id, otherwise any
    /// [`EntryError`] from the race.
    pub fn enter_horse<R>(
        &mut self,
        race_id: &str,
        horse: &Horse,
        jockey: impl Into<String>,
        rng: &mut R,
    ) -> Result<EntryReport, CircuitError>
    where
        R: Rng + ?Sized,
    {
        let race = self.find_race_mut(race_id)?;
        let report = add_entrant(race, horse, jockey, rng)?;
        if !self.player_horse_ids.contains(&horse.id) {
            self.player_horse_ids.push(horse.id.clone());
        }
        Ok(report)
    }

    /// Run a scheduled race, file it in the history and refresh reputation.
    ///
    /// # Errors
    ///
    /// [`CircuitError::RaceNotFound`] for an unknown id, otherwise any
    /// [`RunError`] from the race.
    pub fn run_race<R>(
        &mut self,
        race_id: &str,
        player: Option<&Horse>,
        rng: &mut R,
    ) -> Result<RaceSummary, CircuitError>
    where
        R: Rng + ?Sized,
    {
        let race = self.find_race_mut(race_id)?;
        let summary = crate::race::run_race(race, player, rng)?;
        let entry = HistoryEntry {
            race_id: race.id.clone(),
            race_name: race.name.clone(),
            date: race.schedule_day,
            tier: race.tier,
            player_results: summary
                .results
                .iter()
                .filter(|r| r.player_owned || self.player_horse_ids.contains(&r.horse_id))
                .cloned()
                .collect(),
            results: summary.results.clone(),
        };
        self.record_history(entry);
        self.calculate_reputation();
        Ok(summary)
    }

    /// Push to the front of the history, dropping the oldest past the cap.
    pub fn record_history(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
        self.history.truncate(self.config.max_history);
    }

    /// Recompute reputation from the most recent results, then unlock tiers.
    pub fn calculate_reputation(&mut self) -> u32 {
        let points = self
            .history
            .iter()
            .take(self.config.reputation_window)
            .flat_map(|entry| {
                entry.player_results.iter().map(|result| {
                    let bonus = if result.position <= 3 {
                        podium_bonus(entry.tier)
                    } else {
                        0
                    };
                    position_points(result.position) + bonus
                })
            })
            .fold(0_u32, u32::saturating_add);
        self.reputation = points;
        self.unlock_tiers();
        points
    }

    /// Unlock every tier whose threshold the current reputation meets.
    pub fn unlock_tiers(&mut self) -> Vec<Tier> {
        let mut unlocked = Vec::new();
        for tier in Tier::ALL {
            if !self.is_unlocked(tier) && self.reputation >= self.config.unlock_threshold(tier) {
                self.unlocked_tiers.push(tier);
                unlocked.push(tier);
                log::info!("{tier} races unlocked at reputation {}", self.reputation);
            }
        }
        self.unlocked_tiers.sort();
        unlocked
    }

    /// Move to `date`, clear out past days and keep the schedule horizon full.
    pub fn update<R>(&mut self, date: GameDate, rng: &mut R) -> UpdateReport
    where
        R: Rng + ?Sized,
    {
        self.date = date;
        self.races
            .retain(|race| race.schedule_day.is_none_or(|day| day >= date));

        let scheduled = self.scheduled_days();
        let horizon = self.config.schedule_days;
        let mut added = 0;
        if scheduled < horizon {
            let start = self
                .races
                .iter()
                .filter_map(|r| r.schedule_day)
                .max()
                .map_or(date, |last| last.plus_days(1));
            added = self.schedule_from(start, horizon - scheduled, rng);
            log::debug!("topped up {added} races from {start}");
        }

        UpdateReport {
            message: String::from("Race circuit updated"),
            added_races: added,
            scheduled_days: self.scheduled_days(),
            races: self.races.len(),
            reputation: self.reputation,
            unlocked_tiers: self.unlocked_tiers.clone(),
        }
    }

    /// The horse's most recent finishes, newest first.
    #[must_use]
    pub fn horse_history(&self, horse_id: &HorseId, limit: usize) -> Vec<HorseHistoryEntry> {
        self.history
            .iter()
            .filter_map(|entry| {
                let result = entry.results.iter().find(|r| &r.horse_id == horse_id)?;
                Some(HorseHistoryEntry {
                    race_id: entry.race_id.clone(),
                    race_name: entry.race_name.clone(),
                    date: entry.date,
                    tier: entry.tier,
                    position: result.position,
                    prize: result.prize,
                    time: result.formatted_time.clone(),
                })
            })
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horse::{Breed, Gender, InjuryOutcome};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::rngs::mock::StepRng;

    fn monday() -> GameDate {
        GameDate::new(1, 1, 2023)
    }

    fn result(horse: &str, position: u32) -> RaceResult {
        RaceResult {
            entrant_index: 0,
            horse_id: HorseId::new(horse),
            horse_name: horse.to_string(),
            jockey_name: "J".into(),
            player_owned: true,
            odds: 3.0,
            score: 50.0,
            time: 120.0,
            formatted_time: "2:00.00".into(),
            energy_used: 20,
            injury: InjuryOutcome::none(),
            experience: 10,
            position,
            prize: 0,
        }
    }

    fn entry(id: &str, tier: Tier, position: u32) -> HistoryEntry {
        let results = vec![result("mine", position)];
        HistoryEntry {
            race_id: id.to_string(),
            race_name: id.to_string(),
            date: Some(monday()),
            tier,
            player_results: results.clone(),
            results,
        }
    }

    #[test]
    fn minimum_draws_fill_a_weekday_with_low_jumps() {
        let circuit = Circuit::new(monday());
        let mut rng = StepRng::new(0, 0);
        let card = circuit.generate_races_for_day(monday(), &mut rng);
        assert_eq!(card.len(), 3);
        assert!(card.iter().all(|r| r.name == "Beginner's Hurdle"));
        assert!(card.iter().all(|r| r.schedule_day == Some(monday())));
    }

    #[test]
    fn weekend_adds_low_special_when_nothing_else_is_unlocked() {
        let circuit = Circuit::new(monday());
        let saturday = GameDate::new(6, 1, 2023);
        let mut rng = StepRng::new(0, 0);
        let card = circuit.generate_races_for_day(saturday, &mut rng);
        assert_eq!(card.len(), 6);
        let special = card.last().unwrap();
        assert!(special.is_special);
        assert_eq!(special.name, "Newcomer's Special");
        assert_eq!(special.tier, Tier::Low);
    }

    #[test]
    fn schedule_only_uses_unlocked_tiers() {
        let mut circuit = Circuit::new(monday());
        let mut rng = SmallRng::seed_from_u64(21);
        circuit.generate_schedule(14, &mut rng);
        assert_eq!(circuit.scheduled_days(), 14);
        assert!(circuit.races().iter().all(|r| r.tier == Tier::Low));

        circuit.reputation = 120;
        circuit.unlock_tiers();
        circuit.generate_schedule(28, &mut rng);
        assert!(circuit.races().iter().all(|r| r.tier <= Tier::High));
        assert!(circuit.races().iter().any(|r| r.tier == Tier::High));
    }

    #[test]
    fn tier_draw_favors_low() {
        let mut circuit = Circuit::new(monday());
        circuit.reputation = 400;
        assert_eq!(circuit.unlock_tiers(), Tier::ALL[1..].to_vec());
        let mut rng = SmallRng::seed_from_u64(5);
        let mut counts = [0_u32; 4];
        for _ in 0..4000 {
            let tier = circuit.select_tier(&mut rng);
            let idx = Tier::ALL.iter().position(|t| *t == tier).unwrap();
            counts[idx] += 1;
        }
        assert!(counts.iter().all(|c| *c > 0));
        assert!(counts[0] > counts[1] && counts[1] > counts[2] && counts[2] > counts[3]);
    }

    #[test]
    fn regenerating_keeps_run_races_only() {
        let mut circuit = Circuit::new(monday());
        let mut rng = SmallRng::seed_from_u64(2);
        circuit.generate_schedule(2, &mut rng);
        let first_id = circuit.races()[0].id.clone();
        circuit.race_mut(&first_id).unwrap().has_run = true;
        circuit.generate_schedule(1, &mut rng);
        assert!(circuit.race(&first_id).is_some());
        assert_eq!(circuit.races().iter().filter(|r| r.has_run).count(), 1);
        assert_eq!(circuit.scheduled_days(), 1);
    }

    #[test]
    fn reputation_scores_recent_player_results() {
        let mut circuit = Circuit::new(monday());
        circuit.record_history(entry("a", Tier::Medium, 1)); // 10 + 2
        circuit.record_history(entry("b", Tier::Elite, 3)); // 3 + 10
        circuit.record_history(entry("c", Tier::Low, 4)); // 1
        circuit.record_history(entry("d", Tier::High, 5)); // 0
        assert_eq!(circuit.calculate_reputation(), 26);
        assert!(!circuit.is_unlocked(Tier::Medium));

        circuit.record_history(entry("e", Tier::Low, 1));
        assert_eq!(circuit.calculate_reputation(), 36);
        assert_eq!(circuit.unlocked_tiers(), &[Tier::Low, Tier::Medium]);

        // A run of unplaced finishes pushes the good results out of the window.
        for n in 0..20 {
            circuit.record_history(entry(&format!("slump-{n}"), Tier::Low, 8));
        }
        assert_eq!(circuit.calculate_reputation(), 0);
        assert!(circuit.is_unlocked(Tier::Medium));
    }

    #[test]
    fn history_is_newest_first_and_capped() {
        let mut circuit = Circuit::new(monday());
        for n in 0..55 {
            circuit.record_history(entry(&format!("r{n}"), Tier::Low, 2));
        }
        assert_eq!(circuit.history().len(), 50);
        assert_eq!(circuit.history()[0].race_id, "r54");
        assert_eq!(circuit.history()[49].race_id, "r5");

        let recent = circuit.horse_history(&HorseId::new("mine"), 3);
        let ids: Vec<&str> = recent.iter().map(|h| h.race_id.as_str()).collect();
        assert_eq!(ids, vec!["r54", "r53", "r52"]);
        assert!(circuit.horse_history(&HorseId::new("other"), 3).is_empty());
    }

    #[test]
    fn enter_and_run_through_the_circuit() {
        let mut circuit = Circuit::new(monday());
        let mut rng = SmallRng::seed_from_u64(11);
        circuit.update(monday(), &mut rng);
        let horse = Horse::new(HorseId::new("mine"), "Mine", Gender::Female, Breed::Arabian);
        let race_id = circuit.eligible_races(&horse)[0].id.clone();

        assert_eq!(
            circuit.enter_horse("missing", &horse, "Jo", &mut rng),
            Err(CircuitError::RaceNotFound {
                id: "missing".into()
            })
        );
        circuit.enter_horse(&race_id, &horse, "Jo", &mut rng).unwrap();
        assert_eq!(circuit.player_horse_ids(), &[horse.id.clone()]);
        assert!(circuit.eligible_races(&horse).iter().all(|r| r.id != race_id));

        let summary = circuit.run_race(&race_id, Some(&horse), &mut rng).unwrap();
        let position = summary.player_result.as_ref().unwrap().position;
        assert_eq!(circuit.history().len(), 1);
        assert_eq!(circuit.history()[0].player_results.len(), 1);
        assert_eq!(circuit.reputation(), position_points(position));

        assert_eq!(
            circuit.run_race(&race_id, Some(&horse), &mut rng),
            Err(CircuitError::Run(RunError::AlreadyRun))
        );
        assert_eq!(circuit.history().len(), 1);
    }

    #[test]
    fn update_keeps_a_rolling_week() {
        let mut circuit = Circuit::new(monday());
        let mut rng = SmallRng::seed_from_u64(3);
        let report = circuit.update(monday(), &mut rng);
        assert_eq!(report.scheduled_days, 7);
        assert!(report.added_races >= 21);

        let tomorrow = monday().plus_days(1);
        let report = circuit.update(tomorrow, &mut rng);
        assert_eq!(report.scheduled_days, 7);
        assert!(circuit.races_for_day(monday()).is_empty());
        assert!(!circuit.races_for_day(tomorrow.plus_days(6)).is_empty());
        assert!(
            circuit
                .races()
                .iter()
                .all(|r| r.schedule_day.is_some_and(|d| d >= tomorrow))
        );
    }

    #[test]
    fn custom_config_is_validated() {
        let bad = CircuitConfig {
            weekday_races: 0,
            ..CircuitConfig::default()
        };
        assert!(Circuit::with_config(monday(), bad, RaceCatalog::bundled()).is_err());

        let busy = CircuitConfig {
            weekday_races: 4,
            ..CircuitConfig::default()
        };
        let circuit = Circuit::with_config(monday(), busy, RaceCatalog::bundled()).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(circuit.generate_races_for_day(monday(), &mut rng).len(), 4);
    }

    #[test]
    fn circuit_state_round_trips() {
        let mut circuit = Circuit::new(monday());
        let mut rng = SmallRng::seed_from_u64(8);
        circuit.update(monday(), &mut rng);
        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
