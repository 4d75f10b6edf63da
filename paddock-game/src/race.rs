//! Single-race simulation: eligibility, odds, AI field, scoring and prizes.
//!
//! A race moves `Scheduled -> Entered -> Run` and never leaves `Run`. Odds are
//! frozen when an entrant is added; the AI field is topped up when the race
//! is run. Finishing order is a stable sort by descending score, so exact
//! ties keep entrant order.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::attributes::{DEFAULT_PLAYER_RATING, DistanceFit, distance_fit, overall_rating};
use crate::calendar::GameDate;
use crate::constants::{
    AI_ODDS_MIN, AI_QUALITY_MAX, AI_QUALITY_MIN, AI_SCORE_PER_ODDS, DEFAULT_MAX_ENTRANTS,
    DEFAULT_PRIZE_SHARES, INJURY_BASE_CHANCE, INJURY_LOW_ENERGY, ODDS_MAX,
    PERFORMANCE_LUCK_MAX, PERFORMANCE_LUCK_MIN, PERFORMANCE_RATING_SCALE, PLAYER_ODDS_MIN,
    RACE_MIN_HEALTH,
};
use crate::horse::{Breed, Distance, Gender, Horse, HorseId, InjuryOutcome, RaceRecord, Surface};
use crate::names::{field_horse_name, jockey_name};
use crate::numbers::{
    floor_f64_to_u64, round_f64_to_u32, round_f64_to_u8_within, round_to_tenth, u64_to_f64,
};
use crate::rng::{chance, pick, roll_between};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaceKind {
    Flat,
    Jump,
}

/// Difficulty and reward bracket, ordered low to elite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Medium,
    High,
    Elite,
}

impl Tier {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Elite];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Elite => "elite",
        }
    }

    /// Half-width of the AI quality band; higher tiers cluster tighter.
    #[must_use]
    pub const fn ai_spread(self) -> f64 {
        match self {
            Self::Low => 20.0,
            Self::Medium => 15.0,
            Self::High => 10.0,
            Self::Elite => 5.0,
        }
    }

    #[must_use]
    pub const fn base_experience(self) -> f64 {
        match self {
            Self::Low => 10.0,
            Self::Medium => 20.0,
            Self::High => 30.0,
            Self::Elite => 50.0,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    #[serde(default = "Requirements::default_min_age")]
    pub min_age: u32,
    #[serde(default = "Requirements::default_max_age")]
    pub max_age: u32,
    #[serde(default)]
    pub min_rating: u8,
    /// `None` admits either gender.
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Empty admits any breed.
    #[serde(default)]
    pub breeds: Vec<Breed>,
}

impl Requirements {
    const fn default_min_age() -> u32 {
        3
    }

    const fn default_max_age() -> u32 {
        20
    }
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            min_age: Self::default_min_age(),
            max_age: Self::default_max_age(),
            min_rating: 0,
            gender: None,
            breeds: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entrant {
    pub horse_id: HorseId,
    pub horse_name: String,
    pub jockey_name: String,
    pub player_owned: bool,
    /// Frozen at entry.
    pub odds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    pub entrant_index: usize,
    pub horse_id: HorseId,
    pub horse_name: String,
    pub jockey_name: String,
    pub player_owned: bool,
    pub odds: f64,
    pub score: f64,
    pub time: f64,
    pub formatted_time: String,
    pub energy_used: u8,
    pub injury: InjuryOutcome,
    pub experience: u32,
    pub position: u32,
    pub prize: u64,
}

impl RaceResult {
    /// History entry for the horse that produced this result.
    #[must_use]
    pub fn to_record(&self, race: &Race) -> RaceRecord {
        RaceRecord {
            race_id: race.id.clone(),
            race_name: race.name.clone(),
            date: race.schedule_day,
            position: self.position,
            prize: self.prize,
            experience: self.experience,
            energy_used: self.energy_used,
            injury: self.injury,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Scheduled,
    Entered,
    Run,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub id: String,
    pub name: String,
    pub distance: Distance,
    pub surface: Surface,
    #[serde(rename = "type")]
    pub kind: RaceKind,
    pub tier: Tier,
    /// 1-5.
    pub difficulty: u8,
    #[serde(default)]
    pub entry_fee: u64,
    pub purse: u64,
    pub prizes: Vec<u64>,
    #[serde(default)]
    pub requirements: Requirements,
    #[serde(default = "Race::default_max_entrants")]
    pub max_entrants: usize,
    #[serde(default)]
    pub is_special: bool,
    #[serde(default)]
    pub has_run: bool,
    #[serde(default)]
    pub entrants: Vec<Entrant>,
    #[serde(default)]
    pub results: Vec<RaceResult>,
    #[serde(default)]
    pub schedule_day: Option<GameDate>,
}

impl Race {
    const fn default_max_entrants() -> usize {
        DEFAULT_MAX_ENTRANTS
    }

    /// A race with default requirements, capacity and prize split.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        conditions: RaceConditions,
        difficulty: u8,
        purse: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            distance: conditions.distance,
            surface: conditions.surface,
            kind: conditions.kind,
            tier: conditions.tier,
            difficulty: difficulty.clamp(1, 5),
            entry_fee: 0,
            purse,
            prizes: Self::default_prizes(purse),
            requirements: Requirements::default(),
            max_entrants: DEFAULT_MAX_ENTRANTS,
            is_special: false,
            has_run: false,
            entrants: Vec::new(),
            results: Vec::new(),
            schedule_day: None,
        }
    }

    /// `floor(purse * share)` for 60/20/10/5/5.
    #[must_use]
    pub fn default_prizes(purse: u64) -> Vec<u64> {
        let purse = u64_to_f64(purse);
        DEFAULT_PRIZE_SHARES
            .iter()
            .map(|share| floor_f64_to_u64(purse * share))
            .collect()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.has_run {
            Phase::Run
        } else if self.entrants.is_empty() {
            Phase::Scheduled
        } else {
            Phase::Entered
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entrants.len() >= self.max_entrants
    }

    #[must_use]
    pub fn is_entered(&self, horse_id: &HorseId) -> bool {
        self.entrants.iter().any(|e| &e.horse_id == horse_id)
    }

    #[must_use]
    pub const fn conditions(&self) -> RaceConditions {
        RaceConditions {
            distance: self.distance,
            surface: self.surface,
            kind: self.kind,
            tier: self.tier,
        }
    }

    /// Prize for a 1-based finishing position; zero past the distribution.
    #[must_use]
    pub fn prize_for(&self, position: u32) -> u64 {
        usize::try_from(position)
            .ok()
            .and_then(|pos| pos.checked_sub(1))
            .and_then(|idx| self.prizes.get(idx))
            .copied()
            .unwrap_or(0)
    }
}

/// The parts of a race that shape a horse's performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceConditions {
    pub distance: Distance,
    pub surface: Surface,
    #[serde(rename = "type")]
    pub kind: RaceKind,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub is_eligible: bool,
    pub reasons: Vec<String>,
}

/// Collect every reason the horse cannot race; eligible when there are none.
#[must_use]
pub fn check_eligibility(race: &Race, horse: &Horse) -> Eligibility {
    let req = &race.requirements;
    let mut reasons = Vec::new();

    if horse.age < req.min_age {
        reasons.push(format!("Horse is too young (minimum age: {})", req.min_age));
    }
    if horse.age > req.max_age {
        reasons.push(format!("Horse is too old (maximum age: {})", req.max_age));
    }
    if overall_rating(horse) < req.min_rating {
        reasons.push(format!(
            "Horse's rating is too low (minimum rating: {})",
            req.min_rating
        ));
    }
    if let Some(gender) = req.gender
        && horse.gender != gender
    {
        reasons.push(format!("This race is for {} horses only", gender.label()));
    }
    if !req.breeds.is_empty() && !req.breeds.contains(&horse.breed) {
        let names: Vec<&str> = req.breeds.iter().map(|b| b.label()).collect();
        reasons.push(format!(
            "This race is only for {} breeds",
            names.join(", ")
        ));
    }
    if horse.injured {
        reasons.push(String::from("Horse is injured and cannot race"));
    }
    if horse.health < RACE_MIN_HEALTH {
        reasons.push(String::from("Horse's health is too low to race"));
    }
    if horse.racing_cooldown > 0 {
        reasons.push(format!(
            "Horse needs to rest for {} more days before racing again",
            horse.racing_cooldown
        ));
    }

    Eligibility {
        is_eligible: reasons.is_empty(),
        reasons,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("Race has already been run")]
    AlreadyRun,
    #[error("Race is already full ({max_entrants} entrants)")]
    Full { max_entrants: usize },
    #[error("Horse is already entered in this race")]
    AlreadyEntered,
    #[error("Horse is not eligible for this race")]
    Ineligible { reasons: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryReport {
    /// Written as the envelope's `message` by [`crate::Outcome`].
    #[serde(skip)]
    pub message: String,
    pub entrant_count: usize,
    pub max_entrants: usize,
    pub odds: f64,
}

/// Enter a player horse; odds are computed now and never recomputed.
///
/// # Errors
///
/// Rejects, in order: a race that has run, a full field, a horse already
/// entered, and an ineligible horse (with every reason).
pub fn add_entrant<R>(
    race: &mut Race,
    horse: &Horse,
    jockey: impl Into<String>,
    rng: &mut R,
) -> Result<EntryReport, EntryError>
where
    R: Rng + ?Sized,
{
    let rejection = if race.has_run {
        Some(EntryError::AlreadyRun)
    } else if race.is_full() {
        Some(EntryError::Full {
            max_entrants: race.max_entrants,
        })
    } else if race.is_entered(&horse.id) {
        Some(EntryError::AlreadyEntered)
    } else {
        let eligibility = check_eligibility(race, horse);
        (!eligibility.is_eligible).then_some(EntryError::Ineligible {
            reasons: eligibility.reasons,
        })
    };
    if let Some(err) = rejection {
        log::warn!("{} not entered in {}: {err}", horse.name, race.name);
        return Err(err);
    }

    let odds = player_odds(race, horse, rng);
    race.entrants.push(Entrant {
        horse_id: horse.id.clone(),
        horse_name: horse.name.clone(),
        jockey_name: jockey.into(),
        player_owned: true,
        odds,
    });
    log::debug!("{} entered in {} at {odds:.1}", horse.name, race.name);

    Ok(EntryReport {
        message: format!("{} has been entered in {}", horse.name, race.name),
        entrant_count: race.entrants.len(),
        max_entrants: race.max_entrants,
        odds,
    })
}

/// Decimal odds for a player horse, in `[1.2, 20]` to one decimal.
pub fn player_odds<R>(race: &Race, horse: &Horse, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    let mut odds = 10.0 - f64::from(overall_rating(horse)) / 12.5;

    odds *= match distance_fit(horse.preferred_distance, race.distance) {
        DistanceFit::Match => 0.8,
        DistanceFit::Opposite => 1.3,
        DistanceFit::Neutral => 1.0,
    };
    odds *= if horse.preferred_surface == race.surface {
        0.85
    } else {
        1.15
    };
    if race.kind == RaceKind::Jump {
        if horse.stats.jumping >= 70 {
            odds *= 0.85;
        } else if horse.stats.jumping <= 40 {
            odds *= 1.3;
        }
    }
    odds *= roll_between(rng, 0.85, 1.15);

    round_to_tenth(odds.clamp(PLAYER_ODDS_MIN, ODDS_MAX))
}

/// Decimal odds for an AI horse of the given quality, in `[1.5, 20]`.
pub fn ai_odds<R>(quality: f64, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    let odds = (12.0 - quality / 10.0) * roll_between(rng, 0.8, 1.2);
    round_to_tenth(odds.clamp(AI_ODDS_MIN, ODDS_MAX))
}

/// A generated opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiHorse {
    pub id: HorseId,
    pub name: String,
    pub jockey_name: String,
    pub quality: f64,
    pub odds: f64,
    pub preferred_distance: Distance,
    pub preferred_surface: Surface,
}

/// Opponents for every open slot, centered on the player's rating.
pub fn generate_ai_field<R>(race: &Race, player_rating: f64, rng: &mut R) -> Vec<AiHorse>
where
    R: Rng + ?Sized,
{
    let open = race.max_entrants.saturating_sub(race.entrants.len());
    let spread = race.tier.ai_spread();
    let center = player_rating + (f64::from(race.difficulty) - 3.0) * 5.0;

    let field: Vec<AiHorse> = (0..open)
        .map(|slot| {
            let quality = roll_between(rng, center - spread, center + spread)
                .clamp(AI_QUALITY_MIN, AI_QUALITY_MAX);
            let name = field_horse_name(rng);
            let jockey_name = jockey_name(rng);
            let preferred_distance = pick(rng, &Distance::ALL).copied().unwrap_or(Distance::Middle);
            let preferred_surface = pick(rng, &Surface::ALL).copied().unwrap_or(Surface::Dirt);
            let odds = ai_odds(quality, rng);
            AiHorse {
                id: HorseId(format!("ai-{}-{}", race.id, race.entrants.len() + slot)),
                name,
                jockey_name,
                quality,
                odds,
                preferred_distance,
                preferred_surface,
            }
        })
        .collect();

    if !field.is_empty() {
        log::debug!(
            "{}: generated {} AI entrants around quality {center:.1}",
            race.name,
            field.len()
        );
    }
    field
}

/// Append a generated opponent.
///
/// # Errors
///
/// Rejects a race that has run or is full.
pub fn add_ai_entrant(race: &mut Race, ai: AiHorse) -> Result<EntryReport, EntryError> {
    if race.has_run {
        return Err(EntryError::AlreadyRun);
    }
    if race.is_full() {
        return Err(EntryError::Full {
            max_entrants: race.max_entrants,
        });
    }
    let message = format!("{} has been entered in the race", ai.name);
    race.entrants.push(Entrant {
        horse_id: ai.id,
        horse_name: ai.name,
        jockey_name: ai.jockey_name,
        player_owned: false,
        odds: ai.odds,
    });
    Ok(EntryReport {
        message,
        entrant_count: race.entrants.len(),
        max_entrants: race.max_entrants,
        odds: ai.odds,
    })
}

/// Everything one horse produces in one race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub score: f64,
    pub time: f64,
    pub energy_used: u8,
    pub injury: InjuryOutcome,
    pub experience: u32,
}

/// Score a real horse under the given conditions.
pub fn race_performance<R>(horse: &Horse, conditions: &RaceConditions, rng: &mut R) -> Performance
where
    R: Rng + ?Sized,
{
    let base = f64::from(overall_rating(horse)) * PERFORMANCE_RATING_SCALE;
    let distance = match distance_fit(horse.preferred_distance, conditions.distance) {
        DistanceFit::Match => 1.2,
        DistanceFit::Opposite => 0.8,
        DistanceFit::Neutral => 1.0,
    };
    let surface = if horse.preferred_surface == conditions.surface {
        1.15
    } else {
        0.9
    };
    let energy = f64::from(horse.energy) / 100.0;
    let health = f64::from(horse.health) / 100.0;
    let luck = roll_between(rng, PERFORMANCE_LUCK_MIN, PERFORMANCE_LUCK_MAX);
    let trait_bonus: f64 = horse.traits.iter().filter_map(|t| t.race_effect).sum();

    let score = base * distance * surface * energy * health * luck + trait_bonus;

    Performance {
        score,
        time: race_time(conditions.distance, score, rng),
        energy_used: energy_used(horse, conditions.distance, rng),
        injury: roll_injury(horse, conditions.distance, rng),
        experience: experience_gained(horse, conditions, rng),
    }
}

const fn base_time_secs(distance: Distance) -> f64 {
    match distance {
        Distance::Sprint => 70.0,
        Distance::Middle => 120.0,
        Distance::Long => 180.0,
    }
}

const fn base_energy(distance: Distance) -> f64 {
    match distance {
        Distance::Sprint => 30.0,
        Distance::Middle => 50.0,
        Distance::Long => 70.0,
    }
}

/// Seconds to finish; a higher score runs faster.
pub fn race_time<R>(distance: Distance, score: f64, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    let adjustment = (100.0 - score) / 100.0;
    base_time_secs(distance) * (1.0 + adjustment + roll_between(rng, -0.05, 0.05))
}

/// Energy spent; longer trips cost more and stamina softens the cost.
pub fn energy_used<R>(horse: &Horse, distance: Distance, rng: &mut R) -> u8
where
    R: Rng + ?Sized,
{
    let stamina_factor = 1.0 - f64::from(horse.stats.stamina) / 200.0;
    let used = base_energy(distance) * stamina_factor * roll_between(rng, 0.9, 1.1);
    round_f64_to_u8_within(used, 0, 100)
}

/// Probability of an injury in one race.
#[must_use]
pub fn injury_chance(horse: &Horse, distance: Distance) -> f64 {
    let mut p = INJURY_BASE_CHANCE;
    if horse.energy < INJURY_LOW_ENERGY {
        p *= 2.0;
    }
    if horse.health < RACE_MIN_HEALTH {
        p *= 3.0;
    }
    if distance == Distance::Long {
        p *= 1.5;
    }
    p * (1.0 - f64::from(horse.stats.temperament) / 200.0)
}

/// Roll for injury; severity 1-3 maps to 1-3, 3-7 or 7-16 recovery days.
pub fn roll_injury<R>(horse: &Horse, distance: Distance, rng: &mut R) -> InjuryOutcome
where
    R: Rng + ?Sized,
{
    if !chance(rng, injury_chance(horse, distance)) {
        return InjuryOutcome::none();
    }
    let severity = rng.gen_range(1..=3_u8);
    let duration = match severity {
        1 => rng.gen_range(1..=3),
        2 => rng.gen_range(3..=7),
        _ => rng.gen_range(7..=16),
    };
    InjuryOutcome {
        injured: true,
        severity,
        duration,
    }
}

/// Experience by tier, boosted for a preferred distance and surface.
pub fn experience_gained<R>(horse: &Horse, conditions: &RaceConditions, rng: &mut R) -> u32
where
    R: Rng + ?Sized,
{
    let mut exp = conditions.tier.base_experience();
    if horse.preferred_distance == conditions.distance {
        exp *= 1.2;
    }
    if horse.preferred_surface == conditions.surface {
        exp *= 1.1;
    }
    round_f64_to_u32(exp * roll_between(rng, 0.9, 1.1))
}

/// `M:SS.cc` with every component truncated.
#[must_use]
pub fn format_race_time(secs: f64) -> String {
    let secs = secs.max(0.0);
    let minutes = floor_f64_to_u64(secs / 60.0);
    let seconds = floor_f64_to_u64(secs % 60.0);
    let hundredths = floor_f64_to_u64((secs % 1.0) * 100.0);
    format!("{minutes}:{seconds:02}.{hundredths:02}")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("Race has already been run")]
    AlreadyRun,
    #[error("No horses entered in the race")]
    NoEntrants,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSummary {
    /// Written as the envelope's `message` by [`crate::Outcome`].
    #[serde(skip)]
    pub message: String,
    pub results: Vec<RaceResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_result: Option<RaceResult>,
    pub purse: u64,
    pub prizes: Vec<u64>,
}

/// Run the race once: fill the field, score, order and pay.
///
/// The player horse, if entered, is scored from its attributes; every other
/// entrant gets a synthetic score from its frozen odds.
///
/// # Errors
///
/// Returns [`RunError::AlreadyRun`] on a second call (results are left as the
/// first call produced them) and [`RunError::NoEntrants`] on an empty field.
pub fn run_race<R>(
    race: &mut Race,
    player: Option<&Horse>,
    rng: &mut R,
) -> Result<RaceSummary, RunError>
where
    R: Rng + ?Sized,
{
    if race.has_run {
        log::warn!("{} has already been run", race.name);
        return Err(RunError::AlreadyRun);
    }
    if race.entrants.is_empty() {
        log::warn!("{} has no entrants", race.name);
        return Err(RunError::NoEntrants);
    }

    let player_rating = player.map_or(DEFAULT_PLAYER_RATING, |h| f64::from(overall_rating(h)));
    for ai in generate_ai_field(race, player_rating, rng) {
        let name = ai.name.clone();
        if let Err(err) = add_ai_entrant(race, ai) {
            log::warn!("{name} left out of {}: {err}", race.name);
        }
    }

    let conditions = race.conditions();
    let player_entry = player.and_then(|horse| {
        race.entrants
            .iter()
            .position(|e| e.horse_id == horse.id)
            .map(|idx| (idx, race_performance(horse, &conditions, rng)))
    });

    let mut scored: Vec<(usize, Performance)> = Vec::with_capacity(race.entrants.len());
    for (idx, entrant) in race.entrants.iter().enumerate() {
        let performance = match &player_entry {
            Some((player_idx, perf)) if *player_idx == idx => perf.clone(),
            _ => synthetic_performance(entrant.odds, race.distance, rng),
        };
        scored.push((idx, performance));
    }
    scored.sort_by(|a, b| b.1.score.total_cmp(&a.1.score));

    let results: Vec<RaceResult> = scored
        .into_iter()
        .zip(1_u32..)
        .filter_map(|((idx, perf), position)| {
            let entrant = race.entrants.get(idx)?;
            Some(RaceResult {
                entrant_index: idx,
                horse_id: entrant.horse_id.clone(),
                horse_name: entrant.horse_name.clone(),
                jockey_name: entrant.jockey_name.clone(),
                player_owned: entrant.player_owned,
                odds: entrant.odds,
                score: perf.score,
                formatted_time: format_race_time(perf.time),
                time: perf.time,
                energy_used: perf.energy_used,
                injury: perf.injury,
                experience: perf.experience,
                position,
                prize: race.prize_for(position),
            })
        })
        .collect();

    race.has_run = true;
    race.results = results.clone();

    let player_result = results.iter().find(|r| r.player_owned).cloned();
    if let Some(result) = &player_result {
        log::info!(
            "{} run: {} finished {} of {} for {}",
            race.name,
            result.horse_name,
            result.position,
            results.len(),
            result.prize
        );
    } else {
        log::info!("{} run with {} entrants", race.name, results.len());
    }

    Ok(RaceSummary {
        message: String::from("Race completed"),
        results,
        player_result,
        purse: race.purse,
        prizes: race.prizes.clone(),
    })
}

/// Odds-driven score for horses without a full attribute model.
fn synthetic_performance<R>(odds: f64, distance: Distance, rng: &mut R) -> Performance
where
    R: Rng + ?Sized,
{
    let score = (100.0 - odds * AI_SCORE_PER_ODDS) * roll_between(rng, 0.85, 1.15);
    Performance {
        score,
        time: race_time(distance, score, rng),
        energy_used: 0,
        injury: InjuryOutcome::none(),
        experience: 0,
    }
}
