//! Scripted stable owner that plays whole seasons against the engine.
//!
//! Every draw comes from an [`RngBundle`] built from the run seed, so a
//! `(plan, seed)` pair always replays the same season.
use paddock_game::{
    CareKind, Circuit, Difficulty, GameDate, Gender, Horse, HorseId, Intensity, RngBundle, Stat,
    advance, average_rating, breed, breeding_candidates, check_breeding, market_horses,
    overall_rating, provide_care, record_race, rest, starter_horse, train,
};
use serde::Serialize;

pub const JOCKEY: &str = "Sam Taylor";

/// Energy below which the owner rests instead of training.
const TRAINING_ENERGY: u8 = 40;

#[must_use]
pub fn season_start() -> GameDate {
    GameDate::new(1, 4, 2030)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonPlan {
    pub days: u32,
    /// Horses bought at the start, starter included.
    pub stable_size: usize,
    /// Add a mare and a stallion and breed whenever allowed.
    pub breeding: bool,
    pub difficulty: Difficulty,
    pub intensity: Intensity,
    pub min_race_energy: u8,
}

impl Default for SeasonPlan {
    fn default() -> Self {
        Self {
            days: 120,
            stable_size: 1,
            breeding: false,
            difficulty: Difficulty::Normal,
            intensity: Intensity::Moderate,
            min_race_energy: 50,
        }
    }
}

impl SeasonPlan {
    #[must_use]
    pub const fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    #[must_use]
    pub const fn with_stable_size(mut self, stable_size: usize) -> Self {
        self.stable_size = stable_size;
        self
    }

    #[must_use]
    pub const fn with_breeding(mut self) -> Self {
        self.breeding = true;
        self
    }

    #[must_use]
    pub const fn with_intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = intensity;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonMetrics {
    pub days_played: u32,
    pub races_run: usize,
    pub wins: usize,
    pub prizes: u64,
    pub training_sessions: usize,
    pub setbacks: usize,
    pub rest_days: usize,
    pub vet_visits: usize,
    pub injuries: usize,
    pub foals: usize,
    pub reputation: u32,
    pub unlocked_tiers: usize,
    pub average_rating: f64,
    pub total_draws: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breeding {
    pub date: GameDate,
    pub dam: HorseId,
    pub sire: HorseId,
    pub foal: HorseId,
}

#[derive(Debug, Clone)]
pub struct SeasonSummary {
    pub seed: u64,
    pub plan: SeasonPlan,
    pub start: GameDate,
    pub end: GameDate,
    pub stable: Vec<Horse>,
    pub foals: Vec<Horse>,
    pub breedings: Vec<Breeding>,
    pub circuit: Circuit,
    pub metrics: SeasonMetrics,
    /// Engine contract breaches seen while playing.
    pub violations: Vec<String>,
}

impl SeasonSummary {
    /// Serialized stable and circuit, for replay comparisons.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn fingerprint(&self) -> serde_json::Result<String> {
        serde_json::to_string(&(&self.stable, &self.foals, &self.circuit))
    }
}

/// Play one season.
#[must_use]
pub fn play_season(plan: &SeasonPlan, seed: u64) -> SeasonSummary {
    let bundle = RngBundle::from_user_seed(seed);
    let start = season_start();
    let mut today = start;
    let mut circuit = Circuit::new(today);
    let mut stable = stock_stable(plan, start, &bundle);
    let mut foals = Vec::new();
    let mut breedings = Vec::new();
    let mut metrics = SeasonMetrics::default();
    let mut violations = Vec::new();

    log::debug!(
        "seed {seed}: season of {} days with {} horses",
        plan.days,
        stable.len()
    );

    for day in 0..plan.days {
        circuit.update(today, &mut *bundle.racing());

        for horse in &mut stable {
            if let Err(err) = tend_horse(horse, &mut circuit, today, plan, day, &bundle, &mut metrics)
            {
                violations.push(format!("day {day}: {}: {err}", horse.name));
            }
        }

        if plan.breeding
            && let Some(record) = try_breeding(&mut stable, today, &bundle, &mut foals)
        {
            breedings.push(record);
        }

        today = today.plus_days(1);
        for horse in &mut stable {
            advance(horse, today, 1, &mut *bundle.progression());
            if !horse.within_bounds() {
                violations.push(format!("day {day}: {} left its bounds", horse.name));
            }
        }
        metrics.days_played += 1;
    }

    metrics.foals = foals.len();
    metrics.reputation = circuit.reputation();
    metrics.unlocked_tiers = circuit.unlocked_tiers().len();
    metrics.average_rating = average_rating(&stable);
    metrics.total_draws = bundle.total_draws();

    SeasonSummary {
        seed,
        plan: *plan,
        start,
        end: today,
        stable,
        foals,
        breedings,
        circuit,
        metrics,
        violations,
    }
}

fn stock_stable(plan: &SeasonPlan, today: GameDate, bundle: &RngBundle) -> Vec<Horse> {
    let starter = starter_horse(plan.difficulty, today, &mut *bundle.market());
    let rating = f64::from(overall_rating(&starter));
    let mut stable = vec![starter];

    let extra = plan.stable_size.saturating_sub(1);
    if extra > 0 {
        stable.extend(market_horses(extra, rating, today, &mut *bundle.market()));
    }
    if plan.breeding {
        for gender in [Gender::Female, Gender::Male] {
            stable.extend(breeding_candidates(
                1,
                gender,
                rating,
                &[],
                today,
                &mut *bundle.market(),
            ));
        }
    }
    stable
}

/// One day of work for one horse: vet, race, train or rest.
fn tend_horse(
    horse: &mut Horse,
    circuit: &mut Circuit,
    today: GameDate,
    plan: &SeasonPlan,
    day: u32,
    bundle: &RngBundle,
    metrics: &mut SeasonMetrics,
) -> Result<(), String> {
    if horse.injured {
        provide_care(horse, CareKind::Veterinarian, &mut *bundle.progression());
        metrics.vet_visits += 1;
        return Ok(());
    }

    if horse.energy >= plan.min_race_energy {
        let todays_race = circuit
            .eligible_races(horse)
            .into_iter()
            .find(|race| race.schedule_day == Some(today))
            .map(|race| race.id.clone());

        if let Some(race_id) = todays_race {
            return race_horse(horse, circuit, &race_id, bundle, metrics);
        }
    }

    if horse.energy >= TRAINING_ENERGY {
        let stat = Stat::ALL[day as usize % Stat::ALL.len()];
        match train(horse, stat, plan.intensity, &mut *bundle.progression()) {
            Ok(report) => {
                metrics.training_sessions += 1;
                if report.secondary_loss.is_some() {
                    metrics.setbacks += 1;
                }
                return Ok(());
            }
            Err(err) => log::debug!("{}: {err}", horse.name),
        }
    }

    rest(horse, 1);
    metrics.rest_days += 1;
    Ok(())
}

fn race_horse(
    horse: &mut Horse,
    circuit: &mut Circuit,
    race_id: &str,
    bundle: &RngBundle,
    metrics: &mut SeasonMetrics,
) -> Result<(), String> {
    circuit
        .enter_horse(race_id, horse, JOCKEY, &mut *bundle.racing())
        .map_err(|err| format!("entry into listed race {race_id} failed: {err}"))?;
    let summary = circuit
        .run_race(race_id, Some(&*horse), &mut *bundle.racing())
        .map_err(|err| format!("running {race_id} failed: {err}"))?;
    let result = summary
        .player_result
        .ok_or_else(|| format!("no result for the stable horse in {race_id}"))?;
    let race = circuit
        .race(race_id)
        .ok_or_else(|| format!("{race_id} vanished after running"))?;

    metrics.races_run += 1;
    metrics.prizes += result.prize;
    if result.position == 1 {
        metrics.wins += 1;
    }
    if result.injury.injured {
        metrics.injuries += 1;
    }
    record_race(horse, result.to_record(race));
    Ok(())
}

fn try_breeding(
    stable: &mut [Horse],
    today: GameDate,
    bundle: &RngBundle,
    foals: &mut Vec<Horse>,
) -> Option<Breeding> {
    let sire = stable.iter().find(|h| h.gender == Gender::Male)?.clone();
    let dam = stable
        .iter_mut()
        .find(|h| h.gender == Gender::Female && check_breeding(h, &sire).is_ok())?;

    match breed(dam, &sire, today, &mut *bundle.breeding()) {
        Ok(report) => {
            log::info!("{}", report.message);
            let record = Breeding {
                date: today,
                dam: dam.id.clone(),
                sire: sire.id.clone(),
                foal: report.foal.id.clone(),
            };
            foals.push(report.foal);
            Some(record)
        }
        Err(err) => {
            log::warn!("breeding refused after passing checks: {err}");
            None
        }
    }
}
