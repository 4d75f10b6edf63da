//! Time-driven and player-driven changes to a single horse.
//!
//! Every operation here validates first and mutates second, so a rejected
//! call leaves the horse untouched.
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::calendar::GameDate;
use crate::constants::{
    DAILY_ENERGY_RECOVERY, DAILY_HAPPINESS_DECAY, EXPERIENCE_TO_TRAINING, FEED_ENERGY, FEED_HEALTH,
    GROOM_HAPPINESS, GROWTH_AGE_LIMIT, GROWTH_CHANCE_PER_YEAR, INJURY_HEALTH_PER_SEVERITY,
    LEVEL_TRAINING_STEP, MASSAGE_ENERGY, OLD_AGE_THRESHOLD, RACE_COOLDOWN_DAYS,
    REST_ENERGY_PER_DAY, REST_HEALTH_PER_DAY, TRAINING_ENERGY_PER_INTENSITY,
    TRAINING_GAIN_PER_INTENSITY, TRAINING_MIN_ENERGY, TRAINING_SETBACK_CHANCE_PER_INTENSITY,
    TRAINING_SETBACK_RATIO, VET_HEALTH, VET_INJURY_CUT_CHANCE,
};
use crate::horse::{Horse, RaceRecord, Stat, sub_floored};
use crate::numbers::round_f64_to_u32;
use crate::rng::{chance, pick, roll_between};

/// Stats that can erode once a horse passes its racing years.
const DECLINING_STATS: [Stat; 3] = [Stat::Speed, Stat::Acceleration, Stat::Stamina];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatChange {
    pub stat: Stat,
    pub delta: i16,
}

pub type StatChanges = SmallVec<[StatChange; 3]>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceReport {
    pub has_aged: bool,
    pub recovered_from_injury: bool,
    pub age: u32,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub stat_changes: StatChanges,
}

/// Advance a horse by `days` ending on `today`.
///
/// Age is recomputed from `birth_day`; a birthday applies at most one round of
/// passive stat drift no matter how many years the call spans.
pub fn advance<R>(horse: &mut Horse, today: GameDate, days: u32, rng: &mut R) -> AdvanceReport
where
    R: Rng + ?Sized,
{
    let computed_age = today.years_since(&horse.birth_day);
    let has_aged = computed_age > horse.age;
    if has_aged {
        horse.age = computed_age;
    }

    horse.add_energy(DAILY_ENERGY_RECOVERY.saturating_mul(days));
    horse.happiness = sub_floored(horse.happiness, DAILY_HAPPINESS_DECAY.saturating_mul(days));
    horse.tick_cooldowns(days);
    let recovered_from_injury = horse.tick_injury(days);
    if recovered_from_injury {
        log::info!("{} recovered from injury", horse.name);
    }

    let stat_changes = if has_aged {
        age_drift(horse, rng)
    } else {
        StatChanges::new()
    };

    AdvanceReport {
        has_aged,
        recovered_from_injury,
        age: horse.age,
        stat_changes,
    }
}

fn age_drift<R>(horse: &mut Horse, rng: &mut R) -> StatChanges
where
    R: Rng + ?Sized,
{
    let mut changes = StatChanges::new();
    if horse.age > OLD_AGE_THRESHOLD {
        for stat in DECLINING_STATS {
            let drop = rng.gen_range(0..=2_u32);
            let removed = horse.stats.lower(stat, drop);
            if removed > 0 {
                changes.push(StatChange {
                    stat,
                    delta: -i16::from(removed),
                });
            }
        }
    } else if horse.age < GROWTH_AGE_LIMIT {
        let growth_chance = f64::from(GROWTH_AGE_LIMIT - horse.age) * GROWTH_CHANCE_PER_YEAR;
        if chance(rng, growth_chance)
            && let Some(stat) = pick(rng, &Stat::ALL).copied()
        {
            let gain = rng.gen_range(1..=3_u32);
            let applied = horse.stats.raise(stat, gain);
            if applied > 0 {
                changes.push(StatChange {
                    stat,
                    delta: i16::from(applied),
                });
            }
        }
    }
    if !changes.is_empty() {
        log::debug!("{} age drift at {}: {:?}", horse.name, horse.age, changes);
    }
    changes
}

/// Training effort level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Light,
    Moderate,
    Intense,
}

impl Intensity {
    pub const ALL: [Self; 3] = [Self::Light, Self::Moderate, Self::Intense];

    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Light => 1,
            Self::Moderate => 2,
            Self::Intense => 3,
        }
    }

    /// Map a raw 1-3 level, clamping anything outside that range.
    #[must_use]
    pub const fn from_level(level: u8) -> Self {
        match level {
            0 | 1 => Self::Light,
            2 => Self::Moderate,
            _ => Self::Intense,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainingError {
    #[error("Horse is too tired to train (energy {energy}, needs {required})")]
    TooTired { energy: u8, required: u8 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingReport {
    pub stat_trained: Stat,
    /// Rolled gain; the stat itself stops at 100.
    pub primary_stat_gain: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_loss: Option<StatChange>,
    pub energy_cost: u8,
    pub leveled_up: bool,
    pub new_level: u32,
}

impl TrainingReport {
    #[must_use]
    pub fn message(&self) -> String {
        let mut message = format!(
            "Training completed: {} +{}",
            self.stat_trained, self.primary_stat_gain
        );
        if let Some(loss) = self.secondary_loss {
            message.push_str(&format!(", {} {}", loss.stat, loss.delta));
        }
        if self.leveled_up {
            message.push_str(&format!(". Reached level {}", self.new_level));
        }
        message
    }
}

/// Train one stat.
///
/// # Errors
///
/// Returns [`TrainingError::TooTired`] when energy is below 20; the horse is
/// left unchanged.
pub fn train<R>(
    horse: &mut Horse,
    stat: Stat,
    intensity: Intensity,
    rng: &mut R,
) -> Result<TrainingReport, TrainingError>
where
    R: Rng + ?Sized,
{
    if horse.energy < TRAINING_MIN_ENERGY {
        log::warn!("{} refused training at energy {}", horse.name, horse.energy);
        return Err(TrainingError::TooTired {
            energy: horse.energy,
            required: TRAINING_MIN_ENERGY,
        });
    }

    let level = intensity.level();
    let nominal_gain = f64::from(level) * TRAINING_GAIN_PER_INTENSITY;
    let primary_stat_gain = round_f64_to_u32(nominal_gain * roll_between(rng, 0.8, 1.2));
    horse.stats.raise(stat, primary_stat_gain);

    let mut secondary_loss = None;
    let setback_chance = f64::from(level) * TRAINING_SETBACK_CHANCE_PER_INTENSITY;
    if chance(rng, setback_chance) {
        let others: SmallVec<[Stat; 4]> = Stat::ALL.into_iter().filter(|s| *s != stat).collect();
        if let Some(other) = pick(rng, &others).copied() {
            let loss = round_f64_to_u32(nominal_gain * TRAINING_SETBACK_RATIO);
            let removed = horse.stats.lower(other, loss);
            secondary_loss = Some(StatChange {
                stat: other,
                delta: -i16::from(removed),
            });
        }
    }

    let energy_cost = TRAINING_ENERGY_PER_INTENSITY.saturating_mul(level);
    horse.drain_energy(u32::from(energy_cost));
    horse.training += 1.0 / (1.0 + horse.training / 10.0);
    let leveled_up = check_level_up(horse);

    log::debug!(
        "{} trained {stat} at {:?}: +{primary_stat_gain}, setback {:?}",
        horse.name,
        intensity,
        secondary_loss
    );

    Ok(TrainingReport {
        stat_trained: stat,
        primary_stat_gain,
        secondary_loss,
        energy_cost,
        leveled_up,
        new_level: horse.level,
    })
}

/// Raise the level by one when the training accumulator crosses the next threshold.
fn check_level_up(horse: &mut Horse) -> bool {
    if horse.training >= f64::from(horse.level) * LEVEL_TRAINING_STEP {
        horse.level += 1;
        log::info!("{} reached level {}", horse.name, horse.level);
        return true;
    }
    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestReport {
    pub energy_recovered: u8,
    pub health_recovered: u8,
    pub recovered_from_injury: bool,
}

/// Rest for `days`: energy and health recover, injury and cooldowns count down.
pub fn rest(horse: &mut Horse, days: u32) -> RestReport {
    let energy_recovered = horse.add_energy(REST_ENERGY_PER_DAY.saturating_mul(days));
    let health_recovered = if horse.health < 100 {
        horse.add_health(REST_HEALTH_PER_DAY.saturating_mul(days))
    } else {
        0
    };
    let recovered_from_injury = horse.tick_injury(days);
    horse.tick_cooldowns(days);

    RestReport {
        energy_recovered,
        health_recovered,
        recovered_from_injury,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareKind {
    Groom,
    Veterinarian,
    Feed,
    Massage,
}

impl CareKind {
    pub const ALL: [Self; 4] = [Self::Groom, Self::Veterinarian, Self::Feed, Self::Massage];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareReport {
    pub kind: CareKind,
    /// Written as the envelope's `message` by [`crate::Outcome`].
    #[serde(skip)]
    pub message: String,
    pub bonus_applied: bool,
}

/// Apply one care recipe. The veterinarian only draws when the horse is injured.
pub fn provide_care<R>(horse: &mut Horse, kind: CareKind, rng: &mut R) -> CareReport
where
    R: Rng + ?Sized,
{
    let (message, bonus_applied) = match kind {
        CareKind::Groom => {
            let gain = horse.add_happiness(u32::from(GROOM_HAPPINESS));
            (format!("Groomed horse. Happiness +{gain}"), false)
        }
        CareKind::Veterinarian => {
            let gain = horse.add_health(u32::from(VET_HEALTH));
            if horse.injured && chance(rng, VET_INJURY_CUT_CHANCE) {
                horse.injury_duration = horse.injury_duration.saturating_sub(1);
                (
                    format!(
                        "Veterinarian care provided. Health +{gain}. Reduced injury recovery by 1 day."
                    ),
                    true,
                )
            } else {
                (format!("Veterinarian care provided. Health +{gain}"), false)
            }
        }
        CareKind::Feed => {
            let energy = horse.add_energy(u32::from(FEED_ENERGY));
            let health = horse.add_health(u32::from(FEED_HEALTH));
            (
                format!("Premium feed provided. Energy +{energy}, Health +{health}"),
                false,
            )
        }
        CareKind::Massage => {
            let reduction = horse.racing_cooldown.min(1);
            horse.racing_cooldown -= reduction;
            let energy = horse.add_energy(u32::from(MASSAGE_ENERGY));
            let bonus = reduction > 0;
            let mut message = format!("Massage provided. Energy +{energy}");
            if bonus {
                message.push_str(&format!(", Racing cooldown -{reduction}"));
            }
            (message, bonus)
        }
    };

    CareReport {
        kind,
        message,
        bonus_applied,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordReport {
    pub races_won: u32,
    pub races_placed: u32,
    pub total_earnings: u64,
    pub injured: bool,
    pub leveled_up: bool,
}

/// Fold a finished race into the horse's history and condition.
pub fn record_race(horse: &mut Horse, record: RaceRecord) -> RecordReport {
    if record.position == 1 {
        horse.races_won += 1;
    }
    if (1..=3).contains(&record.position) {
        horse.races_placed += 1;
    }
    horse.earnings = horse.earnings.saturating_add(record.prize);
    horse.training += f64::from(record.experience) / EXPERIENCE_TO_TRAINING;
    horse.drain_energy(u32::from(record.energy_used));
    horse.racing_cooldown = RACE_COOLDOWN_DAYS;

    if record.injury.injured {
        horse.injured = true;
        horse.injury_duration = record.injury.duration;
        let damage = u32::from(record.injury.severity) * u32::from(INJURY_HEALTH_PER_SEVERITY);
        horse.health = sub_floored(horse.health, damage);
        log::info!(
            "{} injured in {} (severity {}, {} days)",
            horse.name,
            record.race_name,
            record.injury.severity,
            record.injury.duration
        );
    }

    horse.races.push(record);
    let leveled_up = check_level_up(horse);

    RecordReport {
        races_won: horse.races_won,
        races_placed: horse.races_placed,
        total_earnings: horse.earnings,
        injured: horse.injured,
        leveled_up,
    }
}
