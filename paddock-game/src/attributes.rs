//! Pure derived values on a horse snapshot: overall rating, market value and
//! race-condition compatibility.
//!
//! Nothing here mutates or draws randomness, so these functions are shared
//! freely by progression, genetics, racing and the economy helpers.
use serde::{Deserialize, Serialize};

use crate::constants::{
    OLD_AGE_DECLINE_PER_YEAR, OLD_AGE_THRESHOLD, PRIME_AGE_BONUS, STAT_MAX,
    TRAINING_RATING_BONUS, VALUE_FLOOR, VALUE_OLD_BASE_MULT, VALUE_OLD_DECLINE_PER_YEAR,
    VALUE_PER_PLACE, VALUE_PER_RATING_POINT, VALUE_PER_WIN, VALUE_PRIME_MULT, VALUE_YOUNG_MULT,
    WEIGHT_ACCELERATION, WEIGHT_JUMPING, WEIGHT_SPEED, WEIGHT_STAMINA, WEIGHT_TEMPERAMENT,
};
use crate::horse::{CoreStats, Distance, Horse, Surface};
use crate::numbers::{round_f64_to_u64, round_f64_to_u8_within, u64_to_f64, usize_to_f64};

/// Player rating assumed when no horse is available to measure.
pub const DEFAULT_PLAYER_RATING: f64 = 50.0;

/// How a horse's preferred distance lines up with a race's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceFit {
    Match,
    Neutral,
    /// Sprint horse in a long race, or the reverse.
    Opposite,
}

#[must_use]
pub fn distance_fit(preferred: Distance, race: Distance) -> DistanceFit {
    if preferred == race {
        DistanceFit::Match
    } else if preferred.is_opposite(race) {
        DistanceFit::Opposite
    } else {
        DistanceFit::Neutral
    }
}

#[must_use]
pub fn surface_matches(preferred: Surface, race: Surface) -> bool {
    preferred == race
}

/// Weighted sum of the five core stats before any modifier.
#[must_use]
pub fn weighted_stats(stats: &CoreStats) -> f64 {
    f64::from(stats.speed) * WEIGHT_SPEED
        + f64::from(stats.acceleration) * WEIGHT_ACCELERATION
        + f64::from(stats.stamina) * WEIGHT_STAMINA
        + f64::from(stats.jumping) * WEIGHT_JUMPING
        + f64::from(stats.temperament) * WEIGHT_TEMPERAMENT
}

/// Rating multiplier by age: ramps up to 3, peaks 5-10, declines past 15.
#[must_use]
pub fn rating_age_multiplier(age: u32) -> f64 {
    let years = f64::from(age);
    if age < 3 {
        0.8 + years / 3.0 * 0.2
    } else if age > OLD_AGE_THRESHOLD {
        (1.0 - (years - f64::from(OLD_AGE_THRESHOLD)) * OLD_AGE_DECLINE_PER_YEAR).max(0.0)
    } else if (5..=10).contains(&age) {
        PRIME_AGE_BONUS
    } else {
        1.0
    }
}

/// Value multiplier by age. Young stock carries a premium, old stock decays
/// and turns negative past 26, eating into the race and trait bonuses.
#[must_use]
pub fn value_age_multiplier(age: u32) -> f64 {
    if age < 3 {
        VALUE_YOUNG_MULT
    } else if age > 12 {
        VALUE_OLD_BASE_MULT - f64::from(age - 12) * VALUE_OLD_DECLINE_PER_YEAR
    } else if (4..=8).contains(&age) {
        VALUE_PRIME_MULT
    } else {
        1.0
    }
}

/// Unrounded rating; callers that need the integer use [`overall_rating`].
#[must_use]
pub fn raw_rating(horse: &Horse) -> f64 {
    let training_bonus = 1.0 + horse.training * TRAINING_RATING_BONUS;
    let health = f64::from(horse.health) / 100.0;
    let energy = f64::from(horse.energy) / 100.0;
    let trait_bonus: f64 = horse.traits.iter().filter_map(|t| t.rating_effect).sum();

    weighted_stats(&horse.stats) * rating_age_multiplier(horse.age) * health * energy * training_bonus
        + trait_bonus
}

/// Overall competitiveness on the 0-100 scale.
#[must_use]
pub fn overall_rating(horse: &Horse) -> u8 {
    round_f64_to_u8_within(raw_rating(horse), 0, STAT_MAX)
}

/// Estimated sale value in currency units, never below 500.
#[must_use]
pub fn market_value(horse: &Horse) -> u64 {
    let base = f64::from(overall_rating(horse)) * VALUE_PER_RATING_POINT;
    let race_bonus = VALUE_PER_WIN.saturating_mul(u64::from(horse.races_won))
        + VALUE_PER_PLACE.saturating_mul(u64::from(horse.races_placed));
    let trait_bonus: i64 = horse.traits.iter().filter_map(|t| t.value_effect).sum();

    #[allow(clippy::cast_precision_loss)]
    let total = base * value_age_multiplier(horse.age) + u64_to_f64(race_bonus) + trait_bonus as f64;
    round_f64_to_u64(total).max(VALUE_FLOOR)
}

/// Mean overall rating across a roster, or the default when it is empty.
#[must_use]
pub fn average_rating(horses: &[Horse]) -> f64 {
    if horses.is_empty() {
        return DEFAULT_PLAYER_RATING;
    }
    let total: u32 = horses.iter().map(|h| u32::from(overall_rating(h))).sum();
    f64::from(total) / usize_to_f64(horses.len())
}
