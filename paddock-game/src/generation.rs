//! Random horses for the starter pick, the market and stud listings.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::calendar::GameDate;
use crate::constants::{DAYS_PER_YEAR, GROWTH_RATE_MAX, GROWTH_RATE_MIN, POTENTIAL_MAX, STAT_MAX};
use crate::economy::{sale_value, stud_fee};
use crate::horse::{Breed, CoatColor, Distance, Gender, Horse, Stat, Surface};
use crate::names::{horse_id, horse_name};
use crate::numbers::round_f64_to_u8_within;
use crate::rng::{chance, pick, roll_between};

/// New-game difficulty; scales starter stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn stat_modifier(self) -> f64 {
        match self {
            Self::Easy => 1.2,
            Self::Normal => 1.0,
            Self::Hard => 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub min_age: u32,
    pub max_age: u32,
    pub min_stat: u8,
    pub max_stat: u8,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            min_age: 3,
            max_age: 8,
            min_stat: 30,
            max_stat: 70,
        }
    }
}

impl GenerationOptions {
    /// Stat band `[quality * 0.7, quality]`, as used for market stock.
    #[must_use]
    pub fn for_quality(quality: f64, min_age: u32, max_age: u32) -> Self {
        Self {
            min_age,
            max_age,
            min_stat: round_f64_to_u8_within(quality * 0.7, 0, STAT_MAX),
            max_stat: round_f64_to_u8_within(quality, 0, STAT_MAX),
        }
    }
}

fn roll_stat<R>(rng: &mut R, low: u8, high: u8) -> u8
where
    R: Rng + ?Sized,
{
    let low = low.min(STAT_MAX);
    let high = high.min(STAT_MAX);
    if high <= low {
        return low;
    }
    rng.gen_range(low..=high)
}

/// One random horse within the option bands, born `age` years before `today`.
pub fn generate_horse<R>(options: &GenerationOptions, today: GameDate, rng: &mut R) -> Horse
where
    R: Rng + ?Sized,
{
    let (min_age, max_age) = if options.min_age <= options.max_age {
        (options.min_age, options.max_age)
    } else {
        (options.max_age, options.min_age)
    };
    let age = rng.gen_range(min_age..=max_age);
    let gender = if chance(rng, 0.5) {
        Gender::Male
    } else {
        Gender::Female
    };
    let breed = pick(rng, &Breed::ALL).copied().unwrap_or(Breed::Thoroughbred);
    let mut horse = Horse::new(horse_id(rng), horse_name(rng), gender, breed);
    horse.color = pick(rng, &CoatColor::ALL).copied().unwrap_or(CoatColor::Bay);
    horse.age = age;
    horse.birth_day = today.minus_days(age.saturating_mul(DAYS_PER_YEAR));

    for stat in [Stat::Speed, Stat::Acceleration, Stat::Stamina, Stat::Jumping] {
        horse
            .stats
            .set(stat, roll_stat(rng, options.min_stat, options.max_stat));
    }
    let temperament = roll_stat(
        rng,
        options.min_stat.saturating_add(10),
        options.max_stat.saturating_add(10),
    );
    horse.stats.set(Stat::Temperament, temperament);

    horse.preferred_distance = pick(rng, &Distance::ALL).copied().unwrap_or(Distance::Middle);
    horse.preferred_surface = pick(rng, &Surface::ALL).copied().unwrap_or(Surface::Dirt);

    let potential = horse.stats.average() * (1.0 + roll_between(rng, -0.1, 0.2));
    horse.potential = potential.min(POTENTIAL_MAX).round();
    horse.growth_rate = (breed.growth_factor() * roll_between(rng, 0.9, 1.1))
        .clamp(GROWTH_RATE_MIN, GROWTH_RATE_MAX);

    horse
}

/// A three-year-old with stats around 30-60, scaled by difficulty.
pub fn starter_horse<R>(difficulty: Difficulty, today: GameDate, rng: &mut R) -> Horse
where
    R: Rng + ?Sized,
{
    let modifier = difficulty.stat_modifier();
    let options = GenerationOptions {
        min_age: 3,
        max_age: 3,
        min_stat: round_f64_to_u8_within(30.0 * modifier, 0, STAT_MAX),
        max_stat: round_f64_to_u8_within(60.0 * modifier, 0, STAT_MAX),
    };
    generate_horse(&options, today, rng)
}

/// Horses listed for sale at market value, tracking the player's level.
pub fn market_horses<R>(count: usize, player_rating: f64, today: GameDate, rng: &mut R) -> Vec<Horse>
where
    R: Rng + ?Sized,
{
    let ceiling = 70.0_f64.min(player_rating + 10.0);
    (0..count)
        .map(|_| {
            let quality = roll_between(rng, 30.0, ceiling);
            let mut horse = generate_horse(&GenerationOptions::for_quality(quality, 3, 8), today, rng);
            horse.for_sale = true;
            horse.sale_price = sale_value(&horse);
            horse
        })
        .collect()
}

/// Stud or mare listings of one gender within ten points of the player's rating.
pub fn breeding_candidates<R>(
    count: usize,
    gender: Gender,
    player_rating: f64,
    preferred_breeds: &[Breed],
    today: GameDate,
    rng: &mut R,
) -> Vec<Horse>
where
    R: Rng + ?Sized,
{
    (0..count)
        .map(|_| {
            let quality = roll_between(rng, player_rating - 10.0, player_rating + 10.0);
            let options = GenerationOptions::for_quality(quality, 3, 10);
            let mut horse = generate_horse(&options, today, rng);
            horse.gender = gender;
            if !preferred_breeds.is_empty()
                && chance(rng, 0.5)
                && let Some(breed) = pick(rng, preferred_breeds)
            {
                horse.breed = *breed;
            }
            horse.stud_fee = stud_fee(&horse);
            horse
        })
        .collect()
}
