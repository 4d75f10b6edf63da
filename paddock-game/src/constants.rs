//! Centralized balance and tuning constants for Paddock simulation logic.
//!
//! These values define the deterministic shape of every formula in the
//! engine. Randomness is layered on top of them by the individual modules.
//! Keeping them together means balance changes go through code review rather
//! than through external JSON assets.

// Stat bounds -------------------------------------------------------------
pub(crate) const STAT_MAX: u8 = 100;
pub(crate) const FOAL_STAT_FLOOR: u8 = 10;
pub(crate) const POTENTIAL_MAX: f64 = 100.0;
pub(crate) const GROWTH_RATE_MIN: f64 = 0.8;
pub(crate) const GROWTH_RATE_MAX: f64 = 1.2;

// Calendar ----------------------------------------------------------------
pub const DAYS_PER_MONTH: u32 = 30;
pub const MONTHS_PER_YEAR: u32 = 12;
pub const DAYS_PER_YEAR: u32 = 365;

// Overall rating ----------------------------------------------------------
pub(crate) const WEIGHT_SPEED: f64 = 0.25;
pub(crate) const WEIGHT_ACCELERATION: f64 = 0.20;
pub(crate) const WEIGHT_STAMINA: f64 = 0.20;
pub(crate) const WEIGHT_JUMPING: f64 = 0.15;
pub(crate) const WEIGHT_TEMPERAMENT: f64 = 0.20;
pub(crate) const TRAINING_RATING_BONUS: f64 = 0.05;
pub(crate) const PRIME_AGE_BONUS: f64 = 1.05;
pub(crate) const OLD_AGE_DECLINE_PER_YEAR: f64 = 0.05;

// Market value ------------------------------------------------------------
pub(crate) const VALUE_PER_RATING_POINT: f64 = 100.0;
pub(crate) const VALUE_PER_WIN: u64 = 500;
pub(crate) const VALUE_PER_PLACE: u64 = 200;
pub(crate) const VALUE_FLOOR: u64 = 500;
pub(crate) const VALUE_YOUNG_MULT: f64 = 1.5;
pub(crate) const VALUE_PRIME_MULT: f64 = 1.2;
pub(crate) const VALUE_OLD_BASE_MULT: f64 = 0.7;
pub(crate) const VALUE_OLD_DECLINE_PER_YEAR: f64 = 0.05;

// Progression -------------------------------------------------------------
pub(crate) const DAILY_ENERGY_RECOVERY: u32 = 5;
pub(crate) const DAILY_HAPPINESS_DECAY: u32 = 1;
pub(crate) const OLD_AGE_THRESHOLD: u32 = 15;
pub(crate) const GROWTH_AGE_LIMIT: u32 = 6;
pub(crate) const GROWTH_CHANCE_PER_YEAR: f64 = 0.1;
pub(crate) const TRAINING_MIN_ENERGY: u8 = 20;
pub(crate) const TRAINING_GAIN_PER_INTENSITY: f64 = 2.0;
pub(crate) const TRAINING_ENERGY_PER_INTENSITY: u8 = 15;
pub(crate) const TRAINING_SETBACK_CHANCE_PER_INTENSITY: f64 = 0.1;
pub(crate) const TRAINING_SETBACK_RATIO: f64 = 0.3;
pub(crate) const LEVEL_TRAINING_STEP: f64 = 5.0;
pub(crate) const REST_ENERGY_PER_DAY: u32 = 20;
pub(crate) const REST_HEALTH_PER_DAY: u32 = 5;
pub(crate) const RACE_COOLDOWN_DAYS: u32 = 1;
pub(crate) const INJURY_HEALTH_PER_SEVERITY: u8 = 10;
pub(crate) const EXPERIENCE_TO_TRAINING: f64 = 10.0;

// Care --------------------------------------------------------------------
pub(crate) const GROOM_HAPPINESS: u8 = 15;
pub(crate) const VET_HEALTH: u8 = 20;
pub(crate) const VET_INJURY_CUT_CHANCE: f64 = 0.5;
pub(crate) const FEED_ENERGY: u8 = 25;
pub(crate) const FEED_HEALTH: u8 = 5;
pub(crate) const MASSAGE_ENERGY: u8 = 15;

// Breeding ----------------------------------------------------------------
pub(crate) const BREEDING_MIN_AGE: u32 = 3;
pub(crate) const BREEDING_COOLDOWN_DAYS: u32 = 30;
pub(crate) const DAM_PREFERENCE_CHANCE: f64 = 0.6;
pub(crate) const FOAL_STAT_VARIATION: f64 = 0.1;
pub(crate) const POTENTIAL_BOOST_CHANCE: f64 = 0.3;
pub(crate) const POTENTIAL_BOOST_MAX: f64 = 15.0;
pub(crate) const TRAIT_INHERIT_CHANCE: f64 = 0.7;
pub(crate) const TRAIT_MUTATION_CHANCE: f64 = 0.2;

// Racing ------------------------------------------------------------------
pub(crate) const RACE_MIN_HEALTH: u8 = 50;
pub(crate) const PERFORMANCE_RATING_SCALE: f64 = 0.8;
pub(crate) const PERFORMANCE_LUCK_MIN: f64 = 0.85;
pub(crate) const PERFORMANCE_LUCK_MAX: f64 = 1.15;
pub(crate) const PLAYER_ODDS_MIN: f64 = 1.2;
pub(crate) const AI_ODDS_MIN: f64 = 1.5;
pub(crate) const ODDS_MAX: f64 = 20.0;
pub(crate) const AI_QUALITY_MIN: f64 = 20.0;
pub(crate) const AI_QUALITY_MAX: f64 = 95.0;
pub(crate) const AI_SCORE_PER_ODDS: f64 = 4.0;
pub(crate) const INJURY_BASE_CHANCE: f64 = 0.005;
pub(crate) const INJURY_LOW_ENERGY: u8 = 30;
pub(crate) const DEFAULT_MAX_ENTRANTS: usize = 8;
pub(crate) const DEFAULT_PRIZE_SHARES: [f64; 5] = [0.6, 0.2, 0.1, 0.05, 0.05];

// Economy -----------------------------------------------------------------
pub(crate) const TRAINING_COST_PER_INTENSITY: f64 = 50.0;
pub(crate) const STUD_FEE_SHARE: f64 = 0.15;
