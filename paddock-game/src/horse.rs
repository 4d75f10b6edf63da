//! Horse entity and the vocabulary shared by every engine component.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::calendar::GameDate;
use crate::constants::{DAYS_PER_YEAR, STAT_MAX};

/// Inline capacity for traits; horses rarely carry more than a handful.
pub type TraitSet = SmallVec<[Trait; 4]>;

/// Stable string identifier for a horse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HorseId(pub String);

impl HorseId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HorseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Young-horse noun used in breeding messages.
    #[must_use]
    pub const fn foal_noun(self) -> &'static str {
        match self {
            Self::Male => "colt",
            Self::Female => "filly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Breed {
    Thoroughbred,
    Arabian,
    #[serde(rename = "Quarter Horse")]
    QuarterHorse,
    Appaloosa,
    Mustang,
    Morgan,
    Andalusian,
    Friesian,
    Belgian,
    Clydesdale,
}

impl Breed {
    pub const ALL: [Self; 10] = [
        Self::Thoroughbred,
        Self::Arabian,
        Self::QuarterHorse,
        Self::Appaloosa,
        Self::Mustang,
        Self::Morgan,
        Self::Andalusian,
        Self::Friesian,
        Self::Belgian,
        Self::Clydesdale,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Thoroughbred => "Thoroughbred",
            Self::Arabian => "Arabian",
            Self::QuarterHorse => "Quarter Horse",
            Self::Appaloosa => "Appaloosa",
            Self::Mustang => "Mustang",
            Self::Morgan => "Morgan",
            Self::Andalusian => "Andalusian",
            Self::Friesian => "Friesian",
            Self::Belgian => "Belgian",
            Self::Clydesdale => "Clydesdale",
        }
    }

    /// Breed factor applied to a freshly generated horse's growth rate.
    #[must_use]
    pub const fn growth_factor(self) -> f64 {
        match self {
            Self::Thoroughbred | Self::Arabian => 1.1,
            Self::Belgian | Self::Clydesdale => 0.9,
            _ => 1.0,
        }
    }
}

/// Cosmetic coat color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoatColor {
    Bay,
    Chestnut,
    Black,
    Grey,
    Palomino,
    Buckskin,
    Roan,
    Dun,
    Pinto,
    White,
    Sorrel,
}

impl CoatColor {
    pub const ALL: [Self; 11] = [
        Self::Bay,
        Self::Chestnut,
        Self::Black,
        Self::Grey,
        Self::Palomino,
        Self::Buckskin,
        Self::Roan,
        Self::Dun,
        Self::Pinto,
        Self::White,
        Self::Sorrel,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    Sprint,
    Middle,
    Long,
}

impl Distance {
    pub const ALL: [Self; 3] = [Self::Sprint, Self::Middle, Self::Long];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sprint => "1200m (6 furlongs)",
            Self::Middle => "2000m (10 furlongs)",
            Self::Long => "3000m (15 furlongs)",
        }
    }

    /// True for the sprint/long pairing, in either order.
    #[must_use]
    pub const fn is_opposite(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Sprint, Self::Long) | (Self::Long, Self::Sprint)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Dirt,
    Turf,
    Synthetic,
}

impl Surface {
    pub const ALL: [Self; 3] = [Self::Dirt, Self::Turf, Self::Synthetic];
}

/// The five trainable core stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Speed,
    Acceleration,
    Stamina,
    Jumping,
    Temperament,
}

impl Stat {
    pub const ALL: [Self; 5] = [
        Self::Speed,
        Self::Acceleration,
        Self::Stamina,
        Self::Jumping,
        Self::Temperament,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::Acceleration => "acceleration",
            Self::Stamina => "stamina",
            Self::Jumping => "jumping",
            Self::Temperament => "temperament",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreStats {
    pub speed: u8,
    pub acceleration: u8,
    pub stamina: u8,
    pub jumping: u8,
    pub temperament: u8,
}

impl Default for CoreStats {
    fn default() -> Self {
        Self::uniform(50)
    }
}

impl CoreStats {
    #[must_use]
    pub const fn uniform(value: u8) -> Self {
        Self {
            speed: value,
            acceleration: value,
            stamina: value,
            jumping: value,
            temperament: value,
        }
    }

    #[must_use]
    pub const fn get(&self, stat: Stat) -> u8 {
        match stat {
            Stat::Speed => self.speed,
            Stat::Acceleration => self.acceleration,
            Stat::Stamina => self.stamina,
            Stat::Jumping => self.jumping,
            Stat::Temperament => self.temperament,
        }
    }

    /// Set a stat, clamping to the 0-100 scale.
    pub fn set(&mut self, stat: Stat, value: u8) {
        let value = value.min(STAT_MAX);
        match stat {
            Stat::Speed => self.speed = value,
            Stat::Acceleration => self.acceleration = value,
            Stat::Stamina => self.stamina = value,
            Stat::Jumping => self.jumping = value,
            Stat::Temperament => self.temperament = value,
        }
    }

    /// Raise a stat, capped at 100. Returns the amount actually applied.
    pub fn raise(&mut self, stat: Stat, amount: u32) -> u8 {
        let before = self.get(stat);
        self.set(stat, add_capped(before, amount));
        self.get(stat) - before
    }

    /// Lower a stat, floored at 0. Returns the amount actually removed.
    pub fn lower(&mut self, stat: Stat, amount: u32) -> u8 {
        let before = self.get(stat);
        self.set(stat, sub_floored(before, amount));
        before - self.get(stat)
    }

    #[must_use]
    pub fn average(&self) -> f64 {
        let total: u32 = Stat::ALL.iter().map(|s| u32::from(self.get(*s))).sum();
        f64::from(total) / 5.0
    }

    #[must_use]
    pub fn in_bounds(&self) -> bool {
        Stat::ALL.iter().all(|s| self.get(*s) <= STAT_MAX)
    }
}

/// Saturating add on the 0-100 scale.
#[must_use]
pub fn add_capped(value: u8, amount: u32) -> u8 {
    let raised = u32::from(value).saturating_add(amount).min(u32::from(STAT_MAX));
    u8::try_from(raised).unwrap_or(STAT_MAX)
}

/// Saturating subtract on the 0-100 scale.
#[must_use]
pub fn sub_floored(value: u8, amount: u32) -> u8 {
    let lowered = u32::from(value).saturating_sub(amount);
    u8::try_from(lowered).unwrap_or(0)
}

/// Non-owning reference to a parent horse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
    pub id: HorseId,
    pub name: String,
}

/// A named modifier. Effects are optional and additive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trait {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Flat delta on the overall rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_effect: Option<f64>,
    /// Flat delta on market value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_effect: Option<i64>,
    /// Flat delta on race performance score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_effect: Option<f64>,
}

impl Trait {
    /// A trait with no numeric effects.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            rating_effect: None,
            value_effect: None,
            race_effect: None,
        }
    }
}

/// Append `candidate` unless the set already holds a trait with its name.
pub fn push_unique(traits: &mut TraitSet, candidate: Trait) -> bool {
    if traits.iter().any(|t| t.name == candidate.name) {
        return false;
    }
    traits.push(candidate);
    true
}

/// Injury rolled during a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InjuryOutcome {
    pub injured: bool,
    /// 1 minor, 2 moderate, 3 severe; 0 when not injured.
    pub severity: u8,
    /// Recovery days.
    pub duration: u32,
}

impl InjuryOutcome {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            injured: false,
            severity: 0,
            duration: 0,
        }
    }
}

/// One entry in a horse's race history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceRecord {
    pub race_id: String,
    pub race_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<GameDate>,
    pub position: u32,
    pub prize: u64,
    pub experience: u32,
    pub energy_used: u8,
    #[serde(default)]
    pub injury: InjuryOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Horse {
    pub id: HorseId,
    pub name: String,
    pub gender: Gender,
    pub breed: Breed,
    pub color: CoatColor,
    pub age: u32,
    pub birth_day: GameDate,
    #[serde(default)]
    pub sire: Option<Lineage>,
    #[serde(default)]
    pub dam: Option<Lineage>,

    #[serde(flatten)]
    pub stats: CoreStats,
    pub preferred_distance: Distance,
    pub preferred_surface: Surface,

    pub energy: u8,
    pub health: u8,
    pub happiness: u8,
    #[serde(default)]
    pub training: f64,
    #[serde(default = "Horse::default_level")]
    pub level: u32,
    #[serde(default)]
    pub potential: f64,
    #[serde(default = "Horse::default_growth_rate")]
    pub growth_rate: f64,

    #[serde(default)]
    pub breeding_cooldown: u32,
    #[serde(default)]
    pub racing_cooldown: u32,
    #[serde(default)]
    pub injured: bool,
    #[serde(default)]
    pub injury_duration: u32,

    #[serde(default)]
    pub traits: TraitSet,

    #[serde(default)]
    pub races: Vec<RaceRecord>,
    #[serde(default)]
    pub races_won: u32,
    #[serde(default)]
    pub races_placed: u32,
    #[serde(default)]
    pub earnings: u64,

    #[serde(default)]
    pub for_sale: bool,
    #[serde(default)]
    pub sale_price: u64,
    #[serde(default)]
    pub stud_fee: u64,
}

impl Horse {
    const fn default_level() -> u32 {
        1
    }

    const fn default_growth_rate() -> f64 {
        1.0
    }

    /// A rested, healthy three-year-old with mid-range stats, born three
    /// years before the default calendar date.
    #[must_use]
    pub fn new(id: HorseId, name: impl Into<String>, gender: Gender, breed: Breed) -> Self {
        const STARTING_AGE: u32 = 3;
        Self {
            id,
            name: name.into(),
            gender,
            breed,
            color: CoatColor::Bay,
            age: STARTING_AGE,
            birth_day: GameDate::default().minus_days(STARTING_AGE * DAYS_PER_YEAR),
            sire: None,
            dam: None,
            stats: CoreStats::default(),
            preferred_distance: Distance::Middle,
            preferred_surface: Surface::Dirt,
            energy: STAT_MAX,
            health: STAT_MAX,
            happiness: STAT_MAX,
            training: 0.0,
            level: Self::default_level(),
            potential: 50.0,
            growth_rate: Self::default_growth_rate(),
            breeding_cooldown: 0,
            racing_cooldown: 0,
            injured: false,
            injury_duration: 0,
            traits: TraitSet::new(),
            races: Vec::new(),
            races_won: 0,
            races_placed: 0,
            earnings: 0,
            for_sale: false,
            sale_price: 0,
            stud_fee: 0,
        }
    }

    /// Weak reference used for lineage on offspring.
    #[must_use]
    pub fn lineage(&self) -> Lineage {
        Lineage {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    #[must_use]
    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.iter().any(|t| t.name == name)
    }

    /// Adds a trait unless one with the same name is present.
    pub fn push_trait(&mut self, candidate: Trait) -> bool {
        push_unique(&mut self.traits, candidate)
    }

    /// True when every bounded field sits inside its range.
    #[must_use]
    pub fn within_bounds(&self) -> bool {
        self.stats.in_bounds()
            && self.energy <= STAT_MAX
            && self.health <= STAT_MAX
            && self.happiness <= STAT_MAX
    }

    pub fn add_energy(&mut self, amount: u32) -> u8 {
        let before = self.energy;
        self.energy = add_capped(before, amount);
        self.energy - before
    }

    pub fn drain_energy(&mut self, amount: u32) -> u8 {
        let before = self.energy;
        self.energy = sub_floored(before, amount);
        before - self.energy
    }

    pub fn add_health(&mut self, amount: u32) -> u8 {
        let before = self.health;
        self.health = add_capped(before, amount);
        self.health - before
    }

    pub fn add_happiness(&mut self, amount: u32) -> u8 {
        let before = self.happiness;
        self.happiness = add_capped(before, amount);
        self.happiness - before
    }

    /// Decrement both cooldowns by `days`, floored at zero.
    pub fn tick_cooldowns(&mut self, days: u32) {
        self.breeding_cooldown = self.breeding_cooldown.saturating_sub(days);
        self.racing_cooldown = self.racing_cooldown.saturating_sub(days);
    }

    /// Count down an active injury. Returns true exactly when it clears.
    pub fn tick_injury(&mut self, days: u32) -> bool {
        if !self.injured {
            return false;
        }
        self.injury_duration = self.injury_duration.saturating_sub(days);
        if self.injury_duration == 0 {
            self.injured = false;
            return true;
        }
        false
    }
}
