//! Breeding: a dam and a sire produce a foal.
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::GameDate;
use crate::constants::{
    BREEDING_COOLDOWN_DAYS, BREEDING_MIN_AGE, DAM_PREFERENCE_CHANCE, FOAL_STAT_FLOOR,
    FOAL_STAT_VARIATION, GROWTH_RATE_MAX, GROWTH_RATE_MIN, POTENTIAL_BOOST_CHANCE,
    POTENTIAL_BOOST_MAX, POTENTIAL_MAX, STAT_MAX, TRAIT_INHERIT_CHANCE, TRAIT_MUTATION_CHANCE,
};
use crate::horse::{CoatColor, CoreStats, Gender, Horse, Stat, TraitSet, push_unique};
use crate::names::{horse_id, horse_name};
use crate::numbers::round_f64_to_u8_within;
use crate::rng::{chance, pick, roll_between, roll_unit};
use crate::traits::TraitCatalog;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreedingError {
    #[error("Breeding requires one female horse (dam) and one male horse (sire)")]
    WrongGenders,
    #[error("{name} needs to rest for {days} more days before breeding again")]
    DamCoolingDown { name: String, days: u32 },
    #[error("Horses must be at least {min_age} years old to breed")]
    TooYoung { min_age: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreedingReport {
    /// Written as the envelope's `message` by [`crate::Outcome`].
    #[serde(skip)]
    pub message: String,
    pub foal: Horse,
}

/// Check breeding preconditions in order: genders, dam cooldown, ages.
///
/// # Errors
///
/// Returns the first failing precondition.
pub fn check_breeding(dam: &Horse, sire: &Horse) -> Result<(), BreedingError> {
    if dam.gender != Gender::Female || sire.gender != Gender::Male {
        return Err(BreedingError::WrongGenders);
    }
    if dam.breeding_cooldown > 0 {
        return Err(BreedingError::DamCoolingDown {
            name: dam.name.clone(),
            days: dam.breeding_cooldown,
        });
    }
    if dam.age < BREEDING_MIN_AGE || sire.age < BREEDING_MIN_AGE {
        return Err(BreedingError::TooYoung {
            min_age: BREEDING_MIN_AGE,
        });
    }
    Ok(())
}

/// Breed using the bundled trait catalog.
///
/// # Errors
///
/// See [`breed_with_catalog`].
pub fn breed<R>(
    dam: &mut Horse,
    sire: &Horse,
    today: GameDate,
    rng: &mut R,
) -> Result<BreedingReport, BreedingError>
where
    R: Rng + ?Sized,
{
    breed_with_catalog(dam, sire, today, TraitCatalog::default_catalog(), rng)
}

/// Produce a foal from `dam` and `sire`; on success the dam's breeding
/// cooldown is set to 30 days. Nothing is mutated on failure.
///
/// # Errors
///
/// Returns a [`BreedingError`] when genders, the dam's cooldown or either
/// parent's age rule out breeding.
pub fn breed_with_catalog<R>(
    dam: &mut Horse,
    sire: &Horse,
    today: GameDate,
    catalog: &TraitCatalog,
    rng: &mut R,
) -> Result<BreedingReport, BreedingError>
where
    R: Rng + ?Sized,
{
    if let Err(err) = check_breeding(dam, sire) {
        log::warn!("breeding {} x {} rejected: {err}", dam.name, sire.name);
        return Err(err);
    }

    let breed = if chance(rng, 0.5) { dam.breed } else { sire.breed };
    let preferred_distance = if chance(rng, DAM_PREFERENCE_CHANCE) {
        dam.preferred_distance
    } else {
        sire.preferred_distance
    };
    let preferred_surface = if chance(rng, DAM_PREFERENCE_CHANCE) {
        dam.preferred_surface
    } else {
        sire.preferred_surface
    };
    let gender = if chance(rng, 0.5) {
        Gender::Male
    } else {
        Gender::Female
    };

    let mut foal = Horse::new(horse_id(rng), horse_name(rng), gender, breed);
    foal.color = pick(rng, &CoatColor::ALL).copied().unwrap_or(CoatColor::Bay);
    foal.age = 0;
    foal.birth_day = today;
    foal.dam = Some(dam.lineage());
    foal.sire = Some(sire.lineage());
    foal.preferred_distance = preferred_distance;
    foal.preferred_surface = preferred_surface;
    foal.stats = inherit_stats(&dam.stats, &sire.stats, rng);
    foal.potential = inherit_potential(dam.potential, sire.potential, rng);
    foal.growth_rate = (GROWTH_RATE_MIN + foal.potential / POTENTIAL_MAX * 0.4)
        .clamp(GROWTH_RATE_MIN, GROWTH_RATE_MAX);
    foal.traits = inherit_traits(dam, sire, catalog, rng);

    dam.breeding_cooldown = BREEDING_COOLDOWN_DAYS;

    let message = format!(
        "Breeding successful! {} and {} produced a {}.",
        dam.name,
        sire.name,
        foal.gender.foal_noun()
    );
    log::info!("{message} ({} with {} traits)", foal.name, foal.traits.len());

    Ok(BreedingReport { message, foal })
}

/// Per-stat random blend of the parents with a ±10% wobble, floored at 10.
pub fn inherit_stats<R>(dam: &CoreStats, sire: &CoreStats, rng: &mut R) -> CoreStats
where
    R: Rng + ?Sized,
{
    let mut stats = CoreStats::uniform(FOAL_STAT_FLOOR);
    for stat in Stat::ALL {
        let weight = roll_unit(rng);
        let blended = f64::from(dam.get(stat)) * weight + f64::from(sire.get(stat)) * (1.0 - weight);
        let variation = roll_between(rng, -FOAL_STAT_VARIATION, FOAL_STAT_VARIATION);
        stats.set(
            stat,
            round_f64_to_u8_within(blended * (1.0 + variation), FOAL_STAT_FLOOR, STAT_MAX),
        );
    }
    stats
}

fn inherit_potential<R>(dam: f64, sire: f64, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    let average = (dam + sire) / 2.0;
    let boost = if chance(rng, POTENTIAL_BOOST_CHANCE) {
        roll_between(rng, 0.0, POTENTIAL_BOOST_MAX)
    } else {
        0.0
    };
    (average + boost).clamp(0.0, POTENTIAL_MAX)
}

fn inherit_traits<R>(dam: &Horse, sire: &Horse, catalog: &TraitCatalog, rng: &mut R) -> TraitSet
where
    R: Rng + ?Sized,
{
    let mut traits = TraitSet::new();
    for parent in [dam, sire] {
        if !parent.traits.is_empty()
            && chance(rng, TRAIT_INHERIT_CHANCE)
            && let Some(inherited) = pick(rng, &parent.traits)
        {
            push_unique(&mut traits, inherited.clone());
        }
    }
    if chance(rng, TRAIT_MUTATION_CHANCE)
        && let Some(fresh) = catalog.roll_foal_trait(rng)
    {
        push_unique(&mut traits, fresh);
    }
    traits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::horse::{Breed, HorseId, Trait};
    use rand::SeedableRng;
    use rand::rngs::mock::StepRng;
    use rand_chacha::ChaCha20Rng;

    fn parent(id: &str, gender: Gender) -> Horse {
        let mut horse = Horse::new(HorseId::new(id), id, gender, Breed::Thoroughbred);
        horse.age = 5;
        horse.potential = 60.0;
        horse
    }

    #[test]
    fn rejects_in_order_without_mutation() {
        let mut dam = parent("dam", Gender::Male);
        let sire = parent("sire", Gender::Male);
        let mut rng = StepRng::new(0, 0);
        assert_eq!(
            breed(&mut dam, &sire, GameDate::default(), &mut rng).unwrap_err(),
            BreedingError::WrongGenders
        );

        let mut dam = parent("dam", Gender::Female);
        dam.breeding_cooldown = 4;
        dam.age = 1;
        let before = dam.clone();
        let err = breed(&mut dam, &sire, GameDate::default(), &mut rng).unwrap_err();
        assert_eq!(err.to_string(), "dam needs to rest for 4 more days before breeding again");
        assert_eq!(dam, before);

        dam.breeding_cooldown = 0;
        assert_eq!(
            breed(&mut dam, &sire, GameDate::default(), &mut rng).unwrap_err(),
            BreedingError::TooYoung { min_age: 3 }
        );
    }

    #[test]
    fn success_sets_cooldown_and_lineage() {
        let mut dam = parent("dam", Gender::Female);
        let sire = parent("sire", Gender::Male);
        let today = GameDate::new(12, 6, 2024);
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let report = breed(&mut dam, &sire, today, &mut rng).unwrap();
        let foal = report.foal;
        assert_eq!(dam.breeding_cooldown, 30);
        assert_eq!(foal.age, 0);
        assert_eq!(foal.birth_day, today);
        assert_eq!(foal.dam.as_ref().map(|l| l.name.as_str()), Some("dam"));
        assert_eq!(foal.sire.as_ref().map(|l| l.id.as_str()), Some("sire"));
        assert!(foal.traits.len() <= 3);

        let again = breed(&mut dam, &sire, today, &mut rng).unwrap_err();
        assert!(matches!(again, BreedingError::DamCoolingDown { days: 30, .. }));
    }

    #[test]
    fn foal_stats_never_fall_below_floor() {
        let mut dam = parent("dam", Gender::Female);
        dam.stats = CoreStats::uniform(0);
        let mut sire = parent("sire", Gender::Male);
        sire.stats = CoreStats::uniform(0);
        // Minimum draws: weight 0, variation -10%.
        let mut rng = StepRng::new(0, 0);
        let report = breed(&mut dam, &sire, GameDate::default(), &mut rng).unwrap();
        assert_eq!(report.foal.stats, CoreStats::uniform(10));
    }

    #[test]
    fn minimum_weight_takes_the_sire() {
        let dam = CoreStats::uniform(100);
        let sire = CoreStats::uniform(80);
        let mut rng = StepRng::new(0, 0);
        // 80 * 0.9
        assert_eq!(inherit_stats(&dam, &sire, &mut rng), CoreStats::uniform(72));
    }

    #[test]
    fn minimum_draws_inherit_one_trait_each_and_skip_duplicates() {
        let mut dam = parent("dam", Gender::Female);
        dam.push_trait(Trait::named("Calm"));
        let mut sire = parent("sire", Gender::Male);
        sire.push_trait(Trait::named("Calm"));
        let catalog = TraitCatalog::from_json(r#"{"foalPool": ["Calm"]}"#).unwrap();
        let mut rng = StepRng::new(0, 0);
        let report =
            breed_with_catalog(&mut dam, &sire, GameDate::default(), &catalog, &mut rng).unwrap();
        assert_eq!(report.foal.traits.len(), 1);
        assert!(report.foal.has_trait("Calm"));
    }

    #[test]
    fn potential_boost_and_growth_rate() {
        let mut dam = parent("dam", Gender::Female);
        dam.potential = 99.0;
        let mut sire = parent("sire", Gender::Male);
        sire.potential = 99.0;
        let mut rng = StepRng::new(0, 0);
        let foal = breed(&mut dam, &sire, GameDate::default(), &mut rng)
            .unwrap()
            .foal;
        // Boost fires with a zero roll, so potential stays at the parent average.
        assert!((foal.potential - 99.0).abs() < 1e-9);
        assert!((foal.growth_rate - (0.8 + 0.99 * 0.4)).abs() < 1e-9);
    }

    #[test]
    fn seeded_foals_stay_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(2024);
        let sire = parent("sire", Gender::Male);
        for _ in 0..200 {
            let mut dam = parent("dam", Gender::Female);
            dam.stats = CoreStats::uniform(rng.gen_range(0..=100));
            let foal = breed(&mut dam, &sire, GameDate::default(), &mut rng)
                .unwrap()
                .foal;
            for stat in Stat::ALL {
                assert!((10..=100).contains(&foal.stats.get(stat)));
            }
            assert!((0.8..=1.2).contains(&foal.growth_rate));
            assert!(foal.potential <= 100.0);
        }
    }
}
