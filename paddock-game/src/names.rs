//! Name, jockey and id generators.
use rand::Rng;

use crate::horse::HorseId;
use crate::rng::pick;

const STABLE_PREFIXES: [&str; 16] = [
    "Swift", "Mighty", "Golden", "Thunder", "Shadow", "Royal", "Noble", "Mystic", "Wild", "Silver",
    "Midnight", "Stellar", "Magic", "Legend", "Storm", "Brave",
];
const STABLE_SUFFIXES: [&str; 16] = [
    "Runner", "Spirit", "Star", "Bolt", "Wind", "Heart", "Fire", "Dash", "Flash", "Mane", "Dancer",
    "Jumper", "Blaze", "Whisper", "Dream", "Legend",
];

const FIELD_PREFIXES: [&str; 16] = [
    "Bold", "Swift", "Mighty", "Royal", "Noble", "Fast", "Lucky", "Epic", "Thunder", "Silent",
    "Golden", "Silver", "Midnight", "Wild", "Winter", "Summer",
];
const FIELD_SUFFIXES: [&str; 16] = [
    "Runner", "Spirit", "Wind", "Star", "Prince", "King", "Queen", "Dancer", "Legend", "Flash",
    "Heart", "Moon", "Storm", "Hero", "Warrior", "Champion",
];

const JOCKEY_FIRST: [&str; 16] = [
    "John", "Mike", "James", "Robert", "Tom", "William", "David", "Richard", "Sarah", "Emma",
    "Olivia", "Sophia", "Isabella", "Ava", "Emily", "Grace",
];
const JOCKEY_LAST: [&str; 16] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Miller", "Davis", "Garcia", "Martinez",
    "Wilson", "Anderson", "Taylor", "Thomas", "Moore", "Martin", "Lee",
];

fn compose<R>(rng: &mut R, first: &[&str], second: &[&str]) -> String
where
    R: Rng + ?Sized,
{
    let a = pick(rng, first).copied().unwrap_or_default();
    let b = pick(rng, second).copied().unwrap_or_default();
    format!("{a} {b}")
}

/// Name for a generated or newborn stable horse.
pub fn horse_name<R>(rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    compose(rng, &STABLE_PREFIXES, &STABLE_SUFFIXES)
}

/// Name for an AI horse filling out a race field.
pub fn field_horse_name<R>(rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    compose(rng, &FIELD_PREFIXES, &FIELD_SUFFIXES)
}

pub fn jockey_name<R>(rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    compose(rng, &JOCKEY_FIRST, &JOCKEY_LAST)
}

/// Random 48-bit hex id with a readable prefix, e.g. `horse-00a1b2c3d4e5`.
pub fn generate_id<R>(rng: &mut R, prefix: &str) -> String
where
    R: Rng + ?Sized,
{
    format!("{prefix}-{:012x}", rng.r#gen::<u64>() >> 16)
}

pub fn horse_id<R>(rng: &mut R) -> HorseId
where
    R: Rng + ?Sized,
{
    HorseId(generate_id(rng, "horse"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::rngs::mock::StepRng;

    #[test]
    fn names_are_two_words() {
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..20 {
            assert_eq!(horse_name(&mut rng).split(' ').count(), 2);
            assert_eq!(jockey_name(&mut rng).split(' ').count(), 2);
        }
    }

    #[test]
    fn minimum_draws_pick_first_entries() {
        let mut rng = StepRng::new(0, 0);
        assert_eq!(horse_name(&mut rng), "Swift Runner");
        assert_eq!(field_horse_name(&mut rng), "Bold Runner");
        assert_eq!(jockey_name(&mut rng), "John Smith");
        assert_eq!(horse_id(&mut rng).as_str(), "horse-000000000000");
    }
}
