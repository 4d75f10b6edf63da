use paddock_game::genetics::inherit_stats;
use paddock_game::{
    Breed, CareKind, CoreStats, Distance, EntryError, GameDate, GenerationOptions, Gender, Horse,
    HorseId, Intensity, Race, RaceConditions, RaceKind, RunError, Stat, Surface, Tier, add_entrant,
    advance, breed, generate_horse, overall_rating, provide_care, record_race, rest, run_race,
    train,
};
use rand::rngs::SmallRng;
use rand::rngs::mock::StepRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn race(id: &str, distance: Distance, purse: u64) -> Race {
    Race::new(
        id,
        "Property Stakes",
        RaceConditions {
            distance,
            surface: Surface::Turf,
            kind: RaceKind::Flat,
            tier: Tier::Medium,
        },
        3,
        purse,
    )
}

fn parent(id: &str, gender: Gender, stats: u8) -> Horse {
    let mut horse = Horse::new(HorseId::new(id), id, gender, Breed::Thoroughbred);
    horse.stats = CoreStats::uniform(stats);
    horse.age = 6;
    horse
}

#[test]
fn bounded_fields_survive_random_operation_sequences() {
    for seed in 0..16_u64 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut today = GameDate::new(1, 3, 2030);
        let options = GenerationOptions {
            min_age: 3,
            max_age: 14,
            min_stat: 0,
            max_stat: 100,
        };
        let mut horse = generate_horse(&options, today, &mut rng);

        for step in 0..300 {
            match rng.gen_range(0..5) {
                0 => {
                    let stat = Stat::ALL[rng.gen_range(0..Stat::ALL.len())];
                    let intensity = Intensity::ALL[rng.gen_range(0..Intensity::ALL.len())];
                    let _ = train(&mut horse, stat, intensity, &mut rng);
                }
                1 => {
                    rest(&mut horse, rng.gen_range(1..=3));
                }
                2 => {
                    let kind = CareKind::ALL[rng.gen_range(0..CareKind::ALL.len())];
                    provide_care(&mut horse, kind, &mut rng);
                }
                3 => {
                    let days = rng.gen_range(1..=40);
                    today = today.plus_days(days);
                    advance(&mut horse, today, days, &mut rng);
                }
                _ => {
                    let mut card = race(&format!("r-{seed}-{step}"), Distance::Long, 5000);
                    if add_entrant(&mut card, &horse, "Jo", &mut rng).is_ok() {
                        let summary = run_race(&mut card, Some(&horse), &mut rng).unwrap();
                        let result = summary.player_result.unwrap();
                        record_race(&mut horse, result.to_record(&card));
                    }
                }
            }
            assert!(horse.within_bounds(), "seed {seed} step {step}: {horse:?}");
            assert!(overall_rating(&horse) <= 100);
            assert!(horse.level >= 1);
        }
    }
}

#[test]
fn foal_stats_never_drop_below_ten() {
    let dam = parent("dam", Gender::Female, 0);
    let sire = parent("sire", Gender::Male, 0);

    let mut rng = StepRng::new(0, 0);
    let stats = inherit_stats(&dam.stats, &sire.stats, &mut rng);
    assert_eq!(stats, CoreStats::uniform(10));

    let mut rng = ChaCha20Rng::seed_from_u64(99);
    for _ in 0..200 {
        let mut dam = dam.clone();
        let report = breed(&mut dam, &sire, GameDate::default(), &mut rng).unwrap();
        for stat in Stat::ALL {
            assert!((10..=100).contains(&report.foal.stats.get(stat)));
        }
    }
}

#[test]
fn dam_cooldown_blocks_until_thirty_days_pass() {
    let mut today = GameDate::new(1, 1, 2030);
    let mut dam = parent("dam", Gender::Female, 60);
    dam.birth_day = today.minus_days(6 * 365);
    let sire = parent("sire", Gender::Male, 60);
    let mut rng = SmallRng::seed_from_u64(4);

    breed(&mut dam, &sire, today, &mut rng).unwrap();
    assert_eq!(dam.breeding_cooldown, 30);
    assert!(breed(&mut dam, &sire, today, &mut rng).is_err());

    today = today.plus_days(29);
    advance(&mut dam, today, 29, &mut rng);
    let before = dam.clone();
    assert!(breed(&mut dam, &sire, today, &mut rng).is_err());
    assert_eq!(dam, before);

    today = today.plus_days(1);
    advance(&mut dam, today, 1, &mut rng);
    assert!(breed(&mut dam, &sire, today, &mut rng).is_ok());
}

#[test]
fn two_year_olds_are_turned_away() {
    let mut card = race("r", Distance::Middle, 1000);
    let mut young = parent("young", Gender::Male, 80);
    young.age = 2;
    let mut rng = SmallRng::seed_from_u64(1);
    match add_entrant(&mut card, &young, "Jo", &mut rng) {
        Err(EntryError::Ineligible { reasons }) => {
            assert!(reasons.iter().any(|r| r.contains("too young")));
        }
        other => panic!("expected ineligible entry, got {other:?}"),
    }
}

#[test]
fn rating_never_falls_as_energy_rises() {
    let mut rng = SmallRng::seed_from_u64(17);
    for _ in 0..40 {
        let mut horse = generate_horse(&GenerationOptions::default(), GameDate::default(), &mut rng);
        let mut previous = 0;
        for energy in 0..=100 {
            horse.energy = energy;
            let rating = overall_rating(&horse);
            assert!(rating >= previous, "energy {energy}: {rating} < {previous}");
            previous = rating;
        }
    }
}

#[test]
fn a_race_is_scored_once_and_pays_the_top_five() {
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    for n in 0..50 {
        let purse = rng.gen_range(1_000..=250_000);
        let mut card = race(&format!("r{n}"), Distance::Sprint, purse);
        let horse = parent("runner", Gender::Female, rng.gen_range(20..=95));
        add_entrant(&mut card, &horse, "Jo", &mut rng).unwrap();

        let summary = run_race(&mut card, Some(&horse), &mut rng).unwrap();
        assert_eq!(summary.results.len(), 8);
        let paid: u64 = summary.results.iter().map(|r| r.prize).sum();
        assert!(paid <= purse);
        for (idx, result) in summary.results.iter().enumerate() {
            assert_eq!(result.position as usize, idx + 1);
            assert_eq!(result.prize, card.prize_for(result.position));
            if result.position > 5 {
                assert_eq!(result.prize, 0);
            }
        }
        let scores: Vec<f64> = summary.results.iter().map(|r| r.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));

        assert_eq!(
            run_race(&mut card, Some(&horse), &mut rng).unwrap_err(),
            RunError::AlreadyRun
        );
        assert_eq!(card.results, summary.results);
    }
}
