use paddock_game::race::{injury_chance, roll_injury};
use paddock_game::{
    Breed, Circuit, Distance, GameDate, Gender, HistoryEntry, Horse, HorseId, InjuryOutcome,
    Intensity, RaceResult, Stat, Tier, train,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_chacha::ChaCha20Rng;

const SAMPLE_SIZE: u32 = 20_000;

fn observed(hits: u32) -> f64 {
    f64::from(hits) / f64::from(SAMPLE_SIZE)
}

fn colt() -> Horse {
    Horse::new(HorseId::new("c"), "Comet", Gender::Male, Breed::Mustang)
}

#[test]
fn intense_training_setback_rate_tracks_thirty_percent() {
    let mut rng = SmallRng::seed_from_u64(31);
    let mut horse = colt();
    let mut setbacks = 0;
    for _ in 0..SAMPLE_SIZE {
        horse.energy = 100;
        horse.stats.speed = 50;
        let report = train(&mut horse, Stat::Speed, Intensity::Intense, &mut rng).unwrap();
        if report.secondary_loss.is_some() {
            setbacks += 1;
        }
    }
    let rate = observed(setbacks);
    assert!((rate - 0.3).abs() <= 0.015, "setback rate drifted: {rate:.4}");
}

#[test]
fn injury_rate_matches_computed_chance() {
    let mut horse = colt();
    horse.energy = 10;
    horse.health = 10;
    let expected = injury_chance(&horse, Distance::Long);
    assert!((expected - 0.03375).abs() < 1e-12);

    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let mut injuries = 0;
    for _ in 0..SAMPLE_SIZE {
        let outcome = roll_injury(&horse, Distance::Long, &mut rng);
        if outcome.injured {
            assert!((1..=3).contains(&outcome.severity));
            assert!((1..=16).contains(&outcome.duration));
            injuries += 1;
        }
    }
    let rate = observed(injuries);
    assert!(
        (rate - expected).abs() <= 0.006,
        "injury rate drifted: {rate:.4}"
    );
}

fn winning_entry(n: u32) -> HistoryEntry {
    let result = RaceResult {
        entrant_index: 0,
        horse_id: HorseId::new("c"),
        horse_name: "Comet".into(),
        jockey_name: "Jo".into(),
        player_owned: true,
        odds: 2.0,
        score: 90.0,
        time: 110.0,
        formatted_time: "1:50.00".into(),
        energy_used: 30,
        injury: InjuryOutcome::none(),
        experience: 50,
        position: 1,
        prize: 60_000,
    };
    HistoryEntry {
        race_id: format!("race-{n}"),
        race_name: "Grand Derby".into(),
        date: None,
        tier: Tier::Elite,
        results: vec![result.clone()],
        player_results: vec![result],
    }
}

#[test]
fn tier_draws_follow_normalized_weights() {
    let mut circuit = Circuit::new(GameDate::default());
    for n in 0..20 {
        circuit.record_history(winning_entry(n));
    }
    assert_eq!(circuit.calculate_reputation(), 400);
    assert_eq!(circuit.unlocked_tiers(), &Tier::ALL);

    let mut rng = ChaCha20Rng::seed_from_u64(12);
    let mut counts = [0_u32; 4];
    for _ in 0..SAMPLE_SIZE {
        let tier = circuit.select_tier(&mut rng);
        let idx = Tier::ALL.iter().position(|t| *t == tier).unwrap();
        counts[idx] += 1;
    }
    for (count, expected) in counts.into_iter().zip([0.5, 0.3, 0.15, 0.05]) {
        let rate = observed(count);
        assert!(
            (rate - expected).abs() <= 0.015,
            "tier share drifted: {rate:.4} vs {expected}"
        );
    }
}

#[test]
fn partial_unlock_renormalizes_weights() {
    let mut circuit = Circuit::new(GameDate::default());
    for n in 0..3 {
        circuit.record_history(winning_entry(n));
    }
    // Three elite wins: 60 points, medium only.
    assert_eq!(circuit.calculate_reputation(), 60);
    assert_eq!(circuit.unlocked_tiers(), &[Tier::Low, Tier::Medium]);

    let mut rng = ChaCha20Rng::seed_from_u64(13);
    let low = (0..SAMPLE_SIZE)
        .filter(|_| circuit.select_tier(&mut rng) == Tier::Low)
        .count();
    let rate = observed(u32::try_from(low).unwrap());
    assert!((rate - 0.625).abs() <= 0.015, "low share drifted: {rate:.4}");
}
