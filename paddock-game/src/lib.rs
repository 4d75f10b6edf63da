//! Paddock Game Engine
//!
//! Simulation core for a horse stable-management game: the attribute model,
//! day-to-day progression, breeding genetics and race simulation, plus the
//! race circuit and horse generation built on top of them.
//!
//! The engine performs no I/O. Every entity serializes to a flat camelCase
//! JSON shape so callers can persist state however they like, and every
//! operation that draws randomness takes the generator as an argument.

pub mod attributes;
pub mod calendar;
pub mod circuit;
pub mod constants;
pub mod economy;
pub mod generation;
pub mod genetics;
pub mod horse;
pub mod names;
pub mod numbers;
pub mod outcome;
pub mod progression;
pub mod race;
pub mod rng;
pub mod traits;

// Re-export commonly used types
pub use attributes::{DistanceFit, average_rating, market_value, overall_rating};
pub use calendar::GameDate;
pub use circuit::{
    CatalogError, Circuit, CircuitConfig, CircuitConfigError, CircuitError, HistoryEntry,
    HorseHistoryEntry, RaceCatalog, RaceTemplate, UpdateReport,
};
pub use economy::{care_cost, sale_value, stud_fee, training_cost};
pub use generation::{
    Difficulty, GenerationOptions, breeding_candidates, generate_horse, market_horses,
    starter_horse,
};
pub use genetics::{BreedingError, BreedingReport, breed, breed_with_catalog, check_breeding};
pub use horse::{
    Breed, CoatColor, CoreStats, Distance, Gender, Horse, HorseId, InjuryOutcome, Lineage,
    RaceRecord, Stat, Surface, Trait, TraitSet,
};
pub use outcome::{Outcome, Rejection, Summary};
pub use progression::{
    AdvanceReport, CareKind, CareReport, Intensity, RecordReport, RestReport, StatChange,
    TrainingError, TrainingReport, advance, provide_care, record_race, rest, train,
};
pub use race::{
    AiHorse, Eligibility, Entrant, EntryError, EntryReport, Phase, Race, RaceConditions,
    RaceKind, RaceResult, RaceSummary, Requirements, RunError, Tier, add_entrant,
    check_eligibility, run_race,
};
pub use rng::{CountingRng, RngBundle};
pub use traits::TraitCatalog;
