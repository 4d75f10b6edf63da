//! Currency amounts the engine quotes. Balances belong to the caller.
use crate::attributes::{market_value, overall_rating};
use crate::constants::{STUD_FEE_SHARE, TRAINING_COST_PER_INTENSITY};
use crate::horse::Horse;
use crate::numbers::{round_f64_to_u64, u64_to_f64};
use crate::progression::{CareKind, Intensity};

/// `round(50 * intensity * (1 + rating / 100))`.
#[must_use]
pub fn training_cost(horse: &Horse, intensity: Intensity) -> u64 {
    let rating = f64::from(overall_rating(horse));
    round_f64_to_u64(
        TRAINING_COST_PER_INTENSITY * f64::from(intensity.level()) * (1.0 + rating / 100.0),
    )
}

#[must_use]
pub const fn care_cost(kind: CareKind) -> u64 {
    match kind {
        CareKind::Groom => 100,
        CareKind::Veterinarian => 500,
        CareKind::Feed => 200,
        CareKind::Massage => 300,
    }
}

/// Fee for covering a mare, 15% of the stallion's value.
#[must_use]
pub fn stud_fee(horse: &Horse) -> u64 {
    round_f64_to_u64(u64_to_f64(market_value(horse)) * STUD_FEE_SHARE)
}

#[must_use]
pub fn sale_value(horse: &Horse) -> u64 {
    market_value(horse)
}
