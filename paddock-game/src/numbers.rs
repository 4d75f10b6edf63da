//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it into `[floor, ceiling]` as a `u8`, returning `floor` for NaN.
#[must_use]
pub fn round_f64_to_u8_within(value: f64, floor: u8, ceiling: u8) -> u8 {
    if value.is_nan() {
        return floor;
    }
    let clamped = value.round().clamp(f64::from(floor), f64::from(ceiling));
    cast::<f64, u8>(clamped).unwrap_or(floor)
}

/// Round a f64 and clamp it to the u32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_u32(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    let max = f64::from(u32::MAX);
    let clamped = value.round().clamp(0.0, max);
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Round a f64 and clamp it to the u64 range, returning 0 for non-finite values.
#[must_use]
pub fn round_f64_to_u64(value: f64) -> u64 {
    if !value.is_finite() {
        return 0;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    let clamped = value.round().clamp(0.0, max);
    cast::<f64, u64>(clamped).unwrap_or(0)
}

/// Floor a f64 into the u64 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_u64(value: f64) -> u64 {
    if !value.is_finite() {
        return 0;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    let clamped = value.floor().clamp(0.0, max);
    cast::<f64, u64>(clamped).unwrap_or(0)
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Round to one decimal place.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
