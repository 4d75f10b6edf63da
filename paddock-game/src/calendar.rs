//! Game calendar: 30-day months, 12 months a year.
//!
//! Ages are measured in 365-day years against the day ordinal, so a horse
//! ages slightly slower than the calendar year turns over.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DAYS_PER_MONTH, DAYS_PER_YEAR, MONTHS_PER_YEAR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

impl Default for GameDate {
    fn default() -> Self {
        Self::new(1, 1, 2023)
    }
}

impl GameDate {
    /// Build a date, normalizing out-of-range day/month values.
    #[must_use]
    pub fn new(day: u32, month: u32, year: u32) -> Self {
        let probe = Self { year, month: 1, day: 1 };
        let offset = i64::from(month.max(1) - 1) * i64::from(DAYS_PER_MONTH)
            + i64::from(day.max(1) - 1);
        Self::from_ordinal(probe.ordinal() + offset)
    }

    /// Days elapsed since day 1 of month 1 of year 0.
    #[must_use]
    pub fn ordinal(&self) -> i64 {
        let months = i64::from(self.year) * i64::from(MONTHS_PER_YEAR)
            + i64::from(self.month.saturating_sub(1));
        months * i64::from(DAYS_PER_MONTH) + i64::from(self.day.saturating_sub(1))
    }

    /// Inverse of [`GameDate::ordinal`]; negative ordinals clamp to the epoch.
    #[must_use]
    pub fn from_ordinal(ordinal: i64) -> Self {
        let ordinal = u64::try_from(ordinal).unwrap_or(0);
        let per_month = u64::from(DAYS_PER_MONTH);
        let per_year = u64::from(MONTHS_PER_YEAR);
        let months = ordinal / per_month;
        let day = ordinal % per_month + 1;
        let month = months % per_year + 1;
        let year = months / per_year;
        Self {
            year: u32::try_from(year).unwrap_or(u32::MAX),
            month: u32::try_from(month).unwrap_or(1),
            day: u32::try_from(day).unwrap_or(1),
        }
    }

    /// The date `days` after this one.
    #[must_use]
    pub fn plus_days(self, days: u32) -> Self {
        Self::from_ordinal(self.ordinal() + i64::from(days))
    }

    /// The date `days` before this one.
    #[must_use]
    pub fn minus_days(self, days: u32) -> Self {
        Self::from_ordinal(self.ordinal() - i64::from(days))
    }

    /// Advance in place by `days`.
    pub fn advance(&mut self, days: u32) {
        *self = self.plus_days(days);
    }

    /// Signed day difference `self - earlier`.
    #[must_use]
    pub fn days_since(&self, earlier: &Self) -> i64 {
        self.ordinal() - earlier.ordinal()
    }

    /// Whole 365-day years elapsed since `birth`, zero if `birth` is in the future.
    #[must_use]
    pub fn years_since(&self, birth: &Self) -> u32 {
        let days = self.days_since(birth).max(0);
        u32::try_from(days / i64::from(DAYS_PER_YEAR)).unwrap_or(u32::MAX)
    }

    /// Day of week 1..=7, with day 1 of each month counted as day 1.
    #[must_use]
    pub fn day_of_week(&self) -> u32 {
        (self.day.max(1) - 1) % 7 + 1
    }

    #[must_use]
    pub fn is_weekend(&self) -> bool {
        matches!(self.day_of_week(), 6 | 7)
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_rolls_months_and_years() {
        let mut date = GameDate::new(30, 12, 2023);
        date.advance(1);
        assert_eq!(date, GameDate::new(1, 1, 2024));

        let mut mid = GameDate::new(29, 3, 2023);
        mid.advance(2);
        assert_eq!(mid, GameDate::new(1, 4, 2023));
    }

    #[test]
    fn ordinal_round_trips() {
        let date = GameDate::new(17, 8, 2031);
        assert_eq!(GameDate::from_ordinal(date.ordinal()), date);
        assert_eq!(date.plus_days(400).minus_days(400), date);
    }

    #[test]
    fn new_normalizes_overflowing_days() {
        assert_eq!(GameDate::new(31, 1, 2023), GameDate::new(1, 2, 2023));
        assert_eq!(GameDate::new(0, 0, 2023), GameDate::new(1, 1, 2023));
    }

    #[test]
    fn years_since_uses_365_day_years() {
        let birth = GameDate::new(1, 1, 2020);
        assert_eq!(birth.plus_days(364).years_since(&birth), 0);
        assert_eq!(birth.plus_days(365).years_since(&birth), 1);
        assert_eq!(birth.years_since(&birth.plus_days(10)), 0);
    }

    #[test]
    fn weekends_fall_on_days_six_and_seven() {
        assert!(GameDate::new(6, 1, 2023).is_weekend());
        assert!(GameDate::new(14, 1, 2023).is_weekend());
        assert!(!GameDate::new(8, 1, 2023).is_weekend());
    }
}
