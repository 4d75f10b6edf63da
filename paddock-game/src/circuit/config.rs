use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::race::Tier;

/// Tuning for the race circuit: schedule density, history and reputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitConfig {
    #[serde(default = "CircuitConfig::default_max_history")]
    pub max_history: usize,
    /// Most recent history entries that count toward reputation.
    #[serde(default = "CircuitConfig::default_reputation_window")]
    pub reputation_window: usize,
    #[serde(default = "CircuitConfig::default_medium_unlock")]
    pub medium_unlock: u32,
    #[serde(default = "CircuitConfig::default_high_unlock")]
    pub high_unlock: u32,
    #[serde(default = "CircuitConfig::default_elite_unlock")]
    pub elite_unlock: u32,
    #[serde(default = "CircuitConfig::default_weekday_races")]
    pub weekday_races: u32,
    #[serde(default = "CircuitConfig::default_weekend_races")]
    pub weekend_races: u32,
    #[serde(default = "CircuitConfig::default_jump_chance")]
    pub jump_chance: f64,
    #[serde(default = "CircuitConfig::default_special_chance")]
    pub special_chance: f64,
    /// Days of unrun races `update` keeps on the card.
    #[serde(default = "CircuitConfig::default_schedule_days")]
    pub schedule_days: u32,
}

impl CircuitConfig {
    const fn default_max_history() -> usize {
        50
    }

    const fn default_reputation_window() -> usize {
        20
    }

    const fn default_medium_unlock() -> u32 {
        30
    }

    const fn default_high_unlock() -> u32 {
        100
    }

    const fn default_elite_unlock() -> u32 {
        250
    }

    const fn default_weekday_races() -> u32 {
        3
    }

    const fn default_weekend_races() -> u32 {
        5
    }

    const fn default_jump_chance() -> f64 {
        0.2
    }

    const fn default_special_chance() -> f64 {
        0.3
    }

    const fn default_schedule_days() -> u32 {
        7
    }

    /// Reputation needed before races of `tier` are scheduled.
    #[must_use]
    pub const fn unlock_threshold(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Low => 0,
            Tier::Medium => self.medium_unlock,
            Tier::High => self.high_unlock,
            Tier::Elite => self.elite_unlock,
        }
    }

    /// # Errors
    ///
    /// Returns `CircuitConfigError` when a count is zero or out of range, a
    /// probability leaves `[0, 1]`, or unlock thresholds do not strictly rise.
    pub fn validate(&self) -> Result<(), CircuitConfigError> {
        if self.max_history == 0 {
            return Err(CircuitConfigError::MinViolation {
                field: "max_history",
                min: 1,
                value: 0,
            });
        }
        if self.reputation_window == 0 || self.reputation_window > self.max_history {
            return Err(CircuitConfigError::WindowExceedsHistory {
                window: self.reputation_window,
                history: self.max_history,
            });
        }
        if self.medium_unlock == 0
            || self.medium_unlock >= self.high_unlock
            || self.high_unlock >= self.elite_unlock
        {
            return Err(CircuitConfigError::UnlockOrder {
                medium: self.medium_unlock,
                high: self.high_unlock,
                elite: self.elite_unlock,
            });
        }
        for (field, value) in [
            ("weekday_races", self.weekday_races),
            ("weekend_races", self.weekend_races),
            ("schedule_days", self.schedule_days),
        ] {
            if value == 0 {
                return Err(CircuitConfigError::MinViolation {
                    field,
                    min: 1,
                    value: 0,
                });
            }
        }
        for (field, value) in [
            ("jump_chance", self.jump_chance),
            ("special_chance", self.special_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CircuitConfigError::ProbabilityRange { field, value });
            }
        }
        Ok(())
    }
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            max_history: Self::default_max_history(),
            reputation_window: Self::default_reputation_window(),
            medium_unlock: Self::default_medium_unlock(),
            high_unlock: Self::default_high_unlock(),
            elite_unlock: Self::default_elite_unlock(),
            weekday_races: Self::default_weekday_races(),
            weekend_races: Self::default_weekend_races(),
            jump_chance: Self::default_jump_chance(),
            special_chance: Self::default_special_chance(),
            schedule_days: Self::default_schedule_days(),
        }
    }
}

/// Errors raised when circuit configuration invariants are violated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CircuitConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: u32,
        value: u32,
    },
    #[error("{field} must be between 0.00 and 1.00 (got {value:.2})")]
    ProbabilityRange { field: &'static str, value: f64 },
    #[error("reputation window {window} must be between 1 and max history {history}")]
    WindowExceedsHistory { window: usize, history: usize },
    #[error("unlock thresholds must rise strictly (medium {medium}, high {high}, elite {elite})")]
    UnlockOrder { medium: u32, high: u32, elite: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = CircuitConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.unlock_threshold(Tier::High), 100);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: CircuitConfig = serde_json::from_str(r#"{ "weekendRaces": 6 }"#).unwrap();
        assert_eq!(config.weekend_races, 6);
        assert_eq!(config.max_history, 50);
        assert!((config.special_chance - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_values_are_reported() {
        let unordered = CircuitConfig {
            high_unlock: 300,
            ..CircuitConfig::default()
        };
        assert_eq!(
            unordered.validate(),
            Err(CircuitConfigError::UnlockOrder {
                medium: 30,
                high: 300,
                elite: 250
            })
        );

        let odd = CircuitConfig {
            jump_chance: 1.5,
            ..CircuitConfig::default()
        };
        assert_eq!(
            odd.validate().unwrap_err().to_string(),
            "jump_chance must be between 0.00 and 1.00 (got 1.50)"
        );

        let wide = CircuitConfig {
            reputation_window: 60,
            ..CircuitConfig::default()
        };
        assert!(matches!(
            wide.validate(),
            Err(CircuitConfigError::WindowExceedsHistory { .. })
        ));
    }
}
