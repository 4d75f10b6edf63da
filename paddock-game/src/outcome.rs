//! One JSON shape for every engine operation: `{success, message, reasons?,
//! ...payload}`.
//!
//! Engine functions return `Result<Report, Error>`. Callers that hand results
//! straight to a UI convert with `Outcome::from(result)`; the report's fields
//! are flattened next to the envelope keys.
use serde::{Deserialize, Serialize};

use crate::circuit::{CircuitError, UpdateReport};
use crate::genetics::{BreedingError, BreedingReport};
use crate::progression::{
    AdvanceReport, CareReport, RecordReport, RestReport, TrainingError, TrainingReport,
};
use crate::race::{EntryError, EntryReport, RaceSummary, RunError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
    #[serde(flatten)]
    pub payload: Option<T>,
}

impl<T> Outcome<T> {
    pub fn success(message: impl Into<String>, payload: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            reasons: Vec::new(),
            payload: Some(payload),
        }
    }

    pub fn rejected<E>(err: &E) -> Self
    where
        E: Rejection,
    {
        Self {
            success: false,
            message: err.to_string(),
            reasons: err.reasons(),
            payload: None,
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T>
where
    T: Summary,
    E: Rejection,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(report) => {
                let message = report.summary();
                Self::success(message, report)
            }
            Err(err) => Self::rejected(&err),
        }
    }
}

/// Human-readable line for a successful report.
pub trait Summary {
    fn summary(&self) -> String;
}

/// An expected failure; `Display` is the message.
pub trait Rejection: std::error::Error {
    /// Itemized reasons, when the failure has more than one cause.
    fn reasons(&self) -> Vec<String> {
        Vec::new()
    }
}

impl Rejection for TrainingError {}
impl Rejection for BreedingError {}
impl Rejection for RunError {}

impl Rejection for EntryError {
    fn reasons(&self) -> Vec<String> {
        match self {
            Self::Ineligible { reasons } => reasons.clone(),
            _ => Vec::new(),
        }
    }
}

impl Rejection for CircuitError {
    fn reasons(&self) -> Vec<String> {
        match self {
            Self::Entry(err) => err.reasons(),
            _ => Vec::new(),
        }
    }
}

impl Summary for TrainingReport {
    fn summary(&self) -> String {
        self.message()
    }
}

impl Summary for RestReport {
    fn summary(&self) -> String {
        format!(
            "Horse rested. Energy +{}, Health +{}",
            self.energy_recovered, self.health_recovered
        )
    }
}

impl Summary for CareReport {
    fn summary(&self) -> String {
        self.message.clone()
    }
}

impl Summary for RecordReport {
    fn summary(&self) -> String {
        String::from("Race recorded")
    }
}

impl Summary for AdvanceReport {
    fn summary(&self) -> String {
        if self.has_aged {
            format!("Horse is now {} years old", self.age)
        } else {
            String::from("Horse updated")
        }
    }
}

impl Summary for BreedingReport {
    fn summary(&self) -> String {
        self.message.clone()
    }
}

impl Summary for EntryReport {
    fn summary(&self) -> String {
        self.message.clone()
    }
}

impl Summary for RaceSummary {
    fn summary(&self) -> String {
        self.message.clone()
    }
}

impl Summary for UpdateReport {
    fn summary(&self) -> String {
        self.message.clone()
    }
}
