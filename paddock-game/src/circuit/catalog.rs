//! Bundled race templates, one list for the daily card and one for specials.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

use crate::calendar::GameDate;
use crate::horse::{Distance, Surface};
use crate::race::{Race, RaceConditions, RaceKind, Requirements, Tier};
use crate::rng::pick;

const DEFAULT_RACE_DATA: &str = include_str!("../../assets/data/races.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("race catalog could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("race catalog has no templates for the {tier} tier")]
    MissingTier { tier: Tier },
    #[error("race catalog has no special race for the {tier} tier")]
    MissingSpecial { tier: Tier },
}

/// Blueprint a scheduled [`Race`] is stamped from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceTemplate {
    pub name: String,
    pub distance: Distance,
    pub surface: Surface,
    /// When non-empty, each instance draws its surface from this list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub surface_choices: Vec<Surface>,
    #[serde(rename = "type")]
    pub kind: RaceKind,
    pub tier: Tier,
    pub difficulty: u8,
    pub purse: u64,
    #[serde(default)]
    pub requirements: Requirements,
}

impl RaceTemplate {
    /// A fresh race scheduled on `day`.
    pub fn instantiate<R>(&self, id: String, day: GameDate, is_special: bool, rng: &mut R) -> Race
    where
        R: Rng + ?Sized,
    {
        let surface = pick(rng, &self.surface_choices)
            .copied()
            .unwrap_or(self.surface);
        let conditions = RaceConditions {
            distance: self.distance,
            surface,
            kind: self.kind,
            tier: self.tier,
        };
        let mut race = Race::new(id, self.name.clone(), conditions, self.difficulty, self.purse);
        race.requirements = self.requirements.clone();
        race.is_special = is_special;
        race.schedule_day = Some(day);
        race
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceCatalog {
    #[serde(default)]
    pub templates: Vec<RaceTemplate>,
    #[serde(default)]
    pub specials: Vec<RaceTemplate>,
}

impl RaceCatalog {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_RACE_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<RaceCatalog> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// Owned copy of the bundled catalog.
    #[must_use]
    pub fn bundled() -> Self {
        Self::default_catalog().clone()
    }

    /// Parse and check a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON, and a missing-tier
    /// error when a tier has no regular template or the low tier has no special.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// # Errors
    ///
    /// See [`RaceCatalog::from_json`].
    pub fn validate(&self) -> Result<(), CatalogError> {
        if let Some(tier) = Tier::ALL
            .into_iter()
            .find(|tier| !self.templates.iter().any(|t| t.tier == *tier))
        {
            return Err(CatalogError::MissingTier { tier });
        }
        if self.special_for(Tier::Low).is_none() {
            return Err(CatalogError::MissingSpecial { tier: Tier::Low });
        }
        Ok(())
    }

    #[must_use]
    pub fn templates_for(&self, tier: Tier, kind: RaceKind) -> Vec<&RaceTemplate> {
        self.templates
            .iter()
            .filter(|t| t.tier == tier && t.kind == kind)
            .collect()
    }

    #[must_use]
    pub fn special_for(&self, tier: Tier) -> Option<&RaceTemplate> {
        self.specials.iter().find(|t| t.tier == tier)
    }
}
