use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::horse::Trait;
use crate::rng::pick;

const DEFAULT_TRAIT_DATA: &str = include_str!("../assets/data/traits.json");

/// Named trait definitions plus the pool new foal traits are drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TraitCatalog {
    #[serde(default)]
    pub traits: Vec<Trait>,
    #[serde(default)]
    pub foal_pool: Vec<String>,
}

impl TraitCatalog {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_TRAIT_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<TraitCatalog> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a trait catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Trait> {
        self.traits.iter().find(|t| t.name == name)
    }

    /// Resolve a pool name to its full definition, or a bare named trait.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Trait {
        self.find(name)
            .cloned()
            .unwrap_or_else(|| Trait::named(name))
    }

    /// Uniform draw from the foal pool.
    pub fn roll_foal_trait<R>(&self, rng: &mut R) -> Option<Trait>
    where
        R: Rng + ?Sized,
    {
        pick(rng, &self.foal_pool).map(|name| self.resolve(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn bundled_catalog_defines_every_pool_entry() {
        let catalog = TraitCatalog::default_catalog();
        assert_eq!(catalog.foal_pool.len(), 9);
        for name in &catalog.foal_pool {
            assert!(catalog.find(name).is_some(), "missing definition for {name}");
        }
    }

    #[test]
    fn unknown_names_resolve_to_bare_traits() {
        let catalog = TraitCatalog::from_json(r#"{"foalPool": ["Ghost"]}"#).unwrap();
        let mut rng = StepRng::new(0, 0);
        let rolled = catalog.roll_foal_trait(&mut rng).unwrap();
        assert_eq!(rolled, Trait::named("Ghost"));
    }

    #[test]
    fn empty_pool_rolls_nothing() {
        let catalog = TraitCatalog::default();
        let mut rng = StepRng::new(0, 0);
        assert!(catalog.roll_foal_trait(&mut rng).is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(TraitCatalog::from_json("{ not json").is_err());
    }
}
