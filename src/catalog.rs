//! Read-only word catalog: modules, units and their words.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::models::{Module, Unit};

/// Bundled catalog: Grade 5, volume 1
const BUNDLED_CATALOG: &str = include_str!("../bundled_catalog/grade5-volume1.json");

/// All modules available to the learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub name: String,
    pub modules: Vec<Module>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CATALOG).context("Failed to parse bundled catalog")
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {:?}", path))?;
        Self::from_json(&json).with_context(|| format!("Failed to parse catalog file: {:?}", path))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.check_duplicates();
        info!(
            catalog = %catalog.name,
            modules = catalog.modules.len(),
            words = catalog.total_words(),
            "Loaded word catalog"
        );
        Ok(catalog)
    }

    fn check_duplicates(&self) {
        for module in &self.modules {
            for unit in &module.units {
                let dupes = unit.duplicate_words();
                if !dupes.is_empty() {
                    warn!(unit_id = %unit.id, duplicates = ?dupes, "Unit has repeated words");
                }
            }
        }
    }

    pub fn module_by_id(&self, module_id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    /// Find a unit and its module by exact id.
    pub fn unit_by_id(&self, unit_id: &str) -> Option<(&Module, &Unit)> {
        self.modules.iter().find_map(|module| {
            module
                .units
                .iter()
                .find(|unit| unit.id == unit_id)
                .map(|unit| (module, unit))
        })
    }

    /// Every unit that has at least one word, in catalog order.
    pub fn all_units(&self) -> Vec<(&Module, &Unit)> {
        self.modules
            .iter()
            .flat_map(|module| module.units.iter().map(move |unit| (module, unit)))
            .filter(|(_, unit)| !unit.is_empty())
            .collect()
    }

    pub fn total_words(&self) -> usize {
        self.modules
            .iter()
            .flat_map(|m| &m.units)
            .map(|u| u.words.len())
            .sum()
    }
}
