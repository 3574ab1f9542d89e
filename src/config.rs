//! Machine configuration.
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML file,
//! then the `COFFEE_MACHINE_TRACK_CUPS` environment variable.
//!
//! ```toml
//! track_cups = true
//!
//! [capacity]
//! water = 2000        # ml
//! milk = 1000         # ml
//! coffee_beans = 500  # g
//! cups = 100
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::Amount;
use crate::model::Ingredient;
use crate::stock::StockIngredients;

pub const TRACK_CUPS_ENV: &str = "COFFEE_MACHINE_TRACK_CUPS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("capacity for {0} must not be negative")]
    NegativeCapacity(Ingredient),

    #[error("capacity for {ingredient} is out of range: {value}")]
    CapacityOutOfRange { ingredient: Ingredient, value: f64 },

    #[error("{var}: expected true or false, got '{value}'")]
    InvalidEnv { var: &'static str, value: String },
}

/// Maximum (and initial) level of each ingredient.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Capacities {
    pub water: f64,
    pub milk: f64,
    pub coffee_beans: f64,
    pub cups: f64,
}

impl Default for Capacities {
    fn default() -> Self {
        Self {
            water: StockIngredients::WATER_CAPACITY.to_float(),
            milk: StockIngredients::MILK_CAPACITY.to_float(),
            coffee_beans: StockIngredients::COFFEE_BEANS_CAPACITY.to_float(),
            cups: StockIngredients::CUPS_CAPACITY.to_float(),
        }
    }
}

impl Capacities {
    fn raw(&self, ingredient: Ingredient) -> f64 {
        match ingredient {
            Ingredient::Water => self.water,
            Ingredient::Milk => self.milk,
            Ingredient::CoffeeBeans => self.coffee_beans,
            Ingredient::Cups => self.cups,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MachineConfig {
    /// Whether the machine tracks and consumes cups.
    pub track_cups: bool,
    pub capacity: Capacities,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            track_cups: true,
            capacity: Capacities::default(),
        }
    }
}

impl MachineConfig {
    /// Load a config file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded machine config");

        let mut config = Self::from_toml_str(&contents)?;
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in practice).
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup(TRACK_CUPS_ENV) {
            self.track_cups = match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: TRACK_CUPS_ENV,
                        value,
                    });
                }
            };
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for ingredient in Ingredient::ALL {
            let value = self.capacity.raw(ingredient);
            match Amount::try_from_float(value) {
                None => return Err(ConfigError::CapacityOutOfRange { ingredient, value }),
                Some(amount) if amount.is_negative() => {
                    return Err(ConfigError::NegativeCapacity(ingredient));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Capacity of a tracked ingredient; `None` for cups when they are not tracked.
    pub fn capacity(&self, ingredient: Ingredient) -> Option<Amount> {
        if ingredient == Ingredient::Cups && !self.track_cups {
            return None;
        }
        Some(Amount::from_float(self.capacity.raw(ingredient)))
    }

    /// Tracked ingredients with their capacities.
    pub fn capacities(&self) -> impl Iterator<Item = (Ingredient, Amount)> + '_ {
        Ingredient::ALL
            .into_iter()
            .filter_map(|ingredient| self.capacity(ingredient).map(|c| (ingredient, c)))
    }

    /// A freshly stocked machine: every tracked ingredient at capacity.
    pub fn initial_stock(&self) -> StockIngredients {
        StockIngredients::from_levels(self.capacities())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn default_matches_factory_capacities() {
        let config = MachineConfig::default();
        assert!(config.track_cups);
        assert_eq!(
            config.capacity(Ingredient::Water),
            Some(StockIngredients::WATER_CAPACITY)
        );
        assert_eq!(
            config.capacity(Ingredient::Milk),
            Some(StockIngredients::MILK_CAPACITY)
        );
        assert_eq!(
            config.capacity(Ingredient::CoffeeBeans),
            Some(StockIngredients::COFFEE_BEANS_CAPACITY)
        );
        assert_eq!(
            config.capacity(Ingredient::Cups),
            Some(StockIngredients::CUPS_CAPACITY)
        );
        assert_eq!(config.initial_stock(), StockIngredients::with_cups());
    }

    #[test]
    fn untracked_cups_have_no_capacity() {
        let config = MachineConfig {
            track_cups: false,
            ..MachineConfig::default()
        };
        assert_eq!(config.capacity(Ingredient::Cups), None);
        assert_eq!(config.initial_stock(), StockIngredients::new());
    }

    #[test]
    fn parse_partial_file_keeps_defaults() {
        let config = MachineConfig::from_toml_str("[capacity]\nmilk = 1500\n").unwrap();
        assert!(config.track_cups);
        assert_eq!(config.capacity.milk, 1500.0);
        assert_eq!(config.capacity.water, 2000.0);
    }

    #[test]
    fn parse_empty_file_is_default() {
        assert_eq!(
            MachineConfig::from_toml_str("").unwrap(),
            MachineConfig::default()
        );
    }

    #[test]
    fn parse_rejects_unknown_field() {
        let result = MachineConfig::from_toml_str("[capacity]\nsugar = 10\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn parse_rejects_negative_capacity() {
        let result = MachineConfig::from_toml_str("[capacity]\nwater = -1\n");
        assert!(matches!(
            result,
            Err(ConfigError::NegativeCapacity(Ingredient::Water))
        ));
    }

    #[test]
    fn parse_rejects_infinite_capacity() {
        let result = MachineConfig::from_toml_str("[capacity]\nmilk = inf\n");
        assert!(matches!(
            result,
            Err(ConfigError::CapacityOutOfRange {
                ingredient: Ingredient::Milk,
                ..
            })
        ));
    }

    #[test]
    fn parse_rejects_huge_capacity() {
        let result = MachineConfig::from_toml_str("[capacity]\ncoffee_beans = 1e15\n");
        assert!(matches!(
            result,
            Err(ConfigError::CapacityOutOfRange {
                ingredient: Ingredient::CoffeeBeans,
                ..
            })
        ));
    }

    #[test]
    fn override_track_cups() {
        let mut config = MachineConfig::default();
        config
            .apply_overrides(|var| (var == TRACK_CUPS_ENV).then(|| "false".to_string()))
            .unwrap();
        assert!(!config.track_cups);
    }

    #[test]
    fn override_rejects_garbage() {
        let mut config = MachineConfig::default();
        let result = config.apply_overrides(|_| Some("maybe".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidEnv { .. })));
        assert!(config.track_cups);
    }

    #[test]
    fn load_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"track_cups = true\n[capacity]\ncups = 5\n")
            .unwrap();

        let config = MachineConfig::load(file.path()).unwrap();
        assert_eq!(config.capacity(Ingredient::Cups), Some(Amount::from_units(5)));
    }

    #[test]
    fn load_missing_file_fails() {
        let result = MachineConfig::load("/nonexistent/coffee-machine.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
