//! # Settings Module
//!
//! ## Purpose
//! Persistent defaults for unit-aware model definitions: the simulation unit policy
//! (concentration, time, optional volume) and an optional molecule volume. Settings
//! are stored as pretty-printed JSON and applied to a `Model` before its components
//! are declared.
//!
//! ## Usage Pattern
//! ```rust
//! use KinUnits::settings::UnitsSettings;
//! use KinUnits::Model::model::Model;
//!
//! let settings = UnitsSettings::default();
//! let mut model = Model::new("m");
//! settings.apply(&mut model).unwrap();
//! assert_eq!(model.simulation_units().unwrap().concentration(), "uM");
//! ```
//!
//! ## File Layout
//! | Field | Default |
//! |-------|---------|
//! | "concentration" | "uM" |
//! | "time" | "s" |
//! | "volume" | null |
//! | "molecule_volume" | null, or `[value, "unit"]` |

use crate::Model::model::Model;
use crate::Model::model_errors::ModelError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default simulation units and molecule volume of new models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitsSettings {
    pub concentration: String,
    pub time: String,
    #[serde(default)]
    pub volume: Option<String>,
    /// (value, unit) of the volume used for molar to molecule conversions
    #[serde(default)]
    pub molecule_volume: Option<(f64, String)>,
}

impl Default for UnitsSettings {
    fn default() -> Self {
        Self {
            concentration: "uM".to_string(),
            time: "s".to_string(),
            volume: None,
            molecule_volume: None,
        }
    }
}

impl UnitsSettings {
    /// Reads settings from `config_file`, falling back to defaults when the file is
    /// missing.
    pub fn load(config_file: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            let settings: UnitsSettings = serde_json::from_str(&content)?;
            info!("loaded units settings from {}", config_file);
            Ok(settings)
        } else {
            warn!("{} not found, using default units settings", config_file);
            Ok(Self::default())
        }
    }

    pub fn save(&self, config_file: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_file, content)?;
        info!("saved units settings to {}", config_file);
        Ok(())
    }

    /// Installs the molecule volume first, then the simulation unit policy.
    pub fn apply(&self, model: &mut Model) -> Result<(), ModelError> {
        if let Some((value, unit)) = &self.molecule_volume {
            model.set_molecule_volume(*value, unit)?;
        }
        model.set_simulation_units(&self.concentration, &self.time, self.volume.as_deref())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Units::unit_errors::UnitError;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_save_and_load() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path().to_str().unwrap();
        let settings = UnitsSettings {
            concentration: "molecules".to_string(),
            time: "s".to_string(),
            volume: Some("pL".to_string()),
            molecule_volume: Some((1.0, "pL".to_string())),
        };
        settings.save(path).unwrap();
        assert_eq!(UnitsSettings::load(path).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let loaded = UnitsSettings::load("no_such_units_settings.json").unwrap();
        assert_eq!(loaded, UnitsSettings::default());
    }

    #[test]
    fn test_partial_file_and_apply() {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, r#"{{"concentration": "nM", "time": "min"}}"#).unwrap();
        let settings = UnitsSettings::load(temp.path().to_str().unwrap()).unwrap();
        assert_eq!(settings.volume, None);

        let mut model = Model::new("settings");
        settings.apply(&mut model).unwrap();
        model.parameter("k", 60.0, Some("1/s")).unwrap();
        assert_relative_eq!(model.parameter_value("k").unwrap(), 3600.0, max_relative = 1e-12);
        assert_eq!(model.simulation_units().unwrap().time(), "min");
    }

    #[test]
    fn test_apply_rejects_non_concentration() {
        let settings = UnitsSettings {
            concentration: "s".to_string(),
            ..Default::default()
        };
        let mut model = Model::new("bad");
        assert!(matches!(
            settings.apply(&mut model).unwrap_err(),
            ModelError::Units(UnitError::WrongUnit(_))
        ));
        assert!(model.simulation_units().is_none());
    }
}
