//! JSON model descriptions.
//!
//! A description lists monomers, parameters, observables, expressions, initials,
//! rules and extra unit assignments. Building it runs inside `define_with_units`,
//! so every loaded model is unit-checked.
//!
//! ```json
//! {
//!   "name": "binding",
//!   "settings": {"concentration": "uM", "time": "s"},
//!   "monomers": [{"name": "A", "sites": ["b"]}, {"name": "B", "sites": ["a"]}],
//!   "parameters": [
//!     {"name": "kf", "value": 1.0, "unit": "1/(uM*s)"},
//!     {"name": "kr", "value": 0.1, "unit": "1/s"}
//!   ],
//!   "rules": [{"name": "bind", "expression": "A(b=None) + B(a=None) | A(b=1) % B(a=1)",
//!              "rate_forward": "kf", "rate_reverse": "kr"}]
//! }
//! ```
use crate::Model::model::Model;
use crate::Model::model_errors::ModelError;
use crate::Units::define_with_units::{UnitsDefinition, define_with_units};
use crate::settings::UnitsSettings;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonomerDescription {
    pub name: String,
    #[serde(default)]
    pub sites: Vec<String>,
    #[serde(default)]
    pub site_states: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescription {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub convert: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionDescription {
    pub name: String,
    pub expr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservableDescription {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub convert: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialDescription {
    pub pattern: String,
    pub value: String,
    #[serde(default)]
    pub fixed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescription {
    pub name: String,
    pub expression: String,
    pub rate_forward: String,
    #[serde(default)]
    pub rate_reverse: Option<String>,
    #[serde(default)]
    pub energy: bool,
}

/// A unit attached after the component was declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDescription {
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub convert: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelDescription {
    pub name: String,
    #[serde(default)]
    pub settings: Option<UnitsSettings>,
    #[serde(default)]
    pub monomers: Vec<MonomerDescription>,
    #[serde(default)]
    pub parameters: Vec<ParameterDescription>,
    #[serde(default)]
    pub observables: Vec<ObservableDescription>,
    #[serde(default)]
    pub expressions: Vec<ExpressionDescription>,
    #[serde(default)]
    pub initials: Vec<InitialDescription>,
    #[serde(default)]
    pub rules: Vec<RuleDescription>,
    #[serde(default)]
    pub units: Vec<UnitDescription>,
}

impl ModelDescription {
    fn declare(&self, model: &mut Model) -> Result<(), ModelError> {
        if let Some(settings) = &self.settings {
            settings.apply(model)?;
        }
        for m in &self.monomers {
            let sites: Vec<&str> = m.sites.iter().map(String::as_str).collect();
            let states: Vec<(&str, Vec<&str>)> = m
                .site_states
                .iter()
                .map(|(site, states)| (site.as_str(), states.iter().map(String::as_str).collect()))
                .collect();
            let states: Vec<(&str, &[&str])> =
                states.iter().map(|(site, s)| (*site, s.as_slice())).collect();
            model.monomer(&m.name, &sites, &states)?;
        }
        for p in &self.parameters {
            model.parameter_with_conversion(&p.name, p.value, p.unit.as_deref(), p.convert.as_deref())?;
        }
        for o in &self.observables {
            if o.unit.is_some() {
                model.observable_with_units(&o.name, &o.pattern, o.unit.as_deref(), o.convert.as_deref())?;
            } else {
                model.observable(&o.name, &o.pattern)?;
            }
        }
        for e in &self.expressions {
            model.expression_from_str(&e.name, &e.expr)?;
        }
        for i in &self.initials {
            model.initial(&i.pattern, &i.value, i.fixed)?;
        }
        for r in &self.rules {
            model.add_rule(
                &r.name,
                &r.expression,
                &r.rate_forward,
                r.rate_reverse.as_deref(),
                r.energy,
            )?;
        }
        for u in &self.units {
            model.add_units(&u.name, u.unit.as_deref(), u.convert.as_deref())?;
        }
        Ok(())
    }

    /// Builds the model inside `define_with_units`.
    pub fn build(&self) -> Result<UnitsDefinition, ModelError> {
        define_with_units(&self.name, |model| self.declare(model))
    }
}

/// Reads a model description from a JSON file.
pub fn load_model_description(file_name: &str) -> Result<ModelDescription, String> {
    let path = Path::new(file_name);
    if !path.exists() {
        return Err(format!("File '{}' does not exist", file_name));
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return Err(format!("Failed to open file '{}': {}", file_name, e)),
    };
    match serde_json::from_str::<ModelDescription>(&content) {
        Ok(description) => {
            info!(
                "loaded model '{}' from '{}': {} parameters, {} rules",
                description.name,
                file_name,
                description.parameters.len(),
                description.rules.len()
            );
            Ok(description)
        }
        Err(e) => {
            error!("Failed to parse model file '{}': {}", file_name, e);
            Err(format!("Failed to parse model file '{}': {}", file_name, e))
        }
    }
}

/// Loads, builds and unit-checks the model described in `file_name`.
pub fn load_model_from_file(file_name: &str) -> Result<UnitsDefinition, String> {
    let description = load_model_description(file_name)?;
    description.build().map_err(|e| {
        error!("model '{}' from '{}': {}", description.name, file_name, e);
        format!("Failed to build model '{}': {}", description.name, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Units::unit_errors::UnitsWarning;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BINDING: &str = r#"{
        "name": "binding",
        "settings": {"concentration": "uM", "time": "s"},
        "monomers": [
            {"name": "A", "sites": ["b"]},
            {"name": "B", "sites": ["a", "y"], "site_states": {"y": ["U", "P"]}}
        ],
        "parameters": [
            {"name": "kf", "value": 1.0, "unit": "1/(nM*s)"},
            {"name": "kr", "value": 0.1, "unit": "1/s"},
            {"name": "A0", "value": 100.0, "unit": "nM"},
            {"name": "scale", "value": 2.0}
        ],
        "observables": [{"name": "AB", "pattern": "A(b=1) % B(a=1)"}],
        "initials": [{"pattern": "A(b=None)", "value": "A0"}],
        "rules": [
            {"name": "bind", "expression": "A(b=None) + B(a=None) | A(b=1) % B(a=1)",
             "rate_forward": "kf", "rate_reverse": "kr"}
        ]
    }"#;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(content.as_bytes()).unwrap();
        temp
    }

    #[test]
    fn test_load_and_build() {
        let temp = write_temp(BINDING);
        let definition = load_model_from_file(temp.path().to_str().unwrap()).unwrap();
        let model = &definition.model;
        assert_eq!(model.name, "binding");
        assert_relative_eq!(model.parameter_value("kf").unwrap(), 1000.0, max_relative = 1e-12);
        assert_relative_eq!(model.parameter_value("A0").unwrap(), 0.1, max_relative = 1e-12);
        assert_eq!(model.unit_map()["AB"], "uM");
        assert_eq!(model.rules().len(), 1);
        assert_eq!(
            definition.warnings,
            vec![UnitsWarning::MissingUnits {
                name: "scale".to_string()
            }]
        );
    }

    #[test]
    fn test_unit_errors_are_reported() {
        let broken = BINDING.replace("\"1/s\"", "\"1/(uM*s)\"");
        let temp = write_temp(&broken);
        let err = load_model_from_file(temp.path().to_str().unwrap()).unwrap_err();
        assert!(err.contains("WrongUnitError"));
    }

    #[test]
    fn test_malformed_expression_is_reported() {
        let broken = BINDING.replace(
            r#""initials":"#,
            r#""expressions": [{"name": "flux", "expr": "kf*("}],
        "initials":"#,
        );
        let temp = write_temp(&broken);
        let err = load_model_from_file(temp.path().to_str().unwrap()).unwrap_err();
        assert!(err.contains("invalid expression 'kf*('"));
    }

    #[test]
    fn test_bad_files() {
        assert!(load_model_from_file("no_such_model.json").is_err());
        let temp = write_temp("{ not json");
        let err = load_model_description(temp.path().to_str().unwrap()).unwrap_err();
        assert!(err.starts_with("Failed to parse model file"));
    }
}
