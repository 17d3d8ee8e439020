use super::classifier::is_concentration;
use super::simulation_units::{MoleculeVolume, SimulationUnits, conversion_factor};
use super::unit_errors::UnitError;
use crate::UnitRegistry::unit_definitions::parse_unit;
use crate::UnitRegistry::unit_value::UnitValue;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of component a unit annotation is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectKind {
    Parameter,
    Expression,
    Observable,
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubjectKind::Parameter => "Parameter",
            SubjectKind::Expression => "Expression",
            SubjectKind::Observable => "Observable",
        };
        write!(f, "{}", name)
    }
}

/// Binds one model component to one unit.
///
/// `subject` is the index of the component in the model's component list. The
/// record is immutable: conversions produce a new annotation together with the
/// rescaled component value, and the model swaps both in at once.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitAnnotation {
    subject: usize,
    subject_name: String,
    kind: SubjectKind,
    unit_string: String,
    unit: UnitValue,
    conversion_factor: Option<f64>,
    obs_pattern: Option<String>,
}

fn parse_or_unknown(unit_string: &str, context: &str) -> Result<UnitValue, UnitError> {
    parse_unit(unit_string).map_err(|e| {
        UnitError::UnknownUnit(format!(
            "Unrecognizable unit pattern '{}'{} ({})",
            unit_string, context, e.reason
        ))
    })
}

/// `None` means dimensionless.
fn unit_or_one(unit: Option<&str>) -> &str {
    unit.unwrap_or("1")
}

impl UnitAnnotation {
    pub fn subject(&self) -> usize {
        self.subject
    }
    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }
    pub fn kind(&self) -> SubjectKind {
        self.kind
    }
    pub fn unit_string(&self) -> &str {
        &self.unit_string
    }
    pub fn unit(&self) -> &UnitValue {
        &self.unit
    }
    pub fn conversion_factor(&self) -> Option<f64> {
        self.conversion_factor
    }
    pub fn obs_pattern(&self) -> Option<&str> {
        self.obs_pattern.as_deref()
    }

    /// The unit string, or `None` for dimensionless units.
    pub fn value(&self) -> Option<&str> {
        if self.unit.is_dimensionless() {
            None
        } else {
            Some(&self.unit_string)
        }
    }

    pub fn physical_type(&self) -> String {
        self.unit.physical_type()
    }

    /// The unit as a symbolic product of bracketed base symbols, e.g. `[uM]^-1 * [s]^-1`.
    pub fn symbolic(&self) -> Expr {
        unit_to_symbolic(&self.unit)
    }

    /// Converts a parameter annotation to `new_unit`.
    ///
    /// Returns the replacement annotation and the factor the parameter value must be
    /// multiplied by.
    pub fn convert(
        &self,
        new_unit: &str,
        volume: Option<&MoleculeVolume>,
    ) -> Result<(UnitAnnotation, f64), UnitError> {
        let target = parse_or_unknown(new_unit, " for convert")?;
        let factor = conversion_factor(&self.unit, &target, volume).map_err(|_| {
            UnitError::UnitConversion {
                from: self.unit_string.clone(),
                to: new_unit.to_string(),
            }
        })?;
        let converted = UnitAnnotation {
            unit_string: new_unit.to_string(),
            unit: target,
            conversion_factor: Some(self.conversion_factor.unwrap_or(1.0) * factor),
            ..self.clone()
        };
        Ok((converted, factor))
    }
}

impl fmt::Display for UnitAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "Unit({}, '{}')", self.subject_name, v),
            None => write!(f, "Unit({}, None)", self.subject_name),
        }
    }
}

pub fn unit_to_symbolic(unit: &UnitValue) -> Expr {
    unit.factors()
        .iter()
        .map(|(base, power)| {
            let symbol = Expr::Var(format!("[{}]", base.symbol));
            if *power == 1 {
                symbol
            } else {
                symbol.pow(Expr::Const(*power as f64))
            }
        })
        .reduce(|acc, factor| acc * factor)
        .unwrap_or(Expr::Const(1.0))
}

/// Unit annotation of a parameter.
///
/// An active simulation policy replaces any requested conversion target with the
/// policy's form of the unit. Returns the annotation and the rescaled value.
pub fn parameter_units(
    subject: usize,
    name: &str,
    value: f64,
    unit: Option<&str>,
    convert: Option<&str>,
    policy: Option<&SimulationUnits>,
    volume: Option<&MoleculeVolume>,
) -> Result<(UnitAnnotation, f64), UnitError> {
    let unit_string = unit_or_one(unit);
    let parsed = parse_or_unknown(unit_string, &format!(" for Parameter '{}'", name))?;
    let annotation = UnitAnnotation {
        subject,
        subject_name: name.to_string(),
        kind: SubjectKind::Parameter,
        unit_string: unit_string.to_string(),
        unit: parsed,
        conversion_factor: None,
        obs_pattern: None,
    };
    let target = match policy {
        Some(policy) if !annotation.unit.is_dimensionless() => {
            Some(policy.convert_unit(&annotation.unit)?.to_string())
        }
        _ => convert.map(str::to_string),
    };
    match target {
        Some(target) => {
            let (converted, factor) = annotation.convert(&target, volume)?;
            Ok((converted, value * factor))
        }
        None => Ok((annotation, value)),
    }
}

/// Unit annotation of an expression. An observable pattern multiplies in an opaque
/// `unit(<pattern>)` factor.
pub fn expression_units(
    subject: usize,
    name: &str,
    unit: Option<&str>,
    obs_pattern: Option<&str>,
) -> Result<UnitAnnotation, UnitError> {
    let unit_string = unit_or_one(unit);
    let mut parsed = parse_or_unknown(unit_string, &format!(" for Expression '{}'", name))?;
    let mut stored = unit_string.to_string();
    if let Some(pattern) = obs_pattern {
        let tag = parse_or_unknown(&format!("unit({})", pattern), "")?;
        parsed = parsed.checked_mul(&tag).ok_or_else(|| {
            UnitError::UnknownUnit(format!("unit({}) for Expression '{}'", pattern, name))
        })?;
        stored = parsed.to_string();
    }
    Ok(UnitAnnotation {
        subject,
        subject_name: name.to_string(),
        kind: SubjectKind::Expression,
        unit_string: stored,
        unit: parsed,
        conversion_factor: None,
        obs_pattern: obs_pattern.map(str::to_string),
    })
}

/// Unit annotation of an observable. A conversion target must be a concentration.
pub fn observable_units(
    subject: usize,
    name: &str,
    unit: Option<&str>,
    convert: Option<&str>,
) -> Result<UnitAnnotation, UnitError> {
    let unit_string = unit_or_one(unit);
    let parsed = parse_or_unknown(unit_string, &format!(" for Observable '{}'", name))?;
    let mut annotation = UnitAnnotation {
        subject,
        subject_name: name.to_string(),
        kind: SubjectKind::Observable,
        unit_string: unit_string.to_string(),
        unit: parsed,
        conversion_factor: None,
        obs_pattern: None,
    };
    if let Some(target_string) = convert {
        let target = parse_or_unknown(target_string, " for convert")?;
        let factor = annotation
            .unit
            .to(&target)
            .map_err(|_| UnitError::UnitConversion {
                from: unit_string.to_string(),
                to: target_string.to_string(),
            })?;
        if !is_concentration(&target) {
            return Err(UnitError::WrongUnit(format!(
                "Observable {} must be assigned a concentration or amount unit pattern. Unit pattern {} isn't a recognized concentration or amount pattern.",
                name, target_string
            )));
        }
        annotation.conversion_factor = Some(factor);
        annotation.unit = target;
        annotation.unit_string = target_string.to_string();
    }
    Ok(annotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dimensionless_parameter() {
        let (annotation, value) = parameter_units(0, "f", 0.01, None, None, None, None).unwrap();
        assert_eq!(annotation.value(), None);
        assert_eq!(annotation.unit_string(), "1");
        assert_relative_eq!(value, 0.01);
        // the policy leaves dimensionless parameters alone
        let policy = SimulationUnits::new("molecules", "s", None).unwrap();
        let (annotation, _) =
            parameter_units(0, "f", 0.01, None, None, Some(&policy), None).unwrap();
        assert_eq!(annotation.conversion_factor(), None);
    }

    #[test]
    fn test_explicit_conversion() {
        let (annotation, value) =
            parameter_units(0, "kf", 1.0, Some("1/(nM*min)"), Some("1/(uM*s)"), None, None)
                .unwrap();
        assert_eq!(annotation.unit_string(), "1/(uM*s)");
        assert_relative_eq!(value, 1000.0 / 60.0, max_relative = 1e-12);
    }

    #[test]
    fn test_policy_overrides_convert_target() {
        let policy = SimulationUnits::default();
        let (annotation, value) =
            parameter_units(0, "k", 2.0, Some("1/min"), Some("1/h"), Some(&policy), None).unwrap();
        assert_eq!(annotation.unit_string(), "1 / s");
        assert_relative_eq!(value, 2.0 / 60.0, max_relative = 1e-12);
    }

    #[test]
    fn test_unknown_and_unconvertible_units() {
        assert!(matches!(
            parameter_units(0, "k", 1.0, Some("furlong"), None, None, None),
            Err(UnitError::UnknownUnit(_))
        ));
        assert!(matches!(
            parameter_units(0, "k", 1.0, Some("uM"), Some("s"), None, None),
            Err(UnitError::UnitConversion { .. })
        ));
        assert!(matches!(
            parameter_units(0, "k", 1.0, Some("uM"), Some("nope"), None, None),
            Err(UnitError::UnknownUnit(_))
        ));
    }

    #[test]
    fn test_observable_conversion() {
        let annotation = observable_units(3, "A_total", Some("nM"), Some("uM")).unwrap();
        assert_relative_eq!(annotation.conversion_factor().unwrap(), 1e-3, epsilon = 1e-15);
        assert_eq!(annotation.unit_string(), "uM");
        assert!(matches!(
            observable_units(3, "A_total", Some("mol"), Some("mmol")),
            Err(UnitError::WrongUnit(_))
        ));
    }

    #[test]
    fn test_expression_with_observable_pattern() {
        let annotation = expression_units(1, "rate", Some("1/s"), Some("Obs1")).unwrap();
        assert_eq!(annotation.unit_string(), "unit(Obs1) / s");
        assert_eq!(annotation.obs_pattern(), Some("Obs1"));
        assert_eq!(annotation.physical_type(), "unknown");
    }

    #[test]
    fn test_symbolic_form() {
        let (annotation, _) =
            parameter_units(0, "k", 1.0, Some("1/(uM*s)"), None, None, None).unwrap();
        let vars = annotation.symbolic().all_arguments_are_variables();
        assert!(vars.contains(&"[uM]".to_string()));
        assert!(vars.contains(&"[s]".to_string()));
        assert!(matches!(
            unit_to_symbolic(&UnitValue::dimensionless()),
            Expr::Const(c) if c == 1.0
        ));
    }
}
