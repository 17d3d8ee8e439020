use super::unit_annotation::SubjectKind;
use crate::Model::components::UnitBearing;
use crate::Model::model::Model;
use crate::Model::model_errors::ModelError;
use crate::UnitRegistry::unit_definitions::parse_unit;
use crate::UnitRegistry::unit_value::{MAX_POWER, UnitValue};
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::info;

/// Result of composing the units of an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedUnits {
    /// derived unit, `"1"` when nothing physical is left
    pub unit_string: String,
    /// what remains of the expression once every unit-bearing atom is set to 1,
    /// present only when unit-free observables are referenced
    pub residual: Option<String>,
}

/// Derives the unit of `expr` from the units of the components it references.
///
/// Unit-bearing atoms are replaced by their symbolic units and unit-free observables
/// by 1; the resulting unit expression is evaluated with the unit algebra. Anything
/// that does not evaluate to a unit (mismatched sums, fractional powers, unit-free
/// parameters) yields the dimensionless `"1"`.
pub fn compose_units(model: &Model, expr: &Expr) -> Result<ComposedUnits, ModelError> {
    let mut atoms: Vec<String> = expr
        .all_arguments_are_variables()
        .iter()
        .map(|a| a.trim().to_string())
        .collect();
    atoms.sort();
    atoms.dedup();

    let mut unit_expr = expr.clone();
    let mut residual_expr = expr.clone();
    let mut unit_free_observables = Vec::new();
    for atom in &atoms {
        let component = model
            .component(atom)
            .ok_or_else(|| ModelError::UnknownComponent(atom.clone()))?;
        match model.annotation_of(component) {
            Some(annotation) => {
                unit_expr = substitute(&unit_expr, atom, &annotation.symbolic());
                residual_expr = residual_expr.set_variable(atom, 1.0);
            }
            None if component.kind() == SubjectKind::Observable => {
                unit_free_observables.push(atom.clone());
            }
            None => {}
        }
    }
    for observable in &unit_free_observables {
        unit_expr = unit_expr.set_variable(observable, 1.0);
    }

    let unit_string = match evaluate_units(&unit_expr) {
        Ok(unit) => unit.to_string(),
        Err(reason) => {
            info!("expression '{}' is treated as dimensionless: {}", expr, reason);
            "1".to_string()
        }
    };
    let residual = if unit_free_observables.is_empty() {
        None
    } else {
        let simplified = residual_expr.symplify();
        Some(match &simplified {
            Expr::Var(name) => name.clone(),
            other => other.to_string(),
        })
    };
    Ok(ComposedUnits {
        unit_string,
        residual,
    })
}

/// Replaces every `Var(name)` in `expr` with `with`.
fn substitute(expr: &Expr, name: &str, with: &Expr) -> Expr {
    let sub = |e: &Expr| Box::new(substitute(e, name, with));
    match expr {
        Expr::Var(v) if v.trim() == name => with.clone(),
        Expr::Add(lhs, rhs) => Expr::Add(sub(lhs), sub(rhs)),
        Expr::Sub(lhs, rhs) => Expr::Sub(sub(lhs), sub(rhs)),
        Expr::Mul(lhs, rhs) => Expr::Mul(sub(lhs), sub(rhs)),
        Expr::Div(lhs, rhs) => Expr::Div(sub(lhs), sub(rhs)),
        Expr::Pow(base, exponent) => Expr::Pow(sub(base), sub(exponent)),
        Expr::Exp(arg) => Expr::Exp(sub(arg)),
        Expr::Ln(arg) => Expr::Ln(sub(arg)),
        other => other.clone(),
    }
}

fn is_zero(expr: &Expr) -> bool {
    matches!(expr, Expr::Const(c) if *c == 0.0)
}

/// Evaluates a unit expression whose variables are bracketed unit symbols.
pub fn evaluate_units(expr: &Expr) -> Result<UnitValue, String> {
    match expr {
        Expr::Var(name) => {
            let symbol = name
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .ok_or_else(|| format!("'{}' carries no unit", name))?;
            parse_unit(symbol).map_err(|e| e.to_string())
        }
        Expr::Const(_) => Ok(UnitValue::dimensionless()),
        Expr::Mul(lhs, rhs) => evaluate_units(lhs)?
            .checked_mul(&evaluate_units(rhs)?)
            .ok_or_else(|| "unit power out of range".to_string()),
        Expr::Div(lhs, rhs) => evaluate_units(lhs)?
            .checked_div(&evaluate_units(rhs)?)
            .ok_or_else(|| "unit power out of range".to_string()),
        Expr::Pow(base, exponent) => {
            let base_unit = evaluate_units(base)?;
            match exponent.as_ref() {
                Expr::Const(p) if p.fract() == 0.0 && p.abs() <= MAX_POWER as f64 => base_unit
                    .checked_powi(*p as i32)
                    .ok_or_else(|| format!("power {} of '{}' is out of range", p, base_unit)),
                _ if base_unit.is_dimensionless() => {
                    if evaluate_units(exponent)?.is_dimensionless() {
                        Ok(UnitValue::dimensionless())
                    } else {
                        Err("exponents must be dimensionless".to_string())
                    }
                }
                _ => Err(format!("non-integer power of '{}'", base_unit)),
            }
        }
        Expr::Add(lhs, rhs) | Expr::Sub(lhs, rhs) => {
            if is_zero(lhs) {
                return evaluate_units(rhs);
            }
            if is_zero(rhs) {
                return evaluate_units(lhs);
            }
            let (left, right) = (evaluate_units(lhs)?, evaluate_units(rhs)?);
            if left == right {
                Ok(left)
            } else {
                Err(format!("cannot add '{}' and '{}'", left, right))
            }
        }
        Expr::Exp(arg) | Expr::Ln(arg) => {
            let inner = evaluate_units(arg)?;
            if inner.is_dimensionless() {
                Ok(inner)
            } else {
                Err(format!("transcendental function of '{}'", inner))
            }
        }
        #[allow(unreachable_patterns)]
        other => Err(format!("unsupported term '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_products_and_powers() {
        let k = Expr::Var("[uM]".to_string()).pow(Expr::Const(-1.0))
            * Expr::Var("[s]".to_string()).pow(Expr::Const(-1.0));
        let a = Expr::Var("[uM]".to_string());
        assert_eq!(evaluate_units(&(k * a)).unwrap().to_string(), "1 / s");
    }

    #[test]
    fn test_evaluate_rejects_mismatched_sums() {
        let sum = Expr::Var("[uM]".to_string()) + Expr::Var("[s]".to_string());
        assert!(evaluate_units(&sum).is_err());
        let same = Expr::Var("[uM]".to_string()) - Expr::Var("[umol/L]".to_string());
        assert_eq!(evaluate_units(&same).unwrap().to_string(), "uM");
        let half = Expr::Var("[s]".to_string()).pow(Expr::Const(0.5));
        assert!(evaluate_units(&half).is_err());
        assert!(evaluate_units(&Expr::Var("kf".to_string())).is_err());
    }

    #[test]
    fn test_evaluate_rejects_huge_powers() {
        let s = || Expr::Var("[s]".to_string());
        assert!(evaluate_units(&s().pow(Expr::Const(2147483647.0))).is_err());
        assert!(evaluate_units(&s().pow(Expr::Const(1e12))).is_err());
        let top = s().pow(Expr::Const(64.0));
        assert!(evaluate_units(&(top.clone() * s())).is_err());
        assert_eq!(
            evaluate_units(&(top / s())).unwrap().to_string(),
            "s**63"
        );
    }
}
