use super::classifier::matches_reaction_order;
use super::unit_annotation::UnitAnnotation;
use super::unit_errors::UnitError;
use crate::Model::rule_expression::RuleExpression;

/// A rate component as seen by the validator.
#[derive(Debug, Clone, Copy)]
pub struct RateUnits<'a> {
    pub name: &'a str,
    pub annotation: Option<&'a UnitAnnotation>,
}

impl<'a> RateUnits<'a> {
    fn unit_label(&self) -> String {
        self.annotation
            .map(|a| a.value().unwrap_or("1").to_string())
            .unwrap_or_default()
    }
}

fn check_order(rate: &RateUnits, order: usize, direction: &str) -> Result<(), UnitError> {
    let Some(annotation) = rate.annotation else {
        return Ok(());
    };
    if matches_reaction_order(annotation.unit(), order) {
        Ok(())
    } else {
        Err(UnitError::WrongUnit(format!(
            "The rate parameter '{}' with units '{}' for the {} reaction with order {} doesn't have the correct unit pattern for that reaction order.",
            rate.name,
            rate.unit_label(),
            direction,
            order
        )))
    }
}

/// Checks rate units against the molecularity of each direction of a rule.
///
/// Reversible rules need units on both rates. Energy rules are not checked.
pub fn validate_rule_units(
    expression: &RuleExpression,
    energy: bool,
    forward: RateUnits,
    reverse: Option<RateUnits>,
) -> Result<(), UnitError> {
    if energy {
        return Ok(());
    }
    if expression.is_reversible {
        let reverse_annotation = reverse.and_then(|r| r.annotation);
        let reverse_name = reverse.map(|r| r.name).unwrap_or("None");
        let header =
            "Both rate parameters must have defined units in reversible Rule definitions:\n";
        match (forward.annotation, reverse_annotation) {
            (Some(_), Some(_)) => {}
            (Some(_), None) => {
                return Err(UnitError::MissingUnit(format!(
                    "{}Forward rate parameter '{}' has units '{}', but Reverse rate parameter '{}' lacks units.",
                    header,
                    forward.name,
                    forward.unit_label(),
                    reverse_name
                )));
            }
            (None, Some(_)) => {
                let reverse_label = reverse.map(|r| r.unit_label()).unwrap_or_default();
                return Err(UnitError::MissingUnit(format!(
                    "{}Reverse rate parameter '{}' has units '{}', but Forward rate parameter '{}' lacks units.",
                    header, reverse_name, reverse_label, forward.name
                )));
            }
            (None, None) => {
                return Err(UnitError::MissingUnit(format!(
                    "{}Forward rate parameter '{}' and Reverse rate parameter '{}' both lack units.",
                    header, forward.name, reverse_name
                )));
            }
        }
    }
    check_order(&forward, expression.forward_order(), "forward")?;
    if expression.is_reversible {
        if let Some(reverse) = reverse {
            check_order(&reverse, expression.reverse_order(), "reverse")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Units::unit_annotation::parameter_units;

    fn annotation(name: &str, unit: &str) -> UnitAnnotation {
        parameter_units(0, name, 1.0, Some(unit), None, None, None)
            .unwrap()
            .0
    }

    fn binding() -> RuleExpression {
        RuleExpression::parse("A(b=None) + B(a=None) | A(b=1) % B(a=1)").unwrap()
    }

    #[test]
    fn test_orders_are_enforced() {
        let kf_wrong = annotation("kf", "1/s");
        let kf = annotation("kf", "1/(uM*s)");
        let kr = annotation("kr", "1/s");
        let rev = Some(RateUnits {
            name: "kr",
            annotation: Some(&kr),
        });
        let err = validate_rule_units(
            &binding(),
            false,
            RateUnits {
                name: "kf",
                annotation: Some(&kf_wrong),
            },
            rev,
        )
        .unwrap_err();
        match err {
            UnitError::WrongUnit(msg) => {
                assert!(msg.contains("'kf'"));
                assert!(msg.contains("order 2"));
            }
            other => panic!("unexpected error {:?}", other),
        }
        validate_rule_units(
            &binding(),
            false,
            RateUnits {
                name: "kf",
                annotation: Some(&kf),
            },
            rev,
        )
        .unwrap();
        // swapped rates fail on the reverse side
        let err = validate_rule_units(
            &binding(),
            false,
            RateUnits {
                name: "kf",
                annotation: Some(&kf),
            },
            Some(RateUnits {
                name: "kf2",
                annotation: Some(&kf),
            }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("reverse reaction with order 1"));
    }

    #[test]
    fn test_missing_reverse_units() {
        let kf = annotation("kf", "1/(uM*s)");
        let err = validate_rule_units(
            &binding(),
            false,
            RateUnits {
                name: "kf",
                annotation: Some(&kf),
            },
            Some(RateUnits {
                name: "kr",
                annotation: None,
            }),
        )
        .unwrap_err();
        assert!(matches!(err, UnitError::MissingUnit(ref m) if m.contains("'kr' lacks units")));
    }

    #[test]
    fn test_energy_and_high_order_rules() {
        let k = annotation("k", "1/(uM**2*s)");
        let termolecular = RuleExpression::parse("A() + A() + B() >> C()").unwrap();
        let rate = RateUnits {
            name: "k",
            annotation: Some(&k),
        };
        assert!(validate_rule_units(&termolecular, false, rate, None).is_err());
        assert!(validate_rule_units(&termolecular, true, rate, None).is_ok());
        let unitless = RateUnits {
            name: "k",
            annotation: None,
        };
        assert!(validate_rule_units(&termolecular, false, unitless, None).is_ok());
        let synthesis = RuleExpression::parse("None >> A()").unwrap();
        let k0 = annotation("k0", "uM/s");
        let zero = RateUnits {
            name: "k0",
            annotation: Some(&k0),
        };
        assert!(validate_rule_units(&synthesis, false, zero, None).is_ok());
    }
}
