use super::rule_expression::{ComplexPattern, ReactionPattern, RuleExpression};
use crate::Units::unit_annotation::SubjectKind;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use enum_dispatch::enum_dispatch;
use std::collections::HashMap;
use std::fmt;

/// Behaviour shared by every component that can carry a unit annotation.
#[enum_dispatch]
pub trait UnitBearing {
    fn name(&self) -> &str;
    fn kind(&self) -> SubjectKind;
    /// Index of the current annotation in the model's annotation list.
    fn units(&self) -> Option<usize>;
    fn has_units(&self) -> bool;
    fn set_units(&mut self, annotation: usize);
}

macro_rules! unit_bearing {
    ($t:ty, $kind:expr) => {
        impl UnitBearing for $t {
            fn name(&self) -> &str {
                &self.name
            }
            fn kind(&self) -> SubjectKind {
                $kind
            }
            fn units(&self) -> Option<usize> {
                self.units
            }
            fn has_units(&self) -> bool {
                self.has_units
            }
            fn set_units(&mut self, annotation: usize) {
                self.units = Some(annotation);
                self.has_units = true;
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: f64,
    units: Option<usize>,
    has_units: bool,
}

impl Parameter {
    pub fn new(name: &str, value: f64) -> Self {
        Parameter {
            name: name.to_string(),
            value,
            units: None,
            has_units: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Expression {
    pub name: String,
    pub expr: Expr,
    units: Option<usize>,
    has_units: bool,
}

impl Expression {
    pub fn new(name: &str, expr: Expr) -> Self {
        Expression {
            name: name.to_string(),
            expr,
            units: None,
            has_units: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Observable {
    pub name: String,
    pub pattern: ReactionPattern,
    units: Option<usize>,
    has_units: bool,
}

impl Observable {
    pub fn new(name: &str, pattern: ReactionPattern) -> Self {
        Observable {
            name: name.to_string(),
            pattern,
            units: None,
            has_units: false,
        }
    }
}

unit_bearing!(Parameter, SubjectKind::Parameter);
unit_bearing!(Expression, SubjectKind::Expression);
unit_bearing!(Observable, SubjectKind::Observable);

#[derive(Debug, Clone)]
#[enum_dispatch(UnitBearing)]
pub enum Component {
    Parameter(Parameter),
    Expression(Expression),
    Observable(Observable),
}

impl Component {
    pub fn as_parameter(&self) -> Option<&Parameter> {
        match self {
            Component::Parameter(p) => Some(p),
            _ => None,
        }
    }
    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Component::Expression(e) => Some(e),
            _ => None,
        }
    }
    pub fn as_observable(&self) -> Option<&Observable> {
        match self {
            Component::Observable(o) => Some(o),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Monomer {
    pub name: String,
    pub sites: Vec<String>,
    pub site_states: HashMap<String, Vec<String>>,
}

impl Monomer {
    pub fn new(name: &str, sites: &[&str], site_states: &[(&str, &[&str])]) -> Self {
        Monomer {
            name: name.to_string(),
            sites: sites.iter().map(|s| s.to_string()).collect(),
            site_states: site_states
                .iter()
                .map(|(site, states)| {
                    (
                        site.to_string(),
                        states.iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl fmt::Display for Monomer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Monomer('{}', {:?}", self.name, self.sites)?;
        if !self.site_states.is_empty() {
            let mut states: Vec<_> = self.site_states.iter().collect();
            states.sort();
            write!(f, ", {:?}", states)?;
        }
        write!(f, ")")
    }
}

/// Initial condition. `value` indexes a Parameter or Expression component.
#[derive(Debug, Clone)]
pub struct Initial {
    pub pattern: ComplexPattern,
    pub value: usize,
    pub fixed: bool,
    pub units: Option<usize>,
    pub has_units: bool,
}

/// Rule with its rate components given as component indices.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub expression: RuleExpression,
    pub rate_forward: usize,
    pub rate_reverse: Option<usize>,
    pub energy: bool,
}

impl Rule {
    pub fn is_reversible(&self) -> bool {
        self.expression.is_reversible
    }
}

/// Forward and reverse molecularity of a rule. Computed on request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionOrder {
    pub rule: String,
    pub forward: usize,
    pub reverse: Option<usize>,
}
