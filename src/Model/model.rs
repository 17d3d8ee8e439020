use super::components::{
    Component, Expression, Initial, Monomer, Observable, Parameter, ReactionOrder, Rule,
    UnitBearing,
};
use super::model_errors::ModelError;
use super::rule_expression::{ComplexPattern, ReactionPattern, RuleExpression};
use crate::Units::classifier::{concentration_unit_patterns, is_concentration};
use crate::Units::expression_units::{ComposedUnits, compose_units};
use crate::Units::rule_validation::{RateUnits, validate_rule_units};
use crate::Units::simulation_units::{MoleculeVolume, SimulationUnits};
use crate::Units::unit_annotation::{
    SubjectKind, UnitAnnotation, expression_units, observable_units, parameter_units,
};
use crate::Units::unit_errors::UnitError;
use RustedSciThe::symbolic::parse_expr::parse_expression_func;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use log::{info, warn};
use prettytable::{Cell, Row, Table};
use std::collections::BTreeMap;
use std::fmt;

/// Rejects text the symbolic parser cannot take apart, then parses it.
fn parse_expression_text(text: &str) -> Result<Expr, ModelError> {
    let invalid = |reason: &str| ModelError::InvalidExpression {
        expression: text.to_string(),
        reason: reason.to_string(),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty expression"));
    }
    if let Some(c) = trimmed
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || " _.+-*/^()".contains(*c)))
    {
        return Err(invalid(&format!("unexpected character '{}'", c)));
    }
    let mut depth = 0i32;
    let mut previous = '(';
    for c in trimmed.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '(' => depth += 1,
            ')' => {
                if previous == '(' || "+-*/^".contains(previous) {
                    return Err(invalid("missing operand before ')'"));
                }
                depth -= 1;
                if depth < 0 {
                    return Err(invalid("unbalanced parentheses"));
                }
            }
            '+' | '*' | '/' | '^' if previous == '(' || "+-*/^".contains(previous) => {
                return Err(invalid(&format!("missing operand before '{}'", c)));
            }
            _ => {}
        }
        previous = c;
    }
    if depth != 0 {
        return Err(invalid("unbalanced parentheses"));
    }
    if "+-*/^".contains(previous) {
        return Err(invalid("expression ends with an operator"));
    }
    parse_expression_func(0, trimmed).map_err(|reason| invalid(&reason))
}

/// Rule-based model whose parameters, expressions and observables may carry units.
///
/// Components live in one list and are referred to by index; unit annotations live
/// in a second list and every component points at its current annotation.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub name: String,
    monomers: Vec<Monomer>,
    components: Vec<Component>,
    initials: Vec<Initial>,
    rules: Vec<Rule>,
    annotations: Vec<UnitAnnotation>,
    simulation_units: Option<SimulationUnits>,
    molecule_volume: Option<MoleculeVolume>,
}

impl Model {
    pub fn new(name: &str) -> Self {
        Model {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn ensure_unique(&self, name: &str) -> Result<(), ModelError> {
        let taken = self.monomers.iter().any(|m| m.name == name)
            || self.components.iter().any(|c| c.name() == name)
            || self.rules.iter().any(|r| r.name == name);
        if taken {
            Err(ModelError::DuplicateComponent(name.to_string()))
        } else {
            Ok(())
        }
    }

    fn attach(&mut self, index: usize, annotation: UnitAnnotation) {
        let position = self.annotations.len();
        self.annotations.push(annotation);
        self.components[index].set_units(position);
    }

    fn index_of(&self, name: &str) -> Result<usize, ModelError> {
        self.component_index(name)
            .ok_or_else(|| ModelError::UnknownComponent(name.to_string()))
    }

    ///////////////////////////////SETTINGS///////////////////////////////////

    /// Installs the simulation unit policy. Units assigned to parameters afterwards are
    /// converted into it.
    pub fn set_simulation_units(
        &mut self,
        concentration: &str,
        time: &str,
        volume: Option<&str>,
    ) -> Result<&SimulationUnits, ModelError> {
        let policy = SimulationUnits::new(concentration, time, volume)?;
        if let Some(previous) = &self.simulation_units {
            warn!(
                "model '{}': replacing {} with {}",
                self.name, previous, policy
            );
        }
        info!("model '{}': {}", self.name, policy);
        Ok(self.simulation_units.insert(policy))
    }

    pub fn simulation_units(&self) -> Option<&SimulationUnits> {
        self.simulation_units.as_ref()
    }

    /// Volume used for molar to molecule-count conversions in this model.
    pub fn set_molecule_volume(&mut self, value: f64, unit: &str) -> Result<(), ModelError> {
        let volume = MoleculeVolume::new(value, unit)?;
        info!("model '{}': molecule volume {}", self.name, volume);
        self.molecule_volume = Some(volume);
        Ok(())
    }

    pub fn molecule_volume(&self) -> Option<&MoleculeVolume> {
        self.molecule_volume.as_ref()
    }

    ///////////////////////////////COMPONENTS///////////////////////////////////

    pub fn monomer(
        &mut self,
        name: &str,
        sites: &[&str],
        site_states: &[(&str, &[&str])],
    ) -> Result<(), ModelError> {
        self.ensure_unique(name)?;
        let monomer = Monomer::new(name, sites, site_states);
        for site in monomer.site_states.keys() {
            if !monomer.sites.contains(site) {
                return Err(ModelError::UnknownSite {
                    monomer: name.to_string(),
                    site: site.clone(),
                });
            }
        }
        self.monomers.push(monomer);
        Ok(())
    }

    /// Adds a parameter. A unit of `None` leaves the parameter without units.
    pub fn parameter(
        &mut self,
        name: &str,
        value: f64,
        unit: Option<&str>,
    ) -> Result<usize, ModelError> {
        self.parameter_with_conversion(name, value, unit, None)
    }

    /// Adds a parameter whose value is converted from `unit` into `convert`. An active
    /// simulation unit policy takes precedence over `convert`.
    pub fn parameter_with_conversion(
        &mut self,
        name: &str,
        value: f64,
        unit: Option<&str>,
        convert: Option<&str>,
    ) -> Result<usize, ModelError> {
        self.ensure_unique(name)?;
        let index = self.components.len();
        let mut parameter = Parameter::new(name, value);
        let annotation = match unit {
            Some(unit) => {
                let (annotation, converted) = parameter_units(
                    index,
                    name,
                    value,
                    Some(unit),
                    convert,
                    self.simulation_units.as_ref(),
                    self.molecule_volume.as_ref(),
                )?;
                parameter.value = converted;
                Some(annotation)
            }
            None => {
                if convert.is_some() {
                    warn!("parameter '{}' has no unit to convert", name);
                }
                None
            }
        };
        self.components.push(parameter.into());
        if let Some(annotation) = annotation {
            self.attach(index, annotation);
        }
        Ok(index)
    }

    /// Adds an expression. Its units are composed from the components it references.
    pub fn expression(&mut self, name: &str, expr: Expr) -> Result<usize, ModelError> {
        self.ensure_unique(name)?;
        let ComposedUnits {
            unit_string,
            residual,
        } = compose_units(self, &expr)?;
        let index = self.components.len();
        let annotation = expression_units(index, name, Some(&unit_string), residual.as_deref())?;
        self.components.push(Expression::new(name, expr).into());
        self.attach(index, annotation);
        Ok(index)
    }

    pub fn expression_from_str(&mut self, name: &str, text: &str) -> Result<usize, ModelError> {
        let expr = parse_expression_text(text)?;
        self.expression(name, expr)
    }

    /// Adds an observable. With a simulation unit policy the observable takes the
    /// policy's concentration unit.
    pub fn observable(&mut self, name: &str, pattern: &str) -> Result<usize, ModelError> {
        let concentration = self
            .simulation_units
            .as_ref()
            .map(|policy| policy.concentration().to_string());
        self.add_observable(name, pattern, concentration.as_deref(), None)
    }

    /// Adds an observable with an explicit unit and optional conversion target.
    pub fn observable_with_units(
        &mut self,
        name: &str,
        pattern: &str,
        unit: Option<&str>,
        convert: Option<&str>,
    ) -> Result<usize, ModelError> {
        self.add_observable(name, pattern, Some(unit.unwrap_or("1")), convert)
    }

    fn add_observable(
        &mut self,
        name: &str,
        pattern: &str,
        unit: Option<&str>,
        convert: Option<&str>,
    ) -> Result<usize, ModelError> {
        self.ensure_unique(name)?;
        let pattern = ReactionPattern::parse(pattern)?;
        pattern.validate(&self.monomers)?;
        let index = self.components.len();
        let annotation = match unit {
            Some(unit) => Some(observable_units(index, name, Some(unit), convert)?),
            None => None,
        };
        self.components.push(Observable::new(name, pattern).into());
        if let Some(annotation) = annotation {
            self.attach(index, annotation);
        }
        Ok(index)
    }

    /// Adds an initial condition. A unit-bearing value must be a concentration.
    pub fn initial(&mut self, pattern: &str, value: &str, fixed: bool) -> Result<(), ModelError> {
        let pattern = ComplexPattern::parse(pattern)?;
        pattern.validate(&self.monomers)?;
        let index = self.index_of(value)?;
        let component = &self.components[index];
        if component.kind() == SubjectKind::Observable {
            return Err(ModelError::InvalidComponentKind {
                name: value.to_string(),
                found: "Observable".to_string(),
                expected: "Parameter or Expression".to_string(),
            });
        }
        if let Some(annotation) = self.annotation_of(component) {
            if !is_concentration(annotation.unit()) {
                return Err(UnitError::WrongUnit(format!(
                    "Parameter or Expression '{}' with units '{}' passed to Initial doesn't have a recognized concentration unit pattern.\n Recognized concentration unit patterns include: \n {:?}",
                    value,
                    annotation.value().unwrap_or("1"),
                    concentration_unit_patterns()
                ))
                .into());
            }
        }
        let (units, has_units) = match component {
            Component::Parameter(p) => (p.units(), p.has_units()),
            _ => (None, false),
        };
        self.initials.push(Initial {
            pattern,
            value: index,
            fixed,
            units,
            has_units,
        });
        Ok(())
    }

    pub fn rule(
        &mut self,
        name: &str,
        expression: &str,
        rate_forward: &str,
        rate_reverse: Option<&str>,
    ) -> Result<(), ModelError> {
        self.add_rule(name, expression, rate_forward, rate_reverse, false)
    }

    /// Adds a rule after checking its rate units against its reaction orders.
    /// Energy rules skip the unit check.
    pub fn add_rule(
        &mut self,
        name: &str,
        expression: &str,
        rate_forward: &str,
        rate_reverse: Option<&str>,
        energy: bool,
    ) -> Result<(), ModelError> {
        self.ensure_unique(name)?;
        let rule_expression = RuleExpression::parse(expression)?;
        rule_expression.validate(&self.monomers)?;
        match (rule_expression.is_reversible, rate_reverse) {
            (true, None) => {
                return Err(ModelError::ReverseRateMismatch {
                    rule: name.to_string(),
                    reason: "reversible rules need a reverse rate".to_string(),
                });
            }
            (false, Some(_)) => {
                return Err(ModelError::ReverseRateMismatch {
                    rule: name.to_string(),
                    reason: "irreversible rules take no reverse rate".to_string(),
                });
            }
            _ => {}
        }
        let forward = self.rate_index(rate_forward)?;
        let reverse = rate_reverse.map(|r| self.rate_index(r)).transpose()?;
        validate_rule_units(
            &rule_expression,
            energy,
            self.rate_units(forward),
            reverse.map(|r| self.rate_units(r)),
        )?;
        info!("model '{}': rule {}: {}", self.name, name, rule_expression);
        self.rules.push(Rule {
            name: name.to_string(),
            expression: rule_expression,
            rate_forward: forward,
            rate_reverse: reverse,
            energy,
        });
        Ok(())
    }

    fn rate_index(&self, name: &str) -> Result<usize, ModelError> {
        let index = self.index_of(name)?;
        match self.components[index].kind() {
            SubjectKind::Observable => Err(ModelError::InvalidComponentKind {
                name: name.to_string(),
                found: "Observable".to_string(),
                expected: "Parameter or Expression".to_string(),
            }),
            _ => Ok(index),
        }
    }

    fn rate_units(&self, index: usize) -> RateUnits<'_> {
        let component = &self.components[index];
        RateUnits {
            name: component.name(),
            annotation: self.annotation_of(component),
        }
    }

    ///////////////////////////////UNITS///////////////////////////////////

    /// Attaches a unit to an existing component, dispatching on its kind.
    ///
    /// A component that already has units keeps its old annotation in the model and
    /// points at the new one; the consistency check reports the duplicate.
    pub fn add_units(
        &mut self,
        name: &str,
        unit: Option<&str>,
        convert: Option<&str>,
    ) -> Result<(), ModelError> {
        let index = self.index_of(name)?;
        let (annotation, new_value) = match &self.components[index] {
            Component::Parameter(p) => {
                let (annotation, value) = parameter_units(
                    index,
                    name,
                    p.value,
                    unit,
                    convert,
                    self.simulation_units.as_ref(),
                    self.molecule_volume.as_ref(),
                )?;
                (annotation, Some(value))
            }
            Component::Expression(_) => {
                if convert.is_some() {
                    warn!("conversion of expression '{}' is not supported", name);
                }
                (expression_units(index, name, unit, None)?, None)
            }
            Component::Observable(_) => (observable_units(index, name, unit, convert)?, None),
        };
        if let (Some(value), Component::Parameter(p)) = (new_value, &mut self.components[index]) {
            p.value = value;
        }
        self.attach(index, annotation);
        Ok(())
    }

    /// Converts the units of a parameter, rescaling its value. Returns the factor.
    pub fn convert_units(&mut self, name: &str, target: &str) -> Result<f64, ModelError> {
        let index = self.index_of(name)?;
        let Component::Parameter(parameter) = &self.components[index] else {
            return Err(ModelError::InvalidComponentKind {
                name: name.to_string(),
                found: self.components[index].kind().to_string(),
                expected: "Parameter".to_string(),
            });
        };
        let position = parameter.units().ok_or_else(|| {
            UnitError::MissingUnit(format!("Parameter '{}' has no units to convert.", name))
        })?;
        let (converted, factor) =
            self.annotations[position].convert(target, self.molecule_volume.as_ref())?;
        self.annotations[position] = converted;
        if let Component::Parameter(p) = &mut self.components[index] {
            p.value *= factor;
        }
        Ok(factor)
    }

    /// Every unit annotation in the order it was created.
    pub fn units(&self) -> &[UnitAnnotation] {
        &self.annotations
    }

    /// Component name to unit string. Later annotations win.
    pub fn unit_map(&self) -> BTreeMap<String, String> {
        self.annotations
            .iter()
            .map(|a| (a.subject_name().to_string(), a.unit_string().to_string()))
            .collect()
    }

    pub fn reaction_order(&self) -> Vec<ReactionOrder> {
        self.rules
            .iter()
            .map(|rule| ReactionOrder {
                rule: rule.name.clone(),
                forward: rule.expression.forward_order(),
                reverse: if rule.is_reversible() {
                    Some(rule.expression.reverse_order())
                } else {
                    None
                },
            })
            .collect()
    }

    pub fn annotation_of(&self, component: &Component) -> Option<&UnitAnnotation> {
        component.units().and_then(|i| self.annotations.get(i))
    }

    pub fn compose_expression_units(&self, name: &str) -> Result<ComposedUnits, ModelError> {
        let index = self.index_of(name)?;
        match &self.components[index] {
            Component::Expression(e) => compose_units(self, &e.expr),
            other => Err(ModelError::InvalidComponentKind {
                name: name.to_string(),
                found: other.kind().to_string(),
                expected: "Expression".to_string(),
            }),
        }
    }

    ///////////////////////////////QUERIES///////////////////////////////////

    pub fn component_index(&self, name: &str) -> Option<usize> {
        self.components.iter().position(|c| c.name() == name)
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name() == name)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn monomers(&self) -> &[Monomer] {
        &self.monomers
    }

    pub fn initials(&self) -> &[Initial] {
        &self.initials
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.components.iter().filter_map(Component::as_parameter)
    }

    pub fn expressions(&self) -> impl Iterator<Item = &Expression> {
        self.components.iter().filter_map(Component::as_expression)
    }

    pub fn observables(&self) -> impl Iterator<Item = &Observable> {
        self.components.iter().filter_map(Component::as_observable)
    }

    pub fn parameter_value(&self, name: &str) -> Option<f64> {
        self.component(name)
            .and_then(Component::as_parameter)
            .map(|p| p.value)
    }

    /// Representation of a component with its unit, e.g. `Parameter('kf', 2), unit=['1/s']`.
    pub fn component_repr(&self, component: &Component) -> String {
        let base = match component {
            Component::Parameter(p) => format!("Parameter('{}', {})", p.name, p.value),
            Component::Expression(e) => format!("Expression('{}', {})", e.name, e.expr),
            Component::Observable(o) => format!("Observable('{}', {})", o.name, o.pattern),
        };
        match self.annotation_of(component) {
            Some(annotation) => format!(
                "{}, unit=['{}']",
                base,
                annotation.value().unwrap_or("None")
            ),
            None => base,
        }
    }

    pub fn initial_repr(&self, initial: &Initial) -> String {
        let value = self.components[initial.value].name();
        let base = format!("Initial({}, {})", initial.pattern, value);
        match initial
            .units
            .and_then(|i| self.annotations.get(i))
            .and_then(|a| a.value())
        {
            Some(unit) if initial.has_units => format!("{}, unit=[{}]", base, unit),
            _ => base,
        }
    }

    pub fn rule_repr(&self, rule: &Rule) -> String {
        let forward = self.components[rule.rate_forward].name();
        match rule.rate_reverse {
            Some(reverse) => format!(
                "Rule('{}', {}, {}, {})",
                rule.name,
                rule.expression,
                forward,
                self.components[reverse].name()
            ),
            None => format!("Rule('{}', {}, {})", rule.name, rule.expression, forward),
        }
    }

    /// Table of every component with its value, unit and physical type.
    pub fn units_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("Component"),
            Cell::new("Type"),
            Cell::new("Value"),
            Cell::new("Unit"),
            Cell::new("Physical type"),
        ]));
        for component in &self.components {
            let value = match component {
                Component::Parameter(p) => format!("{:.6e}", p.value),
                _ => String::new(),
            };
            let (unit, physical_type) = match self.annotation_of(component) {
                Some(a) => (a.value().unwrap_or("1").to_string(), a.physical_type()),
                None => ("-".to_string(), "-".to_string()),
            };
            table.add_row(Row::new(vec![
                Cell::new(component.name()),
                Cell::new(&component.kind().to_string()),
                Cell::new(&value),
                Cell::new(&unit),
                Cell::new(&physical_type),
            ]));
        }
        table
    }

    pub fn pretty_print_units(&self) {
        self.units_table().printstd();
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<Model '{}'>", self.name)?;
        if let Some(policy) = &self.simulation_units {
            writeln!(f, "  {}", policy)?;
        }
        for monomer in &self.monomers {
            writeln!(f, "  {}", monomer)?;
        }
        for component in &self.components {
            writeln!(f, "  {}", self.component_repr(component))?;
        }
        for initial in &self.initials {
            writeln!(f, "  {}", self.initial_repr(initial))?;
        }
        for rule in &self.rules {
            writeln!(f, "  {}", self.rule_repr(rule))?;
        }
        Ok(())
    }
}
