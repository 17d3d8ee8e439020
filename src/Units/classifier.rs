use crate::UnitRegistry::unit_definitions::UnitRegistry;
use crate::UnitRegistry::unit_value::UnitValue;
use std::sync::OnceLock;

/// Unit patterns whose physical types count as concentrations.
pub const CONCENTRATION_PATTERNS: [&str; 8] = [
    "M",
    "g/m**3",
    "g/m**2",
    "cell**-1",
    "mol/m**2",
    "m**-3",
    "m**-2",
    "molecules",
];

/// Unit patterns whose physical types count as zero-order rates (concentration per time).
pub const RATE_PATTERNS: [&str; 7] = [
    "M/s",
    "mol/s",
    "g/s",
    "m**-2/s",
    "m**-3/s",
    "cell**-1*s**-1",
    "molecules*s**-1",
];

fn physical_types_of(patterns: &[&str]) -> Vec<String> {
    let registry = UnitRegistry::new();
    patterns
        .iter()
        .filter_map(|p| registry.parse(p).ok())
        .map(|unit| unit.physical_type())
        .collect()
}

fn concentration_types() -> &'static Vec<String> {
    static TYPES: OnceLock<Vec<String>> = OnceLock::new();
    TYPES.get_or_init(|| physical_types_of(&CONCENTRATION_PATTERNS))
}

fn rate_types() -> &'static Vec<String> {
    static TYPES: OnceLock<Vec<String>> = OnceLock::new();
    TYPES.get_or_init(|| physical_types_of(&RATE_PATTERNS))
}

/// Concentration patterns rendered the way units are displayed, for error messages.
pub fn concentration_unit_patterns() -> Vec<String> {
    let registry = UnitRegistry::new();
    CONCENTRATION_PATTERNS
        .iter()
        .filter_map(|p| registry.parse(p).ok())
        .map(|unit| unit.to_string())
        .collect()
}

pub fn is_concentration(unit: &UnitValue) -> bool {
    concentration_types().contains(&unit.physical_type())
}

pub fn is_zero_order_rate(unit: &UnitValue) -> bool {
    rate_types().contains(&unit.physical_type())
}

pub fn is_first_order_rate(unit: &UnitValue) -> bool {
    unit.physical_type() == "frequency"
}

/// `1 / ([concentration] * [time])`: exactly one time factor, with power -1, and the
/// remaining factors inverted form a concentration.
pub fn is_second_order_rate(unit: &UnitValue) -> bool {
    let bases = unit.bases();
    let powers = unit.powers();
    let time_factors: Vec<usize> = bases
        .iter()
        .enumerate()
        .filter(|(_, base)| base.physical_type() == "time")
        .map(|(i, _)| i)
        .collect();
    if time_factors.len() != 1 {
        return false;
    }
    let t = time_factors[0];
    if powers[t] != -1 {
        return false;
    }
    let rest = bases
        .iter()
        .zip(powers.iter())
        .enumerate()
        .filter(|(i, _)| *i != t)
        .try_fold(UnitValue::dimensionless(), |acc, (_, (base, power))| {
            acc.checked_mul(&base.checked_powi(-power)?)
        });
    rest.is_some_and(|rest| is_concentration(&rest))
}

/// Role used by the consistency check to group units that must agree.
pub fn unit_role(unit: &UnitValue) -> String {
    if is_concentration(unit) {
        "concentration".to_string()
    } else if is_zero_order_rate(unit) {
        "reaction rate".to_string()
    } else if is_second_order_rate(unit) {
        "second order rate constant".to_string()
    } else {
        unit.physical_type()
    }
}

/// Dispatch on reaction order. Orders above two have no rate pattern.
pub fn matches_reaction_order(unit: &UnitValue, order: usize) -> bool {
    match order {
        0 => is_zero_order_rate(unit),
        1 => is_first_order_rate(unit),
        2 => is_second_order_rate(unit),
        _ => false,
    }
}
