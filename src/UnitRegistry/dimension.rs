//! Dimensional bookkeeping for unit values.
//!
//! A dimension is an exponent map over base quantities. Besides the SI base
//! quantities it carries the two counting dimensions used by biochemical models
//! (`cell` and `molecules`) and one opaque dimension per `unit(<pattern>)` tag,
//! so that counts of an uncategorised observable never cancel against anything else.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

pub const MASS: &str = "mass";
pub const LENGTH: &str = "length";
pub const TIME: &str = "time";
pub const CURRENT: &str = "current";
pub const TEMPERATURE: &str = "temperature";
pub const AMOUNT: &str = "amount";
pub const LUMINOSITY: &str = "luminosity";
pub const CELL: &str = "cell";
pub const MOLECULES: &str = "molecules";

/// Names of the built-in base quantities; runtime base units may not reuse them.
pub const BASE_QUANTITIES: [&str; 9] = [
    MASS,
    LENGTH,
    TIME,
    CURRENT,
    TEMPERATURE,
    AMOUNT,
    LUMINOSITY,
    CELL,
    MOLECULES,
];

/// Exponents of base quantities. Zero exponents are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Dimension(BTreeMap<String, i32>);

impl Dimension {
    pub fn dimensionless() -> Self {
        Dimension(BTreeMap::new())
    }

    pub fn base(name: &str) -> Self {
        Self::dimensionless().with(name, 1)
    }

    /// Builder used by the physical-type table and by unit definitions.
    pub fn with(mut self, name: &str, exponent: i32) -> Self {
        let entry = self.0.entry(name.to_string()).or_insert(0);
        *entry = entry.saturating_add(exponent);
        if *entry == 0 {
            self.0.remove(name);
        }
        self
    }

    /// Opaque dimension of a `unit(<pattern>)` tag.
    pub fn opaque(tag: &str) -> Self {
        Self::base(&format!("unit({})", tag))
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0.is_empty()
    }

    pub fn exponent(&self, name: &str) -> i32 {
        self.0.get(name).copied().unwrap_or(0)
    }

    /// Largest exponent magnitude, 0 when dimensionless.
    pub fn max_exponent(&self) -> i32 {
        self.0.values().map(|e| e.saturating_abs()).max().unwrap_or(0)
    }

    pub fn mul(&self, other: &Dimension) -> Dimension {
        let mut out = self.clone();
        for (name, exp) in &other.0 {
            out = out.with(name, *exp);
        }
        out
    }

    pub fn powi(&self, power: i32) -> Dimension {
        if power == 0 {
            return Dimension::dimensionless();
        }
        Dimension(
            self.0
                .iter()
                .map(|(name, exp)| (name.clone(), exp.saturating_mul(power)))
                .collect(),
        )
    }

    pub fn inv(&self) -> Dimension {
        self.powi(-1)
    }

    /// Named physical type of this dimension, `"unknown"` if it has no name.
    pub fn physical_type(&self) -> String {
        physical_type_table()
            .iter()
            .find(|(dim, _)| dim == self)
            .map(|(_, name)| name.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "1");
        }
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(name, exp)| {
                if *exp == 1 {
                    name.clone()
                } else {
                    format!("{}^{}", name, exp)
                }
            })
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

fn physical_type_table() -> &'static Vec<(Dimension, &'static str)> {
    static TABLE: OnceLock<Vec<(Dimension, &'static str)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let d = Dimension::dimensionless;
        vec![
            (d(), "dimensionless"),
            (d().with(TIME, 1), "time"),
            (d().with(TIME, -1), "frequency"),
            (d().with(LENGTH, 1), "length"),
            (d().with(LENGTH, 2), "area"),
            (d().with(LENGTH, 3), "volume"),
            (d().with(MASS, 1), "mass"),
            (d().with(AMOUNT, 1), "amount of substance"),
            (d().with(TEMPERATURE, 1), "temperature"),
            (d().with(CURRENT, 1), "electrical current"),
            (d().with(LUMINOSITY, 1), "luminous intensity"),
            (d().with(LENGTH, 1).with(TIME, -1), "speed"),
            (d().with(MASS, 1).with(LENGTH, 2).with(TIME, -2), "energy"),
            (d().with(MASS, 1).with(LENGTH, 1).with(TIME, -2), "force"),
            (d().with(MASS, 1).with(LENGTH, -1).with(TIME, -2), "pressure"),
            // concentration shapes
            (d().with(AMOUNT, 1).with(LENGTH, -3), "molar concentration"),
            (d().with(MASS, 1).with(LENGTH, -3), "mass density"),
            (d().with(MASS, 1).with(LENGTH, -2), "surface mass density"),
            (d().with(CELL, 1), "cell"),
            (d().with(CELL, -1), "number per cell"),
            (d().with(AMOUNT, 1).with(LENGTH, -2), "mole area density"),
            (d().with(LENGTH, -3), "number density"),
            (d().with(LENGTH, -2), "column density"),
            (d().with(MOLECULES, 1), "number of molecules"),
            // concentration per time shapes
            (
                d().with(AMOUNT, 1).with(LENGTH, -3).with(TIME, -1),
                "molar reaction rate",
            ),
            (d().with(AMOUNT, 1).with(TIME, -1), "catalytic activity"),
            (d().with(MASS, 1).with(TIME, -1), "mass velocity"),
            (d().with(LENGTH, -2).with(TIME, -1), "particle flux"),
            (d().with(LENGTH, -3).with(TIME, -1), "volumetric number rate"),
            (d().with(CELL, -1).with(TIME, -1), "number per cell rate"),
            (d().with(CELL, 1).with(TIME, -1), "cellular reaction rate"),
            (d().with(MOLECULES, 1).with(TIME, -1), "molecule rate"),
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponent_algebra() {
        let molar = Dimension::base(AMOUNT).mul(&Dimension::base(LENGTH).powi(-3));
        assert_eq!(molar.exponent(AMOUNT), 1);
        assert_eq!(molar.exponent(LENGTH), -3);
        assert!(molar.mul(&molar.inv()).is_dimensionless());
        assert_eq!(molar.physical_type(), "molar concentration");
    }

    #[test]
    fn test_frequency_and_unknown() {
        assert_eq!(Dimension::base(TIME).inv().physical_type(), "frequency");
        assert_eq!(Dimension::base(TIME).powi(-2).physical_type(), "unknown");
        assert_eq!(Dimension::opaque("A()").physical_type(), "unknown");
    }
}
