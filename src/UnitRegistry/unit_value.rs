use super::dimension::Dimension;
use std::fmt;
use thiserror::Error;

/// Relative tolerance used when two scales are compared.
const SCALE_TOLERANCE: f64 = 1e-9;

/// Largest power magnitude a single unit factor may carry.
pub const MAX_POWER: i32 = 64;

fn bounded(power: Option<i32>) -> Option<i32> {
    power.filter(|p| (-MAX_POWER..=MAX_POWER).contains(p))
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("units '{from}' and '{to}' are not convertible")]
pub struct ConversionError {
    pub from: String,
    pub to: String,
}

/// A named unit symbol (possibly prefixed) with its SI scale and dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedUnit {
    pub symbol: String,
    /// factor that turns one of this unit into SI base units (kg, m, s, mol, ...)
    pub scale: f64,
    pub dimension: Dimension,
}

impl NamedUnit {
    pub fn new(symbol: &str, scale: f64, dimension: Dimension) -> Self {
        NamedUnit {
            symbol: symbol.to_string(),
            scale,
            dimension,
        }
    }

    pub fn physical_type(&self) -> String {
        self.dimension.physical_type()
    }
}

/// Structured unit value: an ordered list of (named base, integer power) factors.
///
/// Factors keep the order in which they were first composed. Repeated bases merge
/// and factors whose power drops to zero disappear, so `s * s` is `s**2` and
/// `uM / uM` is dimensionless.
#[derive(Debug, Clone, Default)]
pub struct UnitValue {
    factors: Vec<(NamedUnit, i32)>,
}

impl UnitValue {
    pub fn dimensionless() -> Self {
        UnitValue {
            factors: Vec::new(),
        }
    }

    pub fn from_named(unit: NamedUnit) -> Self {
        UnitValue {
            factors: vec![(unit, 1)],
        }
    }

    pub fn factors(&self) -> &[(NamedUnit, i32)] {
        &self.factors
    }

    /// Each base as a unit value of power one.
    pub fn bases(&self) -> Vec<UnitValue> {
        self.factors
            .iter()
            .map(|(base, _)| UnitValue::from_named(base.clone()))
            .collect()
    }

    pub fn powers(&self) -> Vec<i32> {
        self.factors.iter().map(|(_, p)| *p).collect()
    }

    pub fn is_dimensionless(&self) -> bool {
        self.factors.is_empty()
    }

    /// Merges `unit**power` into the factor list; `None` once a power leaves
    /// `±MAX_POWER`.
    fn push_factor(&mut self, unit: &NamedUnit, power: i32) -> Option<()> {
        if power == 0 {
            return Some(());
        }
        if let Some(pos) = self
            .factors
            .iter()
            .position(|(base, _)| base.symbol == unit.symbol)
        {
            let merged = bounded(self.factors[pos].1.checked_add(power))?;
            if merged == 0 {
                self.factors.remove(pos);
            } else {
                self.factors[pos].1 = merged;
            }
        } else {
            self.factors.push((unit.clone(), bounded(Some(power))?));
        }
        Some(())
    }

    /// Product of two units, `None` if a resulting power is out of range.
    pub fn checked_mul(&self, other: &UnitValue) -> Option<UnitValue> {
        let mut out = self.clone();
        for (unit, power) in &other.factors {
            out.push_factor(unit, *power)?;
        }
        Some(out)
    }

    pub fn checked_div(&self, other: &UnitValue) -> Option<UnitValue> {
        self.checked_mul(&other.inv())
    }

    pub fn checked_powi(&self, power: i32) -> Option<UnitValue> {
        if power == 0 {
            return Some(UnitValue::dimensionless());
        }
        let factors = self
            .factors
            .iter()
            .map(|(unit, p)| bounded(p.checked_mul(power)).map(|p| (unit.clone(), p)))
            .collect::<Option<Vec<_>>>()?;
        Some(UnitValue { factors })
    }

    /// Reciprocal. Negating a power keeps it within `±MAX_POWER`.
    pub fn inv(&self) -> UnitValue {
        UnitValue {
            factors: self
                .factors
                .iter()
                .map(|(unit, p)| (unit.clone(), -p))
                .collect(),
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.factors
            .iter()
            .fold(Dimension::dimensionless(), |acc, (unit, p)| {
                acc.mul(&unit.dimension.powi(*p))
            })
    }

    /// Scale of the whole unit relative to SI base units.
    pub fn scale(&self) -> f64 {
        self.factors
            .iter()
            .fold(1.0, |acc, (unit, p)| acc * unit.scale.powi(*p))
    }

    pub fn physical_type(&self) -> String {
        self.dimension().physical_type()
    }

    /// Scalar factor `f` such that `x self == x * f other`.
    pub fn to(&self, other: &UnitValue) -> Result<f64, ConversionError> {
        if self.dimension() != other.dimension() {
            return Err(ConversionError {
                from: self.to_string(),
                to: other.to_string(),
            });
        }
        Ok(self.scale() / other.scale())
    }
}

impl PartialEq for UnitValue {
    fn eq(&self, other: &Self) -> bool {
        if self.dimension() != other.dimension() {
            return false;
        }
        let ratio = self.scale() / other.scale();
        (ratio - 1.0).abs() < SCALE_TOLERANCE
    }
}

fn render_factor(symbol: &str, power: i32) -> String {
    if power == 1 {
        symbol.to_string()
    } else {
        format!("{}**{}", symbol, power)
    }
}

impl fmt::Display for UnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.factors.is_empty() {
            return write!(f, "1");
        }
        let numerator: Vec<String> = self
            .factors
            .iter()
            .filter(|(_, p)| *p > 0)
            .map(|(u, p)| render_factor(&u.symbol, *p))
            .collect();
        let denominator: Vec<String> = self
            .factors
            .iter()
            .filter(|(_, p)| *p < 0)
            .map(|(u, p)| render_factor(&u.symbol, -p))
            .collect();
        let num = if numerator.is_empty() {
            "1".to_string()
        } else {
            numerator.join(" * ")
        };
        match denominator.len() {
            0 => write!(f, "{}", num),
            1 => write!(f, "{} / {}", num, denominator[0]),
            _ => write!(f, "{} / ({})", num, denominator.join(" * ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnitRegistry::dimension::{AMOUNT, LENGTH, TIME};
    use approx::assert_relative_eq;

    fn second() -> UnitValue {
        UnitValue::from_named(NamedUnit::new("s", 1.0, Dimension::base(TIME)))
    }
    fn micromolar() -> UnitValue {
        let dim = Dimension::base(AMOUNT).with(LENGTH, -3);
        UnitValue::from_named(NamedUnit::new("uM", 1e-3, dim))
    }

    #[test]
    fn test_merge_and_cancel() {
        let s2 = second().checked_mul(&second()).unwrap();
        assert_eq!(s2.factors().len(), 1);
        assert_eq!(s2.powers(), vec![2]);
        assert!(micromolar().checked_div(&micromolar()).unwrap().is_dimensionless());
    }

    #[test]
    fn test_powers_stay_in_range() {
        let top = second().checked_powi(MAX_POWER).unwrap();
        assert_eq!(top.powers(), vec![MAX_POWER]);
        assert!(top.checked_mul(&second()).is_none());
        assert!(top.inv().checked_div(&second()).is_none());
        assert!(second().checked_powi(MAX_POWER + 1).is_none());
        assert!(top.checked_powi(i32::MAX).is_none());
        assert!(second().checked_powi(i32::MIN).is_none());
        assert!(top.checked_mul(&top.inv()).unwrap().is_dimensionless());
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(UnitValue::dimensionless().to_string(), "1");
        assert_eq!(micromolar().checked_div(&second()).unwrap().to_string(), "uM / s");
        assert_eq!(
            micromolar().checked_mul(&second()).unwrap().inv().to_string(),
            "1 / (uM * s)"
        );
        assert_eq!(second().checked_powi(-2).unwrap().to_string(), "1 / s**2");
    }

    #[test]
    fn test_conversion_factor() {
        let nm = UnitValue::from_named(NamedUnit::new(
            "nM",
            1e-6,
            Dimension::base(AMOUNT).with(LENGTH, -3),
        ));
        assert_relative_eq!(nm.to(&micromolar()).unwrap(), 1e-3, epsilon = 1e-15);
        assert!(nm.to(&second()).is_err());
    }
}
