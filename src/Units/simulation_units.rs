use super::classifier::is_concentration;
use super::unit_errors::UnitError;
use crate::UnitRegistry::unit_definitions::{AVOGADRO, parse_unit};
use crate::UnitRegistry::unit_value::UnitValue;
use std::fmt;

/// Canonical concentration, time and optional volume units of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationUnits {
    concentration: String,
    time: String,
    volume: Option<String>,
    concentration_unit: UnitValue,
    time_unit: UnitValue,
    frequency_unit: UnitValue,
    volume_unit: Option<UnitValue>,
}

impl Default for SimulationUnits {
    fn default() -> Self {
        // both strings are built-in units
        Self::new("uM", "s", None).unwrap_or_else(|_| unreachable!())
    }
}

impl SimulationUnits {
    pub fn new(concentration: &str, time: &str, volume: Option<&str>) -> Result<Self, UnitError> {
        let concentration_unit = parse_unit(concentration).map_err(|_| {
            UnitError::UnknownUnit(format!(
                "Unrecognizable concentration unit pattern '{}'",
                concentration
            ))
        })?;
        if !is_concentration(&concentration_unit) {
            return Err(UnitError::WrongUnit(format!(
                "Concentration unit pattern '{}' isn't a recognized concentration pattern.",
                concentration
            )));
        }
        let time_unit = parse_unit(time).map_err(|_| {
            UnitError::UnknownUnit(format!("Unrecognizable time unit pattern '{}'", time))
        })?;
        if time_unit.physical_type() != "time" {
            return Err(UnitError::WrongUnit(format!(
                "Time unit pattern '{}' isn't a recognized time pattern.",
                time
            )));
        }
        let volume_unit = match volume {
            Some(v) => {
                let unit = parse_unit(v).map_err(|_| {
                    UnitError::UnknownUnit(format!("Unrecognizable volume unit pattern '{}'", v))
                })?;
                if unit.physical_type() != "volume" {
                    return Err(UnitError::WrongUnit(format!(
                        "Volume unit pattern '{}' isn't a recognized volume pattern.",
                        v
                    )));
                }
                Some(unit)
            }
            None => None,
        };
        Ok(SimulationUnits {
            concentration: concentration.to_string(),
            time: time.to_string(),
            volume: volume.map(str::to_string),
            frequency_unit: time_unit.inv(),
            concentration_unit,
            time_unit,
            volume_unit,
        })
    }

    pub fn concentration(&self) -> &str {
        &self.concentration
    }
    pub fn time(&self) -> &str {
        &self.time
    }
    pub fn frequency(&self) -> String {
        self.frequency_unit.to_string()
    }
    pub fn volume(&self) -> Option<&str> {
        self.volume.as_deref()
    }
    pub fn concentration_unit(&self) -> &UnitValue {
        &self.concentration_unit
    }
    pub fn time_unit(&self) -> &UnitValue {
        &self.time_unit
    }
    pub fn frequency_unit(&self) -> &UnitValue {
        &self.frequency_unit
    }
    pub fn volume_unit(&self) -> Option<&UnitValue> {
        self.volume_unit.as_ref()
    }

    /// Replaces concentration, time and volume pieces of `unit` with the canonical units.
    ///
    /// A unit that is a concentration as a whole collapses to the canonical
    /// concentration. Otherwise every (base, power) factor is replaced on its own and
    /// the factors are multiplied back together.
    pub fn convert_unit(&self, unit: &UnitValue) -> Result<UnitValue, UnitError> {
        if is_concentration(unit) {
            return Ok(self.concentration_unit.clone());
        }
        unit.bases()
            .iter()
            .zip(unit.powers())
            .try_fold(UnitValue::dimensionless(), |acc, (base, power)| {
                let physical_type = base.physical_type();
                let canonical = if is_concentration(base) {
                    &self.concentration_unit
                } else if physical_type == "time" {
                    &self.time_unit
                } else {
                    match &self.volume_unit {
                        Some(volume) if physical_type == "volume" => volume,
                        _ => base,
                    }
                };
                canonical
                    .checked_powi(power)
                    .and_then(|replaced| acc.checked_mul(&replaced))
                    .ok_or_else(|| UnitError::UnitConversion {
                        from: unit.to_string(),
                        to: self.to_string(),
                    })
            })
    }
}

impl fmt::Display for SimulationUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.volume {
            None => write!(
                f,
                "SimulationUnits(concentration='{}', time='{}')",
                self.concentration, self.time
            ),
            Some(v) => write!(
                f,
                "SimulationUnits(concentration='{}', time='{}', volume='{}')",
                self.concentration, self.time, v
            ),
        }
    }
}

/// Container volume used to turn molar concentrations into molecule counts.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeVolume {
    value: f64,
    unit: String,
    unit_value: UnitValue,
}

impl MoleculeVolume {
    pub fn new(value: f64, unit: &str) -> Result<Self, UnitError> {
        let unit_value = parse_unit(unit).map_err(|_| {
            UnitError::UnknownUnit(format!("Unrecognizable volume unit pattern '{}'", unit))
        })?;
        if unit_value.physical_type() != "volume" {
            return Err(UnitError::WrongUnit(format!(
                "Molecule volume unit '{}' isn't a volume.",
                unit
            )));
        }
        if !(value > 0.0) {
            return Err(UnitError::WrongUnit(format!(
                "Molecule volume must be positive, got {} {}.",
                value, unit
            )));
        }
        Ok(MoleculeVolume {
            value,
            unit: unit.to_string(),
            unit_value,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }
    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn cubic_meters(&self) -> f64 {
        self.value * self.unit_value.scale()
    }

    pub fn liters(&self) -> f64 {
        self.cubic_meters() * 1e3
    }

    /// Molecules in the volume per one `molar` concentration unit (molecules = M * L * N_A).
    pub fn molecules_per(&self, molar: &UnitValue) -> f64 {
        molar.scale() * self.cubic_meters() * AVOGADRO
    }
}

impl fmt::Display for MoleculeVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Factor between two single units: a direct conversion, or molar concentration
/// to and from molecule counts through the molecule volume.
fn scalar_factor(from: &UnitValue, to: &UnitValue, volume: Option<&MoleculeVolume>) -> Option<f64> {
    if let Ok(factor) = from.to(to) {
        return Some(factor);
    }
    let volume = volume?;
    match (from.physical_type().as_str(), to.physical_type().as_str()) {
        ("molar concentration", "number of molecules") => {
            Some(volume.molecules_per(from) / to.scale())
        }
        ("number of molecules", "molar concentration") => {
            Some(from.scale() / volume.molecules_per(to))
        }
        _ => None,
    }
}

/// Converts `from` into `to`, returning the factor that rescales values.
///
/// Tries a direct conversion first, then a conversion of aligned (base, power)
/// factors. The piecewise pass lets `1/(M*s)` become `1/(molecules*s)`.
pub fn conversion_factor(
    from: &UnitValue,
    to: &UnitValue,
    volume: Option<&MoleculeVolume>,
) -> Result<f64, UnitError> {
    let failure = || UnitError::UnitConversion {
        from: from.to_string(),
        to: to.to_string(),
    };
    if let Some(factor) = scalar_factor(from, to, volume) {
        return Ok(factor);
    }
    let (from_bases, from_powers) = (from.bases(), from.powers());
    let to_bases = to.bases();
    if from_bases.len() != to_bases.len() || from_bases.is_empty() {
        return Err(failure());
    }
    let mut factor = 1.0;
    for ((base, power), target) in from_bases.iter().zip(from_powers).zip(to_bases.iter()) {
        let piece = scalar_factor(base, target, volume).ok_or_else(failure)?;
        factor *= piece.powi(power);
    }
    // the pieces must describe the target as a whole
    let converted = from_bases
        .iter()
        .zip(from.powers())
        .zip(to_bases.iter())
        .try_fold(UnitValue::dimensionless(), |acc, ((_, power), target)| {
            acc.checked_mul(&target.checked_powi(power)?)
        })
        .ok_or_else(failure)?;
    if converted != *to {
        return Err(failure());
    }
    Ok(factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit(s: &str) -> UnitValue {
        parse_unit(s).unwrap()
    }

    #[test]
    fn test_policy_construction() {
        let policy = SimulationUnits::default();
        assert_eq!(policy.concentration(), "uM");
        assert_eq!(policy.frequency(), "1 / s");
        assert_eq!(
            policy.to_string(),
            "SimulationUnits(concentration='uM', time='s')"
        );
        assert!(matches!(
            SimulationUnits::new("bogus", "s", None),
            Err(UnitError::UnknownUnit(_))
        ));
        assert!(matches!(
            SimulationUnits::new("s", "s", None),
            Err(UnitError::WrongUnit(_))
        ));
        assert!(matches!(
            SimulationUnits::new("uM", "uM", None),
            Err(UnitError::WrongUnit(_))
        ));
        let with_volume = SimulationUnits::new("nM", "min", Some("pL")).unwrap();
        assert_eq!(with_volume.volume(), Some("pL"));
    }

    #[test]
    fn test_convert_unit_piecewise() {
        let policy = SimulationUnits::new("molecules", "s", None).unwrap();
        assert_eq!(policy.convert_unit(&unit("nM")).unwrap().to_string(), "molecules");
        assert_eq!(
            policy.convert_unit(&unit("1/(M*min)")).unwrap().to_string(),
            "1 / (molecules * s)"
        );
        assert_eq!(policy.convert_unit(&unit("1/h")).unwrap().to_string(), "1 / s");
        // untouched factors survive
        let with_volume = SimulationUnits::new("uM", "s", Some("L")).unwrap();
        assert_eq!(with_volume.convert_unit(&unit("mL/s")).unwrap().to_string(), "L / s");
        assert_eq!(policy.convert_unit(&unit("mL/s")).unwrap().to_string(), "mL / s");
    }

    #[test]
    fn test_molar_to_molecules_factor() {
        let volume = MoleculeVolume::new(1.0, "pL").unwrap();
        assert_relative_eq!(volume.liters(), 1e-12, epsilon = 1e-24);
        let factor = conversion_factor(&unit("nM"), &unit("molecules"), Some(&volume)).unwrap();
        assert_relative_eq!(factor, 602.214076, epsilon = 1e-6);
        let rate = conversion_factor(
            &unit("1/(M*s)"),
            &unit("1/(molecules*s)"),
            Some(&volume),
        )
        .unwrap();
        assert_relative_eq!(rate, 1.0 / 6.02214076e11, max_relative = 1e-9);
        let back = conversion_factor(&unit("molecules"), &unit("uM"), Some(&volume)).unwrap();
        assert_relative_eq!(back * 602214.076, 1.0, max_relative = 1e-9);
    }

    #[test]
    fn test_conversion_failures() {
        assert!(matches!(
            conversion_factor(&unit("nM"), &unit("molecules"), None),
            Err(UnitError::UnitConversion { .. })
        ));
        assert!(conversion_factor(&unit("1/s"), &unit("uM"), None).is_err());
        assert!(MoleculeVolume::new(1.0, "uM").is_err());
        assert!(MoleculeVolume::new(0.0, "L").is_err());
    }
}
