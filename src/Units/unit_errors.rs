use crate::UnitRegistry::unit_parser::UnitParseError;
use std::fmt;
use thiserror::Error;

/// Failures raised while attaching, converting or validating units.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("UnknownUnitError: {0}")]
    UnknownUnit(String),
    #[error("MissingUnitError: {0}")]
    MissingUnit(String),
    #[error("WrongUnitError: {0}")]
    WrongUnit(String),
    #[error("UnitConversionError: Unable to convert units {from} to {to}")]
    UnitConversion { from: String, to: String },
    /// Never raised: duplicate assignments are reported by the checker as warnings.
    #[error("DuplicateUnitError: {0}")]
    DuplicateUnit(String),
}

impl From<UnitParseError> for UnitError {
    fn from(e: UnitParseError) -> Self {
        UnitError::UnknownUnit(e.to_string())
    }
}

/// Diagnostics produced by the model-wide consistency check. They never abort
/// model assembly.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitsWarning {
    DuplicateUnits {
        kind: String,
        name: String,
    },
    MismatchedUnits {
        first_unit: String,
        first_kind: String,
        first_name: String,
        second_unit: String,
        second_kind: String,
        second_name: String,
        role: String,
    },
    MissingUnits {
        name: String,
    },
    NoUnits {
        model: String,
    },
}

impl fmt::Display for UnitsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitsWarning::DuplicateUnits { kind, name } => {
                write!(f, "{} '{}' has been assigned multiple units.", kind, name)
            }
            UnitsWarning::MismatchedUnits {
                first_unit,
                first_kind,
                first_name,
                second_unit,
                second_kind,
                second_name,
                role,
            } => write!(
                f,
                "Units '{}' for {} '{}' and '{}' for {} '{}' of unit-type '{}' do not match. Double-check units for consistency.",
                first_unit, first_kind, first_name, second_unit, second_kind, second_name, role
            ),
            UnitsWarning::MissingUnits { name } => {
                write!(f, "Parameter '{}' hasn't been assigned any units.", name)
            }
            UnitsWarning::NoUnits { model } => write!(f, "Model {} has no units to check.", model),
        }
    }
}
