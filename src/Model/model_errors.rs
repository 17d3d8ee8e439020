use crate::Units::unit_errors::UnitError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error(transparent)]
    Units(#[from] UnitError),
    #[error("component '{0}' already exists in the model")]
    DuplicateComponent(String),
    #[error("no component named '{0}' in the model")]
    UnknownComponent(String),
    #[error("monomer '{0}' has not been declared")]
    UnknownMonomer(String),
    #[error("monomer '{monomer}' has no site '{site}'")]
    UnknownSite { monomer: String, site: String },
    #[error("'{name}' is a {found}, expected {expected}")]
    InvalidComponentKind {
        name: String,
        found: String,
        expected: String,
    },
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("invalid rule expression '{expression}': {reason}")]
    InvalidRuleExpression { expression: String, reason: String },
    #[error("invalid expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },
    #[error("rule '{rule}': {reason}")]
    ReverseRateMismatch { rule: String, reason: String },
}
