//! # Unit Registry
//!
//! ## Purpose
//! Unit algebra consumed by the unit-checking engine: parse unit strings, compose
//! them with `*`, `/` and integer powers, decompose them into (base, power) factors,
//! convert between compatible units and name the physical type of a unit.
//!
//! ## Main Data Structures
//! - `Dimension`: exponent map over base quantities (SI plus `cell`, `molecules`
//!   and opaque `unit(<pattern>)` tags)
//! - `NamedUnit`: a symbol with its SI scale and dimension
//! - `UnitValue`: ordered (named unit, power) factors
//! - `UnitRegistry`: symbol table with SI prefixes and runtime definitions
//!
//! ## Usage
//! ```rust
//! use KinUnits::UnitRegistry::unit_definitions::parse_unit;
//! let k = parse_unit("1/(uM*s)").unwrap();
//! assert_eq!(k.to_string(), "1 / (uM * s)");
//! assert_eq!(parse_unit("umol/L").unwrap(), parse_unit("uM").unwrap());
//! ```
//!
//! ## Interesting Features
//! - exact symbols win over prefixed readings (`min` is minutes, `mM` millimolar)
//! - molar concentration only accepts small prefixes
//! - the process-wide registry lives behind `OnceLock<Mutex<_>>` and is accessed
//!   through `with_unit_registry` / `with_unit_registry_mut`
pub mod dimension;
pub mod unit_definitions;
pub mod unit_parser;
pub mod unit_value;
mod unit_registry_tests;
