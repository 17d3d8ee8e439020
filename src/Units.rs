//! # Units
//!
//! ## Purpose
//! Unit inference and consistency checking for rule-based models. Parameters,
//! expressions and observables get unit annotations; rules have their rate units
//! checked against reaction order; a model-wide check reports duplicates,
//! disagreements and missing units.
//!
//! ## Main Data Structures
//! - `UnitAnnotation`: binds one component to one unit, with optional conversion
//!   factor and observable pattern
//! - `SimulationUnits`: the concentration/time/volume policy every parameter unit is
//!   converted into
//! - `MoleculeVolume`: volume used to turn molar amounts into molecule counts
//! - `UnitError` / `UnitsWarning`: hard failures and soft findings
//!
//! ## Usage
//! ```rust
//! use KinUnits::Units::define_with_units::define_with_units;
//! let definition = define_with_units("degradation", |model| {
//!     model.monomer("A", &[], &[])?;
//!     model.parameter("k", 0.1, Some("1/s"))?;
//!     model.rule("decay", "A() >> None", "k", None)?;
//!     Ok(())
//! })
//! .unwrap();
//! assert!(definition.warnings.is_empty());
//! ```
//!
//! ## Interesting Features
//! - unit patterns are classified by physical type, so `uM`, `mol/L` and
//!   `molecules` all count as concentrations
//! - expression units are composed symbolically by substituting each referenced
//!   component with its unit
//! - the consistency check also runs when a definition scope unwinds
pub mod classifier;
pub mod consistency_check;
pub mod define_with_units;
pub mod expression_units;
pub mod rule_validation;
pub mod simulation_units;
pub mod unit_annotation;
pub mod unit_errors;
