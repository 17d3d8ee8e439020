//! # Model
//!
//! ## Purpose
//! Minimal host for rule-based models: monomers, parameters, expressions,
//! observables, initial conditions and rules. Every constructor that can carry a
//! unit runs the unit engine from `crate::Units` before the component is stored,
//! so a failed unit check leaves the model untouched.
//!
//! ## Main Data Structures
//! - `Model`: owns components, unit annotations, the simulation unit policy and the
//!   molecule volume
//! - `Component`: enum over `Parameter`, `Expression` and `Observable`, dispatching
//!   the `UnitBearing` trait with `enum_dispatch`
//! - `RuleExpression`: parsed `reactants >> products` or `reactants | products`
//! - `ModelError`: every failure of model construction, unit errors included
//!
//! ## Usage
//! ```rust
//! use KinUnits::Model::model::Model;
//! let mut model = Model::new("binding");
//! model.set_simulation_units("uM", "s", None).unwrap();
//! model.monomer("A", &["b"], &[]).unwrap();
//! model.monomer("B", &["a"], &[]).unwrap();
//! model.parameter("kf", 1e-3, Some("1/(nM*s)")).unwrap();
//! model.parameter("kr", 1.0, Some("1/s")).unwrap();
//! model
//!     .rule("bind", "A(b=None) + B(a=None) | A(b=1) % B(a=1)", "kf", Some("kr"))
//!     .unwrap();
//! assert_eq!(model.unit_map()["kf"], "1 / (uM * s)");
//! ```
//!
//! ## Interesting Features
//! - annotations are kept in creation order and components point at their latest
//!   one, so duplicate assignments remain visible to the consistency check
//! - reaction orders are derived from the rule patterns on request
pub mod components;
pub mod model;
pub mod model_errors;
pub mod rule_expression;
mod model_tests;
