//! Parser and evaluators for the tiny rule language.
//!
//! A program is a list of variable assignments (`name = expr`) and sink
//! assignments (`name: expr`) over named sources (`this.name`). It can be
//! run concretely with [`evaluator::interpret`], or abstractly over ranges
//! of source values with [`analyzer::evaluate`].

pub mod analyzer;
pub mod diagnostics;
pub mod domain;
pub mod environment;
pub mod errors;
pub mod evaluator;
pub mod parser;

pub use errors::ContractViolation;
