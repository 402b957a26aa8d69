//! `--source NAME=SPEC` arguments.
//!
//! SPEC is one of:
//! - `N` a single number
//! - `LO..HI` a closed range; either side may be left out for an unbounded one
//! - `..` any number
//! - `true` or `false`
//! - `bool` either boolean

use std::str::FromStr;

use thiserror::Error;
use tiny::{AbstractValue, Bindings, BooleanSet, Interval, IntervalError, Value};

#[derive(Debug, Error, PartialEq)]
pub enum SourceError {
    #[error("expected NAME=SPEC, got `{0}`")]
    MissingName(String),

    #[error("invalid value `{0}`; expected a number, LO..HI, `..`, true, false or bool")]
    InvalidSpec(String),

    #[error("invalid range: {0}")]
    InvalidRange(#[from] IntervalError),

    #[error("source `{0}` needs a single value when running concretely")]
    NotConcrete(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceSpec {
    Number(f64),
    Range { lo: f64, hi: f64 },
    Bool(bool),
    AnyBool,
}

impl SourceSpec {
    pub fn to_abstract(self) -> Result<AbstractValue, SourceError> {
        Ok(match self {
            SourceSpec::Number(n) => Interval::singleton(n).into(),
            SourceSpec::Range { lo, hi } => Interval::try_new(lo, hi)?.into(),
            SourceSpec::Bool(b) => BooleanSet::from_bool(b).into(),
            SourceSpec::AnyBool => BooleanSet::Unknown.into(),
        })
    }

    pub fn to_concrete(self) -> Option<Value> {
        match self {
            SourceSpec::Number(n) => Some(Value::Number(n)),
            SourceSpec::Bool(b) => Some(Value::Bool(b)),
            SourceSpec::Range { lo, hi } if lo == hi => Some(Value::Number(lo)),
            SourceSpec::Range { .. } | SourceSpec::AnyBool => None,
        }
    }
}

impl FromStr for SourceSpec {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || SourceError::InvalidSpec(s.to_string());
        let bound = |text: &str, unbounded: f64| -> Result<f64, SourceError> {
            let text = text.trim();
            if text.is_empty() {
                Ok(unbounded)
            } else {
                text.parse().map_err(|_| invalid())
            }
        };

        match s {
            "true" => Ok(SourceSpec::Bool(true)),
            "false" => Ok(SourceSpec::Bool(false)),
            "bool" => Ok(SourceSpec::AnyBool),
            _ => match s.split_once("..") {
                Some((lo, hi)) => Ok(SourceSpec::Range {
                    lo: bound(lo, f64::NEG_INFINITY)?,
                    hi: bound(hi, f64::INFINITY)?,
                }),
                None => {
                    let n: f64 = s.parse().map_err(|_| invalid())?;
                    if n.is_finite() { Ok(SourceSpec::Number(n)) } else { Err(invalid()) }
                }
            },
        }
    }
}

/// One `NAME=SPEC` command-line argument.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceArg {
    pub name: String,
    pub spec: SourceSpec,
}

impl FromStr for SourceArg {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, spec) = s
            .split_once('=')
            .ok_or_else(|| SourceError::MissingName(s.to_string()))?;
        let name = name.trim().strip_prefix("this.").unwrap_or(name.trim());
        if name.is_empty() {
            return Err(SourceError::MissingName(s.to_string()));
        }
        Ok(SourceArg {
            name: name.to_string(),
            spec: spec.parse()?,
        })
    }
}

/// Sources used when none are given on the command line.
pub fn default_abstract_sources() -> Bindings<AbstractValue> {
    [
        ("x", AbstractValue::from(Interval::new(0.0, 10.0))),
        ("y", Interval::new(-100.0, 100.0).into()),
        ("b", BooleanSet::Unknown.into()),
    ]
    .into_iter()
    .collect()
}

pub fn default_concrete_sources() -> Bindings<Value> {
    [
        ("x", Value::Number(10.0)),
        ("y", Value::Number(20.0)),
        ("b", Value::Bool(true)),
    ]
    .into_iter()
    .collect()
}

pub fn abstract_sources(args: &[SourceArg]) -> Result<Bindings<AbstractValue>, SourceError> {
    if args.is_empty() {
        return Ok(default_abstract_sources());
    }
    args.iter()
        .map(|arg| Ok((arg.name.as_str(), arg.spec.to_abstract()?)))
        .collect()
}

pub fn concrete_sources(args: &[SourceArg]) -> Result<Bindings<Value>, SourceError> {
    if args.is_empty() {
        return Ok(default_concrete_sources());
    }
    args.iter()
        .map(|arg| {
            let value = arg
                .spec
                .to_concrete()
                .ok_or_else(|| SourceError::NotConcrete(arg.name.clone()))?;
            Ok((arg.name.as_str(), value))
        })
        .collect()
}
