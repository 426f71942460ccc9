//! Attribute predicates: a small boolean expression tree evaluated against
//! features.
//!
//! Evaluation is two-valued. A comparison against a missing attribute, or
//! against a value of a different kind than the literal, is false; `Not` is
//! plain boolean negation. Ordering comparisons are only defined for numbers.

use serde::{Deserialize, Serialize};

// other maps use HashMap with a fast non-cryptographic hasher
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;
use std::collections::HashMap;

use std::cmp::Ordering;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{CoverageError, Result};

pub type AttributeHasher = BuildHasherDefault<SeaHasher>;

lazy_static! {
    static ref ATTRIBUTE_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_.:\-]*$").unwrap();
}

// ------------- Value -------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// The kind of a value, also used to declare attributes in a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Bool,
    Number,
    Text,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::Text(_) => ValueKind::Text,
        }
    }
    fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}
impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}
impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}
impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

// ------------- Feature -------------
/// The attribute values of a single feature, used when evaluating predicates.
#[derive(Debug, Clone, Default)]
pub struct Feature {
    values: HashMap<String, Value, AttributeHasher>,
}
impl Feature {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with(mut self, attribute: &str, value: impl Into<Value>) -> Self {
        self.set(attribute, value.into());
        self
    }
    pub fn set(&mut self, attribute: &str, value: Value) {
        self.values.insert(attribute.to_owned(), value);
    }
    pub fn unset(&mut self, attribute: &str) {
        self.values.remove(attribute);
    }
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.values.get(attribute)
    }
}

// ------------- CompareOp -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "<>")]
    NotEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterOrEqual,
}
impl CompareOp {
    pub fn is_ordering(&self) -> bool {
        !matches!(self, CompareOp::Equal | CompareOp::NotEqual)
    }
    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Equal => ordering == Ordering::Equal,
            CompareOp::NotEqual => ordering != Ordering::Equal,
            CompareOp::Less => ordering == Ordering::Less,
            CompareOp::LessOrEqual => ordering != Ordering::Greater,
            CompareOp::Greater => ordering == Ordering::Greater,
            CompareOp::GreaterOrEqual => ordering != Ordering::Less,
        }
    }
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::NotEqual => "<>",
            CompareOp::Less => "<",
            CompareOp::LessOrEqual => "<=",
            CompareOp::Greater => ">",
            CompareOp::GreaterOrEqual => ">=",
        }
    }
}

// ------------- Predicate -------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Always true.
    Include,
    /// Always false.
    Exclude,
    Compare {
        attribute: String,
        op: CompareOp,
        value: Value,
    },
    Not(Box<Predicate>),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Builds a validated comparison literal.
    pub fn compare(attribute: &str, op: CompareOp, value: impl Into<Value>) -> Result<Self> {
        let predicate = Predicate::Compare {
            attribute: attribute.to_owned(),
            op,
            value: value.into(),
        };
        predicate.validate()?;
        Ok(predicate)
    }
    pub fn equal(attribute: &str, value: impl Into<Value>) -> Result<Self> {
        Self::compare(attribute, CompareOp::Equal, value)
    }
    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::And(vec![left, right])
    }
    pub fn or(left: Predicate, right: Predicate) -> Self {
        Predicate::Or(vec![left, right])
    }
    pub fn negate(predicate: Predicate) -> Self {
        Predicate::Not(Box::new(predicate))
    }

    /// Checks every literal: attribute names must be plain identifiers,
    /// numbers cannot be NaN and ordering needs a numeric literal.
    pub fn validate(&self) -> Result<()> {
        match self {
            Predicate::Include | Predicate::Exclude => Ok(()),
            Predicate::Compare { attribute, op, value } => {
                if !ATTRIBUTE_NAME.is_match(attribute) {
                    return Err(CoverageError::predicate(format!(
                        "Invalid attribute name '{attribute}'"
                    )));
                }
                if let Value::Number(n) = value {
                    if n.is_nan() {
                        return Err(CoverageError::predicate(format!(
                            "NaN literal compared with '{attribute}'"
                        )));
                    }
                }
                if op.is_ordering() && value.kind() != ValueKind::Number {
                    return Err(CoverageError::predicate(format!(
                        "Ordering comparison not allowed for {attribute} {} {value}",
                        op.symbol()
                    )));
                }
                Ok(())
            }
            Predicate::Not(inner) => inner.validate(),
            Predicate::And(operands) | Predicate::Or(operands) => {
                operands.iter().try_for_each(Predicate::validate)
            }
        }
    }

    pub fn evaluate(&self, feature: &Feature) -> bool {
        match self {
            Predicate::Include => true,
            Predicate::Exclude => false,
            Predicate::Compare { attribute, op, value } => feature
                .get(attribute)
                .and_then(|actual| actual.compare(value))
                .is_some_and(|ordering| op.accepts(ordering)),
            Predicate::Not(inner) => !inner.evaluate(feature),
            Predicate::And(operands) => operands.iter().all(|p| p.evaluate(feature)),
            Predicate::Or(operands) => operands.iter().any(|p| p.evaluate(feature)),
        }
    }

    /// Calls `visit` with every comparison literal, depth first.
    pub fn visit_literals<'a>(&'a self, visit: &mut impl FnMut(&'a str, CompareOp, &'a Value)) {
        match self {
            Predicate::Include | Predicate::Exclude => (),
            Predicate::Compare { attribute, op, value } => visit(attribute, *op, value),
            Predicate::Not(inner) => inner.visit_literals(visit),
            Predicate::And(operands) | Predicate::Or(operands) => {
                for operand in operands {
                    operand.visit_literals(visit);
                }
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Predicate::Include => write!(f, "INCLUDE"),
            Predicate::Exclude => write!(f, "EXCLUDE"),
            Predicate::Compare { attribute, op, value } => {
                write!(f, "{} {} {}", attribute, op.symbol(), value)
            }
            Predicate::Not(inner) => write!(f, "NOT ({})", inner),
            Predicate::And(operands) => write_junction(f, operands, " AND "),
            Predicate::Or(operands) => write_junction(f, operands, " OR "),
        }
    }
}

fn write_junction(f: &mut fmt::Formatter, operands: &[Predicate], separator: &str) -> fmt::Result {
    write!(f, "[")?;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", separator)?;
        }
        write!(f, "{}", operand)?;
    }
    write!(f, "]")
}
