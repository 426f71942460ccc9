//! Rule selectors: the guard of a rule, combining scale constraints and
//! attribute predicates with conjunctions and disjunctions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoverageError, Result};
use crate::interval::ScaleRange;
use crate::predicate::Predicate;
use crate::schema::Schema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// Matches everything.
    Accept,
    Scale(ScaleRange),
    Data(Predicate),
    And(Vec<Selector>),
    Or(Vec<Selector>),
}

impl Selector {
    /// Conjunction, flattening nested conjunctions.
    pub fn and(left: Selector, right: Selector) -> Self {
        let mut children = Vec::new();
        for s in [left, right] {
            match s {
                Selector::And(inner) => children.extend(inner),
                other => children.push(other),
            }
        }
        Selector::And(children)
    }
    /// Disjunction, flattening nested disjunctions. Selectors meant for
    /// [`DomainCoverage::add_rule`](crate::coverage::DomainCoverage::add_rule)
    /// should be built with this; an `Or` constructed directly with another
    /// `Or` inside is rejected there with `NestedDisjunction`.
    pub fn or(left: Selector, right: Selector) -> Self {
        let mut children = Vec::new();
        for s in [left, right] {
            match s {
                Selector::Or(inner) => children.extend(inner),
                other => children.push(other),
            }
        }
        Selector::Or(children)
    }

    fn has_scale(&self) -> bool {
        match self {
            Selector::Scale(_) => true,
            Selector::Accept | Selector::Data(_) => false,
            Selector::And(children) | Selector::Or(children) => children.iter().any(Selector::has_scale),
        }
    }

    /// The scale constraint of a conjunctive selector, intersecting all of its
    /// scale terms, or `None` when it does not constrain scale at all.
    pub fn scale_range(&self) -> Result<Option<ScaleRange>> {
        match self {
            Selector::Accept | Selector::Data(_) => Ok(None),
            Selector::Scale(range) => Ok(Some(*range)),
            Selector::And(children) => {
                let mut range: Option<ScaleRange> = None;
                for child in children {
                    if let Some(r) = child.scale_range()? {
                        range = Some(match range {
                            Some(current) => current.intersect(&r),
                            None => r,
                        });
                    }
                }
                Ok(range)
            }
            Selector::Or(_) if self.has_scale() => Err(CoverageError::range(
                "a disjunction of scale constraints cannot be reduced to a single scale range",
            )),
            Selector::Or(_) => Ok(None),
        }
    }

    /// The attribute condition of the selector as a predicate. Literals are
    /// validated, and checked against the schema when there is one.
    pub fn predicate(&self, schema: Option<&Schema>) -> Result<Predicate> {
        match self {
            Selector::Accept | Selector::Scale(_) => Ok(Predicate::Include),
            Selector::Data(predicate) => {
                predicate.validate()?;
                if let Some(schema) = schema {
                    schema.check(predicate)?;
                }
                Ok(predicate.clone())
            }
            Selector::And(children) => Ok(Predicate::And(
                children
                    .iter()
                    .map(|c| c.predicate(schema))
                    .collect::<Result<Vec<_>>>()?,
            )),
            Selector::Or(children) => {
                if self.has_scale() {
                    return Err(CoverageError::predicate(
                        "a disjunction mixing scale constraints cannot be expressed as a predicate",
                    ));
                }
                Ok(Predicate::Or(
                    children
                        .iter()
                        .map(|c| c.predicate(schema))
                        .collect::<Result<Vec<_>>>()?,
                ))
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Selector::Accept => write!(f, "*"),
            Selector::Scale(range) => write!(f, "@scale {}", range),
            Selector::Data(predicate) => write!(f, "{}", predicate),
            Selector::And(children) | Selector::Or(children) => {
                let separator = if matches!(self, Selector::And(_)) { " AND " } else { " OR " };
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", separator)?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}
