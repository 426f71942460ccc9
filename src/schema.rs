//! The target schema a rule set is compiled against: a flat list of attribute
//! declarations. Predicate construction checks literals against it, and the
//! simplifier uses it to know which values an attribute can actually take.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoverageError, Result};
use crate::predicate::{Predicate, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    kind: ValueKind,
    // a missing value is possible only for nullable attributes
    #[serde(default)]
    nullable: bool,
}
impl Attribute {
    pub fn new(kind: ValueKind, nullable: bool) -> Self {
        Self { kind, nullable }
    }
    pub fn kind(&self) -> ValueKind {
        self.kind
    }
    pub fn nullable(&self) -> bool {
        self.nullable
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    name: String,
    attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            attributes: BTreeMap::new(),
        }
    }
    pub fn with_attribute(mut self, name: &str, kind: ValueKind, nullable: bool) -> Self {
        self.attributes.insert(name.to_owned(), Attribute::new(kind, nullable));
        self
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
    pub fn len(&self) -> usize {
        self.attributes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Every literal must name a declared attribute and use a literal of the
    /// declared kind.
    pub fn check(&self, predicate: &Predicate) -> Result<()> {
        let mut failure = None;
        predicate.visit_literals(&mut |attribute, _op, value| {
            if failure.is_some() {
                return;
            }
            match self.attributes.get(attribute) {
                None => {
                    failure = Some(CoverageError::predicate(format!(
                        "Unknown attribute '{attribute}' in schema '{}'",
                        self.name
                    )))
                }
                Some(declared) if declared.kind != value.kind() => {
                    failure = Some(CoverageError::predicate(format!(
                        "Type mismatch: attribute '{attribute}' is {:?} but is compared with {value}",
                        declared.kind
                    )))
                }
                Some(_) => (),
            }
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
