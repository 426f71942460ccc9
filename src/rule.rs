use serde::{Deserialize, Serialize};
use std::fmt;

use crate::selector::Selector;

// ------------- Rule -------------
/// A selector guarding an opaque payload, e.g. the style properties the rule
/// applies. `position` is the rule's place in the source and identifies it
/// across the rules derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule<P> {
    selector: Selector,
    payload: P,
    position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl<P> Rule<P> {
    pub fn new(selector: Selector, payload: P, position: usize) -> Self {
        Self {
            selector,
            payload,
            position,
            comment: None,
        }
    }
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
    pub fn selector(&self) -> &Selector {
        &self.selector
    }
    pub fn payload(&self) -> &P {
        &self.payload
    }
    pub fn position(&self) -> usize {
        self.position
    }
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

impl<P: Clone> Rule<P> {
    /// A rule with the same payload, position and comment, guarded by `selector`.
    pub fn derive(&self, selector: Selector) -> Rule<P> {
        Rule {
            selector,
            payload: self.payload.clone(),
            position: self.position,
            comment: self.comment.clone(),
        }
    }
}

impl<P> fmt::Display for Rule<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{} {}", self.position, self.selector)?;
        if let Some(comment) = &self.comment {
            write!(f, " /* {} */", comment)?;
        }
        Ok(())
    }
}
