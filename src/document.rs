//! The JSON documents read and written by the command line tool.
//!
//! Input:
//! ```json
//! { "schema": { "name": "roads", "attributes": { "type": { "kind": "text" } } },
//!   "rules": [ { "selector": { "scale": { "min": 0, "max": 50000 } }, "payload": { "stroke": "red" } } ] }
//! ```
//! Rule positions are assigned from document order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::compiler::Compilation;
use crate::error::Result;
use crate::rule::Rule;
use crate::schema::Schema;
use crate::selector::Selector;

#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    pub selector: Selector,
    #[serde(default)]
    pub payload: Json,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StyleDocument {
    #[serde(default)]
    pub schema: Option<Schema>,
    pub rules: Vec<RuleEntry>,
}

impl StyleDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
    pub fn schema(&self) -> Option<Arc<Schema>> {
        self.schema.clone().map(Arc::new)
    }
    pub fn to_rules(&self) -> Vec<Rule<Json>> {
        self.rules
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                let rule = Rule::new(entry.selector.clone(), entry.payload.clone(), position);
                match &entry.comment {
                    Some(comment) => rule.with_comment(comment.clone()),
                    None => rule,
                }
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct CompiledDocument {
    pub rules: Vec<Rule<Json>>,
    pub shadowed: Vec<usize>,
    pub coverage: String,
}

impl CompiledDocument {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<Compilation<Json>> for CompiledDocument {
    fn from(compilation: Compilation<Json>) -> Self {
        let coverage = compilation.coverage().to_string();
        let shadowed = compilation.shadowed().to_vec();
        CompiledDocument {
            rules: compilation.into_rules(),
            shadowed,
            coverage,
        }
    }
}
