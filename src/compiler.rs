//! Compiles a whole, priority ordered rule list into non-overlapping rules.

use std::sync::Arc;

use tracing::info;

use crate::coverage::DomainCoverage;
use crate::error::Result;
use crate::rule::Rule;
use crate::schema::Schema;
use crate::settings::Settings;

/// The outcome of a compilation: the derived rules, in source order, and the
/// coverage they add up to.
#[derive(Debug)]
pub struct Compilation<P> {
    rules: Vec<Rule<P>>,
    coverage: DomainCoverage,
    shadowed: Vec<usize>,
}

impl<P> Compilation<P> {
    pub fn rules(&self) -> &[Rule<P>] {
        &self.rules
    }
    pub fn into_rules(self) -> Vec<Rule<P>> {
        self.rules
    }
    pub fn coverage(&self) -> &DomainCoverage {
        &self.coverage
    }
    /// Positions of the source rules that contributed nothing.
    pub fn shadowed(&self) -> &[usize] {
        &self.shadowed
    }
}

pub struct Compiler {
    schema: Option<Arc<Schema>>,
    settings: Settings,
}

impl Compiler {
    pub fn new(schema: Option<Arc<Schema>>, settings: Settings) -> Self {
        Self { schema, settings }
    }

    /// Feeds `rules` into a fresh coverage in the given order. The first
    /// failing rule aborts the compilation.
    pub fn compile<P: Clone>(&self, rules: &[Rule<P>]) -> Result<Compilation<P>> {
        let mut coverage = DomainCoverage::with_settings(self.schema.clone(), &self.settings);
        let mut compiled = Vec::with_capacity(rules.len());
        let mut shadowed = Vec::new();
        for rule in rules {
            let derived = coverage.add_rule(rule)?;
            if derived.is_empty() {
                shadowed.push(rule.position());
            }
            compiled.extend(derived);
        }
        info!(
            source = rules.len(),
            derived = compiled.len(),
            shadowed = shadowed.len(),
            fragments = coverage.len(),
            "rule set compiled"
        );
        Ok(Compilation {
            rules: compiled,
            coverage,
            shadowed,
        })
    }
}
