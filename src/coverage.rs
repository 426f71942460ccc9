//! The scale/filter domain covered so far by a sequence of rules.
//!
//! The domain is two dimensional: the scale axis times the set of features.
//! A [`Fragment`] is one rectangle of it, a scale range paired with a
//! predicate. [`DomainCoverage`] keeps a list of pairwise disjoint fragments
//! describing everything matched by the rules added so far, and for each new
//! rule hands back rules matching only the part of its domain that is not yet
//! covered. Concatenating those derived rules, in the order the source rules
//! were added, yields an equivalent rule set in which no two rules overlap.
//!
//! Rules must be added one at a time, highest priority first.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{CoverageError, Result};
use crate::interval::ScaleRange;
use crate::predicate::{Feature, Predicate};
use crate::rule::Rule;
use crate::schema::Schema;
use crate::selector::Selector;
use crate::settings::Settings;
use crate::simplify::Simplifier;

// ------------- Fragment -------------
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    range: ScaleRange,
    predicate: Predicate,
}

impl Fragment {
    pub fn new(range: ScaleRange, predicate: Predicate) -> Self {
        Self { range, predicate }
    }
    pub fn range(&self) -> &ScaleRange {
        &self.range
    }
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
    pub fn contains(&self, scale: f64, feature: &Feature) -> bool {
        self.range.contains(scale) && self.predicate.evaluate(feature)
    }

    /// The part of this fragment not covered by `other`, as zero to three
    /// disjoint fragments.
    pub fn difference(&self, other: &Fragment, simplifier: &Simplifier) -> Vec<Fragment> {
        if !self.range.intersects(&other.range) {
            return vec![self.clone()];
        }
        // outside of the other scale range its predicate does not apply
        let mut result: Vec<Fragment> = self
            .range
            .subtract(&other.range)
            .into_iter()
            .map(|range| Fragment::new(range, self.predicate.clone()))
            .collect();
        let overlap = self.range.intersect(&other.range);
        if !overlap.is_empty() {
            let remainder = simplifier.simplify(&Predicate::and(
                self.predicate.clone(),
                Predicate::negate(other.predicate.clone()),
            ));
            if remainder != Predicate::Exclude {
                result.push(Fragment::new(overlap, remainder));
            }
        }
        trace!(fragment = %self, other = %other, pieces = result.len(), "difference");
        result
    }

    pub fn to_selector(&self) -> Selector {
        Selector::and(Selector::Scale(self.range), Selector::Data(self.predicate.clone()))
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Fragment [range={}, predicate={}]", self.range, self.predicate)
    }
}

// ------------- DomainCoverage -------------
#[derive(Debug, Clone)]
pub struct DomainCoverage {
    fragments: Vec<Fragment>,
    simplifier: Simplifier,
}

impl DomainCoverage {
    /// An empty coverage for the given target schema, with default settings.
    pub fn new(schema: Option<Arc<Schema>>) -> Self {
        Self::with_settings(schema, &Settings::default())
    }
    pub fn with_settings(schema: Option<Arc<Schema>>, settings: &Settings) -> Self {
        Self {
            fragments: Vec::new(),
            simplifier: Simplifier::new(schema, settings),
        }
    }
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }
    pub fn len(&self) -> usize {
        self.fragments.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
    pub fn simplifier(&self) -> &Simplifier {
        &self.simplifier
    }
    /// Whether a feature at the given scale is matched by a rule added so far.
    pub fn covers(&self, scale: f64, feature: &Feature) -> bool {
        self.fragments.iter().any(|f| f.contains(scale, feature))
    }

    /// Adds a rule to the domain and returns rules matching the bits of its
    /// domain that the previous rules did not cover yet. An empty result means
    /// the rule is fully shadowed.
    ///
    /// On error the coverage is left untouched.
    pub fn add_rule<P: Clone>(&mut self, rule: &Rule<P>) -> Result<Vec<Rule<P>>> {
        let incoming = self.to_fragments(rule.selector())?;

        if self.fragments.is_empty() {
            debug!(position = rule.position(), fragments = incoming.len(), "seeding empty coverage");
            self.fragments = incoming;
            return Ok(vec![rule.clone()]);
        }

        let mut remaining = incoming;
        for existing in &self.fragments {
            remaining = remaining
                .iter()
                .flat_map(|f| f.difference(existing, &self.simplifier))
                .collect();
            if remaining.is_empty() {
                break;
            }
        }

        if remaining.is_empty() {
            debug!(position = rule.position(), "rule fully shadowed by previous rules");
            return Ok(Vec::new());
        }

        let derived: Vec<Rule<P>> = remaining.iter().map(|f| rule.derive(f.to_selector())).collect();
        self.fragments.extend(remaining);
        self.compact();
        debug!(
            position = rule.position(),
            derived = derived.len(),
            coverage = self.fragments.len(),
            "rule added"
        );
        Ok(derived)
    }

    /// Turns a selector into pairwise disjoint fragments. Disjuncts with
    /// identical scale ranges are merged, every other disjunct keeps only the
    /// part not matched by the ones before it. Fragments that cannot match
    /// anything are dropped.
    pub fn to_fragments(&self, selector: &Selector) -> Result<Vec<Fragment>> {
        let mut fragments: Vec<Fragment> = Vec::new();
        match selector {
            Selector::Or(children) => {
                for child in children {
                    if matches!(child, Selector::Or(_)) {
                        return Err(CoverageError::NestedDisjunction);
                    }
                    self.add_independent(child, &mut fragments)?;
                }
            }
            other => self.add_independent(other, &mut fragments)?,
        }
        fragments.retain(|f| !f.range.is_empty() && f.predicate != Predicate::Exclude);

        // overlapping disjuncts would otherwise claim the same domain twice
        let mut disjoint: Vec<Fragment> = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            let mut pieces = vec![fragment];
            for earlier in &disjoint {
                pieces = pieces
                    .iter()
                    .flat_map(|p| p.difference(earlier, &self.simplifier))
                    .collect();
                if pieces.is_empty() {
                    break;
                }
            }
            disjoint.extend(pieces);
        }
        Ok(disjoint)
    }

    fn add_independent(&self, selector: &Selector, fragments: &mut Vec<Fragment>) -> Result<()> {
        let range = selector.scale_range()?.unwrap_or(ScaleRange::FULL);
        let predicate = selector.predicate(self.simplifier.schema())?;
        match fragments.iter_mut().find(|f| f.range == range) {
            Some(existing) => {
                let merged = Predicate::or(existing.predicate.clone(), predicate);
                existing.predicate = self.simplifier.simplify(&merged);
            }
            None => fragments.push(Fragment::new(range, self.simplifier.simplify(&predicate))),
        }
        Ok(())
    }

    // sorts by lower bound and merges neighbours with exactly equal ranges
    fn compact(&mut self) {
        let mut fragments = std::mem::take(&mut self.fragments);
        fragments.sort_by(|a, b| a.range.lower().cmp(&b.range.lower()));
        let mut combined: Vec<Fragment> = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            match combined.last_mut() {
                Some(previous) if previous.range == fragment.range => {
                    let earlier = std::mem::replace(&mut previous.predicate, Predicate::Exclude);
                    previous.predicate = self
                        .simplifier
                        .simplify(&Predicate::or(fragment.predicate, earlier));
                }
                _ => combined.push(fragment),
            }
        }
        self.fragments = combined;
    }
}

impl fmt::Display for DomainCoverage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "DomainCoverage[items={},", self.fragments.len())?;
        for fragment in &self.fragments {
            writeln!(f, "{}", fragment)?;
        }
        write!(f, "] // DomainCoverage end")
    }
}
