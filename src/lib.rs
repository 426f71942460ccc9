//! Domaincover – compiles ordered, overlapping style rules into an equivalent
//! set of non-overlapping rules.
//!
//! A style sheet is a list of rules in priority order. Each rule is guarded by
//! a *selector*: a scale range and a predicate over feature attributes, or a
//! disjunction of such pairs. Earlier rules win, so a later rule only applies
//! where nothing before it matched. Target formats without that cascading
//! behaviour need every rule narrowed to the part of the domain that is still
//! free, which is what this crate computes.
//!
//! ## Modules
//! * [`interval`] – [`interval::ScaleRange`], real intervals with inclusive or
//!   exclusive bounds and their intersection/subtraction.
//! * [`predicate`] – [`predicate::Predicate`], an expression tree over feature
//!   attributes (comparisons, `And`, `Or`, `Not`, `Include`, `Exclude`).
//! * [`schema`] – the flat attribute schema predicates are checked against.
//! * [`simplify`] – schema aware predicate simplification that recognises
//!   contradictions and tautologies.
//! * [`selector`] – rule guards and the extraction of scale ranges and
//!   predicates from them.
//! * [`rule`] – [`rule::Rule`], a selector plus an opaque payload.
//! * [`coverage`] – [`coverage::DomainCoverage`], the accumulated coverage and
//!   the rule splitting algorithm.
//! * [`compiler`] – runs a whole rule list through a fresh coverage.
//! * [`document`] – the JSON documents used by the command line tool.
//! * [`settings`] – configuration read through the `config` crate.
//!
//! ## Quick Start
//! ```
//! use domaincover::{DomainCoverage, Rule, ScaleRange, Selector};
//! let mut coverage = DomainCoverage::new(None);
//! let first = Rule::new(Selector::Scale(ScaleRange::between(0.0, 1000.0).unwrap()), "red", 0);
//! assert_eq!(coverage.add_rule(&first).unwrap(), vec![first.clone()]);
//! let second = Rule::new(Selector::Scale(ScaleRange::between(500.0, 1500.0).unwrap()), "blue", 1);
//! let derived = coverage.add_rule(&second).unwrap();
//! assert_eq!(derived.len(), 1);
//! assert_eq!(
//!     derived[0].selector().scale_range().unwrap(),
//!     Some(ScaleRange::between(1000.0, 1500.0).unwrap())
//! );
//! ```
//!
//! ## Threading
//! A [`coverage::DomainCoverage`] is a plain single threaded accumulator. Rule
//! sets compiled in parallel each need their own instance; only the schema,
//! behind an `Arc`, is shared.

pub mod compiler;
pub mod coverage;
pub mod document;
pub mod error;
pub mod interval;
pub mod predicate;
pub mod rule;
pub mod schema;
pub mod selector;
pub mod settings;
pub mod simplify;

pub use compiler::{Compilation, Compiler};
pub use coverage::{DomainCoverage, Fragment};
pub use error::{CoverageError, Result};
pub use interval::ScaleRange;
pub use predicate::{CompareOp, Feature, Predicate, Value, ValueKind};
pub use rule::Rule;
pub use schema::Schema;
pub use selector::Selector;
pub use settings::Settings;
pub use simplify::Simplifier;
