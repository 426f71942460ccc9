//! Predicate simplification.
//!
//! Two passes. The structural pass folds constants, double negation, nested
//! junctions, duplicate operands and complementary pairs. The semantic pass
//! decides satisfiability exactly: a predicate only looks at an attribute
//! through its literals, so each attribute's domain splits into finitely many
//! cells (each literal constant, the gaps around the numeric ones, one text
//! not mentioned anywhere, both booleans, and "missing") and every value in a
//! cell gives the same truth values. Enumerating one representative per cell
//! and attribute is therefore a complete test. The schema narrows the cells to
//! the declared kind and drops "missing" for non-nullable attributes.
//!
//! The semantic pass only runs when the number of combinations stays within
//! the configured budget; past it the structural result is returned as is.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use crate::predicate::{Feature, Predicate, Value, ValueKind};
use crate::schema::Schema;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct Simplifier {
    schema: Option<Arc<Schema>>,
    max_decision_cells: usize,
}

impl Simplifier {
    pub fn new(schema: Option<Arc<Schema>>, settings: &Settings) -> Self {
        Self {
            schema,
            max_decision_cells: settings.max_decision_cells,
        }
    }
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_deref()
    }

    /// Returns a logically equivalent, canonicalised predicate. Anything
    /// unsatisfiable within the decision budget comes back as `Exclude`.
    pub fn simplify(&self, predicate: &Predicate) -> Predicate {
        let folded = fold(predicate.clone());
        if matches!(folded, Predicate::Include | Predicate::Exclude) {
            return folded;
        }
        match CellSpace::new(&folded, self.schema(), self.max_decision_cells) {
            Some(space) => space.reduce(folded),
            None => {
                warn!(
                    budget = self.max_decision_cells,
                    predicate = %folded,
                    "decision space too large, skipping semantic simplification"
                );
                folded
            }
        }
    }

    /// True when no feature satisfies the predicate, as far as the decision
    /// budget allows telling.
    pub fn is_unsatisfiable(&self, predicate: &Predicate) -> bool {
        self.simplify(predicate) == Predicate::Exclude
    }
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new(None, &Settings::default())
    }
}

// ------------- Structural folding -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Junction {
    All,
    Any,
}

impl Junction {
    fn identity(self) -> Predicate {
        match self {
            Junction::All => Predicate::Include,
            Junction::Any => Predicate::Exclude,
        }
    }
    fn absorbing(self) -> Predicate {
        match self {
            Junction::All => Predicate::Exclude,
            Junction::Any => Predicate::Include,
        }
    }
    fn build(self, mut operands: Vec<Predicate>) -> Predicate {
        match operands.len() {
            0 => self.identity(),
            1 => operands.remove(0),
            _ => match self {
                Junction::All => Predicate::And(operands),
                Junction::Any => Predicate::Or(operands),
            },
        }
    }
    fn flatten(self, operands: Vec<Predicate>, into: &mut Vec<Predicate>) {
        for operand in operands {
            match (self, operand) {
                (Junction::All, Predicate::And(inner)) | (Junction::Any, Predicate::Or(inner)) => {
                    self.flatten(inner, into)
                }
                (_, other) => into.push(other),
            }
        }
    }
}

fn fold(predicate: Predicate) -> Predicate {
    match predicate {
        Predicate::Not(inner) => negate(fold(*inner)),
        Predicate::And(operands) => combine(Junction::All, operands.into_iter().map(fold).collect()),
        Predicate::Or(operands) => combine(Junction::Any, operands.into_iter().map(fold).collect()),
        other => other,
    }
}

fn negate(predicate: Predicate) -> Predicate {
    match predicate {
        Predicate::Include => Predicate::Exclude,
        Predicate::Exclude => Predicate::Include,
        Predicate::Not(inner) => *inner,
        other => Predicate::negate(other),
    }
}

fn complementary(a: &Predicate, b: &Predicate) -> bool {
    matches!(a, Predicate::Not(inner) if **inner == *b) || matches!(b, Predicate::Not(inner) if **inner == *a)
}

fn combine(junction: Junction, operands: Vec<Predicate>) -> Predicate {
    let mut flat = Vec::with_capacity(operands.len());
    junction.flatten(operands, &mut flat);
    let absorbing = junction.absorbing();
    let identity = junction.identity();
    let mut kept: Vec<Predicate> = Vec::with_capacity(flat.len());
    for operand in flat {
        if operand == absorbing {
            return absorbing;
        }
        if operand == identity || kept.contains(&operand) {
            continue;
        }
        if kept.iter().any(|k| complementary(k, &operand)) {
            return absorbing;
        }
        kept.push(operand);
    }
    junction.build(kept)
}

// ------------- Semantic decision -------------
struct CellSpace {
    attributes: Vec<String>,
    cells: Vec<Vec<Option<Value>>>,
}

impl CellSpace {
    fn new(predicate: &Predicate, schema: Option<&Schema>, budget: usize) -> Option<Self> {
        let mut literals: BTreeMap<&str, Vec<&Value>> = BTreeMap::new();
        predicate.visit_literals(&mut |attribute, _op, value| {
            literals.entry(attribute).or_default().push(value);
        });
        let mut attributes = Vec::with_capacity(literals.len());
        let mut cells = Vec::with_capacity(literals.len());
        let mut combinations: usize = 1;
        for (attribute, values) in literals {
            let declared = schema.and_then(|s| s.attribute(attribute));
            let representatives = representatives(&values, declared.map(|a| (a.kind(), a.nullable())));
            combinations = combinations.checked_mul(representatives.len())?;
            if combinations > budget {
                return None;
            }
            attributes.push(attribute.to_owned());
            cells.push(representatives);
        }
        Some(Self { attributes, cells })
    }

    fn satisfiable(&self, predicate: &Predicate) -> bool {
        let mut index = vec![0usize; self.attributes.len()];
        let mut feature = Feature::new();
        loop {
            for (slot, attribute) in self.attributes.iter().enumerate() {
                match &self.cells[slot][index[slot]] {
                    Some(value) => feature.set(attribute, value.clone()),
                    None => feature.unset(attribute),
                }
            }
            if predicate.evaluate(&feature) {
                return true;
            }
            // advance the odometer
            let mut slot = 0;
            loop {
                if slot == index.len() {
                    return false;
                }
                index[slot] += 1;
                if index[slot] < self.cells[slot].len() {
                    break;
                }
                index[slot] = 0;
                slot += 1;
            }
        }
    }

    fn decide(&self, predicate: Predicate) -> Predicate {
        if matches!(predicate, Predicate::Include | Predicate::Exclude) {
            return predicate;
        }
        if !self.satisfiable(&predicate) {
            return Predicate::Exclude;
        }
        let complement = Predicate::negate(predicate);
        if !self.satisfiable(&complement) {
            return Predicate::Include;
        }
        match complement {
            Predicate::Not(inner) => *inner,
            other => other,
        }
    }

    fn reduce(&self, predicate: Predicate) -> Predicate {
        let reduced = match predicate {
            Predicate::Not(inner) => negate(self.reduce(*inner)),
            Predicate::And(operands) => {
                self.prune(Junction::All, operands.into_iter().map(|p| self.reduce(p)).collect())
            }
            Predicate::Or(operands) => {
                self.prune(Junction::Any, operands.into_iter().map(|p| self.reduce(p)).collect())
            }
            other => other,
        };
        self.decide(reduced)
    }

    // drops operands implied by their siblings (And) or implying them (Or)
    fn prune(&self, junction: Junction, operands: Vec<Predicate>) -> Predicate {
        let mut operands = match (junction, combine(junction, operands)) {
            (Junction::All, Predicate::And(operands)) | (Junction::Any, Predicate::Or(operands)) => operands,
            (_, other) => return other,
        };
        // later operands go first so the leading ones survive ties
        let mut i = operands.len();
        while i > 0 && operands.len() > 1 {
            i -= 1;
            let rest: Vec<Predicate> = operands
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, p)| p.clone())
                .collect();
            let rest = junction.build(rest);
            let counterexample = match junction {
                Junction::All => Predicate::and(rest, Predicate::negate(operands[i].clone())),
                Junction::Any => Predicate::and(operands[i].clone(), Predicate::negate(rest)),
            };
            if !self.satisfiable(&counterexample) {
                operands.remove(i);
            }
        }
        junction.build(operands)
    }
}

fn representatives(literals: &[&Value], declared: Option<(ValueKind, bool)>) -> Vec<Option<Value>> {
    let mut cells = Vec::new();
    let nullable = declared.is_none_or(|(_, nullable)| nullable);
    if nullable {
        cells.push(None);
    }
    let kinds: Vec<ValueKind> = match declared {
        Some((kind, _)) => vec![kind],
        None => vec![ValueKind::Bool, ValueKind::Number, ValueKind::Text],
    };
    for kind in kinds {
        let mentioned = literals.iter().any(|v| v.kind() == kind);
        // an unmentioned kind behaves like a missing value
        if !mentioned && (nullable || declared.is_none()) {
            continue;
        }
        match kind {
            ValueKind::Bool => {
                cells.push(Some(Value::Bool(false)));
                cells.push(Some(Value::Bool(true)));
            }
            ValueKind::Number => cells.extend(number_cells(literals).into_iter().map(Some)),
            ValueKind::Text => cells.extend(text_cells(literals).into_iter().map(Some)),
        }
    }
    if cells.is_empty() {
        cells.push(None);
    }
    cells
}

fn number_cells(literals: &[&Value]) -> Vec<Value> {
    let mut points: Vec<f64> = literals
        .iter()
        .filter_map(|v| match v {
            Value::Number(n) => Some(*n),
            _ => None,
        })
        .collect();
    points.push(f64::NEG_INFINITY);
    points.push(f64::INFINITY);
    points.sort_by(|a, b| a.total_cmp(b));
    points.dedup_by(|a, b| a == b);
    let mut cells = Vec::with_capacity(points.len() * 2);
    for pair in points.windows(2) {
        cells.push(pair[0]);
        if let Some(inside) = strictly_between(pair[0], pair[1]) {
            cells.push(inside);
        }
    }
    cells.push(f64::INFINITY);
    cells.into_iter().map(Value::Number).collect()
}

fn strictly_between(low: f64, high: f64) -> Option<f64> {
    let candidate = match (low.is_infinite(), high.is_infinite()) {
        (true, true) => 0.0,
        (false, true) => low + low.abs().max(1.0),
        (true, false) => high - high.abs().max(1.0),
        (false, false) => low / 2.0 + high / 2.0,
    };
    (candidate > low && candidate < high).then_some(candidate)
}

fn text_cells(literals: &[&Value]) -> Vec<Value> {
    let mut constants: Vec<&str> = literals
        .iter()
        .filter_map(|v| match v {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        })
        .collect();
    constants.sort_unstable();
    constants.dedup();
    let mut other = String::from("~");
    while constants.contains(&other.as_str()) {
        other.push('~');
    }
    let mut cells: Vec<Value> = constants.into_iter().map(Value::from).collect();
    cells.push(Value::Text(other));
    cells
}
