//! Scale ranges: real intervals with independent inclusive/exclusive bounds.
//!
//! Bound comparisons never use raw floating point equality. Every bound is
//! canonicalised on construction (`-0.0` becomes `0.0`, NaN is rejected) and
//! then ordered with [`f64::total_cmp`], so ties at a boundary value resolve
//! deterministically on the inclusive flag.

use serde::{Deserialize, Serialize};

// custom made ordering for bounds
use std::cmp::Ordering;

// used to print out readable forms of a range
use std::fmt;

use crate::error::{CoverageError, Result};

fn canonical(value: f64) -> f64 {
    // folds -0.0 into 0.0 so total_cmp agrees with ==
    value + 0.0
}

// ------------- Bounds -------------
/// The lower end of a range. At the same value an inclusive bound sorts
/// before an exclusive one.
#[derive(Debug, Clone, Copy)]
pub struct LowerBound {
    value: f64,
    included: bool,
}
impl LowerBound {
    pub fn value(&self) -> f64 {
        self.value
    }
    pub fn included(&self) -> bool {
        self.included
    }
}
impl Ord for LowerBound {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then_with(|| other.included.cmp(&self.included))
    }
}
impl PartialOrd for LowerBound {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for LowerBound {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for LowerBound {}

/// The upper end of a range. At the same value an exclusive bound sorts
/// before an inclusive one.
#[derive(Debug, Clone, Copy)]
pub struct UpperBound {
    value: f64,
    included: bool,
}
impl UpperBound {
    pub fn value(&self) -> f64 {
        self.value
    }
    pub fn included(&self) -> bool {
        self.included
    }
}
impl Ord for UpperBound {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then_with(|| self.included.cmp(&other.included))
    }
}
impl PartialOrd for UpperBound {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for UpperBound {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for UpperBound {}

// ------------- ScaleRange -------------
/// A range of scale denominators, `[min, max]` with a flag per bound.
///
/// Ranges built through [`ScaleRange::new`] always satisfy `min <= max`;
/// intersections and subtractions may produce empty ranges, which is a normal
/// outcome and is reported by [`ScaleRange::is_empty`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "RangeRepr", into = "RangeRepr")]
pub struct ScaleRange {
    min: f64,
    min_included: bool,
    max: f64,
    max_included: bool,
}

impl ScaleRange {
    /// The whole scale axis, `[0, +inf)`.
    pub const FULL: ScaleRange = ScaleRange {
        min: 0.0,
        min_included: true,
        max: f64::INFINITY,
        max_included: false,
    };

    pub fn new(min: f64, min_included: bool, max: f64, max_included: bool) -> Result<Self> {
        if min.is_nan() || max.is_nan() {
            return Err(CoverageError::range("scale range bounds cannot be NaN"));
        }
        if min > max {
            return Err(CoverageError::range(format!(
                "scale range minimum {min} is greater than maximum {max}"
            )));
        }
        Ok(Self::raw(min, min_included, max, max_included))
    }
    /// `[min, max)`, the usual shape of a scale denominator filter.
    pub fn between(min: f64, max: f64) -> Result<Self> {
        Self::new(min, true, max, false)
    }
    /// `[min, +inf)`
    pub fn above(min: f64) -> Result<Self> {
        Self::new(min, true, f64::INFINITY, false)
    }
    /// `[0, max)`
    pub fn below(max: f64) -> Result<Self> {
        Self::new(0.0, true, max, false)
    }
    fn raw(min: f64, min_included: bool, max: f64, max_included: bool) -> Self {
        Self {
            min: canonical(min),
            min_included,
            max: canonical(max),
            max_included,
        }
    }
    fn from_bounds(lower: LowerBound, upper: UpperBound) -> Self {
        Self::raw(lower.value, lower.included, upper.value, upper.included)
    }

    pub fn min(&self) -> f64 {
        self.min
    }
    pub fn max(&self) -> f64 {
        self.max
    }
    pub fn min_included(&self) -> bool {
        self.min_included
    }
    pub fn max_included(&self) -> bool {
        self.max_included
    }
    pub fn lower(&self) -> LowerBound {
        LowerBound {
            value: self.min,
            included: self.min_included,
        }
    }
    pub fn upper(&self) -> UpperBound {
        UpperBound {
            value: self.max,
            included: self.max_included,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self.min.total_cmp(&self.max) {
            Ordering::Greater => true,
            Ordering::Equal => !(self.min_included && self.max_included),
            Ordering::Less => false,
        }
    }
    pub fn contains(&self, scale: f64) -> bool {
        let above = if self.min_included { scale >= self.min } else { scale > self.min };
        let below = if self.max_included { scale <= self.max } else { scale < self.max };
        above && below
    }
    /// The common part of both ranges, possibly empty.
    pub fn intersect(&self, other: &ScaleRange) -> ScaleRange {
        Self::from_bounds(
            self.lower().max(other.lower()),
            self.upper().min(other.upper()),
        )
    }
    pub fn intersects(&self, other: &ScaleRange) -> bool {
        !self.intersect(other).is_empty()
    }
    /// The parts of this range not covered by `other`: zero, one or two
    /// non-empty ranges, lowest first.
    pub fn subtract(&self, other: &ScaleRange) -> Vec<ScaleRange> {
        if self.is_empty() {
            return Vec::new();
        }
        if !self.intersects(other) {
            return vec![*self];
        }
        let before = Self::from_bounds(
            self.lower(),
            self.upper().min(UpperBound {
                value: other.min,
                included: !other.min_included,
            }),
        );
        let after = Self::from_bounds(
            self.lower().max(LowerBound {
                value: other.max,
                included: !other.max_included,
            }),
            self.upper(),
        );
        [before, after].into_iter().filter(|r| !r.is_empty()).collect()
    }
}

impl PartialEq for ScaleRange {
    fn eq(&self, other: &Self) -> bool {
        self.lower() == other.lower() && self.upper() == other.upper()
    }
}
impl Eq for ScaleRange {}

impl Default for ScaleRange {
    fn default() -> Self {
        Self::FULL
    }
}

impl fmt::Display for ScaleRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.min_included { '[' } else { '(' },
            self.min,
            self.max,
            if self.max_included { ']' } else { ')' }
        )
    }
}

// JSON has no infinity, so an open upper end is written as a missing max
#[derive(Serialize, Deserialize)]
struct RangeRepr {
    #[serde(default)]
    min: f64,
    #[serde(default = "included")]
    min_included: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    #[serde(default)]
    max_included: bool,
}

fn included() -> bool {
    true
}

impl TryFrom<RangeRepr> for ScaleRange {
    type Error = CoverageError;
    fn try_from(repr: RangeRepr) -> Result<Self> {
        ScaleRange::new(
            repr.min,
            repr.min_included,
            repr.max.unwrap_or(f64::INFINITY),
            repr.max_included,
        )
    }
}

impl From<ScaleRange> for RangeRepr {
    fn from(range: ScaleRange) -> Self {
        RangeRepr {
            min: range.min,
            min_included: range.min_included,
            max: (range.max != f64::INFINITY).then_some(range.max),
            max_included: range.max_included,
        }
    }
}
