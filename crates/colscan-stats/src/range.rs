//! Range filter: a disjoint, ascending set of `[lo, hi]` ranges covering
//! every non-null value in a segment. A single-range filter
//! degenerates to exactly the same bounds behavior as `MinMaxFilter`,
//! which the test suite checks as an invariant.

use colscan_core::error::{Error, Result};
use colscan_core::predicate::PredicateCondition;
use colscan_core::segment::Segment;
use colscan_core::value::{ElementKind, Value};

use crate::cardinality::{as_f64, CardinalityEstimate, FALLBACK_EQ_SELECTIVITY, FALLBACK_RANGE_SELECTIVITY};
use crate::extract::distinct_sorted_counts;

#[derive(Debug, Clone)]
pub struct RangeFilter {
    pub kind: ElementKind,
    /// Ascending, disjoint, non-adjacent-by-construction ranges.
    pub ranges: Vec<(Value, Value)>,
    pub non_null_count: u64,
}

impl RangeFilter {
    /// Build a range filter from a sorted slice of distinct non-null
    /// values, merging down to at most `max_ranges` ranges by
    /// repeatedly closing the largest gaps first. Only numeric kinds are supported: a
    /// `Bytes` range filter has no well-defined "gap" to measure, so
    /// building one is a caller error.
    pub fn build(kind: ElementKind, sorted_distinct: &[Value], non_null_count: u64, max_ranges: usize) -> Result<Self> {
        if kind == ElementKind::Bytes {
            return Err(Error::Unsupported("range filter over Bytes values".into()));
        }
        if max_ranges == 0 {
            return Err(Error::InvalidArgument("max_ranges must be >= 1".into()));
        }
        #[cfg(debug_assertions)]
        if !sorted_distinct.windows(2).all(|w| w[0].cmp_value(&w[1]) == std::cmp::Ordering::Less) {
            return Err(Error::InvalidArgument(
                "range filter build expects input sorted ascending with distinct values".into(),
            ));
        }
        if sorted_distinct.is_empty() {
            return Ok(Self { kind, ranges: Vec::new(), non_null_count: 0 });
        }

        let mut ranges: Vec<(Value, Value)> =
            sorted_distinct.iter().map(|v| (v.clone(), v.clone())).collect();

        // Gap between range i and i+1, measured in wide arithmetic so
        // extreme integer/float values can't silently wrap or overflow.
        fn gap(a: &Value, b: &Value) -> f64 {
            match (a, b) {
                (Value::Int32(x), Value::Int32(y)) => (*y as i128 - *x as i128) as f64,
                (Value::Int64(x), Value::Int64(y)) => (*y as i128 - *x as i128) as f64,
                (Value::Float32(x), Value::Float32(y)) => *y as f64 - *x as f64,
                (Value::Float64(x), Value::Float64(y)) => y - x,
                _ => f64::INFINITY,
            }
        }

        while ranges.len() > max_ranges {
            // Find the smallest gap between adjacent ranges and merge it.
            let mut best_idx = 0usize;
            let mut best_gap = f64::INFINITY;
            for i in 0..ranges.len() - 1 {
                let g = gap(&ranges[i].1, &ranges[i + 1].0);
                if g < best_gap {
                    best_gap = g;
                    best_idx = i;
                }
            }
            let (_, hi) = ranges.remove(best_idx + 1);
            ranges[best_idx].1 = hi;
        }

        Ok(Self { kind, ranges, non_null_count })
    }

    /// Build directly from a segment's materialized values (the
    /// `build_statistic` external interface, spec §6 #2). `None` when
    /// the segment has no non-null values.
    pub fn from_segment(segment: &Segment, max_ranges: usize) -> Result<Option<Self>> {
        let kind = segment.kind();
        let distinct = distinct_sorted_counts(segment);
        if distinct.is_empty() {
            return Ok(None);
        }
        let non_null_count: u64 = distinct.iter().map(|(_, c)| c).sum();
        let values: Vec<Value> = distinct.into_iter().map(|(v, _)| v).collect();
        Ok(Some(Self::build(kind, &values, non_null_count, max_ranges)?))
    }

    fn l0(&self) -> Option<&Value> {
        self.ranges.first().map(|(lo, _)| lo)
    }

    fn h_last(&self) -> Option<&Value> {
        self.ranges.last().map(|(_, hi)| hi)
    }

    /// `true` if `value` falls strictly between two adjacent ranges
    /// (i.e. in a known gap) or outside every range.
    fn value_in_gap(&self, value: &Value) -> bool {
        use std::cmp::Ordering::*;
        if self.ranges.is_empty() {
            return true;
        }
        for w in self.ranges.windows(2) {
            let (_, hi) = &w[0];
            let (lo, _) = &w[1];
            if value.cmp_value(hi) == Greater && value.cmp_value(lo) == Less {
                return true;
            }
        }
        false
    }

    pub fn can_prune(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> bool {
        if !cond.is_supported() {
            return false;
        }
        if matches!(cond, PredicateCondition::IsNull | PredicateCondition::IsNotNull) {
            return false;
        }
        let (Some(l0), Some(hn)) = (self.l0().cloned(), self.h_last().cloned()) else {
            // No ranges means no non-null values at all: every
            // value-matching predicate prunes.
            return true;
        };
        use std::cmp::Ordering::*;
        match cond {
            PredicateCondition::Equals => literal.cmp_value(&l0) == Less
                || literal.cmp_value(&hn) == Greater
                || self.value_in_gap(literal),
            PredicateCondition::LessThan => literal.cmp_value(&l0) != Greater,
            PredicateCondition::LessThanEquals => literal.cmp_value(&l0) == Less,
            PredicateCondition::GreaterThan => literal.cmp_value(&hn) != Less,
            PredicateCondition::GreaterThanEquals => literal.cmp_value(&hn) == Greater,
            PredicateCondition::Between => {
                let Some(hi) = upper else { return false };
                if literal.cmp_value(&hn) == Greater || hi.cmp_value(&l0) == Less {
                    return true;
                }
                // The literal window falls entirely inside a gap between
                // two ranges: never treat a boundary-equal literal as
                // pruning — only a window strictly inside a gap prunes.
                self.ranges.windows(2).any(|w| {
                    let (_, gap_hi) = &w[0];
                    let (gap_lo, _) = &w[1];
                    literal.cmp_value(gap_hi) == Greater && hi.cmp_value(gap_lo) == Less
                })
            }
            _ => false,
        }
    }

    pub fn estimate_cardinality(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> CardinalityEstimate {
        if self.non_null_count == 0 || self.can_prune(cond, literal, upper) {
            return CardinalityEstimate::none();
        }
        match cond {
            PredicateCondition::IsNotNull => CardinalityEstimate::all(self.non_null_count),
            PredicateCondition::Equals => {
                let n = (self.non_null_count as f64 * FALLBACK_EQ_SELECTIVITY).round() as u64;
                CardinalityEstimate::approx(n.max(1))
            }
            _ => {
                let total_span: f64 = self
                    .ranges
                    .iter()
                    .filter_map(|(lo, hi)| match (as_f64(lo), as_f64(hi)) {
                        (Some(a), Some(b)) => Some((b - a).max(0.0) + 1.0),
                        _ => None,
                    })
                    .sum();
                if total_span <= 0.0 {
                    return CardinalityEstimate::approx(
                        (self.non_null_count as f64 * FALLBACK_RANGE_SELECTIVITY).round().max(1.0) as u64,
                    );
                }
                let matched: f64 = self
                    .ranges
                    .iter()
                    .filter_map(|(lo, hi)| {
                        let (a, b) = (as_f64(lo)?, as_f64(hi)?);
                        let (lo_bound, hi_bound) = match cond {
                            PredicateCondition::LessThan | PredicateCondition::LessThanEquals => {
                                (a, as_f64(literal).unwrap_or(b).min(b))
                            }
                            PredicateCondition::GreaterThan | PredicateCondition::GreaterThanEquals => {
                                (as_f64(literal).unwrap_or(a).max(a), b)
                            }
                            PredicateCondition::Between => (
                                as_f64(literal).unwrap_or(a).max(a),
                                upper.and_then(as_f64).unwrap_or(b).min(b),
                            ),
                            _ => (a, b),
                        };
                        Some((hi_bound - lo_bound).max(0.0) + if hi_bound >= lo_bound { 1.0 } else { 0.0 })
                    })
                    .sum();
                let frac = (matched / total_span).clamp(0.0, 1.0);
                let n = (self.non_null_count as f64 * frac).round() as u64;
                CardinalityEstimate::approx(n.max(1).min(self.non_null_count))
            }
        }
    }

    pub fn sliced(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> Option<Self> {
        if self.can_prune(cond, literal, upper) {
            return None;
        }
        use std::cmp::Ordering::*;
        match cond {
            PredicateCondition::IsNull => None,
            PredicateCondition::IsNotNull | PredicateCondition::NotEquals => Some(self.clone()),
            PredicateCondition::Equals => {
                Some(Self { kind: self.kind, ranges: vec![(literal.clone(), literal.clone())], non_null_count: self.non_null_count })
            }
            PredicateCondition::LessThan | PredicateCondition::LessThanEquals => {
                let ranges: Vec<_> = self
                    .ranges
                    .iter()
                    .filter(|(lo, _)| lo.cmp_value(literal) != Greater)
                    .map(|(lo, hi)| {
                        let new_hi = if hi.cmp_value(literal) == Greater { literal.clone() } else { hi.clone() };
                        (lo.clone(), new_hi)
                    })
                    .collect();
                Some(Self { kind: self.kind, ranges, non_null_count: self.non_null_count })
            }
            PredicateCondition::GreaterThan | PredicateCondition::GreaterThanEquals => {
                let ranges: Vec<_> = self
                    .ranges
                    .iter()
                    .filter(|(_, hi)| hi.cmp_value(literal) != Less)
                    .map(|(lo, hi)| {
                        let new_lo = if lo.cmp_value(literal) == Less { literal.clone() } else { lo.clone() };
                        (new_lo, hi.clone())
                    })
                    .collect();
                Some(Self { kind: self.kind, ranges, non_null_count: self.non_null_count })
            }
            PredicateCondition::Between => {
                let Some(hi_lit) = upper else { return Some(self.clone()) };
                let ranges: Vec<_> = self
                    .ranges
                    .iter()
                    .filter(|(lo, hi)| !(hi.cmp_value(literal) == Less || lo.cmp_value(hi_lit) == Greater))
                    .map(|(lo, hi)| {
                        let new_lo = if lo.cmp_value(literal) == Less { literal.clone() } else { lo.clone() };
                        let new_hi = if hi.cmp_value(hi_lit) == Greater { hi_lit.clone() } else { hi.clone() };
                        (new_lo, new_hi)
                    })
                    .collect();
                Some(Self { kind: self.kind, ranges, non_null_count: self.non_null_count })
            }
            _ => Some(self.clone()),
        }
    }

    pub fn scaled(&self, selectivity: f64) -> Self {
        let n = (self.non_null_count as f64 * selectivity.clamp(0.0, 1.0)).round() as u64;
        Self { kind: self.kind, ranges: self.ranges.clone(), non_null_count: n }
    }
}
