//! Min-max filter: the cheapest of the three statistics, storing only
//! the non-null minimum and maximum of a segment.

use colscan_core::error::{Error, Result};
use colscan_core::predicate::PredicateCondition;
use colscan_core::segment::Segment;
use colscan_core::value::{ElementKind, Value};

use crate::cardinality::{
    as_f64, CardinalityEstimate, FALLBACK_EQ_SELECTIVITY, FALLBACK_RANGE_SELECTIVITY,
};

#[derive(Debug, Clone)]
pub struct MinMaxFilter {
    pub kind: ElementKind,
    pub min: Value,
    pub max: Value,
    pub non_null_count: u64,
}

impl MinMaxFilter {
    pub fn new(kind: ElementKind, min: Value, max: Value, non_null_count: u64) -> Result<Self> {
        min.check_kind(kind)?;
        max.check_kind(kind)?;
        if min.cmp_value(&max) == std::cmp::Ordering::Greater {
            return Err(Error::InvalidArgument(format!(
                "min-max filter built with min > max ({:?} > {:?})",
                min, max
            )));
        }
        Ok(Self { kind, min, max, non_null_count })
    }

    /// Build directly from a segment's materialized values (the
    /// `build_statistic` external interface, spec §6 #2). `None` when
    /// the segment has no non-null values to bound.
    pub fn from_segment(segment: &Segment) -> Result<Option<Self>> {
        let kind = segment.kind();
        let mut min: Option<Value> = None;
        let mut max: Option<Value> = None;
        let mut non_null_count = 0u64;
        for i in 0..segment.len() {
            let Some(v) = segment.value_at(i) else { continue };
            non_null_count += 1;
            if min.as_ref().map_or(true, |m| v.cmp_value(m) == std::cmp::Ordering::Less) {
                min = Some(v.clone());
            }
            if max.as_ref().map_or(true, |m| v.cmp_value(m) == std::cmp::Ordering::Greater) {
                max = Some(v.clone());
            }
        }
        match (min, max) {
            (Some(min), Some(max)) => Ok(Some(Self::new(kind, min, max, non_null_count)?)),
            _ => Ok(None),
        }
    }

    /// `true` when the predicate can be proven to match nothing in this
    /// segment from the min/max bounds alone. Exactly the table in
    /// each comparator is tested against whichever bound
    /// makes pruning possible, with the correct strict/non-strict edge.
    pub fn does_not_contain(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> bool {
        if !cond.is_supported() {
            return false;
        }
        match cond {
            // Null-ness isn't decided by min/max bounds; callers check the
            // segment's null count separately.
            PredicateCondition::IsNull => false,
            PredicateCondition::IsNotNull => false,
            PredicateCondition::Equals => {
                literal.cmp_value(&self.min) == std::cmp::Ordering::Less
                    || literal.cmp_value(&self.max) == std::cmp::Ordering::Greater
            }
            PredicateCondition::NotEquals => {
                self.min.eq_value(&self.max) && self.min.eq_value(literal)
            }
            PredicateCondition::LessThan => literal.cmp_value(&self.min) != std::cmp::Ordering::Greater,
            PredicateCondition::LessThanEquals => literal.cmp_value(&self.min) == std::cmp::Ordering::Less,
            PredicateCondition::GreaterThan => literal.cmp_value(&self.max) != std::cmp::Ordering::Less,
            PredicateCondition::GreaterThanEquals => literal.cmp_value(&self.max) == std::cmp::Ordering::Greater,
            PredicateCondition::Between => {
                let Some(hi) = upper else { return false };
                literal.cmp_value(&self.max) == std::cmp::Ordering::Greater
                    || hi.cmp_value(&self.min) == std::cmp::Ordering::Less
            }
            PredicateCondition::Like | PredicateCondition::NotLike | PredicateCondition::In | PredicateCondition::NotIn => false,
        }
    }

    pub fn can_prune(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> bool {
        self.does_not_contain(cond, literal, upper)
    }

    /// Approximate row count matching the predicate, using a linear
    /// interpolation over `[min, max]` for numeric kinds and a
    /// conservative fallback constant for anything it cannot interpolate
    /// (1% for equality, 30% for open ranges).
    pub fn estimate_cardinality(
        &self,
        cond: PredicateCondition,
        literal: &Value,
        upper: Option<&Value>,
    ) -> CardinalityEstimate {
        if self.non_null_count == 0 || self.does_not_contain(cond, literal, upper) {
            return CardinalityEstimate::none();
        }
        match cond {
            PredicateCondition::IsNotNull => CardinalityEstimate::all(self.non_null_count),
            PredicateCondition::Equals => {
                let n = (self.non_null_count as f64 * FALLBACK_EQ_SELECTIVITY).round() as u64;
                CardinalityEstimate::approx(n.max(1))
            }
            PredicateCondition::NotEquals => {
                let n = (self.non_null_count as f64 * FALLBACK_EQ_SELECTIVITY).round() as u64;
                CardinalityEstimate::approx(self.non_null_count.saturating_sub(n).max(1))
            }
            _ => {
                let frac = self.range_fraction(cond, literal, upper);
                let n = (self.non_null_count as f64 * frac).round() as u64;
                CardinalityEstimate::approx(n.max(1).min(self.non_null_count))
            }
        }
    }

    fn range_fraction(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> f64 {
        let (Some(min), Some(max)) = (as_f64(&self.min), as_f64(&self.max)) else {
            return FALLBACK_RANGE_SELECTIVITY;
        };
        let span = max - min;
        if span <= 0.0 {
            return 1.0;
        }
        match cond {
            PredicateCondition::LessThan | PredicateCondition::LessThanEquals => {
                as_f64(literal).map(|l| ((l - min) / span).clamp(0.0, 1.0)).unwrap_or(FALLBACK_RANGE_SELECTIVITY)
            }
            PredicateCondition::GreaterThan | PredicateCondition::GreaterThanEquals => {
                as_f64(literal).map(|l| ((max - l) / span).clamp(0.0, 1.0)).unwrap_or(FALLBACK_RANGE_SELECTIVITY)
            }
            PredicateCondition::Between => {
                match (as_f64(literal), upper.and_then(as_f64)) {
                    (Some(lo), Some(hi)) => (((hi.min(max)) - (lo.max(min))) / span).clamp(0.0, 1.0),
                    _ => FALLBACK_RANGE_SELECTIVITY,
                }
            }
            _ => FALLBACK_RANGE_SELECTIVITY,
        }
    }

    /// Narrow this filter to the portion consistent with `cond`, for
    /// pushing a statistic through an already-applied predicate. `IsNull`
    /// has no non-null min/max to narrow to, so it yields `None`;
    /// `IsNotNull` is a no-op clone.
    pub fn sliced(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> Option<Self> {
        if self.does_not_contain(cond, literal, upper) {
            return None;
        }
        match cond {
            PredicateCondition::IsNull => None,
            PredicateCondition::IsNotNull | PredicateCondition::NotEquals => Some(self.clone()),
            PredicateCondition::Equals => {
                Self::new(self.kind, literal.clone(), literal.clone(), self.non_null_count).ok()
            }
            PredicateCondition::LessThan | PredicateCondition::LessThanEquals => {
                let new_max = if literal.cmp_value(&self.max) == std::cmp::Ordering::Less {
                    literal.clone()
                } else {
                    self.max.clone()
                };
                Self::new(self.kind, self.min.clone(), new_max, self.non_null_count).ok()
            }
            PredicateCondition::GreaterThan | PredicateCondition::GreaterThanEquals => {
                let new_min = if literal.cmp_value(&self.min) == std::cmp::Ordering::Greater {
                    literal.clone()
                } else {
                    self.min.clone()
                };
                Self::new(self.kind, new_min, self.max.clone(), self.non_null_count).ok()
            }
            PredicateCondition::Between => {
                let Some(hi) = upper else { return Some(self.clone()) };
                let new_min = if literal.cmp_value(&self.min) == std::cmp::Ordering::Greater {
                    literal.clone()
                } else {
                    self.min.clone()
                };
                let new_max = if hi.cmp_value(&self.max) == std::cmp::Ordering::Less {
                    hi.clone()
                } else {
                    self.max.clone()
                };
                Self::new(self.kind, new_min, new_max, self.non_null_count).ok()
            }
            _ => Some(self.clone()),
        }
    }

    /// Copy with `non_null_count` reduced by `selectivity` (a caller
    /// applying an upstream estimate to a downstream statistic without
    /// re-deriving min/max).
    pub fn scaled(&self, selectivity: f64) -> Self {
        let n = (self.non_null_count as f64 * selectivity.clamp(0.0, 1.0)).round() as u64;
        Self { kind: self.kind, min: self.min.clone(), max: self.max.clone(), non_null_count: n }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> MinMaxFilter {
        MinMaxFilter::new(ElementKind::Int32, Value::Int32(10), Value::Int32(100), 50).unwrap()
    }

    #[test]
    fn prunes_equals_outside_bounds() {
        let f = filter();
        assert!(f.can_prune(PredicateCondition::Equals, &Value::Int32(5), None));
        assert!(!f.can_prune(PredicateCondition::Equals, &Value::Int32(50), None));
    }

    #[test]
    fn prunes_less_than_at_or_below_min() {
        let f = filter();
        assert!(f.can_prune(PredicateCondition::LessThan, &Value::Int32(10), None));
        assert!(!f.can_prune(PredicateCondition::LessThan, &Value::Int32(11), None));
        assert!(!f.can_prune(PredicateCondition::LessThanEquals, &Value::Int32(10), None));
        assert!(f.can_prune(PredicateCondition::LessThanEquals, &Value::Int32(9), None));
    }

    #[test]
    fn between_prunes_disjoint_range() {
        let f = filter();
        assert!(f.can_prune(PredicateCondition::Between, &Value::Int32(200), Some(&Value::Int32(300))));
        assert!(!f.can_prune(PredicateCondition::Between, &Value::Int32(0), Some(&Value::Int32(20))));
    }

    #[test]
    fn sliced_is_null_yields_none() {
        let f = filter();
        assert!(f.sliced(PredicateCondition::IsNull, &Value::Null, None).is_none());
    }

    #[test]
    fn from_segment_matches_manually_built_filter() {
        use colscan_core::segment::ValueSegment;
        let seg = Segment::Value(
            ValueSegment::new(
                ElementKind::Int32,
                vec![Value::Int32(5), Value::Null, Value::Int32(1), Value::Int32(9)],
                None,
            )
            .unwrap(),
        );
        let f = MinMaxFilter::from_segment(&seg).unwrap().unwrap();
        assert_eq!(f.min, Value::Int32(1));
        assert_eq!(f.max, Value::Int32(9));
        assert_eq!(f.non_null_count, 3);
    }

    #[test]
    fn from_segment_all_null_yields_none() {
        use colscan_core::segment::ValueSegment;
        let seg = Segment::Value(
            ValueSegment::new(ElementKind::Int32, vec![Value::Null, Value::Null], None).unwrap(),
        );
        assert!(MinMaxFilter::from_segment(&seg).unwrap().is_none());
    }
}
