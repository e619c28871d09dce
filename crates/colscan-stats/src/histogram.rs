//! Equal-distinct-count histogram: `b` bins, each holding (as close to)
//! the same number of *distinct* values, with a per-bin height (row
//! count) and distinct-value count.

use colscan_core::error::{Error, Result};
use colscan_core::predicate::PredicateCondition;
use colscan_core::segment::Segment;
use colscan_core::value::{ElementKind, Value};

use crate::cardinality::{as_f64, CardinalityEstimate, FALLBACK_RANGE_SELECTIVITY};
use crate::extract::distinct_sorted_counts;

#[derive(Debug, Clone)]
pub struct HistogramBin {
    pub lo: Value,
    pub hi: Value,
    pub height: u64,
    pub distinct_count: u64,
}

/// How string (Bytes) values are reduced to an orderable numeric domain
/// for bin-boundary arithmetic, following the classic "compare the
/// first `prefix_length` bytes as a base-256 number" trick so
/// `EqualDistinctCountHistogram` can share its numeric gap/cardinality
/// math between numeric and string kinds.
#[derive(Debug, Clone, Copy)]
pub struct StringHistogramDomain {
    pub prefix_length: usize,
}

impl StringHistogramDomain {
    pub fn reduce(&self, bytes: &[u8]) -> f64 {
        let mut acc = 0f64;
        for i in 0..self.prefix_length {
            let b = bytes.get(i).copied().unwrap_or(0) as f64;
            acc = acc * 256.0 + b;
        }
        acc
    }
}

#[derive(Debug, Clone)]
pub struct EqualDistinctCountHistogram {
    pub kind: ElementKind,
    /// Ascending, non-overlapping bins covering every non-null value.
    pub bins: Vec<HistogramBin>,
    pub string_domain: Option<StringHistogramDomain>,
    pub non_null_count: u64,
}

impl EqualDistinctCountHistogram {
    /// Build from `(value, row_count)` pairs already grouped by distinct
    /// value and sorted ascending, partitioning distinct values across
    /// `bin_count` bins the classic way: the first `distinct % bin_count`
    /// bins get `ceil(distinct / bin_count)` values, the rest get
    /// `floor(distinct / bin_count)`.
    pub fn build(
        kind: ElementKind,
        distinct_values: &[(Value, u64)],
        bin_count: usize,
        string_domain: Option<StringHistogramDomain>,
    ) -> Result<Self> {
        if bin_count == 0 {
            return Err(Error::InvalidArgument("bin_count must be >= 1".into()));
        }
        let distinct = distinct_values.len();
        if distinct == 0 {
            return Ok(Self { kind, bins: Vec::new(), string_domain, non_null_count: 0 });
        }
        let bin_count = bin_count.min(distinct);
        let base = distinct / bin_count;
        let remainder = distinct % bin_count;

        let mut bins = Vec::with_capacity(bin_count);
        let mut idx = 0usize;
        let mut non_null_count = 0u64;
        for b in 0..bin_count {
            let take = if b < remainder { base + 1 } else { base };
            let slice = &distinct_values[idx..idx + take];
            let lo = slice.first().unwrap().0.clone();
            let hi = slice.last().unwrap().0.clone();
            let height: u64 = slice.iter().map(|(_, c)| *c).sum();
            non_null_count += height;
            bins.push(HistogramBin { lo, hi, height, distinct_count: take as u64 });
            idx += take;
        }
        Ok(Self { kind, bins, string_domain, non_null_count })
    }

    /// Build directly from a segment's materialized values (the
    /// `build_statistic` external interface, spec §6 #2). `None` when
    /// the segment has no non-null values.
    pub fn from_segment(
        segment: &Segment,
        bin_count: usize,
        string_domain: Option<StringHistogramDomain>,
    ) -> Result<Option<Self>> {
        let kind = segment.kind();
        let distinct = distinct_sorted_counts(segment);
        if distinct.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self::build(kind, &distinct, bin_count, string_domain)?))
    }

    fn numeric(&self, v: &Value) -> Option<f64> {
        if let (Value::Bytes(b), Some(dom)) = (v, self.string_domain) {
            return Some(dom.reduce(b));
        }
        as_f64(v)
    }

    fn bin_containing(&self, v: &Value) -> Option<usize> {
        use std::cmp::Ordering::*;
        self.bins.iter().position(|bin| v.cmp_value(&bin.lo) != Less && v.cmp_value(&bin.hi) != Greater)
    }

    fn l0(&self) -> Option<&Value> {
        self.bins.first().map(|b| &b.lo)
    }

    fn h_last(&self) -> Option<&Value> {
        self.bins.last().map(|b| &b.hi)
    }

    fn value_in_gap(&self, value: &Value) -> bool {
        use std::cmp::Ordering::*;
        for w in self.bins.windows(2) {
            if value.cmp_value(&w[0].hi) == Greater && value.cmp_value(&w[1].lo) == Less {
                return true;
            }
        }
        false
    }

    pub fn can_prune(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> bool {
        if !cond.is_supported() || matches!(cond, PredicateCondition::IsNull | PredicateCondition::IsNotNull) {
            return false;
        }
        let (Some(l0), Some(hn)) = (self.l0().cloned(), self.h_last().cloned()) else {
            return true;
        };
        use std::cmp::Ordering::*;
        match cond {
            PredicateCondition::Equals => {
                literal.cmp_value(&l0) == Less || literal.cmp_value(&hn) == Greater || self.value_in_gap(literal)
            }
            PredicateCondition::LessThan => literal.cmp_value(&l0) != Greater,
            PredicateCondition::LessThanEquals => literal.cmp_value(&l0) == Less,
            PredicateCondition::GreaterThan => literal.cmp_value(&hn) != Less,
            PredicateCondition::GreaterThanEquals => literal.cmp_value(&hn) == Greater,
            PredicateCondition::Between => {
                let Some(hi) = upper else { return false };
                if literal.cmp_value(&hn) == Greater || hi.cmp_value(&l0) == Less {
                    return true;
                }
                self.bins.windows(2).any(|w| literal.cmp_value(&w[0].hi) == Greater && hi.cmp_value(&w[1].lo) == Less)
            }
            _ => false,
        }
    }

    /// Cardinality estimate: `Equals` uses the containing bin's
    /// `height / distinct_count` (the average per distinct
    /// value within the bin); everything else falls back to the same
    /// gap-aware linear interpolation `RangeFilter` uses, with bins
    /// standing in for ranges.
    pub fn estimate_cardinality(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> CardinalityEstimate {
        if self.non_null_count == 0 || self.can_prune(cond, literal, upper) {
            return CardinalityEstimate::none();
        }
        match cond {
            PredicateCondition::IsNotNull => CardinalityEstimate::all(self.non_null_count),
            PredicateCondition::Equals => {
                let Some(idx) = self.bin_containing(literal) else {
                    return CardinalityEstimate::none();
                };
                let bin = &self.bins[idx];
                if bin.distinct_count == 0 {
                    return CardinalityEstimate::none();
                }
                let n = (bin.height as f64 / bin.distinct_count as f64).round() as u64;
                CardinalityEstimate::approx(n.max(1))
            }
            _ => {
                let total_span: f64 = self
                    .bins
                    .iter()
                    .filter_map(|b| match (self.numeric(&b.lo), self.numeric(&b.hi)) {
                        (Some(a), Some(c)) => Some((c - a).max(0.0) + 1.0),
                        _ => None,
                    })
                    .sum();
                if total_span <= 0.0 {
                    return CardinalityEstimate::approx(
                        (self.non_null_count as f64 * FALLBACK_RANGE_SELECTIVITY).round().max(1.0) as u64,
                    );
                }
                let lit_n = self.numeric(literal);
                let up_n = upper.and_then(|u| self.numeric(u));
                let matched: f64 = self
                    .bins
                    .iter()
                    .filter_map(|b| {
                        let (a, c) = (self.numeric(&b.lo)?, self.numeric(&b.hi)?);
                        let (lo_bound, hi_bound) = match cond {
                            PredicateCondition::LessThan | PredicateCondition::LessThanEquals => {
                                (a, lit_n.unwrap_or(c).min(c))
                            }
                            PredicateCondition::GreaterThan | PredicateCondition::GreaterThanEquals => {
                                (lit_n.unwrap_or(a).max(a), c)
                            }
                            PredicateCondition::Between => (lit_n.unwrap_or(a).max(a), up_n.unwrap_or(c).min(c)),
                            _ => (a, c),
                        };
                        let span = (hi_bound - lo_bound).max(0.0);
                        if hi_bound < lo_bound {
                            return Some(0.0);
                        }
                        let bin_span = (c - a).max(0.0) + 1.0;
                        Some((span + 1.0).min(bin_span) / bin_span * b.height as f64)
                    })
                    .sum();
                let n = matched.round() as u64;
                CardinalityEstimate::approx(n.max(1).min(self.non_null_count))
            }
        }
    }

    /// Narrow to the subset of bins consistent with `cond`. Bins are
    /// kept verbatim (not re-partitioned) since a histogram slice only
    /// needs to stay sound for further pruning, not stay
    /// equal-distinct-count.
    pub fn sliced(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> Option<Self> {
        if self.can_prune(cond, literal, upper) {
            return None;
        }
        use std::cmp::Ordering::*;
        let bins: Vec<HistogramBin> = match cond {
            PredicateCondition::IsNull => return None,
            PredicateCondition::IsNotNull | PredicateCondition::NotEquals => self.bins.clone(),
            PredicateCondition::Equals => {
                let Some(idx) = self.bin_containing(literal) else { return None };
                vec![self.bins[idx].clone()]
            }
            PredicateCondition::LessThan | PredicateCondition::LessThanEquals => self
                .bins
                .iter()
                .filter(|b| b.lo.cmp_value(literal) != Greater)
                .cloned()
                .collect(),
            PredicateCondition::GreaterThan | PredicateCondition::GreaterThanEquals => self
                .bins
                .iter()
                .filter(|b| b.hi.cmp_value(literal) != Less)
                .cloned()
                .collect(),
            PredicateCondition::Between => {
                let Some(hi) = upper else { return Some(self.clone()) };
                self.bins
                    .iter()
                    .filter(|b| !(b.hi.cmp_value(literal) == Less || b.lo.cmp_value(hi) == Greater))
                    .cloned()
                    .collect()
            }
            _ => self.bins.clone(),
        };
        if bins.is_empty() {
            return None;
        }
        let non_null_count = bins.iter().map(|b| b.height).sum();
        Some(Self { kind: self.kind, bins, string_domain: self.string_domain, non_null_count })
    }

    pub fn scaled(&self, selectivity: f64) -> Self {
        let s = selectivity.clamp(0.0, 1.0);
        let bins = self
            .bins
            .iter()
            .map(|b| HistogramBin {
                lo: b.lo.clone(),
                hi: b.hi.clone(),
                height: (b.height as f64 * s).round() as u64,
                distinct_count: b.distinct_count,
            })
            .collect();
        let non_null_count = (self.non_null_count as f64 * s).round() as u64;
        Self { kind: self.kind, bins, string_domain: self.string_domain, non_null_count }
    }
}
