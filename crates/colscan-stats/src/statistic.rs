//! Uniform dispatch surface over the three statistic kinds, so a scan
//! can hold `Vec<Statistic>` per column without caring which concrete
//! filter backs a given segment, following this codebase's preference for
//! match-based dispatch over deep trait-object hierarchies.

use colscan_core::error::Result;
use colscan_core::predicate::PredicateCondition;
use colscan_core::segment::Segment;
use colscan_core::value::Value;

use crate::cardinality::CardinalityEstimate;
use crate::histogram::{EqualDistinctCountHistogram, StringHistogramDomain};
use crate::minmax::MinMaxFilter;
use crate::range::RangeFilter;

pub trait ColumnStatistic {
    fn can_prune(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> bool;
    fn estimate_cardinality(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> CardinalityEstimate;
}

impl ColumnStatistic for MinMaxFilter {
    fn can_prune(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> bool {
        MinMaxFilter::can_prune(self, cond, literal, upper)
    }
    fn estimate_cardinality(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> CardinalityEstimate {
        MinMaxFilter::estimate_cardinality(self, cond, literal, upper)
    }
}

impl ColumnStatistic for RangeFilter {
    fn can_prune(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> bool {
        RangeFilter::can_prune(self, cond, literal, upper)
    }
    fn estimate_cardinality(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> CardinalityEstimate {
        RangeFilter::estimate_cardinality(self, cond, literal, upper)
    }
}

impl ColumnStatistic for EqualDistinctCountHistogram {
    fn can_prune(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> bool {
        EqualDistinctCountHistogram::can_prune(self, cond, literal, upper)
    }
    fn estimate_cardinality(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> CardinalityEstimate {
        EqualDistinctCountHistogram::estimate_cardinality(self, cond, literal, upper)
    }
}

/// A statistic of any kind, for columns that carry more than one
/// statistic type at once (e.g. a min-max filter for cheap pruning plus
/// a histogram for cardinality estimation).
#[derive(Debug, Clone)]
pub enum Statistic {
    MinMax(MinMaxFilter),
    Range(RangeFilter),
    Histogram(EqualDistinctCountHistogram),
}

/// Which statistic to build and with what tunables — the `kind` half of
/// the external interface's `build_statistic(kind, segment)` (spec §6
/// #2).
#[derive(Debug, Clone)]
pub enum StatisticKind {
    MinMax,
    Range { max_ranges: usize },
    Histogram { bin_count: usize, string_domain: Option<StringHistogramDomain> },
}

impl Statistic {
    /// Build the requested statistic from a segment's materialized
    /// values. `None` when the segment has no non-null values to
    /// describe (e.g. an all-null column).
    pub fn build(kind: StatisticKind, segment: &Segment) -> Result<Option<Statistic>> {
        Ok(match kind {
            StatisticKind::MinMax => MinMaxFilter::from_segment(segment)?.map(Statistic::MinMax),
            StatisticKind::Range { max_ranges } => {
                RangeFilter::from_segment(segment, max_ranges)?.map(Statistic::Range)
            }
            StatisticKind::Histogram { bin_count, string_domain } => {
                EqualDistinctCountHistogram::from_segment(segment, bin_count, string_domain)?.map(Statistic::Histogram)
            }
        })
    }

    pub fn can_prune(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> bool {
        match self {
            Statistic::MinMax(f) => f.can_prune(cond, literal, upper),
            Statistic::Range(f) => f.can_prune(cond, literal, upper),
            Statistic::Histogram(f) => f.can_prune(cond, literal, upper),
        }
    }

    pub fn estimate_cardinality(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> CardinalityEstimate {
        match self {
            Statistic::MinMax(f) => f.estimate_cardinality(cond, literal, upper),
            Statistic::Range(f) => f.estimate_cardinality(cond, literal, upper),
            Statistic::Histogram(f) => f.estimate_cardinality(cond, literal, upper),
        }
    }

    /// Narrow this statistic to the portion consistent with `cond`,
    /// returning `None` when nothing survives.
    pub fn sliced(&self, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> Option<Statistic> {
        match self {
            Statistic::MinMax(f) => f.sliced(cond, literal, upper).map(Statistic::MinMax),
            Statistic::Range(f) => f.sliced(cond, literal, upper).map(Statistic::Range),
            Statistic::Histogram(f) => f.sliced(cond, literal, upper).map(Statistic::Histogram),
        }
    }

    pub fn scaled(&self, selectivity: f64) -> Statistic {
        match self {
            Statistic::MinMax(f) => Statistic::MinMax(f.scaled(selectivity)),
            Statistic::Range(f) => Statistic::Range(f.scaled(selectivity)),
            Statistic::Histogram(f) => Statistic::Histogram(f.scaled(selectivity)),
        }
    }
}
