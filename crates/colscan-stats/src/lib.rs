#![forbid(unsafe_code)]
//! colscan-stats: the three segment-level statistic objects that drive
//! predicate pruning and cardinality estimation — min-max filter, range
//! filter, and the equal-distinct-count histogram — behind one tagged
//! `Statistic` enum with a shared operation surface.

pub mod cardinality;
mod extract;
pub mod histogram;
pub mod json;
pub mod minmax;
pub mod range;
pub mod statistic;

pub use cardinality::{CardinalityEstimate, CardinalityTag};
pub use histogram::{EqualDistinctCountHistogram, HistogramBin, StringHistogramDomain};
pub use minmax::MinMaxFilter;
pub use range::RangeFilter;
pub use statistic::{ColumnStatistic, Statistic, StatisticKind};
