//! The three-state cardinality-estimate result every statistic returns.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardinalityTag {
    MatchesNone,
    MatchesApproximately,
    MatchesAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardinalityEstimate {
    pub tag: CardinalityTag,
    pub count: u64,
}

impl CardinalityEstimate {
    pub fn none() -> Self {
        Self { tag: CardinalityTag::MatchesNone, count: 0 }
    }

    pub fn all(count: u64) -> Self {
        Self { tag: CardinalityTag::MatchesAll, count }
    }

    pub fn approx(count: u64) -> Self {
        Self { tag: CardinalityTag::MatchesApproximately, count }
    }
}

/// Numeric projection of a `Value`, used by every statistic's
/// approximate-selectivity math. `None` for `Bytes` (and `Null`) — those
/// fall back to a conservative constant instead.
pub fn as_f64(v: &colscan_core::value::Value) -> Option<f64> {
    use colscan_core::value::Value::*;
    match v {
        Int32(x) => Some(*x as f64),
        Int64(x) => Some(*x as f64),
        Float32(x) => Some(*x as f64),
        Float64(x) => Some(*x),
        Bytes(_) | Null => None,
    }
}

/// Conservative fallback selectivity for predicates/kinds we cannot
/// interpolate numerically (non-numeric kinds, degenerate spans).
pub const FALLBACK_RANGE_SELECTIVITY: f64 = 0.3;
pub const FALLBACK_EQ_SELECTIVITY: f64 = 0.01;
