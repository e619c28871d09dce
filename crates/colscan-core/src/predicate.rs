//! The predicate vocabulary a scan or statistic can be asked about.

use serde::{Deserialize, Serialize};

/// Closed set of predicate conditions. `Like`/`NotLike`/`In`/`NotIn` are
/// recognized so a caller's predicate tree round-trips, but are never
/// prunable and never accelerated — every path that matches on
/// `PredicateCondition` must treat them as "cannot prune" / "scan
/// everything", never panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredicateCondition {
    Equals,
    NotEquals,
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
    Between,
    IsNull,
    IsNotNull,
    Like,
    NotLike,
    In,
    NotIn,
}

impl PredicateCondition {
    /// Predicates this crate recognizes and can prune/scan/accelerate.
    /// `Like`/`NotLike`/`In`/`NotIn` are vocabulary-only.
    pub fn is_supported(self) -> bool {
        !matches!(
            self,
            PredicateCondition::Like
                | PredicateCondition::NotLike
                | PredicateCondition::In
                | PredicateCondition::NotIn
        )
    }

    pub fn is_null_check(self) -> bool {
        matches!(self, PredicateCondition::IsNull | PredicateCondition::IsNotNull)
    }

    pub fn takes_two_literals(self) -> bool {
        matches!(self, PredicateCondition::Between)
    }
}
