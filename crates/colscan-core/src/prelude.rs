//! Convenience re-exports for downstream crates.

pub use crate::error::{Error, Result};
pub use crate::position::{ColumnId, OrderMode, OrderedBy, Position, PositionList, NULL_SENTINEL};
pub use crate::predicate::PredicateCondition;
pub use crate::segment::{DictionarySegment, Segment, ValueSegment, INVALID_VALUE_ID};
pub use crate::value::{ElementKind, Value};
