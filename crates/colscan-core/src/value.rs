//! The value domain: element kinds, the `Value` variant type, and the
//! total order used everywhere a column value needs comparing.
//!
//! A closed set: callers must not grow new element kinds ad hoc. Floats
//! are ordered via `float-ord`
//! rather than a hand-rolled `partial_cmp().unwrap_or(Equal)` at every
//! call site, so a `Value` can implement a real `Ord`.

use std::cmp::Ordering;

use float_ord::FloatOrd;
use serde::{Deserialize, Serialize};

/// The closed set of element kinds a segment, literal or statistic may
/// carry. Mixing kinds across a predicate and the column it applies to
/// is a caller error (`Error::kind_mismatch`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Int32,
    Int64,
    Float32,
    Float64,
    Bytes,
}

/// A value of any element kind, or the distinguished null. Comparisons
/// involving `Null` always yield `unknown` at the predicate layer, never
/// `true`/`false` — callers must check `is_null()` before relying on
/// `Ord`/`Eq`, which this type implements only for the non-null values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn kind(&self) -> Option<ElementKind> {
        match self {
            Value::Null => None,
            Value::Int32(_) => Some(ElementKind::Int32),
            Value::Int64(_) => Some(ElementKind::Int64),
            Value::Float32(_) => Some(ElementKind::Float32),
            Value::Float64(_) => Some(ElementKind::Float64),
            Value::Bytes(_) => Some(ElementKind::Bytes),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Assert `self`'s kind matches `expected` (or that `self` is null,
    /// which is kind-agnostic). Used at scan/statistic entry points to
    /// turn a mismatched literal into a fatal error.
    pub fn check_kind(&self, expected: ElementKind) -> crate::error::Result<()> {
        match self.kind() {
            None => Ok(()),
            Some(k) if k == expected => Ok(()),
            Some(k) => Err(crate::error::Error::kind_mismatch(expected, k)),
        }
    }

    /// Total order over non-null values of the *same* element kind.
    /// Comparing values of different kinds is a logic error in callers
    /// (this module never mixes kinds internally) and falls back to
    /// comparing by kind discriminant so it cannot panic.
    pub fn cmp_value(&self, other: &Value) -> Ordering {
        use Value::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            (Int32(a), Int32(b)) => a.cmp(b),
            (Int64(a), Int64(b)) => a.cmp(b),
            (Float32(a), Float32(b)) => FloatOrd(*a).cmp(&FloatOrd(*b)),
            (Float64(a), Float64(b)) => FloatOrd(*a).cmp(&FloatOrd(*b)),
            (Bytes(a), Bytes(b)) => a.cmp(b),
            _ => kind_rank(self).cmp(&kind_rank(other)),
        }
    }

    /// Equality in the three-valued-logic sense used by predicates: two
    /// nulls are "equal" for the purposes of comparing value identity
    /// here, but callers implementing `Equals`/`NotEquals` predicates
    /// must special-case `is_null()` themselves, since SQL null
    /// comparison is `unknown`, not `true`.
    pub fn eq_value(&self, other: &Value) -> bool {
        self.cmp_value(other) == Ordering::Equal
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            _ => self.cmp_value(other) == Ordering::Equal,
        }
    }
}

fn kind_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Int32(_) => 1,
        Value::Int64(_) => 2,
        Value::Float32(_) => 3,
        Value::Float64(_) => 4,
        Value::Bytes(_) => 5,
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Bytes(s.as_bytes().to_vec())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}
