//! The segment model: immutable, per-chunk, per-column storage in one of
//! two encodings.

use crate::error::{Error, Result};
use crate::position::OrderedBy;
use crate::value::{ElementKind, Value};

/// Dense array of values of one element kind plus a parallel null
/// bitmap. Slots where `nulls[i]` is `true` carry an unspecified
/// placeholder in `values[i]` — readers must always consult the bitmap
/// first, never the placeholder value.
#[derive(Debug, Clone)]
pub struct ValueSegment {
    kind: ElementKind,
    values: Vec<Value>,
    nulls: Vec<bool>,
    ordered_by: Option<OrderedBy>,
}

impl ValueSegment {
    /// Build a value segment from pre-zipped values, where `Value::Null`
    /// marks a null slot. `ordered_by`, if given, is a contract the
    /// caller must already have verified (checked only in debug builds).
    pub fn new(kind: ElementKind, values: Vec<Value>, ordered_by: Option<OrderedBy>) -> Result<Self> {
        for v in &values {
            v.check_kind(kind)?;
        }
        let nulls = values.iter().map(Value::is_null).collect();
        let segment = Self { kind, values, nulls, ordered_by };
        debug_assert!(segment.check_order_invariant(), "ordered_by tag does not match physical order");
        Ok(segment)
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn ordered_by(&self) -> Option<OrderedBy> {
        self.ordered_by
    }

    pub fn is_null(&self, offset: usize) -> bool {
        self.nulls[offset]
    }

    /// Value at `offset`, or `None` if the slot is null.
    pub fn value(&self, offset: usize) -> Option<&Value> {
        if self.nulls[offset] {
            None
        } else {
            Some(&self.values[offset])
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&Value>> {
        (0..self.len()).map(move |i| self.value(i))
    }

    #[cfg(debug_assertions)]
    fn check_order_invariant(&self) -> bool {
        let Some(ordered) = self.ordered_by else { return true };
        let non_null: Vec<&Value> = self.iter().flatten().collect();
        let ascending = ordered.mode.is_ascending();
        non_null.windows(2).all(|w| {
            let c = w[0].cmp_value(w[1]);
            if ascending {
                c != std::cmp::Ordering::Greater
            } else {
                c != std::cmp::Ordering::Less
            }
        })
    }

    #[cfg(not(debug_assertions))]
    fn check_order_invariant(&self) -> bool {
        true
    }
}

/// Sentinel value-id denoting null in a dictionary segment's attribute
/// vector. Always the maximum representable value-id; never signed.
pub const INVALID_VALUE_ID: u32 = u32::MAX;

/// A strictly-sorted unique-value dictionary `D[0..U)` plus an attribute
/// vector `A[0..N)` of value-ids in `[0, U)`, with `INVALID_VALUE_ID`
/// denoting null.
#[derive(Debug, Clone)]
pub struct DictionarySegment {
    kind: ElementKind,
    dictionary: Vec<Value>,
    attribute: Vec<u32>,
    ordered_by: Option<OrderedBy>,
}

impl DictionarySegment {
    pub fn new(
        kind: ElementKind,
        dictionary: Vec<Value>,
        attribute: Vec<u32>,
        ordered_by: Option<OrderedBy>,
    ) -> Result<Self> {
        for v in &dictionary {
            v.check_kind(kind)?;
            if v.is_null() {
                return Err(Error::Fatal("dictionary must not contain null".into()));
            }
        }
        if !dictionary.windows(2).all(|w| w[0].cmp_value(&w[1]) == std::cmp::Ordering::Less) {
            return Err(Error::Fatal("dictionary segment's dictionary is not strictly ascending".into()));
        }
        let u = dictionary.len() as u32;
        for &a in &attribute {
            if a != INVALID_VALUE_ID && a >= u {
                return Err(Error::Fatal(format!(
                    "attribute vector entry {a} out of range for dictionary of size {u}"
                )));
            }
        }
        Ok(Self { kind, dictionary, attribute, ordered_by })
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.attribute.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attribute.is_empty()
    }

    pub fn ordered_by(&self) -> Option<OrderedBy> {
        self.ordered_by
    }

    pub fn unique_values_count(&self) -> u32 {
        self.dictionary.len() as u32
    }

    pub fn dictionary(&self) -> &[Value] {
        &self.dictionary
    }

    pub fn attribute_at(&self, offset: usize) -> u32 {
        self.attribute[offset]
    }

    pub fn is_null(&self, offset: usize) -> bool {
        self.attribute[offset] == INVALID_VALUE_ID
    }

    pub fn value_at(&self, offset: usize) -> Option<&Value> {
        let id = self.attribute[offset];
        if id == INVALID_VALUE_ID {
            None
        } else {
            Some(&self.dictionary[id as usize])
        }
    }

    pub fn dictionary_value(&self, value_id: u32) -> Option<&Value> {
        self.dictionary.get(value_id as usize)
    }

    /// Index of the first dictionary entry `>= v` (i.e. `U` if none).
    pub fn lower_bound(&self, v: &Value) -> u32 {
        self.dictionary
            .partition_point(|d| d.cmp_value(v) == std::cmp::Ordering::Less) as u32
    }

    /// Index of the first dictionary entry `> v` (i.e. `U` if none).
    pub fn upper_bound(&self, v: &Value) -> u32 {
        self.dictionary
            .partition_point(|d| d.cmp_value(v) != std::cmp::Ordering::Greater) as u32
    }
}

/// Either encoding, as the orchestrator and scan core see it.
#[derive(Debug, Clone)]
pub enum Segment {
    Value(ValueSegment),
    Dictionary(DictionarySegment),
}

impl Segment {
    pub fn kind(&self) -> ElementKind {
        match self {
            Segment::Value(s) => s.kind(),
            Segment::Dictionary(s) => s.kind(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Segment::Value(s) => s.len(),
            Segment::Dictionary(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ordered_by(&self) -> Option<OrderedBy> {
        match self {
            Segment::Value(s) => s.ordered_by(),
            Segment::Dictionary(s) => s.ordered_by(),
        }
    }

    /// Materialize the value at `offset`, for the generic scan and for
    /// tests; the dictionary-accelerated scan never calls this per-row.
    pub fn value_at(&self, offset: usize) -> Option<&Value> {
        match self {
            Segment::Value(s) => s.value(offset),
            Segment::Dictionary(s) => s.value_at(offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{ColumnId, OrderMode};

    fn v(i: i32) -> Value {
        Value::Int32(i)
    }

    #[test]
    fn dictionary_rejects_unsorted_input() {
        let err = DictionarySegment::new(
            ElementKind::Int32,
            vec![v(30), v(10), v(20)],
            vec![0, 1, 2],
            None,
        );
        assert!(err.is_err());
    }

    #[test]
    fn dictionary_lower_upper_bound() {
        let dict = DictionarySegment::new(
            ElementKind::Int32,
            vec![v(10), v(20), v(30)],
            vec![0, 1, 2, 1, INVALID_VALUE_ID],
            None,
        )
        .unwrap();
        assert_eq!(dict.lower_bound(&v(20)), 1);
        assert_eq!(dict.upper_bound(&v(20)), 2);
        assert_eq!(dict.lower_bound(&v(25)), 2);
        assert_eq!(dict.upper_bound(&v(25)), 2);
        assert_eq!(dict.unique_values_count(), 3);
    }

    #[test]
    fn value_segment_ordered_invariant_enforced_in_debug() {
        let seg = ValueSegment::new(
            ElementKind::Int32,
            vec![v(1), v(2), v(3)],
            Some(OrderedBy { column_id: ColumnId(0), mode: OrderMode::AscNullsLast }),
        );
        assert!(seg.is_ok());
    }
}
