//! The fallback scan path: evaluate the predicate against every row's
//! materialized value. Correct for any segment encoding and any
//! supported predicate; the dictionary- and sorted-accelerated paths
//! exist purely to avoid this per-row materialization when a segment's
//! encoding or sort tag makes a cheaper path available.

use colscan_core::position::PositionList;
use colscan_core::predicate::PredicateCondition;
use colscan_core::segment::Segment;
use colscan_core::value::Value;

use crate::error::{Result, ScanError};

/// Three-valued predicate evaluation: a null value never matches any
/// comparator (SQL `unknown`, never `true`), only `IsNull`/`IsNotNull`
/// inspect nullness directly.
pub fn evaluate(value: Option<&Value>, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> Result<bool> {
    if !cond.is_supported() {
        return Err(ScanError::Predicate(format!("{cond:?} is not a supported predicate for scanning")));
    }
    if cond.is_null_check() {
        return Ok(match cond {
            PredicateCondition::IsNull => value.is_none(),
            PredicateCondition::IsNotNull => value.is_some(),
            _ => unreachable!(),
        });
    }
    // A literal that is itself null makes the comparison `unknown` in
    // three-valued logic, which a WHERE clause treats as non-matching —
    // regardless of what the row's own value is.
    if literal.is_null() || upper.map(Value::is_null).unwrap_or(false) {
        return Ok(false);
    }
    let Some(v) = value else { return Ok(false) };
    use std::cmp::Ordering::*;
    Ok(match cond {
        PredicateCondition::Equals => v.cmp_value(literal) == Equal,
        PredicateCondition::NotEquals => v.cmp_value(literal) != Equal,
        PredicateCondition::LessThan => v.cmp_value(literal) == Less,
        PredicateCondition::LessThanEquals => v.cmp_value(literal) != Greater,
        PredicateCondition::GreaterThan => v.cmp_value(literal) == Greater,
        PredicateCondition::GreaterThanEquals => v.cmp_value(literal) != Less,
        PredicateCondition::Between => {
            let Some(hi) = upper else {
                return Err(ScanError::Predicate("Between requires an upper literal".into()));
            };
            v.cmp_value(literal) != Less && v.cmp_value(hi) != Greater
        }
        _ => unreachable!("vocabulary-only predicates rejected above"),
    })
}

/// Scan `segment`, appending a position for each match. When
/// `position_filter` is given, only those offsets are visited — the
/// predicate is still evaluated against `segment`'s own values at each
/// listed offset, never against the filter's positions themselves, so
/// this doubles as the reference-segment indirection path: the caller
/// passes the *referenced* segment here and the filter selected by an
/// earlier stage.
pub fn generic_scan(
    segment: &Segment,
    chunk_id: u32,
    cond: PredicateCondition,
    literal: &Value,
    upper: Option<&Value>,
    position_filter: Option<&[u32]>,
) -> Result<PositionList> {
    match position_filter {
        Some(offsets) => {
            let mut out = PositionList::with_capacity(offsets.len() / 4 + 1);
            for &offset in offsets {
                if evaluate(segment.value_at(offset as usize), cond, literal, upper)? {
                    out.push(chunk_id, offset);
                }
            }
            Ok(out)
        }
        None => {
            let mut out = PositionList::with_capacity(segment.len() / 4 + 1);
            for offset in 0..segment.len() {
                if evaluate(segment.value_at(offset), cond, literal, upper)? {
                    out.push(chunk_id, offset as u32);
                }
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colscan_core::segment::ValueSegment;
    use colscan_core::value::ElementKind;

    #[test]
    fn null_never_matches_comparator() {
        let seg = Segment::Value(
            ValueSegment::new(ElementKind::Int32, vec![Value::Null, Value::Int32(5)], None).unwrap(),
        );
        let hits = generic_scan(&seg, 0, PredicateCondition::Equals, &Value::Int32(5), None, None).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.positions[0].chunk_offset, 1);
    }

    #[test]
    fn between_is_inclusive_both_ends() {
        let seg = Segment::Value(
            ValueSegment::new(
                ElementKind::Int32,
                vec![Value::Int32(1), Value::Int32(5), Value::Int32(10), Value::Int32(11)],
                None,
            )
            .unwrap(),
        );
        let hits = generic_scan(&seg, 0, PredicateCondition::Between, &Value::Int32(1), Some(&Value::Int32(10)), None).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn null_literal_matches_nothing_even_for_greater_than() {
        let seg = Segment::Value(
            ValueSegment::new(ElementKind::Int32, vec![Value::Int32(1), Value::Int32(5)], None).unwrap(),
        );
        // `GreaterThanEquals NULL` must be unknown for every row, not a
        // window that happens to cover everything.
        let hits = generic_scan(&seg, 0, PredicateCondition::GreaterThanEquals, &Value::Null, None, None).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn position_filter_restricts_offsets_visited() {
        let seg = Segment::Value(
            ValueSegment::new(
                ElementKind::Int32,
                vec![Value::Int32(5), Value::Int32(5), Value::Int32(5), Value::Int32(5)],
                None,
            )
            .unwrap(),
        );
        // Only offsets 0 and 2 are in scope; offsets 1 and 3 would also
        // match the predicate but must never be emitted.
        let hits = generic_scan(&seg, 0, PredicateCondition::Equals, &Value::Int32(5), None, Some(&[0, 2])).unwrap();
        let offsets: Vec<u32> = hits.positions.iter().map(|p| p.chunk_offset).collect();
        assert_eq!(offsets, vec![0, 2]);
    }
}
