//! Sorted-scan accelerator: when a segment carries an `ordered_by`
//! contract for the column being scanned, a comparator predicate's
//! matches form one contiguous offset range, found by binary search
//! instead of a linear per-row test.

use std::cmp::Ordering;

use colscan_core::position::PositionList;
use colscan_core::predicate::PredicateCondition;
use colscan_core::segment::Segment;
use colscan_core::value::Value;

use crate::error::{Result, ScanError};

/// Binary search for the smallest offset in `[start, end)` for which
/// `pred` is `false`, given `pred` is `true` on a prefix and `false` on
/// the remaining suffix of that range.
fn partition_point_in(segment: &Segment, start: usize, end: usize, pred: impl Fn(Option<&Value>) -> bool) -> usize {
    let (mut lo, mut hi) = (start, end);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(segment.value_at(mid)) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// The contiguous `[start, end)` sub-range holding every non-null row,
/// found by binary search since nulls are grouped at one end under an
/// `ordered_by` contract.
fn non_null_bounds(segment: &Segment, len: usize, nulls_first: bool) -> (usize, usize) {
    if nulls_first {
        let k = partition_point_in(segment, 0, len, |v| v.is_none());
        (k, len)
    } else {
        let k = partition_point_in(segment, 0, len, |v| v.is_some());
        (0, k)
    }
}

/// Effective ascending comparison of `v` against `literal`: for a
/// descending segment this is reversed, so `lower_bound`/`upper_bound`
/// stay monotone over `[start, end)` regardless of physical direction.
/// The two bounds keep their literal meaning either way (first offset
/// with `v >= literal` / first offset with `v > literal`); it's the
/// predicate-to-range mapping below, not this comparison, that has to
/// swap sides for a descending segment.
fn effective_cmp(v: &Value, literal: &Value, ascending: bool) -> Ordering {
    if ascending {
        v.cmp_value(literal)
    } else {
        literal.cmp_value(v)
    }
}

pub fn sorted_scan(
    segment: &Segment,
    chunk_id: u32,
    ascending: bool,
    nulls_first: bool,
    cond: PredicateCondition,
    literal: &Value,
    upper: Option<&Value>,
    position_filter: Option<&[u32]>,
) -> Result<PositionList> {
    // A position filter breaks the contiguity the binary search relies
    // on (the matching rows are no longer a contiguous physical range
    // once a subset of offsets has already been pre-selected); the
    // orchestrator falls back to the segment's generic/dictionary path
    // whenever this is returned, the same way it already does for
    // `NotEquals`.
    if position_filter.is_some() {
        return Err(ScanError::Predicate("sorted accelerator does not support a position filter".into()));
    }
    let len = segment.len();
    let (start, end) = non_null_bounds(segment, len, nulls_first);

    if cond.is_null_check() {
        let mut out = PositionList::with_capacity(len);
        let (null_range_start, null_range_end) = if nulls_first { (0, start) } else { (end, len) };
        let range = match cond {
            PredicateCondition::IsNull => (null_range_start, null_range_end),
            PredicateCondition::IsNotNull => (start, end),
            _ => unreachable!(),
        };
        for offset in range.0..range.1 {
            out.push(chunk_id, offset as u32);
        }
        out.ordered_by = None;
        return Ok(out);
    }

    // A null literal makes every comparison `unknown`: no row matches,
    // regardless of where binary search would otherwise land.
    if literal.is_null() || upper.map(Value::is_null).unwrap_or(false) {
        return Ok(PositionList::new());
    }

    let lower_bound = |lit: &Value| {
        partition_point_in(segment, start, end, |v| {
            v.map(|v| effective_cmp(v, lit, ascending) == Ordering::Less).unwrap_or(false)
        })
    };
    let upper_bound = |lit: &Value| {
        partition_point_in(segment, start, end, |v| {
            v.map(|v| effective_cmp(v, lit, ascending) != Ordering::Greater).unwrap_or(false)
        })
    };

    // `lower_bound`/`upper_bound` always walk the physical range in the
    // direction `effective_cmp` makes monotonic, so `Equals` needs no
    // direction split. Every other comparator's matches sit on one physical
    // *side* of its bound, and which side flips with the segment's physical
    // direction: ascending puts "less" values toward `start`, descending
    // puts them toward `end`, so each arm's endpoints mirror accordingly.
    let (first, last) = match cond {
        PredicateCondition::Equals => (lower_bound(literal), upper_bound(literal)),
        PredicateCondition::LessThan => {
            if ascending { (start, lower_bound(literal)) } else { (upper_bound(literal), end) }
        }
        PredicateCondition::LessThanEquals => {
            if ascending { (start, upper_bound(literal)) } else { (lower_bound(literal), end) }
        }
        PredicateCondition::GreaterThan => {
            if ascending { (upper_bound(literal), end) } else { (start, lower_bound(literal)) }
        }
        PredicateCondition::GreaterThanEquals => {
            if ascending { (lower_bound(literal), end) } else { (start, upper_bound(literal)) }
        }
        PredicateCondition::Between => {
            let Some(hi) = upper else {
                return Err(ScanError::Predicate("Between requires an upper literal".into()));
            };
            if ascending {
                (lower_bound(literal), upper_bound(hi))
            } else {
                (lower_bound(hi), upper_bound(literal))
            }
        }
        PredicateCondition::NotEquals => {
            return Err(ScanError::Predicate("NotEquals has no contiguous sorted range".into()));
        }
        _ => return Err(ScanError::Predicate(format!("{cond:?} has no sorted acceleration"))),
    };

    let mut out = PositionList::with_capacity(last.saturating_sub(first));
    for offset in first..last {
        out.push(chunk_id, offset as u32);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use colscan_core::segment::ValueSegment;
    use colscan_core::value::ElementKind;

    fn ascending_segment() -> Segment {
        Segment::Value(
            ValueSegment::new(
                ElementKind::Int32,
                vec![
                    Value::Int32(1),
                    Value::Int32(3),
                    Value::Int32(3),
                    Value::Int32(7),
                    Value::Int32(10),
                ],
                None,
            )
            .unwrap(),
        )
    }

    #[test]
    fn equals_finds_contiguous_duplicate_run() {
        let seg = ascending_segment();
        let hits = sorted_scan(&seg, 0, true, true, PredicateCondition::Equals, &Value::Int32(3), None, None).unwrap();
        let offsets: Vec<u32> = hits.positions.iter().map(|p| p.chunk_offset).collect();
        assert_eq!(offsets, vec![1, 2]);
    }

    #[test]
    fn between_matches_spec_worked_example() {
        let seg = ascending_segment();
        let hits = sorted_scan(&seg, 0, true, true, PredicateCondition::Between, &Value::Int32(3), Some(&Value::Int32(7)), None).unwrap();
        let offsets: Vec<u32> = hits.positions.iter().map(|p| p.chunk_offset).collect();
        assert_eq!(offsets, vec![1, 2, 3]);
    }

    #[test]
    fn descending_order_still_returns_contiguous_range() {
        let seg = Segment::Value(
            ValueSegment::new(
                ElementKind::Int32,
                vec![Value::Int32(10), Value::Int32(7), Value::Int32(3), Value::Int32(1)],
                None,
            )
            .unwrap(),
        );
        let hits = sorted_scan(&seg, 0, false, true, PredicateCondition::LessThanEquals, &Value::Int32(3), None, None).unwrap();
        let offsets: Vec<u32> = hits.positions.iter().map(|p| p.chunk_offset).collect();
        assert_eq!(offsets, vec![2, 3]);
    }

    #[test]
    fn descending_order_greater_than_equals_returns_head_range() {
        let seg = Segment::Value(
            ValueSegment::new(
                ElementKind::Int32,
                vec![Value::Int32(10), Value::Int32(7), Value::Int32(3), Value::Int32(1)],
                None,
            )
            .unwrap(),
        );
        let hits =
            sorted_scan(&seg, 0, false, true, PredicateCondition::GreaterThanEquals, &Value::Int32(7), None, None).unwrap();
        let offsets: Vec<u32> = hits.positions.iter().map(|p| p.chunk_offset).collect();
        assert_eq!(offsets, vec![0, 1]);
    }

    #[test]
    fn descending_order_between_matches_middle_range() {
        let seg = Segment::Value(
            ValueSegment::new(
                ElementKind::Int32,
                vec![Value::Int32(10), Value::Int32(7), Value::Int32(3), Value::Int32(1)],
                None,
            )
            .unwrap(),
        );
        let hits = sorted_scan(&seg, 0, false, true, PredicateCondition::Between, &Value::Int32(3), Some(&Value::Int32(7)), None)
            .unwrap();
        let offsets: Vec<u32> = hits.positions.iter().map(|p| p.chunk_offset).collect();
        assert_eq!(offsets, vec![1, 2]);
    }

    #[test]
    fn nulls_first_is_null_finds_prefix() {
        let seg = Segment::Value(
            ValueSegment::new(ElementKind::Int32, vec![Value::Null, Value::Null, Value::Int32(1)], None).unwrap(),
        );
        let hits = sorted_scan(&seg, 0, true, true, PredicateCondition::IsNull, &Value::Null, None, None).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn null_literal_matches_nothing_on_greater_than_equals() {
        let seg = ascending_segment();
        // Without the null-literal guard `lower_bound(Null)` resolves to
        // `start`, making the range `[start, end)` — i.e. "everything".
        let hits = sorted_scan(&seg, 0, true, true, PredicateCondition::GreaterThanEquals, &Value::Null, None, None).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn position_filter_is_rejected_not_silently_ignored() {
        let seg = ascending_segment();
        let err = sorted_scan(&seg, 0, true, true, PredicateCondition::Equals, &Value::Int32(3), None, Some(&[0, 1]));
        assert!(err.is_err());
    }
}
