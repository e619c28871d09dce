//! The worked numeric/dictionary scenarios used to pin down exact
//! pruning and cardinality behavior across the three statistics and
//! the dictionary scan path.

use colscan_core::predicate::PredicateCondition;
use colscan_core::segment::{DictionarySegment, INVALID_VALUE_ID};
use colscan_core::value::{ElementKind, Value};
use colscan_scan::orchestrator::{scan_table, Chunk, ChunkColumn, Table};
use colscan_core::position::ColumnId;
use colscan_scan::{AccessCounter, CancellationToken};
use colscan_stats::{CardinalityTag, RangeFilter};

fn i(v: i32) -> Value {
    Value::Int32(v)
}

fn worked_values() -> Vec<Value> {
    vec![-1000, 2, 3, 4, 7, 8, 10, 17, 100, 101, 102, 103, 123456].into_iter().map(i).collect()
}

#[test]
fn scenario_1_four_range_filter() {
    let values = worked_values();
    let n = values.len() as u64;
    let filter = RangeFilter::build(ElementKind::Int32, &values, n, 4).unwrap();

    assert!(filter.can_prune(PredicateCondition::Equals, &i(1024), None));
    assert!(!filter.can_prune(PredicateCondition::Equals, &i(17), None));
    assert!(filter.can_prune(PredicateCondition::Between, &i(104), Some(&i(123455))));
    assert!(!filter.can_prune(PredicateCondition::Between, &i(103), Some(&i(123456))));
}

#[test]
fn scenario_2_single_range_matches_min_max() {
    let values = worked_values();
    let n = values.len() as u64;
    let filter = RangeFilter::build(ElementKind::Int32, &values, n, 1).unwrap();

    assert!(filter.can_prune(PredicateCondition::LessThan, &i(-1000), None));
    assert!(!filter.can_prune(PredicateCondition::GreaterThan, &i(-1000), None));
    assert!(!filter.can_prune(PredicateCondition::Equals, &i(1024), None));
}

#[test]
fn scenario_3_dictionary_scan_offsets() {
    let dict = DictionarySegment::new(
        ElementKind::Int32,
        vec![i(10), i(20), i(30)],
        vec![0, 1, 2, 1, INVALID_VALUE_ID],
        None,
    )
    .unwrap();

    let table = Table {
        chunks: vec![Chunk {
            chunk_id: 0,
            columns: vec![ChunkColumn {
                column_id: ColumnId(0),
                segment: colscan_core::segment::Segment::Dictionary(dict),
                statistics: vec![],
            }],
        }],
    };

    let cancel = CancellationToken::new();
    let counter = AccessCounter::new(4);

    let hits = scan_table(&table, ColumnId(0), PredicateCondition::Equals, &i(20), None, None, &cancel, &counter).unwrap();
    let offsets: Vec<u32> = hits.positions.iter().map(|p| p.chunk_offset).collect();
    assert_eq!(offsets, vec![1, 3]);

    let hits = scan_table(&table, ColumnId(0), PredicateCondition::Equals, &i(25), None, None, &cancel, &counter).unwrap();
    assert!(hits.is_empty());

    let hits = scan_table(&table, ColumnId(0), PredicateCondition::GreaterThanEquals, &i(20), None, None, &cancel, &counter).unwrap();
    let mut offsets: Vec<u32> = hits.positions.iter().map(|p| p.chunk_offset).collect();
    offsets.sort();
    assert_eq!(offsets, vec![1, 2, 3]);
}

#[test]
fn scenario_4_sorted_accelerator_matches_generic() {
    use colscan_core::segment::{Segment, ValueSegment};
    use colscan_scan::{generic::generic_scan, sorted::sorted_scan};

    let values: Vec<Value> = (0..10).map(i).collect();
    let seg = Segment::Value(ValueSegment::new(ElementKind::Int32, values, None).unwrap());

    let sorted_hits = sorted_scan(&seg, 0, true, true, PredicateCondition::Between, &i(3), Some(&i(6)), None).unwrap();
    let generic_hits = generic_scan(&seg, 0, PredicateCondition::Between, &i(3), Some(&i(6)), None).unwrap();

    let sorted_offsets: Vec<u32> = sorted_hits.positions.iter().map(|p| p.chunk_offset).collect();
    let generic_offsets: Vec<u32> = generic_hits.positions.iter().map(|p| p.chunk_offset).collect();
    assert_eq!(sorted_offsets, vec![3, 4, 5, 6]);
    assert_eq!(sorted_offsets, generic_offsets);
}

#[test]
fn scenario_5_minmax_filter_behavior() {
    use colscan_stats::MinMaxFilter;

    let filter = MinMaxFilter::new(ElementKind::Int32, i(5), i(10), 20).unwrap();

    let est = filter.estimate_cardinality(PredicateCondition::Equals, &i(11), None);
    assert_eq!(est.tag, CardinalityTag::MatchesNone);

    let est = filter.estimate_cardinality(PredicateCondition::Equals, &i(7), None);
    assert_eq!(est.tag, CardinalityTag::MatchesApproximately);

    let est = filter.estimate_cardinality(PredicateCondition::GreaterThan, &i(10), None);
    assert_eq!(est.tag, CardinalityTag::MatchesNone);

    let sliced = filter.sliced(PredicateCondition::LessThanEquals, &i(7), None).unwrap();
    assert_eq!(sliced.max, i(7));

    assert!(filter.sliced(PredicateCondition::LessThan, &i(5), None).is_none());
}
