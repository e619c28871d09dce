//! Position-filter indirection: scanning a reference segment must apply
//! the predicate to the *referenced* segment's values at the positions
//! an earlier stage selected, not to the filter's own positions, and a
//! chunk with nothing selected must be skipped outright.

use colscan_core::position::{ColumnId, Position, PositionList};
use colscan_core::predicate::PredicateCondition;
use colscan_core::segment::{DictionarySegment, Segment, ValueSegment, INVALID_VALUE_ID};
use colscan_core::value::{ElementKind, Value};
use colscan_scan::orchestrator::{scan_table, Chunk, ChunkColumn, Table};
use colscan_scan::{AccessCounter, CancellationToken};

fn i(v: i32) -> Value {
    Value::Int32(v)
}

#[test]
fn value_segment_scan_honors_position_filter_across_chunks() {
    // Two chunks of [1, 1, 1]; only offset 0 of chunk 0 and offset 2 of
    // chunk 1 are in scope for a downstream predicate over a reference
    // segment that already went through an earlier selection.
    let make_chunk = |id: u32| Chunk {
        chunk_id: id,
        columns: vec![ChunkColumn {
            column_id: ColumnId(0),
            segment: Segment::Value(
                ValueSegment::new(ElementKind::Int32, vec![i(1), i(1), i(1)], None).unwrap(),
            ),
            statistics: vec![],
        }],
    };
    let table = Table { chunks: vec![make_chunk(0), make_chunk(1)] };

    let mut filter = PositionList::new();
    filter.push(0, 0);
    filter.push(1, 2);

    let cancel = CancellationToken::new();
    let counter = AccessCounter::new(16);
    let hits = scan_table(&table, ColumnId(0), PredicateCondition::Equals, &i(1), None, Some(&filter), &cancel, &counter).unwrap();

    let mut got: Vec<Position> = hits.positions.clone();
    got.sort_by_key(|p| (p.chunk_id, p.chunk_offset));
    assert_eq!(got, vec![Position::new(0, 0), Position::new(1, 2)]);
}

#[test]
fn dictionary_segment_scan_honors_position_filter() {
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
                segment: Segment::Dictionary(dict),
                statistics: vec![],
            }],
        }],
    };

    // Offset 3 also carries value-id 1 (=20) and would match unfiltered,
    // but it is outside the filter, so it must be excluded.
    let mut filter = PositionList::new();
    filter.push(0, 1);

    let cancel = CancellationToken::new();
    let counter = AccessCounter::new(8);
    let hits = scan_table(&table, ColumnId(0), PredicateCondition::Equals, &i(20), None, Some(&filter), &cancel, &counter).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits.positions[0], Position::new(0, 1));
}

#[test]
fn empty_filter_for_a_chunk_skips_it_without_scanning() {
    let table = Table {
        chunks: vec![
            Chunk {
                chunk_id: 0,
                columns: vec![ChunkColumn {
                    column_id: ColumnId(0),
                    segment: Segment::Value(ValueSegment::new(ElementKind::Int32, vec![i(1)], None).unwrap()),
                    statistics: vec![],
                }],
            },
            Chunk {
                chunk_id: 1,
                columns: vec![ChunkColumn {
                    column_id: ColumnId(0),
                    segment: Segment::Value(ValueSegment::new(ElementKind::Int32, vec![i(1)], None).unwrap()),
                    statistics: vec![],
                }],
            },
        ],
    };
    // Filter only ever names chunk 1; chunk 0 has nothing selected.
    let mut filter = PositionList::new();
    filter.push(1, 0);

    let cancel = CancellationToken::new();
    let counter = AccessCounter::new(8);
    let hits = scan_table(&table, ColumnId(0), PredicateCondition::Equals, &i(1), None, Some(&filter), &cancel, &counter).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits.positions[0].chunk_id, 1);
    // The access counter only ever saw the one filtered offset, not the
    // full two rows across both chunks.
    assert_eq!(counter.total(), 1);
}

#[test]
fn sorted_segment_falls_back_off_the_accelerator_when_filtered() {
    use colscan_core::position::{OrderMode, OrderedBy};

    let seg = Segment::Value(
        ValueSegment::new(
            ElementKind::Int32,
            vec![i(1), i(2), i(2), i(3)],
            Some(OrderedBy { column_id: ColumnId(0), mode: OrderMode::AscNullsLast }),
        )
        .unwrap(),
    );
    let table = Table {
        chunks: vec![Chunk {
            chunk_id: 0,
            columns: vec![ChunkColumn { column_id: ColumnId(0), segment: seg, statistics: vec![] }],
        }],
    };

    // Without a filter, the sorted accelerator would return the whole
    // contiguous run [1, 2]; with a filter excluding offset 1 it must
    // still return exactly what the filter allows, never the blind
    // contiguous range the accelerator would otherwise compute.
    let mut filter = PositionList::new();
    filter.push(0, 2);

    let cancel = CancellationToken::new();
    let counter = AccessCounter::new(8);
    let hits = scan_table(&table, ColumnId(0), PredicateCondition::Equals, &i(2), None, Some(&filter), &cancel, &counter).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits.positions[0].chunk_offset, 2);
}
