//! Table/chunk orchestration: for each chunk, prune via statistics when
//! possible, otherwise dispatch to whichever scan path the segment's
//! encoding and sort tag make available, then stitch the per-chunk
//! position lists together.

use colscan_core::position::{ColumnId, OrderedBy, PositionList};
use colscan_core::predicate::PredicateCondition;
use colscan_core::segment::Segment;
use colscan_core::value::Value;
use colscan_stats::Statistic;

use crate::concurrency::{AccessCounter, CancellationToken};
use crate::dictionary::dictionary_scan;
use crate::error::Result;
use crate::generic::generic_scan;
use crate::sorted::sorted_scan;

/// One column's storage within a chunk: its segment plus whatever
/// statistics were built over it. A column may carry more than one
/// statistic (e.g. a min-max filter for the cheap early-out and a
/// histogram for cardinality estimates).
pub struct ChunkColumn {
    pub column_id: ColumnId,
    pub segment: Segment,
    pub statistics: Vec<Statistic>,
}

/// One horizontal slice of the table: a fixed set of columns, all with
/// the same row count.
pub struct Chunk {
    pub chunk_id: u32,
    pub columns: Vec<ChunkColumn>,
}

impl Chunk {
    fn column(&self, column_id: ColumnId) -> Option<&ChunkColumn> {
        self.columns.iter().find(|c| c.column_id == column_id)
    }
}

/// A table is just an ordered sequence of chunks; there is no global
/// cross-chunk sort order.
pub struct Table {
    pub chunks: Vec<Chunk>,
}

/// Scan one chunk's column for a single-column predicate, pruning via
/// statistics before falling back to whichever scan path its segment
/// supports. `position_filter`, when given, restricts the scan to those
/// offsets within this chunk — the reference-segment indirection case,
/// where an earlier stage has already selected a subset of rows and
/// this predicate only needs to be tested against that subset.
fn scan_chunk_column(
    chunk_id: u32,
    col: &ChunkColumn,
    cond: PredicateCondition,
    literal: &Value,
    upper: Option<&Value>,
    position_filter: Option<&[u32]>,
) -> Result<PositionList> {
    if col.statistics.iter().any(|s| s.can_prune(cond, literal, upper)) {
        #[cfg(feature = "tracing")]
        tracing::trace!(chunk = chunk_id, column = col.column_id.get(), "pruned chunk via statistic");
        return Ok(PositionList::new());
    }

    if position_filter.is_none() {
        if let Some(OrderedBy { column_id, mode }) = col.segment.ordered_by() {
            if column_id == col.column_id {
                match sorted_scan(&col.segment, chunk_id, mode.is_ascending(), mode.nulls_first(), cond, literal, upper, None) {
                    Ok(mut hits) => {
                        hits.ordered_by = Some(OrderedBy { column_id, mode });
                        return Ok(hits);
                    }
                    // NotEquals (and any other non-contiguous predicate) has
                    // no sorted acceleration; fall through to the segment's
                    // own best path instead of failing the whole scan.
                    Err(crate::error::ScanError::Predicate(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
    }

    match &col.segment {
        Segment::Dictionary(dict) => dictionary_scan(dict, chunk_id, cond, literal, upper, position_filter),
        Segment::Value(_) => generic_scan(&col.segment, chunk_id, cond, literal, upper, position_filter),
    }
}

/// Scan `column_id` across the whole table, checking the cancellation
/// token once per chunk boundary (never inside a chunk's per-row loop)
/// and recording rows scanned in `counter`. `position_filter`, when
/// given, is a position list produced by an earlier stage; only the
/// offsets it names within each chunk are visited, and a chunk with no
/// matching offsets is skipped outright rather than scanned and
/// discarded.
pub fn scan_table(
    table: &Table,
    column_id: ColumnId,
    cond: PredicateCondition,
    literal: &Value,
    upper: Option<&Value>,
    position_filter: Option<&PositionList>,
    cancel: &CancellationToken,
    counter: &AccessCounter,
) -> Result<PositionList> {
    let mut out = PositionList::new();
    for chunk in &table.chunks {
        if cancel.is_cancelled() {
            return Err(crate::error::ScanError::Cancelled);
        }
        let Some(col) = chunk.column(column_id) else { continue };

        let chunk_filter = position_filter.map(|pf| pf.offsets_in_chunk(chunk.chunk_id));
        if let Some(offsets) = &chunk_filter {
            if offsets.is_empty() {
                continue;
            }
        }
        let filter_slice = chunk_filter.as_deref();

        counter.add(filter_slice.map(|f| f.len()).unwrap_or(col.segment.len()) as u64);
        let hits = scan_chunk_column(chunk.chunk_id, col, cond, literal, upper, filter_slice)?;
        #[cfg(feature = "tracing")]
        tracing::trace!(chunk = chunk.chunk_id, column = column_id.get(), matched = hits.len(), "scanned chunk");
        out.extend(hits);
    }
    Ok(out)
}
