//! Positions, position lists, and the sort-metadata tag segments and
//! position lists can carry.

use serde::{Deserialize, Serialize};

/// Sentinel used for both halves of a null reference slot in a position
/// list, and conceptually for an `INVALID` value-id's widest in-memory
/// representation. Never use a signed sentinel here.
pub const NULL_SENTINEL: u32 = u32::MAX;

/// A `(chunk_id, chunk_offset)` pair identifying one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub chunk_id: u32,
    pub chunk_offset: u32,
}

impl Position {
    pub fn new(chunk_id: u32, chunk_offset: u32) -> Self {
        Self { chunk_id, chunk_offset }
    }

    /// The reserved null-reference slot: both halves are `NULL_SENTINEL`.
    pub const NULL: Position = Position {
        chunk_id: NULL_SENTINEL,
        chunk_offset: NULL_SENTINEL,
    };

    pub fn is_null(&self) -> bool {
        self.chunk_id == NULL_SENTINEL && self.chunk_offset == NULL_SENTINEL
    }
}

/// Column identifier, stable within one table/schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnId(pub u32);

impl ColumnId {
    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Which end nulls sit at, and whether the non-null run is ascending or
/// descending, for a segment or position list tagged as ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderMode {
    AscNullsFirst,
    AscNullsLast,
    DescNullsFirst,
    DescNullsLast,
}

impl OrderMode {
    pub fn is_ascending(self) -> bool {
        matches!(self, OrderMode::AscNullsFirst | OrderMode::AscNullsLast)
    }

    pub fn nulls_first(self) -> bool {
        matches!(self, OrderMode::AscNullsFirst | OrderMode::DescNullsFirst)
    }
}

/// A contract tag: "if present, the non-null values in physical order
/// form the stated monotonic sequence; nulls are grouped at one end."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedBy {
    pub column_id: ColumnId,
    pub mode: OrderMode,
}

/// Ordered sequence of positions, with an optional propagated sort tag.
/// This is what a scan produces and what downstream operators consume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionList {
    pub positions: Vec<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordered_by: Option<OrderedBy>,
}

impl PositionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            positions: Vec::with_capacity(cap),
            ordered_by: None,
        }
    }

    pub fn push(&mut self, chunk_id: u32, chunk_offset: u32) {
        self.positions.push(Position::new(chunk_id, chunk_offset));
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Concatenate another chunk's results in the caller's chunk order.
    /// No implicit global sort.
    pub fn extend(&mut self, other: PositionList) {
        self.positions.extend(other.positions);
        // A concatenation of two chunk-scoped ordered runs is not, in
        // general, itself a single ordered run across chunks.
        self.ordered_by = None;
    }

    /// The offsets among this position list that belong to `chunk_id`,
    /// in ascending order, as a scan-local position filter: restricting
    /// a later scan over a reference segment to the positions an
    /// earlier stage already selected within that chunk.
    pub fn offsets_in_chunk(&self, chunk_id: u32) -> Vec<u32> {
        let mut offsets: Vec<u32> = self
            .positions
            .iter()
            .filter(|p| !p.is_null() && p.chunk_id == chunk_id)
            .map(|p| p.chunk_offset)
            .collect();
        offsets.sort_unstable();
        offsets
    }
}

impl FromIterator<Position> for PositionList {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
            ordered_by: None,
        }
    }
}
