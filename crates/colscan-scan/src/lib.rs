#![forbid(unsafe_code)]
//! colscan-scan: table-scan execution over `colscan-core` segments.
//!
//! Three scan paths share one predicate vocabulary: a generic per-row
//! path that works against any segment, a dictionary-accelerated path
//! that tests value-ids instead of materialized values, and a
//! sorted-accelerated path that turns a comparator predicate into one
//! binary search instead of a linear scan. `colscan-stats` statistics
//! prune whole chunks before any of the three ever runs.

pub mod concurrency;
pub mod dictionary;
pub mod error;
pub mod generic;
pub mod orchestrator;
pub mod sorted;

pub use concurrency::{AccessCounter, AccessSample, CancellationToken};
pub use error::{Result, ScanError};
pub use orchestrator::{scan_table, Chunk, ChunkColumn, Table};
