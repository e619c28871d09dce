#![forbid(unsafe_code)]
//! colscan-core: shared value/segment kernel for the colscan table-scan
//! engine.
//!
//! This crate contains only *pure* types and small helpers: the element
//! kind / value domain, the predicate vocabulary, position lists, and
//! the two segment encodings. There is **no I/O**, **no statistics
//! logic**, and **no scan logic** here — those live in `colscan-stats`
//! and `colscan-scan` respectively, which both depend on this crate for
//! their shared types.

pub mod error;
pub mod position;
pub mod predicate;
pub mod prelude;
pub mod segment;
pub mod value;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
