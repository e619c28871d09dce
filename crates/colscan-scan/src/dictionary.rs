//! Dictionary-accelerated scan: translate the predicate into a
//! value-id window once, then test each row's attribute-vector entry
//! against that window instead of re-comparing the materialized value
//! every time.

use colscan_core::position::PositionList;
use colscan_core::predicate::PredicateCondition;
use colscan_core::segment::{DictionarySegment, INVALID_VALUE_ID};
use colscan_core::value::Value;

use crate::error::{Result, ScanError};

/// A half-open value-id window `[lo, hi)`; an offset's attribute-vector
/// entry matches the predicate iff its value-id falls in this window.
/// `NotEquals` cannot be expressed as one contiguous window, so it is
/// represented as the *complement* of one (`negated = true`).
struct ValueIdWindow {
    lo: u32,
    hi: u32,
    negated: bool,
}

fn build_window(dict: &DictionarySegment, cond: PredicateCondition, literal: &Value, upper: Option<&Value>) -> Result<ValueIdWindow> {
    let u = dict.unique_values_count();
    Ok(match cond {
        PredicateCondition::Equals => {
            let lo = dict.lower_bound(literal);
            let hi = dict.upper_bound(literal);
            ValueIdWindow { lo, hi, negated: false }
        }
        PredicateCondition::NotEquals => {
            let lo = dict.lower_bound(literal);
            let hi = dict.upper_bound(literal);
            ValueIdWindow { lo, hi, negated: true }
        }
        PredicateCondition::LessThan => ValueIdWindow { lo: 0, hi: dict.lower_bound(literal), negated: false },
        PredicateCondition::LessThanEquals => ValueIdWindow { lo: 0, hi: dict.upper_bound(literal), negated: false },
        PredicateCondition::GreaterThan => ValueIdWindow { lo: dict.upper_bound(literal), hi: u, negated: false },
        PredicateCondition::GreaterThanEquals => ValueIdWindow { lo: dict.lower_bound(literal), hi: u, negated: false },
        PredicateCondition::Between => {
            let Some(hi_lit) = upper else {
                return Err(ScanError::Predicate("Between requires an upper literal".into()));
            };
            let lo = dict.lower_bound(literal);
            // An inverted range (`literal > hi_lit`) must match nothing, not
            // everything: clamping here keeps `hi >= lo` so `matches_none`'s
            // `lo == hi` check actually catches it, instead of `hi - lo`
            // underflowing into a near-universe-sized window in `contains`.
            let hi = dict.upper_bound(hi_lit).max(lo);
            ValueIdWindow { lo, hi, negated: false }
        }
        _ => return Err(ScanError::Predicate(format!("{cond:?} has no dictionary acceleration"))),
    })
}

impl ValueIdWindow {
    /// `true` if value-id `id` matches, using unsigned wraparound
    /// arithmetic so `INVALID_VALUE_ID` (the widest possible `u32`)
    /// never falsely lands inside `[lo, hi)` unless the window spans
    /// the entire id space.
    fn contains(&self, id: u32) -> bool {
        if id == INVALID_VALUE_ID {
            return false;
        }
        let inside = id.wrapping_sub(self.lo) < self.hi.wrapping_sub(self.lo);
        inside != self.negated
    }

    /// The window matches every non-null row (skip the predicate test).
    fn matches_all(&self, universe: u32) -> bool {
        if self.negated {
            self.lo == self.hi
        } else {
            self.lo == 0 && self.hi == universe
        }
    }

    /// The window matches no row at all (skip the chunk outright).
    fn matches_none(&self, universe: u32) -> bool {
        if self.negated {
            self.lo == 0 && self.hi == universe
        } else {
            self.lo == self.hi
        }
    }
}

/// Offsets to iterate: either every offset in the segment, or exactly
/// the caller-supplied position filter (a reference-segment indirection
/// selected by an earlier stage).
enum Offsets<'a> {
    All(usize),
    Filtered(&'a [u32]),
}

impl<'a> Offsets<'a> {
    fn iter(&self) -> Box<dyn Iterator<Item = u32> + 'a> {
        match self {
            Offsets::All(len) => Box::new(0..*len as u32),
            Offsets::Filtered(offsets) => Box::new(offsets.iter().copied()),
        }
    }
}

pub fn dictionary_scan(
    dict: &DictionarySegment,
    chunk_id: u32,
    cond: PredicateCondition,
    literal: &Value,
    upper: Option<&Value>,
    position_filter: Option<&[u32]>,
) -> Result<PositionList> {
    let offsets = match position_filter {
        Some(f) => Offsets::Filtered(f),
        None => Offsets::All(dict.len()),
    };

    if cond.is_null_check() {
        let mut out = PositionList::new();
        for offset in offsets.iter() {
            let is_null = dict.is_null(offset as usize);
            let matches = match cond {
                PredicateCondition::IsNull => is_null,
                PredicateCondition::IsNotNull => !is_null,
                _ => unreachable!(),
            };
            if matches {
                out.push(chunk_id, offset);
            }
        }
        return Ok(out);
    }

    // A null literal makes every comparison `unknown`: no row can match,
    // independent of what `lower_bound`/`upper_bound` would compute for it.
    if literal.is_null() || upper.map(Value::is_null).unwrap_or(false) {
        return Ok(PositionList::new());
    }

    let window = build_window(dict, cond, literal, upper)?;
    let universe = dict.unique_values_count();

    if window.matches_none(universe) {
        return Ok(PositionList::new());
    }
    if window.matches_all(universe) {
        let mut out = PositionList::new();
        for offset in offsets.iter() {
            if !dict.is_null(offset as usize) {
                out.push(chunk_id, offset);
            }
        }
        return Ok(out);
    }

    let mut out = PositionList::new();
    for offset in offsets.iter() {
        if window.contains(dict.attribute_at(offset as usize)) {
            out.push(chunk_id, offset);
        }
    }
    Ok(out)
}
