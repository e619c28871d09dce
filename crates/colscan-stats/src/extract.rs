//! Shared extraction step every per-segment statistic builder starts
//! from: materialize a segment's non-null values, sorted ascending and
//! grouped into `(value, row_count)` pairs by distinct value.

use colscan_core::segment::Segment;
use colscan_core::value::Value;

pub(crate) fn distinct_sorted_counts(segment: &Segment) -> Vec<(Value, u64)> {
    let mut values: Vec<Value> = (0..segment.len())
        .filter_map(|i| segment.value_at(i).cloned())
        .collect();
    values.sort_by(Value::cmp_value);

    let mut out: Vec<(Value, u64)> = Vec::new();
    for v in values {
        match out.last_mut() {
            Some(last) if last.0.eq_value(&v) => last.1 += 1,
            _ => out.push((v, 1)),
        }
    }
    out
}
