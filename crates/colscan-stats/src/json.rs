//! Diagnostic JSON shapes for the three statistic kinds.
//! These are for human/tooling inspection only — nothing in
//! `colscan-scan` parses them back.

use colscan_core::value::Value;
use serde_json::{json, Value as Json};

use crate::histogram::EqualDistinctCountHistogram;
use crate::minmax::MinMaxFilter;
use crate::range::RangeFilter;
use crate::statistic::Statistic;

pub fn value_to_json(v: &Value) -> Json {
    match v {
        Value::Null => Json::Null,
        Value::Int32(x) => json!(x),
        Value::Int64(x) => json!(x),
        Value::Float32(x) => json!(x),
        Value::Float64(x) => json!(x),
        Value::Bytes(b) => match std::str::from_utf8(b) {
            Ok(s) => json!(s),
            Err(_) => json!(b),
        },
    }
}

pub fn minmax_to_json(f: &MinMaxFilter) -> Json {
    json!({
        "min": value_to_json(&f.min),
        "max": value_to_json(&f.max),
        "non_null_count": f.non_null_count,
    })
}

pub fn range_to_json(f: &RangeFilter) -> Json {
    json!({
        "ranges": f.ranges.iter().map(|(lo, hi)| json!([value_to_json(lo), value_to_json(hi)])).collect::<Vec<_>>(),
        "non_null_count": f.non_null_count,
    })
}

pub fn histogram_to_json(h: &EqualDistinctCountHistogram) -> Json {
    json!({
        "bins": h.bins.iter().map(|b| json!({
            "lo": value_to_json(&b.lo),
            "hi": value_to_json(&b.hi),
            "height": b.height,
            "distinct": b.distinct_count,
        })).collect::<Vec<_>>(),
        "non_null_count": h.non_null_count,
    })
}

pub fn statistic_to_json(s: &Statistic) -> Json {
    match s {
        Statistic::MinMax(f) => json!({ "kind": "min_max", "stat": minmax_to_json(f) }),
        Statistic::Range(f) => json!({ "kind": "range", "stat": range_to_json(f) }),
        Statistic::Histogram(f) => json!({ "kind": "histogram", "stat": histogram_to_json(f) }),
    }
}
