//! Submission normalization.
//!
//! Turns the raw nested records returned by the form service into the flat
//! [`Table`] every downstream consumer reads:
//!
//! 1. nested objects are flattened into dotted column names
//!    (`group.question`), missing keys simply yielding absent cells;
//! 2. the compound `_geolocation` pair is split into independent
//!    `latitude`/`longitude` scalar columns and the original column is
//!    removed — the pair is all-or-nothing, never partial;
//! 3. the declared count fields are coerced to numbers for summation only;
//!    the table itself keeps the values exactly as submitted.

use serde_json::Value;

use crate::model::{COL_LATITUDE, COL_LONGITUDE, FIELD_GEOLOCATION, Row, Table};

// ---------------------------------------------------------------------------
// Geolocation splitting
// ---------------------------------------------------------------------------

/// Split a compound geolocation value into `(latitude, longitude)`.
///
/// A valid value is a two-element list whose elements both parse as
/// floating-point numbers (JSON numbers or numeric strings). Anything else
/// — wrong length, non-numeric element, null, not a list — yields
/// `(None, None)`. A partial pair is never produced: if either component
/// fails to parse, both are absent.
pub fn split_geolocation(value: &Value) -> (Option<f64>, Option<f64>) {
    let Some(pair) = value.as_array() else {
        return (None, None);
    };
    if pair.len() != 2 {
        return (None, None);
    }
    match (parse_coordinate(&pair[0]), parse_coordinate(&pair[1])) {
        (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
        _ => (None, None),
    }
}

/// Parse one coordinate component. Accepts JSON numbers and numeric
/// strings; everything else is `None`.
fn parse_coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Coerce a declared-numeric cell for summation.
///
/// JSON numbers pass through; numeric strings are parsed; unparsable,
/// missing, and null values all coerce to zero. Display of the raw table
/// is unaffected — this is used by the aggregator only.
pub fn coerce_count(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// Flatten one raw submission into a row of dotted column names.
///
/// Nested objects recurse with a `.` separator; lists and scalars are kept
/// as-is. Non-object submissions produce an empty row.
pub fn flatten_submission(submission: &Value) -> Row {
    flatten_pairs(submission).into_iter().collect()
}

/// Ordered variant of [`flatten_submission`], used by [`build_table`] to
/// record column order as fields are first seen.
fn flatten_pairs(submission: &Value) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    if let Some(map) = submission.as_object() {
        for (key, value) in map {
            flatten_into(key, value, &mut out);
        }
    }
    out
}

fn flatten_into(path: &str, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(&format!("{}.{}", path, key), child, out);
            }
        }
        other => out.push((path.to_string(), other.clone())),
    }
}

// ---------------------------------------------------------------------------
// Table construction
// ---------------------------------------------------------------------------

/// Build the flat session [`Table`] from raw submissions.
///
/// Columns are the union of all flattened field names in first-seen order,
/// with `_geolocation` removed and the derived `latitude`/`longitude`
/// columns appended last. Row order follows fetch order. Rows without a
/// valid coordinate pair carry null in both derived columns.
pub fn build_table(submissions: &[Value]) -> Table {
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Row> = Vec::with_capacity(submissions.len());

    for submission in submissions {
        let pairs = flatten_pairs(submission);
        let mut row = Row::with_capacity(pairs.len() + 2);

        for (column, value) in pairs {
            if column != FIELD_GEOLOCATION && !columns.contains(&column) {
                columns.push(column.clone());
            }
            row.insert(column, value);
        }

        let geolocation = row.remove(FIELD_GEOLOCATION).unwrap_or(Value::Null);
        let (lat, lon) = split_geolocation(&geolocation);
        row.insert(
            COL_LATITUDE.to_string(),
            lat.map_or(Value::Null, |v| Value::from(v)),
        );
        row.insert(
            COL_LONGITUDE.to_string(),
            lon.map_or(Value::Null, |v| Value::from(v)),
        );

        rows.push(row);
    }

    columns.push(COL_LATITUDE.to_string());
    columns.push(COL_LONGITUDE.to_string());

    Table { columns, rows }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
