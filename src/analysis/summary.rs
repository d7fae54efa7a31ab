//! Summary statistics and grouped tallies.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use crate::model::{FIELD_DATE, Row, Table, cell_text};
use crate::normalize::coerce_count;

// ---------------------------------------------------------------------------
// Scalar summaries
// ---------------------------------------------------------------------------

/// Row count of the (possibly filtered) view.
pub fn count(rows: &[Row]) -> usize {
    rows.len()
}

/// Sum of a declared-numeric field across rows.
///
/// Unparsable, missing, and null cells contribute zero, so the sum is
/// invariant to the presence of junk values.
pub fn sum_numeric(rows: &[Row], field: &str) -> f64 {
    rows.iter()
        .filter_map(|row| Table::cell(row, field))
        .map(coerce_count)
        .sum()
}

/// Number of unique non-null values of a field.
pub fn distinct(rows: &[Row], field: &str) -> usize {
    let mut seen = HashSet::new();
    for row in rows {
        if let Some(value) = Table::cell(row, field) {
            seen.insert(cell_text(value));
        }
    }
    seen.len()
}

// ---------------------------------------------------------------------------
// Grouped tallies
// ---------------------------------------------------------------------------

/// Tally rows by the value of a field, substituting `default_label` for
/// absent/null values so the counts always sum to the row count.
///
/// Returned in descending count order for chart rendering; equal counts
/// are broken by label so the order is deterministic.
pub fn group_tally(rows: &[Row], field: &str, default_label: &str) -> Vec<(String, u64)> {
    let mut tally: HashMap<String, u64> = HashMap::new();
    for row in rows {
        let label = match Table::cell(row, field) {
            Some(value) => cell_text(value),
            None => default_label.to_string(),
        };
        *tally.entry(label).or_insert(0) += 1;
    }

    let mut ordered: Vec<(String, u64)> = tally.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ordered
}

/// Sum a numeric field per category, restricted to rows where both fields
/// are present. Feeds the victims-by-emergency-type chart.
///
/// Ordered descending by total, ties broken by label.
pub fn sum_by_category(rows: &[Row], category_field: &str, value_field: &str) -> Vec<(String, f64)> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for row in rows {
        let (Some(category), Some(value)) = (
            Table::cell(row, category_field),
            Table::cell(row, value_field),
        ) else {
            continue;
        };
        *totals.entry(cell_text(category)).or_insert(0.0) += coerce_count(value);
    }

    let mut ordered: Vec<(String, f64)> = totals.into_iter().collect();
    ordered.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ordered
}

// ---------------------------------------------------------------------------
// Date bounds
// ---------------------------------------------------------------------------

/// Minimum and maximum parsed submission dates, bounding the dashboard's
/// date inputs. Unparsable and missing dates are ignored; `None` when no
/// row carries a parseable date.
pub fn date_bounds(rows: &[Row]) -> Option<(NaiveDate, NaiveDate)> {
    let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
    for row in rows {
        let Some(value) = Table::cell(row, FIELD_DATE) else {
            continue;
        };
        let Some(date) = parse_date(&cell_text(value)) else {
            continue;
        };
        bounds = Some(match bounds {
            None => (date, date),
            Some((min, max)) => (min.min(date), max.max(date)),
        });
    }
    bounds
}

/// Parse a submission date. The form service emits ISO calendar dates;
/// datetime strings are accepted by reading their date prefix.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    text.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
