//! Core data types for the community emergency response dashboard.
//!
//! This module defines the shared domain model imported by all other modules.
//! It contains no logic beyond trivial accessors, no I/O, and no external
//! dependencies — only types and the canonical field names.

use serde_json::Value;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Form field names
// ---------------------------------------------------------------------------

/// Category of the reported emergency (flood, fire, ...). Absent on rows
/// that describe a resource rather than an incident.
pub const FIELD_EMERGENCY_TYPE: &str = "Emergency_Type";

/// Reporter status field shown in the status distribution chart.
pub const FIELD_STATUS: &str = "Status";

/// Category of a reported resource (shelter, clinic, ...).
pub const FIELD_RESOURCE_TYPE: &str = "Resource_Type";

/// Free-text area / resource location name.
pub const FIELD_LOCATION: &str = "Location_of_Resource";

/// Declared-numeric count fields. Values arrive as strings from the form
/// service and are coerced for summation only.
pub const FIELD_VICTIMS: &str = "Number_of_Victims";
pub const FIELD_DEATHS: &str = "Number_of_Deaths";

/// Submission date, ISO 8601 calendar date.
pub const FIELD_DATE: &str = "Date";

/// Compound `[latitude, longitude]` pair as submitted. Removed from the
/// table after being split into [`COL_LATITUDE`] and [`COL_LONGITUDE`].
pub const FIELD_GEOLOCATION: &str = "_geolocation";

/// Derived scalar coordinate columns, appended after flattening.
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";

// ---------------------------------------------------------------------------
// Presentation constants
// ---------------------------------------------------------------------------

/// Map center used when no submission carries a valid coordinate pair.
/// A fixed documented constant (central Benue State, Nigeria), not computed.
pub const DEFAULT_MAP_CENTER: (f64, f64) = (7.719421, 8.580176);

/// Label substituted for absent category values in grouped tallies.
pub const NOT_SPECIFIED: &str = "Not Specified";

/// Filename and MIME type for the table download action.
pub const CSV_FILENAME: &str = "emergency_data.csv";
pub const CSV_MIME: &str = "text/csv";

// ---------------------------------------------------------------------------
// Tabular model
// ---------------------------------------------------------------------------

/// One flattened submission: column name → raw JSON scalar.
///
/// Cells keep the value exactly as submitted (numbers-as-strings included)
/// so the displayed table and the CSV export preserve original values.
/// Missing columns are simply absent from the map.
pub type Row = HashMap<String, Value>;

/// The flattened, tabular view of all submissions.
///
/// `columns` is the union of all field names seen across submissions, in
/// first-seen order, with the compound geolocation field removed and the
/// derived coordinate columns appended last. `rows` follow fetch order.
///
/// A table is built once per session by `normalize::build_table` and never
/// mutated afterwards; filtered subsets are derived copies.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Cell accessor. `None` when the column is absent for this row or the
    /// stored value is JSON null.
    pub fn cell<'a>(row: &'a Row, column: &str) -> Option<&'a Value> {
        row.get(column).filter(|v| !v.is_null())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Display text for a cell, shared by the table renderer, the CSV export,
/// and tally labels: strings pass through unquoted, null is empty, and any
/// other JSON value (numbers, lists the flattener kept intact) renders as
/// compact JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Map markers
// ---------------------------------------------------------------------------

/// Whether a row describes an incident or an available resource.
///
/// A row with an `Emergency_Type` is an emergency even if it also names a
/// resource; only rows with a `Resource_Type` alone count as resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Emergency,
    Resource,
}

/// One map marker, derived from a row with a full coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub kind: MarkerKind,
    /// `Emergency_Type` if present, else `Resource_Type`, else empty.
    pub type_label: String,
    /// `Location_of_Resource`, empty when absent.
    pub area: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching submissions from the form service.
///
/// Fetch failures are fatal at startup — there is no retry or offline
/// fallback; a full re-fetch (process restart) is the only recovery.
#[derive(Debug)]
pub enum KoboError {
    /// The request never produced a usable response (DNS, TLS, timeout).
    Transport(String),
    /// The service rejected the API token (HTTP 401/403).
    Auth(u16),
    /// Any other non-2xx HTTP response.
    Http(u16),
    /// The response body could not be deserialized.
    Parse(String),
}

impl std::fmt::Display for KoboError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KoboError::Transport(msg) => write!(f, "transport error: {}", msg),
            KoboError::Auth(code) => write!(f, "authentication rejected (HTTP {})", code),
            KoboError::Http(code) => write!(f, "HTTP error: {}", code),
            KoboError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for KoboError {}
