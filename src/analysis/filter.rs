//! Emergency-type filtering.
//!
//! The filter selection drives both the displayed table and the CSV
//! export. `All` is the sentinel for "no filtering" and is the default
//! when the selection is missing.

use crate::model::{FIELD_EMERGENCY_TYPE, Row, Table, cell_text};

/// Label of the sentinel option.
pub const ALL_LABEL: &str = "All";

/// The dashboard's category filter, bound to `Emergency_Type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmergencyFilter {
    /// No filtering — the identity over the table.
    All,
    /// Keep only rows whose emergency type equals the given value.
    Only(String),
}

impl EmergencyFilter {
    /// Interpret a query-string selection. Missing, empty, and `All`
    /// selections all mean no filtering.
    pub fn from_param(param: Option<&str>) -> EmergencyFilter {
        match param {
            None => EmergencyFilter::All,
            Some(s) if s.is_empty() || s == ALL_LABEL => EmergencyFilter::All,
            Some(s) => EmergencyFilter::Only(s.to_string()),
        }
    }

    /// The option label this selection corresponds to in the filter control.
    pub fn label(&self) -> &str {
        match self {
            EmergencyFilter::All => ALL_LABEL,
            EmergencyFilter::Only(value) => value,
        }
    }

    fn matches(&self, row: &Row) -> bool {
        match self {
            EmergencyFilter::All => true,
            EmergencyFilter::Only(value) => Table::cell(row, FIELD_EMERGENCY_TYPE)
                .map(|v| cell_text(v) == *value)
                .unwrap_or(false),
        }
    }
}

/// Derive the filtered view. `All` returns the table unchanged; a specific
/// category keeps only matching rows. Columns are preserved either way so
/// the CSV export of a filtered view has the full column set.
pub fn filter_rows(table: &Table, filter: &EmergencyFilter) -> Table {
    Table {
        columns: table.columns.clone(),
        rows: table
            .rows
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect(),
    }
}

/// Distinct non-null emergency types in first-seen order, for the filter
/// control's options.
pub fn emergency_types(rows: &[Row]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for row in rows {
        if let Some(value) = Table::cell(row, FIELD_EMERGENCY_TYPE) {
            let label = cell_text(value);
            if !types.contains(&label) {
                types.push(label);
            }
        }
    }
    types
}
