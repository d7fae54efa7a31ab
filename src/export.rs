//! CSV export of the filtered table view.
//!
//! The export mirrors the displayed table exactly: same column set, same
//! row order, raw submitted values. Parsing the output back yields a table
//! with the same row count and column set as the view that produced it.

use std::io;

use crate::model::{Table, cell_text};

/// Serialize a table view as CSV.
///
/// The header row is the table's column list; cells for absent or null
/// values are empty. Quoting of embedded separators and quotes is handled
/// by the writer.
pub fn to_csv(table: &Table) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;

    for row in &table.rows {
        let record: Vec<String> = table
            .columns
            .iter()
            .map(|column| row.get(column).map(cell_text).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| csv::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
}
