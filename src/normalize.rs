use crate::cell::CellValue;

const NBSP: char = '\u{00A0}';

/// Canonical form of a table or customer name: non-breaking spaces become
/// regular spaces and the edges are trimmed.
pub fn normalize_name(name: &str) -> String {
    name.replace(NBSP, " ").trim().to_string()
}

/// Same as [`normalize_name`] for any cell, using its textual form.
pub fn normalize_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(s) => normalize_name(s),
        other => normalize_name(&other.to_text()),
    }
}
