use chrono::NaiveDate;
use tracing::info;

use crate::cell::CellValue;
use crate::spreadsheet::RawOrderRow;

/// An order row that passed every check, with its fields already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidOrder {
    pub order_id: String,
    pub order_date: NaiveDate,
    pub bill_no: String,
    pub table_name: CellValue,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub read: usize,
    pub retained: usize,
    pub removed: usize,
}

/// Parses a raw row, or `None` for summary lines and rows with missing or
/// malformed fields.
pub fn validate_row(row: &RawOrderRow) -> Option<ValidOrder> {
    let order_id = non_blank_text(&row.order_id)?;

    let total = row.total.as_number().filter(|total| *total != 0.0)?;
    let bill_no = non_blank_text(&row.bill_no)?;
    if row.table_name.is_blank() {
        return None;
    }
    let order_date = row.order_date.as_date()?;

    Some(ValidOrder {
        order_id,
        order_date,
        bill_no,
        table_name: row.table_name.clone(),
        total,
    })
}

fn non_blank_text(cell: &CellValue) -> Option<String> {
    let text = cell.to_text();
    (!text.trim().is_empty()).then_some(text)
}

/// Keeps the valid order rows, in input order.
pub fn sanitize(rows: &[RawOrderRow]) -> (Vec<ValidOrder>, FilterStats) {
    let orders = rows.iter().filter_map(validate_row).collect::<Vec<_>>();

    let stats = FilterStats {
        read: rows.len(),
        retained: orders.len(),
        removed: rows.len() - orders.len(),
    };
    info!(
        removed = stats.removed,
        retained = stats.retained,
        "sanitized sales order rows"
    );

    (orders, stats)
}
