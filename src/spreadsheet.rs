//! Module that reads the point-of-sale "Sales Order Report" export.
//!
//! The export opens with a five row banner (outlet name, report period and so
//! on), has its column headers on row 6 and the orders below that. Footer rows
//! with day totals are kept here; dropping them is the row filter's job.

use std::io::{Read, Seek};
use std::path::Path;

use calamine::{open_workbook, open_workbook_from_rs, Data, Range, Reader, Xlsx};
use tracing::debug;

use crate::cell::CellValue;
use crate::error::ReportError;

/// Zero based sheet row holding the column headers.
pub const HEADER_ROW: u32 = 5;

pub const REQUIRED_COLUMNS: [&str; 5] = ["Order Id", "Order Date", "Bill No", "Table Name", "Total"];

/// One order line of the export, exactly as read.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOrderRow {
    pub order_id: CellValue,
    pub order_date: CellValue,
    pub bill_no: CellValue,
    pub table_name: CellValue,
    pub total: CellValue,
}

impl RawOrderRow {
    pub fn new(
        order_id: impl Into<CellValue>,
        order_date: impl Into<CellValue>,
        bill_no: impl Into<CellValue>,
        table_name: impl Into<CellValue>,
        total: impl Into<CellValue>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            order_date: order_date.into(),
            bill_no: bill_no.into(),
            table_name: table_name.into(),
            total: total.into(),
        }
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Empty),
        // The text parser understands ISO timestamps.
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        _ => CellValue::Empty,
    }
}

/// Positions of the required columns within a row.
struct Columns {
    order_id: usize,
    order_date: usize,
    bill_no: usize,
    table_name: usize,
    total: usize,
}

impl Columns {
    fn from_header(header: &[Data]) -> Result<Self, ReportError> {
        let positions = REQUIRED_COLUMNS.map(|name| {
            header
                .iter()
                .position(|cell| cell_value(cell).to_text().trim() == name)
        });

        let missing = REQUIRED_COLUMNS
            .iter()
            .zip(&positions)
            .filter(|(_, position)| position.is_none())
            .map(|(name, _)| name.to_string())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(ReportError::MissingColumns(missing));
        }

        let [order_id, order_date, bill_no, table_name, total] =
            positions.map(|position| position.unwrap_or_default());
        Ok(Self {
            order_id,
            order_date,
            bill_no,
            table_name,
            total,
        })
    }

    fn read(&self, row: &[Data]) -> RawOrderRow {
        let get = |i: usize| row.get(i).map(cell_value).unwrap_or(CellValue::Empty);
        RawOrderRow {
            order_id: get(self.order_id),
            order_date: get(self.order_date),
            bill_no: get(self.bill_no),
            table_name: get(self.table_name),
            total: get(self.total),
        }
    }
}

fn missing_header() -> ReportError {
    ReportError::MissingHeader { row: HEADER_ROW + 1 }
}

/// Splits the sheet into its header row and the data rows below it.
///
/// calamine trims leading empty rows off the range, so the header is located
/// relative to where the range actually starts.
fn header_and_rows<'a>(
    range: &'a Range<Data>,
) -> Result<(&'a [Data], impl Iterator<Item = &'a [Data]> + 'a), ReportError> {
    let (start_row, _) = range.start().ok_or_else(missing_header)?;
    let skip = HEADER_ROW.checked_sub(start_row).ok_or_else(missing_header)? as usize;

    let mut rows = range.rows().skip(skip);
    let header = rows.next().ok_or_else(missing_header)?;
    Ok((header, rows))
}

fn first_sheet<RS: Read + Seek>(wb: &mut Xlsx<RS>) -> Result<Range<Data>, ReportError> {
    wb.worksheet_range_at(0)
        .ok_or(ReportError::NoWorksheet)?
        .map_err(ReportError::from)
}

fn read_workbook<RS: Read + Seek>(mut wb: Xlsx<RS>) -> Result<Vec<RawOrderRow>, ReportError> {
    let range = first_sheet(&mut wb)?;
    let (header, rows) = header_and_rows(&range)?;
    let columns = Columns::from_header(header)?;

    let orders = rows.map(|row| columns.read(row)).collect::<Vec<_>>();
    debug!(rows = orders.len(), "read sales order report");
    Ok(orders)
}

/// Reads the export from any seekable source, e.g. an uploaded body wrapped in a `Cursor`.
pub fn read_orders<RS: Read + Seek>(reader: RS) -> Result<Vec<RawOrderRow>, ReportError> {
    let wb: Xlsx<_> = open_workbook_from_rs(reader)?;
    read_workbook(wb)
}

pub fn read_orders_from_path(path: &Path) -> Result<Vec<RawOrderRow>, ReportError> {
    let wb: Xlsx<_> = open_workbook(path)?;
    read_workbook(wb)
}

/// Checks the file is a readable workbook carrying every required column,
/// without converting any data rows.
pub fn validate_report(path: &Path) -> Result<(), ReportError> {
    if !path.exists() {
        return Err(ReportError::NotFound(path.to_path_buf()));
    }

    let mut wb: Xlsx<_> = open_workbook(path)?;
    let range = first_sheet(&mut wb)?;
    let (header, _) = header_and_rows(&range)?;
    Columns::from_header(header).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn header_lookup_reports_all_missing_columns() {
        let header = [text("Order Id"), text("Bill No"), text("Amount")];
        match Columns::from_header(&header) {
            Err(ReportError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["Order Date", "Table Name", "Total"])
            }
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("expected missing columns"),
        }
    }

    #[test]
    fn columns_are_found_in_any_order() {
        let header = [
            text("Total"),
            text(" Table Name "),
            text("Customer"),
            text("Bill No"),
            text("Order Date"),
            text("Order Id"),
        ];
        let columns = Columns::from_header(&header).unwrap();
        let row = [
            Data::Float(250.0),
            text("OD"),
            Data::Empty,
            Data::Int(77),
            text("01/02/2024"),
            text("A-9"),
        ];

        assert_eq!(
            columns.read(&row),
            RawOrderRow::new("A-9", "01/02/2024", 77.0, "OD", 250.0)
        );
    }

    #[test]
    fn short_rows_read_as_empty() {
        let header = REQUIRED_COLUMNS.map(text);
        let columns = Columns::from_header(&header).unwrap();
        let row = columns.read(&[text("1")]);
        assert_eq!(row.order_id, CellValue::from("1"));
        assert_eq!(row.total, CellValue::Empty);
    }

    #[test]
    fn error_cells_are_empty() {
        assert_eq!(
            cell_value(&Data::Error(calamine::CellErrorType::Div0)),
            CellValue::Empty
        );
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::Bool(true));
    }
}
