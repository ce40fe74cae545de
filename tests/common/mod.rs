#![allow(dead_code)]

use rust_xlsxwriter::{Format, Workbook};

use matsya_invoices::{Converter, Deployment};

pub const WALK_INS: &str = "4947c933-8e0e-4158-8cf0-336ccfa1a540";
pub const ROOM_3: &str = "3c2efa29-cf72-4944-aa67-1a170c135c00";
pub const ACCOUNT: &str = "70d82aaf-788e-4c20-8b41-708e719b2daf";

pub const HEADER: [&str; 5] = ["Order Id", "Order Date", "Bill No", "Table Name", "Total"];

pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    /// Excel serial date, written with a date number format.
    Date(f64),
    Empty,
}

/// Serial of 5 March 2024.
pub const MARCH_5_2024: f64 = 45356.0;

pub fn converter() -> Converter {
    Converter::for_deployment(&Deployment::builtin().unwrap()).unwrap()
}

/// Builds a workbook laid out like the point-of-sale export: a banner,
/// the header row at `header_row` and the data rows below it.
pub fn workbook(banner: &[&str], header_row: u32, header: &[&str], rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut wb = Workbook::new();
    let sheet = wb.add_worksheet();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");

    for (i, line) in banner.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        sheet.write_string(i as u32, 0, *line).unwrap();
    }
    for (col, name) in header.iter().enumerate() {
        sheet.write_string(header_row, col as u16, *name).unwrap();
    }
    for (i, row) in rows.iter().enumerate() {
        let r = header_row + 1 + i as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(r, col, *s).unwrap();
                }
                Cell::Number(n) => {
                    sheet.write_number(r, col, *n).unwrap();
                }
                Cell::Date(serial) => {
                    sheet.write_number_with_format(r, col, *serial, &date_format).unwrap();
                }
                Cell::Empty => {}
            }
        }
    }

    wb.save_to_buffer().unwrap()
}

/// A typical export: banner, header on row 6, orders and a totals footer.
pub fn sales_report(rows: &[Vec<Cell>]) -> Vec<u8> {
    workbook(
        &[
            "Sales Order Report",
            "Outlet: Matsya",
            "From 05/03/2024 To 05/03/2024",
            "",
            "",
        ],
        5,
        &HEADER,
        rows,
    )
}

pub fn order<'a>(id: &'a str, date: &'a str, bill: &'a str, table: &'a str, total: f64) -> Vec<Cell<'a>> {
    vec![
        Cell::Text(id),
        Cell::Text(date),
        Cell::Text(bill),
        Cell::Text(table),
        Cell::Number(total),
    ]
}

pub fn footer<'a>(total: f64) -> Vec<Cell<'a>> {
    vec![Cell::Empty, Cell::Empty, Cell::Empty, Cell::Text("Total"), Cell::Number(total)]
}

pub fn parse_csv(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_reader(bytes);
    let headers = rdr.headers().unwrap().iter().map(String::from).collect();
    let records = rdr
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, records)
}
