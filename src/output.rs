use std::io;

use chrono::NaiveDateTime;

use crate::invoice::{InvoiceRow, INVOICE_COLUMNS};

/// Writes the import file: header row, then one record per invoice. An empty
/// slice still produces the header.
pub fn write_invoices<W: io::Write>(writer: W, invoices: &[InvoiceRow]) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(INVOICE_COLUMNS)?;
    for invoice in invoices {
        wtr.write_record(invoice.record())?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn invoices_to_csv(invoices: &[InvoiceRow]) -> Result<Vec<u8>, csv::Error> {
    let mut buffer = Vec::new();
    write_invoices(&mut buffer, invoices)?;
    Ok(buffer)
}

/// `output_<YYYYMMDD_HHMMSS>.csv`
pub fn output_file_name(at: NaiveDateTime) -> String {
    format!("output_{}.csv", at.format("%Y%m%d_%H%M%S"))
}
