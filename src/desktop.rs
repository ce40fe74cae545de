use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::info;

use crate::classifier::Diagnostics;
use crate::error::DesktopError;
use crate::output::{output_file_name, write_invoices};
use crate::pipeline::Converter;
use crate::spreadsheet::{read_orders_from_path, validate_report};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
    pub removed: usize,
    pub output_path: PathBuf,
}

/// Converts the export at `input` and writes the import file next to it.
///
/// Progress goes to `console`. Unlike the upload service, an export without a
/// single valid order is an error here: the user picked the file by hand and
/// an empty result almost always means the wrong one.
pub fn process_file<D: Diagnostics, W: Write>(
    input: &Path,
    converter: &Converter<D>,
    now: NaiveDateTime,
    console: &mut W,
) -> Result<Summary, DesktopError> {
    writeln!(console, "Validating input file...")?;
    validate_report(input)?;

    writeln!(console, "Reading Excel file...")?;
    let rows = read_orders_from_path(input)?;

    writeln!(console, "Sanitizing input data...")?;
    let conversion = converter.convert(&rows);
    writeln!(console, "Removed {} invalid/summary rows", conversion.stats.removed)?;
    writeln!(console, "Remaining valid order rows: {}", conversion.stats.retained)?;

    if conversion.is_empty() {
        return Err(DesktopError::NoValidOrders);
    }
    writeln!(console, "Processing {} records...", conversion.invoices.len())?;

    let file_name = output_file_name(now);
    let output_path = input
        .parent()
        .map(|dir| dir.join(&file_name))
        .unwrap_or_else(|| PathBuf::from(&file_name));

    writeln!(console, "Saving output to {}...", output_path.display())?;
    let file = File::create(&output_path)?;
    write_invoices(BufWriter::new(file), &conversion.invoices)?;
    info!(path = %output_path.display(), invoices = conversion.invoices.len(), "wrote invoice import");

    writeln!(console, "\nProcess completed successfully!")?;
    writeln!(console, "Total records processed: {}", conversion.invoices.len())?;
    writeln!(console, "Output file created: {file_name}")?;

    Ok(Summary {
        records: conversion.invoices.len(),
        removed: conversion.stats.removed,
        output_path,
    })
}
