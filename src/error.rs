use std::path::PathBuf;

use thiserror::Error;

/// Problems with the shape of the uploaded or selected export. These are the
/// user's to fix; none of them is retried.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Cannot find '{}'. Please check the file location.", .0.display())]
    NotFound(PathBuf),

    #[error("Unable to read Excel file. Please ensure it's not corrupted and has the correct format. Details: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("Excel file contains no worksheets")]
    NoWorksheet,

    #[error("Excel file has no column headers on row {row}")]
    MissingHeader { row: u32 },

    #[error("Excel file is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Invalid deployment configuration. Raised once at startup, never per row.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read deployment file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid deployment file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("deployment has no account id")]
    MissingAccount,

    #[error("customer registry has no entry for the fallback customer '{0}'")]
    MissingFallback(String),

    #[error("customer registry has no entry for '{0}'")]
    MissingCustomer(String),

    #[error("customer '{0}' has a blank identifier")]
    BlankIdentifier(String),

    #[error("customer names '{first}' and '{second}' collide after normalization")]
    DuplicateCustomer { first: String, second: String },
}

/// Failures of one run of the desktop tool.
#[derive(Error, Debug)]
pub enum DesktopError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("No valid order data found in the Excel file after filtering")]
    NoValidOrders,

    #[error("failed to write output file: {0}")]
    Output(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
