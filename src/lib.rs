//! Turns the point-of-sale daily sales export into a sales invoice import file.
//!
//! The flow is the same for both front ends:
//! [`spreadsheet`] reads the export, [`filter`] drops summary and broken rows,
//! [`classifier`] picks the customer for each order, [`invoice`] lays the
//! order out as a single-line invoice and [`output`] writes the CSV.

pub mod cell;
pub mod classifier;
pub mod desktop;
pub mod error;
pub mod filter;
pub mod invoice;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod server;
pub mod spreadsheet;

pub use cell::CellValue;
pub use classifier::{CustomerClassifier, Diagnostics, FallbackReason, TracingDiagnostics};
pub use error::{ConfigError, DesktopError, ReportError};
pub use filter::{FilterStats, ValidOrder};
pub use invoice::{InvoiceRow, COLUMN_COUNT, INVOICE_COLUMNS};
pub use pipeline::{Conversion, Converter};
pub use registry::{CustomerRegistry, Deployment, DeploymentConfig};
pub use spreadsheet::RawOrderRow;
