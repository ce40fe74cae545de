use tracing::info;

use crate::classifier::{CustomerClassifier, Diagnostics, TracingDiagnostics};
use crate::error::ConfigError;
use crate::filter::{sanitize, FilterStats};
use crate::invoice::{project, InvoiceRow};
use crate::registry::Deployment;
use crate::spreadsheet::RawOrderRow;

/// Result of converting one sales export.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub invoices: Vec<InvoiceRow>,
    pub stats: FilterStats,
}

impl Conversion {
    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }
}

/// Raw order rows in, invoice rows out. Holds nothing that changes between
/// runs, so one instance serves every request.
#[derive(Debug)]
pub struct Converter<D = TracingDiagnostics> {
    classifier: CustomerClassifier<D>,
    account_id: String,
}

impl Converter<TracingDiagnostics> {
    pub fn for_deployment(deployment: &Deployment) -> Result<Self, ConfigError> {
        let classifier = CustomerClassifier::new(deployment.registry.clone(), TracingDiagnostics)?;
        Ok(Self::new(classifier, &deployment.account_id))
    }
}

impl<D: Diagnostics> Converter<D> {
    pub fn new(classifier: CustomerClassifier<D>, account_id: &str) -> Self {
        Self {
            classifier,
            account_id: account_id.to_string(),
        }
    }

    pub fn convert(&self, rows: &[RawOrderRow]) -> Conversion {
        let (orders, stats) = sanitize(rows);

        let invoices = orders
            .iter()
            .map(|order| {
                let customer = self.classifier.classify(&order.table_name);
                project(order, customer, &self.account_id)
            })
            .collect::<Vec<_>>();
        info!(invoices = invoices.len(), "mapped orders to invoices");

        Conversion { invoices, stats }
    }
}
