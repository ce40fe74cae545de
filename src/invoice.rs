//! The sales invoice import layout of the accounting system.
//!
//! Every order becomes one invoice with a single line. Apart from the date,
//! reference, customer, account and price, each column is either a fixed
//! setting or left blank.

use chrono::NaiveDate;

use crate::cell::format_number;
use crate::filter::ValidOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    IssueDate,
    Reference,
    Customer,
    Account,
    UnitPrice,
    Text(&'static str),
    Flag(bool),
    Blank,
}

pub const COLUMN_COUNT: usize = 66;

const SCHEMA: [(&str, Field); COLUMN_COUNT] = [
    ("IssueDate", Field::IssueDate),
    ("DueDate", Field::Blank),
    ("DueDateDays", Field::Blank),
    ("DueDateDate", Field::Blank),
    ("Reference", Field::Reference),
    ("QuoteNumber", Field::Blank),
    ("OrderNumber", Field::Blank),
    ("Customer", Field::Customer),
    ("SalesQuote", Field::Blank),
    ("SalesOrder", Field::Blank),
    ("BillingAddress", Field::Blank),
    ("ExchangeRate", Field::Blank),
    ("ExchangeRateIsInverse", Field::Flag(false)),
    ("Description", Field::Text("Daily Sales")),
    ("Lines.1.Item", Field::Blank),
    ("Lines.1.Account", Field::Account),
    ("Lines.1.CapitalAccount", Field::Blank),
    ("Lines.1.SubAccount", Field::Blank),
    ("Lines.1.SpecialAccount", Field::Blank),
    ("Lines.1.FixedAsset", Field::Blank),
    ("Lines.1.IntangibleAsset", Field::Blank),
    ("Lines.1.LineDescription", Field::Blank),
    ("Lines.1.Qty", Field::Blank),
    ("Lines.1.SalesUnitPrice", Field::UnitPrice),
    ("Lines.1.CurrencyAmount", Field::Blank),
    ("Lines.1.DiscountPercentage", Field::Blank),
    ("Lines.1.DiscountAmount", Field::Blank),
    ("Lines.1.TaxCode", Field::Blank),
    ("Lines.1.Project", Field::Blank),
    ("Lines.1.Division", Field::Blank),
    ("HasLineNumber", Field::Flag(false)),
    ("HasLineDescription", Field::Flag(false)),
    ("Discount", Field::Flag(false)),
    ("DiscountType", Field::Text("Percentage")),
    ("AmountsIncludeTax", Field::Flag(false)),
    ("Rounding", Field::Flag(false)),
    ("RoundingMethod", Field::Text("None")),
    ("WithholdingTax", Field::Flag(false)),
    ("WithholdingTaxType", Field::Text("Rate")),
    ("WithholdingTaxPercentage", Field::Blank),
    ("WithholdingTaxAmount", Field::Blank),
    ("EarlyPaymentDiscount", Field::Flag(false)),
    ("EarlyPaymentDiscountType", Field::Text("Percentage")),
    ("EarlyPaymentDiscountRate", Field::Blank),
    ("EarlyPaymentDiscountAmount", Field::Blank),
    ("EarlyPaymentDiscountDays", Field::Blank),
    ("LatePaymentFees", Field::Flag(false)),
    ("LatePaymentFeesPercentage", Field::Blank),
    ("TotalAmountInWords", Field::Flag(false)),
    ("TotalAmountInBaseCurrency", Field::Flag(false)),
    ("Bilingual", Field::Flag(false)),
    ("HasSalesInvoiceCustomTitle", Field::Flag(true)),
    ("SalesInvoiceCustomTitle", Field::Text("Invoice")),
    ("HasSalesInvoiceCustomTheme", Field::Flag(false)),
    ("SalesInvoiceCustomTheme", Field::Blank),
    ("AutomaticReference", Field::Flag(false)),
    ("HideDueDate", Field::Flag(false)),
    ("HideBalanceDue", Field::Flag(false)),
    ("ClosedInvoice", Field::Flag(false)),
    ("ShowItemImages", Field::Flag(false)),
    ("ShowTaxAmountColumn", Field::Flag(false)),
    ("AlsoActsAsDeliveryNote", Field::Flag(false)),
    ("SalesInventoryLocation", Field::Blank),
    ("HasSalesInvoiceFooters", Field::Flag(false)),
    ("HasRelay", Field::Flag(false)),
    ("Relay", Field::Blank),
];

const fn column_names() -> [&'static str; COLUMN_COUNT] {
    let mut names = [""; COLUMN_COUNT];
    let mut i = 0;
    while i < COLUMN_COUNT {
        names[i] = SCHEMA[i].0;
        i += 1;
    }
    names
}

/// Header row of the import file, in order.
pub const INVOICE_COLUMNS: [&str; COLUMN_COUNT] = column_names();

/// One single-line sales invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRow {
    pub issue_date: NaiveDate,
    pub reference: String,
    pub customer: String,
    pub account: String,
    pub unit_price: f64,
}

impl InvoiceRow {
    fn render(&self, field: Field) -> String {
        match field {
            Field::IssueDate => self.issue_date.format("%Y-%m-%d").to_string(),
            Field::Reference => self.reference.clone(),
            Field::Customer => self.customer.clone(),
            Field::Account => self.account.clone(),
            Field::UnitPrice => format_number(self.unit_price),
            Field::Text(text) => text.to_string(),
            Field::Flag(true) => "True".to_string(),
            Field::Flag(false) => "False".to_string(),
            Field::Blank => String::new(),
        }
    }

    /// Value of the named column, or `None` for a column outside the layout.
    pub fn value(&self, column: &str) -> Option<String> {
        SCHEMA
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, field)| self.render(*field))
    }

    /// All values, in column order.
    pub fn record(&self) -> Vec<String> {
        SCHEMA.iter().map(|(_, field)| self.render(*field)).collect()
    }
}

pub fn project(order: &ValidOrder, customer_id: &str, account_id: &str) -> InvoiceRow {
    InvoiceRow {
        issue_date: order.order_date,
        reference: order.bill_no.clone(),
        customer: customer_id.to_string(),
        account: account_id.to_string(),
        unit_price: order.total,
    }
}
