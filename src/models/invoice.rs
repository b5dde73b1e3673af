use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Billing state of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            _ => Err(()),
        }
    }
}

/// A stored invoice row
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    pub amount: i32,
    pub status: String,
    pub date: NaiveDate,
}

/// Row values for an insert.
///
/// `amount_cents` is the raw dollars×100 product and may carry a fraction;
/// the integer column's assignment cast decides what is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub customer_id: String,
    pub amount_cents: f64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Columns an update may change. The creation date is never part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceChanges {
    pub customer_id: String,
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}
