use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 2] = [InvoiceStatus::Pending, InvoiceStatus::Paid];

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

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown invoice status '{0}'")]
pub struct UnknownStatus(pub String);

/// Exact, case-sensitive match: `"Paid"` is not a status.
impl FromStr for InvoiceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InvoiceStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: String,
    /// Minor units (cents).
    pub amount: i32,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Values for a fresh row. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub customer_id: String,
    pub amount: i32,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// The columns an update may touch; never `id` or `date`.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceChanges {
    pub customer_id: String,
    pub amount: i32,
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone)]
pub struct InvoicePage {
    pub items: Vec<Invoice>,
    pub total: i64,
}

/// Converts a major-unit amount to integer cents, `None` when the result does
/// not fit the `amount` column.
pub fn to_cents(amount: f64) -> Option<i32> {
    let cents = (amount * 100.0).round();
    if cents.is_finite() && cents >= i32::MIN as f64 && cents <= i32::MAX as f64 {
        Some(cents as i32)
    } else {
        None
    }
}

/// Creation date stamp, always taken from the UTC clock.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
