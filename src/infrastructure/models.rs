use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::invoice::{Invoice, InvoiceChanges, NewInvoice};
use crate::schema::invoices;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InvoiceRow {
    pub id: Uuid,
    pub customer_id: String,
    pub amount: i32,
    pub status: String,
    pub date: NaiveDate,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DomainError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| DomainError::Persistence(format!("invoice {}: {}", row.id, e)))?;
        Ok(Invoice {
            id: row.id,
            customer_id: row.customer_id,
            amount: row.amount,
            status,
            date: row.date,
        })
    }
}

/// `id` is left to the column default.
#[derive(Debug, Insertable)]
#[diesel(table_name = invoices)]
pub struct NewInvoiceRow<'a> {
    pub customer_id: &'a str,
    pub amount: i32,
    pub status: &'a str,
    pub date: NaiveDate,
}

impl<'a> From<&'a NewInvoice> for NewInvoiceRow<'a> {
    fn from(invoice: &'a NewInvoice) -> Self {
        Self {
            customer_id: &invoice.customer_id,
            amount: invoice.amount,
            status: invoice.status.as_str(),
            date: invoice.date,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = invoices)]
pub struct InvoiceChangesRow<'a> {
    pub customer_id: &'a str,
    pub amount: i32,
    pub status: &'a str,
}

impl<'a> From<&'a InvoiceChanges> for InvoiceChangesRow<'a> {
    fn from(changes: &'a InvoiceChanges) -> Self {
        Self {
            customer_id: &changes.customer_id,
            amount: changes.amount,
            status: changes.status.as_str(),
        }
    }
}
