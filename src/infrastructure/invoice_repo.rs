use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::invoice::{Invoice, InvoiceChanges, InvoicePage, NewInvoice};
use crate::domain::ports::InvoiceRepository;
use crate::schema::invoices;

use super::models::{InvoiceChangesRow, InvoiceRow, NewInvoiceRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Persistence(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Persistence(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselInvoiceRepository {
    pool: DbPool,
}

impl DieselInvoiceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl InvoiceRepository for DieselInvoiceRepository {
    fn create(&self, invoice: NewInvoice) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        let id = diesel::insert_into(invoices::table)
            .values(NewInvoiceRow::from(&invoice))
            .returning(invoices::id)
            .get_result(&mut conn)?;

        Ok(id)
    }

    fn update(&self, id: Uuid, changes: InvoiceChanges) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let affected = diesel::update(invoices::table.filter(invoices::id.eq(id)))
            .set(InvoiceChangesRow::from(&changes))
            .execute(&mut conn)?;

        Ok(affected > 0)
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let affected =
            diesel::delete(invoices::table.filter(invoices::id.eq(id))).execute(&mut conn)?;

        Ok(affected > 0)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, DomainError> {
        let mut conn = self.pool.get()?;

        invoices::table
            .filter(invoices::id.eq(id))
            .select(InvoiceRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Invoice::try_from)
            .transpose()
    }

    fn list(&self, page: i64, limit: i64) -> Result<InvoicePage, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (page - 1).saturating_mul(limit);
        let total: i64 = invoices::table.count().get_result(&mut conn)?;

        let rows = invoices::table
            .select(InvoiceRow::as_select())
            .order((invoices::date.desc(), invoices::id.asc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)?;

        Ok(InvoicePage {
            items: rows
                .into_iter()
                .map(Invoice::try_from)
                .collect::<Result<_, _>>()?,
            total,
        })
    }
}
