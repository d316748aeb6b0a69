use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::invoice::{today, Invoice, InvoicePage};
use crate::domain::ports::{CacheInvalidator, InvoiceRepository, Navigator};
use crate::domain::validation::{FormData, InvoiceForm};

/// Listing page shown after every mutation; also the cache key it is
/// rendered under.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

pub struct InvoiceService<R, C, N> {
    repo: R,
    cache: Arc<C>,
    navigator: N,
}

impl<R, C, N> InvoiceService<R, C, N>
where
    R: InvoiceRepository,
    C: CacheInvalidator,
    N: Navigator,
{
    pub fn new(repo: R, cache: Arc<C>, navigator: N) -> Self {
        Self {
            repo,
            cache,
            navigator,
        }
    }

    /// Validates the form, stamps today's date and inserts a row.
    ///
    /// Nothing is written, invalidated or redirected when validation fails.
    pub fn create_invoice(&self, form: &FormData) -> Result<N::Redirect, DomainError> {
        let new_invoice = InvoiceForm::parse(form)?.into_new_invoice(today());

        let id = self.repo.create(new_invoice)?;
        log::info!("Created invoice {}", id);

        self.cache.invalidate(INVOICES_PATH);
        Ok(self.navigator.redirect_to(INVOICES_PATH))
    }

    /// Replaces customer, amount and status of `id`. The creation date is
    /// never touched. An id that matches no row yields `DomainError::NotFound`.
    pub fn update_invoice(&self, id: Uuid, form: &FormData) -> Result<N::Redirect, DomainError> {
        let changes = InvoiceForm::parse(form)?.into_changes();

        if !self.repo.update(id, changes)? {
            return Err(DomainError::NotFound);
        }
        log::info!("Updated invoice {}", id);

        self.cache.invalidate(INVOICES_PATH);
        Ok(self.navigator.redirect_to(INVOICES_PATH))
    }

    /// Deleting an unknown id is not an error; the listing is invalidated
    /// either way.
    pub fn delete_invoice(&self, id: Uuid) -> Result<(), DomainError> {
        if self.repo.delete(id)? {
            log::info!("Deleted invoice {}", id);
        } else {
            log::debug!("Delete of invoice {} matched no row", id);
        }

        self.cache.invalidate(INVOICES_PATH);
        Ok(())
    }

    pub fn get_invoice(&self, id: Uuid) -> Result<Option<Invoice>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn list_invoices(&self, page: i64, limit: i64) -> Result<InvoicePage, DomainError> {
        self.repo.list(page, limit)
    }
}
