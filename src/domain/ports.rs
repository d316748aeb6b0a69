use uuid::Uuid;

use super::errors::DomainError;
use super::invoice::{Invoice, InvoiceChanges, InvoicePage, NewInvoice};

/// One statement per call; no call opens a transaction.
pub trait InvoiceRepository: Send + Sync + 'static {
    fn create(&self, invoice: NewInvoice) -> Result<Uuid, DomainError>;
    /// Returns whether a row matched `id`.
    fn update(&self, id: Uuid, changes: InvoiceChanges) -> Result<bool, DomainError>;
    /// Returns whether a row matched `id`.
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<InvoicePage, DomainError>;
}

/// Marks a cached rendered view as stale.
pub trait CacheInvalidator: Send + Sync + 'static {
    fn invalidate(&self, path: &str);
}

/// Produces the navigation instruction sent back after a successful form
/// submission.
pub trait Navigator: Send + Sync + 'static {
    type Redirect: Send + 'static;

    fn redirect_to(&self, path: &str) -> Self::Redirect;
}
