//! In-memory invoice store for tests and local runs without Postgres.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::invoice::{Invoice, InvoiceChanges, InvoicePage, NewInvoice};
use crate::domain::ports::InvoiceRepository;

/// Cloning shares the underlying rows.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceRepository {
    invoices: Arc<RwLock<HashMap<Uuid, Invoice>>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts rows even behind a poisoned lock; a panicked writer does not
    /// make the store look empty.
    pub fn len(&self) -> usize {
        self.invoices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> DomainError {
    DomainError::Persistence(format!("invoice store lock poisoned: {}", e))
}

impl InvoiceRepository for InMemoryInvoiceRepository {
    fn create(&self, invoice: NewInvoice) -> Result<Uuid, DomainError> {
        let mut rows = self.invoices.write().map_err(lock_error)?;
        let id = Uuid::new_v4();
        rows.insert(
            id,
            Invoice {
                id,
                customer_id: invoice.customer_id,
                amount: invoice.amount,
                status: invoice.status,
                date: invoice.date,
            },
        );
        Ok(id)
    }

    fn update(&self, id: Uuid, changes: InvoiceChanges) -> Result<bool, DomainError> {
        let mut rows = self.invoices.write().map_err(lock_error)?;
        let Some(row) = rows.get_mut(&id) else {
            return Ok(false);
        };
        row.customer_id = changes.customer_id;
        row.amount = changes.amount;
        row.status = changes.status;
        Ok(true)
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut rows = self.invoices.write().map_err(lock_error)?;
        Ok(rows.remove(&id).is_some())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, DomainError> {
        let rows = self.invoices.read().map_err(lock_error)?;
        Ok(rows.get(&id).cloned())
    }

    fn list(&self, page: i64, limit: i64) -> Result<InvoicePage, DomainError> {
        let rows = self.invoices.read().map_err(lock_error)?;

        let mut items: Vec<Invoice> = rows.values().cloned().collect();
        items.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));

        let total = items.len() as i64;
        let offset = (page - 1).saturating_mul(limit).max(0) as usize;
        let items = items
            .into_iter()
            .skip(offset)
            .take(limit.max(0) as usize)
            .collect();

        Ok(InvoicePage { items, total })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate};

    use super::*;
    use crate::domain::invoice::InvoiceStatus;

    fn new_invoice(day: u32) -> NewInvoice {
        NewInvoice {
            customer_id: format!("cust_{day}"),
            amount: 100,
            status: InvoiceStatus::Pending,
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        }
    }

    #[test]
    fn list_orders_by_date_descending_and_paginates() {
        let repo = InMemoryInvoiceRepository::new();
        for day in 1..=5 {
            repo.create(new_invoice(day)).unwrap();
        }

        let first = repo.list(1, 2).unwrap();
        assert_eq!(first.total, 5);
        let days: Vec<u32> = first.items.iter().map(|i| i.date.day()).collect();
        assert_eq!(days, vec![5, 4]);

        let last = repo.list(3, 2).unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].customer_id, "cust_1");
    }

    #[test]
    fn update_and_delete_report_whether_a_row_matched() {
        let repo = InMemoryInvoiceRepository::new();
        let id = repo.create(new_invoice(1)).unwrap();
        let changes = InvoiceChanges {
            customer_id: "cust_9".to_string(),
            amount: 1,
            status: InvoiceStatus::Paid,
        };

        assert!(repo.update(id, changes.clone()).unwrap());
        assert!(!repo.update(Uuid::new_v4(), changes).unwrap());
        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert!(repo.is_empty());
    }

    #[test]
    fn huge_page_number_yields_an_empty_page() {
        let repo = InMemoryInvoiceRepository::new();
        repo.create(new_invoice(1)).unwrap();

        let page = repo.list(i64::MAX, 100).unwrap();
        assert_eq!(page.total, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn len_counts_rows_behind_a_poisoned_lock() {
        let repo = InMemoryInvoiceRepository::new();
        repo.create(new_invoice(1)).unwrap();

        let writer = repo.clone();
        let joined = std::thread::spawn(move || {
            let _guard = writer.invoices.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(joined.is_err());

        assert_eq!(repo.len(), 1);
        assert!(!repo.is_empty());
        assert!(matches!(
            repo.find_by_id(Uuid::new_v4()),
            Err(DomainError::Persistence(_))
        ));
    }
}
