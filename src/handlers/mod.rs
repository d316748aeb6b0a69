pub mod invoices;
pub mod navigation;
