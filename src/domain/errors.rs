use thiserror::Error;

use super::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invoice not found")]
    NotFound,
    #[error("Invalid invoice form: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Persistence error: {0}")]
    Persistence(String),
}
