use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use super::invoice::{to_cents, InvoiceChanges, InvoiceStatus, NewInvoice};

/// Raw form submission, exactly as the client posted it.
pub type FormData = HashMap<String, String>;

pub const CUSTOMER_ID_FIELD: &str = "customerId";
pub const AMOUNT_FIELD: &str = "amount";
pub const STATUS_FIELD: &str = "status";

/// Width of the `customer_id` column, in characters.
pub const CUSTOMER_ID_MAX_CHARS: usize = 255;

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A validated create/update submission. Any `id` or `date` in the raw form
/// is ignored: ids come from the route, dates from the server clock.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceForm {
    pub customer_id: String,
    pub amount: f64,
    pub status: InvoiceStatus,
}

impl InvoiceForm {
    /// Checks every field and reports all failures at once.
    pub fn parse(form: &FormData) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let customer_id = match form.get(CUSTOMER_ID_FIELD) {
            Some(value) if value.chars().count() > CUSTOMER_ID_MAX_CHARS => {
                errors.add(
                    CUSTOMER_ID_FIELD,
                    format!(
                        "String must contain at most {} character(s)",
                        CUSTOMER_ID_MAX_CHARS
                    ),
                );
                None
            }
            Some(value) => Some(value.clone()),
            None => {
                errors.add(CUSTOMER_ID_FIELD, "Required");
                None
            }
        };

        let amount = match coerce_number(form.get(AMOUNT_FIELD).map(String::as_str)) {
            Some(amount) if to_cents(amount).is_some() => Some(amount),
            Some(_) => {
                errors.add(AMOUNT_FIELD, "Amount is out of range");
                None
            }
            None => {
                errors.add(AMOUNT_FIELD, "Expected number, received nan");
                None
            }
        };

        let status = match form.get(STATUS_FIELD) {
            Some(value) => match value.parse::<InvoiceStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.add(
                        STATUS_FIELD,
                        format!(
                            "Invalid enum value. Expected 'pending' | 'paid', received '{}'",
                            value
                        ),
                    );
                    None
                }
            },
            None => {
                errors.add(STATUS_FIELD, "Required");
                None
            }
        };

        match (customer_id, amount, status) {
            (Some(customer_id), Some(amount), Some(status)) => Ok(Self {
                customer_id,
                amount,
                status,
            }),
            _ => Err(errors),
        }
    }

    pub fn amount_in_cents(&self) -> i32 {
        // `parse` only admits amounts whose cents fit the column.
        to_cents(self.amount).unwrap_or_default()
    }

    pub fn into_new_invoice(self, date: chrono::NaiveDate) -> NewInvoice {
        NewInvoice {
            amount: self.amount_in_cents(),
            customer_id: self.customer_id,
            status: self.status,
            date,
        }
    }

    pub fn into_changes(self) -> InvoiceChanges {
        InvoiceChanges {
            amount: self.amount_in_cents(),
            customer_id: self.customer_id,
            status: self.status,
        }
    }
}

/// Numeric coercion of a form value: blank or absent means zero, anything
/// else must be a finite decimal number.
fn coerce_number(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw.unwrap_or("").trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
