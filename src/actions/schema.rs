//! Invoice form schema.
//!
//! A single base schema declares every invoice field; the create and update
//! forms are derived from it by omitting `id` and `date`, which the database
//! and the create action fill in themselves.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::InvoiceStatus;

pub const CUSTOMER_MESSAGE: &str = "Please select a customer.";
pub const AMOUNT_MESSAGE: &str = "amount must be greater than zero.";
pub const AMOUNT_NAN_MESSAGE: &str = "Expected number, received nan";
pub const STATUS_MESSAGE: &str = "Please select an invoice status.";
pub const STRING_MESSAGE: &str = "Expected string, received null";

/// Submitted form fields, keyed by input name
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormData::new();
        for (name, value) in iter {
            form.insert(name, value);
        }
        form
    }
}

/// Fields known to the invoice schema, in reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Id,
    CustomerId,
    Amount,
    Status,
    Date,
}

impl Field {
    /// Name of the form input carrying this field
    pub fn input_name(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::CustomerId => "customerId",
            Field::Amount => "amount",
            Field::Status => "status",
            Field::Date => "date",
        }
    }
}

/// Messages per failing field
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: Field) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }
}

/// Form input that passed every rule of its schema
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInvoiceInput {
    pub customer_id: String,
    pub amount: f64,
    pub status: InvoiceStatus,
    /// Present only when the schema declares the field
    pub id: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct InvoiceSchema {
    omitted: &'static [Field],
}

/// Every invoice field
pub const FORM_SCHEMA: InvoiceSchema = InvoiceSchema { omitted: &[] };

pub const CREATE_INVOICE: InvoiceSchema = FORM_SCHEMA.omit(&[Field::Id, Field::Date]);

pub const UPDATE_INVOICE: InvoiceSchema = FORM_SCHEMA.omit(&[Field::Id, Field::Date]);

impl InvoiceSchema {
    pub const fn omit(self, fields: &'static [Field]) -> Self {
        InvoiceSchema { omitted: fields }
    }

    pub fn declares(&self, field: Field) -> bool {
        !self.omitted.contains(&field)
    }

    /// Check `form` against the schema, collecting every failing field
    pub fn validate(&self, form: &FormData) -> Result<ValidatedInvoiceInput, FieldErrors> {
        let mut errors = FieldErrors::default();

        let id = self.required_string(Field::Id, form, STRING_MESSAGE, &mut errors);
        let customer_id = form.get(Field::CustomerId.input_name());
        if customer_id.is_none() {
            errors.push(Field::CustomerId, CUSTOMER_MESSAGE);
        }

        let amount = coerce_number(form.get(Field::Amount.input_name()));
        if !amount.is_finite() {
            errors.push(Field::Amount, AMOUNT_NAN_MESSAGE);
        } else if amount <= 0.0 {
            errors.push(Field::Amount, AMOUNT_MESSAGE);
        }

        let status = form
            .get(Field::Status.input_name())
            .and_then(|raw| raw.parse::<InvoiceStatus>().ok());
        if status.is_none() {
            errors.push(Field::Status, STATUS_MESSAGE);
        }

        let date = self.required_string(Field::Date, form, STRING_MESSAGE, &mut errors);

        match (customer_id, status) {
            (Some(customer_id), Some(status)) if errors.is_empty() => Ok(ValidatedInvoiceInput {
                customer_id: customer_id.to_string(),
                amount,
                status,
                id,
                date,
            }),
            _ => Err(errors),
        }
    }

    fn required_string(
        &self,
        field: Field,
        form: &FormData,
        message: &str,
        errors: &mut FieldErrors,
    ) -> Option<String> {
        if !self.declares(field) {
            return None;
        }
        let value = form.get(field.input_name()).map(str::to_string);
        if value.is_none() {
            errors.push(field, message);
        }
        value
    }
}

/// Number coercion for form text: absent or blank input is zero and
/// anything unparsable is NaN.
fn coerce_number(raw: Option<&str>) -> f64 {
    match raw.map(str::trim) {
        None | Some("") => 0.0,
        Some(text) => text.parse::<f64>().unwrap_or(f64::NAN),
    }
}
