//! Form actions for the invoices table.
//!
//! Each action validates submitted fields, performs one write through the
//! [`InvoiceStore`] and, on success, invalidates the invoice listing and
//! answers with [`ActionOutcome::Redirect`]. Every other result comes back as
//! a [`FormState`] for the form to render again.

pub mod cache;
pub mod schema;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{Config, DEFAULT_INVOICES_PATH};
use crate::db::InvoiceStore;
use crate::error::ActionError;
use crate::models::{InvoiceChanges, NewInvoice};

use cache::CacheInvalidator;
use schema::{FieldErrors, FormData, CREATE_INVOICE, UPDATE_INVOICE};

/// What the form renders after a failed submission
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    pub message: Option<String>,
}

impl FormState {
    fn message(message: &str) -> Self {
        FormState {
            errors: None,
            message: Some(message.to_string()),
        }
    }

    fn invalid(errors: FieldErrors, message: &str) -> Self {
        FormState {
            errors: Some(errors),
            message: Some(message.to_string()),
        }
    }
}

/// Result of a form action.
///
/// `Redirect` is terminal: the action has finished all of its work and the
/// caller navigates to the path.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Redirect(String),
    StateUpdate(FormState),
}

pub struct InvoiceActions {
    store: Arc<dyn InvoiceStore>,
    cache: Arc<dyn CacheInvalidator>,
    invoices_path: String,
    delete_enabled: bool,
    today: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl InvoiceActions {
    pub fn new(store: Arc<dyn InvoiceStore>, cache: Arc<dyn CacheInvalidator>) -> Self {
        Self {
            store,
            cache,
            invoices_path: DEFAULT_INVOICES_PATH.to_string(),
            delete_enabled: false,
            today: utc_today,
        }
    }

    pub fn from_config(
        config: &Config,
        store: Arc<dyn InvoiceStore>,
        cache: Arc<dyn CacheInvalidator>,
    ) -> Self {
        Self::new(store, cache)
            .with_invoices_path(&config.invoices_path)
            .with_delete_enabled(config.invoice_delete_enabled)
    }

    pub fn with_invoices_path(mut self, path: &str) -> Self {
        self.invoices_path = path.to_string();
        self
    }

    pub fn with_delete_enabled(mut self, enabled: bool) -> Self {
        self.delete_enabled = enabled;
        self
    }

    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub async fn create_invoice(&self, _prev_state: &FormState, form: &FormData) -> ActionOutcome {
        let input = match CREATE_INVOICE.validate(form) {
            Ok(input) => input,
            Err(errors) => {
                warn!(fields = ?errors.fields().collect::<Vec<_>>(), "invalid invoice form");
                return ActionOutcome::StateUpdate(FormState::invalid(
                    errors,
                    "Missing Fields. Failed to Create Invoice.",
                ));
            }
        };

        // Unrounded: fractional cents are passed through to the store.
        let invoice = NewInvoice {
            customer_id: input.customer_id,
            amount_cents: input.amount * 100.0,
            status: input.status,
            date: (self.today)(),
        };

        if let Err(e) = self.store.insert_invoice(&invoice).await {
            error!(error = %e, customer_id = %invoice.customer_id, "failed to create invoice");
            return ActionOutcome::StateUpdate(FormState::message("Error while creating invoice"));
        }
        info!(
            customer_id = %invoice.customer_id,
            amount = invoice.amount_cents,
            status = %invoice.status,
            "invoice created"
        );

        self.refresh_listing()
    }

    pub async fn update_invoice(
        &self,
        id: &str,
        _prev_state: &FormState,
        form: &FormData,
    ) -> ActionOutcome {
        let input = match UPDATE_INVOICE.validate(form) {
            Ok(input) => input,
            Err(errors) => {
                warn!(id, fields = ?errors.fields().collect::<Vec<_>>(), "invalid invoice form");
                return ActionOutcome::StateUpdate(FormState::invalid(
                    errors,
                    "Missing Fields. Failed to Edit Invoice.",
                ));
            }
        };

        let amount_cents = (input.amount * 100.0).round() as i64;
        debug!(amount = input.amount, amount_cents, "converted amount to cents");

        let changes = InvoiceChanges {
            customer_id: input.customer_id,
            amount_cents,
            status: input.status,
        };

        if let Err(e) = self.store.update_invoice(id, &changes).await {
            error!(error = %e, id, "failed to update invoice");
            return ActionOutcome::StateUpdate(FormState::message(
                "Error while updating edited invoice",
            ));
        }
        info!(id, amount_cents, status = %changes.status, "invoice updated");

        self.refresh_listing()
    }

    /// Always fails unless deletion has been switched on explicitly.
    pub async fn delete_invoice(&self, id: &str) -> Result<ActionOutcome, ActionError> {
        if !self.delete_enabled {
            error!(id, "invoice deletion is disabled");
            return Err(ActionError::DeleteFailed);
        }

        match self.store.delete_invoice(id).await {
            Ok(()) => {
                info!(id, "invoice deleted");
                self.cache.revalidate_path(&self.invoices_path);
                Ok(ActionOutcome::StateUpdate(FormState::message("Invoice Deleted!")))
            }
            Err(e) => {
                error!(error = %e, id, "failed to delete invoice");
                Ok(ActionOutcome::StateUpdate(FormState::message(
                    "Error while deleting invoice",
                )))
            }
        }
    }

    fn refresh_listing(&self) -> ActionOutcome {
        self.cache.revalidate_path(&self.invoices_path);
        ActionOutcome::Redirect(self.invoices_path.clone())
    }
}
