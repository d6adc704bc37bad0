//! The conversion form as seen by the presentation layer.
//!
//! [`FormController`] composes the catalog synchronizer and the conversion
//! orchestrator. Every intent returns a freshly built [`FormView`]; an `Err`
//! means the intent was rejected and nothing changed.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

use crate::core::conversion::{ConversionOutcome, ConversionProvider, Direction};
use crate::core::currency::{CatalogProvider, Currency};
use crate::core::error::FormError;
use crate::core::orchestrator::{ConversionOrchestrator, ConversionState};
use crate::core::synchronizer::{CatalogState, CatalogSynchronizer};

/// Read-only view model of the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormView {
    pub selected_date: Option<NaiveDate>,
    pub selected_currency: Option<String>,
    pub amount: String,
    /// Date the listed currencies are valid for.
    pub catalog_date: Option<NaiveDate>,
    pub currencies: Vec<Currency>,
    pub currency_error: Option<String>,
    pub is_loading_currencies: bool,
    pub conversion_result: Option<ConversionOutcome>,
    pub conversion_direction: Option<Direction>,
    pub conversion_error: Option<String>,
    pub is_converting: bool,
    pub converting_direction: Option<Direction>,
    pub can_convert: bool,
}

impl FormView {
    fn build(catalog: CatalogState, conversion: ConversionState) -> Self {
        let can_convert = !catalog.is_loading
            && !conversion.is_converting()
            && catalog.selected_currency.is_some();
        Self {
            selected_date: catalog.selected_date,
            selected_currency: catalog.selected_currency,
            amount: conversion.amount,
            catalog_date: catalog.snapshot_date,
            currencies: catalog.currencies,
            currency_error: catalog.error.map(|e| e.to_string()),
            is_loading_currencies: catalog.is_loading,
            conversion_result: conversion.outcome,
            conversion_direction: conversion.last_direction,
            conversion_error: conversion.error,
            is_converting: conversion.in_flight.is_some(),
            converting_direction: conversion.in_flight,
            can_convert,
        }
    }

    /// Whether the button for `direction` should show its progress label.
    pub fn is_converting_to(&self, direction: Direction) -> bool {
        self.converting_direction == Some(direction)
    }
}

/// Why conversion is currently unavailable, if it is.
fn conversion_gate(catalog: &CatalogState, conversion: &ConversionState) -> Option<FormError> {
    if catalog.is_loading {
        Some(FormError::Busy("Currencies are still loading".to_string()))
    } else if conversion.is_converting() {
        Some(FormError::Busy(
            "A conversion is already in progress".to_string(),
        ))
    } else if catalog.selected_currency.is_none() {
        Some(FormError::validation("Please select a currency"))
    } else {
        None
    }
}

pub struct FormController {
    catalog: CatalogSynchronizer,
    conversion: ConversionOrchestrator,
}

impl FormController {
    pub fn new(
        catalog_provider: Arc<dyn CatalogProvider>,
        conversion_provider: Arc<dyn ConversionProvider>,
    ) -> Self {
        Self::from_parts(
            CatalogSynchronizer::new(catalog_provider),
            ConversionOrchestrator::new(conversion_provider),
        )
    }

    pub fn from_parts(catalog: CatalogSynchronizer, conversion: ConversionOrchestrator) -> Self {
        Self {
            catalog,
            conversion,
        }
    }

    /// Loads today's catalog. Call once when the form is shown.
    pub async fn mount(&self) -> FormView {
        let outcome = self.catalog.initialize().await;
        debug!(?outcome, "Form mounted");
        self.view().await
    }

    pub async fn view(&self) -> FormView {
        FormView::build(self.catalog.state().await, self.conversion.state().await)
    }

    /// Selects a date. The previous conversion result is cleared as soon as
    /// the fetch for the new date starts, never when it completes.
    pub async fn set_date(&self, input: &str) -> Result<FormView, FormError> {
        if let Some(key) = self.catalog.begin_date_change(input).await? {
            self.conversion.invalidate().await;
            let outcome = self.catalog.finish_date_change(key).await;
            debug!(?outcome, "Date change settled");
        }
        Ok(self.view().await)
    }

    pub async fn set_currency(&self, code: &str) -> Result<FormView, FormError> {
        if self.catalog.select_currency(code).await? {
            self.conversion.invalidate().await;
        }
        Ok(self.view().await)
    }

    pub async fn set_amount(&self, amount_text: &str) -> FormView {
        self.conversion.set_amount(amount_text).await;
        self.view().await
    }

    /// Converts the current amount in `direction`.
    ///
    /// Rejected up front while currencies load, while another conversion is
    /// running, or with no currency selected. Validation and service errors
    /// end up in [`FormView::conversion_error`].
    pub async fn request_conversion(&self, direction: Direction) -> Result<FormView, FormError> {
        let catalog = self.catalog.state().await;
        let conversion = self.conversion.state().await;
        if let Some(reason) = conversion_gate(&catalog, &conversion) {
            debug!(%direction, error = %reason, "Conversion request ignored");
            return Err(reason);
        }

        let currency = catalog.selected_currency.unwrap_or_default();
        match self
            .conversion
            .convert(
                direction,
                catalog.selected_date,
                &currency,
                &conversion.amount,
            )
            .await
        {
            Err(e @ FormError::Busy(_)) => return Err(e),
            Err(e) => debug!(error = %e, "Conversion did not produce a result"),
            Ok(_) => {}
        }
        Ok(self.view().await)
    }
}
