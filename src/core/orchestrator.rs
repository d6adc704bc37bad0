//! Drives conversion requests for the form.

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::core::conversion::{ConversionOutcome, ConversionProvider, ConversionRequest, Direction};
use crate::core::error::FormError;

pub const MISSING_FIELDS: &str = "Please fill in all required fields";
pub const CONVERSION_FAILED: &str = "Error occurred during conversion";

/// Snapshot of the conversion side of the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionState {
    pub amount: String,
    pub outcome: Option<ConversionOutcome>,
    pub error: Option<String>,
    /// Direction of the most recent attempt, successful or not.
    pub last_direction: Option<Direction>,
    /// Direction of the request currently in flight.
    pub in_flight: Option<Direction>,
}

impl ConversionState {
    pub fn is_converting(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// Checks the form inputs of a conversion and parses the amount.
pub fn validate_conversion(
    date: Option<NaiveDate>,
    currency_code: &str,
    amount_text: &str,
) -> Result<(NaiveDate, f64), FormError> {
    let amount_text = amount_text.trim();
    let date = match date {
        Some(date) if !currency_code.trim().is_empty() && !amount_text.is_empty() => date,
        _ => return Err(FormError::validation(MISSING_FIELDS)),
    };
    let amount: f64 = amount_text
        .parse()
        .map_err(|_| FormError::validation(format!("Invalid amount: {amount_text}")))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(FormError::validation(format!(
            "Amount must be a non-negative number: {amount_text}"
        )));
    }
    Ok((date, amount))
}

/// Owns the amount, the last outcome and the in-flight flag.
///
/// At most one conversion runs at a time; a second request while one is
/// pending is rejected with [`FormError::Busy`]. A response that arrives
/// after another form input changed is dropped.
pub struct ConversionOrchestrator {
    provider: Arc<dyn ConversionProvider>,
    inner: Mutex<Inner>,
}

struct Inner {
    state: ConversionState,
    /// Bumped by every invalidation.
    generation: u64,
}

impl Inner {
    fn invalidate(&mut self) {
        self.generation += 1;
        self.state.outcome = None;
        self.state.error = None;
    }
}

impl ConversionOrchestrator {
    pub fn new(provider: Arc<dyn ConversionProvider>) -> Self {
        Self {
            provider,
            inner: Mutex::new(Inner {
                state: ConversionState::default(),
                generation: 0,
            }),
        }
    }

    pub async fn state(&self) -> ConversionState {
        self.inner.lock().await.state.clone()
    }

    /// Stores the amount text. A changed amount invalidates the last outcome.
    pub async fn set_amount(&self, amount_text: &str) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.state.amount == amount_text {
            return false;
        }
        inner.state.amount = amount_text.to_string();
        inner.invalidate();
        true
    }

    /// Drops the last outcome or error after another form input changed.
    /// A conversion still in flight will not record its response.
    pub async fn invalidate(&self) {
        self.inner.lock().await.invalidate();
    }

    /// Runs one conversion.
    ///
    /// The returned value is what the service answered; it only lands in
    /// [`ConversionState`] if no form input changed while it was pending.
    pub async fn convert(
        &self,
        direction: Direction,
        date: Option<NaiveDate>,
        currency_code: &str,
        amount_text: &str,
    ) -> Result<ConversionOutcome, FormError> {
        let (request, generation) = {
            let mut inner = self.inner.lock().await;
            if inner.state.is_converting() {
                return Err(FormError::Busy(
                    "A conversion is already in progress".to_string(),
                ));
            }

            inner.invalidate();
            inner.state.last_direction = Some(direction);
            let (date, amount) = match validate_conversion(date, currency_code, amount_text) {
                Ok(parsed) => parsed,
                Err(e) => {
                    debug!(error = %e, "Conversion input rejected");
                    inner.state.error = Some(e.to_string());
                    return Err(e);
                }
            };
            inner.state.in_flight = Some(direction);
            let request = ConversionRequest {
                date,
                currency: currency_code.trim().to_string(),
                amount,
            };
            (request, inner.generation)
        };

        debug!(%direction, ?request, "Requesting conversion");
        let result = self.provider.convert(direction, &request).await;

        let mut inner = self.inner.lock().await;
        inner.state.in_flight = None;
        let current = inner.generation == generation;
        if !current {
            debug!(%direction, "Discarding conversion response superseded by a form change");
        }
        match result {
            Ok(value) => {
                let outcome = ConversionOutcome {
                    direction,
                    amount_in: request.amount,
                    result: value,
                    date: request.date,
                    currency_code: request.currency,
                };
                info!(
                    %direction,
                    amount = outcome.amount_in,
                    currency = %outcome.currency_code,
                    result = outcome.result,
                    "Conversion completed"
                );
                if current {
                    inner.state.outcome = Some(outcome.clone());
                }
                Ok(outcome)
            }
            Err(e) => {
                warn!(%direction, error = %e, "Conversion failed");
                let message = e
                    .remote_message()
                    .map_or_else(|| CONVERSION_FAILED.to_string(), str::to_string);
                if current {
                    inner.state.error = Some(message.clone());
                }
                Err(FormError::Conversion(message))
            }
        }
    }
}
