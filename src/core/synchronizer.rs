//! Keeps the currency catalog in step with the selected date.
//!
//! Every fetch is tagged with a [`RequestKey`] when it is issued. The response
//! is applied only if its key is still the latest one when it arrives, so a
//! slow response for an old date can never overwrite a newer selection.

use chrono::{Datelike, Local, NaiveDate};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::core::currency::{CatalogProvider, Currency, fallback_currencies};
use crate::core::error::{ClientError, FormError};

pub const BOOTSTRAP_ERROR: &str = "Failed to load currencies. Please refresh the page.";
pub const DATE_ERROR: &str =
    "Unable to load currencies for the selected date. Please try a different date.";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifies one catalog fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestKey {
    seq: u64,
    date: NaiveDate,
}

/// What happened to the response of a catalog fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A fresh snapshot replaced the previous one.
    Applied,
    /// The fetch failed and the failure policy was applied.
    Degraded,
    /// A newer fetch was issued meanwhile; the response was dropped.
    Discarded,
    /// The date was already selected, nothing was fetched.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchPolicy {
    /// Startup fetch: select the first currency, fall back to built-ins.
    Bootstrap,
    /// User picked a date: keep the selection if possible, clear on failure.
    DateChange,
}

/// Snapshot of the catalog side of the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    /// Date the current currency list was fetched for.
    pub snapshot_date: Option<NaiveDate>,
    pub currencies: Vec<Currency>,
    pub selected_date: Option<NaiveDate>,
    pub selected_currency: Option<String>,
    pub is_loading: bool,
    /// Why the current snapshot is degraded, if it is.
    pub error: Option<FormError>,
}

impl CatalogState {
    pub fn contains(&self, code: &str) -> bool {
        self.currencies.iter().any(|c| c.code == code)
    }
}

struct Inner {
    state: CatalogState,
    latest: u64,
}

pub struct CatalogSynchronizer {
    provider: Arc<dyn CatalogProvider>,
    today: fn() -> NaiveDate,
    inner: Mutex<Inner>,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a form date and checks it does not run past the end of the
/// current year.
pub fn validate_date(input: &str, today: NaiveDate) -> Result<NaiveDate, FormError> {
    let date = NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| FormError::validation(format!("Invalid date: {input}")))?;
    let last_day = NaiveDate::from_ymd_opt(today.year(), 12, 31)
        .ok_or_else(|| FormError::validation(format!("Invalid year: {}", today.year())))?;
    if date > last_day {
        return Err(FormError::validation(format!(
            "Date {date} is after {last_day}"
        )));
    }
    Ok(date)
}

/// Picks the currency to select after a snapshot change: the current one if
/// it is still listed, else the first entry, else nothing.
pub fn reconcile_selection(current: Option<&str>, currencies: &[Currency]) -> Option<String> {
    match current {
        Some(code) if currencies.iter().any(|c| c.code == code) => Some(code.to_string()),
        _ => currencies.first().map(|c| c.code.clone()),
    }
}

impl CatalogSynchronizer {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self {
            provider,
            today: local_today,
            inner: Mutex::new(Inner {
                state: CatalogState::default(),
                latest: 0,
            }),
        }
    }

    /// Replaces the clock used for "today" and the end-of-year bound.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub async fn state(&self) -> CatalogState {
        self.inner.lock().await.state.clone()
    }

    /// Loads the catalog for today. Falls back to the built-in list if the
    /// service cannot be reached.
    pub async fn initialize(&self) -> SyncOutcome {
        let today = (self.today)();
        let key = self.begin(today, false).await;
        let result = self.provider.list_currencies(today).await;
        self.complete(key, result, FetchPolicy::Bootstrap).await
    }

    /// Selects a new date and refreshes the catalog for it.
    ///
    /// Malformed dates and dates past the end of the current year are
    /// rejected without touching the state or the network.
    pub async fn on_date_changed(&self, input: &str) -> Result<SyncOutcome, FormError> {
        match self.begin_date_change(input).await? {
            Some(key) => Ok(self.finish_date_change(key).await),
            None => Ok(SyncOutcome::Unchanged),
        }
    }

    /// First half of [`Self::on_date_changed`]: validates the date, selects
    /// it and marks the catalog as loading. Returns `None` when the date is
    /// already loaded and no fetch is needed.
    pub async fn begin_date_change(&self, input: &str) -> Result<Option<RequestKey>, FormError> {
        let date = validate_date(input, (self.today)())?;

        {
            let inner = self.inner.lock().await;
            let state = &inner.state;
            if state.selected_date == Some(date)
                && state.snapshot_date == Some(date)
                && !state.is_loading
                && state.error.is_none()
            {
                debug!(%date, "Date already selected, skipping catalog fetch");
                return Ok(None);
            }
        }

        Ok(Some(self.begin(date, true).await))
    }

    /// Fetches the catalog for a date change started by
    /// [`Self::begin_date_change`].
    pub async fn finish_date_change(&self, key: RequestKey) -> SyncOutcome {
        let result = self.provider.list_currencies(key.date).await;
        self.complete(key, result, FetchPolicy::DateChange).await
    }

    /// Selects a currency from the current snapshot. Returns whether the
    /// selection changed.
    pub async fn select_currency(&self, code: &str) -> Result<bool, FormError> {
        let mut inner = self.inner.lock().await;
        let state = &mut inner.state;
        if state.is_loading {
            return Err(FormError::Busy("Currencies are still loading".to_string()));
        }
        if !state.contains(code) {
            return Err(FormError::validation(format!(
                "Currency {code} is not available for the selected date"
            )));
        }
        if state.selected_currency.as_deref() == Some(code) {
            return Ok(false);
        }
        debug!(currency = %code, "Currency selected");
        state.selected_currency = Some(code.to_string());
        Ok(true)
    }

    async fn begin(&self, date: NaiveDate, select_date: bool) -> RequestKey {
        let mut inner = self.inner.lock().await;
        inner.latest += 1;
        inner.state.is_loading = true;
        if select_date {
            inner.state.selected_date = Some(date);
        }
        let key = RequestKey {
            seq: inner.latest,
            date,
        };
        debug!(?key, "Fetching currency catalog");
        key
    }

    async fn complete(
        &self,
        key: RequestKey,
        result: Result<Vec<Currency>, ClientError>,
        policy: FetchPolicy,
    ) -> SyncOutcome {
        let mut inner = self.inner.lock().await;
        if key.seq != inner.latest {
            warn!(
                date = %key.date,
                "Discarding catalog response superseded by a newer request"
            );
            return SyncOutcome::Discarded;
        }

        let state = &mut inner.state;
        state.is_loading = false;
        state.snapshot_date = Some(key.date);

        match result {
            Ok(currencies) => {
                info!(date = %key.date, count = currencies.len(), "Currency catalog loaded");
                state.selected_currency = match policy {
                    FetchPolicy::Bootstrap => currencies.first().map(|c| c.code.clone()),
                    FetchPolicy::DateChange => {
                        reconcile_selection(state.selected_currency.as_deref(), &currencies)
                    }
                };
                state.currencies = currencies;
                state.error = None;
                SyncOutcome::Applied
            }
            Err(e) => {
                match policy {
                    FetchPolicy::Bootstrap => {
                        warn!(error = %e, "Catalog unavailable, installing fallback currencies");
                        state.currencies = fallback_currencies();
                        state.selected_currency = state.currencies.first().map(|c| c.code.clone());
                        state.error =
                            Some(FormError::CatalogFetch(BOOTSTRAP_ERROR.to_string()));
                    }
                    FetchPolicy::DateChange => {
                        warn!(date = %key.date, error = %e, "Catalog unavailable for date, clearing currencies");
                        state.currencies.clear();
                        state.selected_currency = None;
                        state.error =
                            Some(FormError::CatalogFetch(DATE_ERROR.to_string()));
                    }
                }
                SyncOutcome::Degraded
            }
        }
    }
}
