//! In-process providers for exercising the form state machines.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::core::conversion::{ConversionProvider, ConversionRequest, Direction};
use crate::core::currency::{CatalogProvider, Currency};
use crate::core::error::ClientError;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn fixed_today() -> NaiveDate {
    date("2024-06-15")
}

/// Catalog answering from a per-date table. Responses can be held back with
/// a gate until the test releases them.
pub struct StubCatalog {
    responses: Mutex<HashMap<NaiveDate, Result<Vec<Currency>, u16>>>,
    gates: Mutex<HashMap<NaiveDate, Arc<Notify>>>,
    calls: AtomicUsize,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn respond(&self, date: NaiveDate, response: Result<Vec<Currency>, u16>) {
        self.responses.lock().unwrap().insert(date, response);
    }

    pub fn gate(&self, date: NaiveDate) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(date, Arc::clone(&notify));
        notify
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl CatalogProvider for StubCatalog {
    async fn list_currencies(&self, date: NaiveDate) -> Result<Vec<Currency>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().get(&date).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let response = self.responses.lock().unwrap().get(&date).cloned();
        match response {
            Some(Ok(currencies)) => Ok(currencies),
            Some(Err(status)) => Err(ClientError::Status {
                status,
                message: None,
            }),
            None => Err(ClientError::Status {
                status: 404,
                message: None,
            }),
        }
    }
}

/// Conversion service returning a fixed answer and recording what it saw.
pub struct StubConversion {
    response: Result<f64, (u16, Option<String>)>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(Direction, ConversionRequest)>>,
}

impl StubConversion {
    pub fn new(response: Result<f64, (u16, Option<String>)>) -> Self {
        Self {
            response,
            gate: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn gated(response: Result<f64, (u16, Option<String>)>) -> (Self, Arc<Notify>) {
        let notify = Arc::new(Notify::new());
        let stub = Self {
            gate: Some(Arc::clone(&notify)),
            ..Self::new(response)
        };
        (stub, notify)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(Direction, ConversionRequest)> {
        self.requests.lock().unwrap().clone()
    }

    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl ConversionProvider for StubConversion {
    async fn convert(
        &self,
        direction: Direction,
        request: &ConversionRequest,
    ) -> Result<f64, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((direction, request.clone()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.response
            .clone()
            .map_err(|(status, message)| ClientError::Status { status, message })
    }
}
