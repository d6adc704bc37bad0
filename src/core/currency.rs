//! Currency catalog abstractions

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::error::ClientError;

/// Code of the pivot currency every conversion is expressed against.
pub const REFERENCE_CURRENCY: &str = "AZN";

/// A currency as published by the catalog service for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    /// Informational only, nothing in the form consumes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

impl Currency {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            rate: None,
        }
    }
}

/// Currencies shown when the catalog cannot be reached at startup.
pub fn fallback_currencies() -> Vec<Currency> {
    vec![
        Currency::new("USD", "US Dollar"),
        Currency::new("EUR", "Euro"),
        Currency::new("TRY", "Turkish Lira"),
    ]
}

/// Lists the currencies valid on a given date.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn list_currencies(&self, date: NaiveDate) -> Result<Vec<Currency>, ClientError>;
}
