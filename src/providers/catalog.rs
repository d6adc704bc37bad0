use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, instrument};

use super::util::{build_client, error_for_status};
use crate::core::currency::{CatalogProvider, Currency};
use crate::core::error::ClientError;

/// Client for the currency catalog service (`GET /currencies?date=`).
pub struct HttpCatalogClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client()?,
        })
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalogClient {
    #[instrument(name = "CatalogFetch", skip(self), fields(date = %date))]
    async fn list_currencies(&self, date: NaiveDate) -> Result<Vec<Currency>, ClientError> {
        let date = date.format("%Y-%m-%d").to_string();
        let url = format!("{}/currencies?date={}", self.base_url, date);
        debug!("Requesting currency catalog from {}", url);

        let response = self.client.get(&url).send().await?;
        let response = error_for_status(response).await?;

        let text = response.text().await?;
        let currencies: Vec<Currency> = serde_json::from_str(&text)
            .map_err(|e| ClientError::Decode(format!("currency list for {date}: {e}")))?;
        debug!(count = currencies.len(), "Received currency catalog");
        Ok(currencies)
    }
}
