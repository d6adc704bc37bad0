use serde::Deserialize;
use tracing::debug;

use super::util::{build_client, error_for_status};
use crate::core::error::ClientError;

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl ServiceHealth {
    pub fn is_up(&self) -> bool {
        self.status.eq_ignore_ascii_case("UP")
    }
}

pub async fn check(base_url: &str) -> Result<ServiceHealth, ClientError> {
    let url = format!("{}/api/health", base_url.trim_end_matches('/'));
    debug!("Probing {}", url);

    let response = build_client()?.get(&url).send().await?;
    let response = error_for_status(response).await?;
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ClientError::Decode(format!("health response: {e}")))
}
