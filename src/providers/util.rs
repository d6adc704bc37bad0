use serde::Deserialize;
use tracing::debug;

use crate::core::error::ClientError;

const USER_AGENT: &str = concat!("manat/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub(crate) fn build_client() -> Result<reqwest::Client, ClientError> {
    Ok(reqwest::Client::builder().user_agent(USER_AGENT).build()?)
}

/// Passes 2xx responses through. Anything else becomes
/// [`ClientError::Status`], keeping the `{message}` field of a JSON error
/// body when there is one.
pub(crate) async fn error_for_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());
    debug!(status = status.as_u16(), ?message, "Service returned an error");
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
