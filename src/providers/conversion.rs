use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::util::{build_client, error_for_status};
use crate::core::conversion::{ConversionProvider, ConversionRequest, Direction};
use crate::core::error::ClientError;

/// Client for the conversion service
/// (`POST /api/conversions/{toManat|fromManat}`).
pub struct HttpConversionClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpConversionClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client()?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ConversionResponse {
    result: Option<f64>,
}

#[async_trait]
impl ConversionProvider for HttpConversionClient {
    #[instrument(
        name = "ConversionCall",
        skip(self, request),
        fields(direction = %direction, currency = %request.currency)
    )]
    async fn convert(
        &self,
        direction: Direction,
        request: &ConversionRequest,
    ) -> Result<f64, ClientError> {
        let url = format!("{}/api/conversions/{}", self.base_url, direction.endpoint());
        debug!("Posting conversion request to {}", url);

        let response = self.client.post(&url).json(request).send().await?;
        let response = error_for_status(response).await?;

        let text = response.text().await?;
        let data: ConversionResponse = serde_json::from_str(&text)
            .map_err(|e| ClientError::Decode(format!("conversion response: {e}")))?;
        data.result
            .ok_or_else(|| ClientError::Decode("conversion response has no result".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(currency: &str, amount: f64) -> ConversionRequest {
        ConversionRequest {
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            currency: currency.to_string(),
            amount,
        }
    }

    #[tokio::test]
    async fn test_convert_to_manat() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/conversions/toManat"))
            .and(body_json(
                json!({"date": "2024-03-05", "currency": "USD", "amount": 100.0}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": 170.0,
                "message": "Successfully converted 100 USD to 170.0000 AZN",
                "status": "SUCCESS"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
        let client = HttpConversionClient::new(&mock_server.uri()).unwrap();

        let result = client
            .convert(Direction::ToReference, &request("USD", 100.0))
            .await
            .unwrap();
        assert_eq!(result, 170.0);
    }

    #[tokio::test]
    async fn test_convert_from_manat_uses_its_endpoint() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/conversions/fromManat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 58.82})))
            .expect(1)
            .mount(&mock_server)
            .await;
        let client = HttpConversionClient::new(&mock_server.uri()).unwrap();

        let result = client
            .convert(Direction::FromReference, &request("USD", 100.0))
            .await
            .unwrap();
        assert_eq!(result, 58.82);
    }

    #[tokio::test]
    async fn test_error_message_is_kept() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/conversions/toManat"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "result": null,
                "message": "Amount must be greater than zero",
                "status": "ERROR"
            })))
            .mount(&mock_server)
            .await;
        let client = HttpConversionClient::new(&mock_server.uri()).unwrap();

        let err = client
            .convert(Direction::ToReference, &request("USD", 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 400, .. }));
        assert_eq!(err.remote_message(), Some("Amount must be greater than zero"));
    }

    #[tokio::test]
    async fn test_error_without_json_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/conversions/toManat"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;
        let client = HttpConversionClient::new(&mock_server.uri()).unwrap();

        let err = client
            .convert(Direction::ToReference, &request("USD", 1.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Status {
                status: 502,
                message: None
            }
        ));
    }

    #[tokio::test]
    async fn test_success_without_result() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/conversions/toManat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": null})))
            .mount(&mock_server)
            .await;
        let client = HttpConversionClient::new(&mock_server.uri()).unwrap();

        let err = client
            .convert(Direction::ToReference, &request("USD", 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
