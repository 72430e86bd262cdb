use crate::sellauth::config::SellAuthConfig;
use anyhow::{Context, Result};
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Upstream request failure, carrying the provider's HTTP status so the
/// checkout handler can forward it verbatim.
#[derive(Debug, thiserror::Error)]
#[error("{status} {message}")]
pub struct SellAuthRequestError {
    pub status: u16,
    pub message: String,
}

/// Thin JSON client for the SellAuth shop API.
///
/// All endpoints live under `/v1/shops/{shop_id}/` and answer with an
/// `{error?, message?, data?}` envelope. One attempt per call; failed
/// requests are never retried here, the storefront assembly decides how to
/// degrade.
pub struct SellAuthClient {
    http: Client,
    config: SellAuthConfig,
}

impl SellAuthClient {
    pub fn new(config: SellAuthConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build SellAuth HTTP client")?;
        Ok(Self { http, config })
    }

    fn shop_url(&self, endpoint: &str) -> String {
        format!(
            "{}/v1/shops/{}/{}",
            self.config.base_url, self.config.shop_id, endpoint
        )
    }

    /// GET a shop endpoint and return the envelope's `data` field.
    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        debug!(endpoint = %endpoint, "sellauth: GET");
        let response = self
            .http
            .get(self.shop_url(endpoint))
            .bearer_auth(&self.config.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        let envelope: Value = response.json().await.context("decode SellAuth response")?;
        unwrap_envelope(status, envelope)
    }

    /// POST a JSON payload to a shop endpoint and return the envelope's
    /// `data` field.
    pub async fn post(&self, endpoint: &str, payload: &Value) -> Result<Value> {
        debug!(endpoint = %endpoint, "sellauth: POST");
        let response = self
            .http
            .post(self.shop_url(endpoint))
            .bearer_auth(&self.config.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await?;
        let status = response.status();
        let envelope: Value = response.json().await.context("decode SellAuth response")?;
        unwrap_envelope(status, envelope)
    }

    /// GET without envelope interpretation: returns the raw status and a
    /// best-effort body. The health endpoint wants the status even when the
    /// body is not JSON.
    pub async fn get_status(&self, endpoint: &str) -> Result<(u16, Value)> {
        let response = self
            .http
            .get(self.shop_url(endpoint))
            .bearer_auth(&self.config.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response
            .json::<Value>()
            .await
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Ok((status, body))
    }
}

/// Decide success from HTTP status plus the envelope's `error` flag. Only a
/// JSON boolean `true` counts as the flag being set.
fn unwrap_envelope(status: StatusCode, envelope: Value) -> Result<Value> {
    let error_flag = envelope
        .get("error")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !status.is_success() || error_flag {
        let message = envelope
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .unwrap_or("SellAuth request failed.")
            .to_string();
        return Err(SellAuthRequestError {
            status: status.as_u16(),
            message,
        }
        .into());
    }
    Ok(envelope.get("data").cloned().unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_data_is_returned_on_success() {
        let data = unwrap_envelope(StatusCode::OK, json!({ "data": [1, 2] })).unwrap();
        assert_eq!(data, json!([1, 2]));

        let missing = unwrap_envelope(StatusCode::OK, json!({})).unwrap();
        assert_eq!(missing, Value::Null);
    }

    #[test]
    fn non_success_status_becomes_typed_error() {
        let err = unwrap_envelope(
            StatusCode::UNAUTHORIZED,
            json!({ "message": "Invalid API key" }),
        )
        .unwrap_err();
        let request_error = err.downcast_ref::<SellAuthRequestError>().unwrap();
        assert_eq!(request_error.status, 401);
        assert_eq!(request_error.message, "Invalid API key");
        assert_eq!(request_error.to_string(), "401 Invalid API key");
    }

    #[test]
    fn error_flag_must_be_boolean_true() {
        let err = unwrap_envelope(StatusCode::OK, json!({ "error": true })).unwrap_err();
        let request_error = err.downcast_ref::<SellAuthRequestError>().unwrap();
        assert_eq!(request_error.status, 200);
        assert_eq!(request_error.message, "SellAuth request failed.");

        // Non-boolean flags do not count.
        assert!(unwrap_envelope(StatusCode::OK, json!({ "error": "yes" })).is_ok());
        assert!(unwrap_envelope(StatusCode::OK, json!({ "error": null })).is_ok());
    }

    #[test]
    fn blank_message_falls_back_to_default() {
        let err = unwrap_envelope(StatusCode::BAD_GATEWAY, json!({ "message": "" })).unwrap_err();
        let request_error = err.downcast_ref::<SellAuthRequestError>().unwrap();
        assert_eq!(request_error.message, "SellAuth request failed.");
    }
}
