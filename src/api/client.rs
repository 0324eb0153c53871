//! HTTP client for enrollment API requests.
//!
//! This module wraps `reqwest` with the base URL, timeout and JSON handling
//! every endpoint shares, and turns non-success responses into
//! [`ApiError::Api`] carrying the server's `message`.

use super::error::ApiError;
use log::*;
use reqwest::{Method, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Makes JSON requests to the enrollment API.
///
pub struct Client {
    pub(crate) base_url: String,
    pub(crate) http_client: reqwest::Client,
}

impl Client {
    /// Returns a new instance for the given base URL and per-request timeout.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created. This only happens when
    /// the TLS backend fails to initialise, which no configuration value
    /// used here can cause.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Client {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client - this should never happen"),
        }
    }

    /// POST a JSON body and return the decoded response body.
    ///
    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, ApiError> {
        let response = self.call(Method::POST, endpoint, Some(body)).await?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Self::transport_error(endpoint, e))?;

        if !status.is_success() {
            let message = Self::error_message(status, &bytes);
            error!(
                "Request to '{}' failed with status {}: {}",
                endpoint, status, message
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Make request with optional JSON body.
    ///
    async fn call(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Response, ApiError> {
        let request_url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        debug!("Sending {} {}...", method, request_url);

        let mut request = self
            .http_client
            .request(method, &request_url)
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| Self::transport_error(endpoint, e))
    }

    fn transport_error(endpoint: &str, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            warn!("Request to '{}' timed out.", endpoint);
            ApiError::Timeout {
                endpoint: endpoint.to_owned(),
            }
        } else {
            ApiError::HttpRequest(error)
        }
    }

    /// The body's `message` field, or a description of the status.
    ///
    fn error_message(status: StatusCode, body: &[u8]) -> String {
        serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|json| {
                json.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            })
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;
    use serde_json::json;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn post_returns_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("POST")
                    .path("/alunos")
                    .header("Content-Type", "application/json")
                    .json_body(json!({ "nome": "Maria" }));
                then.status(201).json_body(json!({ "id": 7 }));
            })
            .await;

        let client = Client::new(&server.base_url(), TIMEOUT);
        let body = client.post("alunos", &json!({ "nome": "Maria" })).await.unwrap();
        assert_eq!(body["id"], 7);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn post_extracts_server_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/maes");
                then.status(400)
                    .json_body(json!({ "message": "CPF da mãe inválido" }));
            })
            .await;

        let client = Client::new(&server.base_url(), TIMEOUT);
        let error = client.post("/maes", &json!({})).await.unwrap_err();
        match error {
            ApiError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "CPF da mãe inválido");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn post_falls_back_to_status_description() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/pais");
                then.status(500).body("internal error");
            })
            .await;

        let client = Client::new(&format!("{}/", server.base_url()), TIMEOUT);
        let error = client.post("pais", &json!({})).await.unwrap_err();
        assert_eq!(
            error.user_message(),
            "Request failed with status code 500"
        );
    }

    #[tokio::test]
    async fn post_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/observacoes");
                then.status(201).delay(Duration::from_millis(500));
            })
            .await;

        let client = Client::new(&server.base_url(), Duration::from_millis(50));
        let error = client.post("observacoes", &json!({})).await.unwrap_err();
        assert!(matches!(error, ApiError::Timeout { ref endpoint } if endpoint == "observacoes"));
    }

    #[tokio::test]
    async fn post_accepts_empty_success_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/observacoes");
                then.status(204);
            })
            .await;

        let client = Client::new(&server.base_url(), TIMEOUT);
        let body = client.post("observacoes", &json!({})).await.unwrap();
        assert_eq!(body, Value::Null);
    }
}
