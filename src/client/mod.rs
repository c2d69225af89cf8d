//! Summary service client.
//!
//! The service owns the OAuth exchange and the calendar API. This client only
//! asks it for an authorization link, the list of calendars behind an access
//! code, and the categorized events for a calendar selection.

use crate::models::{Event, RawSummaryInput};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors talking to the summary service.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Cannot connect to summary service at {0}")]
    Connect(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Summary service error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response from summary service: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("No calendars selected")]
    NoCalendarsSelected,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    auth: String,
}

/// HTTP client for the summary service.
pub struct SummaryClient {
    base_url: String,
    timeout_seconds: u64,
    http_client: reqwest::Client,
}

impl SummaryClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            timeout_seconds,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Link the user follows to grant calendar access and obtain a code.
    pub async fn auth_link(&self) -> Result<String, ClientError> {
        let response: AuthResponse = self.get_json(&[("format", "json")]).await?;
        Ok(response.auth)
    }

    /// Calendar ids available for an access code.
    pub async fn list_calendars(&self, code: &str) -> Result<Vec<String>, ClientError> {
        self.get_json(&[("format", "json"), ("code", code)]).await
    }

    /// Categorized events for the selected calendars, in the order the
    /// service returned the categories.
    pub async fn fetch_summary_input(
        &self,
        code: &str,
        calendars: &[String],
    ) -> Result<RawSummaryInput<Event>, ClientError> {
        if calendars.is_empty() {
            return Err(ClientError::NoCalendarsSelected);
        }

        let selection = calendars.join(",");
        let query = [("format", "json"), ("code", code), ("calendar", selection.as_str())];
        let input = self.get_json(&query).await?;
        Ok(input)
    }

    async fn get_json<T: DeserializeOwned>(&self, query: &[(&str, &str)]) -> Result<T, ClientError> {
        debug!("GET {} ({} params)", self.base_url, query.len());

        let response = self
            .http_client
            .get(&self.base_url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout(self.timeout_seconds)
                } else if e.is_connect() {
                    ClientError::Connect(self.base_url.clone())
                } else {
                    ClientError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(self.timeout_seconds)
            } else {
                ClientError::Request(e)
            }
        })?;
        debug!("Received {} bytes", body.len());

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{method, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> SummaryClient {
        SummaryClient::new(server.uri(), 5).unwrap()
    }

    #[tokio::test]
    async fn test_auth_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("format", "json"))
            .and(query_param_is_missing("code"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"auth": "https://accounts.example.com/o/oauth2"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let link = assert_ok!(client(&server).auth_link().await);
        assert_eq!(link, "https://accounts.example.com/o/oauth2");
    }

    #[tokio::test]
    async fn test_list_calendars() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("format", "json"))
            .and(query_param("code", "abc123"))
            .and(query_param_is_missing("calendar"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!(["me@example.com", "team@example.com"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let calendars = assert_ok!(client(&server).list_calendars("abc123").await);
        assert_eq!(calendars, vec!["me@example.com", "team@example.com"]);
    }

    #[tokio::test]
    async fn test_fetch_summary_input() {
        let server = MockServer::start().await;
        let body = r#"{
            "short": [],
            "attended": [{
                "start": {"dateTime": "2026-03-02T09:00:00Z"},
                "end": {"dateTime": "2026-03-02T10:00:00Z"}
            }],
            "1on1": []
        }"#;
        Mock::given(method("GET"))
            .and(query_param("code", "abc123"))
            .and(query_param("calendar", "me@example.com,team@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let calendars = vec!["me@example.com".to_string(), "team@example.com".to_string()];
        let input = assert_ok!(
            client(&server)
                .fetch_summary_input("abc123", &calendars)
                .await
        );

        let order: Vec<&str> = input.categories().collect();
        assert_eq!(order, vec!["short", "attended", "1on1"]);
        assert_eq!(input.get("attended").map(|e| e.len()), Some(1));
    }

    #[tokio::test]
    async fn test_empty_selection_is_rejected() {
        let server = MockServer::start().await;

        let result = client(&server).fetch_summary_input("abc123", &[]).await;
        assert!(matches!(result, Err(ClientError::NoCalendarsSelected)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("token exchange failed"))
            .mount(&server)
            .await;

        let err = assert_err!(client(&server).list_calendars("bad").await);
        match err {
            ClientError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "token exchange failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let result = client(&server).auth_link().await;
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SummaryClient::new(format!("http://{}", addr), 5).unwrap();
        let result = client.auth_link().await;
        assert!(matches!(result, Err(ClientError::Connect(_))));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"auth": "https://example.com"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = SummaryClient::new(server.uri(), 1).unwrap();
        let result = client.auth_link().await;
        assert!(matches!(result, Err(ClientError::Timeout(1))));
    }
}
