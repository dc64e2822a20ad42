//! Blocking reqwest implementation of [`HttpClient`].

use std::time::Duration;

use reqwest::blocking::Client;

use super::{HttpClient, HttpError, HttpResponse};

/// Performs GET requests with a fixed timeout.
pub struct ReqwestClient {
    client: Client,
    timeout: Duration,
}

impl ReqwestClient {
    /// Create a client with default 30-second timeout.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("mabs/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| HttpError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!("GET {}", parsed);
        let response = self
            .client
            .get(parsed)
            .send()
            .map_err(|e| HttpError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| HttpError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(HttpResponse {
            status: status.as_u16(),
            ok: status.is_success(),
            body,
            message: format!("HTTP {status}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn default_timeout_is_30_seconds() {
        let client = ReqwestClient::new().unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn custom_timeout() {
        let client = ReqwestClient::with_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn invalid_url_is_rejected_before_sending() {
        let client = ReqwestClient::new().unwrap();
        let err = client.get("not a url").unwrap_err();
        assert!(matches!(err, HttpError::InvalidUrl { .. }));
    }

    #[test]
    fn returns_body_and_status() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/w/api.php");
            then.status(200).body("MediaWiki API help");
        });

        let client = ReqwestClient::new().unwrap();
        let response = client.get(&server.url("/w/api.php")).unwrap();

        mock.assert();
        assert!(response.ok);
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "MediaWiki API help");
    }

    #[test]
    fn error_status_is_a_response_not_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/w/api.php");
            then.status(500).body("boom");
        });

        let client = ReqwestClient::new().unwrap();
        let response = client.get(&server.url("/w/api.php")).unwrap();

        assert!(!response.ok);
        assert_eq!(response.status, 500);
        assert!(response.message.contains("500"));
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        let client = ReqwestClient::with_timeout(Duration::from_secs(2)).unwrap();
        let err = client.get("http://127.0.0.1:1/w/api.php").unwrap_err();
        assert!(matches!(err, HttpError::Transport { .. }));
    }
}
