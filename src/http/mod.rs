//! HTTP access to the wiki's own API.
//!
//! The import wizard proves that the configured API endpoint really is this
//! wiki before pointing a git remote at it. Requests go through
//! [`HttpClient`]; [`ReqwestClient`] is the production implementation and
//! [`MockHttp`] serves canned responses in tests.

pub mod client;
pub mod mock;
pub mod siteinfo;

use thiserror::Error;

pub use client::ReqwestClient;
pub use mock::MockHttp;
pub use siteinfo::{parse_sitename, siteinfo_url};

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Whether the status is 2xx.
    pub ok: bool,
    /// Response body as text.
    pub body: String,
    /// Short human-readable status, e.g. `"HTTP 404 Not Found"`.
    pub message: String,
}

impl HttpResponse {
    /// Build a response from a status code and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            ok: (200..300).contains(&status),
            body: body.into(),
            message: format!("HTTP {status}"),
        }
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpError {
    /// The URL could not be parsed.
    #[error("invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// Connection, TLS or timeout failure.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

/// Minimal GET-only HTTP client.
pub trait HttpClient {
    /// Perform a GET request.
    ///
    /// Non-2xx statuses are returned as responses with `ok == false`, not as
    /// errors.
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
}
