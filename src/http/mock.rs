//! Canned-response HTTP client for testing.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{HttpClient, HttpError, HttpResponse};

/// Serves preconfigured responses by exact URL and records requests.
///
/// URLs without a configured response fail with a transport error, the
/// same way an unreachable host would.
#[derive(Debug, Default)]
pub struct MockHttp {
    responses: HashMap<String, HttpResponse>,
    requests: RefCell<Vec<String>>,
}

impl MockHttp {
    /// Create a mock that serves nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with `status` for `url`.
    pub fn respond(&mut self, url: &str, status: u16, body: &str) {
        self.responses
            .insert(url.to_string(), HttpResponse::new(status, body));
    }

    /// URLs requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl HttpClient for MockHttp {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.requests.borrow_mut().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| HttpError::Transport {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}
