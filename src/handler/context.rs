//! Per-request context handed to business functions.

use crate::http::{Method, Request};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Header carrying a caller-supplied request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request metadata available to a business function.
///
/// A fresh context is built for every request; it owns its data and can be
/// moved into spawned work freely.
#[derive(Debug, Clone, Default)]
pub struct Context {
    request_id: String,
    method: Method,
    path: String,
    headers: HashMap<String, String>,
}

impl Context {
    /// Build the context of `req`, reusing its `x-request-id` when present.
    pub fn from_request(req: &Request) -> Self {
        let request_id = req
            .get_header(REQUEST_ID_HEADER)
            .map(str::to_string)
            .unwrap_or_else(generate_request_id);

        Self {
            request_id,
            method: req.method,
            path: req.path.clone(),
            headers: req.headers.clone(),
        }
    }

    /// Request ID for tracing.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Generate a request ID from the current time.
fn generate_request_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{:x}", timestamp)
}
