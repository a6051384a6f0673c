//! Incoming HTTP request as seen by handlers.

use bytes::Bytes;
use std::collections::HashMap;

/// HTTP method enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
            Method::Patch => write!(f, "PATCH"),
            Method::Head => write!(f, "HEAD"),
            Method::Options => write!(f, "OPTIONS"),
        }
    }
}

impl Method {
    /// Convert from hyper's method, `None` for methods not routed here.
    pub fn from_hyper(method: &hyper::Method) -> Option<Self> {
        match *method {
            hyper::Method::GET => Some(Method::Get),
            hyper::Method::POST => Some(Method::Post),
            hyper::Method::PUT => Some(Method::Put),
            hyper::Method::DELETE => Some(Method::Delete),
            hyper::Method::PATCH => Some(Method::Patch),
            hyper::Method::HEAD => Some(Method::Head),
            hyper::Method::OPTIONS => Some(Method::Options),
            _ => None,
        }
    }
}

/// An HTTP request with its body fully read and path values resolved.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request path, without the query string.
    pub path: String,
    /// Raw query string (everything after `?`), if any.
    pub query: Option<String>,
    /// HTTP headers, names lowercased.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Bytes,
    /// Values captured from the matched route pattern.
    pub path_params: HashMap<String, String>,
}

impl Request {
    /// Create a request from a method and a target such as `/jobs?page=2`.
    pub fn new(method: Method, target: impl AsRef<str>) -> Self {
        let target = target.as_ref();
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (target.to_string(), None),
        };

        Self {
            method,
            path,
            query,
            ..Self::default()
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a path value, as the router does for `{name}` segments.
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Get a header value (case-insensitive).
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Get a path value, or the empty string when the route did not capture it.
    pub fn path_value(&self, name: &str) -> &str {
        self.path_params.get(name).map(String::as_str).unwrap_or("")
    }

    /// The path and query string, as received.
    pub fn url(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_splits_query() {
        let req = Request::new(Method::Get, "/jobs?page=2&size=10");
        assert_eq!(req.path, "/jobs");
        assert_eq!(req.query.as_deref(), Some("page=2&size=10"));
        assert_eq!(req.url(), "/jobs?page=2&size=10");

        let req = Request::new(Method::Get, "/jobs");
        assert_eq!(req.query, None);
    }

    #[test]
    fn test_path_value_defaults_to_empty() {
        let req = Request::new(Method::Get, "/jobs/7").path_param("pk", "7");
        assert_eq!(req.path_value("pk"), "7");
        assert_eq!(req.path_value("missing"), "");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = Request::new(Method::Post, "/").header("X-Request-Id", "abc");
        assert_eq!(req.get_header("x-request-id"), Some("abc"));
        assert_eq!(req.get_header("X-REQUEST-ID"), Some("abc"));
    }
}
