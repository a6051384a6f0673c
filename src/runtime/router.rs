//! Route table mapping method and path patterns to handlers.
//!
//! Patterns are matched segment by segment. A segment written `{name}`
//! matches any single non-empty segment and captures it, percent-decoded,
//! as the path value `name`; every other segment must match exactly.

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::http::Method;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::sync::Arc;

/// One segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A route entry that maps a path pattern to a handler.
#[derive(Clone)]
pub struct Route {
    method: Method,
    pattern: String,
    segments: Vec<Segment>,
    handler: BoxedHandler,
}

impl Route {
    /// Create a new route.
    pub fn new(method: Method, pattern: impl Into<String>, handler: impl Handler) -> Self {
        let pattern = pattern.into();
        let segments = split(&pattern)
            .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();

        Self {
            method,
            pattern,
            segments,
            handler: Arc::new(handler),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Match `path`, returning the captured path values.
    ///
    /// A captured segment that does not decode to UTF-8 yields an
    /// `InvalidArg` error.
    pub fn matches(&self, path: &str) -> Option<Result<HashMap<String, String>, Error>> {
        let parts: Vec<&str> = split(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut captured = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => captured.push((name, part)),
            }
        }

        let params = captured
            .into_iter()
            .map(|(name, part)| match percent_decode_str(part).decode_utf8() {
                Ok(value) => Ok((name.clone(), value.into_owned())),
                Err(_) => Err(Error::invalid_arg(format!(
                    "invalid path value for field: {name}"
                ))),
            })
            .collect();

        Some(params)
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// The result of looking up a request in a [`Router`].
pub enum Lookup {
    /// A route matched.
    Found {
        handler: BoxedHandler,
        params: HashMap<String, String>,
    },
    /// A route matched, but a captured path value is malformed.
    Invalid(Error),
    /// The path matched, but not for this method.
    MethodNotAllowed,
    NotFound,
}

/// Route table; the first registered match wins.
#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Create an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route.
    pub fn route(mut self, method: Method, pattern: impl Into<String>, handler: impl Handler) -> Self {
        self.routes.push(Route::new(method, pattern, handler));
        self
    }

    pub fn get(self, pattern: impl Into<String>, handler: impl Handler) -> Self {
        self.route(Method::Get, pattern, handler)
    }

    pub fn post(self, pattern: impl Into<String>, handler: impl Handler) -> Self {
        self.route(Method::Post, pattern, handler)
    }

    pub fn put(self, pattern: impl Into<String>, handler: impl Handler) -> Self {
        self.route(Method::Put, pattern, handler)
    }

    pub fn delete(self, pattern: impl Into<String>, handler: impl Handler) -> Self {
        self.route(Method::Delete, pattern, handler)
    }

    /// List all routes.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Find the handler for a method and path.
    pub fn find(&self, method: Method, path: &str) -> Lookup {
        let mut path_matched = false;

        for route in &self.routes {
            if let Some(params) = route.matches(path) {
                if route.method == method {
                    return match params {
                        Ok(params) => Lookup::Found {
                            handler: route.handler.clone(),
                            params,
                        },
                        Err(err) => Lookup::Invalid(err),
                    };
                }
                path_matched = true;
            }
        }

        if path_matched {
            Lookup::MethodNotAllowed
        } else {
            Lookup::NotFound
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::handler::handle;
    use crate::logger::Logger;

    fn noop() -> impl Handler {
        handle(&Logger::nop(), |_ctx| async { Ok::<_, crate::Error>(()) })
    }

    #[test]
    fn test_route_exact_match() {
        let route = Route::new(Method::Get, "/api/users", noop());

        assert_eq!(route.matches("/api/users").unwrap().unwrap(), HashMap::new());
        assert_eq!(route.matches("/api/users/").unwrap().unwrap(), HashMap::new());
        assert!(route.matches("/api/users/1").is_none());
        assert!(route.matches("/api").is_none());
    }

    #[test]
    fn test_route_param_match() {
        let route = Route::new(Method::Get, "/api/users/{id}/jobs/{pk}", noop());

        let params = route.matches("/api/users/42/jobs/abc").unwrap().unwrap();
        assert_eq!(params["id"], "42");
        assert_eq!(params["pk"], "abc");

        assert!(route.matches("/api/users/42/jobs").is_none());
        assert!(route.matches("/api/users/42/tasks/abc").is_none());
    }

    #[test]
    fn test_router_find() {
        let router = Router::new()
            .get("/jobs", noop())
            .post("/jobs", noop())
            .get("/jobs/{pk}", noop());

        assert!(matches!(router.find(Method::Get, "/jobs"), Lookup::Found { .. }));
        assert!(matches!(router.find(Method::Post, "/jobs"), Lookup::Found { .. }));

        match router.find(Method::Get, "/jobs/9") {
            Lookup::Found { params, .. } => assert_eq!(params["pk"], "9"),
            _ => panic!("expected a match"),
        }

        assert!(matches!(router.find(Method::Delete, "/jobs"), Lookup::MethodNotAllowed));
        assert!(matches!(router.find(Method::Get, "/other"), Lookup::NotFound));
        assert_eq!(router.routes().len(), 3);
    }

    #[test]
    fn test_route_decodes_path_values() {
        let route = Route::new(Method::Get, "/notes/{name}", noop());

        let params = route.matches("/notes/hello%20world").unwrap().unwrap();
        assert_eq!(params["name"], "hello world");

        let params = route.matches("/notes/caf%C3%A9+%2F").unwrap().unwrap();
        assert_eq!(params["name"], "café+/");
    }

    #[test]
    fn test_router_rejects_undecodable_path_values() {
        let router = Router::new().get("/notes/{name}", noop());

        match router.find(Method::Get, "/notes/%FF") {
            Lookup::Invalid(err) => {
                assert_eq!(err.kind(), ErrorKind::InvalidArg);
                assert_eq!(
                    err.to_string(),
                    "invalid query argument\ninvalid path value for field: name"
                );
            }
            _ => panic!("expected an invalid path value"),
        }
    }
}
