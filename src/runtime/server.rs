//! HTTP server driving a [`Router`].

use crate::handler::{write_error, write_json, ErrorBody, Handler};
use crate::http::{Method, Request, Response, StatusCode};
use crate::logger::Logger;
use crate::runtime::router::{Lookup, Router};
use crate::runtime::ServerConfig;
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// HTTP/1 server dispatching requests to the handlers of a [`Router`].
///
/// Each connection is served on its own task; requests share nothing but
/// the router and the logger.
pub struct Server {
    config: ServerConfig,
    router: Arc<Router>,
    logger: Logger,
}

impl Server {
    /// Create a new server.
    pub fn new(config: ServerConfig, router: Router, logger: Logger) -> Self {
        Self {
            config,
            router: Arc::new(router),
            logger,
        }
    }

    /// Serve requests until accepting a connection fails.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = self.config.bind_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;

        self.logger
            .in_scope(|| info!("Server listening on {}", addr));

        self.serve(listener).await
    }

    /// Serve requests from an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let router = self.router.clone();
        let max_body_size = self.config.max_body_size;

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);

            let router = router.clone();
            let connection = async move {
                let service = service_fn(move |req| {
                    let router = router.clone();
                    async move {
                        Ok::<_, Infallible>(
                            handle_request(req, router, max_body_size, remote_addr).await,
                        )
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection: {:?}", err);
                }
            };

            tokio::task::spawn(self.logger.instrument(connection));
        }
    }
}

/// Handle an incoming HTTP request.
async fn handle_request(
    req: hyper::Request<Incoming>,
    router: Arc<Router>,
    max_body_size: usize,
    remote_addr: SocketAddr,
) -> hyper::Response<Full<Bytes>> {
    debug!("Handling request: {} {} from {}", req.method(), req.uri(), remote_addr);

    let Some(method) = Method::from_hyper(req.method()) else {
        return build_response(error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed"));
    };

    let (handler, params) = match router.find(method, req.uri().path()) {
        Lookup::Found { handler, params } => (handler, params),
        Lookup::Invalid(err) => return build_response(write_error(&err)),
        Lookup::MethodNotAllowed => {
            return build_response(error_response(
                StatusCode::METHOD_NOT_ALLOWED,
                "method not allowed",
            ))
        }
        Lookup::NotFound => {
            return build_response(error_response(StatusCode::NOT_FOUND, "not found"))
        }
    };

    let request = match convert_request(req, method, params, max_body_size).await {
        Ok(request) => request,
        Err(response) => return build_response(response),
    };

    build_response(handler.call(request).await)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    write_json(
        status,
        &ErrorBody {
            error: message.to_string(),
        },
    )
}

/// Convert a hyper request into a [`Request`], reading the whole body.
async fn convert_request(
    req: hyper::Request<Incoming>,
    method: Method,
    path_params: HashMap<String, String>,
    max_body_size: usize,
) -> Result<Request, Response> {
    let (parts, body) = req.into_parts();

    let mut headers = HashMap::new();
    for (name, value) in &parts.headers {
        if let Ok(v) = value.to_str() {
            headers.insert(name.as_str().to_string(), v.to_string());
        }
    }

    let body = match Limited::new(body, max_body_size).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) if err.is::<LengthLimitError>() => {
            warn!("Request body exceeds {} bytes", max_body_size);
            return Err(error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                "request body too large",
            ));
        }
        Err(err) => {
            warn!("Failed to read request body: {}", err);
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "failed to read request body",
            ));
        }
    };

    Ok(Request {
        method,
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers,
        body,
        path_params,
    })
}

/// Build a hyper response from a [`Response`].
fn build_response(response: Response) -> hyper::Response<Full<Bytes>> {
    let status = hyper::StatusCode::from_u16(response.status.0).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, falling back to 500 Internal Server Error",
            response.status.0
        );
        hyper::StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut built = hyper::Response::new(Full::new(response.body.unwrap_or_default()));
    *built.status_mut() = status;

    for (name, value) in response.headers {
        match (
            hyper::header::HeaderName::from_bytes(name.as_bytes()),
            hyper::header::HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                built.headers_mut().insert(name, value);
            }
            _ => warn!("Dropping invalid response header {}", name),
        }
    }

    built
}
