//! # Plumb - typed request binding for HTTP handlers
//!
//! Plumb turns strongly-typed business functions into HTTP handlers. A
//! handler binds its arguments from the URL (path values and query
//! string), decodes its input from a JSON body, calls the function and
//! writes the result, or the error, as JSON.
//!
//! ## Flow
//!
//! ```text
//! request ─▶ adapter ─▶ Bind (path/query ─▶ Args)
//!                    ─▶ JSON body ─▶ In
//!                    ─▶ f(ctx, In, Args) ─▶ Result<Out, E>
//!                    ─▶ 200 Out | 400 {"error"} | 500 {"error"}
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use plumb::prelude::*;
//!
//! #[derive(Bind)]
//! struct GetJob {
//!     #[bind("pk,path,required")]
//!     pk: i64,
//!     #[bind("verbose")]
//!     verbose: bool,
//! }
//!
//! #[derive(serde::Serialize)]
//! struct Job {
//!     pk: i64,
//!     verbose: bool,
//! }
//!
//! async fn get_job(_ctx: Context, args: GetJob) -> Result<Job, Error> {
//!     Ok(Job { pk: args.pk, verbose: args.verbose })
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let logger = Logger::dev();
//!     let router = Router::new().get("/jobs/{pk}", with_args_output(&logger, get_job));
//!
//!     Server::new(ServerConfig::default(), router, logger).run().await
//! }
//! ```
//!
//! ## Status codes
//!
//! - `200`: the function succeeded; the body is its output, or `{"ok":true}`.
//! - `400`: binding, body decoding, or a function returning [`Error`].
//! - `500`: any other error returned by the function.

extern crate self as plumb;

pub mod bind;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod runtime;
pub mod yaml;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::bind::{Bind, UriRef};
    pub use crate::error::{BoxError, Error, ErrorKind};
    pub use crate::handler::{
        handle, with, with_args, with_args_output, with_input, with_input_args,
        with_input_output, with_output, with_request, Context, Handler,
    };
    pub use crate::http::{Method, Request, Response, StatusCode};
    pub use crate::logger::Logger;
    pub use crate::runtime::{Router, Server, ServerConfig};
    pub use plumb_macro::Bind;
}

// Re-export for convenience
pub use bind::Bind;
pub use error::{BoxError, Error, ErrorKind};
pub use handler::{Context, Handler};
pub use http::{Request, Response};
pub use logger::Logger;
pub use plumb_macro::Bind;
pub use runtime::{Router, Server, ServerConfig};
