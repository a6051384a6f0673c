//! Handlers and the adapters that build them from business functions.

mod adapt;
mod context;
mod respond;

pub use adapt::{
    decode_body, handle, with, with_args, with_args_output, with_input, with_input_args,
    with_input_output, with_output, with_request,
};
pub use context::{Context, REQUEST_ID_HEADER};
pub use respond::{error_status, write_error, write_json, write_response, ErrorBody, Success, SUCCESS};

use crate::http::{Request, Response};
use async_trait::async_trait;
use std::sync::Arc;

/// Something that answers HTTP requests.
///
/// Usually built with one of the adapters in this module rather than
/// implemented by hand. A handler is shared by all in-flight requests.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Answer one request.
    async fn call(&self, req: Request) -> Response;
}

/// A type-erased handler, as stored by the router.
pub type BoxedHandler = Arc<dyn Handler>;

#[async_trait]
impl Handler for BoxedHandler {
    async fn call(&self, req: Request) -> Response {
        self.as_ref().call(req).await
    }
}
