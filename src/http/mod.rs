//! HTTP request and response types exchanged with handlers.

mod request;
mod response;

pub use request::{Method, Request};
pub use response::{Response, StatusCode, APPLICATION_JSON};
