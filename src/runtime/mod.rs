//! Serving handlers over HTTP.

mod config;
mod router;
mod server;

pub use config::ServerConfig;
pub use router::{Lookup, Route, Router};
pub use server::Server;
