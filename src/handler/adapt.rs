//! Adapters turning typed business functions into [`Handler`]s.
//!
//! There is one adapter per combination of optional inputs and output:
//!
//! | adapter             | business function                 |
//! |---------------------|-----------------------------------|
//! | [`handle`]            | `f(ctx) -> Result<(), E>`         |
//! | [`with_output`]       | `f(ctx) -> Result<Out, E>`        |
//! | [`with_input`]        | `f(ctx, in) -> Result<(), E>`     |
//! | [`with_input_output`] | `f(ctx, in) -> Result<Out, E>`    |
//! | [`with_args`]         | `f(ctx, args) -> Result<(), E>`   |
//! | [`with_args_output`]  | `f(ctx, args) -> Result<Out, E>`  |
//! | [`with_input_args`]   | `f(ctx, in, args) -> Result<(), E>` |
//! | [`with`]              | `f(ctx, in, args) -> Result<Out, E>` |
//!
//! `Args` is bound from the path values and query string, `In` is decoded
//! from the JSON body. Args are bound first; either failing answers `400`
//! without calling `f`. Shapes without an output answer `{"ok":true}`.
//!
//! [`with_request`] bypasses binding and hands `f` the request itself.

use super::context::Context;
use super::respond::{write_response, SUCCESS};
use super::Handler;
use crate::bind::Bind;
use crate::error::{BoxError, Error};
use crate::http::{Request, Response};
use crate::logger::Logger;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use tracing::debug;

/// A handler running `run` for each request inside `logger`.
struct Adapter<F> {
    logger: Logger,
    run: F,
}

#[async_trait]
impl<F, Fut, Out> Handler for Adapter<F>
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out, BoxError>> + Send + 'static,
    Out: Serialize + Send + 'static,
{
    async fn call(&self, req: Request) -> Response {
        let work = async move {
            debug!(http.method = %req.method, http.url = %req.url(), "HTTP request");

            let ctx = Context::from_request(&req);
            let result = (self.run)(ctx, req).await;

            write_response(result)
        };

        self.logger.instrument(work).await
    }
}

fn adapt<F, Fut, Out>(logger: &Logger, run: F) -> impl Handler
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out, BoxError>> + Send + 'static,
    Out: Serialize + Send + 'static,
{
    Adapter {
        logger: logger.clone(),
        run,
    }
}

/// Await the business call, unless reading its inputs already failed.
async fn complete<Fut, T, E>(call: Result<Fut, Error>) -> Result<T, BoxError>
where
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    match call {
        Ok(fut) => fut.await.map_err(Into::into),
        Err(err) => Err(err.into()),
    }
}

/// Decode the request body as JSON.
pub fn decode_body<In: DeserializeOwned>(req: &Request) -> Result<In, Error> {
    serde_json::from_slice(&req.body).map_err(Error::from)
}

/// Bind `Args`, then decode `In` from the body.
fn args_and_input<Args: Bind, In: DeserializeOwned>(req: &Request) -> Result<(Args, In), Error> {
    let args = Args::bind(req)?;
    let input = decode_body(req)?;
    Ok((args, input))
}

/// No input, no output.
pub fn handle<F, Fut, E>(logger: &Logger, f: F) -> impl Handler
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    adapt(logger, move |ctx, _req| {
        let call = complete(Ok(f(ctx)));
        async move { call.await.map(|()| SUCCESS) }
    })
}

/// No input, serialised output.
pub fn with_output<Out, F, Fut, E>(logger: &Logger, f: F) -> impl Handler
where
    Out: Serialize + Send + 'static,
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    adapt(logger, move |ctx, _req| complete(Ok(f(ctx))))
}

/// JSON body input, no output.
pub fn with_input<In, F, Fut, E>(logger: &Logger, f: F) -> impl Handler
where
    In: DeserializeOwned + 'static,
    F: Fn(Context, In) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    adapt(logger, move |ctx, req| {
        let call = complete(decode_body::<In>(&req).map(|input| f(ctx, input)));
        async move { call.await.map(|()| SUCCESS) }
    })
}

/// JSON body input, serialised output.
pub fn with_input_output<In, Out, F, Fut, E>(logger: &Logger, f: F) -> impl Handler
where
    In: DeserializeOwned + 'static,
    Out: Serialize + Send + 'static,
    F: Fn(Context, In) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    adapt(logger, move |ctx, req| {
        complete(decode_body::<In>(&req).map(|input| f(ctx, input)))
    })
}

/// Bound arguments, no output.
pub fn with_args<Args, F, Fut, E>(logger: &Logger, f: F) -> impl Handler
where
    Args: Bind + 'static,
    F: Fn(Context, Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    adapt(logger, move |ctx, req| {
        let call = complete(Args::bind(&req).map(|args| f(ctx, args)));
        async move { call.await.map(|()| SUCCESS) }
    })
}

/// Bound arguments, serialised output.
pub fn with_args_output<Args, Out, F, Fut, E>(logger: &Logger, f: F) -> impl Handler
where
    Args: Bind + 'static,
    Out: Serialize + Send + 'static,
    F: Fn(Context, Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    adapt(logger, move |ctx, req| {
        complete(Args::bind(&req).map(|args| f(ctx, args)))
    })
}

/// JSON body input and bound arguments, no output.
pub fn with_input_args<In, Args, F, Fut, E>(logger: &Logger, f: F) -> impl Handler
where
    In: DeserializeOwned + 'static,
    Args: Bind + 'static,
    F: Fn(Context, In, Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    adapt(logger, move |ctx, req| {
        let call = complete(
            args_and_input::<Args, In>(&req).map(|(args, input)| f(ctx, input, args)),
        );
        async move { call.await.map(|()| SUCCESS) }
    })
}

/// JSON body input and bound arguments, serialised output.
pub fn with<In, Args, Out, F, Fut, E>(logger: &Logger, f: F) -> impl Handler
where
    In: DeserializeOwned + 'static,
    Args: Bind + 'static,
    Out: Serialize + Send + 'static,
    F: Fn(Context, In, Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    adapt(logger, move |ctx, req| {
        complete(args_and_input::<Args, In>(&req).map(|(args, input)| f(ctx, input, args)))
    })
}

/// The plain request, serialised output.
pub fn with_request<Out, F, Fut, E>(logger: &Logger, f: F) -> impl Handler
where
    Out: Serialize + Send + 'static,
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    adapt(logger, move |_ctx, req| complete(Ok(f(req))))
}
