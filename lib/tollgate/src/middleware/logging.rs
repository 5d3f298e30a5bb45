//! Exchange logging with `tracing`.
//!
//! Each call runs in an `http_request` span and ends with one event carrying a
//! `verdict`: `accepted`, `unacceptable`, `server_error` or `transport`. Placed
//! outside a [`StatusCheckLayer`](super::StatusCheckLayer) it reports what the
//! policy decided; placed inside, every response is `accepted`.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{Error, Request, Response, Result, StatusKind};

/// Layer producing [`Logging`] services.
///
/// ```ignore
/// let service = ServiceBuilder::new()
///     .layer(LoggingLayer::new())
///     .layer(StatusCheckLayer::new())
///     .service(client);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoggingLayer {
    verbose: bool,
}

impl LoggingLayer {
    /// One event per exchange at `INFO`, failures at `WARN`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also log outgoing headers and deadline at `DEBUG`.
    #[must_use]
    pub const fn debug() -> Self {
        Self { verbose: true }
    }

    /// Whether request details are logged.
    #[must_use]
    pub const fn is_verbose(&self) -> bool {
        self.verbose
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            verbose: self.verbose,
        }
    }
}

/// Service logging each exchange, built by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    verbose: bool,
}

/// How an exchange ended, as seen from this layer.
fn verdict(result: &Result<Response>) -> &'static str {
    match result {
        Ok(_) => "accepted",
        Err(Error::Status(rejected)) => match rejected.kind() {
            StatusKind::Unacceptable => "unacceptable",
            StatusKind::ServerError => "server_error",
        },
        Err(_) => "transport",
    }
}

fn record(result: &Result<Response>, start: Instant) {
    let elapsed = start.elapsed();
    let verdict = verdict(result);
    match result {
        Ok(response) => info!(
            status = response.status(),
            reason = response.canonical_reason().unwrap_or_default(),
            ?elapsed,
            verdict,
            "exchange done"
        ),
        Err(err) => warn!(
            status = err.response().map(Response::status),
            error = %err,
            ?elapsed,
            verdict,
            "exchange failed"
        ),
    }
}

impl<S> Service<Request> for Logging<S>
where
    S: Service<Request, Response = Response, Error = Error> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let span = info_span!(
            "http_request",
            method = %request.method(),
            url = %request.url()
        );
        span.in_scope(|| {
            if self.verbose {
                debug!(headers = ?request.headers(), deadline = ?request.timeout(), "sending");
            }
        });

        let start = Instant::now();
        let pending = self.inner.call(request);
        Box::pin(
            async move {
                let result = pending.await;
                record(&result, start);
                result
            }
            .instrument(span),
        )
    }
}
