//! Default transport: hyper-util over rustls, with a tower layer stack.
//!
//! [`HyperClient`] reports every status as a response. Rejecting statuses is
//! the job of [`StatusCheck`](crate::StatusCheck), either wrapped around the
//! client or added to the stack with [`HyperClientBuilder::with_status_check`].

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{self, Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use tower::util::BoxCloneSyncService;
use tower::{Layer, ServiceExt};
use tower_service::Service;
use tracing::debug;

#[cfg(feature = "middleware-logging")]
use crate::middleware::LoggingLayer;
use crate::middleware::StatusCheckLayer;
use crate::{Error, HttpClient, Request, Response, Result, StatusPolicy};

/// The client's layer stack, type-erased.
pub type BoxedService = BoxCloneSyncService<Request, Response, Error>;

type Wrap = Box<dyn FnOnce(BoxedService) -> BoxedService + Send + Sync>;

/// Deadlines applied by [`HyperClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Whole-exchange deadline, used when a request sets none.
    pub timeout: Duration,
    /// TCP connect deadline.
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// One request, one response, no policy.
#[derive(Clone)]
struct Exchange {
    pool: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    timeout: Duration,
}

impl Exchange {
    fn new(config: &ClientConfig) -> Self {
        let mut tcp = HttpConnector::new();
        tcp.enforce_http(false);
        tcp.set_connect_timeout(Some(config.connect_timeout));

        let roots: rustls::RootCertStore =
            webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
        let tls = rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        let connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls)
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .wrap_connector(tcp);

        Self {
            pool: Client::builder(TokioExecutor::new()).build(connector),
            timeout: config.timeout,
        }
    }

    async fn run(self, request: Request) -> Result<Response> {
        let deadline = request.timeout().unwrap_or(self.timeout);
        let outgoing = to_hyper(request)?;

        if let Ok(outcome) = tokio::time::timeout(deadline, self.round_trip(outgoing)).await {
            outcome
        } else {
            debug!(?deadline, "deadline passed");
            Err(Error::Timeout)
        }
    }

    async fn round_trip(&self, outgoing: http::Request<Full<Bytes>>) -> Result<Response> {
        let incoming = self
            .pool
            .request(outgoing)
            .await
            .map_err(|err| classify(&err))?;
        let (head, body) = incoming.into_parts();

        match body.collect().await {
            Ok(collected) => Ok(assemble(&head, collected.to_bytes())),
            Err(err) => {
                debug!(status = head.status.as_u16(), error = %err, "body read failed");
                Err(Error::Incomplete {
                    response: Box::new(assemble(&head, Bytes::new())),
                    reason: err.to_string(),
                })
            }
        }
    }
}

impl Service<Request> for Exchange {
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        Box::pin(self.clone().run(request))
    }
}

fn to_hyper(request: Request) -> Result<http::Request<Full<Bytes>>> {
    let (method, url, headers, body) = request.into_parts();

    let mut builder = http::Request::builder()
        .method(http::Method::try_from(&method)?)
        .uri(url.as_str());
    for (name, value) in &headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(body.map(Full::new).unwrap_or_default())
        .map_err(|err| Error::InvalidRequest(err.to_string()))
}

/// Status and text headers of `head` around `body`.
fn assemble(head: &http::response::Parts, body: Bytes) -> Response {
    head.headers
        .iter()
        .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?)))
        .fold(
            Response::new(head.status.as_u16(), body),
            |response, (name, value)| response.with_header(name, value),
        )
}

/// Connection or TLS failure, hyper's cause chain flattened into the message.
fn classify(err: &legacy::Error) -> Error {
    let mut detail = err.to_string();
    let mut cause = std::error::Error::source(err);
    while let Some(current) = cause {
        detail.push_str(": ");
        detail.push_str(&current.to_string());
        cause = std::error::Error::source(current);
    }
    debug!(error = %detail, connect = err.is_connect(), "exchange failed");

    let lowered = detail.to_ascii_lowercase();
    if lowered.contains("certificate") || lowered.contains("tls") {
        Error::Tls(detail)
    } else {
        Error::Connection(detail)
    }
}

/// HTTP client over hyper-util, optionally wrapped in tower layers.
///
/// Cloning is cheap and clones share the connection pool.
#[derive(Clone)]
pub struct HyperClient {
    stack: BoxedService,
    config: ClientConfig,
}

impl HyperClient {
    /// A client with default deadlines and no layers.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a client.
    #[must_use]
    pub fn builder() -> HyperClientBuilder {
        HyperClientBuilder::default()
    }

    /// Deadlines this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpClient for HyperClient {
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        self.stack.clone().oneshot(request)
    }
}

impl Service<Request> for HyperClient {
    type Response = Response;
    type Error = Error;
    type Future = <BoxedService as Service<Request>>::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.stack.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        self.stack.call(request)
    }
}

/// Builder for [`HyperClient`].
///
/// Layers wrap the transport in the order they are added, so the last one
/// added sees the request first.
#[derive(Default)]
pub struct HyperClientBuilder {
    config: ClientConfig,
    layers: Vec<Wrap>,
}

impl std::fmt::Debug for HyperClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClientBuilder")
            .field("config", &self.config)
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl HyperClientBuilder {
    /// Default whole-exchange deadline.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// TCP connect deadline.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Add a tower layer.
    ///
    /// ```ignore
    /// let client = HyperClient::builder()
    ///     .layer(StatusCheckLayer::new())
    ///     .build();
    /// ```
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.layers
            .push(Box::new(move |inner| BoxedService::new(layer.layer(inner))));
        self
    }

    /// Reject statuses outside the default [`StatusPolicy`].
    #[must_use]
    pub fn with_status_check(self) -> Self {
        self.layer(StatusCheckLayer::new())
    }

    /// Reject statuses outside `policy`.
    #[must_use]
    pub fn with_status_policy(self, policy: StatusPolicy) -> Self {
        self.layer(StatusCheckLayer::with_policy(policy))
    }

    /// Log each exchange at `INFO`.
    #[cfg(feature = "middleware-logging")]
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Log each exchange at `DEBUG`, with headers.
    #[cfg(feature = "middleware-logging")]
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> HyperClient {
        let transport = BoxedService::new(Exchange::new(&self.config));
        let stack = self
            .layers
            .into_iter()
            .fold(transport, |stack, wrap| wrap(stack));

        HyperClient {
            stack,
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Method;

    use super::*;

    fn url(raw: &str) -> url::Url {
        url::Url::parse(raw).expect("url")
    }

    #[test]
    fn default_deadlines() {
        let client = HyperClient::default();

        assert_eq!(client.config().timeout, Duration::from_secs(30));
        assert_eq!(client.config().connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn builder_sets_deadlines_and_layers() {
        let builder = HyperClient::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(2))
            .with_status_check()
            .with_status_policy(StatusPolicy::builder().build());
        insta::assert_snapshot!(
            format!("{builder:?}"),
            @"HyperClientBuilder { config: ClientConfig { timeout: 60s, connect_timeout: 2s }, layers: 2 }"
        );

        let client = builder.build();
        assert_eq!(client.config().timeout, Duration::from_secs(60));
    }

    #[test]
    fn hyper_request_carries_method_headers_and_body() {
        let purge = Method::custom("PURGE").expect("token");
        let request = Request::builder(purge, url("https://cdn.example.com/a"))
            .header("x-purge-key", "k1")
            .body("payload")
            .build();

        let outgoing = to_hyper(request).expect("valid");
        assert_eq!(outgoing.method().as_str(), "PURGE");
        assert_eq!(outgoing.uri(), "https://cdn.example.com/a");
        assert_eq!(
            outgoing.headers().get("x-purge-key").map(http::HeaderValue::as_bytes),
            Some(b"k1".as_slice())
        );
    }

    #[test]
    fn invalid_header_is_an_invalid_request() {
        let request = Request::builder(Method::Get, url("https://example.com/"))
            .header("bad header", "v")
            .build();

        let err = to_hyper(request).expect_err("space in header name");
        assert!(matches!(err, Error::InvalidRequest(_)), "{err}");
    }

    #[test]
    fn assembled_response_keeps_status_and_text_headers() {
        let opaque = http::HeaderValue::from_bytes(b"\xff").expect("obs-text");
        let (head, ()) = http::Response::builder()
            .status(503)
            .header("Retry-After", "120")
            .header("x-binary", opaque)
            .body(())
            .expect("response")
            .into_parts();

        let response = assemble(&head, Bytes::from_static(b"busy"));
        assert_eq!(response.status(), 503);
        assert_eq!(response.header("retry-after"), Some("120"));
        assert_eq!(response.header("x-binary"), None);
        assert_eq!(response.text().expect("utf-8"), "busy");
    }
}
