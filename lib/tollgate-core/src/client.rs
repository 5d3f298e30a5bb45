//! The transport capability a status check wraps.
//!
//! Anything that implements [`HttpClient`] can be wrapped by a status check,
//! and the status check is itself an [`HttpClient`]. Shared references and
//! `Arc`s of a client are clients too, so the wrapped transport does not have
//! to be owned exclusively.

use std::future::Future;
use std::sync::Arc;

use crate::{Method, Request, Response, Result};

/// Sends a request and produces a response or a failure.
///
/// Every status comes back as a response; judging it is left to wrappers.
/// Implementations are shared across tasks, hence `Send + Sync`.
pub trait HttpClient: Send + Sync {
    /// Perform one exchange.
    ///
    /// # Errors
    ///
    /// Returns an error when no complete response could be obtained
    /// (connection, TLS, timeout, malformed request), or when a wrapper
    /// rejects the response.
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).execute(request)
    }
}

impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).execute(request)
    }
}

/// One-call helpers on top of [`HttpClient::execute`].
///
/// URLs are parsed and bodies serialized before anything is sent, so those
/// failures never reach the transport.
pub trait HttpClientExt: HttpClient {
    /// `GET url`
    fn get(&self, url: &str) -> impl Future<Output = Result<Response>> + Send {
        self.send(Method::Get, url)
    }

    /// `HEAD url`
    fn head(&self, url: &str) -> impl Future<Output = Result<Response>> + Send {
        self.send(Method::Head, url)
    }

    /// `DELETE url`
    fn delete(&self, url: &str) -> impl Future<Output = Result<Response>> + Send {
        self.send(Method::Delete, url)
    }

    /// Body-less request with any method, extension methods included.
    fn send(&self, method: Method, url: &str) -> impl Future<Output = Result<Response>> + Send {
        let request = url::Url::parse(url).map(|url| Request::new(method, url));
        async move { self.execute(request?).await }
    }

    /// `POST url` with a JSON body.
    fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.send_json(Method::Post, url, body)
    }

    /// `PATCH url` with a JSON body.
    fn patch_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> impl Future<Output = Result<Response>> + Send {
        self.send_json(Method::Patch, url, body)
    }

    /// Request with a JSON body and any method.
    fn send_json<T: serde::Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: &T,
    ) -> impl Future<Output = Result<Response>> + Send {
        let request = url::Url::parse(url)
            .map_err(Into::into)
            .and_then(|url| Request::builder(method, url).json(body))
            .map(crate::RequestBuilder::build);
        async move { self.execute(request?).await }
    }
}

impl<T: HttpClient + ?Sized> HttpClientExt for T {}
