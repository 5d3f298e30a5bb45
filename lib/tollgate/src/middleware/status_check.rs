//! Status checking middleware.
//!
//! [`StatusCheck`] wraps a transport and rejects responses whose status is not
//! in the [`StatusPolicy`] allow set for the request method. It works both as
//! an [`HttpClient`] decorator and as a Tower [`Service`].
//!
//! Outcomes per request:
//!
//! | Method in policy | Transport result | Returned |
//! |------------------|------------------|----------|
//! | no | anything | transport result, untouched |
//! | yes | `Err(e)` | [`Error::Transport`] wrapping `e` |
//! | yes | allowed status | the response, untouched |
//! | yes | other status < 500 | [`Error::Status`] with [`StatusKind::Unacceptable`](crate::StatusKind) |
//! | yes | other status ≥ 500 | [`Error::Status`] with [`StatusKind::ServerError`](crate::StatusKind) |
//!
//! The rejected response stays inside the error ([`Error::response`]).
//! Nothing is retried or logged here.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::{Layer, Service};

use crate::{Error, HttpClient, Request, Response, Result, StatusPolicy};

/// Layer that checks response statuses against a [`StatusPolicy`].
///
/// # Example
///
/// ```ignore
/// use tollgate::middleware::StatusCheckLayer;
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(StatusCheckLayer::new())
///     .service(client);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatusCheckLayer {
    policy: Arc<StatusPolicy>,
}

impl StatusCheckLayer {
    /// Create a layer using the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layer using a custom policy.
    #[must_use]
    pub fn with_policy(policy: StatusPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// The policy applied by services built from this layer.
    #[must_use]
    pub fn policy(&self) -> &StatusPolicy {
        &self.policy
    }
}

impl<S> Layer<S> for StatusCheckLayer {
    type Service = StatusCheck<S>;

    fn layer(&self, inner: S) -> Self::Service {
        StatusCheck {
            inner,
            policy: Arc::clone(&self.policy),
        }
    }
}

/// Transport decorator that rejects responses outside the allowed statuses.
///
/// # Example
///
/// ```ignore
/// use tollgate::{HttpClientExt, HyperClient, StatusCheck};
///
/// let client = StatusCheck::new(HyperClient::new());
///
/// match client.get("https://api.example.com/users/42").await {
///     Ok(response) => println!("{}", response.text()?),
///     Err(err) if err.is_server_error() => println!("try again later: {err}"),
///     Err(err) => println!("{err}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StatusCheck<S> {
    inner: S,
    policy: Arc<StatusPolicy>,
}

impl<S> StatusCheck<S> {
    /// Wrap `inner` with the default policy.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            policy: Arc::default(),
        }
    }

    /// Wrap `inner` with a custom policy.
    pub fn with_policy(inner: S, policy: StatusPolicy) -> Self {
        Self {
            inner,
            policy: Arc::new(policy),
        }
    }

    /// The policy in use.
    #[must_use]
    pub fn policy(&self) -> &StatusPolicy {
        &self.policy
    }

    /// The wrapped transport.
    pub const fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Consume into the wrapped transport.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<C: HttpClient> HttpClient for StatusCheck<C> {
    async fn execute(&self, request: Request) -> Result<Response> {
        if !self.policy.covers(request.method()) {
            return self.inner.execute(request).await;
        }

        let method = request.method().clone();
        let result = self.inner.execute(request).await;
        self.policy.verify(&method, result)
    }
}

impl<S> Service<Request> for StatusCheck<S>
where
    S: Service<Request, Response = Response, Error = Error> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let method = request.method().clone();
        let policy = Arc::clone(&self.policy);

        let future = self.inner.call(request);
        Box::pin(async move { policy.verify(&method, future.await) })
    }
}

#[cfg(test)]
mod tests {
    use tower::ServiceExt;

    use super::*;
    use crate::{Method, StatusKind};

    /// Transport answering every request with a fixed outcome.
    #[derive(Debug, Clone)]
    struct Fixed(u16);

    impl HttpClient for Fixed {
        async fn execute(&self, _request: Request) -> Result<Response> {
            Ok(Response::new(self.0, ""))
        }
    }

    fn request(method: Method) -> Request {
        let url = url::Url::parse("https://example.com/").expect("url");
        Request::builder(method, url).build()
    }

    #[test]
    fn layer_default_policy() {
        let layer = StatusCheckLayer::new();
        assert_eq!(layer.policy(), &StatusPolicy::default());
    }

    #[test]
    fn layer_shares_policy() {
        let layer = StatusCheckLayer::with_policy(StatusPolicy::builder().build());
        let first = layer.layer(Fixed(200));
        let second = layer.layer(Fixed(200));

        assert!(Arc::ptr_eq(&first.policy, &second.policy));
        assert!(!first.policy().covers(&Method::Get));
    }

    #[tokio::test]
    async fn decorator_classifies() {
        let check = StatusCheck::new(Fixed(418));

        let err = check
            .execute(request(Method::Get))
            .await
            .expect_err("418 rejected");
        assert_eq!(err.status_kind(), Some(StatusKind::Unacceptable));
        assert_eq!(check.get_ref().0, 418);
    }

    #[tokio::test]
    async fn service_classifies() {
        let service = tower::service_fn(|_request: Request| async {
            Ok::<_, Error>(Response::new(502, ""))
        });
        let service = StatusCheckLayer::new().layer(service);

        let err = service
            .oneshot(request(Method::Post))
            .await
            .expect_err("502 rejected");
        assert!(err.is_server_error());
        assert_eq!(err.method(), Some(&Method::Post));
    }

    #[tokio::test]
    async fn service_passes_allowed_response() {
        let service = tower::service_fn(|_request: Request| async {
            Ok::<_, Error>(Response::new(201, "created"))
        });
        let service = StatusCheckLayer::new().layer(service);

        let response = service
            .oneshot(request(Method::Post))
            .await
            .expect("201 allowed for POST");
        assert_eq!(response.body().as_ref(), b"created");
    }
}
