//! Outgoing requests.
//!
//! ```
//! use std::time::Duration;
//!
//! use tollgate_core::{Method, Request};
//!
//! let url = url::Url::parse("https://api.example.com/orders").expect("url");
//! let request = Request::builder(Method::Get, url)
//!     .header("Accept", "application/json")
//!     .query("page", "1")
//!     .timeout(Duration::from_secs(5))
//!     .build();
//!
//! assert_eq!(request.url().query(), Some("page=1"));
//! ```

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;

use crate::{Method, Result};

/// A request handed to an [`HttpClient`](crate::HttpClient).
///
/// A status check reads only the method and passes the request on as is, so
/// the timeout stays a deadline for the transport.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: url::Url,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
    timeout: Option<Duration>,
}

impl Request {
    /// A request without headers or body.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Start building a request.
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder {
        RequestBuilder {
            request: Self::new(method, url),
        }
    }

    /// The method the status policy is looked up with.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Target URL, query included.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// Headers as given to the builder.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Header value, by exact name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Raw body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Deadline for this request; the transport default applies when unset.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Split into what goes on the wire.
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, HashMap<String, String>, Option<Bytes>) {
        (self.method, self.url, self.headers, self.body)
    }
}

/// Builder returned by [`Request::builder`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Set a header, replacing any previous value.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.insert(name.into(), value.into());
        self
    }

    /// Append a query pair to the URL.
    #[must_use]
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.request.url.query_pairs_mut().append_pair(name, value);
        self
    }

    /// Set a raw body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.request.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonSerialization`](crate::Error::JsonSerialization)
    /// if `value` cannot be serialized.
    pub fn json<T: serde::Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(self.header("Content-Type", "application/json").body(body))
    }

    /// Override the transport timeout for this request.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = Some(timeout);
        self
    }

    /// Finish the request.
    #[must_use]
    pub fn build(self) -> Request {
        self.request
    }
}
