//! Responses returned by a transport.
//!
//! A status check hands an allowed response back untouched and keeps a
//! rejected one inside the error:
//!
//! ```ignore
//! match client.execute(request).await {
//!     Ok(response) => println!("{}", response.text()?),
//!     Err(err) => {
//!         if let Some(response) = err.response() {
//!             println!("rejected {} ({:?})", response.status(), response.header("retry-after"));
//!         }
//!     }
//! }
//! ```

use std::collections::HashMap;

use bytes::Bytes;

use crate::{Error, Result};

/// Status, headers and fully read body of an exchange.
///
/// Header names are stored lowercase, as the transport receives them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Bytes,
}

impl Response {
    /// A response without headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Numeric status code, as checked against a [`StatusSet`](crate::StatusSet).
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase registered for the status, e.g. `"Not Found"`.
    #[must_use]
    pub fn canonical_reason(&self) -> Option<&'static str> {
        http::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|code| code.canonical_reason())
    }

    /// All headers, names lowercase.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Header value, case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Raw body bytes.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Take the body.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }

    /// 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.status, 400..=499)
    }

    /// 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self.status, 500..=599)
    }

    /// Decode the body as JSON, reporting where decoding failed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::JsonDeserialization`] with the path of the failing field.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        let mut deserializer = serde_json::Deserializer::from_slice(&self.body);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            Error::JsonDeserialization {
                path: err.path().to_string(),
                source: err.into_inner(),
            }
        })
    }

    /// The body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }
}
