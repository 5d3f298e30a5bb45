//! Request methods, the key of every status rule.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::{Error, Result};

/// HTTP request method.
///
/// Names are case-sensitive tokens: `"GET"` is [`Method::Get`] while `"get"`
/// is an extension method that the default policy does not cover.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `HEAD`
    Head,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// `CONNECT`
    Connect,
    /// `OPTIONS`
    Options,
    /// `TRACE`
    Trace,
    /// Any other valid token, such as `PROPFIND`.
    Custom(Arc<str>),
}

const STANDARD: [Method; 9] = [
    Method::Get,
    Method::Head,
    Method::Post,
    Method::Put,
    Method::Patch,
    Method::Delete,
    Method::Connect,
    Method::Options,
    Method::Trace,
];

impl Method {
    /// Parse a method token; standard names map to their own variant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMethod`] if `token` is not a valid HTTP token.
    pub fn custom(token: &str) -> Result<Self> {
        token.parse()
    }

    /// The name sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Connect => "CONNECT",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Custom(token) => token,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        if let Some(standard) = STANDARD.iter().find(|method| method.as_str() == token) {
            return Ok(standard.clone());
        }
        http::Method::from_bytes(token.as_bytes())
            .map(|_| Self::Custom(Arc::from(token)))
            .map_err(|_| Error::InvalidMethod(token.to_owned()))
    }
}

impl TryFrom<&Method> for http::Method {
    type Error = Error;

    fn try_from(method: &Method) -> Result<Self> {
        Self::from_bytes(method.as_str().as_bytes())
            .map_err(|_| Error::InvalidMethod(method.to_string()))
    }
}
