//! Classification of responses rejected by a [`StatusPolicy`](crate::StatusPolicy).

use derive_more::{Display, Error};

use crate::{Method, Response};

/// Why a response status was rejected.
///
/// [`StatusKind::ServerError`] is a refinement of "not acceptable": both kinds
/// mean the status is outside the allow set, server errors are singled out so
/// callers can handle them differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StatusKind {
    /// Status is outside the allow set and below 500.
    #[display("the status code returned is not acceptable for the request method")]
    Unacceptable,
    /// Status is outside the allow set and 500 or above.
    #[display("the server is returning a server error")]
    ServerError,
}

impl StatusKind {
    /// Classify a status code that is known to be outside the allow set.
    #[must_use]
    pub const fn classify(status: u16) -> Self {
        if status >= 500 {
            Self::ServerError
        } else {
            Self::Unacceptable
        }
    }

    /// Returns `true` for [`StatusKind::ServerError`].
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        matches!(self, Self::ServerError)
    }
}

/// A response whose status is not allowed for the request method.
///
/// The response is kept so callers can still read headers and body.
#[derive(Debug, Display, Error)]
#[display(
    "({kind}) ({}), is not an acceptable status for method ({method})",
    describe_status(*status)
)]
pub struct StatusError {
    kind: StatusKind,
    status: u16,
    method: Method,
    response: Box<Response>,
}

impl StatusError {
    /// Build the error for `response`, classifying its status.
    #[must_use]
    pub(crate) fn new(method: Method, response: Response) -> Self {
        let status = response.status();
        Self {
            kind: StatusKind::classify(status),
            status,
            method,
            response: Box::new(response),
        }
    }

    /// Classification of the rejected status.
    #[must_use]
    pub const fn kind(&self) -> StatusKind {
        self.kind
    }

    /// The rejected status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Method of the request that produced the response.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// The rejected response.
    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Consume into the rejected response.
    #[must_use]
    pub fn into_response(self) -> Response {
        *self.response
    }
}

/// `"404 Not Found"`, or just the number when there is no canonical reason.
fn describe_status(status: u16) -> String {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map_or_else(|| status.to_string(), |reason| format!("{status} {reason}"))
}
