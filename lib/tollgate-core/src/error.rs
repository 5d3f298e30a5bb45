//! Error types for tollgate.
//!
//! A checked exchange fails in one of three ways:
//!
//! | Failure | Variant |
//! |---------|---------|
//! | status outside the allow set, below 500 | [`Error::Status`] with [`StatusKind::Unacceptable`] |
//! | status outside the allow set, 500 or above | [`Error::Status`] with [`StatusKind::ServerError`] |
//! | the transport failed | [`Error::Transport`] around the transport's own error |
//!
//! The remaining variants are raised by transports and request building.

use derive_more::{Display, Error, From};

use crate::{Method, Response, StatusError, StatusKind};

/// Main error type for tollgate operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Response status rejected by a [`StatusPolicy`](crate::StatusPolicy).
    #[display("{_0}")]
    #[from]
    Status(StatusError),

    /// The transport failed before a status could be checked.
    #[display("could not complete request to check status ({source})")]
    #[from(skip)]
    Transport {
        /// Error reported by the wrapped transport.
        source: Box<Error>,
    },

    /// A response head arrived but its body could not be read.
    ///
    /// `response` holds the status and headers with an empty body.
    #[display("response {} cut short: {reason}", response.status())]
    #[from(skip)]
    Incomplete {
        /// What was received.
        response: Box<Response>,
        /// Why reading stopped.
        reason: String,
    },

    /// The connection could not be established or broke.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS handshake or certificate failure.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// The request deadline passed.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The request could not be turned into an HTTP message.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// Method name is not a valid HTTP token.
    #[display("invalid HTTP method: {_0:?}")]
    #[from(skip)]
    InvalidMethod(#[error(not(source))] String),

    /// URL could not be parsed.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// Request body could not be serialized.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// Body did not match the expected type.
    #[display("JSON deserialization error at '{path}': {source}")]
    #[from(skip)]
    JsonDeserialization {
        /// Path of the failing field, e.g. `lines[1].qty`.
        path: String,
        /// Decoder error.
        source: serde_json::Error,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an error raised by the transport a status check delegates to.
    #[must_use]
    pub fn transport(source: Self) -> Self {
        Self::Transport {
            source: Box::new(source),
        }
    }

    /// The innermost error, following [`Error::Transport`] wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::Transport { source } = current {
            current = &**source;
        }
        current
    }

    /// The root cause is a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self.root_cause(), Self::Timeout)
    }

    /// The root cause is a connection failure.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self.root_cause(), Self::Connection(_))
    }

    const fn rejection(&self) -> Option<&StatusError> {
        match self {
            Self::Status(err) => Some(err),
            _ => None,
        }
    }

    /// A status policy rejected the response, whatever the kind.
    #[must_use]
    pub const fn is_unacceptable_status(&self) -> bool {
        self.rejection().is_some()
    }

    /// A status policy rejected a status of 500 or above.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_kind() == Some(StatusKind::ServerError)
    }

    /// A status policy rejected a 4xx status.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|status| (400..500).contains(&status))
    }

    /// Classification of the rejected status.
    #[must_use]
    pub fn status_kind(&self) -> Option<StatusKind> {
        self.rejection().map(StatusError::kind)
    }

    /// Method of the request whose response was rejected.
    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        self.rejection().map(StatusError::method)
    }

    /// The rejected status code.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.rejection().map(StatusError::status)
    }

    /// The response carried by this error.
    ///
    /// For a rejection this is the whole response; a transport failure
    /// exposes whatever the transport received, if anything.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Status(err) => Some(err.response()),
            Self::Incomplete { response, .. } => Some(&**response),
            Self::Transport { source } => source.response(),
            _ => None,
        }
    }

    /// Consume into the carried response, see [`Error::response`].
    #[must_use]
    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::Status(err) => Some(err.into_response()),
            Self::Incomplete { response, .. } => Some(*response),
            Self::Transport { source } => (*source).into_response(),
            _ => None,
        }
    }
}
