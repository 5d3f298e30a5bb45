//! HTTP client decorator that enforces per-method status allow-lists.
//!
//! Wrap any [`HttpClient`] (or Tower service) with [`StatusCheck`] and every
//! response whose status is not allowed for the request method becomes an
//! [`Error::Status`], classified as unacceptable (below 500) or server error.
//! Methods the policy does not mention pass through untouched.
//!
//! # Example
//!
//! ```ignore
//! use tollgate::prelude::*;
//!
//! let client = StatusCheck::new(HyperClient::new());
//!
//! match client.get("https://api.example.com/users/42").await {
//!     Ok(response) => println!("{}", response.status()),
//!     Err(err) if err.is_server_error() => eprintln!("server error: {err}"),
//!     Err(err) if err.is_unacceptable_status() => eprintln!("rejected: {err}"),
//!     Err(err) => eprintln!("transport failure: {}", err.root_cause()),
//! }
//! ```

mod client;
pub mod middleware;
pub mod prelude;

// Re-export client types
pub use client::{BoxedService, ClientConfig, HyperClient, HyperClientBuilder};
pub use middleware::{StatusCheck, StatusCheckLayer};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use tollgate_core::{
    Error, HttpClient, HttpClientExt, Method, Request, RequestBuilder, Response, Result,
    StatusError, StatusKind, StatusPolicy, StatusPolicyBuilder, StatusSet,
};

// Re-export http types for status codes and headers
pub use tollgate_core::{StatusCode, header};

pub use url;
