//! Core types and traits for the tollgate status-checking HTTP client.
//!
//! This crate provides the foundational types used by tollgate:
//! - [`Method`] - HTTP method enum, including extension methods
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] - HTTP response type
//! - [`Error`] and [`Result`] - Error handling
//! - [`HttpClient`] - Transport trait for HTTP execution
//! - [`StatusPolicy`] and [`StatusSet`] - Per-method status allow-lists
//! - [`StatusError`] and [`StatusKind`] - Rejected responses and their classification
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod client;
mod error;
mod method;
mod policy;
pub mod prelude;
mod request;
mod response;
mod status;

pub use client::{HttpClient, HttpClientExt};
pub use error::{Error, Result};
pub use method::Method;
pub use policy::{StatusPolicy, StatusPolicyBuilder, StatusSet};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use status::{StatusError, StatusKind};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
