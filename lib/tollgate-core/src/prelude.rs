//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tollgate_core::prelude::*;
//! ```

pub use crate::{
    Error, HttpClient, HttpClientExt, Method, Request, RequestBuilder, Response, Result,
    StatusCode, StatusError, StatusKind, StatusPolicy, StatusSet,
};
