//! Prelude module for convenient imports.
//!
//! ```ignore
//! use tollgate::prelude::*;
//! ```

pub use crate::{
    ClientConfig, Error, HttpClient, HttpClientExt, HyperClient, Method, Request, RequestBuilder,
    Response, Result, StatusCheck, StatusCheckLayer, StatusCode, StatusError, StatusKind,
    StatusPolicy, StatusSet, header,
};
pub use serde::{Deserialize, Serialize};
