//! Tower middleware layers for the tollgate HTTP client.
//!
//! Layers wrap the transport in the order they are added: the last layer
//! added is the outermost and sees the request first.
//!
//! # Available Layers
//!
//! - [`StatusCheckLayer`] - Rejects responses outside a per-method status allow set
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `middleware-logging` | `.with_logging()` / `.with_debug_logging()` helpers |
//!
//! # Example: Using the Builder API
//!
//! ```ignore
//! use tollgate::{HyperClient, StatusPolicy, Method, StatusCode};
//!
//! // Default status policy
//! let client = HyperClient::builder()
//!     .with_status_check()
//!     .build();
//!
//! // Custom policy: accept 304 on GET as well
//! let policy = StatusPolicy::default_builder()
//!     .extend(Method::Get, [StatusCode::NOT_MODIFIED])
//!     .build();
//! let client = HyperClient::builder()
//!     .with_status_policy(policy)
//!     .build();
//!
//! // Raw layer access
//! use tollgate::middleware::{LoggingLayer, StatusCheckLayer};
//! let client = HyperClient::builder()
//!     .layer(StatusCheckLayer::new())
//!     .layer(LoggingLayer::new())
//!     .build();
//! ```

mod logging;
mod status_check;

pub use logging::{Logging, LoggingLayer};
pub use status_check::{StatusCheck, StatusCheckLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
