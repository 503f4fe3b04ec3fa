//! Transports for routing backend HTTP APIs.
//!
//! Adapters never talk to the network themselves. They hand a path and a
//! parameter list to a [`Transport`] and get back either a JSON body or
//! `None` when there is no body to parse (a dry run, or a skipped error).
//!
//! Two implementations are provided:
//! - [`HttpTransport`]: reqwest-backed, with status classification and
//!   backoff on retryable failures
//! - [`MockTransport`]: serves canned JSON and records every call

mod client;
mod error;
mod mock;
mod query;
mod retry;

use std::future::Future;

use serde_json::Value;

pub use client::{HttpConfig, HttpTransport};
pub use error::TransportError;
pub use mock::{MockTransport, RecordedRequest};
pub use query::{ParamValue, QueryParam};
pub use retry::RetryConfig;

/// A capability to send one GET request to a routing backend.
pub trait Transport {
    /// Send `params` to `path` and return the decoded body.
    ///
    /// With `dry_run` set, no I/O may happen; implementations return
    /// `Ok(None)`.
    fn request(
        &self,
        path: &str,
        params: &[QueryParam],
        dry_run: bool,
    ) -> impl Future<Output = Result<Option<Value>, TransportError>> + Send;
}
