//! Isochrone adapter error types.

use crate::transport::TransportError;

/// Errors from an isochrone query, tagged by the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum IsochroneError {
    /// Request failed validation before anything was sent
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Transport failed; the inner error is passed through untouched
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// Backend answered with something that is not a usable feature collection
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },
}

impl IsochroneError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        IsochroneError::MalformedResponse {
            message: message.into(),
        }
    }
}
