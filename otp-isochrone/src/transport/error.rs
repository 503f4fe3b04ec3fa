//! Transport error types.

/// Errors from a routing backend transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the request with 429
    #[error("over query limit")]
    OverQueryLimit,

    /// Backend returned a 4xx status other than 429
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Backend returned a 5xx status
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Response body was not valid JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Retry budget exhausted
    #[error("gave up after {attempts} attempts: {last}")]
    RetryTimeout {
        attempts: u32,
        last: Box<TransportError>,
    },

    /// Transport could not be constructed from its configuration
    #[error("invalid transport configuration: {0}")]
    InvalidConfig(String),

    /// Failure inside the mock transport (fixture loading and the like)
    #[error("mock transport: {0}")]
    Mock(String),
}

impl TransportError {
    /// Whether a request that failed this way may be sent again.
    ///
    /// Only 503 is retried, plus 429 when the caller opted in.
    pub fn is_retryable(&self, retry_over_query_limit: bool) -> bool {
        match self {
            TransportError::Server { status, .. } => *status == 503,
            TransportError::OverQueryLimit => retry_over_query_limit,
            _ => false,
        }
    }

    /// Classify a non-success HTTP status together with its body.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            429 => TransportError::OverQueryLimit,
            500..=u16::MAX => TransportError::Server { status, message },
            _ => TransportError::Api { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TransportError::OverQueryLimit;
        assert_eq!(err.to_string(), "over query limit");

        let err = TransportError::Api {
            status: 400,
            message: "bad fromPlace".into(),
        };
        assert_eq!(err.to_string(), "API error 400: bad fromPlace");

        let err = TransportError::RetryTimeout {
            attempts: 3,
            last: Box::new(TransportError::Server {
                status: 503,
                message: "busy".into(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "gave up after 3 attempts: server error 503: busy"
        );
    }

    #[test]
    fn status_classification() {
        assert!(matches!(
            TransportError::from_status(429, String::new()),
            TransportError::OverQueryLimit
        ));
        assert!(matches!(
            TransportError::from_status(404, String::new()),
            TransportError::Api { status: 404, .. }
        ));
        assert!(matches!(
            TransportError::from_status(503, String::new()),
            TransportError::Server { status: 503, .. }
        ));
    }

    #[test]
    fn retryable_statuses() {
        let unavailable = TransportError::from_status(503, String::new());
        assert!(unavailable.is_retryable(false));

        let internal = TransportError::from_status(500, String::new());
        assert!(!internal.is_retryable(true));

        let limited = TransportError::OverQueryLimit;
        assert!(!limited.is_retryable(false));
        assert!(limited.is_retryable(true));

        let api = TransportError::from_status(400, String::new());
        assert!(!api.is_retryable(true));
    }
}
