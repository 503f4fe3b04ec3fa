//! Mock transport for testing without a running backend.
//!
//! Serves canned JSON bodies keyed by request path and records every
//! request it receives so tests can assert on the exact wire parameters.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use super::Transport;
use super::error::TransportError;
use super::query::QueryParam;

/// A request as seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub path: String,
    pub params: Vec<QueryParam>,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
enum MockReply {
    Body(Value),
    Status(u16, String),
}

/// Mock transport that serves canned replies.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    replies: HashMap<String, MockReply>,
    /// Requests received so far, in order.
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    /// Create a mock with no replies configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests for `path` with `body`.
    pub fn with_body(mut self, path: impl Into<String>, body: Value) -> Self {
        self.replies.insert(path.into(), MockReply::Body(body));
        self
    }

    /// Answer requests for `path` with an HTTP error status.
    pub fn with_status(
        mut self,
        path: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        self.replies
            .insert(path.into(), MockReply::Status(status, message.into()));
        self
    }

    /// Load isochrone fixtures from a directory.
    ///
    /// Expects files named `{router_id}.json`; each is served for
    /// `/otp/routers/{router_id}/isochrone`.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, TransportError> {
        let data_dir = data_dir.as_ref();
        let mut mock = Self::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            TransportError::Mock(format!("failed to read fixture directory: {e}"))
        })?;

        for entry in entries {
            let entry = entry
                .map_err(|e| TransportError::Mock(format!("failed to read directory entry: {e}")))?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let router_id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| TransportError::Mock(format!("invalid filename: {path:?}")))?;

            let json = std::fs::read_to_string(&path)
                .map_err(|e| TransportError::Mock(format!("failed to read {path:?}: {e}")))?;

            let body: Value = serde_json::from_str(&json)
                .map_err(|e| TransportError::Mock(format!("failed to parse {path:?}: {e}")))?;

            mock = mock.with_body(format!("/otp/routers/{router_id}/isochrone"), body);
        }

        if mock.replies.is_empty() {
            return Err(TransportError::Mock(format!(
                "no fixture files found in {data_dir:?}"
            )));
        }

        Ok(mock)
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Paths that have a reply configured.
    pub fn available_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.replies.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    fn record(&self, path: &str, params: &[QueryParam], dry_run: bool) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                path: path.to_string(),
                params: params.to_vec(),
                dry_run,
            });
    }
}

impl Transport for MockTransport {
    async fn request(
        &self,
        path: &str,
        params: &[QueryParam],
        dry_run: bool,
    ) -> Result<Option<Value>, TransportError> {
        self.record(path, params, dry_run);

        if dry_run {
            return Ok(None);
        }

        match self.replies.get(path) {
            Some(MockReply::Body(body)) => Ok(Some(body.clone())),
            Some(MockReply::Status(status, message)) => {
                Err(TransportError::from_status(*status, message.clone()))
            }
            None => Err(TransportError::Api {
                status: 404,
                message: format!(
                    "no mock reply for {path}. Available: {:?}",
                    self.available_paths()
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn serves_configured_body() {
        let mock = MockTransport::new().with_body("/a", json!({"ok": true}));
        let body = mock.request("/a", &[], false).await.unwrap();
        assert_eq!(body, Some(json!({"ok": true})));
    }

    #[tokio::test]
    async fn unknown_path_returns_not_found() {
        let mock = MockTransport::new().with_body("/a", json!({}));
        let result = mock.request("/b", &[], false).await;
        assert!(matches!(
            result,
            Err(TransportError::Api { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn status_replies_are_classified() {
        let mock = MockTransport::new()
            .with_status("/limited", 429, "slow down")
            .with_status("/down", 503, "maintenance");

        assert!(matches!(
            mock.request("/limited", &[], false).await,
            Err(TransportError::OverQueryLimit)
        ));
        assert!(matches!(
            mock.request("/down", &[], false).await,
            Err(TransportError::Server { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn dry_run_returns_none_and_is_recorded() {
        let mock = MockTransport::new().with_body("/a", json!({}));
        let params = vec![QueryParam::new("fromPlace", "1,2")];

        let body = mock.request("/a", &params, true).await.unwrap();
        assert!(body.is_none());

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/a");
        assert_eq!(requests[0].params, params);
        assert!(requests[0].dry_run);
    }

    #[tokio::test]
    async fn clones_share_the_request_log() {
        let mock = MockTransport::new().with_body("/a", json!({}));
        let clone = mock.clone();
        clone.request("/a", &[], false).await.unwrap();
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn poisoned_log_still_records() {
        let mock = MockTransport::new().with_body("/a", json!({}));
        mock.request("/a", &[], false).await.unwrap();

        let log = Arc::clone(&mock.requests);
        let _ = std::thread::spawn(move || {
            let _guard = log.lock().unwrap();
            panic!("poison the request log");
        })
        .join();
        assert!(mock.requests.is_poisoned());

        mock.request("/a", &[], true).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].dry_run);
    }

    #[tokio::test]
    async fn loads_fixtures_from_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("berlin.json"),
            r#"{"type": "FeatureCollection", "features": []}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mock = MockTransport::from_dir(dir.path()).unwrap();
        assert_eq!(
            mock.available_paths(),
            vec!["/otp/routers/berlin/isochrone"]
        );

        let body = mock
            .request("/otp/routers/berlin/isochrone", &[], false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(body["type"], "FeatureCollection");
    }

    #[test]
    fn empty_fixture_dir_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            MockTransport::from_dir(dir.path()),
            Err(TransportError::Mock(_))
        ));
    }

    #[test]
    fn invalid_fixture_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("default.json"), "{not json").unwrap();
        assert!(MockTransport::from_dir(dir.path()).is_err());
    }
}
