//! OTP isochrone adapter.
//!
//! Sequences validation, parameter building, the transport call and
//! response parsing. Retries, timeouts and rate limiting all belong to the
//! transport; errors from it are passed up as they are.

use tracing::debug;

use crate::isochrone::Isochrones;
use crate::transport::Transport;

use super::error::IsochroneError;
use super::params::{IsochroneRequest, build_params};
use super::parse::parse_isochrones;

/// Router id OTP uses when none is configured.
const DEFAULT_ROUTER_ID: &str = "default";

/// Configuration for the OTP adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpConfig {
    /// OTP router to query
    pub router_id: String,
}

impl OtpConfig {
    /// Create a new config for the given router.
    pub fn new(router_id: impl Into<String>) -> Self {
        Self {
            router_id: router_id.into(),
        }
    }

    /// Path of the isochrone endpoint for this router.
    pub fn isochrone_path(&self) -> String {
        format!("/otp/routers/{}/isochrone", self.router_id)
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTER_ID)
    }
}

/// Run one isochrone query.
pub async fn isochrones<T: Transport>(
    transport: &T,
    config: &OtpConfig,
    request: &IsochroneRequest,
) -> Result<Isochrones, IsochroneError> {
    request.validate()?;

    let params = build_params(request);
    let path = config.isochrone_path();
    debug!(%path, ?params, dry_run = request.dry_run, "requesting isochrones");

    let response = transport.request(&path, &params, request.dry_run).await?;

    parse_isochrones(response, &request.intervals, request.location)
}

/// OpenTripPlanner isochrone client.
///
/// Bundles a transport with an [`OtpConfig`]. Holds no other state, so it
/// can be cloned or shared freely.
#[derive(Debug, Clone)]
pub struct OpenTripPlanner<T> {
    transport: T,
    config: OtpConfig,
}

impl<T: Transport> OpenTripPlanner<T> {
    /// Create a client for the default router.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, OtpConfig::default())
    }

    /// Create a client with an explicit configuration.
    pub fn with_config(transport: T, config: OtpConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Query isochrones around `request.location`.
    pub async fn isochrones(
        &self,
        request: &IsochroneRequest,
    ) -> Result<Isochrones, IsochroneError> {
        isochrones(&self.transport, &self.config, request).await
    }
}
