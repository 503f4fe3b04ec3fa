//! OpenTripPlanner isochrone adapter.
//!
//! This module maps the OTP `/otp/routers/{router_id}/isochrone` endpoint
//! onto the provider-agnostic [`Isochrones`](crate::isochrone::Isochrones)
//! type.
//!
//! Key characteristics of the endpoint:
//! - Each requested ring is a repeated `cutoffSec` parameter
//! - Features come back in request order with no interval tag, so the
//!   response is matched to intervals by position only
//! - Optional knobs with falsy values are left out of the query

mod client;
mod error;
mod params;
mod parse;

pub use client::{OpenTripPlanner, OtpConfig, isochrones};
pub use error::IsochroneError;
pub use params::{IsochroneRequest, Profile, build_params};
pub use parse::parse_isochrones;
