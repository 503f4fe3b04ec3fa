//! OpenTripPlanner isochrone client.
//!
//! Turns isochrone requests into deterministic OTP query strings and OTP
//! feature collections into provider-agnostic isochrone records.

pub mod isochrone;
pub mod otp;
pub mod transport;
