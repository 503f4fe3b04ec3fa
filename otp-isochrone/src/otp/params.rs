//! Isochrone request description and its query parameter encoding.
//!
//! Every optional field is "absent" both when it is `None` and when it
//! holds a falsy value (`0`, `0.0`, `false`, `""`). OTP treats a missing
//! knob as "use the router default", so `transfer_penalty = Some(0)` and
//! `wheelchair = Some(false)` are never sent and cannot override a
//! non-zero router default.
//!
//! NaN is not zero, so it is not treated as absent either. Non-finite
//! tuning values (`bike_speed`, `walk_speed`, `max_walk_distance`) are
//! rejected by [`IsochroneRequest::validate`] instead of being sent.

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::isochrone::Location;
use crate::transport::{ParamValue, QueryParam};

use super::error::IsochroneError;

/// Travel mode selector, e.g. `WALK` or `TRANSIT,WALK`.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Single(String),
    Multi(Vec<String>),
}

impl Profile {
    /// The wire value, or `None` if the profile is empty.
    fn to_value(&self) -> Option<ParamValue> {
        match self {
            Profile::Single(mode) if mode.is_empty() => None,
            Profile::Single(mode) => Some(ParamValue::Text(mode.clone())),
            Profile::Multi(modes) if modes.is_empty() => None,
            Profile::Multi(modes) => Some(ParamValue::Text(modes.join(","))),
        }
    }
}

impl From<&str> for Profile {
    fn from(mode: &str) -> Self {
        Profile::Single(mode.to_string())
    }
}

impl From<String> for Profile {
    fn from(mode: String) -> Self {
        Profile::Single(mode)
    }
}

impl From<Vec<String>> for Profile {
    fn from(modes: Vec<String>) -> Self {
        Profile::Multi(modes)
    }
}

impl From<Vec<&str>> for Profile {
    fn from(modes: Vec<&str>) -> Self {
        Profile::Multi(modes.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Profile {
    fn from(modes: [&str; N]) -> Self {
        Profile::Multi(modes.into_iter().map(String::from).collect())
    }
}

/// An isochrone query against an OTP router.
#[derive(Debug, Clone, PartialEq)]
pub struct IsochroneRequest {
    /// Origin point.
    pub location: Location,
    /// Ring sizes in seconds. Result `i` belongs to `intervals[i]`.
    pub intervals: Vec<u32>,
    pub profile: Option<Profile>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub arrive_by: Option<bool>,
    pub bike_speed: Option<f64>,
    pub max_time_sec: Option<u32>,
    pub walk_speed: Option<f64>,
    pub transfer_penalty: Option<u32>,
    pub wheelchair: Option<bool>,
    pub max_walk_distance: Option<f64>,
    pub min_transfer_time: Option<u32>,
    /// Ask the transport not to send anything.
    pub dry_run: bool,
}

impl IsochroneRequest {
    /// Create a request with only the mandatory fields set.
    pub fn new(location: Location, intervals: Vec<u32>) -> Self {
        Self {
            location,
            intervals,
            profile: None,
            date: None,
            time: None,
            arrive_by: None,
            bike_speed: None,
            max_time_sec: None,
            walk_speed: None,
            transfer_penalty: None,
            wheelchair: None,
            max_walk_distance: None,
            min_transfer_time: None,
            dry_run: false,
        }
    }

    pub fn with_profile(mut self, profile: impl Into<Profile>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the trip date as OTP expects it on the wire.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the trip date, formatted as `YYYY-MM-DD`.
    pub fn with_date_naive(self, date: NaiveDate) -> Self {
        self.with_date(date.format("%Y-%m-%d").to_string())
    }

    /// Set the trip time as OTP expects it on the wire.
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Set the trip time, formatted as `HH:MM:SS`.
    pub fn with_time_naive(self, time: NaiveTime) -> Self {
        self.with_time(time.format("%H:%M:%S").to_string())
    }

    pub fn with_arrive_by(mut self, arrive_by: bool) -> Self {
        self.arrive_by = Some(arrive_by);
        self
    }

    pub fn with_bike_speed(mut self, speed: f64) -> Self {
        self.bike_speed = Some(speed);
        self
    }

    pub fn with_max_time_sec(mut self, secs: u32) -> Self {
        self.max_time_sec = Some(secs);
        self
    }

    pub fn with_walk_speed(mut self, speed: f64) -> Self {
        self.walk_speed = Some(speed);
        self
    }

    pub fn with_transfer_penalty(mut self, penalty: u32) -> Self {
        self.transfer_penalty = Some(penalty);
        self
    }

    pub fn with_wheelchair(mut self, wheelchair: bool) -> Self {
        self.wheelchair = Some(wheelchair);
        self
    }

    pub fn with_max_walk_distance(mut self, meters: f64) -> Self {
        self.max_walk_distance = Some(meters);
        self
    }

    pub fn with_min_transfer_time(mut self, secs: u32) -> Self {
        self.min_transfer_time = Some(secs);
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check the mandatory fields.
    ///
    /// [`build_params`] does not call this; it encodes whatever it is given.
    pub fn validate(&self) -> Result<(), IsochroneError> {
        if !self.location.is_finite() {
            return Err(IsochroneError::InvalidRequest(format!(
                "location {} is not finite",
                self.location
            )));
        }

        let speeds = [
            ("bike_speed", self.bike_speed),
            ("walk_speed", self.walk_speed),
            ("max_walk_distance", self.max_walk_distance),
        ];
        if let Some((name, value)) = speeds
            .iter()
            .find_map(|&(name, v)| v.filter(|x| !x.is_finite()).map(|x| (name, x)))
        {
            return Err(IsochroneError::InvalidRequest(format!(
                "{name} must be finite, got {value}"
            )));
        }

        if self.intervals.is_empty() {
            return Err(IsochroneError::InvalidRequest(
                "at least one interval is required".to_string(),
            ));
        }

        if let Some(idx) = self.intervals.iter().position(|&i| i == 0) {
            return Err(IsochroneError::InvalidRequest(format!(
                "interval at position {idx} is zero"
            )));
        }

        Ok(())
    }
}

type FieldAccessor = fn(&IsochroneRequest) -> Option<ParamValue>;

/// Wire names for the optional fields.
///
/// Anything listed here is emitted once if its value is truthy.
const OPTIONAL_FIELDS: &[(&str, FieldAccessor)] = &[
    ("mode", |r| r.profile.as_ref().and_then(Profile::to_value)),
    ("date", |r| r.date.clone().map(ParamValue::from)),
    ("time", |r| r.time.clone().map(ParamValue::from)),
    ("arriveBy", |r| r.arrive_by.map(ParamValue::from)),
    ("bikeSpeed", |r| r.bike_speed.map(ParamValue::from)),
    ("maxTimeSec", |r| r.max_time_sec.map(ParamValue::from)),
    ("walkSpeed", |r| r.walk_speed.map(ParamValue::from)),
    ("transferPenalty", |r| r.transfer_penalty.map(ParamValue::from)),
    ("wheelchair", |r| r.wheelchair.map(ParamValue::from)),
    ("maxWalkDistance", |r| r.max_walk_distance.map(ParamValue::from)),
    ("minTransferTime", |r| r.min_transfer_time.map(ParamValue::from)),
];

/// Encode a request as OTP isochrone query parameters.
///
/// The result is sorted by `(name, value)` so that equal requests always
/// produce the same query string. Intervals appear as repeated `cutoffSec`
/// entries in ascending order; their position in the request is not
/// recoverable from the query.
pub fn build_params(request: &IsochroneRequest) -> Vec<QueryParam> {
    let mut params = Vec::with_capacity(1 + request.intervals.len() + OPTIONAL_FIELDS.len());

    params.push(QueryParam::new("fromPlace", request.location.to_string()));
    params.extend(
        request
            .intervals
            .iter()
            .map(|&interval| QueryParam::new("cutoffSec", interval)),
    );

    for &(name, accessor) in OPTIONAL_FIELDS {
        if let Some(value) = accessor(request).filter(ParamValue::is_truthy) {
            params.push(QueryParam { name, value });
        }
    }

    params.sort();
    debug!(count = params.len(), "built isochrone params");
    params
}
