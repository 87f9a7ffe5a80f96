#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Occurrence query builder for the RO-PE API.
//!
//! Translates the loosely-typed search parameters from the occurrences
//! endpoint (type, trailing time window, geographic radius) into a
//! normalized [`OccurrenceFilter`] and applies it to a collection of
//! occurrence records, yielding a deterministically ordered result set.
//!
//! The builder is a pure computation: the evaluation instant is injected
//! by the caller, and no I/O or logging happens here. Filter axes compose
//! with logical AND; every axis is optional.

mod distance;
mod filter;
mod period;

pub use distance::{EARTH_RADIUS_KM, haversine_km};
pub use filter::{GeoFilter, OccurrenceFilter};
pub use period::Period;

use serde::Deserialize;

/// Raw search parameters as decoded from the query string.
///
/// Every field arrives as an optional string so that malformed numeric
/// input reaches this crate's validation instead of being rejected (or
/// silently coerced) by the HTTP framework. The geographic triple is
/// standardized on the `centerLat`/`centerLng`/`radius` names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOccurrenceQuery {
    /// Occurrence type name to match exactly.
    #[serde(rename = "type")]
    pub occurrence_type: Option<String>,
    /// Trailing time window token: `24h`, `7d`, or `30d`.
    pub period: Option<String>,
    /// Latitude of the radius-filter center, in degrees.
    pub center_lat: Option<String>,
    /// Longitude of the radius-filter center, in degrees.
    pub center_lng: Option<String>,
    /// Radius around the center, in kilometers.
    pub radius: Option<String>,
}

/// Errors raised while building a filter from raw parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// A supplied value failed basic type or range validation.
    #[error("invalid value {value:?} for parameter `{field}`")]
    InvalidParameter {
        /// Name of the offending query parameter.
        field: &'static str,
        /// The rejected raw value.
        value: String,
    },
}
