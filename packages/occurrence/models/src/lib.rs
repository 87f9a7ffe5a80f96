#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Occurrence domain types for the RO-PE incident-reporting system.
//!
//! This crate defines the canonical occurrence record shared across the
//! store, query, and server crates: the closed report-type taxonomy, the
//! `GeoJSON`-style point type, and the creation-time validation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Closed set of occurrence report categories.
///
/// Submissions must carry one of these types; the query layer filters on
/// the serialized name with an exact string match and performs no enum
/// validation of its own.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OccurrenceType {
    /// Robbery or mugging.
    Assault,
    /// Traffic accident.
    Accident,
    /// Property damage or defacement.
    Vandalism,
    /// Fire or smoke.
    Fire,
    /// Pothole or other roadway hazard.
    RoadHazard,
    /// Street lighting outage.
    LightingOutage,
    /// Accumulated garbage or illegal dumping.
    IllegalDumping,
    /// Street or property flooding.
    Flooding,
    /// Anything not covered by the other categories.
    Other,
}

impl OccurrenceType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Assault,
            Self::Accident,
            Self::Vandalism,
            Self::Fire,
            Self::RoadHazard,
            Self::LightingOutage,
            Self::IllegalDumping,
            Self::Flooding,
            Self::Other,
        ]
    }
}

/// A `GeoJSON`-style point in WGS84 coordinates.
///
/// `coordinates` is always `[longitude, latitude]` — the storage order is
/// reversed from the spoken (lat, lng) convention, and consumers index into
/// the pair positionally, so the order must never be swapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Geometry type tag; always `"Point"`.
    #[serde(rename = "type", default = "point_type")]
    pub geometry_type: String,
    /// `[longitude, latitude]` pair.
    pub coordinates: [f64; 2],
}

fn point_type() -> String {
    "Point".to_string()
}

impl GeoPoint {
    /// Creates a point from longitude and latitude, validating that both
    /// are finite and within geographic range.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinateError`] if either value is non-finite or
    /// outside -180..=180 (longitude) / -90..=90 (latitude).
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, InvalidCoordinateError> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinateError {
                axis: CoordinateAxis::Longitude,
                value: longitude,
            });
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinateError {
                axis: CoordinateAxis::Latitude,
                value: latitude,
            });
        }
        Ok(Self {
            geometry_type: point_type(),
            coordinates: [longitude, latitude],
        })
    }

    /// Returns the longitude (first coordinate).
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    /// Returns the latitude (second coordinate).
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

/// Axis of a rejected coordinate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateAxis {
    /// East-west axis, valid range -180..=180.
    Longitude,
    /// North-south axis, valid range -90..=90.
    Latitude,
}

impl CoordinateAxis {
    /// Returns the lowercase axis name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Longitude => "longitude",
            Self::Latitude => "latitude",
        }
    }
}

/// Error returned when a coordinate value is non-finite or out of range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinateError {
    /// Which axis was rejected.
    pub axis: CoordinateAxis,
    /// The rejected value.
    pub value: f64,
}

impl std::fmt::Display for InvalidCoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid {} value {}: expected a finite number in geographic range",
            self.axis.name(),
            self.value
        )
    }
}

impl std::error::Error for InvalidCoordinateError {}

/// A single crowdsourced incident report.
///
/// Immutable once created: reports are never updated or deleted, only
/// inserted and read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    /// Unique identifier, assigned at creation.
    pub id: Uuid,
    /// Report category.
    #[serde(rename = "type")]
    pub occurrence_type: OccurrenceType,
    /// Free-text description of the incident.
    pub description: String,
    /// Where the incident happened.
    pub location: GeoPoint,
    /// Reference to a stored photo, if one was attached.
    pub photo_url: Option<String>,
    /// When the report was created. Used for both sorting and time-window
    /// filtering.
    pub created_at: DateTime<Utc>,
}

/// Length bounds for occurrence descriptions, in characters.
///
/// A policy object rather than hard constants: deployments disagree on the
/// bounds, so they are injected from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptionPolicy {
    /// Minimum accepted length.
    pub min_chars: usize,
    /// Maximum accepted length.
    pub max_chars: usize,
}

impl Default for DescriptionPolicy {
    fn default() -> Self {
        Self {
            min_chars: 10,
            max_chars: 2000,
        }
    }
}

/// A validated-but-unsaved occurrence submission.
///
/// The store assigns the `id` and `created_at` fields at insertion time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOccurrence {
    /// Report category.
    pub occurrence_type: OccurrenceType,
    /// Free-text description of the incident.
    pub description: String,
    /// Where the incident happened.
    pub location: GeoPoint,
    /// Reference to a stored photo, if one was attached.
    pub photo_url: Option<String>,
}

impl NewOccurrence {
    /// Checks the description against the given length policy.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDescriptionError`] if the description length falls
    /// outside the policy bounds.
    pub fn validate(&self, policy: &DescriptionPolicy) -> Result<(), InvalidDescriptionError> {
        let len = self.description.chars().count();
        if len < policy.min_chars || len > policy.max_chars {
            return Err(InvalidDescriptionError {
                length: len,
                policy: *policy,
            });
        }
        Ok(())
    }
}

/// Error returned when a description violates the length policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDescriptionError {
    /// Actual description length in characters.
    pub length: usize,
    /// The policy that rejected it.
    pub policy: DescriptionPolicy,
}

impl std::fmt::Display for InvalidDescriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "description length {} out of bounds: expected {}-{} characters",
            self.length, self.policy.min_chars, self.policy.max_chars
        )
    }
}

impl std::error::Error for InvalidDescriptionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_roundtrip() {
        for ty in OccurrenceType::all() {
            let name = ty.as_ref();
            let parsed: OccurrenceType = name.parse().unwrap();
            assert_eq!(parsed, *ty);
        }
    }

    #[test]
    fn geo_point_stores_longitude_first() {
        let point = GeoPoint::new(-46.633, -23.55).unwrap();
        assert!((point.coordinates[0] - -46.633).abs() < f64::EPSILON);
        assert!((point.coordinates[1] - -23.55).abs() < f64::EPSILON);
        assert!((point.longitude() - -46.633).abs() < f64::EPSILON);
        assert!((point.latitude() - -23.55).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        let err = GeoPoint::new(181.0, 0.0).unwrap_err();
        assert_eq!(err.axis, CoordinateAxis::Longitude);
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let err = GeoPoint::new(0.0, -90.5).unwrap_err();
        assert_eq!(err.axis, CoordinateAxis::Latitude);
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn accepts_boundary_coordinates() {
        assert!(GeoPoint::new(-180.0, -90.0).is_ok());
        assert!(GeoPoint::new(180.0, 90.0).is_ok());
    }

    #[test]
    fn description_policy_bounds() {
        let policy = DescriptionPolicy::default();
        let make = |len: usize| NewOccurrence {
            occurrence_type: OccurrenceType::Other,
            description: "x".repeat(len),
            location: GeoPoint::new(0.0, 0.0).unwrap(),
            photo_url: None,
        };

        assert!(make(9).validate(&policy).is_err());
        assert!(make(10).validate(&policy).is_ok());
        assert!(make(2000).validate(&policy).is_ok());
        assert!(make(2001).validate(&policy).is_err());
    }

    #[test]
    fn description_length_counts_characters_not_bytes() {
        let policy = DescriptionPolicy {
            min_chars: 5,
            max_chars: 10,
        };
        let new = NewOccurrence {
            occurrence_type: OccurrenceType::Flooding,
            description: "água aqui".to_string(),
            location: GeoPoint::new(0.0, 0.0).unwrap(),
            photo_url: None,
        };
        assert!(new.validate(&policy).is_ok());
    }
}
