#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the RO-PE server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the domain types in `rope_occurrence_models` to allow independent
//! evolution of the API contract.

use chrono::{DateTime, Utc};
use rope_auth::{Identity, Session};
use rope_occurrence_models::{GeoPoint, Occurrence, OccurrenceType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An occurrence as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOccurrence {
    /// Unique occurrence ID.
    pub id: Uuid,
    /// Report category.
    #[serde(rename = "type")]
    pub occurrence_type: OccurrenceType,
    /// Free-text description.
    pub description: String,
    /// `GeoJSON` point; coordinates are `[longitude, latitude]`.
    pub location: GeoPoint,
    /// Stored photo reference, if any.
    pub photo_url: Option<String>,
    /// When the report was created (ISO 8601).
    pub created_at: DateTime<Utc>,
}

impl From<Occurrence> for ApiOccurrence {
    fn from(occurrence: Occurrence) -> Self {
        Self {
            id: occurrence.id,
            occurrence_type: occurrence.occurrence_type,
            description: occurrence.description,
            location: occurrence.location,
            photo_url: occurrence.photo_url,
            created_at: occurrence.created_at,
        }
    }
}

/// Body of `POST /api/occurrences`.
///
/// `photo_url` is whatever reference the upload collaborator produced;
/// the server treats it as opaque.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOccurrenceRequest {
    /// Report category name.
    #[serde(rename = "type")]
    pub occurrence_type: String,
    /// Free-text description.
    pub description: String,
    /// Latitude of the incident, in degrees.
    pub lat: f64,
    /// Longitude of the incident, in degrees.
    pub lng: f64,
    /// Stored photo reference, if a photo was uploaded.
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// A user as exposed by the API. The password digest never leaves the
/// auth service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    /// Unique user ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl From<Identity> for ApiUser {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.user_id,
            name: identity.name,
            email: identity.email,
        }
    }
}

/// Successful registration or login response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated user.
    pub user: ApiUser,
}

impl From<Session> for AuthResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            user: session.user.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Number of stored occurrences.
    pub occurrences: usize,
}

/// Error payload for 4xx/5xx responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable description of what went wrong.
    pub error: String,
}

impl ApiError {
    /// Creates an error payload from any displayable error.
    #[must_use]
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}
