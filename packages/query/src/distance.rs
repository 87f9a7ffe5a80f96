//! Great-circle distance on the WGS84 sphere approximation.

use rope_occurrence_models::GeoPoint;

/// Earth radius in kilometers used for all radius-filter math.
///
/// Matches the constant the original deployment fed to its spherical-cap
/// queries, so a radius expressed in kilometers here selects the same cap.
pub const EARTH_RADIUS_KM: f64 = 6378.1;

/// Haversine great-circle distance between two points, in kilometers.
///
/// Operates on `[longitude, latitude]` pairs via the [`GeoPoint`]
/// accessors; axes are never swapped.
#[must_use]
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat_a = a.latitude().to_radians();
    let lat_b = b.latitude().to_radians();
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lng = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}
