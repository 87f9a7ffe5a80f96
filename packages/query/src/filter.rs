//! Filter construction and evaluation.

use chrono::{DateTime, Utc};
use rope_occurrence_models::{CoordinateAxis, GeoPoint, Occurrence};

use crate::distance::haversine_km;
use crate::period::Period;
use crate::{QueryError, RawOccurrenceQuery};

/// A geographic radius constraint: occurrences within `radius_km`
/// kilometers of `center` (great-circle distance) match.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFilter {
    /// Center of the search radius.
    pub center: GeoPoint,
    /// Radius in kilometers.
    pub radius_km: f64,
}

impl GeoFilter {
    fn parse(lat: &str, lng: &str, radius: &str) -> Result<Self, QueryError> {
        let lat_value = parse_number("centerLat", lat)?;
        let lng_value = parse_number("centerLng", lng)?;
        let radius_km = parse_number("radius", radius)?;

        let center = GeoPoint::new(lng_value, lat_value).map_err(|e| {
            let (field, value) = match e.axis {
                CoordinateAxis::Latitude => ("centerLat", lat),
                CoordinateAxis::Longitude => ("centerLng", lng),
            };
            QueryError::InvalidParameter {
                field,
                value: value.to_string(),
            }
        })?;

        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(QueryError::InvalidParameter {
                field: "radius",
                value: radius.to_string(),
            });
        }

        Ok(Self { center, radius_km })
    }

    fn contains(&self, point: &GeoPoint) -> bool {
        haversine_km(&self.center, point) <= self.radius_km
    }
}

/// A normalized occurrence filter.
///
/// Axes compose with logical AND; an unset axis imposes no constraint, so
/// the default filter matches every occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccurrenceFilter {
    /// Exact occurrence type name to match, case-sensitively.
    pub occurrence_type: Option<String>,
    /// Only occurrences created at or after this instant match.
    pub created_after: Option<DateTime<Utc>>,
    /// Geographic radius constraint.
    pub geo: Option<GeoFilter>,
}

impl OccurrenceFilter {
    /// Builds a filter from raw query parameters.
    ///
    /// `now` is the evaluation instant, captured once by the caller and
    /// used for all time-window math in this call. Empty-string parameters
    /// are treated as absent. An unrecognized period token means "no time
    /// constraint". The geographic filter requires all of `centerLat`,
    /// `centerLng`, and `radius`; a partial triple is silently skipped.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidParameter`] when the full geographic
    /// triple is supplied but a value is non-numeric, out of geographic
    /// range, or a negative/non-finite radius.
    pub fn from_raw(raw: &RawOccurrenceQuery, now: DateTime<Utc>) -> Result<Self, QueryError> {
        let occurrence_type = non_empty(raw.occurrence_type.as_deref()).map(str::to_string);

        let created_after = non_empty(raw.period.as_deref())
            .and_then(Period::parse)
            .map(|period| period.cutoff(now));

        let geo = match (
            non_empty(raw.center_lat.as_deref()),
            non_empty(raw.center_lng.as_deref()),
            non_empty(raw.radius.as_deref()),
        ) {
            (Some(lat), Some(lng), Some(radius)) => Some(GeoFilter::parse(lat, lng, radius)?),
            _ => None,
        };

        Ok(Self {
            occurrence_type,
            created_after,
            geo,
        })
    }

    /// Returns whether the occurrence satisfies every set axis.
    #[must_use]
    pub fn matches(&self, occurrence: &Occurrence) -> bool {
        if let Some(ty) = &self.occurrence_type
            && occurrence.occurrence_type.as_ref() != ty
        {
            return false;
        }

        if let Some(cutoff) = self.created_after
            && occurrence.created_at < cutoff
        {
            return false;
        }

        if let Some(geo) = &self.geo
            && !geo.contains(&occurrence.location)
        {
            return false;
        }

        true
    }

    /// Applies the filter to a collection of occurrences, returning the
    /// matching subset sorted newest-first.
    ///
    /// Pure with respect to the input: records are cloned, never mutated.
    #[must_use]
    pub fn apply<'a, I>(&self, occurrences: I) -> Vec<Occurrence>
    where
        I: IntoIterator<Item = &'a Occurrence>,
    {
        let mut matched: Vec<Occurrence> = occurrences
            .into_iter()
            .filter(|o| self.matches(o))
            .cloned()
            .collect();
        sort_newest_first(&mut matched);
        matched
    }
}

/// Sorts occurrences by `created_at` descending, breaking timestamp ties
/// by ascending id so repeated calls over unchanged data return the same
/// order.
pub fn sort_newest_first(occurrences: &mut [Occurrence]) {
    occurrences.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, QueryError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| QueryError::InvalidParameter {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EARTH_RADIUS_KM;
    use chrono::{Duration, TimeZone as _};
    use rope_occurrence_models::OccurrenceType;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn occurrence(
        id: u128,
        ty: OccurrenceType,
        created_at: DateTime<Utc>,
        lng: f64,
        lat: f64,
    ) -> Occurrence {
        Occurrence {
            id: Uuid::from_u128(id),
            occurrence_type: ty,
            description: "something happened here".to_string(),
            location: GeoPoint::new(lng, lat).unwrap(),
            photo_url: None,
            created_at,
        }
    }

    fn raw_geo(lat: &str, lng: &str, radius: &str) -> RawOccurrenceQuery {
        RawOccurrenceQuery {
            center_lat: Some(lat.to_string()),
            center_lng: Some(lng.to_string()),
            radius: Some(radius.to_string()),
            ..RawOccurrenceQuery::default()
        }
    }

    #[test]
    fn empty_params_return_everything_newest_first() {
        let older = occurrence(1, OccurrenceType::Fire, now() - Duration::hours(5), 0.0, 0.0);
        let newer = occurrence(2, OccurrenceType::Fire, now() - Duration::hours(1), 0.0, 0.0);

        let filter = OccurrenceFilter::from_raw(&RawOccurrenceQuery::default(), now()).unwrap();
        assert_eq!(filter, OccurrenceFilter::default());

        let results = filter.apply([&older, &newer]);
        assert_eq!(results, vec![newer, older]);
    }

    #[test]
    fn type_filter_is_exact_and_case_sensitive() {
        let assault = occurrence(1, OccurrenceType::Assault, now(), 0.0, 0.0);
        let fire = occurrence(2, OccurrenceType::Fire, now(), 0.0, 0.0);

        let raw = RawOccurrenceQuery {
            occurrence_type: Some("ASSAULT".to_string()),
            ..RawOccurrenceQuery::default()
        };
        let filter = OccurrenceFilter::from_raw(&raw, now()).unwrap();
        assert_eq!(filter.apply([&assault, &fire]), vec![assault.clone()]);

        let raw = RawOccurrenceQuery {
            occurrence_type: Some("assault".to_string()),
            ..RawOccurrenceQuery::default()
        };
        let filter = OccurrenceFilter::from_raw(&raw, now()).unwrap();
        assert!(filter.apply([&assault, &fire]).is_empty());
    }

    #[test]
    fn period_24h_window_boundaries() {
        let recent = occurrence(1, OccurrenceType::Fire, now() - Duration::hours(1), 0.0, 0.0);
        let boundary = occurrence(2, OccurrenceType::Fire, now() - Duration::hours(24), 0.0, 0.0);
        let stale = occurrence(3, OccurrenceType::Fire, now() - Duration::hours(25), 0.0, 0.0);

        let raw = RawOccurrenceQuery {
            period: Some("24h".to_string()),
            ..RawOccurrenceQuery::default()
        };
        let filter = OccurrenceFilter::from_raw(&raw, now()).unwrap();
        let results = filter.apply([&recent, &boundary, &stale]);
        assert_eq!(results, vec![recent, boundary]);
    }

    #[test]
    fn unknown_period_token_means_no_time_constraint() {
        let stale = occurrence(1, OccurrenceType::Fire, now() - Duration::days(90), 0.0, 0.0);

        let raw = RawOccurrenceQuery {
            period: Some("banana".to_string()),
            ..RawOccurrenceQuery::default()
        };
        let filter = OccurrenceFilter::from_raw(&raw, now()).unwrap();
        assert!(filter.created_after.is_none());
        assert_eq!(filter.apply([&stale]).len(), 1);
    }

    #[test]
    fn empty_string_params_are_absent() {
        let raw = RawOccurrenceQuery {
            occurrence_type: Some(String::new()),
            period: Some(String::new()),
            center_lat: Some(String::new()),
            center_lng: Some("-46.6".to_string()),
            radius: Some("2".to_string()),
        };
        let filter = OccurrenceFilter::from_raw(&raw, now()).unwrap();
        assert_eq!(filter, OccurrenceFilter::default());
    }

    #[test]
    fn partial_geo_triple_is_skipped() {
        let raw = RawOccurrenceQuery {
            center_lat: Some("-23.55".to_string()),
            radius: Some("2".to_string()),
            ..RawOccurrenceQuery::default()
        };
        let filter = OccurrenceFilter::from_raw(&raw, now()).unwrap();
        assert!(filter.geo.is_none());
    }

    #[test]
    fn malformed_radius_is_rejected() {
        let err = OccurrenceFilter::from_raw(&raw_geo("-23.55", "-46.63", "abc"), now())
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidParameter {
                field: "radius",
                value: "abc".to_string(),
            }
        );
    }

    #[test]
    fn negative_and_non_finite_radius_are_rejected() {
        assert!(OccurrenceFilter::from_raw(&raw_geo("0", "0", "-1"), now()).is_err());
        assert!(OccurrenceFilter::from_raw(&raw_geo("0", "0", "NaN"), now()).is_err());
        assert!(OccurrenceFilter::from_raw(&raw_geo("0", "0", "inf"), now()).is_err());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let err = OccurrenceFilter::from_raw(&raw_geo("95", "0", "1"), now()).unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidParameter { field: "centerLat", .. }
        ));

        let err = OccurrenceFilter::from_raw(&raw_geo("0", "-190", "1"), now()).unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidParameter { field: "centerLng", .. }
        ));
    }

    #[test]
    fn malformed_latitude_is_rejected() {
        let err = OccurrenceFilter::from_raw(&raw_geo("south", "0", "1"), now()).unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidParameter { field: "centerLat", .. }
        ));
    }

    #[test]
    fn radius_boundary_at_known_distance() {
        // One degree of longitude on the equator.
        let distance_km = EARTH_RADIUS_KM * 1.0_f64.to_radians();
        let record = occurrence(1, OccurrenceType::Fire, now(), 1.0, 0.0);

        let inside = raw_geo("0", "0", &format!("{}", distance_km * 1.000_001));
        let filter = OccurrenceFilter::from_raw(&inside, now()).unwrap();
        assert_eq!(filter.apply([&record]).len(), 1);

        let outside = raw_geo("0", "0", &format!("{}", distance_km * 0.999_999));
        let filter = OccurrenceFilter::from_raw(&outside, now()).unwrap();
        assert!(filter.apply([&record]).is_empty());
    }

    #[test]
    fn repeated_calls_return_identical_order() {
        let tied_a = occurrence(7, OccurrenceType::Fire, now(), 0.0, 0.0);
        let tied_b = occurrence(3, OccurrenceType::Fire, now(), 0.0, 0.0);
        let older = occurrence(9, OccurrenceType::Fire, now() - Duration::hours(2), 0.0, 0.0);

        let filter = OccurrenceFilter::default();
        let first = filter.apply([&tied_a, &tied_b, &older]);
        let second = filter.apply([&tied_a, &tied_b, &older]);
        assert_eq!(first, second);
        // Ties broken by ascending id.
        assert_eq!(first, vec![tied_b, tied_a, older]);
    }

    #[test]
    fn combined_type_and_period_scenario() {
        // ~2 km and ~1 km east of the center, on the equator.
        let two_km_lng = 2.0 / (EARTH_RADIUS_KM * 1.0_f64.to_radians());
        let one_km_lng = 1.0 / (EARTH_RADIUS_KM * 1.0_f64.to_radians());

        let recent_a_far = occurrence(
            1,
            OccurrenceType::Assault,
            now() - Duration::hours(1),
            two_km_lng,
            0.0,
        );
        let old_a_near = occurrence(
            2,
            OccurrenceType::Assault,
            now() - Duration::days(10),
            one_km_lng,
            0.0,
        );
        let recent_b_near = occurrence(
            3,
            OccurrenceType::Fire,
            now() - Duration::hours(1),
            one_km_lng,
            0.0,
        );
        let all = [&recent_a_far, &old_a_near, &recent_b_near];

        // Type + period: only the recent type-A record survives.
        let raw = RawOccurrenceQuery {
            occurrence_type: Some("ASSAULT".to_string()),
            period: Some("7d".to_string()),
            ..RawOccurrenceQuery::default()
        };
        let filter = OccurrenceFilter::from_raw(&raw, now()).unwrap();
        assert_eq!(filter.apply(all), vec![recent_a_far.clone()]);

        // Radius alone ignores the period: both records within 1.5 km
        // match regardless of age, ordered newest-first with the id
        // tie-break.
        let filter = OccurrenceFilter::from_raw(&raw_geo("0", "0", "1.5"), now()).unwrap();
        assert_eq!(filter.apply(all), vec![recent_b_near, old_a_near]);
    }
}
