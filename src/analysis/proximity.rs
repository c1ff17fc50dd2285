//! Closest-approach computation.
//!
//! Distances are great-circle kilometres on a spherical Earth (mean
//! radius 6371.0 km, via the haversine formula). The track is sampled at
//! its forecast points only: the result is the closest *forecast
//! point*, not the closest point along an interpolated path between
//! them. Sub-segment interpolation would go here if it is ever needed.

use haversine::{distance, Units};

use crate::model::{Location, ProximityResult, Storm};

// ---------------------------------------------------------------------------
// Distance
// ---------------------------------------------------------------------------

/// Great-circle distance between two coordinates, in kilometres.
pub fn great_circle_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    distance(
        haversine::Location { latitude: lat1, longitude: lon1 },
        haversine::Location { latitude: lat2, longitude: lon2 },
        Units::Kilometers,
    )
}

// ---------------------------------------------------------------------------
// Closest approach
// ---------------------------------------------------------------------------

/// Minimum point-wise distance between a storm's track and a location,
/// with the forecast point achieving it.
///
/// Ties (several points at the same minimum distance) resolve to the
/// earliest such point: the scan runs in track order and only a strictly
/// smaller distance replaces the current best. Returns `None` for an
/// empty track, which the parser never produces.
pub fn closest_approach(storm: &Storm, location: &Location) -> Option<ProximityResult> {
    let mut best: Option<(f64, usize)> = None;

    for (index, point) in storm.track.iter().enumerate() {
        let dist = great_circle_km(
            point.latitude,
            point.longitude,
            location.latitude,
            location.longitude,
        );
        match best {
            Some((min_dist, _)) if dist >= min_dist => {}
            _ => best = Some((dist, index)),
        }
    }

    best.map(|(distance_km, index)| ProximityResult {
        location: location.name.clone(),
        distance_km,
        closest: storm.track[index].clone(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ForecastPoint;
    use chrono::{TimeZone, Utc};

    fn point_at(hour: u32, latitude: f64, longitude: f64) -> ForecastPoint {
        ForecastPoint {
            time: Utc.with_ymd_and_hms(2024, 8, 1, hour, 0, 0).unwrap(),
            latitude,
            longitude,
            wind_kt: 80,
        }
    }

    fn st_barths() -> Location {
        Location {
            name: "St. Barths".to_string(),
            latitude: 17.9,
            longitude: -62.83,
        }
    }

    #[test]
    fn test_distance_is_never_negative() {
        let coords = [
            (17.9, -62.83, 18.33, -64.73),
            (0.0, 0.0, 0.0, 0.0),
            (-45.0, 170.0, 60.0, -150.0),
            (89.9, 0.0, -89.9, 180.0),
        ];
        for (lat1, lon1, lat2, lon2) in coords {
            let d = great_circle_km(lat1, lon1, lat2, lon2);
            assert!(d >= 0.0, "distance({lat1},{lon1} -> {lat2},{lon2}) = {d}");
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let d1 = great_circle_km(17.9, -62.83, 18.33, -64.73);
        let d2 = great_circle_km(18.33, -64.73, 17.9, -62.83);
        assert!(
            (d1 - d2).abs() < 1e-9,
            "distance must be symmetric: {} vs {}",
            d1,
            d2
        );
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let d = great_circle_km(17.9, -62.83, 17.9, -62.83);
        assert!(d.abs() < 1e-9, "self-distance should be 0, got {}", d);
    }

    #[test]
    fn test_one_degree_of_latitude_is_about_111_km() {
        // pi * 6371 / 180 = 111.19 km. A coarse corridor catches a wrong
        // Earth radius or degree/radian mixups.
        let d = great_circle_km(17.0, -63.0, 18.0, -63.0);
        assert!(
            (d - 111.19).abs() < 0.1,
            "1 degree of latitude should be ~111.19 km, got {}",
            d
        );
    }

    #[test]
    fn test_closest_approach_picks_minimum_point() {
        // Three points due north of St. Barths: ~108 km, ~216 km, ~324 km.
        let storm = Storm {
            name: "Tammy".to_string(),
            track: vec![
                point_at(0, 18.8712673, -62.83),
                point_at(6, 19.8425346, -62.83),
                point_at(12, 20.8138019, -62.83),
            ],
        };
        let result = closest_approach(&storm, &st_barths()).expect("non-empty track");
        assert!(
            (result.distance_km - 108.0).abs() < 0.05,
            "closest point should be ~108 km out, got {}",
            result.distance_km
        );
        assert_eq!(result.closest, storm.track[0]);
        assert_eq!(result.location, "St. Barths");
    }

    #[test]
    fn test_closest_approach_is_not_order_dependent() {
        // Same points, nearest one last — the minimum must still win.
        let storm = Storm {
            name: "Tammy".to_string(),
            track: vec![
                point_at(0, 20.8138019, -62.83),
                point_at(6, 19.8425346, -62.83),
                point_at(12, 18.8712673, -62.83),
            ],
        };
        let result = closest_approach(&storm, &st_barths()).unwrap();
        assert_eq!(result.closest.time, storm.track[2].time);
    }

    #[test]
    fn test_tie_resolves_to_earliest_point() {
        // Two points exactly one degree north and south of the location:
        // identical distances, so the earlier forecast point must win.
        let location = Location {
            name: "Mid".to_string(),
            latitude: 18.0,
            longitude: -64.0,
        };
        let storm = Storm {
            name: "Mirror".to_string(),
            track: vec![point_at(0, 19.0, -64.0), point_at(6, 17.0, -64.0)],
        };
        let result = closest_approach(&storm, &location).unwrap();
        assert_eq!(
            result.closest.time,
            storm.track[0].time,
            "equal distances must resolve to the earliest forecast point"
        );
    }

    #[test]
    fn test_empty_track_yields_none() {
        let storm = Storm { name: "Ghost".to_string(), track: vec![] };
        assert!(closest_approach(&storm, &st_barths()).is_none());
    }
}
