use geo::{Distance, Geodesic, Point};

use crate::errors::GeometryError;

/// Rounds a kilometer value to 2 decimal places, exact halves to even.
pub fn round_km(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Maps any finite longitude into [-180, 180).
fn wrap_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

/// Accepts latitudes in [-90, 90] and any finite longitude, which is wrapped.
fn validate_coordinate(latitude: f64, longitude: f64) -> Result<Point<f64>, GeometryError> {
    let valid = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude);
    if !valid {
        return Err(GeometryError::InvalidCoordinate {
            latitude,
            longitude,
        });
    }
    // geo points are (x = longitude, y = latitude)
    Ok(Point::new(wrap_longitude(longitude), latitude))
}

/// WGS84 geodesic distance in kilometers between two (latitude, longitude) pairs.
///
/// # Errors
///
/// Returns a [`GeometryError`] when either latitude is outside [-90, 90],
/// either value is not finite, or the solver produces a non-finite distance.
/// Longitudes outside [-180, 180] are wrapped, not rejected.
pub fn geodesic_km(from: (f64, f64), to: (f64, f64)) -> Result<f64, GeometryError> {
    let origin = validate_coordinate(from.0, from.1)?;
    let destination = validate_coordinate(to.0, to.1)?;

    let meters = Geodesic.distance(origin, destination);
    if !meters.is_finite() {
        return Err(GeometryError::NonFiniteDistance);
    }
    Ok(meters / 1000.0)
}

/// Total distance in kilometers of a route visited in the given order.
///
/// The order is taken as-is; no optimization is attempted. Routes with fewer
/// than two points have zero length. A consecutive pair whose distance cannot
/// be computed contributes nothing and summation carries on with the next pair.
/// The total is rounded to 2 decimals.
pub fn compute_day_distance(ordered_coordinates: &[(f64, f64)]) -> f64 {
    if ordered_coordinates.len() < 2 {
        return 0.0;
    }

    let total_km: f64 = ordered_coordinates
        .windows(2)
        .map(|pair| match geodesic_km(pair[0], pair[1]) {
            Ok(km) => km,
            Err(e) => {
                tracing::debug!("Skipping leg {:?} -> {:?}: {}", pair[0], pair[1], e);
                0.0
            }
        })
        .sum();

    round_km(total_km)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fewer_than_two_points_is_zero() {
        assert_eq!(compute_day_distance(&[]), 0.0);
        assert_eq!(compute_day_distance(&[(24.86, 67.0)]), 0.0);
    }

    #[test]
    fn test_one_degree_of_longitude_on_equator() {
        // WGS84 equatorial degree is ~111.319 km
        let km = compute_day_distance(&[(0.0, 0.0), (0.0, 1.0)]);
        assert_eq!(km, 111.32);
    }

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(compute_day_distance(&[(31.5, 74.3), (31.5, 74.3)]), 0.0);
    }

    #[test]
    fn test_invalid_leg_is_skipped() {
        let valid_only = compute_day_distance(&[(0.0, 0.0), (0.0, 1.0)]);
        // The leg into the bad latitude is dropped, the rest still counts.
        let with_bad_point = compute_day_distance(&[(0.0, 0.0), (0.0, 1.0), (123.0, 1.0)]);
        assert_eq!(with_bad_point, valid_only);
    }

    #[test]
    fn test_geodesic_rejects_out_of_range() {
        assert_eq!(
            geodesic_km((91.0, 0.0), (0.0, 0.0)),
            Err(GeometryError::InvalidCoordinate {
                latitude: 91.0,
                longitude: 0.0
            })
        );
        assert!(geodesic_km((0.0, 0.0), (0.0, f64::NAN)).is_err());
    }

    #[test]
    fn test_longitude_past_antimeridian_is_wrapped() {
        let wrapped = compute_day_distance(&[(0.0, 179.5), (0.0, 180.5)]);
        let in_range = compute_day_distance(&[(0.0, 179.5), (0.0, -179.5)]);
        assert_eq!(wrapped, in_range);
        assert_eq!(wrapped, 111.32);
        assert_eq!(
            geodesic_km((10.0, 370.0), (10.0, 10.0)).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(12.345_6), 12.35);
        assert_eq!(round_km(0.004), 0.0);
    }

    #[test]
    fn test_round_km_halves_to_even() {
        assert_eq!(round_km(0.125), 0.12);
        assert_eq!(round_km(0.375), 0.38);
    }
}
