//! Great-circle distance and destination-point projection.
//!
//! Distances use the spherical law of cosines with the classic
//! degrees → statute miles → meters conversion. Projections use a sphere of
//! radius [`EARTH_RADIUS_M`]. The two radii differ by about 0.12%, which keeps
//! a projected point within a fraction of a percent of the requested range.

use super::{EARTH_RADIUS_M, GeoPoint};

/// Statute miles per degree of arc (60 nautical miles × 1.1515)
const MILES_PER_DEGREE: f64 = 60.0 * 1.1515;
const KILOMETERS_PER_MILE: f64 = 1.609344;

/// Great-circle distance between two points in meters.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    if a.latitude == b.latitude && a.longitude == b.longitude {
        return 0.0;
    }

    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let theta = (a.longitude - b.longitude).to_radians();

    let cos_central = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * theta.cos();

    // Rounding can push the cosine just outside [-1, 1], where acos is NaN.
    let angle = cos_central.clamp(-1.0, 1.0).acos().to_degrees();

    angle * MILES_PER_DEGREE * KILOMETERS_PER_MILE * 1000.0
}

/// Project a point `distance_m` meters from `origin` along the initial
/// `bearing_deg` (0 = north, clockwise).
pub fn destination_point(origin: GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();
    let bearing = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), normalize_longitude(lon2.to_degrees()))
}

fn normalize_longitude(lon: f64) -> f64 {
    (lon + 540.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::Distance;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn random_point(rng: &mut StdRng) -> GeoPoint {
        GeoPoint::new(
            rng.random_range(-89.0..89.0),
            rng.random_range(-180.0..180.0),
        )
    }

    #[test]
    fn test_distance_identity() {
        let p = GeoPoint::new(40.7128, -74.0060);
        assert_eq!(distance_meters(p, p), 0.0);

        let pole = GeoPoint::new(90.0, 0.0);
        assert_eq!(distance_meters(pole, pole), 0.0);
    }

    #[test]
    fn test_distance_symmetry() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let a = random_point(&mut rng);
            let b = random_point(&mut rng);
            assert_relative_eq!(
                distance_meters(a, b),
                distance_meters(b, a),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_distance_never_nan() {
        let cases = [
            (GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0)),
            (GeoPoint::new(90.0, 0.0), GeoPoint::new(-90.0, 0.0)),
            (GeoPoint::new(45.0, 10.0), GeoPoint::new(-45.0, -170.0)),
            (GeoPoint::new(40.0, -75.0), GeoPoint::new(40.0, -75.000_000_000_1)),
            (GeoPoint::new(51.477_928, -0.001_545), GeoPoint::new(51.477_928_000_1, -0.001_545)),
        ];

        for (a, b) in cases {
            let d = distance_meters(a, b);
            assert!(!d.is_nan(), "distance between {a} and {b} is NaN");
            assert!(d >= 0.0);
        }

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2000 {
            let a = random_point(&mut rng);
            let nudge = GeoPoint::new(a.latitude + 1e-12, a.longitude - 1e-12);
            assert!(!distance_meters(a, nudge).is_nan());
        }
    }

    #[test]
    fn test_antipodal_distance_is_half_circumference() {
        let d = distance_meters(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));
        assert_relative_eq!(
            d,
            180.0 * MILES_PER_DEGREE * KILOMETERS_PER_MILE * 1000.0,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_distance_agrees_with_haversine() {
        // NYC to LA is approximately 3,936 km
        let nyc = GeoPoint::new(40.7128, -74.0060);
        let la = GeoPoint::new(34.0522, -118.2437);

        let (a, b): (geo::Point, geo::Point) = (nyc.into(), la.into());
        let expected = geo::Haversine.distance(a, b);
        assert_relative_eq!(distance_meters(nyc, la), expected, max_relative = 1e-3);
        assert!((distance_meters(nyc, la) - 3_936_000.0).abs() < 50_000.0);
    }

    #[test]
    fn test_destination_due_north() {
        let origin = GeoPoint::new(0.0, 0.0);
        let quarter = std::f64::consts::FRAC_PI_2 * EARTH_RADIUS_M;

        let pole = destination_point(origin, 0.0, quarter);
        assert_relative_eq!(pole.latitude, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_destination_due_east_on_equator() {
        let origin = GeoPoint::new(0.0, 10.0);
        let one_degree = EARTH_RADIUS_M * 1f64.to_radians();

        let p = destination_point(origin, 90.0, one_degree);
        assert_relative_eq!(p.latitude, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.longitude, 11.0, epsilon = 1e-9);
    }

    #[test]
    fn test_destination_wraps_antimeridian() {
        let origin = GeoPoint::new(0.0, 179.9);
        let p = destination_point(origin, 90.0, 50_000.0);

        assert!(p.longitude < -179.0 && p.longitude >= -180.0, "got {}", p.longitude);
    }

    #[test]
    fn test_zero_distance_projection() {
        let origin = GeoPoint::new(40.0, -75.0);
        let p = destination_point(origin, 123.0, 0.0);

        assert_relative_eq!(p.latitude, origin.latitude, epsilon = 1e-12);
        assert_relative_eq!(p.longitude, origin.longitude, epsilon = 1e-12);
    }

    #[test]
    fn test_projection_round_trip() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1000 {
            let origin = GeoPoint::new(
                rng.random_range(-70.0..70.0),
                rng.random_range(-180.0..180.0),
            );
            let bearing = rng.random_range(0.0..360.0);
            // below ~10 m the law of cosines loses most of its precision to cancellation
            let d = rng.random_range(25.0..=5000.0);

            let measured = distance_meters(origin, destination_point(origin, bearing, d));
            assert_relative_eq!(measured, d, max_relative = 0.01);
        }
    }
}
