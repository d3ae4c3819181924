//! Area-uniform random placement inside a disk around a point.

use std::f64::consts::PI;

use crate::{
    error::{RadarError, Result},
    geodesy::{EARTH_RADIUS_M, GeoPoint},
    random::RandomSource,
};

/// Draw a point uniformly over the area of the disk of `radius_m` meters
/// around `center`.
///
/// The meter offsets are converted with a local flat-Earth approximation, so
/// this is only meant for radii of up to a few kilometers away from the poles.
pub fn random_point_in_disk(
    center: GeoPoint,
    radius_m: f64,
    rng: &mut impl RandomSource,
) -> Result<GeoPoint> {
    if !radius_m.is_finite() || radius_m < 0.0 {
        return Err(RadarError::InvalidRadius(radius_m));
    }

    let (north, east) = disk_offset(radius_m, rng);

    let offset_lat = north / EARTH_RADIUS_M;
    let offset_lon = east / (EARTH_RADIUS_M * center.latitude.to_radians().cos());

    let point = GeoPoint::new(
        center.latitude + offset_lat.to_degrees(),
        center.longitude + offset_lon.to_degrees(),
    );

    tracing::debug!(%center, radius_m, north, east, "placed point in disk");

    Ok(point)
}

/// North/east offset in meters.
///
/// With `a <= b`, `b` is distributed like the max of two uniforms (density
/// proportional to radius) and `a / b` is uniform, which makes the sample
/// uniform over the disk's area.
fn disk_offset(radius_m: f64, rng: &mut impl RandomSource) -> (f64, f64) {
    let mut a = rng.next_unit();
    let mut b = rng.next_unit();

    if b < a {
        std::mem::swap(&mut a, &mut b);
    }

    if b == 0.0 {
        return (0.0, 0.0);
    }

    let angle = 2.0 * PI * a / b;
    (b * radius_m * angle.cos(), b * radius_m * angle.sin())
}
