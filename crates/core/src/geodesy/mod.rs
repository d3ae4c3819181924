//! Spherical-Earth geometry used by the placement and motion models.

pub mod great_circle;
pub mod point;

pub use great_circle::{destination_point, distance_meters};
pub use point::GeoPoint;

/// WGS 84 equatorial radius, used as the sphere radius for projections (meters)
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;
