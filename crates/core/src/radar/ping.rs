use serde::{Deserialize, Serialize};

use crate::geodesy::GeoPoint;

/// One radar fire: where the player stood and how far away the target was.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ping {
    pub origin_latitude: f64,
    pub origin_longitude: f64,
    pub radius_m: f64,
    pub timestamp: f64,
}

impl Ping {
    pub fn new(origin: GeoPoint, radius_m: f64, timestamp: f64) -> Self {
        Self {
            origin_latitude: origin.latitude,
            origin_longitude: origin.longitude,
            radius_m,
            timestamp,
        }
    }

    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.origin_latitude, self.origin_longitude)
    }
}

/// What a radar fire produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PingOutcome {
    /// The target was out of reach; the ping was appended to the trail
    Recorded(Ping),

    /// The target was within the capture radius
    Captured { distance_m: f64 },
}

const FADE_PER_PING: f64 = 0.2;

/// Opacity for drawing a ping `age` pings older than the newest one.
pub fn fade_opacity(age: usize) -> f64 {
    (1.0 - FADE_PER_PING * age as f64).max(0.0)
}
