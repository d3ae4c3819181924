//! Constant-bearing, constant-speed target motion.

use serde::{Deserialize, Serialize};

use crate::{
    error::{RadarError, Result},
    geodesy::{GeoPoint, destination_point},
};

/// A target drifting along a fixed bearing at a fixed speed.
///
/// Motion is only applied between calls to [`TargetMotion::advance`]; the
/// first call records the timestamp and leaves the target where it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetMotion {
    origin: GeoPoint,
    bearing_deg: f64,
    speed_kmh: f64,
    current: GeoPoint,
    last_update: Option<f64>,
}

impl TargetMotion {
    pub fn new(origin: GeoPoint, bearing_deg: f64, speed_kmh: f64) -> Result<Self> {
        Self::resume(origin, bearing_deg, speed_kmh, None)
    }

    /// Rebuild a target from a persisted position. `last_update` is the
    /// timestamp of the last advance, if it was recorded.
    pub fn resume(
        position: GeoPoint,
        bearing_deg: f64,
        speed_kmh: f64,
        last_update: Option<f64>,
    ) -> Result<Self> {
        if !speed_kmh.is_finite() || speed_kmh < 0.0 {
            return Err(RadarError::InvalidSpeed(speed_kmh));
        }

        Ok(Self {
            origin: position,
            bearing_deg,
            speed_kmh,
            current: position,
            last_update,
        })
    }

    /// Move the target to where it is at `now` and return that position.
    pub fn advance(&mut self, now: f64) -> GeoPoint {
        let Some(last) = self.last_update else {
            self.last_update = Some(now);
            return self.current;
        };

        // a clock going backwards neither moves the target nor rewinds it
        let elapsed = (now - last).max(0.0);
        let distance_m = self.speed_kmh * elapsed / 3600.0 * 1000.0;

        if distance_m > 0.0 {
            self.current = destination_point(self.current, self.bearing_deg, distance_m);
        }

        self.last_update = Some(last.max(now));
        self.current
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn bearing_deg(&self) -> f64 {
        self.bearing_deg
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    pub fn position(&self) -> GeoPoint {
        self.current
    }

    pub fn last_update(&self) -> Option<f64> {
        self.last_update
    }
}
