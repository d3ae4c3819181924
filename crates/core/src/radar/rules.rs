use serde::{Deserialize, Serialize};

use crate::error::{RadarError, Result};

/// Tunable parameters of a hunt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// The target is placed uniformly within this distance of the player (meters)
    pub spawn_radius_m: f64,

    /// A ping closer than this catches the target (meters)
    pub capture_radius_m: f64,

    /// Target speed is drawn uniformly from `[0, max_speed_kmh)`
    pub max_speed_kmh: f64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            spawn_radius_m: 500.0,
            capture_radius_m: 25.0,
            max_speed_kmh: 2.0,
        }
    }
}

impl GameRules {
    pub fn validate(&self) -> Result<()> {
        for radius in [self.spawn_radius_m, self.capture_radius_m] {
            if !radius.is_finite() || radius < 0.0 {
                return Err(RadarError::InvalidRadius(radius));
            }
        }

        if !self.max_speed_kmh.is_finite() || self.max_speed_kmh < 0.0 {
            return Err(RadarError::InvalidSpeed(self.max_speed_kmh));
        }

        Ok(())
    }
}
