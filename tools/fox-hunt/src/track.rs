use anyhow::{bail, Context, Result};
use fox_hunt_core::GeoPoint;
use serde::Deserialize;
use std::path::Path;

/// One recorded location fix
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TrackFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Seconds since the Unix epoch
    pub timestamp: f64,
}

impl TrackFix {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Parse a track and check that it is non-empty and time-ordered
pub fn parse_track(json: &str) -> Result<Vec<TrackFix>> {
    let fixes: Vec<TrackFix> = serde_json::from_str(json).context("Malformed track JSON")?;

    if fixes.is_empty() {
        bail!("Track contains no fixes");
    }

    if let Some(i) = fixes
        .windows(2)
        .position(|w| w[1].timestamp < w[0].timestamp)
    {
        bail!(
            "Track timestamps go backwards at fix {} ({} after {})",
            i + 1,
            fixes[i + 1].timestamp,
            fixes[i].timestamp
        );
    }

    Ok(fixes)
}

pub fn read_track(path: &Path) -> Result<Vec<TrackFix>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read track {}", path.display()))?;

    parse_track(&raw).with_context(|| format!("Invalid track {}", path.display()))
}
