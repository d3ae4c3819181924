// ============================================================================
// Errors
// ============================================================================

use crate::store::StoreError;

/// Every failure is a caller precondition violation; the session is left
/// untouched when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum RadarError {
    #[error("Player position unavailable")]
    PositionUnavailable,

    #[error("No active target")]
    NoActiveTarget,

    #[error("Game has not been won")]
    GameNotWon,

    #[error("Invalid radius: {0} m")]
    InvalidRadius(f64),

    #[error("Invalid speed: {0} km/h")]
    InvalidSpeed(f64),

    #[error("Corrupt stored value for {key}: {value:?}")]
    CorruptRecord { key: &'static str, value: String },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, RadarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            RadarError::InvalidRadius(-5.0).to_string(),
            "Invalid radius: -5 m"
        );
        assert_eq!(
            RadarError::CorruptRecord {
                key: "targetLat",
                value: "north".into(),
            }
            .to_string(),
            "Corrupt stored value for targetLat: \"north\""
        );
    }

    #[test]
    fn test_store_error_conversion() {
        let err: RadarError = StoreError::Backend("disk full".into()).into();
        assert!(matches!(err, RadarError::Store(_)));
        assert_eq!(err.to_string(), "Storage error: Storage backend failed: disk full");
    }
}
