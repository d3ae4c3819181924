//! # fox-hunt-core
//!
//! Simulation engine for a location-based radar hunt. A target is hidden
//! near the player and drifts along a fixed bearing; each radar ping reveals
//! only the distance to it. Get within the capture radius to win.
//!
//! ## Example
//!
//! ```
//! use fox_hunt_core::prelude::*;
//!
//! let mut session = RadarSession::new(MemoryStore::new());
//! session.update_player_position(GeoPoint::new(40.0, -75.0));
//! session.start_new_game(&mut RngSource::seeded(7), 1_000.0).unwrap();
//!
//! match session.fire_ping(1_000.0).unwrap() {
//!     PingOutcome::Recorded(ping) => assert!(ping.radius_m <= 505.0),
//!     PingOutcome::Captured { distance_m } => assert!(distance_m < 25.0),
//! }
//! ```

pub mod error;
pub mod geodesy;
pub mod motion;
pub mod placement;
pub mod radar;
pub mod random;
pub mod store;

pub mod prelude {
    pub use crate::error::{RadarError, Result};
    pub use crate::geodesy::{GeoPoint, destination_point, distance_meters};
    pub use crate::motion::TargetMotion;
    pub use crate::placement::random_point_in_disk;
    pub use crate::radar::{
        GamePhase, GameRules, Ping, PingOutcome, PingView, RadarSession, SessionObserver,
        SessionSnapshot, fade_opacity,
    };
    pub use crate::random::{RandomSource, RngSource};
    pub use crate::store::{KeyValueStore, MemoryStore, StoreError, TargetRecord};
}

pub use prelude::*;
