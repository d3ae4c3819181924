//! Read-only views of a session for rendering layers.

use serde::Serialize;

use crate::{
    geodesy::GeoPoint,
    radar::{GamePhase, Ping, fade_opacity},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PingView {
    #[serde(flatten)]
    pub ping: Ping,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: GamePhase,
    /// Whether the victory affordance should be shown
    pub won: bool,
    pub player: Option<GeoPoint>,
    /// Oldest first
    pub pings: Vec<PingView>,
}

impl SessionSnapshot {
    pub(crate) fn new(phase: GamePhase, won: bool, player: Option<GeoPoint>, pings: &[Ping]) -> Self {
        let newest = pings.len().saturating_sub(1);

        Self {
            phase,
            won,
            player,
            pings: pings
                .iter()
                .enumerate()
                .map(|(i, ping)| PingView {
                    ping: *ping,
                    opacity: fade_opacity(newest - i),
                })
                .collect(),
        }
    }
}

/// Receives a fresh snapshot after every state change.
pub trait SessionObserver {
    fn on_update(&mut self, snapshot: &SessionSnapshot);
}

impl<F: FnMut(&SessionSnapshot)> SessionObserver for F {
    fn on_update(&mut self, snapshot: &SessionSnapshot) {
        self(snapshot)
    }
}
