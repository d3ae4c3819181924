//! The radar game state machine.
//!
//! ```text
//! NoGame --start/resume--> Active --capture--> Won --start/resume--> Active
//! ```
//!
//! Every transition either completes fully or leaves the session untouched:
//! the next target state is computed on a copy and persisted before it is
//! committed.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{RadarError, Result},
    geodesy::{GeoPoint, distance_meters},
    motion::TargetMotion,
    placement::random_point_in_disk,
    radar::{GameRules, Ping, PingOutcome, SessionObserver, SessionSnapshot},
    random::RandomSource,
    store::{KeyValueStore, TargetRecord},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum GamePhase {
    NoGame,
    Active,
    Won,
}

pub struct RadarSession<S> {
    rules: GameRules,
    store: S,
    player: Option<GeoPoint>,
    target: Option<TargetMotion>,
    pings: Vec<Ping>,
    phase: GamePhase,
    show_win: bool,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl<S: KeyValueStore> RadarSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            rules: GameRules::default(),
            store,
            player: None,
            target: None,
            pings: Vec::new(),
            phase: GamePhase::NoGame,
            show_win: false,
            observers: Vec::new(),
        }
    }

    pub fn with_rules(rules: GameRules, store: S) -> Result<Self> {
        rules.validate()?;

        Ok(Self {
            rules,
            ..Self::new(store)
        })
    }

    /// Register an observer that is handed a snapshot after every change.
    pub fn subscribe(&mut self, observer: impl SessionObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Latest fix from the location feed. Taken as authoritative.
    pub fn update_player_position(&mut self, position: GeoPoint) {
        self.player = Some(position);
        self.notify();
    }

    /// Hide a new target around the player and forget all previous pings.
    pub fn start_new_game(&mut self, rng: &mut impl RandomSource, now: f64) -> Result<()> {
        let player = self.player.ok_or(RadarError::PositionUnavailable)?;

        let origin = random_point_in_disk(player, self.rules.spawn_radius_m, rng)?;
        let bearing_deg = rng.next_unit() * 360.0;
        let speed_kmh = rng.next_unit() * self.rules.max_speed_kmh;
        let target = TargetMotion::new(origin, bearing_deg, speed_kmh)?;

        TargetRecord::from_motion(&target).save(&mut self.store)?;

        info!(
            %player,
            bearing_deg,
            speed_kmh,
            started_at = now,
            "started new game"
        );

        self.begin(target);
        Ok(())
    }

    /// Continue a game from a persisted target, if the store holds one.
    pub fn resume(&mut self) -> Result<bool> {
        match TargetRecord::load(&self.store)? {
            Some(record) => {
                self.resume_from(record)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Continue a game from a known target state instead of placing a new one.
    pub fn resume_from(&mut self, record: TargetRecord) -> Result<()> {
        let target = record.into_motion()?;

        info!(
            position = %target.position(),
            bearing_deg = target.bearing_deg(),
            speed_kmh = target.speed_kmh(),
            "resumed game"
        );

        self.begin(target);
        Ok(())
    }

    /// Measure the distance to the target from the player's position.
    pub fn fire_ping(&mut self, now: f64) -> Result<PingOutcome> {
        let target = match (&self.target, self.phase) {
            (Some(target), GamePhase::Active) => target,
            _ => return Err(RadarError::NoActiveTarget),
        };
        let player = self.player.ok_or(RadarError::PositionUnavailable)?;

        let mut next = target.clone();
        let target_position = next.advance(now);
        let distance_m = distance_meters(player, target_position);

        debug!(%player, distance_m, timestamp = now, "radar ping");

        let outcome = if distance_m < self.rules.capture_radius_m {
            TargetRecord::clear(&mut self.store)?;

            info!(distance_m, pings = self.pings.len(), "target captured");

            self.phase = GamePhase::Won;
            self.show_win = true;
            PingOutcome::Captured { distance_m }
        } else {
            TargetRecord::from_motion(&next).save(&mut self.store)?;

            let ping = Ping::new(player, distance_m, now);
            self.pings.push(ping);
            PingOutcome::Recorded(ping)
        };

        self.target = Some(next);
        self.notify();

        Ok(outcome)
    }

    /// Dismiss the victory affordance. The game stays won.
    pub fn acknowledge_win(&mut self) -> Result<()> {
        if self.phase != GamePhase::Won {
            return Err(RadarError::GameNotWon);
        }

        self.show_win = false;
        self.notify();
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(self.phase, self.show_win, self.player, &self.pings)
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Whether a win is waiting to be acknowledged.
    pub fn won(&self) -> bool {
        self.show_win
    }

    pub fn player(&self) -> Option<GeoPoint> {
        self.player
    }

    pub fn target(&self) -> Option<&TargetMotion> {
        self.target.as_ref()
    }

    pub fn pings(&self) -> &[Ping] {
        &self.pings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn begin(&mut self, target: TargetMotion) {
        self.target = Some(target);
        self.pings.clear();
        self.phase = GamePhase::Active;
        self.show_win = false;
        self.notify();
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }

        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer.on_update(&snapshot);
        }
    }
}
