pub mod ping;
pub mod rules;
pub mod session;
pub mod snapshot;

pub use ping::{Ping, PingOutcome, fade_opacity};
pub use rules::GameRules;
pub use session::{GamePhase, RadarSession};
pub use snapshot::{PingView, SessionObserver, SessionSnapshot};
