use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fox_hunt_core::{
    GameRules, GeoPoint, KeyValueStore, MemoryStore, PingOutcome, RadarSession, RandomSource,
    RngSource,
};
use std::path::{Path, PathBuf};

mod file_store;
mod output;
mod track;

use file_store::FileStore;
use output::write_replay_geojson;
use track::{read_track, TrackFix};

#[derive(Parser, Debug)]
#[command(
    name = "fox-hunt",
    author,
    version,
    about = "Hunt a hidden fox with a distance-only radar",
    long_about = "A fox is hidden somewhere within a few hundred meters of you and slowly \
                  drifts in a fixed direction. Every radar ping tells you how far away it is, \
                  but not where. Get within the capture radius to catch it.\n\n\
                  The hidden target is kept in a small JSON state file between runs."
)]
struct Args {
    /// State file holding the hidden target between runs
    #[arg(short, long, default_value = "fox-hunt-state.json")]
    state: PathBuf,

    /// JSON file overriding the game rules (spawn_radius_m, capture_radius_m, max_speed_kmh)
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hide a new fox around the given position
    New {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Seed for reproducible placement
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Fire the radar from the given position
    Ping {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },

    /// Replay a recorded walk, pinging at every fix, and export the result as GeoJSON
    Replay {
        /// Track JSON: [{ "latitude", "longitude", "timestamp" }, ...]
        #[arg(short, long)]
        track: PathBuf,

        /// Output GeoJSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Seed for reproducible placement
        #[arg(long)]
        seed: Option<u64>,

        /// Start latitude (defaults to the first fix)
        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,

        /// Start longitude (defaults to the first fix)
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    let rules = match &args.rules {
        Some(path) => load_rules(path)?,
        None => GameRules::default(),
    };

    match args.command {
        Command::New { lat, lon, seed } => {
            let store = FileStore::open(&args.state)?;
            new_game(rules, store, GeoPoint::new(lat, lon), seed)
        }
        Command::Ping { lat, lon } => {
            let store = FileStore::open(&args.state)?;
            ping(rules, store, GeoPoint::new(lat, lon)).map(|_| ())
        }
        Command::Replay {
            track,
            output,
            seed,
            lat,
            lon,
        } => replay(rules, &track, &output, seed, lat.zip(lon)),
    }
}

fn load_rules(path: &Path) -> Result<GameRules> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules {}", path.display()))?;
    let rules: GameRules = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid rules {}", path.display()))?;

    log::debug!("Loaded rules from {}: {:?}", path.display(), rules);
    Ok(rules)
}

fn now_seconds() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

fn rng_for(seed: Option<u64>) -> impl RandomSource {
    match seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_os_rng(),
    }
}

fn open_session<S: KeyValueStore>(rules: GameRules, store: S) -> Result<RadarSession<S>> {
    RadarSession::with_rules(rules, store).context("Invalid game rules")
}

fn new_game(rules: GameRules, store: FileStore, player: GeoPoint, seed: Option<u64>) -> Result<()> {
    let mut session = open_session(rules, store)?;
    session.update_player_position(player);
    session.start_new_game(&mut rng_for(seed), now_seconds())?;

    println!(
        "A fox is hiding within {:.0} m of {}. Catch it by getting within {:.0} m.",
        rules.spawn_radius_m, player, rules.capture_radius_m
    );

    Ok(())
}

fn ping(rules: GameRules, store: FileStore, player: GeoPoint) -> Result<PingOutcome> {
    let mut session = open_session(rules, store)?;

    if !session.resume()? {
        bail!("No hunt in progress. Start one with `fox-hunt new --lat <LAT> --lon <LON>`");
    }

    session.update_player_position(player);

    let outcome = session.fire_ping(now_seconds())?;
    match outcome {
        PingOutcome::Recorded(ping) => println!("Ping: the fox is {:.0} m away.", ping.radius_m),
        PingOutcome::Captured { distance_m } => {
            println!("You caught the fox! It was {:.1} m away.", distance_m)
        }
    }

    Ok(outcome)
}

/// Where a replay hides the fox: the supplied start, or else the first fix
fn replay_start(start: Option<(f64, f64)>, fixes: &[TrackFix]) -> GeoPoint {
    match start {
        Some((lat, lon)) => GeoPoint::new(lat, lon),
        None => fixes[0].position(),
    }
}

fn replay(
    rules: GameRules,
    track_path: &Path,
    output_path: &Path,
    seed: Option<u64>,
    start: Option<(f64, f64)>,
) -> Result<()> {
    let fixes = read_track(track_path)?;
    log::info!("Replaying {} fixes from {}", fixes.len(), track_path.display());

    let mut session = open_session(rules, MemoryStore::new())?;
    session.update_player_position(replay_start(start, &fixes));
    session.start_new_game(&mut rng_for(seed), fixes[0].timestamp)?;

    let mut target_path = Vec::with_capacity(fixes.len() + 1);
    target_path.extend(session.target().map(|t| t.position()));

    let mut capture = None;

    for (i, fix) in fixes.iter().enumerate() {
        session.update_player_position(fix.position());
        let outcome = session.fire_ping(fix.timestamp)?;
        target_path.extend(session.target().map(|t| t.position()));

        match outcome {
            PingOutcome::Recorded(ping) => {
                log::debug!("  Fix {}: fox at {:.1} m", i, ping.radius_m);
            }
            PingOutcome::Captured { distance_m } => {
                log::info!("  Fix {}: caught the fox at {:.1} m", i, distance_m);
                capture = session.target().map(|t| t.position());
                break;
            }
        }
    }

    if capture.is_none() {
        log::info!(
            "Track ended after {} pings without a capture",
            session.pings().len()
        );
    }

    write_replay_geojson(&session.snapshot(), &target_path, capture, output_path)
        .context("Failed to write replay GeoJSON")?;

    log::info!("Output written to: {}", output_path.display());
    Ok(())
}
