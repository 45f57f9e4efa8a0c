//! Hand cricket tournament action server.
//!
//! Spawns a single tournament actor and serves the Blink action endpoints
//! in front of it.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use hand_cricket::{
    DiceRoller, RandomDice, SessionTracker, TournamentActor, chain::InstructionEncoder,
};
use hc_server::{api, config::ServerConfig, logging, metrics};
use pico_args::Arguments;
use tracing::{info, warn};

const HELP: &str = "\
Run the hand cricket tournament action server

USAGE:
  hc_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --admin      PUBKEY      Tournament administrator    [default: env TOURNAMENT_ADMIN]
  --capacity   N           Maximum registrations       [default: env TOURNAMENT_CAPACITY or 100]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  TOURNAMENT_ADMIN         Base58 public key of the administrator (required)
  ENTRY_FEE_LAMPORTS       Entry fee in lamports
  ALLOW_PLAY_AFTER_END     Keep accepting turns after the tournament ends
  DICE_SEED                Fixed dice seed for reproducible runs
  METRICS_BIND             Prometheus exporter address
  (See .env file for all configuration options)
";

struct Args {
    bind: Option<SocketAddr>,
    admin: Option<String>,
    capacity: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        admin: pargs.opt_value_from_str("--admin")?,
        capacity: pargs.opt_value_from_str("--capacity")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.admin, args.capacity)?;
    config.validate()?;

    info!(
        "Starting tournament server at {} (capacity {}, admin {})",
        config.bind, config.tracker.capacity, config.tracker.admin
    );

    if let Some(metrics_bind) = config.metrics_bind {
        match metrics::init_metrics(metrics_bind) {
            Ok(()) => info!("Prometheus metrics at http://{}/metrics", metrics_bind),
            Err(e) => warn!("{}", e),
        }
    }

    let dice: Box<dyn DiceRoller> = match config.dice_seed {
        Some(seed) => {
            warn!("Using fixed dice seed {}; outcomes are predictable", seed);
            Box::new(RandomDice::seeded(seed))
        }
        None => Box::new(RandomDice::new()),
    };

    if config.tracker.allow_play_after_end {
        info!("Turns stay open after the tournament ends");
    }

    let tracker = SessionTracker::new(config.tracker.clone(), dice);
    let tournament = TournamentActor::spawn(tracker);

    let api_state = api::AppState {
        tournament: tournament.clone(),
        gateway: Arc::new(InstructionEncoder::new()),
        action: Arc::new(config.action.clone()),
    };

    let app = api::create_router(api_state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");
    let _ = tournament.close().await;

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
}
