//! Card Brawl game server.
//!
//! Serves the HTTP API, the event stream and the static front end from one
//! listener. All players share a single game.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use card_brawl::{GameState, HubActor, HubHandle};
use cb_server::{
    api::{self, AppState},
    cards,
    config::{ConfigOverrides, ServerConfig},
    logging, metrics,
};
use pico_args::Arguments;
use tracing::{error, info, warn};

const HELP: &str = "\
Run a Card Brawl game server

USAGE:
  cb_server [OPTIONS]

OPTIONS:
  --bind              IP:PORT  Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --dir               PATH     Assets directory with cards/ and static/  [default: env ASSETS_DIR or .]
  --mailbox-capacity  N        Frames a client may lag before eviction  [default: env MAILBOX_CAPACITY or 5]
  --metrics-bind      IP:PORT  Prometheus exporter address  [default: env METRICS_BIND, disabled if unset]

FLAGS:
  -h, --help                   Print help information

ENVIRONMENT:
  SERVER_BIND, ASSETS_DIR,     Fallbacks for the options above; a .env file in
  MAILBOX_CAPACITY, METRICS_BIND  the working directory is read first
  RUST_LOG                     Log filter (e.g., debug,hyper=warn)
";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let overrides = ConfigOverrides {
        bind: pargs.opt_value_from_str("--bind")?,
        assets_dir: pargs.opt_value_from_str::<_, PathBuf>("--dir")?,
        mailbox_capacity: pargs.opt_value_from_str("--mailbox-capacity")?,
        metrics_bind: pargs.opt_value_from_str("--metrics-bind")?,
    };
    let remaining = pargs.finish();
    if !remaining.is_empty() {
        bail!("unexpected arguments: {remaining:?}\n\n{HELP}");
    }

    logging::init();

    let config = ServerConfig::from_env(overrides)?;
    config.validate()?;
    info!("Starting Card Brawl server at {}", config.bind);

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr)
            .with_context(|| format!("Failed to start metrics exporter on {addr}"))?;
        info!("Prometheus metrics exported at http://{addr}/metrics");
    }

    let card_set = cards::load_cards(&config.cards_dir())?;
    let game = GameState::new(card_set.white, card_set.black)?;

    let (hub_actor, hub) = HubActor::new(config.mailbox_capacity);
    tokio::spawn(hub_actor.run());

    let state = AppState::new(game, hub.clone());
    let app = api::create_router(state, &config.static_dir());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(hub))
        .await
        .context("Server error")?;

    info!("Server stopped");

    Ok(())
}

/// Waits for Ctrl+C, then closes every event stream so the graceful
/// shutdown isn't held open by long-lived responses.
async fn shutdown_signal(hub: HubHandle) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }

    info!("Shutting down server...");
    if let Err(e) = hub.shutdown().await {
        warn!("Event hub already stopped: {e}");
    }
}
