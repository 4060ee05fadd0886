//! Worldtap binary.
//!
//! Runs a simulated game client on a dedicated engine thread and exposes
//! its state over the read-only HTTP API.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `worldtap-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Generate the reference world from the configured seed
//! 4. Spawn the engine thread
//! 5. Serve the state API until `Ctrl-C`
//! 6. Drain in-flight requests, then stop the engine thread

mod error;
mod tick_logger;

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use worldtap_api::{AppState, ServerConfig};
use worldtap_core::config::{LoggingConfig, WorldtapConfig};
use worldtap_core::runner::{self, EngineSettings};
use worldtap_core::world::SceneWorld;

use crate::error::EngineError;
use crate::tick_logger::TickLogger;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "worldtap-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the engine thread, or the server
/// fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("worldtap-engine starting");
    info!(
        from_file,
        host = config.server.host,
        port = config.server.port,
        tick_interval_ms = config.engine.tick_interval_ms,
        query_timeout_ms = config.engine.query_timeout_ms,
        seed = config.world.seed,
        "Configuration loaded"
    );

    // 3. Generate the reference world.
    let world = SceneWorld::demo(&config.world);
    info!(
        npcs = world.npcs.len(),
        projectiles = world.projectiles.len(),
        scene_size = config.world.scene_size,
        planes = config.world.planes,
        "Reference world generated"
    );

    // 4. Spawn the engine thread.
    let engine = runner::spawn_engine(
        Box::new(world),
        EngineSettings::from(&config.engine),
        Box::new(TickLogger::new(config.logging.tick_log_interval)),
    )
    .map_err(EngineError::from)?;

    // 5. Serve until Ctrl-C.
    let state = Arc::new(AppState::new(
        engine.bridge().clone(),
        config.engine.query_timeout(),
    ));
    let server_config = ServerConfig::from(&config.server);
    let served = worldtap_api::start_server(&server_config, state, shutdown_signal()).await;

    // 6. Stop the engine even if the server failed.
    let exit = tokio::task::spawn_blocking(move || engine.shutdown())
        .await
        .map_err(|e| EngineError::Shutdown {
            message: format!("engine join task failed: {e}"),
        })?
        .map_err(EngineError::from)?;
    served.map_err(EngineError::from)?;

    info!(
        reason = ?exit.reason,
        total_ticks = exit.total_ticks,
        "worldtap-engine stopped"
    );
    Ok(())
}

/// Resolves on `Ctrl-C`. If the handler cannot be installed the server
/// runs until the process is killed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load configuration from `worldtap-config.yaml`.
///
/// A missing file means defaults, still subject to environment
/// overrides. Returns whether the file was read.
fn load_config() -> Result<(WorldtapConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        let config = WorldtapConfig::from_file(config_path)?;
        Ok((config, true))
    } else {
        let mut config = WorldtapConfig::default();
        config.server.apply_env_overrides();
        Ok((config, false))
    }
}
