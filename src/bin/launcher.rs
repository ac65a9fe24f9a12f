//! Game client launcher.
//!
//! Starts the game server, gives it a head start, then starts the client
//! host. Both children's output is forwarded with a `[server]` / `[client]`
//! prefix. Ctrl-C (or SIGTERM) stops both before the launcher exits.

use anyhow::Result;
use game_client::services::{Launcher, shutdown_signal};
use game_client::{ConfigManager, VERSION};

fn main() -> Result<()> {
    let config = ConfigManager::from_env()?.load()?;

    let mut logging = config.logging.clone();
    logging.prefix = format!("{}-launcher", logging.prefix);
    let guard = game_client::logging::setup_from_config(&logging)?;

    tracing::info!("Starting launcher v{}", VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("game-client-launcher")
        .build()?;

    let launcher = Launcher::new(config.launcher);
    let outcome = runtime.block_on(launcher.run_until(shutdown_signal()))?;

    tracing::info!("Launcher finished: {:?}", outcome);

    // process::exit skips destructors; flush the log writer first.
    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    drop(guard);

    std::process::exit(outcome.exit_code());
}
