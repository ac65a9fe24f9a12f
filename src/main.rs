//! Game client host - main entry point.
//!
//! # Overview
//!
//! The process hosts two contexts that only talk over the bridge:
//! - **Main thread** (host): runs the Slint shell window event loop
//! - **Tokio workers** (host): run the [`HostGateway`] and the quit watcher
//! - **UI thread** (unprivileged): a single-threaded tokio runtime running the
//!   [`UiRuntime`], which owns the state store and the screen controller
//!
//! # Execution Flow
//!
//! 1. Load `client.yaml` (directory from `GAME_CLIENT_CONFIG_DIR`)
//! 2. Initialize logging → `<logging.dir>/<logging.prefix>.<date>`
//! 3. Link the bridge, create the shell window and spawn the gateway
//! 4. Start the UI context and its loading timer
//! 5. Run the Slint event loop (blocks until the window closes or quit)
//! 6. Signal quit, join the UI thread, shut the runtime down with a 5s timeout

use anyhow::{Context, Result};
use game_client::bridge::{
    self, BridgeOperation, BuildProfile, ClientApi, REQUEST_BUFFER, UiEnd, UiEnvironment,
    UiGlobals, with_timeout,
};
use game_client::host::{HostGateway, MenuEmitter, QuitSignal, ShellController};
use game_client::logging::Logger;
use game_client::models::UiConfig;
use game_client::ui::{TracingRenderer, UiRuntime};
use game_client::{APP_NAME, BridgeMetrics, ConfigManager, StateManager, VERSION};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::watch;

fn main() -> Result<()> {
    let config_manager = ConfigManager::from_env()?;
    let config = config_manager.load()?;

    let _guard = game_client::logging::setup_from_config(&config.logging)?;

    tracing::info!(
        "Starting {} v{} ({:?} build)",
        APP_NAME,
        VERSION,
        BuildProfile::CURRENT
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("game-client-host")
        .build()?;

    let metrics = Arc::new(BridgeMetrics::new());
    let (host_end, ui_end) = bridge::link(REQUEST_BUFFER);
    let (quit, mut quit_rx) = QuitSignal::new();

    let emitter = MenuEmitter::new(host_end.events, host_end.clock, Arc::clone(&metrics));
    let shell = ShellController::new(&config.window, emitter)?;

    let gateway = HostGateway::new(
        Arc::new(shell.window_control()),
        quit.clone(),
        Arc::clone(&metrics),
    );
    runtime.spawn(gateway.run(host_end.requests));

    // Stop the window event loop once anyone requests quit.
    runtime.spawn(async move {
        if quit_rx.wait_for(|quit| *quit).await.is_ok() {
            if let Err(e) = slint::quit_event_loop() {
                tracing::debug!("Event loop already stopped: {}", e);
            }
        }
    });

    let ui_thread = spawn_ui_context(ui_end, quit.subscribe(), Arc::clone(&metrics), config.ui)?;

    let result = shell.run();

    tracing::info!("Shell closed, shutting down");
    quit.trigger();

    if ui_thread.join().is_err() {
        tracing::error!("UI context panicked");
    }

    runtime.shutdown_timeout(Duration::from_secs(5));
    metrics.log_summary();

    tracing::info!("Application shutdown complete");

    result.map_err(|e| {
        tracing::error!("Shell error: {}", e);
        anyhow::anyhow!("Shell error: {}", e)
    })
}

/// Start the unprivileged context on its own thread.
///
/// It only receives the UI end of the bridge; everything privileged goes
/// through the [`ClientApi`] installed in its globals.
fn spawn_ui_context(
    ui_end: UiEnd,
    shutdown: watch::Receiver<bool>,
    metrics: Arc<BridgeMetrics>,
    ui_config: UiConfig,
) -> Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("game-client-ui".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    tracing::error!("Failed to build UI runtime: {}", e);
                    return;
                }
            };

            runtime.block_on(run_ui_context(ui_end, shutdown, metrics, ui_config));
        })
        .context("Failed to spawn UI thread")
}

async fn run_ui_context(
    ui_end: UiEnd,
    shutdown: watch::Receiver<bool>,
    metrics: Arc<BridgeMetrics>,
    ui_config: UiConfig,
) {
    let log = Logger::for_module("ui");

    let globals = UiGlobals::install(
        UiEnvironment::default(),
        Arc::new(ClientApi::new(ui_end.requests, ui_end.clock)),
        BuildProfile::CURRENT,
    );
    log.debug(format!(
        "Globals installed: {}",
        globals.names().collect::<Vec<_>>().join(", ")
    ));

    let Some(api) = globals.api() else {
        log.error("Client API missing from globals");
        return;
    };

    match with_timeout(
        BridgeOperation::GetAppVersion,
        Duration::from_secs(2),
        api.get_app_version(),
    )
    .await
    {
        Ok(version) => log.info(format!("Connected to host v{version}")),
        Err(e) => log.warn(format!("Could not read host version: {e}")),
    };

    let ui = UiRuntime::new(StateManager::with_metrics(metrics), api);

    let loading = ui.loading_screen();
    let delay = Duration::from_millis(ui_config.loading_delay_ms);
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        loading.finish_loading();
    });

    let mut renderer = TracingRenderer::default();
    ui.run(ui_end.events, shutdown, &mut renderer).await;
}
