//! Integration tests for the host/UI bridge
//!
//! These tests link a real HostGateway to a ClientApi over the bridge
//! channels and verify:
//! - Query round trips and their tagged errors
//! - Window operations when the window is gone
//! - Quit semantics (signal fired, no reply, gateway stops)
//! - Menu events flowing host -> UI runtime -> state store, reaching only
//!   listeners registered before emission
//! - UI globals under production and development profiles

use game_client::bridge::{
    self, API_GLOBAL, BridgeError, BridgeOperation, BuildProfile, ClientApi, GlobalBinding,
    MenuChannel, MenuClock, MenuEvent, REQUEST_BUFFER, UiEnvironment, UiGlobals,
};
use game_client::host::{
    HostGateway, MenuEmitter, QuitSignal, WindowControl, WindowError, WindowState,
};
use game_client::ui::{RunExit, ScreenRenderer, ScreenView, UiRuntime};
use game_client::{AppScreen, BridgeMetrics, StateChange, StateManager};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, timeout};
use tokio_test::assert_ok;

/// Window stand-in that records what it was asked to do.
#[derive(Default)]
struct FakeWindow {
    calls: Mutex<Vec<&'static str>>,
    gone: bool,
    fail_with: Option<String>,
}

impl FakeWindow {
    fn gone() -> Self {
        Self {
            gone: true,
            ..Self::default()
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn record(&self, call: &'static str) -> Result<WindowState, WindowError> {
        self.calls.lock().unwrap().push(call);
        if let Some(message) = &self.fail_with {
            return Err(WindowError::Backend(message.clone()));
        }
        Ok(if self.gone {
            WindowState::Gone
        } else {
            WindowState::Applied
        })
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

impl WindowControl for FakeWindow {
    fn minimize(&self) -> Result<WindowState, WindowError> {
        self.record("minimize")
    }

    fn maximize(&self) -> Result<WindowState, WindowError> {
        self.record("maximize")
    }

    fn close(&self) -> Result<WindowState, WindowError> {
        self.record("close")
    }
}

struct Harness {
    api: ClientApi,
    window: Arc<FakeWindow>,
    quit: QuitSignal,
    metrics: Arc<BridgeMetrics>,
    gateway: JoinHandle<()>,
}

fn harness(window: FakeWindow) -> Harness {
    let metrics = Arc::new(BridgeMetrics::new());
    let (host_end, ui_end) = bridge::link(REQUEST_BUFFER);
    let (quit, _quit_rx) = QuitSignal::new();
    let window = Arc::new(window);

    let gateway = HostGateway::new(Arc::clone(&window), quit.clone(), Arc::clone(&metrics));
    let gateway = tokio::spawn(gateway.run(host_end.requests));

    Harness {
        api: ClientApi::new(ui_end.requests, ui_end.clock),
        window,
        quit,
        metrics,
        gateway,
    }
}

#[tokio::test]
async fn test_version_round_trip() {
    let h = harness(FakeWindow::default());

    let version = h.api.get_app_version().await.unwrap();

    assert_eq!(version, game_client::VERSION);
    assert!(h.window.calls().is_empty());
}

#[tokio::test]
async fn test_window_ops_reach_window_in_order() {
    let h = harness(FakeWindow::default());

    assert_ok!(h.api.minimize_window().await);
    assert_ok!(h.api.maximize_window().await);
    assert_ok!(h.api.maximize_window().await);
    assert_ok!(h.api.close_window().await);

    assert_eq!(
        h.window.calls(),
        vec!["minimize", "maximize", "maximize", "close"]
    );
    assert_eq!(h.metrics.requests_handled.load(Ordering::Relaxed), 4);
}

#[tokio::test]
async fn test_window_gone_is_silent_success() {
    let h = harness(FakeWindow::gone());

    assert_eq!(h.api.minimize_window().await, Ok(()));
    assert_eq!(h.api.close_window().await, Ok(()));
    assert_eq!(h.metrics.request_failures.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn test_window_failure_is_tagged() {
    let h = harness(FakeWindow::failing("compositor refused"));

    let err = h.api.minimize_window().await.unwrap_err();

    assert_eq!(
        err,
        BridgeError::ActionFailed {
            operation: BridgeOperation::MinimizeWindow,
            message: "window backend error: compositor refused".to_string(),
        }
    );
    assert_eq!(h.metrics.request_failures.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn test_quit_stops_gateway_without_reply() {
    let h = harness(FakeWindow::default());

    assert_eq!(h.api.quit_app().await, Ok(()));

    timeout(Duration::from_millis(500), h.gateway)
        .await
        .expect("Gateway did not stop")
        .unwrap();
    assert!(h.quit.is_triggered());

    // Host is gone now: lifecycle calls are satisfied, queries are not.
    assert_eq!(h.api.maximize_window().await, Ok(()));
    assert_eq!(
        h.api.get_app_version().await,
        Err(BridgeError::HostUnavailable)
    );
}

#[derive(Default)]
struct Recording(Arc<Mutex<Vec<AppScreen>>>);

impl ScreenRenderer for Recording {
    fn render(&mut self, view: &ScreenView) {
        self.0.lock().unwrap().push(view.screen());
    }
}

#[tokio::test]
async fn test_menu_event_navigates_ui() {
    let metrics = Arc::new(BridgeMetrics::new());
    let (host_end, ui_end) = bridge::link(REQUEST_BUFFER);
    let emitter = MenuEmitter::new(host_end.events, host_end.clock, Arc::clone(&metrics));
    let (quit_tx, quit_rx) = watch::channel(false);

    let state = StateManager::new();
    let api = Arc::new(ClientApi::new(ui_end.requests, ui_end.clock));
    let runtime = UiRuntime::new(state.clone(), api);
    let rendered = Arc::new(Mutex::new(Vec::new()));
    let mut renderer = Recording(Arc::clone(&rendered));

    let mut changes = state.subscribe();
    let ui = tokio::spawn(async move {
        runtime.run(ui_end.events, quit_rx, &mut renderer).await
    });

    assert!(emitter.emit(MenuChannel::Settings));
    timeout(Duration::from_millis(500), changes.recv())
        .await
        .expect("No state change after menu event")
        .unwrap();
    assert_eq!(state.read(|s| s.current_screen), AppScreen::Settings);

    quit_tx.send_replace(true);
    let exit = timeout(Duration::from_millis(500), ui)
        .await
        .expect("UI runtime did not stop")
        .unwrap();

    assert_eq!(exit, RunExit::Shutdown);
    let rendered = rendered.lock().unwrap().clone();
    assert_eq!(rendered.first(), Some(&AppScreen::Loading));
    assert_eq!(rendered.last(), Some(&AppScreen::Settings));
    assert_eq!(metrics.menu_events_emitted.load(Ordering::Relaxed), 1);
}

/// Host emitter and a UI runtime joined by one bridge link.
struct MenuHarness {
    emitter: MenuEmitter,
    state: StateManager,
    api: Arc<ClientApi>,
    events: mpsc::UnboundedReceiver<MenuEvent>,
}

fn menu_harness() -> MenuHarness {
    let metrics = Arc::new(BridgeMetrics::new());
    let (host_end, ui_end) = bridge::link(REQUEST_BUFFER);

    MenuHarness {
        emitter: MenuEmitter::new(host_end.events, host_end.clock, metrics),
        state: StateManager::new(),
        api: Arc::new(ClientApi::new(ui_end.requests, ui_end.clock)),
        events: ui_end.events,
    }
}

/// Run the UI loop until `done` has been observed, then shut it down.
async fn run_until_screen(
    runtime: UiRuntime,
    events: mpsc::UnboundedReceiver<MenuEvent>,
    done: AppScreen,
) -> RunExit {
    let state = runtime.state().clone();
    let mut changes = state.subscribe();
    let (quit_tx, quit_rx) = watch::channel(false);

    let ui = tokio::spawn(async move {
        let mut renderer = Recording::default();
        runtime.run(events, quit_rx, &mut renderer).await
    });

    timeout(Duration::from_millis(500), async {
        while state.read(|s| s.current_screen) != done {
            changes.recv().await.unwrap();
        }
    })
    .await
    .expect("UI never reached the expected screen");

    quit_tx.send_replace(true);
    timeout(Duration::from_millis(500), ui)
        .await
        .expect("UI runtime did not stop")
        .unwrap()
}

#[tokio::test]
async fn test_host_event_reaches_both_settings_callbacks_once_in_order() {
    let h = menu_harness();
    let runtime = UiRuntime::new(h.state.clone(), Arc::clone(&h.api));
    let calls = Arc::new(Mutex::new(Vec::new()));

    for id in ["first", "second"] {
        let calls = Arc::clone(&calls);
        h.api.on_menu_settings(move || calls.lock().unwrap().push(id));
    }

    assert!(h.emitter.emit(MenuChannel::Settings));
    let exit = run_until_screen(runtime, h.events, AppScreen::Settings).await;

    assert_eq!(exit, RunExit::Shutdown);
    assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
}

#[tokio::test]
async fn test_host_event_after_teardown_reaches_nobody() {
    let h = menu_harness();
    let runtime = UiRuntime::new(h.state.clone(), Arc::clone(&h.api));
    let about_calls = Arc::new(Mutex::new(0));

    let counter = Arc::clone(&about_calls);
    h.api.on_menu_about(move || *counter.lock().unwrap() += 1);
    h.api.remove_all_listeners(MenuChannel::About);

    let mut changes = h.state.subscribe();
    assert!(h.emitter.emit(MenuChannel::About));
    assert!(h.emitter.emit(MenuChannel::Settings));
    run_until_screen(runtime, h.events, AppScreen::Settings).await;

    assert_eq!(*about_calls.lock().unwrap(), 0);
    assert_eq!(
        changes.try_recv().unwrap(),
        StateChange::ScreenChanged {
            from: AppScreen::Loading,
            to: AppScreen::Settings,
        }
    );
}

#[tokio::test]
async fn test_event_emitted_before_registration_is_not_replayed() {
    let h = menu_harness();

    // The user clicks while the UI context is still starting.
    assert!(h.emitter.emit(MenuChannel::Settings));

    let runtime = UiRuntime::new(h.state.clone(), Arc::clone(&h.api));
    let late_calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&late_calls);
    h.api.on_menu_settings(move || *counter.lock().unwrap() += 1);

    // A later click proves the loop is draining events.
    assert!(h.emitter.emit(MenuChannel::About));
    run_until_screen(runtime, h.events, AppScreen::About).await;

    assert_eq!(*late_calls.lock().unwrap(), 0);
    assert_eq!(h.state.read(|s| s.current_screen), AppScreen::About);
}

#[test]
fn test_menu_callbacks_run_in_registration_order() {
    let (tx, _rx) = mpsc::channel(1);
    let api = ClientApi::new(tx, MenuClock::default());
    let order = Arc::new(Mutex::new(Vec::new()));

    for id in 1..=3 {
        let order = Arc::clone(&order);
        api.on_menu_new_game(move || order.lock().unwrap().push(id));
    }

    api.deliver(MenuChannel::NewGame);
    assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);

    api.remove_all_listeners(MenuChannel::NewGame);
    api.remove_all_listeners(MenuChannel::NewGame);
    api.deliver(MenuChannel::NewGame);
    assert_eq!(order.lock().unwrap().len(), 3);
}

#[test]
fn test_production_globals() {
    let (tx, _rx) = mpsc::channel(1);
    let globals = UiGlobals::install(
        UiEnvironment::default(),
        Arc::new(ClientApi::new(tx, MenuClock::default())),
        BuildProfile::Production,
    );

    assert!(globals.api().is_some());
    assert!(matches!(globals.get(API_GLOBAL), Some(GlobalBinding::Api(_))));
    assert!(matches!(
        globals.resolve("global"),
        Some(GlobalBinding::Environment)
    ));
    for name in ["require", "module", "exports"] {
        assert!(!globals.contains(name), "{name} leaked into production");
    }
}

#[test]
fn test_development_globals() {
    let (tx, _rx) = mpsc::channel(1);
    let globals = UiGlobals::install(
        UiEnvironment::default().with_global("global"),
        Arc::new(ClientApi::new(tx, MenuClock::default())),
        BuildProfile::Development,
    );

    // An existing `global` is left alone.
    assert!(matches!(globals.get("global"), Some(GlobalBinding::Environment)));
    for name in ["require", "module", "exports"] {
        assert!(
            matches!(globals.get(name), Some(GlobalBinding::Loader(_))),
            "{name} missing in development"
        );
    }
}

#[test]
fn test_current_profile_matches_feature() {
    assert_eq!(
        BuildProfile::CURRENT.exposes_loader(),
        cfg!(feature = "dev-loader")
    );
}
