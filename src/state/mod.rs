// State management module
//
// This module provides the StateManager which wraps AppState with thread-safe access
// using Arc<RwLock<T>> and emits change events for screen re-renders.

use crate::metrics::BridgeMetrics;
use crate::models::{AppScreen, AppState, GameSettings, SettingsPatch};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// Change events emitted when state is modified
///
/// Subscribers (the UI runtime, tests) receive these after the mutation has
/// been fully applied, so a snapshot taken on receipt is never partial.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// The active screen changed
    ScreenChanged { from: AppScreen, to: AppScreen },

    /// The loading flag flipped
    LoadingChanged { is_loading: bool },

    /// The error banner was set, replaced or cleared
    ErrorChanged { error: Option<String> },

    /// Any game setting changed
    SettingsChanged,

    /// State has been reset to defaults
    StateReset,
}

/// Thread-safe application state store with event emission
///
/// This is the UI context's central state component that:
/// - Provides access to [`AppState`] via `Arc<RwLock<T>>`
/// - Exposes named setters (`set_current_screen`, `set_loading`, `set_error`, `update_settings`)
/// - Detects what changed and emits [`StateChange`] events
/// - Supports subscribing to state changes via tokio broadcast channels
///
/// # Usage
///
/// - [`read()`](Self::read) for reading state through a closure
/// - [`snapshot()`](Self::snapshot) for an owned copy
/// - [`update()`](Self::update) for mutations with automatic event emission
/// - [`subscribe()`](Self::subscribe) for listening to state changes
///
/// Mutation and notification are one step from the caller's point of view:
/// the update is applied under the write lock, the lock is released, and only
/// then are events broadcast.
pub struct StateManager {
    state: Arc<RwLock<AppState>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,

    metrics: Arc<BridgeMetrics>,
}

impl StateManager {
    /// Create a new StateManager with default state
    ///
    /// # Returns
    /// A new StateManager with a broadcast channel buffer of 100 events
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(BridgeMetrics::new()))
    }

    /// Create a StateManager that records into shared metrics
    pub fn with_metrics(metrics: Arc<BridgeMetrics>) -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(AppState::default())),
            state_tx,
            metrics,
        }
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get an owned copy of the current state
    pub fn snapshot(&self) -> AppState {
        self.read_lock().clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let screen = state_manager.read(|state| state.current_screen);
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = self.read_lock();
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// 1. Applies `update_fn` under the write lock
    /// 2. Detects what changed against the previous state
    /// 3. Releases the lock
    /// 4. Broadcasts one event per changed aspect
    ///
    /// # Returns
    /// The StateChange events that were emitted (empty if nothing changed)
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut AppState),
    {
        let changes = {
            let mut state = self.write_lock();
            let old_state = state.clone();
            update_fn(&mut state);
            Self::detect_changes(&old_state, &state)
        };

        if !changes.is_empty() {
            self.metrics.record_state_update();
        }
        for change in &changes {
            self.broadcast(change.clone());
        }

        changes
    }

    /// Subscribe to state change events
    ///
    /// Returns a receiver that will get notified of all future state changes.
    /// Multiple subscribers can listen simultaneously.
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    fn broadcast(&self, change: StateChange) {
        self.metrics.record_state_broadcast();
        // Sending with no receivers is fine; nobody is rendering yet.
        if self.state_tx.send(change).is_err() {
            self.metrics.record_broadcast_without_receivers();
        }
    }

    fn detect_changes(old: &AppState, new: &AppState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if old.current_screen != new.current_screen {
            changes.push(StateChange::ScreenChanged {
                from: old.current_screen,
                to: new.current_screen,
            });
        }

        if old.is_loading != new.is_loading {
            changes.push(StateChange::LoadingChanged {
                is_loading: new.is_loading,
            });
        }

        if old.error != new.error {
            changes.push(StateChange::ErrorChanged {
                error: new.error.clone(),
            });
        }

        if old.settings != new.settings {
            changes.push(StateChange::SettingsChanged);
        }

        changes
    }

    // Named setters

    /// Transition to another screen
    pub fn set_current_screen(&self, screen: AppScreen) -> Vec<StateChange> {
        let changes = self.update(|state| {
            state.current_screen = screen;
        });
        if let Some(StateChange::ScreenChanged { from, to }) = changes.first() {
            tracing::debug!("Screen transition: {} -> {}", from, to);
        }
        changes
    }

    pub fn set_loading(&self, is_loading: bool) -> Vec<StateChange> {
        self.update(|state| {
            state.is_loading = is_loading;
        })
    }

    /// Set or clear the user-visible error
    ///
    /// Never changes the current screen; callers decide whether an error
    /// implies navigation.
    pub fn set_error(&self, error: Option<String>) -> Vec<StateChange> {
        if let Some(ref message) = error {
            tracing::warn!("Surfacing error to user: {}", message);
        }
        self.update(|state| {
            state.error = error;
        })
    }

    pub fn clear_error(&self) -> Vec<StateChange> {
        self.set_error(None)
    }

    /// Merge a partial settings update field by field
    ///
    /// Values are stored as given; volume clamping is the settings screen's job.
    pub fn update_settings(&self, patch: SettingsPatch) -> Vec<StateChange> {
        self.update(|state| {
            state.settings.apply(&patch);
        })
    }

    /// Replace all settings at once
    pub fn replace_settings(&self, settings: GameSettings) -> Vec<StateChange> {
        self.update(|state| {
            state.settings = settings;
        })
    }

    /// Reset to the initial state
    pub fn reset(&self) -> Vec<StateChange> {
        let mut changes = self.update(|state| {
            *state = AppState::default();
        });

        let reset_event = StateChange::StateReset;
        self.broadcast(reset_event.clone());
        changes.push(reset_event);

        changes
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share the same state and channel.
impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}
