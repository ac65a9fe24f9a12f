// Bridge contract - the closed set of operations and channels allowed across
// the host/UI trust boundary.
//
// Only the plain-data types in this file cross the boundary. Both sides name
// operations and channels through these enums, never through free strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name under which the contract object is installed in the UI global namespace.
pub const API_GLOBAL: &str = "electronAPI";

/// Request/response operations the UI may ask the host to perform.
///
/// Every operation is asynchronous on the UI side and resolves to a
/// [`BridgeResult`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BridgeOperation {
    /// Returns the running build's version string
    GetAppVersion,
    /// Terminates the whole application; the host never replies
    QuitApp,
    MinimizeWindow,
    MaximizeWindow,
    CloseWindow,
}

impl BridgeOperation {
    pub const ALL: [BridgeOperation; 5] = [
        BridgeOperation::GetAppVersion,
        BridgeOperation::QuitApp,
        BridgeOperation::MinimizeWindow,
        BridgeOperation::MaximizeWindow,
        BridgeOperation::CloseWindow,
    ];

    /// Wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeOperation::GetAppVersion => "getAppVersion",
            BridgeOperation::QuitApp => "quitApp",
            BridgeOperation::MinimizeWindow => "minimizeWindow",
            BridgeOperation::MaximizeWindow => "maximizeWindow",
            BridgeOperation::CloseWindow => "closeWindow",
        }
    }

    /// Operations that act on the primary window. These succeed silently
    /// when the window (or the whole host) is already gone.
    pub fn is_window_lifecycle(&self) -> bool {
        matches!(
            self,
            BridgeOperation::MinimizeWindow
                | BridgeOperation::MaximizeWindow
                | BridgeOperation::CloseWindow
        )
    }
}

impl fmt::Display for BridgeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BridgeOperation {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BridgeOperation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ContractError::UnknownOperation(s.to_string()))
    }
}

/// One-way host-to-UI notification channels, fired by the host menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuChannel {
    #[serde(rename = "menu-new-game")]
    NewGame,
    #[serde(rename = "menu-load-game")]
    LoadGame,
    #[serde(rename = "menu-settings")]
    Settings,
    #[serde(rename = "menu-about")]
    About,
}

impl MenuChannel {
    pub const ALL: [MenuChannel; 4] = [
        MenuChannel::NewGame,
        MenuChannel::LoadGame,
        MenuChannel::Settings,
        MenuChannel::About,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuChannel::NewGame => "menu-new-game",
            MenuChannel::LoadGame => "menu-load-game",
            MenuChannel::Settings => "menu-settings",
            MenuChannel::About => "menu-about",
        }
    }
}

impl fmt::Display for MenuChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuChannel {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MenuChannel::ALL
            .into_iter()
            .find(|channel| channel.as_str() == s)
            .ok_or_else(|| ContractError::UnknownChannel(s.to_string()))
    }
}

/// Successful reply payloads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BridgeResponse {
    Version { version: String },
    Done,
}

/// Failure payload for bridge queries.
///
/// Tagged so that it can be serialized across a process boundary unchanged.
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BridgeError {
    #[error("host context is unavailable")]
    HostUnavailable,

    #[error("{operation} failed: {message}")]
    ActionFailed {
        operation: BridgeOperation,
        message: String,
    },

    #[error("{operation} timed out after {timeout_ms} ms")]
    TimedOut {
        operation: BridgeOperation,
        timeout_ms: u64,
    },

    #[error("unexpected response to {operation}")]
    UnexpectedResponse { operation: BridgeOperation },
}

pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors from naming something outside the contract.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ContractError {
    #[error("unknown bridge operation: {0}")]
    UnknownOperation(String),

    #[error("unknown menu channel: {0}")]
    UnknownChannel(String),
}
