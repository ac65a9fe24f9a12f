//! Host/UI bridge.
//!
//! - [`contract`]: the closed set of operations and menu channels, plus the plain-data
//!   request, response and error payloads that cross the boundary
//! - [`transport`]: the channel pair linking the two contexts
//! - [`adapter`]: [`ClientApi`], the UI-side object that forwards exactly the contract
//! - [`globals`]: installation of the UI global namespace

pub mod adapter;
pub mod contract;
pub mod globals;
pub mod transport;

pub use adapter::{ClientApi, with_timeout};
pub use contract::{
    API_GLOBAL, BridgeError, BridgeOperation, BridgeResponse, BridgeResult, ContractError,
    MenuChannel,
};
pub use globals::{BuildProfile, GlobalBinding, LoaderPrimitive, UiEnvironment, UiGlobals};
pub use transport::{
    BridgeEnvelope, HostEnd, MenuClock, MenuEvent, REQUEST_BUFFER, UiEnd, link,
};
