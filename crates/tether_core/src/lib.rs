//! Tether Core
//!
//! Shared foundations for binding opaque widget runtimes to a host reactive
//! framework:
//!
//! - **Reactive Signals**: the state store widget runtimes build on
//! - **Document Model**: elements, class selectors, removal observation
//! - **Host Values**: JSON values, inbound messages, change callbacks
//! - **Errors, Config, Logging**: the ambient pieces every crate shares

pub mod config;
pub mod dom;
pub mod error;
pub mod logging;
pub mod reactive;
pub mod value;

pub use config::BridgeConfig;
pub use dom::{Document, Element, ElementSpec, Matches, NodeId, RemovalObserver, Selector};
pub use error::{MarshalError, RuntimeError, RuntimeResult, SelectorError};
pub use reactive::{Effect, EffectId, ReactiveGraph, SharedReactiveGraph, Signal, SignalId};
pub use value::{
    is_hex_color, json_type_name, ChangeCallback, HostValue, InputMessage, RateMode, RatePolicy,
    ValueKind, DEFAULT_COLOR,
};
