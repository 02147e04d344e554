//! Tether Bindings
//!
//! Connects widget runtimes to the host framework's input binding protocol.
//!
//! # Example
//!
//! ```ignore
//! use tether_bindings::{install, BindingRegistry};
//! use tether_core::{BridgeConfig, Document};
//! use tether_widgets::WidgetRuntimes;
//!
//! let config = BridgeConfig::default();
//! let runtimes = WidgetRuntimes::loaded();
//! install(&config, &runtimes);
//!
//! let mut document = Document::new();
//! // ... build the page ...
//! let registry = BindingRegistry::global();
//! registry.observe(&mut document);
//! registry.bind_all(&document, document.root());
//! ```

pub mod adapter;
pub mod binding;
pub mod builtins;
pub mod codec;
pub mod codecs;
pub mod incident;
pub mod registry;

pub use adapter::Adapter;
pub use binding::InputBinding;
pub use builtins::{
    register_builtin_bindings, BuiltinBindings, ButtonGroupBinding, ColorPickerBinding,
    CounterBinding, DynamicItemsBinding, TextInputBinding, CHECKBOX_GROUP_BUTTONS_BINDING,
    COLOR_PICKER_INPUT_BINDING, COUNTER_INPUT_BINDING, DYNAMIC_ITEMS_INPUT_BINDING,
    TEXT_INPUT_BINDING,
};
pub use codec::{
    Decoded, ValueCodec, ValueShape, WidgetDescriptor, ATTR_INITIAL_VALUE, ATTR_LABEL,
    ATTR_OPTIONS,
};
pub use incident::{Incident, IncidentKind, IncidentLog};
pub use registry::BindingRegistry;

use tether_core::config::BridgeConfig;
use tether_widgets::WidgetRuntimes;

/// Process start: install logging and register the built-in bindings globally
pub fn install(config: &BridgeConfig, runtimes: &WidgetRuntimes) -> BuiltinBindings {
    tether_core::logging::init(config);
    register_builtin_bindings(BindingRegistry::global(), runtimes, config)
}
