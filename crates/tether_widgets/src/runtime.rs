//! The contract every widget runtime exposes to its adapter
//!
//! A runtime owns the state of each widget instance it attaches. Callers only
//! ever hold an opaque handle and go through these operations; the runtime is
//! free to keep its state however it likes (the built-in runtimes use
//! signals, tests substitute a recording double).

use std::fmt;

use tether_core::dom::Element;
use tether_core::error::{RuntimeError, RuntimeResult};
use tether_core::value::ChangeCallback;

/// Identifies one registered change callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Widget runtime operations
///
/// Every call is synchronous. A runtime that cannot serve a call (module not
/// loaded, released handle, rejected value) returns an error instead of
/// blocking.
pub trait WidgetRuntime: Send + Sync + 'static {
    /// Kind-specific attach parameters (decoded initial value, options, ...)
    type Init: Send;
    /// Runtime-side value
    type Value: Clone + Send + Sync + 'static;
    /// Opaque reference to one attached widget instance
    type Handle: Send + Sync + 'static;

    /// Mount a widget on `element` and create its state
    fn attach(&self, element: &Element, init: Self::Init) -> RuntimeResult<Self::Handle>;

    fn get_value(&self, handle: &Self::Handle) -> RuntimeResult<Self::Value>;

    fn set_value(&self, handle: &Self::Handle, value: Self::Value) -> RuntimeResult<()>;

    /// Register a payload-free change callback
    fn subscribe(
        &self,
        handle: &Self::Handle,
        callback: ChangeCallback,
    ) -> RuntimeResult<SubscriptionId>;

    /// Drop a callback registered with [`WidgetRuntime::subscribe`]
    fn unsubscribe(&self, handle: &Self::Handle, subscription: SubscriptionId) -> bool;

    /// Free the widget state behind `handle`, cancelling its subscriptions
    fn release(&self, handle: &Self::Handle);

    /// Replace the widget's label; most widgets have none
    fn set_label(&self, _handle: &Self::Handle, _label: Option<String>) -> RuntimeResult<()> {
        Err(RuntimeError::Unsupported("set_label"))
    }
}
