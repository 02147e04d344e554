//! Numeric counter widget

use std::sync::Arc;

use tether_core::dom::{Element, NodeId};
use tether_core::error::RuntimeResult;
use tether_core::reactive::Signal;
use tether_core::value::ChangeCallback;

use crate::module::WidgetModule;
use crate::runtime::{SubscriptionId, WidgetRuntime};

/// Value a counter starts from when mounted without one
pub const DEFAULT_COUNT: f64 = 0.0;

#[derive(Debug, Clone, Copy)]
pub struct CounterState {
    node: NodeId,
    count: Signal<f64>,
}

impl CounterState {
    pub fn node_id(&self) -> NodeId {
        self.node
    }
}

#[derive(Debug, Clone)]
pub struct CounterRuntime {
    module: Arc<WidgetModule>,
}

impl CounterRuntime {
    pub fn new(module: Arc<WidgetModule>) -> Self {
        Self { module }
    }

    /// The "+" button
    pub fn increment(&self, state: &CounterState) -> RuntimeResult<f64> {
        self.step(state, 1.0)
    }

    /// The "-" button
    pub fn decrement(&self, state: &CounterState) -> RuntimeResult<f64> {
        self.step(state, -1.0)
    }

    fn step(&self, state: &CounterState, delta: f64) -> RuntimeResult<f64> {
        self.module.update(state.count, |count| count + delta)?;
        self.module.read(state.count)
    }
}

impl WidgetRuntime for CounterRuntime {
    type Init = Option<f64>;
    type Value = f64;
    type Handle = CounterState;

    fn attach(&self, element: &Element, init: Option<f64>) -> RuntimeResult<CounterState> {
        let count = self.module.create_signal(init.unwrap_or(DEFAULT_COUNT))?;
        Ok(CounterState {
            node: element.node_id(),
            count,
        })
    }

    fn get_value(&self, state: &CounterState) -> RuntimeResult<f64> {
        self.module.read(state.count)
    }

    fn set_value(&self, state: &CounterState, value: f64) -> RuntimeResult<()> {
        self.module.write(state.count, value)
    }

    fn subscribe(
        &self,
        state: &CounterState,
        callback: ChangeCallback,
    ) -> RuntimeResult<SubscriptionId> {
        self.module.watch(state.count, callback)
    }

    fn unsubscribe(&self, _state: &CounterState, subscription: SubscriptionId) -> bool {
        self.module.unwatch(subscription)
    }

    fn release(&self, state: &CounterState) {
        self.module.dispose(state.count);
    }
}
