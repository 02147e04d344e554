//! Editable list widget
//!
//! Items are arbitrary JSON values; the UI adds text items and removes them
//! by position.

use std::sync::Arc;

use tether_core::dom::{Element, NodeId};
use tether_core::error::RuntimeResult;
use tether_core::reactive::Signal;
use tether_core::value::{ChangeCallback, HostValue};

use crate::module::WidgetModule;
use crate::runtime::{SubscriptionId, WidgetRuntime};

#[derive(Debug, Clone, Copy)]
pub struct DynamicItemsState {
    node: NodeId,
    items: Signal<Vec<HostValue>>,
}

impl DynamicItemsState {
    pub fn node_id(&self) -> NodeId {
        self.node
    }
}

#[derive(Debug, Clone)]
pub struct DynamicItemsRuntime {
    module: Arc<WidgetModule>,
}

impl DynamicItemsRuntime {
    pub fn new(module: Arc<WidgetModule>) -> Self {
        Self { module }
    }

    /// Append the text typed into the "add" field
    ///
    /// Blank input is ignored and returns `false`.
    pub fn add_item(&self, state: &DynamicItemsState, text: &str) -> RuntimeResult<bool> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        let item = HostValue::String(text.to_string());
        self.module.update(state.items, move |mut items| {
            items.push(item);
            items
        })?;
        Ok(true)
    }

    /// Remove the item at `index`, returning it
    pub fn remove_item(
        &self,
        state: &DynamicItemsState,
        index: usize,
    ) -> RuntimeResult<Option<HostValue>> {
        let mut items = self.module.read(state.items)?;
        if index >= items.len() {
            return Ok(None);
        }
        let removed = items.remove(index);
        self.module.write(state.items, items)?;
        Ok(Some(removed))
    }
}

impl WidgetRuntime for DynamicItemsRuntime {
    type Init = Vec<HostValue>;
    type Value = Vec<HostValue>;
    type Handle = DynamicItemsState;

    fn attach(&self, element: &Element, init: Vec<HostValue>) -> RuntimeResult<DynamicItemsState> {
        let items = self.module.create_signal(init)?;
        Ok(DynamicItemsState {
            node: element.node_id(),
            items,
        })
    }

    fn get_value(&self, state: &DynamicItemsState) -> RuntimeResult<Vec<HostValue>> {
        self.module.read(state.items)
    }

    fn set_value(&self, state: &DynamicItemsState, value: Vec<HostValue>) -> RuntimeResult<()> {
        self.module.write(state.items, value)
    }

    fn subscribe(
        &self,
        state: &DynamicItemsState,
        callback: ChangeCallback,
    ) -> RuntimeResult<SubscriptionId> {
        self.module.watch(state.items, callback)
    }

    fn unsubscribe(&self, _state: &DynamicItemsState, subscription: SubscriptionId) -> bool {
        self.module.unwatch(subscription)
    }

    fn release(&self, state: &DynamicItemsState) {
        self.module.dispose(state.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tether_core::dom::{Document, ElementSpec};

    fn mount(init: Vec<HostValue>) -> (DynamicItemsRuntime, DynamicItemsState) {
        let mut doc = Document::new();
        let node = doc.append(doc.root(), ElementSpec::new("items")).unwrap();
        let runtime = DynamicItemsRuntime::new(WidgetModule::new("items"));
        let state = runtime.attach(doc.get(node).unwrap(), init).unwrap();
        (runtime, state)
    }

    #[test]
    fn test_add_item_trims_and_skips_blank() {
        let (runtime, state) = mount(vec![json!("a")]);
        assert_eq!(runtime.add_item(&state, "  b "), Ok(true));
        assert_eq!(runtime.add_item(&state, "   "), Ok(false));
        assert_eq!(runtime.get_value(&state).unwrap(), vec![json!("a"), json!("b")]);
    }

    #[test]
    fn test_remove_item() {
        let (runtime, state) = mount(vec![json!(1), json!({"k": true}), json!(null)]);
        assert_eq!(runtime.remove_item(&state, 1), Ok(Some(json!({"k": true}))));
        assert_eq!(runtime.remove_item(&state, 5), Ok(None));
        assert_eq!(runtime.get_value(&state).unwrap(), vec![json!(1), json!(null)]);
    }
}
