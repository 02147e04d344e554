//! Color picker widget
//!
//! Holds a `#rrggbb` string. Writes that are not hex colors are rejected;
//! an invalid initial color mounts the picker on [`DEFAULT_COLOR`] instead.

use std::sync::Arc;

use tether_core::dom::{Element, NodeId};
use tether_core::error::{RuntimeError, RuntimeResult};
use tether_core::reactive::Signal;
use tether_core::value::{is_hex_color, ChangeCallback, DEFAULT_COLOR};

use crate::module::WidgetModule;
use crate::runtime::{SubscriptionId, WidgetRuntime};

#[derive(Debug, Clone, Copy)]
pub struct ColorPickerState {
    node: NodeId,
    color: Signal<String>,
}

impl ColorPickerState {
    pub fn node_id(&self) -> NodeId {
        self.node
    }
}

#[derive(Debug, Clone)]
pub struct ColorPickerRuntime {
    module: Arc<WidgetModule>,
}

impl ColorPickerRuntime {
    pub fn new(module: Arc<WidgetModule>) -> Self {
        Self { module }
    }

    /// A color chosen in the picker UI
    pub fn pick(&self, state: &ColorPickerState, color: &str) -> RuntimeResult<()> {
        self.set_value(state, color.to_string())
    }
}

impl WidgetRuntime for ColorPickerRuntime {
    type Init = Option<String>;
    type Value = String;
    type Handle = ColorPickerState;

    fn attach(&self, element: &Element, init: Option<String>) -> RuntimeResult<ColorPickerState> {
        let color = match init {
            Some(color) if is_hex_color(&color) => color,
            Some(color) => {
                tracing::warn!(
                    element = element.id(),
                    color = %color,
                    "invalid initial color, using {}",
                    DEFAULT_COLOR
                );
                DEFAULT_COLOR.to_string()
            }
            None => DEFAULT_COLOR.to_string(),
        };
        let color = self.module.create_signal(color)?;
        Ok(ColorPickerState {
            node: element.node_id(),
            color,
        })
    }

    fn get_value(&self, state: &ColorPickerState) -> RuntimeResult<String> {
        self.module.read(state.color)
    }

    fn set_value(&self, state: &ColorPickerState, value: String) -> RuntimeResult<()> {
        if !is_hex_color(&value) {
            return Err(RuntimeError::InvalidValue(format!(
                "{value:?} is not a #rrggbb color"
            )));
        }
        self.module.write(state.color, value)
    }

    fn subscribe(
        &self,
        state: &ColorPickerState,
        callback: ChangeCallback,
    ) -> RuntimeResult<SubscriptionId> {
        self.module.watch(state.color, callback)
    }

    fn unsubscribe(&self, _state: &ColorPickerState, subscription: SubscriptionId) -> bool {
        self.module.unwatch(subscription)
    }

    fn release(&self, state: &ColorPickerState) {
        self.module.dispose(state.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::dom::{Document, ElementSpec};

    fn mount(init: Option<&str>) -> (ColorPickerRuntime, ColorPickerState) {
        let mut doc = Document::new();
        let node = doc.append(doc.root(), ElementSpec::new("color")).unwrap();
        let runtime = ColorPickerRuntime::new(WidgetModule::new("color"));
        let state = runtime
            .attach(doc.get(node).unwrap(), init.map(str::to_string))
            .unwrap();
        (runtime, state)
    }

    #[test]
    fn test_initial_color() {
        let (runtime, state) = mount(Some("#12abEF"));
        assert_eq!(runtime.get_value(&state).unwrap(), "#12abEF");
    }

    #[test]
    fn test_missing_or_invalid_initial_color() {
        let (runtime, state) = mount(None);
        assert_eq!(runtime.get_value(&state).unwrap(), DEFAULT_COLOR);

        let (runtime, state) = mount(Some("red"));
        assert_eq!(runtime.get_value(&state).unwrap(), DEFAULT_COLOR);
    }

    #[test]
    fn test_invalid_write_is_rejected() {
        let (runtime, state) = mount(Some("#ffffff"));
        let result = runtime.set_value(&state, "#fff".to_string());
        assert!(matches!(result, Err(RuntimeError::InvalidValue(_))));
        assert_eq!(runtime.get_value(&state).unwrap(), "#ffffff");

        runtime.pick(&state, "#00ff00").unwrap();
        assert_eq!(runtime.get_value(&state).unwrap(), "#00ff00");
    }
}
