//! Button group widget
//!
//! A row of toggle-style buttons built from an options document
//! `{"options": [...], "labels": [...]}`. At most one option is selected.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tether_core::dom::{Element, NodeId};
use tether_core::error::{RuntimeError, RuntimeResult};
use tether_core::reactive::Signal;
use tether_core::value::{ChangeCallback, HostValue};

use crate::module::WidgetModule;
use crate::runtime::{SubscriptionId, WidgetRuntime};

/// Choices offered by a button group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonGroupOptions {
    #[serde(default)]
    pub options: Vec<String>,
    /// Display text per option; missing entries show the option itself
    #[serde(default)]
    pub labels: Vec<String>,
}

impl ButtonGroupOptions {
    pub fn contains(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// `(option, label)` pairs in display order
    pub fn buttons(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().enumerate().map(|(i, option)| {
            let label = self.labels.get(i).unwrap_or(option);
            (option.as_str(), label.as_str())
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ButtonGroupInit {
    pub selected: Option<String>,
    /// Raw options document, validated on attach
    pub options: HostValue,
}

#[derive(Debug, Clone, Copy)]
pub struct ButtonGroupState {
    node: NodeId,
    selected: Signal<Option<String>>,
    options: Signal<ButtonGroupOptions>,
}

impl ButtonGroupState {
    pub fn node_id(&self) -> NodeId {
        self.node
    }
}

#[derive(Debug, Clone)]
pub struct ButtonGroupRuntime {
    module: Arc<WidgetModule>,
}

impl ButtonGroupRuntime {
    pub fn new(module: Arc<WidgetModule>) -> Self {
        Self { module }
    }

    pub fn options(&self, state: &ButtonGroupState) -> RuntimeResult<ButtonGroupOptions> {
        self.module.read(state.options)
    }

    /// A click on one of the buttons; unknown options are ignored
    pub fn click(&self, state: &ButtonGroupState, option: &str) -> RuntimeResult<bool> {
        if !self.options(state)?.contains(option) {
            return Ok(false);
        }
        self.module.write(state.selected, Some(option.to_string()))?;
        Ok(true)
    }
}

impl WidgetRuntime for ButtonGroupRuntime {
    type Init = ButtonGroupInit;
    type Value = Option<String>;
    type Handle = ButtonGroupState;

    fn attach(&self, element: &Element, init: ButtonGroupInit) -> RuntimeResult<ButtonGroupState> {
        let options = if init.options.is_null() {
            ButtonGroupOptions::default()
        } else {
            serde_json::from_value::<ButtonGroupOptions>(init.options)
                .map_err(|e| RuntimeError::MountFailed(format!("bad options: {e}")))?
        };
        tracing::debug!(
            element = element.id(),
            buttons = options.options.len(),
            "mounting button group"
        );

        let selected = self.module.create_signal(init.selected)?;
        let options = self.module.create_signal(options)?;
        Ok(ButtonGroupState {
            node: element.node_id(),
            selected,
            options,
        })
    }

    fn get_value(&self, state: &ButtonGroupState) -> RuntimeResult<Option<String>> {
        self.module.read(state.selected)
    }

    fn set_value(&self, state: &ButtonGroupState, value: Option<String>) -> RuntimeResult<()> {
        self.module.write(state.selected, value)
    }

    fn subscribe(
        &self,
        state: &ButtonGroupState,
        callback: ChangeCallback,
    ) -> RuntimeResult<SubscriptionId> {
        self.module.watch(state.selected, callback)
    }

    fn unsubscribe(&self, _state: &ButtonGroupState, subscription: SubscriptionId) -> bool {
        self.module.unwatch(subscription)
    }

    fn release(&self, state: &ButtonGroupState) {
        self.module.dispose(state.selected);
        self.module.dispose(state.options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tether_core::dom::{Document, ElementSpec};

    fn mount(init: ButtonGroupInit) -> RuntimeResult<(ButtonGroupRuntime, ButtonGroupState)> {
        let mut doc = Document::new();
        let node = doc.append(doc.root(), ElementSpec::new("group")).unwrap();
        let runtime = ButtonGroupRuntime::new(WidgetModule::new("buttons"));
        let state = runtime.attach(doc.get(node).unwrap(), init)?;
        Ok((runtime, state))
    }

    #[test]
    fn test_labels_fall_back_to_options() {
        let options = ButtonGroupOptions {
            options: vec!["a".into(), "b".into()],
            labels: vec!["Alpha".into()],
        };
        let buttons: Vec<_> = options.buttons().collect();
        assert_eq!(buttons, vec![("a", "Alpha"), ("b", "b")]);
    }

    #[test]
    fn test_click_selects_known_option() {
        let (runtime, state) = mount(ButtonGroupInit {
            selected: None,
            options: json!({"options": ["x", "y"], "labels": ["X", "Y"]}),
        })
        .unwrap();

        assert_eq!(runtime.get_value(&state), Ok(None));
        assert_eq!(runtime.click(&state, "y"), Ok(true));
        assert_eq!(runtime.click(&state, "z"), Ok(false));
        assert_eq!(runtime.get_value(&state), Ok(Some("y".to_string())));
    }

    #[test]
    fn test_missing_options_mount_empty() {
        let (runtime, state) = mount(ButtonGroupInit {
            selected: Some("kept".into()),
            options: json!({}),
        })
        .unwrap();
        assert_eq!(runtime.options(&state), Ok(ButtonGroupOptions::default()));
        assert_eq!(runtime.get_value(&state), Ok(Some("kept".to_string())));
    }

    #[test]
    fn test_bad_options_fail_mount() {
        let result = mount(ButtonGroupInit {
            selected: None,
            options: json!({"options": "not a list"}),
        });
        assert!(matches!(result, Err(RuntimeError::MountFailed(_))));
    }

    #[test]
    fn test_release_disposes_both_signals() {
        let (runtime, state) = mount(ButtonGroupInit::default()).unwrap();
        runtime.release(&state);
        assert_eq!(runtime.options(&state), Err(RuntimeError::UnknownHandle));
        assert_eq!(runtime.get_value(&state), Err(RuntimeError::UnknownHandle));
    }
}
