//! Labelled single-line text input

use std::sync::Arc;

use tether_core::dom::{Element, NodeId};
use tether_core::error::RuntimeResult;
use tether_core::reactive::Signal;
use tether_core::value::ChangeCallback;

use crate::module::WidgetModule;
use crate::runtime::{SubscriptionId, WidgetRuntime};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInputInit {
    pub value: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct TextInputState {
    node: NodeId,
    text: Signal<String>,
    label: Signal<Option<String>>,
}

impl TextInputState {
    pub fn node_id(&self) -> NodeId {
        self.node
    }
}

#[derive(Debug, Clone)]
pub struct TextInputRuntime {
    module: Arc<WidgetModule>,
}

impl TextInputRuntime {
    pub fn new(module: Arc<WidgetModule>) -> Self {
        Self { module }
    }

    /// Text typed by the user
    pub fn input(&self, state: &TextInputState, text: &str) -> RuntimeResult<()> {
        self.module.write(state.text, text.to_string())
    }

    pub fn label(&self, state: &TextInputState) -> RuntimeResult<Option<String>> {
        self.module.read(state.label)
    }
}

impl WidgetRuntime for TextInputRuntime {
    type Init = TextInputInit;
    type Value = String;
    type Handle = TextInputState;

    fn attach(&self, element: &Element, init: TextInputInit) -> RuntimeResult<TextInputState> {
        let text = self.module.create_signal(init.value.unwrap_or_default())?;
        let label = self.module.create_signal(init.label)?;
        Ok(TextInputState {
            node: element.node_id(),
            text,
            label,
        })
    }

    fn get_value(&self, state: &TextInputState) -> RuntimeResult<String> {
        self.module.read(state.text)
    }

    fn set_value(&self, state: &TextInputState, value: String) -> RuntimeResult<()> {
        self.module.write(state.text, value)
    }

    fn subscribe(
        &self,
        state: &TextInputState,
        callback: ChangeCallback,
    ) -> RuntimeResult<SubscriptionId> {
        self.module.watch(state.text, callback)
    }

    fn unsubscribe(&self, _state: &TextInputState, subscription: SubscriptionId) -> bool {
        self.module.unwatch(subscription)
    }

    fn release(&self, state: &TextInputState) {
        self.module.dispose(state.text);
        self.module.dispose(state.label);
    }

    fn set_label(&self, state: &TextInputState, label: Option<String>) -> RuntimeResult<()> {
        self.module.write(state.label, label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tether_core::dom::{Document, ElementSpec};

    fn mount(init: TextInputInit) -> (TextInputRuntime, TextInputState) {
        let mut doc = Document::new();
        let node = doc.append(doc.root(), ElementSpec::new("name")).unwrap();
        let runtime = TextInputRuntime::new(WidgetModule::new("text"));
        let state = runtime.attach(doc.get(node).unwrap(), init).unwrap();
        (runtime, state)
    }

    #[test]
    fn test_initial_text_and_label() {
        let (runtime, state) = mount(TextInputInit {
            value: Some("hello".into()),
            label: Some("Name".into()),
        });
        assert_eq!(runtime.get_value(&state).unwrap(), "hello");
        assert_eq!(runtime.label(&state).unwrap().as_deref(), Some("Name"));
    }

    #[test]
    fn test_label_change_does_not_notify_value_subscribers() {
        let (runtime, state) = mount(TextInputInit::default());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        runtime
            .subscribe(
                &state,
                Arc::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        runtime.set_label(&state, Some("Email".into())).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        runtime.input(&state, "a@b.c").unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(runtime.get_value(&state).unwrap(), "a@b.c");
    }
}
