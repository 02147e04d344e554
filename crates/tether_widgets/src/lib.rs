//! Tether Widgets
//!
//! Runtimes for the built-in input widgets. Each runtime implements
//! [`WidgetRuntime`] over signals owned by a shared [`WidgetModule`]:
//!
//! - [`ButtonGroupRuntime`]: single-choice button row
//! - [`ColorPickerRuntime`]: `#rrggbb` color
//! - [`CounterRuntime`]: numeric counter
//! - [`DynamicItemsRuntime`]: editable list of JSON items
//! - [`TextInputRuntime`]: labelled text field

pub mod checkbox_group_buttons;
pub mod color_picker;
pub mod counter;
pub mod dynamic_items;
pub mod module;
pub mod runtime;
pub mod text_input;

use std::sync::Arc;

pub use checkbox_group_buttons::{
    ButtonGroupInit, ButtonGroupOptions, ButtonGroupRuntime, ButtonGroupState,
};
pub use color_picker::{ColorPickerRuntime, ColorPickerState};
pub use counter::{CounterRuntime, CounterState, DEFAULT_COUNT};
pub use dynamic_items::{DynamicItemsRuntime, DynamicItemsState};
pub use module::WidgetModule;
pub use runtime::{SubscriptionId, WidgetRuntime};
pub use text_input::{TextInputInit, TextInputRuntime, TextInputState};

/// Name of the module the built-in runtimes load from
pub const MODULE_NAME: &str = "tether_widgets";

/// Every built-in runtime, sharing one module
#[derive(Debug, Clone)]
pub struct WidgetRuntimes {
    pub module: Arc<WidgetModule>,
    pub button_group: ButtonGroupRuntime,
    pub color_picker: ColorPickerRuntime,
    pub counter: CounterRuntime,
    pub dynamic_items: DynamicItemsRuntime,
    pub text_input: TextInputRuntime,
}

impl WidgetRuntimes {
    pub fn new(module: Arc<WidgetModule>) -> Self {
        Self {
            button_group: ButtonGroupRuntime::new(Arc::clone(&module)),
            color_picker: ColorPickerRuntime::new(Arc::clone(&module)),
            counter: CounterRuntime::new(Arc::clone(&module)),
            dynamic_items: DynamicItemsRuntime::new(Arc::clone(&module)),
            text_input: TextInputRuntime::new(Arc::clone(&module)),
            module,
        }
    }

    /// Runtimes over a freshly loaded module
    pub fn loaded() -> Self {
        Self::new(WidgetModule::new(MODULE_NAME))
    }
}
