//! The five built-in bindings

use std::sync::Arc;

use tether_core::config::BridgeConfig;
use tether_widgets::{
    ButtonGroupRuntime, ColorPickerRuntime, CounterRuntime, DynamicItemsRuntime, TextInputRuntime,
    WidgetRuntimes,
};

use crate::adapter::Adapter;
use crate::codec::{ValueCodec, WidgetDescriptor};
use crate::codecs::{ButtonGroupCodec, ColorCodec, CounterCodec, DynamicItemsCodec, TextCodec};
use crate::registry::BindingRegistry;

pub const CHECKBOX_GROUP_BUTTONS_BINDING: &str = "ShinyLeptosCheckboxGroupButtonsBinding";
pub const COLOR_PICKER_INPUT_BINDING: &str = "ShinyLeptosColorPickerInputBinding";
pub const COUNTER_INPUT_BINDING: &str = "ShinyLeptosCounterInputBinding";
pub const DYNAMIC_ITEMS_INPUT_BINDING: &str = "ShinyLeptosDynamicItemsInputBinding";
pub const TEXT_INPUT_BINDING: &str = "ShinyLeptosTextInputBinding";

pub type ButtonGroupBinding = Adapter<ButtonGroupCodec, ButtonGroupRuntime>;
pub type ColorPickerBinding = Adapter<ColorCodec, ColorPickerRuntime>;
pub type CounterBinding = Adapter<CounterCodec, CounterRuntime>;
pub type DynamicItemsBinding = Adapter<DynamicItemsCodec, DynamicItemsRuntime>;
pub type TextInputBinding = Adapter<TextCodec, TextInputRuntime>;

/// Typed handles to the registered built-in bindings
#[derive(Debug, Clone)]
pub struct BuiltinBindings {
    pub button_group: Arc<ButtonGroupBinding>,
    pub color_picker: Arc<ColorPickerBinding>,
    pub counter: Arc<CounterBinding>,
    pub dynamic_items: Arc<DynamicItemsBinding>,
    pub text_input: Arc<TextInputBinding>,
}

fn adapter<C, R>(
    config: &BridgeConfig,
    name: &'static str,
    codec: C,
    runtime: R,
) -> Arc<Adapter<C, R>>
where
    C: ValueCodec,
    R: tether_widgets::WidgetRuntime<Init = C::Init, Value = C::Value>,
{
    let descriptor = WidgetDescriptor::new::<C>(&config.namespace, name);
    Arc::new(Adapter::new(descriptor, codec, runtime, config.incident_capacity))
}

/// Register the built-in bindings over `runtimes`
pub fn register_builtin_bindings(
    registry: &BindingRegistry,
    runtimes: &WidgetRuntimes,
    config: &BridgeConfig,
) -> BuiltinBindings {
    let builtins = BuiltinBindings {
        button_group: adapter(
            config,
            CHECKBOX_GROUP_BUTTONS_BINDING,
            ButtonGroupCodec,
            runtimes.button_group.clone(),
        ),
        color_picker: adapter(
            config,
            COLOR_PICKER_INPUT_BINDING,
            ColorCodec,
            runtimes.color_picker.clone(),
        ),
        counter: adapter(config, COUNTER_INPUT_BINDING, CounterCodec, runtimes.counter.clone()),
        dynamic_items: adapter(
            config,
            DYNAMIC_ITEMS_INPUT_BINDING,
            DynamicItemsCodec,
            runtimes.dynamic_items.clone(),
        ),
        text_input: adapter(config, TEXT_INPUT_BINDING, TextCodec, runtimes.text_input.clone()),
    };

    registry.register(CHECKBOX_GROUP_BUTTONS_BINDING, builtins.button_group.clone());
    registry.register(COLOR_PICKER_INPUT_BINDING, builtins.color_picker.clone());
    registry.register(COUNTER_INPUT_BINDING, builtins.counter.clone());
    registry.register(DYNAMIC_ITEMS_INPUT_BINDING, builtins.dynamic_items.clone());
    registry.register(TEXT_INPUT_BINDING, builtins.text_input.clone());

    tracing::info!(
        namespace = %config.namespace,
        module = runtimes.module.name(),
        "registered built-in bindings"
    );
    builtins
}
