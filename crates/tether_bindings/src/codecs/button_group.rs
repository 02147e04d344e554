use serde_json::json;
use tether_core::dom::Element;
use tether_core::error::MarshalError;
use tether_core::value::{json_type_name, HostValue, ValueKind};
use tether_widgets::ButtonGroupInit;

use crate::codec::{
    attribute, Decoded, ValueCodec, ValueShape, ATTR_INITIAL_VALUE, ATTR_OPTIONS,
};

/// Selected option of a button group: a string, or `null` for none
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonGroupCodec;

impl ButtonGroupCodec {
    fn decode_options(element: &Element) -> Decoded<HostValue> {
        let Some(text) = attribute(element, ATTR_OPTIONS) else {
            return Decoded::ok(json!({}));
        };
        match serde_json::from_str(text) {
            Ok(options) => Decoded::ok(options),
            Err(e) => Decoded::fallback(
                json!({}),
                MarshalError::MalformedJson {
                    attribute: ATTR_OPTIONS,
                    reason: e.to_string(),
                },
            ),
        }
    }
}

impl ValueCodec for ButtonGroupCodec {
    const KIND: &'static str = "shiny_leptos_checkbox_group_buttons";
    const SHAPE: ValueShape = ValueShape::Choice;
    const ATTRIBUTES: &'static [&'static str] = &[ATTR_INITIAL_VALUE, ATTR_OPTIONS];

    type Init = ButtonGroupInit;
    type Value = Option<String>;

    fn decode_init(&self, element: &Element) -> Decoded<ButtonGroupInit> {
        let selected = element.attribute(ATTR_INITIAL_VALUE).map(str::to_string);
        Self::decode_options(element).map(|options| ButtonGroupInit { selected, options })
    }

    fn initial_value(&self, init: &ButtonGroupInit) -> Option<String> {
        init.selected.clone()
    }

    fn coerce(&self, value: &HostValue) -> Decoded<Option<String>> {
        match value {
            HostValue::String(option) => Decoded::ok(Some(option.clone())),
            HostValue::Null => Decoded::ok(None),
            other => Decoded::fallback(
                None,
                MarshalError::UnexpectedShape {
                    expected: "string or null",
                    found: json_type_name(other),
                },
            ),
        }
    }

    fn encode(&self, value: &Option<String>) -> HostValue {
        value.clone().map_or(HostValue::Null, HostValue::String)
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Untyped
    }
}
