use tether_core::dom::Element;
use tether_core::error::MarshalError;
use tether_core::value::{is_hex_color, json_type_name, HostValue, DEFAULT_COLOR};

use crate::codec::{attribute, Decoded, ValueCodec, ValueShape, ATTR_INITIAL_VALUE};

/// `#rrggbb` color strings
///
/// Invalid color text is reported but still forwarded; the runtime has the
/// final say over what it accepts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorCodec;

impl ValueCodec for ColorCodec {
    const KIND: &'static str = "shiny_leptos_color_picker_input";
    const SHAPE: ValueShape = ValueShape::Color;
    const ATTRIBUTES: &'static [&'static str] = &[ATTR_INITIAL_VALUE];

    type Init = Option<String>;
    type Value = String;

    fn decode_init(&self, element: &Element) -> Decoded<Option<String>> {
        match attribute(element, ATTR_INITIAL_VALUE) {
            None => Decoded::ok(None),
            Some(color) if is_hex_color(color) => Decoded::ok(Some(color.to_string())),
            Some(color) => Decoded::fallback(
                Some(color.to_string()),
                MarshalError::InvalidColor(color.to_string()),
            ),
        }
    }

    fn initial_value(&self, init: &Option<String>) -> String {
        match init {
            Some(color) if is_hex_color(color) => color.clone(),
            _ => DEFAULT_COLOR.to_string(),
        }
    }

    fn coerce(&self, value: &HostValue) -> Decoded<String> {
        match value {
            HostValue::String(color) if is_hex_color(color) => Decoded::ok(color.clone()),
            HostValue::String(color) => {
                Decoded::fallback(color.clone(), MarshalError::InvalidColor(color.clone()))
            }
            other => Decoded::fallback(
                DEFAULT_COLOR.to_string(),
                MarshalError::UnexpectedShape {
                    expected: "color string",
                    found: json_type_name(other),
                },
            ),
        }
    }

    fn encode(&self, value: &String) -> HostValue {
        HostValue::String(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tether_core::dom::{Document, ElementSpec};

    #[test]
    fn test_fallback_for_invalid_initial_color() {
        let mut doc = Document::new();
        let node = doc
            .append(
                doc.root(),
                ElementSpec::new("c").attr(ATTR_INITIAL_VALUE, "blue"),
            )
            .unwrap();
        let element = doc.get(node).unwrap();

        let decoded = ColorCodec.decode_init(element);
        assert_eq!(decoded.value.as_deref(), Some("blue"));
        assert_eq!(decoded.issue, Some(MarshalError::InvalidColor("blue".into())));

        assert_eq!(ColorCodec.fallback(element).value, json!(DEFAULT_COLOR));
    }

    #[test]
    fn test_coerce_forwards_invalid_text() {
        assert_eq!(ColorCodec.coerce(&json!("#a1B2c3")), Decoded::ok("#a1B2c3".to_string()));

        let coerced = ColorCodec.coerce(&json!("notacolor"));
        assert_eq!(coerced.value, "notacolor");
        assert!(!coerced.is_clean());

        let coerced = ColorCodec.coerce(&json!(12));
        assert_eq!(coerced.value, DEFAULT_COLOR);
        assert!(matches!(
            coerced.issue,
            Some(MarshalError::UnexpectedShape { found: "number", .. })
        ));
    }
}
