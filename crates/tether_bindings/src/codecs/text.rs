use tether_core::dom::Element;
use tether_core::error::MarshalError;
use serde_json::Number;
use tether_core::value::{json_type_name, HostValue};
use tether_widgets::TextInputInit;

use crate::codec::{Decoded, ValueCodec, ValueShape, ATTR_INITIAL_VALUE, ATTR_LABEL};

/// Free-form text, passed through verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl ValueCodec for TextCodec {
    const KIND: &'static str = "shiny_leptos_text_input";
    const SHAPE: ValueShape = ValueShape::Text;
    const ATTRIBUTES: &'static [&'static str] = &[ATTR_INITIAL_VALUE, ATTR_LABEL];
    const ACCEPTS_LABEL: bool = true;

    type Init = TextInputInit;
    type Value = String;

    fn decode_init(&self, element: &Element) -> Decoded<TextInputInit> {
        Decoded::ok(TextInputInit {
            value: element.attribute(ATTR_INITIAL_VALUE).map(str::to_string),
            label: element.attribute(ATTR_LABEL).map(str::to_string),
        })
    }

    fn initial_value(&self, init: &TextInputInit) -> String {
        init.value.clone().unwrap_or_default()
    }

    fn coerce(&self, value: &HostValue) -> Decoded<String> {
        match value {
            HostValue::String(text) => Decoded::ok(text.clone()),
            HostValue::Null => Decoded::ok(String::new()),
            HostValue::Number(n) => Decoded::ok(number_text(n)),
            HostValue::Bool(b) => Decoded::ok(b.to_string()),
            other => Decoded::fallback(
                String::new(),
                MarshalError::UnexpectedShape {
                    expected: "text",
                    found: json_type_name(other),
                },
            ),
        }
    }

    fn encode(&self, value: &String) -> HostValue {
        HostValue::String(value.clone())
    }
}

/// Whole-valued floats print without a fractional part, as the host does
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tether_core::dom::{Document, ElementSpec};

    #[test]
    fn test_decode_value_and_label() {
        let mut doc = Document::new();
        let node = doc
            .append(
                doc.root(),
                ElementSpec::new("t")
                    .attr(ATTR_INITIAL_VALUE, "  spaced  ")
                    .attr(ATTR_LABEL, "Name"),
            )
            .unwrap();
        let decoded = TextCodec.decode_init(doc.get(node).unwrap());
        assert_eq!(decoded.value.value.as_deref(), Some("  spaced  "));
        assert_eq!(decoded.value.label.as_deref(), Some("Name"));
    }

    #[test]
    fn test_coerce_scalars() {
        assert_eq!(TextCodec.coerce(&json!("x")).value, "x");
        assert_eq!(TextCodec.coerce(&json!(null)).value, "");
        assert_eq!(TextCodec.coerce(&json!(3)).value, "3");
        assert_eq!(TextCodec.coerce(&json!(true)).value, "true");
        assert_eq!(TextCodec.coerce(&json!(1.0)).value, "1");
        assert_eq!(TextCodec.coerce(&json!(-4.0)).value, "-4");
        assert_eq!(TextCodec.coerce(&json!(2.5)).value, "2.5");
        assert_eq!(TextCodec.coerce(&json!(u64::MAX)).value, "18446744073709551615");

        let coerced = TextCodec.coerce(&json!({"a": 1}));
        assert_eq!(coerced.value, "");
        assert!(!coerced.is_clean());
    }
}
