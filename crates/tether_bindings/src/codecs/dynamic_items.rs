use tether_core::dom::Element;
use tether_core::error::MarshalError;
use tether_core::value::{json_type_name, HostValue, ValueKind};

use crate::codec::{attribute, Decoded, ValueCodec, ValueShape, ATTR_INITIAL_VALUE};

/// Ordered list of arbitrary JSON items
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicItemsCodec;

impl ValueCodec for DynamicItemsCodec {
    const KIND: &'static str = "shiny_leptos_dynamic_items_input";
    const SHAPE: ValueShape = ValueShape::Sequence;
    const ATTRIBUTES: &'static [&'static str] = &[ATTR_INITIAL_VALUE];

    type Init = Vec<HostValue>;
    type Value = Vec<HostValue>;

    fn decode_init(&self, element: &Element) -> Decoded<Vec<HostValue>> {
        let Some(text) = attribute(element, ATTR_INITIAL_VALUE) else {
            return Decoded::ok(Vec::new());
        };
        match serde_json::from_str::<HostValue>(text) {
            Ok(HostValue::Array(items)) => Decoded::ok(items),
            Ok(other) => {
                Decoded::fallback(Vec::new(), MarshalError::NotAnArray(json_type_name(&other)))
            }
            Err(e) => Decoded::fallback(
                Vec::new(),
                MarshalError::MalformedJson {
                    attribute: ATTR_INITIAL_VALUE,
                    reason: e.to_string(),
                },
            ),
        }
    }

    fn initial_value(&self, init: &Vec<HostValue>) -> Vec<HostValue> {
        init.clone()
    }

    fn coerce(&self, value: &HostValue) -> Decoded<Vec<HostValue>> {
        match value {
            HostValue::Array(items) => Decoded::ok(items.clone()),
            other => Decoded::fallback(Vec::new(), MarshalError::NotAnArray(json_type_name(other))),
        }
    }

    fn encode(&self, value: &Vec<HostValue>) -> HostValue {
        HostValue::Array(value.clone())
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Untyped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tether_core::dom::{Document, ElementSpec};

    fn decode(initial: &str) -> Decoded<Vec<HostValue>> {
        let mut doc = Document::new();
        let node = doc
            .append(doc.root(), ElementSpec::new("items").attr(ATTR_INITIAL_VALUE, initial))
            .unwrap();
        DynamicItemsCodec.decode_init(doc.get(node).unwrap())
    }

    #[test]
    fn test_decode_array() {
        let decoded = decode(r#"["a", {"n": 1}, null]"#);
        assert_eq!(decoded, Decoded::ok(vec![json!("a"), json!({"n": 1}), json!(null)]));
    }

    #[test]
    fn test_decode_malformed_or_non_array() {
        let decoded = decode("not-json");
        assert!(decoded.value.is_empty());
        assert!(matches!(decoded.issue, Some(MarshalError::MalformedJson { .. })));

        let decoded = decode(r#"{"a": 1}"#);
        assert!(decoded.value.is_empty());
        assert_eq!(decoded.issue, Some(MarshalError::NotAnArray("object")));
    }

    #[test]
    fn test_coerce_non_array() {
        assert_eq!(DynamicItemsCodec.coerce(&json!([1, 2])), Decoded::ok(vec![json!(1), json!(2)]));
        let coerced = DynamicItemsCodec.coerce(&json!("a,b"));
        assert!(coerced.value.is_empty());
        assert_eq!(coerced.issue, Some(MarshalError::NotAnArray("string")));
    }
}
