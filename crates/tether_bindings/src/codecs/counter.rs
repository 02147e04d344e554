use std::sync::LazyLock;

use regex::Regex;
use serde_json::Number;
use tether_core::dom::Element;
use tether_core::error::MarshalError;
use tether_core::value::{json_type_name, HostValue};
use tether_widgets::DEFAULT_COUNT;

use crate::codec::{attribute, Decoded, ValueCodec, ValueShape, ATTR_INITIAL_VALUE};

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(Infinity|(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?)")
        .expect("float prefix pattern is valid")
});

/// Parse the longest numeric prefix of `text`
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"12.5px"`
/// reads as `12.5` while `"px12"` has no number at all.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let prefix = FLOAT_PREFIX.find(text)?.as_str();
    let negative = prefix.starts_with('-');
    if prefix.ends_with("Infinity") {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    prefix.parse().ok()
}

/// Counter values: numbers, `null` when not finite
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterCodec;

impl CounterCodec {
    fn not_a_number(value: &HostValue) -> MarshalError {
        match value {
            HostValue::String(text) => MarshalError::NotANumber(text.clone()),
            other => MarshalError::UnexpectedShape {
                expected: "number",
                found: json_type_name(other),
            },
        }
    }
}

impl ValueCodec for CounterCodec {
    const KIND: &'static str = "shiny_leptos_counter_input";
    const SHAPE: ValueShape = ValueShape::Number;
    const ATTRIBUTES: &'static [&'static str] = &[ATTR_INITIAL_VALUE];

    type Init = Option<f64>;
    type Value = f64;

    fn decode_init(&self, element: &Element) -> Decoded<Option<f64>> {
        let Some(text) = attribute(element, ATTR_INITIAL_VALUE) else {
            return Decoded::ok(None);
        };
        match parse_float_prefix(text) {
            Some(count) => Decoded::ok(Some(count)),
            None => Decoded::fallback(None, MarshalError::NotANumber(text.to_string())),
        }
    }

    fn initial_value(&self, init: &Option<f64>) -> f64 {
        init.unwrap_or(DEFAULT_COUNT)
    }

    fn coerce(&self, value: &HostValue) -> Decoded<f64> {
        let parsed = match value {
            HostValue::Number(n) => n.as_f64(),
            HostValue::String(text) => parse_float_prefix(text),
            _ => None,
        };
        match parsed {
            Some(count) => Decoded::ok(count),
            None => Decoded::fallback(DEFAULT_COUNT, Self::not_a_number(value)),
        }
    }

    fn encode(&self, value: &f64) -> HostValue {
        let count = *value;
        if count.fract() == 0.0 && count.abs() < 9_007_199_254_740_992.0 {
            return HostValue::from(count as i64);
        }
        Number::from_f64(count).map_or(HostValue::Null, HostValue::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tether_core::dom::{Document, ElementSpec};

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("42"), Some(42.0));
        assert_eq!(parse_float_prefix("  -3.5e2xyz"), Some(-350.0));
        assert_eq!(parse_float_prefix("12.5px"), Some(12.5));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("7."), Some(7.0));
        assert_eq!(parse_float_prefix("1e"), Some(1.0));
        assert_eq!(parse_float_prefix("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("-"), None);
    }

    #[test]
    fn test_decode_init() {
        let mut doc = Document::new();
        let root = doc.root();
        let plain = doc.append(root, ElementSpec::new("a")).unwrap();
        let valid = doc
            .append(root, ElementSpec::new("b").attr(ATTR_INITIAL_VALUE, "3"))
            .unwrap();
        let invalid = doc
            .append(root, ElementSpec::new("c").attr(ATTR_INITIAL_VALUE, "three"))
            .unwrap();

        assert_eq!(CounterCodec.decode_init(doc.get(plain).unwrap()), Decoded::ok(None));
        assert_eq!(CounterCodec.decode_init(doc.get(valid).unwrap()), Decoded::ok(Some(3.0)));

        let decoded = CounterCodec.decode_init(doc.get(invalid).unwrap());
        assert_eq!(decoded.value, None);
        assert_eq!(decoded.issue, Some(MarshalError::NotANumber("three".into())));
        assert_eq!(CounterCodec.fallback(doc.get(invalid).unwrap()).value, json!(0));
    }

    #[test]
    fn test_coerce() {
        assert_eq!(CounterCodec.coerce(&json!(2.5)), Decoded::ok(2.5));
        assert_eq!(CounterCodec.coerce(&json!("8")), Decoded::ok(8.0));

        let coerced = CounterCodec.coerce(&json!([1]));
        assert_eq!(coerced.value, 0.0);
        assert!(matches!(
            coerced.issue,
            Some(MarshalError::UnexpectedShape { found: "array", .. })
        ));
        assert!(!CounterCodec.coerce(&json!(null)).is_clean());
    }

    #[test]
    fn test_encode() {
        assert_eq!(CounterCodec.encode(&4.0), json!(4));
        assert_eq!(CounterCodec.encode(&-0.25), json!(-0.25));
        assert_eq!(CounterCodec.encode(&f64::INFINITY), json!(null));
        assert_eq!(CounterCodec.encode(&f64::NAN), json!(null));

        // Past 2^53 whole values stay floats
        assert_eq!(CounterCodec.encode(&(u64::MAX as f64)), json!(1.8446744073709552e19));
        assert_eq!(CounterCodec.encode(&9_007_199_254_740_992.0), json!(9_007_199_254_740_992.0));
    }
}
