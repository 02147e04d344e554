//! Value codecs
//!
//! A codec translates between the host's JSON values and one widget kind's
//! runtime values. Codecs never fail: malformed input decodes to the kind's
//! safe default and the problem travels alongside as a [`MarshalError`] so
//! the adapter can log and record it.

use tether_core::dom::{Element, Selector};
use tether_core::error::MarshalError;
use tether_core::value::{HostValue, ValueKind};

/// Attribute carrying the initial value
pub const ATTR_INITIAL_VALUE: &str = "data-initial-value";
/// Attribute carrying JSON widget options
pub const ATTR_OPTIONS: &str = "data-options";
/// Attribute carrying the widget label
pub const ATTR_LABEL: &str = "data-label";

/// Host-side shape of a widget value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Text,
    Number,
    Color,
    /// One option out of a set, or nothing
    Choice,
    /// Ordered list of JSON items
    Sequence,
}

/// A decoded value, plus the problem that forced a fallback if there was one
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub issue: Option<MarshalError>,
}

impl<T> Decoded<T> {
    pub fn ok(value: T) -> Self {
        Self { value, issue: None }
    }

    pub fn fallback(value: T, issue: MarshalError) -> Self {
        Self {
            value,
            issue: Some(issue),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issue.is_none()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            issue: self.issue,
        }
    }
}

/// Static description of one widget kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetDescriptor {
    /// Kind slug, e.g. `shiny_leptos_counter_input`
    pub kind: &'static str,
    /// Name the binding registers under
    pub binding_name: &'static str,
    /// Discovery selector, `.{namespace}-{kind}-container`
    pub selector: Selector,
    /// Data attributes read on initialize
    pub attributes: &'static [&'static str],
    pub shape: ValueShape,
}

impl WidgetDescriptor {
    pub fn new<C: ValueCodec>(namespace: &str, binding_name: &'static str) -> Self {
        Self {
            kind: C::KIND,
            binding_name,
            selector: Selector::class(format!("{namespace}-{}-container", C::KIND)),
            attributes: C::ATTRIBUTES,
            shape: C::SHAPE,
        }
    }
}

/// Per-kind decode/encode/validate rules
pub trait ValueCodec: Send + Sync + 'static {
    const KIND: &'static str;
    const SHAPE: ValueShape;
    const ATTRIBUTES: &'static [&'static str];
    /// Whether inbound `label` message fields are applied
    const ACCEPTS_LABEL: bool = false;

    /// Attach parameters
    type Init: Send;
    /// Runtime-side value
    type Value: Clone + Send + Sync + 'static;

    /// Read attach parameters from the element's data attributes
    fn decode_init(&self, element: &Element) -> Decoded<Self::Init>;

    /// The value a widget attached with `init` would report
    fn initial_value(&self, init: &Self::Init) -> Self::Value;

    /// Coerce a host value for the runtime
    fn coerce(&self, value: &HostValue) -> Decoded<Self::Value>;

    fn encode(&self, value: &Self::Value) -> HostValue;

    fn value_kind(&self) -> ValueKind {
        ValueKind::Text
    }

    /// Best-effort value for an element without live widget state
    fn fallback(&self, element: &Element) -> Decoded<HostValue> {
        let init = self.decode_init(element);
        let value = self.initial_value(&init.value);
        Decoded {
            value: self.encode(&value),
            issue: init.issue,
        }
    }
}

/// Attribute text, treating an empty attribute as absent
pub(crate) fn attribute<'e>(element: &'e Element, name: &str) -> Option<&'e str> {
    element.attribute(name).filter(|text| !text.is_empty())
}
