//! The host-facing input binding contract
//!
//! This is the surface the host framework's binding scanner drives. It is
//! object safe so the registry can hold every widget kind behind one type.
//! No operation returns an error: failures degrade to documented fallbacks
//! and are reported through [`InputBinding::incidents`].

use tether_core::dom::{Document, Element, Matches, NodeId};
use tether_core::value::{ChangeCallback, HostValue, InputMessage, RatePolicy, ValueKind};

use crate::codec::WidgetDescriptor;
use crate::incident::Incident;

pub trait InputBinding: Send + Sync {
    fn descriptor(&self) -> &WidgetDescriptor;

    /// Elements under `scope` this binding is responsible for
    ///
    /// Lazy and side-effect free; calling it again restarts the scan.
    fn find<'d>(&self, document: &'d Document, scope: NodeId) -> Matches<'d> {
        document.query(scope, &self.descriptor().selector)
    }

    /// Attach widget state to `element`
    ///
    /// Idempotent, and a no-op for elements without an id. A failed attach
    /// leaves the element detached; the next operation retries.
    fn initialize(&self, element: &Element);

    /// Current value, or the element's initial value when no widget is attached
    fn get_value(&self, element: &Element) -> HostValue;

    fn set_value(&self, element: &Element, value: &HostValue);

    /// Register the element's change callback
    ///
    /// Replaces and returns the previously registered callback. The callback
    /// carries no payload; the host re-reads with [`InputBinding::get_value`].
    fn subscribe(&self, element: &Element, callback: ChangeCallback) -> Option<ChangeCallback>;

    /// Apply an update sent by the host
    fn receive_message(&self, element: &Element, message: &InputMessage);

    /// Rate limiting the host should apply to change events
    fn rate_policy(&self, _element: &Element) -> Option<RatePolicy> {
        None
    }

    fn value_kind(&self, element: &Element) -> ValueKind;

    /// Type string reported to the host; `None` lets it infer
    fn type_hint(&self, element: &Element) -> Option<&'static str> {
        self.value_kind(element).type_hint()
    }

    /// Release widget state for a node removed from the document
    ///
    /// Returns `false` if the node had no widget attached.
    fn teardown(&self, node: NodeId) -> bool;

    fn is_attached(&self, node: NodeId) -> bool;

    /// Recently absorbed failures, oldest first
    fn incidents(&self) -> Vec<Incident>;
}
