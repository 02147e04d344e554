//! Generic adapter: one [`InputBinding`] per widget kind
//!
//! An adapter pairs a [`ValueCodec`] with a [`WidgetRuntime`] and keeps the
//! runtime handle of every element it has attached, keyed by node. Handles
//! are attached lazily: any operation on an element without one attempts
//! to attach first, since the runtime module may finish loading after the
//! host's initial scan.
//!
//! Runtime calls are made without holding the handle table lock. Change
//! callbacks fire synchronously inside a write and usually read the value
//! straight back through this adapter.

use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rustc_hash::FxHashMap;
use tether_core::dom::{Element, NodeId};
use tether_core::value::{ChangeCallback, HostValue, InputMessage, ValueKind};
use tether_widgets::{SubscriptionId, WidgetRuntime};

use crate::binding::InputBinding;
use crate::codec::{ValueCodec, WidgetDescriptor};
use crate::incident::{Incident, IncidentKind, IncidentLog};

struct Binding<H> {
    element_id: String,
    handle: Arc<H>,
    subscription: Option<(SubscriptionId, ChangeCallback)>,
}

pub struct Adapter<C, R>
where
    C: ValueCodec,
    R: WidgetRuntime<Init = C::Init, Value = C::Value>,
{
    descriptor: WidgetDescriptor,
    codec: C,
    runtime: R,
    bindings: RwLock<FxHashMap<NodeId, Binding<R::Handle>>>,
    incidents: Mutex<IncidentLog>,
}

impl<C, R> Adapter<C, R>
where
    C: ValueCodec,
    R: WidgetRuntime<Init = C::Init, Value = C::Value>,
{
    pub fn new(
        descriptor: WidgetDescriptor,
        codec: C,
        runtime: R,
        incident_capacity: usize,
    ) -> Self {
        Self {
            descriptor,
            codec,
            runtime,
            bindings: RwLock::new(FxHashMap::default()),
            incidents: Mutex::new(IncidentLog::new(incident_capacity)),
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// The runtime handle attached to `node`, if any
    pub fn handle(&self, node: NodeId) -> Option<Arc<R::Handle>> {
        self.read_bindings()
            .get(&node)
            .map(|binding| Arc::clone(&binding.handle))
    }

    pub fn attached_count(&self) -> usize {
        self.read_bindings().len()
    }

    pub fn has_subscription(&self, node: NodeId) -> bool {
        self.read_bindings()
            .get(&node)
            .is_some_and(|binding| binding.subscription.is_some())
    }

    pub fn incident_count(&self, kind: IncidentKind) -> usize {
        self.incident_log().count(kind)
    }

    fn read_bindings(&self) -> RwLockReadGuard<'_, FxHashMap<NodeId, Binding<R::Handle>>> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_bindings(&self) -> RwLockWriteGuard<'_, FxHashMap<NodeId, Binding<R::Handle>>> {
        self.bindings.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn incident_log(&self) -> MutexGuard<'_, IncidentLog> {
        self.incidents.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    fn attach(&self, element: &Element) -> Option<Arc<R::Handle>> {
        if !element.has_id() {
            tracing::debug!(
                binding = self.descriptor.binding_name,
                "skipping element without id"
            );
            return None;
        }
        let node = element.node_id();
        if let Some(handle) = self.handle(node) {
            return Some(handle);
        }

        let init = self.codec.decode_init(element);
        if let Some(issue) = init.issue {
            self.absorb(element, IncidentKind::MalformedInitialValue, issue);
        }

        let handle = match self.runtime.attach(element, init.value) {
            Ok(handle) => Arc::new(handle),
            Err(e) => {
                self.absorb(element, IncidentKind::AttachFailed, e);
                return None;
            }
        };

        let mut bindings = self.write_bindings();
        match bindings.entry(node) {
            Entry::Occupied(existing) => {
                let existing = Arc::clone(&existing.get().handle);
                drop(bindings);
                self.runtime.release(&handle);
                Some(existing)
            }
            Entry::Vacant(slot) => {
                slot.insert(Binding {
                    element_id: element.id().to_string(),
                    handle: Arc::clone(&handle),
                    subscription: None,
                });
                drop(bindings);
                tracing::debug!(
                    binding = self.descriptor.binding_name,
                    element = element.id(),
                    "attached widget"
                );
                Some(handle)
            }
        }
    }

    /// Attach on first use; records a detached incident when that fails
    fn ensure_attached(&self, element: &Element, operation: &str) -> Option<Arc<R::Handle>> {
        let handle = self.attach(element);
        if handle.is_none() {
            self.absorb(
                element,
                IncidentKind::Detached,
                format!("{operation} on element without widget state"),
            );
        }
        handle
    }

    fn fallback(&self, element: &Element) -> HostValue {
        let fallback = self.codec.fallback(element);
        if let Some(issue) = fallback.issue {
            self.absorb(element, IncidentKind::MalformedInitialValue, issue);
        }
        fallback.value
    }

    fn apply_label(&self, element: &Element, label: Option<&str>) {
        let Some(handle) = self.ensure_attached(element, "set_label") else {
            return;
        };
        if let Err(e) = self.runtime.set_label(&handle, label.map(str::to_string)) {
            self.absorb(element, IncidentKind::LabelFailed, e);
        }
    }

    fn ignore_field(&self, element: &Element, field: &str) {
        self.absorb(
            element,
            IncidentKind::UnhandledField,
            format!("message field `{field}` is not handled"),
        );
    }

    /// Log an absorbed failure and keep it in the incident log
    fn absorb(&self, element: &Element, kind: IncidentKind, detail: impl fmt::Display) {
        let detail = detail.to_string();
        let binding = self.descriptor.binding_name;
        let element_id = element.id();
        match kind {
            IncidentKind::AttachFailed
            | IncidentKind::ReadFailed
            | IncidentKind::WriteFailed
            | IncidentKind::SubscribeFailed
            | IncidentKind::LabelFailed => {
                tracing::error!(
                    binding,
                    element = element_id,
                    incident = kind.as_str(),
                    "{detail}"
                );
            }
            IncidentKind::MalformedInitialValue
            | IncidentKind::InvalidValue
            | IncidentKind::Detached => {
                tracing::warn!(
                    binding,
                    element = element_id,
                    incident = kind.as_str(),
                    "{detail}"
                );
            }
            IncidentKind::UnhandledField => {
                tracing::debug!(
                    binding,
                    element = element_id,
                    incident = kind.as_str(),
                    "{detail}"
                );
            }
        }

        self.incident_log().push(Incident {
            node: element.node_id(),
            element_id: element_id.to_string(),
            kind,
            detail,
        });
    }
}

impl<C, R> InputBinding for Adapter<C, R>
where
    C: ValueCodec,
    R: WidgetRuntime<Init = C::Init, Value = C::Value>,
{
    fn descriptor(&self) -> &WidgetDescriptor {
        &self.descriptor
    }

    fn initialize(&self, element: &Element) {
        self.attach(element);
    }

    fn get_value(&self, element: &Element) -> HostValue {
        let Some(handle) = self.ensure_attached(element, "get_value") else {
            return self.fallback(element);
        };
        match self.runtime.get_value(&handle) {
            Ok(value) => self.codec.encode(&value),
            Err(e) => {
                self.absorb(element, IncidentKind::ReadFailed, e);
                self.fallback(element)
            }
        }
    }

    fn set_value(&self, element: &Element, value: &HostValue) {
        let Some(handle) = self.ensure_attached(element, "set_value") else {
            return;
        };
        let coerced = self.codec.coerce(value);
        if let Some(issue) = coerced.issue {
            self.absorb(element, IncidentKind::InvalidValue, issue);
        }
        if let Err(e) = self.runtime.set_value(&handle, coerced.value) {
            self.absorb(element, IncidentKind::WriteFailed, e);
        }
    }

    fn subscribe(&self, element: &Element, callback: ChangeCallback) -> Option<ChangeCallback> {
        let handle = self.ensure_attached(element, "subscribe")?;
        let node = element.node_id();

        let previous = self
            .write_bindings()
            .get_mut(&node)
            .and_then(|binding| binding.subscription.take());
        if let Some((id, _)) = &previous {
            self.runtime.unsubscribe(&handle, *id);
        }

        match self.runtime.subscribe(&handle, Arc::clone(&callback)) {
            Ok(id) => {
                let stored = match self.write_bindings().get_mut(&node) {
                    Some(binding) => {
                        binding.subscription = Some((id, callback));
                        true
                    }
                    None => false,
                };
                if !stored {
                    self.runtime.unsubscribe(&handle, id);
                }
            }
            Err(e) => self.absorb(element, IncidentKind::SubscribeFailed, e),
        }
        previous.map(|(_, callback)| callback)
    }

    fn receive_message(&self, element: &Element, message: &InputMessage) {
        if let Some(value) = message.value() {
            self.set_value(element, value);
        }
        if message.has_label() {
            if C::ACCEPTS_LABEL {
                self.apply_label(element, message.label());
            } else {
                self.ignore_field(element, InputMessage::LABEL);
            }
        }
        for field in message.extra_fields() {
            self.ignore_field(element, field);
        }
    }

    fn value_kind(&self, _element: &Element) -> ValueKind {
        self.codec.value_kind()
    }

    fn teardown(&self, node: NodeId) -> bool {
        let Some(binding) = self.write_bindings().remove(&node) else {
            return false;
        };
        if let Some((id, _)) = binding.subscription {
            self.runtime.unsubscribe(&binding.handle, id);
        }
        self.runtime.release(&binding.handle);
        tracing::debug!(
            binding = self.descriptor.binding_name,
            element = %binding.element_id,
            "released widget"
        );
        true
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.read_bindings().contains_key(&node)
    }

    fn incidents(&self) -> Vec<Incident> {
        self.incident_log().snapshot()
    }
}

impl<C, R> fmt::Debug for Adapter<C, R>
where
    C: ValueCodec,
    R: WidgetRuntime<Init = C::Init, Value = C::Value>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("binding", &self.descriptor.binding_name)
            .field("selector", &self.descriptor.selector.to_string())
            .field("attached", &self.attached_count())
            .finish()
    }
}
