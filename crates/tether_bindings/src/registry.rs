//! Binding registry
//!
//! Maps binding names to [`InputBinding`]s in registration order. The host
//! scanner walks the registry to bind every element on the page, and a
//! removal observer on the document forwards node removals to every binding
//! so widget state is released with its element.

use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use indexmap::IndexMap;
use tether_core::dom::{Document, NodeId};

use crate::binding::InputBinding;

static GLOBAL_REGISTRY: OnceLock<Arc<BindingRegistry>> = OnceLock::new();

#[derive(Default)]
pub struct BindingRegistry {
    bindings: RwLock<IndexMap<String, Arc<dyn InputBinding>>>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static Arc<BindingRegistry> {
        GLOBAL_REGISTRY.get_or_init(|| Arc::new(BindingRegistry::new()))
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<String, Arc<dyn InputBinding>>> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Arc<dyn InputBinding>>> {
        self.bindings.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `binding` under `name`, returning the binding it replaces
    ///
    /// A replaced binding keeps its position in registration order.
    pub fn register(
        &self,
        name: impl Into<String>,
        binding: Arc<dyn InputBinding>,
    ) -> Option<Arc<dyn InputBinding>> {
        let name = name.into();
        let previous = self.write().insert(name.clone(), binding);
        if previous.is_some() {
            tracing::debug!(binding = %name, "replaced registered binding");
        } else {
            tracing::debug!(binding = %name, "registered binding");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn InputBinding>> {
        self.read().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn snapshot(&self) -> Vec<Arc<dyn InputBinding>> {
        self.read().values().cloned().collect()
    }

    /// Initialize every element under `scope` that a registered binding finds
    ///
    /// Returns the number of elements visited.
    pub fn bind_all(&self, document: &Document, scope: NodeId) -> usize {
        let mut visited = 0;
        for binding in self.snapshot() {
            for element in binding.find(document, scope) {
                binding.initialize(element);
                visited += 1;
            }
        }
        tracing::debug!(elements = visited, "bound document scope");
        visited
    }

    /// Forward removed nodes to every binding; returns how many handles were released
    pub fn teardown(&self, removed: &[NodeId]) -> usize {
        let bindings = self.snapshot();
        removed
            .iter()
            .map(|&node| bindings.iter().filter(|b| b.teardown(node)).count())
            .sum()
    }

    /// Release widget state whenever nodes leave `document`
    ///
    /// The observer holds the registry weakly and does nothing once it is gone.
    pub fn observe(self: &Arc<Self>, document: &mut Document) {
        let registry: Weak<Self> = Arc::downgrade(self);
        document.observe_removals(Arc::new(move |removed: &[NodeId]| {
            if let Some(registry) = registry.upgrade() {
                let released = registry.teardown(removed);
                if released > 0 {
                    tracing::debug!(released, "released widgets for removed elements");
                }
            }
        }));
    }
}

impl std::fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingRegistry")
            .field("bindings", &self.names())
            .finish()
    }
}
