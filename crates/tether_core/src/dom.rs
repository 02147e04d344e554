//! Document model for bound elements
//!
//! A minimal element tree standing in for the host page:
//!
//! - [`Document`] owns every [`Element`] in a slot map keyed by [`NodeId`]
//! - [`Selector`] is a compound class selector (`.a.b`) used for discovery
//! - [`Document::query`] yields matching descendants lazily, in document order
//! - Removal observers are told which nodes left the tree so bindings can
//!   release the widget state they hold for them
//!
//! ```rust
//! use tether_core::dom::{Document, ElementSpec, Selector};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! doc.append(root, ElementSpec::new("count").class("counter-container"));
//!
//! let selector: Selector = ".counter-container".parse().unwrap();
//! let ids: Vec<_> = doc.query(root, &selector).map(|e| e.id().to_string()).collect();
//! assert_eq!(ids, vec!["count"]);
//! ```

use indexmap::IndexMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::SelectorError;

new_key_type! {
    /// Stable identity of an element within its document
    pub struct NodeId;
}

/// Called with every node removed by one [`Document::remove`] call
pub type RemovalObserver = Arc<dyn Fn(&[NodeId]) + Send + Sync>;

/// A node in the document
#[derive(Debug, Clone)]
pub struct Element {
    node: NodeId,
    id: String,
    classes: SmallVec<[String; 2]>,
    attributes: IndexMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// The element's `id`; may be empty
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Elements without an identifier are never bound
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attributes in insertion order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Description of an element to append
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    id: String,
    classes: SmallVec<[String; 2]>,
    attributes: IndexMap<String, String>,
}

impl ElementSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// An element with no identifier
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Compound class selector, e.g. `.widget-container.active`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    classes: SmallVec<[String; 2]>,
}

impl Selector {
    /// Selector matching a single class
    pub fn class(class: impl Into<String>) -> Self {
        let mut classes = SmallVec::new();
        classes.push(class.into());
        Self { classes }
    }

    pub fn matches(&self, element: &Element) -> bool {
        self.classes.iter().all(|c| element.has_class(c))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SelectorError::Empty);
        }
        let Some(rest) = text.strip_prefix('.') else {
            return Err(SelectorError::Unsupported(text.to_string()));
        };

        let mut classes = SmallVec::new();
        for class in rest.split('.') {
            let valid = !class.is_empty()
                && class
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid {
                return Err(SelectorError::Unsupported(text.to_string()));
            }
            classes.push(class.to_string());
        }
        Ok(Self { classes })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        Ok(())
    }
}

/// The element tree
pub struct Document {
    nodes: SlotMap<NodeId, Element>,
    root: NodeId,
    observers: Vec<RemovalObserver>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only an anonymous root element
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert_with_key(|node| Element {
            node,
            id: String::new(),
            classes: SmallVec::new(),
            attributes: IndexMap::new(),
            parent: None,
            children: Vec::new(),
        });
        Self {
            nodes,
            root,
            observers: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Append a new element as the last child of `parent`
    ///
    /// Returns `None` if `parent` is not in the document.
    pub fn append(&mut self, parent: NodeId, spec: ElementSpec) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        let node = self.nodes.insert_with_key(|node| Element {
            node,
            id: spec.id,
            classes: spec.classes,
            attributes: spec.attributes,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(node);
        }
        Some(node)
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Number of elements, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find the first element with the given identifier
    pub fn by_id(&self, id: &str) -> Option<&Element> {
        if id.is_empty() {
            return None;
        }
        self.descendants(self.root).find(|e| e.id == id)
    }

    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        match self.nodes.get_mut(node) {
            Some(element) => {
                element.attributes.insert(name.into(), value.into());
                true
            }
            None => false,
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Option<String> {
        self.nodes
            .get_mut(node)
            .and_then(|e| e.attributes.shift_remove(name))
    }

    /// All descendants of `scope` in document order, `scope` excluded
    pub fn descendants(&self, scope: NodeId) -> Descendants<'_> {
        let stack = self
            .nodes
            .get(scope)
            .map(|e| e.children.iter().rev().copied().collect())
            .unwrap_or_default();
        Descendants { doc: self, stack }
    }

    /// Descendants of `scope` matching `selector`
    ///
    /// The iterator borrows the document, so each call starts a fresh scan.
    pub fn query(&self, scope: NodeId, selector: &Selector) -> Matches<'_> {
        Matches {
            inner: self.descendants(scope),
            selector: selector.clone(),
        }
    }

    /// Register a callback invoked after every subtree removal
    pub fn observe_removals(&mut self, observer: RemovalObserver) {
        self.observers.push(observer);
    }

    /// Detach and drop `node` with its whole subtree
    ///
    /// Observers receive the removed nodes in document order. The root cannot
    /// be removed.
    pub fn remove(&mut self, node: NodeId) -> Vec<NodeId> {
        if node == self.root || !self.nodes.contains_key(node) {
            return Vec::new();
        }

        let mut removed = vec![node];
        removed.extend(self.descendants(node).map(Element::node_id));

        let parent = self.nodes.get(node).and_then(|e| e.parent);
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(p)) {
            p.children.retain(|c| *c != node);
        }
        for id in &removed {
            self.nodes.remove(*id);
        }

        tracing::debug!(count = removed.len(), "removed elements from document");

        for observer in self.observers.clone() {
            observer(removed.as_slice());
        }
        removed
    }
}

/// Pre-order walk over a subtree
pub struct Descendants<'d> {
    doc: &'d Document,
    stack: Vec<NodeId>,
}

impl<'d> Iterator for Descendants<'d> {
    type Item = &'d Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let Some(element) = self.doc.nodes.get(node) {
                self.stack.extend(element.children.iter().rev().copied());
                return Some(element);
            }
        }
        None
    }
}

/// Elements matched by a selector; see [`Document::query`]
pub struct Matches<'d> {
    inner: Descendants<'d>,
    selector: Selector,
}

impl<'d> Iterator for Matches<'d> {
    type Item = &'d Element;

    fn next(&mut self) -> Option<Self::Item> {
        let selector = &self.selector;
        self.inner.by_ref().find(|e| selector.matches(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let panel = doc
            .append(root, ElementSpec::new("panel").class("panel"))
            .unwrap();
        let a = doc
            .append(panel, ElementSpec::new("a").class("w-container"))
            .unwrap();
        let b = doc
            .append(
                root,
                ElementSpec::new("b")
                    .class("w-container")
                    .class("active")
                    .attr("data-initial-value", "5"),
            )
            .unwrap();
        (doc, panel, a, b)
    }

    #[test]
    fn test_selector_parse() {
        let sel: Selector = ".w-container.active".parse().unwrap();
        assert_eq!(sel.to_string(), ".w-container.active");

        assert_eq!("".parse::<Selector>(), Err(SelectorError::Empty));
        assert!("#id".parse::<Selector>().is_err());
        assert!(".a..b".parse::<Selector>().is_err());
        assert!("div.a".parse::<Selector>().is_err());
    }

    #[test]
    fn test_query_document_order() {
        let (doc, panel, a, b) = sample();
        let sel = Selector::class("w-container");

        let found: Vec<NodeId> = doc.query(doc.root(), &sel).map(|e| e.node_id()).collect();
        assert_eq!(found, vec![a, b]);

        // Scoped to the panel subtree only
        let found: Vec<NodeId> = doc.query(panel, &sel).map(|e| e.node_id()).collect();
        assert_eq!(found, vec![a]);

        // Compound selector
        let sel: Selector = ".w-container.active".parse().unwrap();
        assert_eq!(doc.query(doc.root(), &sel).count(), 1);
    }

    #[test]
    fn test_query_is_restartable() {
        let (doc, _, _, _) = sample();
        let sel = Selector::class("w-container");
        let first = doc.query(doc.root(), &sel).count();
        let second = doc.query(doc.root(), &sel).count();
        assert_eq!(first, second);
    }

    #[test]
    fn test_attributes() {
        let (mut doc, _, a, b) = sample();
        assert_eq!(
            doc.get(b).unwrap().attribute("data-initial-value"),
            Some("5")
        );

        assert!(doc.set_attribute(a, "data-label", "Name"));
        assert_eq!(doc.get(a).unwrap().attribute("data-label"), Some("Name"));
        assert_eq!(doc.remove_attribute(a, "data-label"), Some("Name".into()));
        assert_eq!(doc.get(a).unwrap().attribute("data-label"), None);
    }

    #[test]
    fn test_anonymous_element_has_no_id() {
        let mut doc = Document::new();
        let root = doc.root();
        let node = doc.append(root, ElementSpec::anonymous()).unwrap();
        assert!(!doc.get(node).unwrap().has_id());
        assert!(doc.by_id("").is_none());
    }

    #[test]
    fn test_remove_notifies_observers() {
        let (mut doc, panel, a, b) = sample();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        doc.observe_removals(Arc::new(move |nodes: &[NodeId]| {
            seen_clone.lock().unwrap().extend_from_slice(nodes);
        }));

        let removed = doc.remove(panel);
        assert_eq!(removed, vec![panel, a]);
        assert_eq!(*seen.lock().unwrap(), vec![panel, a]);
        assert!(!doc.contains(a));
        assert!(doc.contains(b));
        assert_eq!(doc.get(doc.root()).unwrap().children(), &[b]);

        // Root and unknown nodes are ignored
        assert!(doc.remove(doc.root()).is_empty());
        assert!(doc.remove(panel).is_empty());
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_by_id() {
        let (doc, _, a, _) = sample();
        assert_eq!(doc.by_id("a").map(Element::node_id), Some(a));
        assert!(doc.by_id("missing").is_none());
    }
}
