//! In-memory [`Document`] implementation.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{Document, EventKind, ListenerId, ListenerTarget, NodeId};
use crate::render::HIGHLIGHT_CLASS;

/// Description of an element to insert into a [`MemoryDocument`].
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    id: Option<String>,
    name: Option<String>,
    parent: Option<NodeId>,
    value: String,
}

impl ElementSpec {
    /// An element with an `id` attribute.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// An element with a `name` attribute.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Place the element under `parent`.
    pub fn child_of(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Initial form value.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

#[derive(Debug, Clone, Default)]
struct Element {
    id: Option<String>,
    name: Option<String>,
    parent: Option<NodeId>,
    value: String,
    inner_html: String,
    hidden: bool,
    row_classes: BTreeMap<usize, BTreeSet<String>>,
    scrolled_row: Option<usize>,
}

/// A flat element table standing in for a browser DOM.
///
/// Elements are inserted in document order, so `element_by_name` returns the
/// first inserted match like `querySelector` would.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    elements: Vec<Element>,
    listeners: HashMap<ListenerId, (ListenerTarget, EventKind)>,
    next_listener: u64,
    focused: Option<NodeId>,
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element and return its handle.
    pub fn insert(&mut self, spec: ElementSpec) -> NodeId {
        let node = NodeId(self.elements.len() as u64);
        self.elements.push(Element {
            id: spec.id,
            name: spec.name,
            parent: spec.parent,
            value: spec.value,
            ..Element::default()
        });
        node
    }

    fn get(&self, node: NodeId) -> Option<&Element> {
        self.elements.get(node.0 as usize)
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.elements.get_mut(node.0 as usize)
    }

    /// Current markup inside `node`.
    pub fn inner_html(&self, node: NodeId) -> &str {
        self.get(node).map(|e| e.inner_html.as_str()).unwrap_or("")
    }

    /// Whether `node` is hidden.
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|e| e.hidden)
    }

    /// Whether row `row` of `container` carries `class`.
    pub fn row_has_class(&self, container: NodeId, row: usize, class: &str) -> bool {
        self.get(container)
            .and_then(|e| e.row_classes.get(&row))
            .is_some_and(|classes| classes.contains(class))
    }

    /// Rows of `container` currently carrying the highlight class.
    pub fn highlighted_rows(&self, container: NodeId) -> Vec<usize> {
        self.get(container)
            .map(|e| {
                e.row_classes
                    .iter()
                    .filter(|(_, classes)| classes.contains(HIGHLIGHT_CLASS))
                    .map(|(&row, _)| row)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Last row of `container` scrolled into view.
    pub fn scrolled_row(&self, container: NodeId) -> Option<usize> {
        self.get(container).and_then(|e| e.scrolled_row)
    }

    /// Element holding keyboard focus.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Whether a listener of `kind` is attached to `target`.
    pub fn has_listener(&self, target: ListenerTarget, kind: EventKind) -> bool {
        self.listeners.values().any(|&l| l == (target, kind))
    }
}

impl Document for MemoryDocument {
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .position(|e| e.id.as_deref() == Some(id))
            .map(|i| NodeId(i as u64))
    }

    fn element_by_name(&self, name: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .position(|e| e.name.as_deref() == Some(name))
            .map(|i| NodeId(i as u64))
    }

    fn value(&self, node: NodeId) -> String {
        self.get(node).map(|e| e.value.clone()).unwrap_or_default()
    }

    fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(e) = self.get_mut(node) {
            e.value = value.to_string();
        }
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) {
        if let Some(e) = self.get_mut(node) {
            e.inner_html = html.to_string();
            e.row_classes.clear();
            e.scrolled_row = None;
        }
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(e) = self.get_mut(node) {
            e.hidden = hidden;
        }
    }

    fn set_row_class(&mut self, container: NodeId, row: usize, class: &str, enabled: bool) {
        let Some(e) = self.get_mut(container) else {
            return;
        };
        if enabled {
            e.row_classes.entry(row).or_default().insert(class.to_string());
        } else if let Some(classes) = e.row_classes.get_mut(&row) {
            classes.remove(class);
            if classes.is_empty() {
                e.row_classes.remove(&row);
            }
        }
    }

    fn scroll_row_into_view(&mut self, container: NodeId, row: usize) {
        if let Some(e) = self.get_mut(container) {
            e.scrolled_row = Some(row);
        }
    }

    fn focus(&mut self, node: NodeId) {
        if self.get(node).is_some() {
            self.focused = Some(node);
        }
    }

    fn contains(&self, ancestor: NodeId, target: NodeId) -> bool {
        let mut current = Some(target);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.get(node).and_then(|e| e.parent);
        }
        false
    }

    fn add_listener(&mut self, target: ListenerTarget, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, (target, kind));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id_and_name() {
        let mut doc = MemoryDocument::new();
        let form = doc.insert(ElementSpec::with_id("sell-form"));
        let first = doc.insert(ElementSpec::with_name("totalsell").child_of(form));
        doc.insert(ElementSpec::with_name("totalsell"));

        assert_eq!(doc.element_by_id("sell-form"), Some(form));
        assert_eq!(doc.element_by_name("totalsell"), Some(first));
        assert_eq!(doc.element_by_id("missing"), None);
    }

    #[test]
    fn test_contains_walks_parents() {
        let mut doc = MemoryDocument::new();
        let root = doc.insert(ElementSpec::default());
        let child = doc.insert(ElementSpec::default().child_of(root));
        let grandchild = doc.insert(ElementSpec::default().child_of(child));
        let other = doc.insert(ElementSpec::default());

        assert!(doc.contains(root, grandchild));
        assert!(doc.contains(child, child));
        assert!(!doc.contains(child, root));
        assert!(!doc.contains(root, other));
    }

    #[test]
    fn test_inner_html_resets_row_state() {
        let mut doc = MemoryDocument::new();
        let list = doc.insert(ElementSpec::with_id("list"));
        doc.set_inner_html(list, "<div>a</div><div>b</div>");
        doc.set_row_class(list, 1, HIGHLIGHT_CLASS, true);
        doc.set_row_class(list, 0, "muted", true);
        doc.scroll_row_into_view(list, 1);
        assert_eq!(doc.highlighted_rows(list), vec![1]);
        assert!(doc.row_has_class(list, 0, "muted"));
        assert!(!doc.row_has_class(list, 0, HIGHLIGHT_CLASS));

        doc.set_inner_html(list, "");
        assert!(doc.highlighted_rows(list).is_empty());
        assert!(!doc.row_has_class(list, 0, "muted"));
        assert_eq!(doc.scrolled_row(list), None);
    }

    #[test]
    fn test_listener_table() {
        let mut doc = MemoryDocument::new();
        let input = doc.insert(ElementSpec::with_id("q"));
        let a = doc.add_listener(ListenerTarget::Element(input), EventKind::Input);
        let b = doc.add_listener(ListenerTarget::Document, EventKind::Click);
        assert_eq!(doc.listener_count(), 2);
        assert!(doc.has_listener(ListenerTarget::Document, EventKind::Click));

        doc.remove_listener(a);
        doc.remove_listener(a);
        doc.remove_listener(b);
        assert_eq!(doc.listener_count(), 0);
    }
}
