//! In-memory document
//!
//! A minimal element tree implementing [`Dom`]. Clicks are dispatched by
//! bubbling from the target up to the root, invoking the listeners
//! registered on each element along the way.

use std::collections::{BTreeMap, HashMap};

use crate::class_list::ClassList;
use crate::config::Markers;
use crate::error::StackPanelResult;

use super::{ClickHandler, ClickOutcome, Dom, ListenerBinding};

/// Handle to an element of a [`MemoryDom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: ClassList,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            classes: ClassList::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Result of dispatching a click through a [`MemoryDom`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickDispatch {
    /// Listeners invoked while the event bubbled
    pub listeners_invoked: usize,
    /// Whether any listener suppressed the default action
    pub default_prevented: bool,
}

/// In-memory element tree rooted at a `body` element
pub struct MemoryDom {
    elements: Vec<Element>,
    root: NodeId,
    listeners: HashMap<NodeId, Vec<Listener>>,
}

type Listener = Box<dyn FnMut(&mut MemoryDom, &NodeId) -> ClickOutcome>;

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body")],
            root: NodeId(0),
            listeners: HashMap::new(),
        }
    }

    /// The document body
    pub fn root(&self) -> NodeId {
        self.root
    }

    // ========================
    // Tree Building
    // ========================

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.elements.push(Element::new(tag));
        NodeId(self.elements.len() - 1)
    }

    /// Move `child` under `parent`, detaching it from any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.elements[child.0].parent.take() {
            self.elements[old.0].children.retain(|c| *c != child);
        }
        self.elements[child.0].parent = Some(parent);
        self.elements[parent.0].children.push(child);
    }

    /// Create an element and append it to `parent`
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let child = self.create_element(tag);
        self.append_child(parent, child);
        child
    }

    /// Set an attribute. `class` replaces the class list.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let element = &mut self.elements[node.0];
        if name == "class" {
            element.classes = ClassList::parse(value);
        } else {
            element.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        self.set_attribute(node, "id", id);
    }

    pub fn add_class(&mut self, node: NodeId, token: &str) {
        self.elements[node.0].classes.add(token);
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.elements[node.0].children
    }

    /// Number of click listeners registered on `node`
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners.get(&node).map_or(0, Vec::len)
    }

    /// Total number of click listeners in the document
    pub fn total_listeners(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    // ========================
    // Stack Panel Markup
    // ========================

    /// Append a stack panel using the default marker classes.
    ///
    /// Each item is `(label, panel_id, open)`. Returns the container.
    pub fn stack_panel(&mut self, container_id: &str, items: &[(&str, &str, bool)]) -> NodeId {
        self.stack_panel_with(container_id, items, &Markers::default())
    }

    /// Append a stack panel: a `ul` container holding one `li` per item,
    /// each with an anchor pointing at a `div` panel appended to the body.
    pub fn stack_panel_with(
        &mut self,
        container_id: &str,
        items: &[(&str, &str, bool)],
        markers: &Markers,
    ) -> NodeId {
        let root = self.root;
        let container = self.append(root, "ul");
        self.set_id(container, container_id);

        for (label, panel_id, open) in items {
            let item = self.append(container, "li");
            self.add_class(item, &markers.item);
            if *open {
                self.add_class(item, &markers.active);
            }
            let link = self.append(item, "a");
            self.add_class(link, &markers.link);
            self.set_attribute(link, "href", &format!("#{panel_id}"));
            self.set_attribute(link, "title", label);

            let panel = self.append(root, "div");
            self.set_id(panel, panel_id);
            if !*open {
                self.add_class(panel, &markers.hidden);
            }
        }
        container
    }

    /// Anchors of every `li` in `container`, in document order
    pub fn item_links(&self, container: NodeId) -> Vec<NodeId> {
        self.elements_by_tag(&container, "li")
            .iter()
            .filter_map(|li| self.elements_by_tag(li, "a").into_iter().next())
            .collect()
    }

    // ========================
    // Events
    // ========================

    /// Dispatch a click on `target`, bubbling up to the root
    pub fn click(&mut self, target: NodeId) -> ClickDispatch {
        let mut dispatch = ClickDispatch::default();
        let mut current = Some(target);

        while let Some(node) = current {
            if let Some(mut handlers) = self.listeners.remove(&node) {
                for handler in handlers.iter_mut() {
                    if handler(self, &target) == ClickOutcome::Handled {
                        dispatch.default_prevented = true;
                    }
                    dispatch.listeners_invoked += 1;
                }
                // Keep listeners added while dispatching
                if let Some(added) = self.listeners.remove(&node) {
                    handlers.extend(added);
                }
                self.listeners.insert(node, handlers);
            }
            current = self.elements[node.0].parent;
        }

        dispatch
    }

    fn descendants(&self, root: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.elements[root.0].children {
            out.push(child);
            self.descendants(child, out);
        }
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut all = Vec::new();
        self.descendants(self.root, &mut all);
        all.into_iter()
            .find(|n| self.elements[n.0].attributes.get("id").map(String::as_str) == Some(id))
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.elements[node.0].tag.clone()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.elements[node.0].parent
    }

    fn elements_by_tag(&self, root: &NodeId, tag: &str) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.descendants(*root, &mut all);
        all.retain(|n| self.elements[n.0].tag.eq_ignore_ascii_case(tag));
        all
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        let element = &self.elements[node.0];
        if name == "class" {
            return (!element.classes.is_empty()).then(|| element.classes.to_string());
        }
        element.attributes.get(name).cloned()
    }

    fn class_list(&self, node: &NodeId) -> ClassList {
        self.elements[node.0].classes.clone()
    }

    fn set_class_list(&mut self, node: &NodeId, classes: &ClassList) {
        self.elements[node.0].classes = classes.clone();
    }

    fn listen_click(
        &mut self,
        node: &NodeId,
        handler: ClickHandler<Self>,
    ) -> StackPanelResult<ListenerBinding> {
        self.listeners.entry(*node).or_default().push(handler);
        Ok(ListenerBinding::EventListener)
    }
}
