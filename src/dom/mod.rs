//! Document abstraction
//!
//! Stack panels only need a small slice of the DOM: lookup by id, tag names,
//! parent links, descendant lookup by tag, attributes, the class list and
//! click listeners. [`Dom`] captures that slice so the toggling rules run
//! unchanged against the browser ([`web::WebDom`], `wasm` feature) and
//! against [`MemoryDom`].

mod memory;
#[cfg(feature = "wasm")]
pub mod web;

pub use memory::{ClickDispatch, MemoryDom, NodeId};

use std::fmt;

use crate::class_list::ClassList;
use crate::error::StackPanelResult;

/// What a click listener did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click was consumed; the host must suppress the default action
    Handled,
    /// Not ours; the event proceeds normally
    Ignored,
}

/// Mechanism used to attach a click listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerBinding {
    /// Standard `addEventListener`
    EventListener,
    /// Legacy `attachEvent("onclick", ...)`
    LegacyAttach,
    /// Single-slot `onclick` property; replaces any handler already there
    HandlerProperty,
}

impl ListenerBinding {
    /// Try each mechanism in order of preference and stop at the first one
    /// that succeeds. `None` when the host offers none of them.
    pub fn first_available(
        event_listener: impl FnOnce() -> bool,
        legacy_attach: impl FnOnce() -> bool,
        handler_property: impl FnOnce() -> bool,
    ) -> Option<Self> {
        if event_listener() {
            Some(Self::EventListener)
        } else if legacy_attach() {
            Some(Self::LegacyAttach)
        } else if handler_property() {
            Some(Self::HandlerProperty)
        } else {
            None
        }
    }
}

/// Click listener. Receives the document and the element that was clicked.
pub type ClickHandler<D> = Box<dyn FnMut(&mut D, &<D as Dom>::Node) -> ClickOutcome>;

/// The document operations a stack panel relies on
pub trait Dom: Sized + 'static {
    /// Element handle
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    /// Find an element by its `id` attribute
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Lower-case tag name
    fn tag_name(&self, node: &Self::Node) -> String;

    /// Parent element, `None` at the root
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Descendants of `root` with the given tag, in document order
    fn elements_by_tag(&self, root: &Self::Node, tag: &str) -> Vec<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn class_list(&self, node: &Self::Node) -> ClassList;

    fn set_class_list(&mut self, node: &Self::Node, classes: &ClassList);

    /// Attach a click listener to `node` for the lifetime of the page
    fn listen_click(
        &mut self,
        node: &Self::Node,
        handler: ClickHandler<Self>,
    ) -> StackPanelResult<ListenerBinding>;

    fn has_class(&self, node: &Self::Node, token: &str) -> bool {
        self.class_list(node).contains(token)
    }

    /// Add or remove one class token, writing back only on change.
    /// Returns `true` if the class list changed.
    fn set_class(&mut self, node: &Self::Node, token: &str, present: bool) -> bool {
        let mut classes = self.class_list(node);
        let changed = classes.set(token, present);
        if changed {
            self.set_class_list(node, &classes);
        }
        changed
    }

    /// Whether `node` is `ancestor` or one of its descendants
    fn is_within(&self, node: &Self::Node, ancestor: &Self::Node) -> bool {
        let mut current = Some(node.clone());
        while let Some(n) = current {
            if &n == ancestor {
                return true;
            }
            current = self.parent(&n);
        }
        false
    }
}
