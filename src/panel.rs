//! Panel groups - the accordion itself
//!
//! A [`PanelGroup`] enhances one container. Item state is never cached: an
//! item is open when it carries the active marker, and its panel is shown
//! when it lacks the hidden marker. Both markers are always changed
//! together, so the document stays the single source of truth.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::Markers;
use crate::dom::{ClickHandler, ClickOutcome, Dom, ListenerBinding};
use crate::error::{StackPanelError, StackPanelResult};

/// Which item is open right after construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialOpen {
    /// Keep the markup's state. A single-open group still closes every item
    /// that is not the container's first `li`, so at most that one stays
    /// open.
    #[default]
    Authored,
    /// Open the item at this index. A single-open group closes the others.
    Index(usize),
    /// Close every item
    Closed,
}

/// Construction options for a [`PanelGroup`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelGroupOptions {
    /// Allow several items to be open at once
    pub multi_open: bool,
    pub initial: InitialOpen,
    pub markers: Markers,
}

impl Default for PanelGroupOptions {
    fn default() -> Self {
        Self {
            multi_open: false,
            initial: InitialOpen::Authored,
            markers: Markers::default(),
        }
    }
}

impl PanelGroupOptions {
    /// At most one item open at a time
    pub fn single() -> Self {
        Self::default()
    }

    /// Items toggle independently
    pub fn multi() -> Self {
        Self {
            multi_open: true,
            ..Self::default()
        }
    }

    pub fn with_initial(mut self, initial: InitialOpen) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }
}

/// Extract the panel id from an anchor href (the text after the last `#`)
pub fn panel_id_from_href(href: &str) -> Option<&str> {
    href.rsplit_once('#')
        .map(|(_, fragment)| fragment)
        .filter(|fragment| !fragment.is_empty())
}

/// One accordion container and its click handling
pub struct PanelGroup<D: Dom> {
    container_id: String,
    container: D::Node,
    options: PanelGroupOptions,
    binding: Cell<Option<ListenerBinding>>,
}

impl<D: Dom> fmt::Debug for PanelGroup<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelGroup")
            .field("container_id", &self.container_id)
            .field("container", &self.container)
            .field("options", &self.options)
            .field("binding", &self.binding.get())
            .finish()
    }
}

impl<D: Dom> PanelGroup<D> {
    /// Find the container and apply the initial state, without listening
    /// for clicks. Returns `None` if the container does not exist.
    pub fn new(dom: &mut D, container_id: &str, options: PanelGroupOptions) -> Option<Self> {
        let Some(container) = dom.element_by_id(container_id) else {
            debug!("stack panel '{}' not present, skipping", container_id);
            return None;
        };

        let group = Self {
            container_id: container_id.to_string(),
            container,
            options,
            binding: Cell::new(None),
        };
        group.apply_initial(dom);
        Some(group)
    }

    /// Build the group and attach its click listener to the container.
    ///
    /// A missing container is not an error: the result is `Ok(None)` and no
    /// listener is registered.
    pub fn attach(
        dom: &mut D,
        container_id: &str,
        options: PanelGroupOptions,
    ) -> StackPanelResult<Option<Rc<Self>>> {
        let Some(group) = Self::new(dom, container_id, options) else {
            return Ok(None);
        };
        let group = Rc::new(group);
        group.bind(dom)?;
        Ok(Some(group))
    }

    /// Register the delegated click listener. The listener shares ownership
    /// of the group, so it keeps working for as long as the host keeps the
    /// listener, whatever happens to the returned handle.
    pub fn bind(self: &Rc<Self>, dom: &mut D) -> StackPanelResult<ListenerBinding> {
        let group = Rc::clone(self);
        let handler: ClickHandler<D> =
            Box::new(move |dom, target| group.handle_click(dom, target));
        let binding = dom.listen_click(&self.container, handler)?;
        debug!(
            "stack panel '{}' listening for clicks via {:?}",
            self.container_id, binding
        );
        self.binding.set(Some(binding));
        Ok(binding)
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn container(&self) -> &D::Node {
        &self.container
    }

    pub fn options(&self) -> &PanelGroupOptions {
        &self.options
    }

    pub fn is_multi_open(&self) -> bool {
        self.options.multi_open
    }

    /// How the click listener was attached, if it was
    pub fn binding(&self) -> Option<ListenerBinding> {
        self.binding.get()
    }

    // ========================
    // State
    // ========================

    /// Items of the group: `li` descendants carrying the item marker
    pub fn items(&self, dom: &D) -> Vec<D::Node> {
        dom.elements_by_tag(&self.container, "li")
            .into_iter()
            .filter(|li| dom.has_class(li, &self.options.markers.item))
            .collect()
    }

    pub fn is_open(&self, dom: &D, item: &D::Node) -> bool {
        dom.has_class(item, &self.options.markers.active)
    }

    pub fn open_items(&self, dom: &D) -> Vec<D::Node> {
        self.items(dom)
            .into_iter()
            .filter(|item| self.is_open(dom, item))
            .collect()
    }

    /// The panel an item controls
    pub fn panel_of(&self, dom: &D, item: &D::Node) -> StackPanelResult<D::Node> {
        let anchor = dom
            .elements_by_tag(item, "a")
            .into_iter()
            .next()
            .ok_or(StackPanelError::MissingAnchor)?;
        let href = dom.attribute(&anchor, "href").unwrap_or_default();
        let panel_id =
            panel_id_from_href(&href).ok_or_else(|| StackPanelError::MissingFragment(href.clone()))?;
        dom.element_by_id(panel_id)
            .ok_or_else(|| StackPanelError::PanelNotFound(panel_id.to_string()))
    }

    // ========================
    // Operations
    // ========================

    /// Open (`visible = true`) or close an item and its panel.
    ///
    /// Returns `Ok(true)` if the state changed; asking for the current state
    /// is a no-op. On error neither the item nor its panel is modified.
    pub fn show(&self, dom: &mut D, item: &D::Node, visible: bool) -> StackPanelResult<bool> {
        if self.is_open(dom, item) == visible {
            return Ok(false);
        }
        let panel = self.panel_of(dom, item)?;
        let markers = &self.options.markers;
        dom.set_class(&panel, &markers.hidden, !visible);
        dom.set_class(item, &markers.active, visible);
        Ok(true)
    }

    /// Toggle an item. In a single-open group every other item is closed
    /// first, so clicking the open item leaves none open.
    ///
    /// A single-open group only toggles `li` elements carrying the item
    /// marker; anything else is left as it is.
    pub fn toggle(&self, dom: &mut D, item: &D::Node) -> StackPanelResult<()> {
        if !self.options.multi_open {
            for other in self.items(dom) {
                if &other != item {
                    if let Err(e) = self.show(dom, &other, false) {
                        warn!("stack panel '{}': cannot close item: {}", self.container_id, e);
                    }
                }
            }
            if !dom.has_class(item, &self.options.markers.item) {
                debug!(
                    "stack panel '{}': clicked li is not an item, left unchanged",
                    self.container_id
                );
                return Ok(());
            }
        }
        let open = self.is_open(dom, item);
        self.show(dom, item, !open)?;
        Ok(())
    }

    /// Click listener body.
    ///
    /// Only clicks on an element carrying the link marker are handled; the
    /// enclosing `li` is toggled and the default navigation must be
    /// suppressed by the caller. Markup errors are logged, not raised.
    pub fn handle_click(&self, dom: &mut D, target: &D::Node) -> ClickOutcome {
        if !dom.has_class(target, &self.options.markers.link) {
            return ClickOutcome::Ignored;
        }
        let Some(item) = self.enclosing_item(dom, target) else {
            debug!(
                "stack panel '{}': link outside of any item",
                self.container_id
            );
            return ClickOutcome::Ignored;
        };
        if let Err(e) = self.toggle(dom, &item) {
            warn!("stack panel '{}': {}", self.container_id, e);
        }
        ClickOutcome::Handled
    }

    /// Nearest `li` at or above `node`, stopping at the container
    fn enclosing_item(&self, dom: &D, node: &D::Node) -> Option<D::Node> {
        let mut current = Some(node.clone());
        while let Some(n) = current {
            if n == self.container {
                return None;
            }
            if dom.tag_name(&n).eq_ignore_ascii_case("li") {
                return Some(n);
            }
            current = dom.parent(&n);
        }
        None
    }

    fn apply_initial(&self, dom: &mut D) {
        if self.options.initial == InitialOpen::Authored {
            self.close_authored(dom);
            return;
        }
        let items = self.items(dom);
        let multi = self.options.multi_open;

        let wanted = |index: usize| -> Option<bool> {
            match self.options.initial {
                InitialOpen::Authored => None,
                InitialOpen::Index(open) if index == open => Some(true),
                InitialOpen::Index(_) if multi => None,
                InitialOpen::Index(_) | InitialOpen::Closed => Some(false),
            }
        };

        if let InitialOpen::Index(open) = self.options.initial {
            if open >= items.len() {
                debug!(
                    "stack panel '{}': initial index {} out of range ({} items)",
                    self.container_id,
                    open,
                    items.len()
                );
            }
        }

        for (index, item) in items.iter().enumerate() {
            if let Some(visible) = wanted(index) {
                if let Err(e) = self.show(dom, item, visible) {
                    warn!("stack panel '{}': item {}: {}", self.container_id, index, e);
                }
            }
        }
    }

    /// Single-open groups close every item except the first `li` of the
    /// container. Positions count all `li` descendants, marked or not, so
    /// an unmarked header `li` takes the exempt slot.
    fn close_authored(&self, dom: &mut D) {
        if self.options.multi_open {
            return;
        }
        let lis = dom.elements_by_tag(&self.container, "li");
        for (index, li) in lis.iter().enumerate().skip(1) {
            if !dom.has_class(li, &self.options.markers.item) {
                continue;
            }
            if let Err(e) = self.show(dom, li, false) {
                warn!("stack panel '{}': li {}: {}", self.container_id, index, e);
            }
        }
    }
}
