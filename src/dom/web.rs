//! Browser document backed by `web-sys`

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::class_list::ClassList;
use crate::error::{StackPanelError, StackPanelResult};

use super::{ClickHandler, ClickOutcome, Dom, ListenerBinding};

/// The page's `document`
#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Document of the global window
    pub fn from_window() -> StackPanelResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StackPanelError::Host("window is unavailable".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| StackPanelError::Host("document is unavailable".to_string()))?;
        Ok(Self::new(document))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

/// Convert a thrown JS value into a host error
pub(crate) fn js_error(value: JsValue) -> StackPanelError {
    StackPanelError::Host(format!("{value:?}"))
}

/// Call `target.attachEvent(event, callback)` if the engine has it
pub(crate) fn legacy_attach(target: &JsValue, event: &str, callback: &js_sys::Function) -> bool {
    let Ok(attach) = js_sys::Reflect::get(target, &JsValue::from_str("attachEvent")) else {
        return false;
    };
    match attach.dyn_ref::<js_sys::Function>() {
        Some(attach) => attach
            .call2(target, &JsValue::from_str(event), callback)
            .is_ok(),
        None => false,
    }
}

/// Install `callback` as the element's `onclick`. The slot holds a single
/// handler, so whatever was there before is replaced.
pub(crate) fn set_handler_property(node: &Element, callback: &js_sys::Function) -> bool {
    match node.dyn_ref::<HtmlElement>() {
        Some(element) => {
            element.set_onclick(Some(callback));
            true
        }
        None => false,
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn elements_by_tag(&self, root: &Element, tag: &str) -> Vec<Element> {
        let collection = root.get_elements_by_tag_name(tag);
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .collect()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn class_list(&self, node: &Element) -> ClassList {
        ClassList::parse(&node.class_name())
    }

    fn set_class_list(&mut self, node: &Element, classes: &ClassList) {
        node.set_class_name(&classes.to_string());
    }

    fn listen_click(
        &mut self,
        node: &Element,
        handler: ClickHandler<Self>,
    ) -> StackPanelResult<ListenerBinding> {
        let document = self.document.clone();
        let mut handler = handler;
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let mut dom = WebDom::new(document.clone());
            if handler(&mut dom, &target) == ClickOutcome::Handled {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        let callback: &js_sys::Function = closure.as_ref().unchecked_ref();
        let binding = ListenerBinding::first_available(
            || node.add_event_listener_with_callback("click", callback).is_ok(),
            || legacy_attach(node.as_ref(), "onclick", callback),
            || set_handler_property(node, callback),
        )
        .ok_or_else(|| StackPanelError::ListenerUnavailable(node.id()))?;

        // Listeners live as long as the page
        closure.forget();
        Ok(binding)
    }
}
