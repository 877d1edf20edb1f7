//! Ready detection in the browser

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Window};

use crate::dom::web::{js_error, legacy_attach};
use crate::error::{StackPanelError, StackPanelResult};

use super::{Capabilities, DocumentReadyState, ReadyGate, ReadyHost};

/// [`ReadyHost`] over the global window and document
#[derive(Debug, Clone)]
pub struct WebReadyHost {
    window: Window,
    document: Document,
}

impl WebReadyHost {
    pub fn from_window() -> StackPanelResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StackPanelError::Host("window is unavailable".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| StackPanelError::Host("document is unavailable".to_string()))?;
        Ok(Self { window, document })
    }
}

fn gate_closure(gate: ReadyGate) -> Closure<dyn FnMut()> {
    Closure::wrap(Box::new(move || {
        gate.fire();
    }) as Box<dyn FnMut()>)
}

impl ReadyHost for WebReadyHost {
    fn capabilities(&self) -> Capabilities {
        let has_function = |target: &JsValue, name: &str| {
            js_sys::Reflect::get(target, &JsValue::from_str(name))
                .map(|value| value.is_function())
                .unwrap_or(false)
        };
        Capabilities {
            content_loaded_event: has_function(self.document.as_ref(), "addEventListener"),
            legacy_attach: has_function(self.window.as_ref(), "attachEvent"),
            user_agent: self.window.navigator().user_agent().ok(),
        }
    }

    fn ready_state(&self) -> DocumentReadyState {
        DocumentReadyState::parse(&self.document.ready_state())
    }

    fn ready_state_probe(&self) -> Box<dyn Fn() -> DocumentReadyState> {
        let document = self.document.clone();
        Box::new(move || DocumentReadyState::parse(&document.ready_state()))
    }

    fn on_content_loaded(&mut self, gate: ReadyGate) -> StackPanelResult<()> {
        let closure = gate_closure(gate);
        self.document
            .add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        closure.forget();
        Ok(())
    }

    fn attach_load(&mut self, gate: ReadyGate) -> StackPanelResult<()> {
        let closure = gate_closure(gate);
        if !legacy_attach(self.window.as_ref(), "onload", closure.as_ref().unchecked_ref()) {
            return Err(StackPanelError::Host("attachEvent is unavailable".to_string()));
        }
        closure.forget();
        Ok(())
    }

    fn every(&mut self, interval: Duration, tick: Box<dyn FnMut() -> bool>) -> StackPanelResult<()> {
        let handle = Rc::new(Cell::new(None::<i32>));
        let slot = Rc::clone(&handle);
        let window = self.window.clone();
        let mut tick = tick;

        let closure = Closure::wrap(Box::new(move || {
            if tick() {
                if let Some(id) = slot.take() {
                    window.clear_interval_with_handle(id);
                }
            }
        }) as Box<dyn FnMut()>);

        let millis = i32::try_from(interval.as_millis()).unwrap_or(i32::MAX);
        let id = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis,
            )
            .map_err(js_error)?;
        handle.set(Some(id));
        closure.forget();
        Ok(())
    }

    fn chain_load(&mut self, gate: ReadyGate) -> StackPanelResult<()> {
        let previous = self.window.onload();
        let closure = Closure::wrap(Box::new(move || {
            if let Some(previous) = &previous {
                let _ = previous.call0(&JsValue::NULL);
            }
            gate.fire();
        }) as Box<dyn FnMut()>);
        self.window.set_onload(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
        Ok(())
    }
}
