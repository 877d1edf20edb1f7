//! WASM bindings for stack panels
//!
//! ```js
//! import init, { boot } from "./pkg/stackpanel.js";
//! await init();
//! const panels = boot();                       // default containers
//! const faq = boot({ groups: [{ container_id: "faq", multi_open: true }] });
//! ```
//!
//! The returned handle owns the panel groups; keep it alive for as long as
//! the panels should react to clicks.

use std::cell::RefCell;
use std::rc::Rc;

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

use crate::app::{bootstrap, Booted};
use crate::config::AppConfig;
use crate::dom::web::WebDom;
use crate::error::StackPanelError;
use crate::ready::web::WebReadyHost;
use crate::ready::ReadyRegistration;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if log::set_logger(&CONSOLE_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}

/// `log` backend writing to the browser console
struct ConsoleLogger;

static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&message),
            Level::Warn => web_sys::console::warn_1(&message),
            Level::Info => web_sys::console::info_1(&message),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

fn to_js(error: StackPanelError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Stack panels of the page, built once the document is ready
#[wasm_bindgen]
pub struct StackPanels {
    booted: Booted<WebDom>,
}

#[wasm_bindgen]
impl StackPanels {
    /// Whether the ready callback has run
    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.booted.is_ready()
    }

    /// Number of containers enhanced so far
    #[wasm_bindgen(js_name = groupCount)]
    pub fn group_count(&self) -> usize {
        self.booted.group_count()
    }

    /// How ready detection was set up: `immediate` or the strategy name
    pub fn strategy(&self) -> String {
        match self.booted.registration {
            ReadyRegistration::Immediate => "immediate".to_string(),
            ReadyRegistration::Deferred(strategy) => format!("{strategy:?}"),
        }
    }
}

/// Enhance the page's stack panels once it is ready.
///
/// `config` is an optional object in the shape of `AppConfig`; omitted
/// fields take their defaults. The returned handle is only for inspection:
/// the click listeners own their groups, so calling `free()` on it leaves
/// the panels working.
#[wasm_bindgen]
pub fn boot(config: JsValue) -> Result<StackPanels, JsValue> {
    let config: AppConfig = if config.is_undefined() || config.is_null() {
        AppConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)?
    };

    let dom = WebDom::from_window().map_err(to_js)?;
    let mut host = WebReadyHost::from_window().map_err(to_js)?;
    let booted = bootstrap(&mut host, Rc::new(RefCell::new(dom)), config).map_err(to_js)?;
    Ok(StackPanels { booted })
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
