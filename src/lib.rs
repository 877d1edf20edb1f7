//! stackpanel - accordion stack panels for the browser
//!
//! A stack panel is a container of `li` items. Each item holds an anchor
//! whose `#fragment` names a content panel elsewhere in the page; clicking
//! the anchor shows or hides that panel. Open/closed state is kept in the
//! document itself as marker classes, so the widget enhances server-rendered
//! markup instead of owning it.
//!
//! The core is host independent:
//! - [`dom::Dom`] abstracts the handful of document operations needed
//! - [`dom::MemoryDom`] is an in-memory document for headless use and tests
//! - [`panel::PanelGroup`] implements the toggling rules
//! - [`ready::ReadyBootstrap`] runs the initializer once the page is ready
//! - [`app::App`] owns every group built from an [`config::AppConfig`]
//!
//! The `wasm` feature binds all of this to the real browser document.
//!
//! ## Example
//! ```rust
//! use stackpanel::prelude::*;
//!
//! let mut dom = MemoryDom::new();
//! let container = dom.stack_panel("stackpanel-multi", &[("Intro", "intro", false)]);
//!
//! let app = App::init(&mut dom, &AppConfig::default());
//! assert_eq!(app.groups().len(), 1);
//!
//! let link = dom.item_links(container)[0];
//! dom.click(link);
//! assert!(!dom.class_list(&dom.element_by_id("intro").unwrap()).contains("hide"));
//! ```

pub mod app;
pub mod class_list;
pub mod config;
pub mod dom;
pub mod error;
pub mod fixture;
pub mod panel;
pub mod ready;

// Re-export common types
pub mod prelude {
    pub use crate::app::{bootstrap, App, Booted};
    pub use crate::class_list::ClassList;
    pub use crate::config::{AppConfig, GroupConfig, Markers, ReadyConfig};
    pub use crate::dom::{ClickOutcome, Dom, ListenerBinding, MemoryDom, NodeId};
    pub use crate::error::{StackPanelError, StackPanelResult};
    pub use crate::panel::{InitialOpen, PanelGroup, PanelGroupOptions};
    pub use crate::ready::{
        Capabilities, DocumentReadyState, ReadyBootstrap, ReadyGate, ReadyHost,
        ReadyRegistration, ReadyStrategy, Retry, RetryPolicy, RetryStep,
    };
}

#[cfg(feature = "wasm")]
pub mod wasm;
