//! Application state
//!
//! [`App`] is built once, when the page is ready, and owns every panel group
//! found in the document. [`bootstrap`] wires that construction to a
//! [`ReadyHost`].

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};

use crate::config::AppConfig;
use crate::dom::Dom;
use crate::error::StackPanelResult;
use crate::panel::PanelGroup;
use crate::ready::{ReadyBootstrap, ReadyGate, ReadyHost, ReadyRegistration};

/// The panel groups of one page
pub struct App<D: Dom> {
    config: AppConfig,
    groups: Vec<Rc<PanelGroup<D>>>,
}

impl<D: Dom> App<D> {
    /// Build a panel group for every configured container present in the
    /// document. Absent containers are skipped; a container whose listener
    /// cannot be attached is logged and skipped.
    pub fn init(dom: &mut D, config: &AppConfig) -> Self {
        let mut groups = Vec::new();

        for group in &config.groups {
            let options = config.group_options(group);
            match PanelGroup::attach(dom, &group.container_id, options) {
                Ok(Some(panel)) => groups.push(panel),
                Ok(None) => {}
                Err(e) => warn!("stack panel '{}' disabled: {}", group.container_id, e),
            }
        }

        info!("{} stack panel(s) initialised", groups.len());
        Self {
            config: config.clone(),
            groups,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn groups(&self) -> &[Rc<PanelGroup<D>>] {
        &self.groups
    }

    /// Group attached to the container with this id
    pub fn group(&self, container_id: &str) -> Option<&Rc<PanelGroup<D>>> {
        self.groups
            .iter()
            .find(|group| group.container_id() == container_id)
    }
}

/// Shared slot filled with the [`App`] once the page is ready
pub struct Booted<D: Dom> {
    pub registration: ReadyRegistration,
    app: Rc<RefCell<Option<App<D>>>>,
    gate: ReadyGate,
}

impl<D: Dom> Booted<D> {
    pub fn is_ready(&self) -> bool {
        self.gate.has_fired()
    }

    /// The application, once initialised
    pub fn app(&self) -> std::cell::Ref<'_, Option<App<D>>> {
        self.app.borrow()
    }

    /// Number of groups initialised so far
    pub fn group_count(&self) -> usize {
        self.app.borrow().as_ref().map_or(0, |app| app.groups().len())
    }
}

/// Initialise the application once `host` reports the page ready.
///
/// The document is shared with the ready callback; it is only borrowed
/// while the groups are being built.
pub fn bootstrap<D: Dom, H: ReadyHost>(
    host: &mut H,
    dom: Rc<RefCell<D>>,
    config: AppConfig,
) -> StackPanelResult<Booted<D>> {
    let app = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&app);
    let ready = ReadyBootstrap::new(config.ready.clone());

    let gate = ReadyGate::new(move || {
        debug!("page ready, building stack panels");
        let built = App::init(&mut *dom.borrow_mut(), &config);
        *slot.borrow_mut() = Some(built);
    });

    let registration = ready.register_gate(host, gate.clone())?;
    Ok(Booted {
        registration,
        app,
        gate,
    })
}
