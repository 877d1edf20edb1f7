use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use stackpanel::prelude::*;

type Tick = Box<dyn FnMut() -> bool>;

/// Ready host that records what was installed and lets tests drive it
struct FakeHost {
    capabilities: Capabilities,
    state: Rc<Cell<DocumentReadyState>>,
    content_loaded: Vec<ReadyGate>,
    legacy_load: Vec<ReadyGate>,
    window_load: Vec<ReadyGate>,
    timers: Vec<(Duration, Tick)>,
}

impl FakeHost {
    fn new(capabilities: Capabilities, state: DocumentReadyState) -> Self {
        Self {
            capabilities,
            state: Rc::new(Cell::new(state)),
            content_loaded: Vec::new(),
            legacy_load: Vec::new(),
            window_load: Vec::new(),
            timers: Vec::new(),
        }
    }

    fn modern() -> Self {
        Self::new(
            Capabilities {
                content_loaded_event: true,
                legacy_attach: false,
                user_agent: Some("Mozilla/5.0 Firefox/140.0".to_string()),
            },
            DocumentReadyState::Loading,
        )
    }

    fn webkit() -> Self {
        Self::new(
            Capabilities {
                content_loaded_event: false,
                legacy_attach: false,
                user_agent: Some("Mozilla/5.0 AppleWebKit/419.3 Safari/419.3".to_string()),
            },
            DocumentReadyState::Loading,
        )
    }

    fn installed(&self) -> usize {
        self.content_loaded.len() + self.legacy_load.len() + self.window_load.len() + self.timers.len()
    }

    /// Run every live timer once, dropping those that asked to stop
    fn run_timers(&mut self) {
        self.timers.retain_mut(|(_, tick)| !tick());
    }

    fn dom_content_loaded(&self) {
        for gate in &self.content_loaded {
            gate.fire();
        }
    }
}

impl ReadyHost for FakeHost {
    fn capabilities(&self) -> Capabilities {
        self.capabilities.clone()
    }

    fn ready_state(&self) -> DocumentReadyState {
        self.state.get()
    }

    fn ready_state_probe(&self) -> Box<dyn Fn() -> DocumentReadyState> {
        let state = Rc::clone(&self.state);
        Box::new(move || state.get())
    }

    fn on_content_loaded(&mut self, gate: ReadyGate) -> StackPanelResult<()> {
        self.content_loaded.push(gate);
        Ok(())
    }

    fn attach_load(&mut self, gate: ReadyGate) -> StackPanelResult<()> {
        self.legacy_load.push(gate);
        Ok(())
    }

    fn every(&mut self, interval: Duration, tick: Tick) -> StackPanelResult<()> {
        self.timers.push((interval, tick));
        Ok(())
    }

    fn chain_load(&mut self, gate: ReadyGate) -> StackPanelResult<()> {
        self.window_load.push(gate);
        Ok(())
    }
}

fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
    let count = Rc::new(Cell::new(0));
    let inner = Rc::clone(&count);
    (count, move || inner.set(inner.get() + 1))
}

#[test]
fn already_interactive_document_fires_immediately() {
    let mut host = FakeHost::modern();
    host.state.set(DocumentReadyState::Interactive);
    let (count, callback) = counter();

    let registration = ReadyBootstrap::default().register(&mut host, callback).unwrap();
    assert_eq!(registration, ReadyRegistration::Immediate);
    assert_eq!(count.get(), 1);
    assert_eq!(host.installed(), 0);
}

#[test]
fn fire_if_ready_can_be_disabled() {
    let mut host = FakeHost::modern();
    host.state.set(DocumentReadyState::Complete);
    let (count, callback) = counter();

    let config = ReadyConfig {
        fire_if_ready: false,
        ..ReadyConfig::default()
    };
    let registration = ReadyBootstrap::new(config).register(&mut host, callback).unwrap();
    assert_eq!(registration, ReadyRegistration::Deferred(ReadyStrategy::NativeEvent));
    assert_eq!(count.get(), 0);
}

#[test]
fn native_event_installs_one_listener_and_fires_once() {
    let mut host = FakeHost::modern();
    let (count, callback) = counter();

    let registration = ReadyBootstrap::default().register(&mut host, callback).unwrap();
    assert_eq!(registration, ReadyRegistration::Deferred(ReadyStrategy::NativeEvent));
    assert_eq!(host.installed(), 1);
    assert_eq!(count.get(), 0);

    host.dom_content_loaded();
    host.dom_content_loaded();
    assert_eq!(count.get(), 1);
}

#[test]
fn legacy_attach_used_without_add_event_listener() {
    let mut host = FakeHost::new(
        Capabilities {
            content_loaded_event: false,
            legacy_attach: true,
            user_agent: Some("AppleWebKit".to_string()),
        },
        DocumentReadyState::Loading,
    );
    let (count, callback) = counter();

    let registration = ReadyBootstrap::default().register(&mut host, callback).unwrap();
    assert_eq!(registration, ReadyRegistration::Deferred(ReadyStrategy::LegacyAttach));
    assert_eq!(host.legacy_load.len(), 1);
    assert_eq!(host.installed(), 1);

    host.legacy_load[0].fire();
    assert_eq!(count.get(), 1);
}

#[test]
fn polling_stops_after_first_success() {
    let mut host = FakeHost::webkit();
    let (count, callback) = counter();

    let registration = ReadyBootstrap::default().register(&mut host, callback).unwrap();
    assert_eq!(registration, ReadyRegistration::Deferred(ReadyStrategy::Polling));
    assert_eq!(host.timers.len(), 1);
    assert_eq!(host.timers[0].0, Duration::from_millis(10));

    for _ in 0..3 {
        host.run_timers();
    }
    assert_eq!(count.get(), 0);

    // `interactive` is not enough for the poll
    host.state.set(DocumentReadyState::Interactive);
    host.run_timers();
    assert_eq!(count.get(), 0);

    host.state.set(DocumentReadyState::Loaded);
    host.run_timers();
    assert_eq!(count.get(), 1);
    assert!(host.timers.is_empty());

    host.run_timers();
    assert_eq!(count.get(), 1);
}

#[test]
fn polling_gives_up_and_runs_callback() {
    let mut host = FakeHost::webkit();
    let (count, callback) = counter();

    let config = ReadyConfig {
        poll_interval_ms: 50,
        max_poll_attempts: Some(3),
        ..ReadyConfig::default()
    };
    ReadyBootstrap::new(config).register(&mut host, callback).unwrap();
    assert_eq!(host.timers[0].0, Duration::from_millis(50));

    host.run_timers();
    host.run_timers();
    assert_eq!(count.get(), 0);
    host.run_timers();
    assert_eq!(count.get(), 1);
    assert!(host.timers.is_empty());
}

#[test]
fn load_fallback_for_unknown_engines() {
    let mut host = FakeHost::new(Capabilities::default(), DocumentReadyState::Loading);
    let (count, callback) = counter();

    let registration = ReadyBootstrap::default().register(&mut host, callback).unwrap();
    assert_eq!(registration, ReadyRegistration::Deferred(ReadyStrategy::LoadFallback));
    assert_eq!(host.window_load.len(), 1);
    assert_eq!(host.installed(), 1);

    host.window_load[0].fire();
    assert_eq!(count.get(), 1);
}

#[test]
fn bootstrap_builds_app_when_ready() {
    let mut host = FakeHost::modern();
    let dom = Rc::new(RefCell::new(MemoryDom::new()));
    let container = dom
        .borrow_mut()
        .stack_panel("stackpanel-multi", &[("A", "pa", false), ("B", "pb", false)]);

    let booted = bootstrap(&mut host, Rc::clone(&dom), AppConfig::default()).unwrap();
    assert_eq!(booted.registration, ReadyRegistration::Deferred(ReadyStrategy::NativeEvent));
    assert!(!booted.is_ready());
    assert_eq!(booted.group_count(), 0);
    assert_eq!(dom.borrow().total_listeners(), 0);

    host.dom_content_loaded();
    assert!(booted.is_ready());
    assert_eq!(booted.group_count(), 1);

    let link = dom.borrow().item_links(container)[1];
    let dispatch = dom.borrow_mut().click(link);
    assert!(dispatch.default_prevented);

    let app = booted.app();
    let group = app.as_ref().unwrap().group("stackpanel-multi").unwrap();
    let dom = dom.borrow();
    let open: Vec<bool> = group.items(&dom).iter().map(|i| group.is_open(&dom, i)).collect();
    assert_eq!(open, vec![false, true]);
}
