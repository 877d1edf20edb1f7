//! Page-ready bootstrap
//!
//! Runs a callback exactly once, as soon as the document structure is
//! available. A single capability probe picks one [`ReadyStrategy`]; the
//! callback itself sits behind a [`ReadyGate`] so that a host delivering
//! more than one signal still runs it once.

mod retry;
#[cfg(feature = "wasm")]
pub mod web;

pub use retry::{Retry, RetryPolicy, RetryStep};

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use log::{debug, warn};

use crate::config::ReadyConfig;
use crate::error::StackPanelResult;

/// `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentReadyState {
    Loading,
    Interactive,
    /// Reported by some older engines instead of `complete`
    Loaded,
    Complete,
}

impl DocumentReadyState {
    /// Parse a ready-state string. Unknown values count as still loading.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "interactive" => Self::Interactive,
            "loaded" => Self::Loaded,
            "complete" => Self::Complete,
            _ => Self::Loading,
        }
    }

    /// The condition the polling strategy waits for
    pub fn is_loaded(self) -> bool {
        matches!(self, Self::Loaded | Self::Complete)
    }

    /// Whether the document structure is available
    pub fn is_interactive(self) -> bool {
        self != Self::Loading
    }
}

/// What the host environment offers for ready detection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// The document supports a `DOMContentLoaded` listener
    pub content_loaded_event: bool,
    /// The window exposes a legacy `attachEvent`
    pub legacy_attach: bool,
    pub user_agent: Option<String>,
}

/// How the bootstrap waits for the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyStrategy {
    /// Listen for `DOMContentLoaded`
    NativeEvent,
    /// `attachEvent("onload", ...)` on the window
    LegacyAttach,
    /// Poll `document.readyState` until loaded
    Polling,
    /// Chain onto the single window load handler slot
    LoadFallback,
}

impl ReadyStrategy {
    /// Select exactly one strategy, in order of preference
    pub fn probe(capabilities: &Capabilities, config: &ReadyConfig) -> Self {
        if capabilities.content_loaded_event {
            return Self::NativeEvent;
        }
        if capabilities.legacy_attach {
            return Self::LegacyAttach;
        }
        let signature = config.polling_user_agent.to_ascii_lowercase();
        let polls = !signature.is_empty()
            && capabilities
                .user_agent
                .as_deref()
                .is_some_and(|ua| ua.to_ascii_lowercase().contains(&signature));
        if polls {
            Self::Polling
        } else {
            Self::LoadFallback
        }
    }
}

/// Fire-once wrapper around the ready callback.
///
/// Clones share the same callback; whichever clone fires first runs it.
#[derive(Clone)]
pub struct ReadyGate {
    callback: Rc<RefCell<Option<Box<dyn FnOnce()>>>>,
    fired: Rc<Cell<bool>>,
}

impl fmt::Debug for ReadyGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadyGate")
            .field("fired", &self.fired.get())
            .finish()
    }
}

impl ReadyGate {
    pub fn new(callback: impl FnOnce() + 'static) -> Self {
        Self {
            callback: Rc::new(RefCell::new(Some(Box::new(callback)))),
            fired: Rc::new(Cell::new(false)),
        }
    }

    /// Run the callback if nobody has yet. Returns `true` if it ran now.
    pub fn fire(&self) -> bool {
        if self.fired.replace(true) {
            return false;
        }
        let callback = self.callback.borrow_mut().take();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired.get()
    }
}

/// Browser facilities the bootstrap needs
pub trait ReadyHost {
    fn capabilities(&self) -> Capabilities;

    fn ready_state(&self) -> DocumentReadyState;

    /// A reader of the ready state usable from timer callbacks
    fn ready_state_probe(&self) -> Box<dyn Fn() -> DocumentReadyState>;

    /// Fire `gate` on `DOMContentLoaded`
    fn on_content_loaded(&mut self, gate: ReadyGate) -> StackPanelResult<()>;

    /// Fire `gate` through the legacy attach-event load hook
    fn attach_load(&mut self, gate: ReadyGate) -> StackPanelResult<()>;

    /// Call `tick` every `interval` until it returns `true`
    fn every(&mut self, interval: Duration, tick: Box<dyn FnMut() -> bool>) -> StackPanelResult<()>;

    /// Install a window load handler that runs the existing handler, if
    /// any, then fires `gate`
    fn chain_load(&mut self, gate: ReadyGate) -> StackPanelResult<()>;
}

/// How a callback was registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyRegistration {
    /// The document was already interactive; the callback has run
    Immediate,
    /// The callback waits on this strategy
    Deferred(ReadyStrategy),
}

/// Registers ready callbacks against a [`ReadyHost`]
#[derive(Debug, Clone, Default)]
pub struct ReadyBootstrap {
    config: ReadyConfig,
}

impl ReadyBootstrap {
    pub fn new(config: ReadyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReadyConfig {
        &self.config
    }

    /// Run `callback` once the page is ready
    pub fn register<H: ReadyHost>(
        &self,
        host: &mut H,
        callback: impl FnOnce() + 'static,
    ) -> StackPanelResult<ReadyRegistration> {
        self.register_gate(host, ReadyGate::new(callback))
    }

    /// Like [`register`](Self::register), for a caller-held gate
    pub fn register_gate<H: ReadyHost>(
        &self,
        host: &mut H,
        gate: ReadyGate,
    ) -> StackPanelResult<ReadyRegistration> {
        if self.config.fire_if_ready && host.ready_state().is_interactive() {
            debug!("document already interactive, running ready callback now");
            gate.fire();
            return Ok(ReadyRegistration::Immediate);
        }

        let strategy = ReadyStrategy::probe(&host.capabilities(), &self.config);
        debug!("waiting for page ready via {:?}", strategy);

        match strategy {
            ReadyStrategy::NativeEvent => host.on_content_loaded(gate)?,
            ReadyStrategy::LegacyAttach => host.attach_load(gate)?,
            ReadyStrategy::Polling => {
                let policy = self.config.retry_policy();
                let probe = host.ready_state_probe();
                let mut retry = Retry::new(policy, move || probe().is_loaded());
                host.every(
                    policy.interval,
                    Box::new(move || {
                        if gate.has_fired() {
                            return true;
                        }
                        match retry.tick() {
                            RetryStep::Pending => false,
                            RetryStep::Satisfied => {
                                gate.fire();
                                true
                            }
                            RetryStep::Exhausted => {
                                warn!(
                                    "ready state still loading after {} checks, running callback anyway",
                                    retry.attempts()
                                );
                                gate.fire();
                                true
                            }
                        }
                    }),
                )?;
            }
            ReadyStrategy::LoadFallback => host.chain_load(gate)?,
        }

        Ok(ReadyRegistration::Deferred(strategy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(content_loaded: bool, legacy: bool, ua: Option<&str>) -> Capabilities {
        Capabilities {
            content_loaded_event: content_loaded,
            legacy_attach: legacy,
            user_agent: ua.map(str::to_string),
        }
    }

    #[test]
    fn test_probe_preference_order() {
        let config = ReadyConfig::default();
        let webkit = Some("Mozilla/5.0 AppleWebKit/537.36");

        assert_eq!(
            ReadyStrategy::probe(&caps(true, true, webkit), &config),
            ReadyStrategy::NativeEvent
        );
        assert_eq!(
            ReadyStrategy::probe(&caps(false, true, webkit), &config),
            ReadyStrategy::LegacyAttach
        );
        assert_eq!(
            ReadyStrategy::probe(&caps(false, false, webkit), &config),
            ReadyStrategy::Polling
        );
        assert_eq!(
            ReadyStrategy::probe(&caps(false, false, Some("Gecko")), &config),
            ReadyStrategy::LoadFallback
        );
        assert_eq!(
            ReadyStrategy::probe(&caps(false, false, None), &config),
            ReadyStrategy::LoadFallback
        );
    }

    #[test]
    fn test_probe_signature_is_case_insensitive() {
        let config = ReadyConfig::default();
        assert_eq!(
            ReadyStrategy::probe(&caps(false, false, Some("applewebkit")), &config),
            ReadyStrategy::Polling
        );

        let disabled = ReadyConfig {
            polling_user_agent: String::new(),
            ..ReadyConfig::default()
        };
        assert_eq!(
            ReadyStrategy::probe(&caps(false, false, Some("WebKit")), &disabled),
            ReadyStrategy::LoadFallback
        );
    }

    #[test]
    fn test_ready_state_parse() {
        assert_eq!(DocumentReadyState::parse("loading"), DocumentReadyState::Loading);
        assert_eq!(DocumentReadyState::parse("interactive"), DocumentReadyState::Interactive);
        assert_eq!(DocumentReadyState::parse("Complete"), DocumentReadyState::Complete);
        assert_eq!(DocumentReadyState::parse("uninitialized"), DocumentReadyState::Loading);

        assert!(DocumentReadyState::Loaded.is_loaded());
        assert!(!DocumentReadyState::Interactive.is_loaded());
        assert!(DocumentReadyState::Interactive.is_interactive());
        assert!(!DocumentReadyState::Loading.is_interactive());
    }

    #[test]
    fn test_gate_fires_once_across_clones() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let gate = ReadyGate::new(move || counter.set(counter.get() + 1));
        let other = gate.clone();

        assert!(!gate.has_fired());
        assert!(other.fire());
        assert!(!gate.fire());
        assert!(gate.has_fired());
        assert_eq!(count.get(), 1);
    }
}
