//! Host registration slots.
//!
//! The capture core stays hook-agnostic: it never installs itself into a
//! runtime. Instead the host wires two explicit capability slots — one for
//! uncaught errors, one for process termination — to whatever mechanism it
//! has (panic hook, signal handler, framework middleware).

use tracing::warn;

use trapline_core::{severity, RawError};

use crate::client::Client;

/// Slot invoked by the host's global error/exception hook.
pub trait UncaughtErrorHook {
    fn on_uncaught_error(&self, error: RawError);
}

/// Slot invoked by the host's process-exit/fatal hook with the last error
/// observed before shutdown, if any.
pub trait TerminationHook {
    fn on_termination(&self, last_error: Option<RawError>);
}

/// Holds the two capability slots a host wires up at startup.
#[derive(Default)]
pub struct HookRegistry {
    uncaught: Option<Box<dyn UncaughtErrorHook>>,
    termination: Option<Box<dyn TerminationHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_uncaught(&mut self, hook: Box<dyn UncaughtErrorHook>) {
        self.uncaught = Some(hook);
    }

    pub fn register_termination(&mut self, hook: Box<dyn TerminationHook>) {
        self.termination = Some(hook);
    }

    /// Dispatches to the uncaught-error slot. Returns whether a slot was
    /// wired.
    pub fn dispatch_uncaught(&self, error: RawError) -> bool {
        match &self.uncaught {
            Some(hook) => {
                hook.on_uncaught_error(error);
                true
            }
            None => false,
        }
    }

    /// Dispatches to the termination slot. Returns whether a slot was wired.
    pub fn dispatch_termination(&self, last_error: Option<RawError>) -> bool {
        match &self.termination {
            Some(hook) => {
                hook.on_termination(last_error);
                true
            }
            None => false,
        }
    }
}

impl UncaughtErrorHook for Client {
    /// Captures every uncaught error. The hook path must never propagate a
    /// failure back into the host runtime, so delivery errors are logged
    /// and dropped here regardless of configuration.
    fn on_uncaught_error(&self, error: RawError) {
        if let Err(err) = self.capture(Some(error), None, None) {
            warn!(%err, "uncaught-error hook delivery failed");
        }
    }
}

impl TerminationHook for Client {
    /// Captures the last error at shutdown only when its severity is fatal;
    /// warnings and notices seen earlier do not produce a shutdown event.
    fn on_termination(&self, last_error: Option<RawError>) {
        let Some(error) = last_error else {
            return;
        };
        if !severity::is_fatal(error.code()) {
            return;
        }
        if let Err(err) = self.capture(Some(error), None, None) {
            warn!(%err, "termination hook delivery failed");
        }
    }
}
