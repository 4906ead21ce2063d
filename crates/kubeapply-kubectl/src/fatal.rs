//! Process-wide behavior for fatal command errors
//!
//! kubectl reports unrecoverable command failures through a global hook
//! whose default prints the message and exits the process. Engines in this
//! crate follow the same contract: they call [`fatal`] and the currently
//! installed behavior decides what happens.
//!
//! There is one slot per [`Verb`], so an apply and a delete running at the
//! same time never see each other's handler. Within a family, callers that
//! install a handler must make sure nobody else does so concurrently; the
//! bridge does that with its per-family locks.
//!
//! An engine run that outlives its call (because the deadline won) and then
//! fails fatally finds the default behavior installed again, and exits the
//! process.

use std::io::Write;
use std::sync::{Arc, RwLock};

use crate::engine::Verb;

/// Exit code used when the engine cannot report a more specific one
pub const DEFAULT_ERROR_EXIT_CODE: i32 = 1;

/// Handler invoked with the fatal message and exit code
pub type FatalHandler = Arc<dyn Fn(&str, i32) + Send + Sync>;

static APPLY_BEHAVIOR: RwLock<Option<FatalHandler>> = RwLock::new(None);
static DELETE_BEHAVIOR: RwLock<Option<FatalHandler>> = RwLock::new(None);

fn slot(verb: Verb) -> &'static RwLock<Option<FatalHandler>> {
    match verb {
        Verb::Apply => &APPLY_BEHAVIOR,
        Verb::Delete => &DELETE_BEHAVIOR,
    }
}

/// Replace the fatal behavior of `verb` until [`default_behavior_on_fatal`] is called
pub fn behavior_on_fatal<F>(verb: Verb, handler: F)
where
    F: Fn(&str, i32) + Send + Sync + 'static,
{
    let mut slot = slot(verb).write().unwrap_or_else(|e| e.into_inner());
    *slot = Some(Arc::new(handler));
}

/// Restore the default behavior (print and exit) for `verb`
pub fn default_behavior_on_fatal(verb: Verb) {
    let mut slot = slot(verb).write().unwrap_or_else(|e| e.into_inner());
    *slot = None;
}

/// Whether a custom handler is currently installed for `verb`
pub fn is_overridden(verb: Verb) -> bool {
    slot(verb)
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .is_some()
}

/// Report a fatal condition of a `verb` invocation to the installed behavior
///
/// Without an installed handler this terminates the process with `code`.
pub fn fatal(verb: Verb, msg: &str, code: i32) {
    let handler = slot(verb)
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone();

    match handler {
        Some(handler) => handler(msg, code),
        None => exit_with(msg, code),
    }
}

fn exit_with(msg: &str, code: i32) -> ! {
    if !msg.is_empty() {
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(msg.as_bytes());
        if !msg.ends_with('\n') {
            let _ = stderr.write_all(b"\n");
        }
    }
    std::process::exit(code)
}

/// Installs a handler and restores the default behavior of its verb when dropped
#[must_use = "the handler is removed as soon as the guard is dropped"]
pub struct FatalGuard {
    verb: Verb,
}

/// Install `handler` for `verb` for the lifetime of the returned guard
pub fn intercept<F>(verb: Verb, handler: F) -> FatalGuard
where
    F: Fn(&str, i32) + Send + Sync + 'static,
{
    behavior_on_fatal(verb, handler);
    FatalGuard { verb }
}

impl Drop for FatalGuard {
    fn drop(&mut self) {
        default_behavior_on_fatal(self.verb);
    }
}
