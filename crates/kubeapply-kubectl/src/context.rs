//! Call context carrying an optional deadline

use std::time::Duration;
use tokio::time::Instant;

/// Stand-in for "never" when a timeout does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Deadline scope for a single apply or delete call
///
/// Only the deadline is consulted; it is read once when the call starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    deadline: Option<Instant>,
}

impl Context {
    /// Context without a deadline; the configured default timeout applies
    pub fn background() -> Self {
        Self::default()
    }

    /// Context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(deadline_after(timeout))
    }

    /// Context that expires at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    /// The deadline, if one was set
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Effective deadline, falling back to `now + default_timeout`
    pub(crate) fn effective_deadline(&self, default_timeout: Duration) -> Instant {
        self.deadline
            .unwrap_or_else(|| deadline_after(default_timeout))
    }
}
