//! Mock engine for testing
//!
//! Records every invocation and replays a scripted outcome, so the bridge can
//! be exercised without a cluster or a kubectl binary.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use super::{CommandEngine, Invocation};
use crate::error::{KubectlError, Result};
use crate::fatal;
use crate::streams::CapturedStreams;

/// What the mock does when run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockBehavior {
    /// Return immediately
    Succeed,
    /// Block for the given time, then return
    Hang(Duration),
    /// Report a fatal error through the hook of the invocation's verb
    Fatal { message: String, code: i32 },
    /// Block for `delay`, then report a fatal error
    FatalAfter {
        delay: Duration,
        message: String,
        code: i32,
    },
    /// Fail to reach the engine at all
    Unreachable,
}

/// In-memory engine for testing
#[derive(Clone)]
pub struct MockEngine {
    behavior: Arc<RwLock<MockBehavior>>,
    output: Arc<RwLock<(String, String)>>,
    invocations: Arc<Mutex<Vec<Invocation>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockEngine {
    /// Create a mock that always succeeds
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::Succeed)
    }

    /// Create a mock with a scripted behavior
    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(RwLock::new(behavior)),
            output: Arc::new(RwLock::new((String::new(), String::new()))),
            invocations: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Text written to the captured streams on every run
    pub fn with_output(self, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        *self.output.write().unwrap() = (stdout.into(), stderr.into());
        self
    }

    /// Replace the behavior for subsequent runs
    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.write().unwrap() = behavior;
    }

    /// Invocations seen so far, in start order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// The most recent invocation
    pub fn last_invocation(&self) -> Option<Invocation> {
        self.invocations.lock().unwrap().last().cloned()
    }

    /// Highest number of runs that were executing at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandEngine for MockEngine {
    fn run(&self, invocation: &Invocation, streams: &CapturedStreams) -> Result<()> {
        self.invocations.lock().unwrap().push(invocation.clone());

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let (stdout, stderr) = self.output.read().unwrap().clone();
        streams.out().write_all(stdout.as_bytes())?;
        streams.err_out().write_all(stderr.as_bytes())?;

        let behavior = self.behavior.read().unwrap().clone();
        let result = match behavior {
            MockBehavior::Succeed => Ok(()),
            MockBehavior::Hang(duration) => {
                std::thread::sleep(duration);
                Ok(())
            }
            MockBehavior::Fatal { message, code } => {
                fatal::fatal(invocation.verb(), &message, code);
                Ok(())
            }
            MockBehavior::FatalAfter {
                delay,
                message,
                code,
            } => {
                std::thread::sleep(delay);
                fatal::fatal(invocation.verb(), &message, code);
                Ok(())
            }
            MockBehavior::Unreachable => Err(KubectlError::Spawn {
                binary: "mock".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "engine unreachable"),
            }),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
