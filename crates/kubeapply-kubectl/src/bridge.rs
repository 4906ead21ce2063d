//! Execution of apply and delete invocations
//!
//! Every call races three producers into a single-slot result:
//! - the engine run, on a blocking task
//! - a deadline timer
//! - the process-wide fatal hook, installed for the duration of the call
//!
//! The first value wins and is returned. The others are not awaited or
//! cancelled: a timed-out engine run keeps going in the background and its
//! outcome is dropped.
//!
//! The fatal hook has a single process-wide slot, so each operation family
//! (apply, delete) holds its own lock for the whole call, including while it
//! waits for the result.

use std::path::Path;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use once_cell::sync::Lazy;
use tokio::sync::{Mutex, oneshot};
use tokio::time::Instant;
use tracing::debug;

use crate::context::Context;
use crate::engine::{CommandEngine, FlagSet, Invocation, Verb};
use crate::error::{KubectlError, Result};
use crate::fatal;
use crate::options::{ApplyOptions, DeleteOptions};
use crate::streams::CapturedStreams;

/// Serializes apply calls process-wide
static APPLY_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Serializes delete calls process-wide
static DELETE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// First-write-wins result slot shared by the racing producers
#[derive(Clone)]
struct ResultSlot {
    sender: Arc<StdMutex<Option<oneshot::Sender<Result<()>>>>>,
}

impl ResultSlot {
    fn new() -> (Self, oneshot::Receiver<Result<()>>) {
        let (tx, rx) = oneshot::channel();
        let slot = Self {
            sender: Arc::new(StdMutex::new(Some(tx))),
        };
        (slot, rx)
    }

    /// Offer a result; returns false if another producer got there first
    fn offer(&self, result: Result<()>) -> bool {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        match sender {
            // The receiver may already be gone if the caller was dropped
            Some(tx) => {
                let _ = tx.send(result);
                true
            }
            None => false,
        }
    }
}

/// Apply `file_paths` to the cluster `kubeconfig_path` points to
pub(crate) async fn apply_func<E: CommandEngine>(
    engine: &Arc<E>,
    default_timeout: Duration,
    ctx: &Context,
    kubeconfig_path: &str,
    opts: Option<&ApplyOptions>,
    file_paths: &[String],
) -> Result<()> {
    let opts = validate(Verb::Apply, kubeconfig_path, opts, file_paths)?;

    let _lock = APPLY_LOCK.lock().await;

    let time_left = time_left(ctx, default_timeout);
    let flags = apply_flags(opts, time_left, file_paths)?;

    execute(engine, Invocation::new(kubeconfig_path, flags), time_left).await
}

/// Delete the resources described by `file_paths` from the cluster
pub(crate) async fn delete_func<E: CommandEngine>(
    engine: &Arc<E>,
    default_timeout: Duration,
    ctx: &Context,
    kubeconfig_path: &str,
    opts: Option<&DeleteOptions>,
    file_paths: &[String],
) -> Result<()> {
    let opts = validate(Verb::Delete, kubeconfig_path, opts, file_paths)?;

    let _lock = DELETE_LOCK.lock().await;

    let time_left = time_left(ctx, default_timeout);
    let flags = delete_flags(opts, file_paths)?;

    execute(engine, Invocation::new(kubeconfig_path, flags), time_left).await
}

fn validate<'a, O>(
    verb: Verb,
    kubeconfig_path: &str,
    opts: Option<&'a O>,
    file_paths: &[String],
) -> Result<&'a O> {
    if kubeconfig_path.is_empty() {
        return Err(KubectlError::EmptyKubeconfig);
    }

    let opts = opts.ok_or(KubectlError::NilOptions)?;

    if file_paths.is_empty() {
        return Err(KubectlError::NoFiles { verb });
    }

    Ok(opts)
}

/// Time until the effective deadline, zero if it already passed
fn time_left(ctx: &Context, default_timeout: Duration) -> Duration {
    let deadline = ctx.effective_deadline(default_timeout);
    deadline.saturating_duration_since(Instant::now())
}

fn apply_flags(opts: &ApplyOptions, time_left: Duration, file_paths: &[String]) -> Result<FlagSet> {
    let mut flags = FlagSet::new(Verb::Apply);
    flags.set("request-timeout", time_left.as_secs().to_string())?;

    if opts.dry_run.is_enabled() {
        flags.set("dry-run", opts.dry_run.as_str())?;
    }

    if opts.recursive {
        flags.set("recursive", "true")?;
    }

    set_paths(&mut flags, opts.is_kustomization, file_paths)?;
    Ok(flags)
}

fn delete_flags(opts: &DeleteOptions, file_paths: &[String]) -> Result<FlagSet> {
    let mut flags = FlagSet::new(Verb::Delete);
    set_paths(&mut flags, opts.is_kustomization, file_paths)?;
    Ok(flags)
}

fn set_paths(flags: &mut FlagSet, is_kustomization: bool, file_paths: &[String]) -> Result<()> {
    let joined = file_paths.join(",");
    if is_kustomization {
        flags.set("kustomize", joined)
    } else {
        flags.set("filename", joined)
    }
}

/// Run the invocation and return whichever outcome arrives first
async fn execute<E: CommandEngine>(
    engine: &Arc<E>,
    invocation: Invocation,
    time_left: Duration,
) -> Result<()> {
    debug!(
        verb = %invocation.verb(),
        engine = engine.name(),
        time_left_secs = time_left.as_secs(),
        "executing invocation"
    );

    let streams = CapturedStreams::new();
    let (slot, result) = ResultSlot::new();

    tokio::spawn({
        let slot = slot.clone();
        async move {
            tokio::time::sleep(time_left).await;
            slot.offer(Err(KubectlError::DeadlineExceeded));
        }
    });

    let _fatal = fatal::intercept(invocation.verb(), {
        let slot = slot.clone();
        let streams = streams.clone();
        move |msg, code| {
            slot.offer(Err(KubectlError::Fatal {
                message: msg.to_string(),
                code,
                stdout: streams.stdout(),
                stderr: streams.stderr(),
            }));
        }
    });

    tokio::task::spawn_blocking({
        let engine = Arc::clone(engine);
        move || {
            let outcome = engine.run(&invocation, &streams);
            if !slot.offer(outcome) {
                debug!(verb = %invocation.verb(), "engine outcome discarded, result already taken");
            }
        }
    });

    result.await.unwrap_or(Err(KubectlError::Interrupted))
}

/// Paths as the strings the engine receives
pub(crate) fn path_strings<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.as_ref().to_string_lossy().into_owned())
        .collect()
}
