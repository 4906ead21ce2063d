//! Engine backed by the `kubectl` binary

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::{CommandEngine, Invocation};
use crate::error::{KubectlError, Result};
use crate::fatal::{self, DEFAULT_ERROR_EXIT_CODE};
use crate::streams::CapturedStreams;

/// Runs invocations with a `kubectl` executable
#[derive(Debug, Clone)]
pub struct KubectlEngine {
    binary: PathBuf,
}

impl KubectlEngine {
    /// Use the given executable (a bare name is looked up on `PATH`)
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for KubectlEngine {
    fn default() -> Self {
        Self::new("kubectl")
    }
}

impl CommandEngine for KubectlEngine {
    fn run(&self, invocation: &Invocation, streams: &CapturedStreams) -> Result<()> {
        let args = invocation.args();
        debug!(binary = %self.binary.display(), ?args, "running kubectl");

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| KubectlError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        streams.out().write_all(&output.stdout)?;
        streams.err_out().write_all(&output.stderr)?;

        if !output.status.success() {
            // Killed by a signal: no code to forward
            let code = output.status.code().unwrap_or(DEFAULT_ERROR_EXIT_CODE);
            let stderr = String::from_utf8_lossy(&output.stderr);
            fatal::fatal(invocation.verb(), fatal_message(&stderr), code);
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "kubectl"
    }
}

/// Message kubectl would have passed to its fatal handler
///
/// kubectl prefixes the message with `error: `; warnings printed before it
/// stay in the error stream only.
fn fatal_message(stderr: &str) -> &str {
    let trimmed = stderr.trim();
    match trimmed.find("error: ") {
        Some(idx) => &trimmed[idx..],
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FlagSet, Verb};
    use crate::test_support::SERIAL;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_fatal_message_skips_warnings() {
        let stderr = "Warning: resource namespaces/demo is missing the annotation\nerror: unable to recognize \"x.yaml\": no matches for kind \"Foo\"\n";

        assert_eq!(
            fatal_message(stderr),
            "error: unable to recognize \"x.yaml\": no matches for kind \"Foo\""
        );
        assert_eq!(fatal_message("  plain failure \n"), "plain failure");
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let engine = KubectlEngine::new("/nonexistent/kubeapply/kubectl");
        let mut flags = FlagSet::new(Verb::Apply);
        flags.set("filename", "a.yaml").unwrap();

        let err = engine
            .run(&Invocation::new("/tmp/kubeconfig", flags), &CapturedStreams::new())
            .unwrap_err();

        assert!(matches!(err, KubectlError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_reports_fatal() {
        let _serial = SERIAL.blocking_lock();

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("kubectl");
        std::fs::write(
            &script,
            "#!/bin/sh\necho \"args: $*\"\necho 'error: the server could not find the requested resource' >&2\nexit 3\n",
        )
        .unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let seen = Arc::new(Mutex::new(None));
        let _guard = fatal::intercept(Verb::Delete, {
            let seen = seen.clone();
            move |msg, code| *seen.lock().unwrap() = Some((msg.to_string(), code))
        });

        let mut flags = FlagSet::new(Verb::Delete);
        flags.set("filename", "ns.yaml").unwrap();
        let streams = CapturedStreams::new();
        KubectlEngine::new(&script)
            .run(&Invocation::new("/tmp/kubeconfig", flags), &streams)
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            Some((
                "error: the server could not find the requested resource".to_string(),
                3
            ))
        );
        assert_eq!(
            streams.stdout(),
            "args: --kubeconfig=/tmp/kubeconfig delete --filename=ns.yaml\n"
        );
    }
}
