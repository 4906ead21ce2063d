//! Command engines that carry out apply and delete invocations
//!
//! The bridge never talks to the cluster itself. It describes what to run as
//! an [`Invocation`] (verb + flags, the way `kubectl` would receive them) and
//! hands it to a [`CommandEngine`]:
//! - **KubectlEngine** (default): runs the `kubectl` binary
//! - **MockEngine**: records invocations and replays scripted outcomes, for tests

mod flags;
mod kubectl;
mod mock;

pub use flags::FlagSet;
pub use kubectl::KubectlEngine;
pub use mock::{MockBehavior, MockEngine};

use std::fmt;

use crate::error::Result;
use crate::streams::CapturedStreams;

/// kubectl verb an invocation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Apply,
    Delete,
}

impl Verb {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Delete => "delete",
        }
    }

    /// Flags the verb accepts, without the leading `--`
    pub const fn known_flags(self) -> &'static [&'static str] {
        match self {
            Self::Apply => &[
                "filename",
                "kustomize",
                "recursive",
                "dry-run",
                "request-timeout",
                "server-side",
                "force-conflicts",
                "field-manager",
                "validate",
                "prune",
                "selector",
                "overwrite",
                "wait",
                "timeout",
            ],
            Self::Delete => &[
                "filename",
                "kustomize",
                "recursive",
                "dry-run",
                "request-timeout",
                "cascade",
                "grace-period",
                "ignore-not-found",
                "selector",
                "wait",
                "timeout",
                "force",
            ],
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully assembled command: target cluster, verb, and flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    kubeconfig: String,
    flags: FlagSet,
}

impl Invocation {
    pub fn new(kubeconfig: impl Into<String>, flags: FlagSet) -> Self {
        Self {
            kubeconfig: kubeconfig.into(),
            flags,
        }
    }

    pub fn verb(&self) -> Verb {
        self.flags.verb()
    }

    pub fn kubeconfig(&self) -> &str {
        &self.kubeconfig
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Command line arguments, excluding the program name
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.flags.len() + 2);
        args.push(format!("--kubeconfig={}", self.kubeconfig));
        args.push(self.verb().to_string());
        args.extend(self.flags.to_args());
        args
    }
}

/// Something that can execute an [`Invocation`]
///
/// `run` blocks until the command is done. Unrecoverable command failures are
/// reported through [`crate::fatal::fatal`] under the invocation's verb, not
/// through the return value; an `Err` is reserved for failures to reach the
/// engine at all.
pub trait CommandEngine: Send + Sync + 'static {
    /// Execute the invocation, writing any output into `streams`
    fn run(&self, invocation: &Invocation, streams: &CapturedStreams) -> Result<()>;

    /// Engine name for logging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_args() {
        let mut flags = FlagSet::new(Verb::Apply);
        flags.set("request-timeout", "14").unwrap();
        flags.set("filename", "a.yaml,b.yaml").unwrap();

        let invocation = Invocation::new("/tmp/kubeconfig", flags);

        insta::assert_snapshot!(
            invocation.args().join(" "),
            @"--kubeconfig=/tmp/kubeconfig apply --request-timeout=14 --filename=a.yaml,b.yaml"
        );
        assert_eq!(invocation.verb(), Verb::Apply);
    }

    #[test]
    fn test_verb_display() {
        assert_eq!(Verb::Apply.to_string(), "apply");
        assert_eq!(Verb::Delete.to_string(), "delete");
    }
}
