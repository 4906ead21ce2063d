//! Error types for kubeapply-kubectl

use thiserror::Error;

use crate::engine::Verb;

/// Result type for kubeapply-kubectl operations
pub type Result<T> = std::result::Result<T, KubectlError>;

/// Errors that can occur while applying or deleting manifests
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubectlError {
    /// No kubeconfig path was given
    #[error("kubeconfig path cannot be empty")]
    EmptyKubeconfig,

    /// No options were given
    #[error("options cannot be nil")]
    NilOptions,

    /// The path list was empty
    #[error("no files to {verb}")]
    NoFiles { verb: Verb },

    /// The command engine hit an unrecoverable condition
    #[error("Fatal error: {message}\nError code: {code}\nOut stream: {stdout}\nError stream: {stderr}\n")]
    Fatal {
        message: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    /// The effective deadline elapsed before the engine finished
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// The engine binary could not be started
    #[error("failed to run `{binary}`: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// A flag the verb does not define was set
    #[error("unknown flag: --{flag} for `kubectl {verb}`")]
    UnknownFlag { verb: Verb, flag: String },

    /// The result slot was dropped without a value
    #[error("operation was interrupted before producing a result")]
    Interrupted,

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for KubectlError {
    fn from(e: serde_yaml::Error) -> Self {
        KubectlError::Serialization(e.to_string())
    }
}

impl KubectlError {
    /// Check if this is a local precondition failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            KubectlError::EmptyKubeconfig | KubectlError::NilOptions | KubectlError::NoFiles { .. }
        )
    }

    /// Check if the command engine reported a fatal error
    pub fn is_fatal(&self) -> bool {
        matches!(self, KubectlError::Fatal { .. })
    }

    /// Check if the call timed out
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, KubectlError::DeadlineExceeded)
    }

    /// Exit code reported by the engine, for fatal errors
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            KubectlError::Fatal { code, .. } => Some(*code),
            _ => None,
        }
    }
}
