//! Error types for kubeapply-cluster

use std::path::PathBuf;
use thiserror::Error;

/// Result type for kubeapply-cluster operations
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Errors that can occur while managing test clusters
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClusterError {
    /// The temporary kubeconfig file could not be created
    #[error("could not create temporary file for kubeconfig of cluster {name}: {source}")]
    TempFile {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The provider failed to create the cluster
    #[error("could not create ephemeral cluster {name}: {message}")]
    CreateFailed { name: String, message: String },

    /// The provider failed to delete the cluster
    #[error("could not delete ephemeral cluster {name}: {message}")]
    DeleteFailed { name: String, message: String },

    /// A provider command could not be run
    #[error("failed to run `{command}`: {source}")]
    Command {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The kubeconfig could not be read or interpreted
    #[error("could not load kubeconfig {}: {source}", path.display())]
    Kubeconfig {
        path: PathBuf,
        #[source]
        source: kube::config::KubeconfigError,
    },

    /// The kubeconfig file could not be removed
    #[error("could not delete kubeconfig file {}: {source}", path.display())]
    RemoveKubeconfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cluster is already running for this handle
    #[error("ephemeral cluster {name} is already running")]
    AlreadyRunning { name: String },

    /// Kubernetes client error
    #[error("could not create client: {0}")]
    Client(#[from] kube::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
