//! Cluster providers that create and destroy disposable clusters
//!
//! - **Kind** (default): local clusters running in Docker

mod kind;

pub use kind::KindProvider;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

/// How long to wait for the control plane by default
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Description of a cluster to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSpec {
    /// Cluster name
    pub name: String,

    /// Node image, including the tag (`kindest/node:v1.26.2`)
    pub node_image: String,

    /// Where the provider writes the kubeconfig
    pub kubeconfig_path: PathBuf,

    /// How long to wait for the control plane to become ready
    pub wait: Duration,
}

/// Trait for cluster providers
#[async_trait]
pub trait ClusterProvider: Send + Sync {
    /// Create a cluster with a single control-plane node and write its kubeconfig
    async fn create(&self, spec: &ClusterSpec) -> Result<()>;

    /// Delete the cluster and its kubeconfig entries
    async fn delete(&self, name: &str, kubeconfig_path: &Path) -> Result<()>;

    /// Provider name for display
    fn name(&self) -> &'static str;
}
