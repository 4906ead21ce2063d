//! Clusters that already exist and are not managed by this crate

use kube::Client;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::kubeconfig::client_from_kubeconfig;

/// A pre-existing cluster reachable through a kubeconfig file
///
/// # Example
///
/// ```no_run
/// # async fn run() -> kubeapply_cluster::Result<()> {
/// let cluster = kubeapply_cluster::ExistingCluster::new("/home/me/.kube/config").await?;
/// let client = cluster.client();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ExistingCluster {
    kubeconfig_path: PathBuf,
    client: Client,
}

impl ExistingCluster {
    /// Connect to the cluster of the kubeconfig's current context
    pub async fn new(kubeconfig_path: impl Into<PathBuf>) -> Result<Self> {
        let kubeconfig_path = kubeconfig_path.into();
        debug!(kubeconfig = %kubeconfig_path.display(), "using existing cluster");

        let client = client_from_kubeconfig(&kubeconfig_path).await?;
        Ok(Self {
            kubeconfig_path,
            client,
        })
    }

    pub fn kubeconfig_path(&self) -> &Path {
        &self.kubeconfig_path
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClusterError;
    use crate::kubeconfig::write_test_kubeconfig;

    #[tokio::test]
    async fn test_existing_cluster_from_kubeconfig() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        write_test_kubeconfig(&path).unwrap();

        let cluster = ExistingCluster::new(&path).await.unwrap();
        assert_eq!(cluster.kubeconfig_path(), path.as_path());
    }

    #[tokio::test]
    async fn test_existing_cluster_requires_kubeconfig() {
        let result = ExistingCluster::new("/nonexistent/kubeapply/config").await;
        assert!(matches!(result, Err(ClusterError::Kubeconfig { .. })));
    }
}
