//! Disposable clusters for integration tests
//!
//! An [`EphemeralCluster`] goes through three phases:
//!
//! ```text
//! Uninitialized --start()--> Running --stop()--> Stopped
//! ```
//!
//! `stop()` on a cluster that never started is a no-op. A failed `start()`
//! does not clean up after itself: the temporary kubeconfig file and any
//! half-created cluster are left behind.

use kube::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{ClusterError, Result};
use crate::kubeconfig::client_from_kubeconfig;
use crate::names::random_name;
use crate::provider::{ClusterProvider, ClusterSpec, DEFAULT_WAIT_TIMEOUT, KindProvider};

/// Default node image repository
pub const DEFAULT_NODE_IMAGE: &str = "kindest/node";

/// Default Kubernetes version of the node image
pub const DEFAULT_NODE_VERSION: &str = "v1.26.2";

/// Total length of generated cluster names
const CLUSTER_NAME_LENGTH: usize = 24;

/// Lifecycle phase of an ephemeral cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterPhase {
    Uninitialized,
    Running,
    Stopped,
}

struct RunningCluster {
    name: String,
    kubeconfig_path: PathBuf,
    client: Client,
}

enum State {
    Uninitialized,
    Running(RunningCluster),
    Stopped,
}

/// A short-lived single-node cluster
pub struct EphemeralCluster {
    node_image: String,
    node_version: String,
    wait_timeout: Duration,
    provider: Arc<dyn ClusterProvider>,
    state: State,
}

impl EphemeralCluster {
    /// Kind-backed cluster with the default node image
    pub fn new() -> Self {
        Self {
            node_image: DEFAULT_NODE_IMAGE.to_string(),
            node_version: DEFAULT_NODE_VERSION.to_string(),
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            provider: Arc::new(KindProvider::new()),
            state: State::Uninitialized,
        }
    }

    /// Use a different node image repository
    pub fn with_node_image(mut self, image: impl Into<String>) -> Self {
        self.node_image = image.into();
        self
    }

    /// Use a different node image tag
    pub fn with_node_version(mut self, version: impl Into<String>) -> Self {
        self.node_version = version.into();
        self
    }

    /// Change how long `start()` waits for the control plane
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Use a different cluster provider
    pub fn with_provider(mut self, provider: impl ClusterProvider + 'static) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Full node image reference
    pub fn image(&self) -> String {
        format!("{}:{}", self.node_image, self.node_version)
    }

    pub fn phase(&self) -> ClusterPhase {
        match self.state {
            State::Uninitialized => ClusterPhase::Uninitialized,
            State::Running(_) => ClusterPhase::Running,
            State::Stopped => ClusterPhase::Stopped,
        }
    }

    /// Create the cluster and connect a client to it
    pub async fn start(&mut self) -> Result<()> {
        if let State::Running(running) = &self.state {
            return Err(ClusterError::AlreadyRunning {
                name: running.name.clone(),
            });
        }

        let name = random_name(CLUSTER_NAME_LENGTH, &["ephemeral", "cluster"]);

        let kubeconfig_path = tempfile::Builder::new()
            .prefix(&format!("{}-", name))
            .suffix(".kubeconfig")
            .tempfile()
            .and_then(|file| file.into_temp_path().keep().map_err(|e| e.error))
            .map_err(|source| ClusterError::TempFile {
                name: name.clone(),
                source,
            })?;

        let spec = ClusterSpec {
            name: name.clone(),
            node_image: self.image(),
            kubeconfig_path: kubeconfig_path.clone(),
            wait: self.wait_timeout,
        };

        info!(
            cluster = %name,
            image = %spec.node_image,
            provider = self.provider.name(),
            "starting ephemeral cluster"
        );
        self.provider.create(&spec).await?;

        let client = client_from_kubeconfig(&kubeconfig_path).await?;

        self.state = State::Running(RunningCluster {
            name,
            kubeconfig_path,
            client,
        });
        Ok(())
    }

    /// Delete the cluster and its kubeconfig file
    pub async fn stop(&mut self) -> Result<()> {
        let State::Running(running) = &self.state else {
            debug!("ephemeral cluster not running, nothing to stop");
            return Ok(());
        };

        self.provider
            .delete(&running.name, &running.kubeconfig_path)
            .await?;

        tokio::fs::remove_file(&running.kubeconfig_path)
            .await
            .map_err(|source| ClusterError::RemoveKubeconfig {
                path: running.kubeconfig_path.clone(),
                source,
            })?;

        info!(cluster = %running.name, "ephemeral cluster stopped");
        self.state = State::Stopped;
        Ok(())
    }

    /// Cluster name, while running
    pub fn name(&self) -> Option<&str> {
        match &self.state {
            State::Running(running) => Some(&running.name),
            _ => None,
        }
    }

    /// Path of the kubeconfig file, while running
    pub fn kubeconfig_path(&self) -> Option<&Path> {
        match &self.state {
            State::Running(running) => Some(&running.kubeconfig_path),
            _ => None,
        }
    }

    /// Client connected to the cluster, while running
    pub fn client(&self) -> Option<&Client> {
        match &self.state {
            State::Running(running) => Some(&running.client),
            _ => None,
        }
    }
}

impl Default for EphemeralCluster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubeconfig::write_test_kubeconfig;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Provider that writes a kubeconfig instead of creating anything
    #[derive(Clone, Default)]
    struct FakeProvider {
        created: Arc<Mutex<Vec<ClusterSpec>>>,
        deleted: Arc<Mutex<Vec<String>>>,
        fail_create: bool,
    }

    #[async_trait]
    impl ClusterProvider for FakeProvider {
        async fn create(&self, spec: &ClusterSpec) -> Result<()> {
            if self.fail_create {
                return Err(ClusterError::CreateFailed {
                    name: spec.name.clone(),
                    message: "docker is not running".to_string(),
                });
            }
            write_test_kubeconfig(&spec.kubeconfig_path)?;
            self.created.lock().unwrap().push(spec.clone());
            Ok(())
        }

        async fn delete(&self, name: &str, _kubeconfig_path: &Path) -> Result<()> {
            self.deleted.lock().unwrap().push(name.to_string());
            Ok(())
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    #[tokio::test]
    async fn test_stop_before_start_is_noop() {
        let provider = FakeProvider::default();
        let mut cluster = EphemeralCluster::new().with_provider(provider.clone());

        cluster.stop().await.unwrap();

        assert_eq!(cluster.phase(), ClusterPhase::Uninitialized);
        assert!(provider.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let provider = FakeProvider::default();
        let mut cluster = EphemeralCluster::new().with_provider(provider.clone());

        cluster.start().await.unwrap();
        assert_eq!(cluster.phase(), ClusterPhase::Running);

        let name = cluster.name().unwrap().to_string();
        assert_eq!(name.len(), 24);
        assert!(name.starts_with("ephemeral-cluster-"));

        let kubeconfig = cluster.kubeconfig_path().unwrap().to_path_buf();
        assert!(kubeconfig.exists());
        assert!(
            kubeconfig
                .file_name()
                .unwrap()
                .to_string_lossy()
                .ends_with(".kubeconfig")
        );
        assert!(cluster.client().is_some());

        {
            let created = provider.created.lock().unwrap();
            assert_eq!(created.len(), 1);
            assert_eq!(created[0].node_image, "kindest/node:v1.26.2");
            assert_eq!(created[0].wait, Duration::from_secs(300));
        }

        cluster.stop().await.unwrap();
        assert_eq!(cluster.phase(), ClusterPhase::Stopped);
        assert!(!kubeconfig.exists());
        assert!(cluster.kubeconfig_path().is_none());
        assert_eq!(*provider.deleted.lock().unwrap(), vec![name]);

        // Second stop does nothing
        cluster.stop().await.unwrap();
        assert_eq!(provider.deleted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_start_twice_fails() {
        let mut cluster = EphemeralCluster::new().with_provider(FakeProvider::default());

        cluster.start().await.unwrap();
        let err = cluster.start().await.unwrap_err();
        assert!(matches!(err, ClusterError::AlreadyRunning { .. }));

        cluster.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_start_stays_uninitialized() {
        let provider = FakeProvider {
            fail_create: true,
            ..Default::default()
        };
        let mut cluster = EphemeralCluster::new().with_provider(provider);

        let err = cluster.start().await.unwrap_err();
        assert!(matches!(err, ClusterError::CreateFailed { .. }));
        assert_eq!(cluster.phase(), ClusterPhase::Uninitialized);
        assert!(cluster.client().is_none());

        // Nothing is running, so stop has nothing to do
        cluster.stop().await.unwrap();
    }

    #[test]
    fn test_image_builder() {
        let cluster = EphemeralCluster::new()
            .with_node_image("registry.local/kind-node")
            .with_node_version("v1.31.0");

        assert_eq!(cluster.image(), "registry.local/kind-node:v1.31.0");
    }
}
