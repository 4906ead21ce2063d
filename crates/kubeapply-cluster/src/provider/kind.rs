//! Kind cluster provider
//!
//! Creates and deletes Kind (Kubernetes in Docker) clusters through the
//! `kind` CLI.

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, info, instrument};

use super::{ClusterProvider, ClusterSpec};
use crate::error::{ClusterError, Result};

/// Kind cluster provider
#[derive(Debug, Clone)]
pub struct KindProvider {
    binary: PathBuf,
}

impl KindProvider {
    pub fn new() -> Self {
        Self::with_binary("kind")
    }

    /// Use a specific `kind` executable
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(&self, args: &[String]) -> Result<Output> {
        Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|source| ClusterError::Command {
                command: format!("{} {}", self.binary.display(), args.join(" ")),
                source,
            })
    }
}

impl Default for KindProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind configuration for a single control-plane node
fn kind_config(spec: &ClusterSpec) -> String {
    format!(
        r#"kind: Cluster
apiVersion: kind.x-k8s.io/v1alpha4
name: {}
nodes:
- role: control-plane
  image: {}
"#,
        spec.name, spec.node_image
    )
}

fn create_args(spec: &ClusterSpec, config_path: &Path) -> Vec<String> {
    vec![
        "create".to_string(),
        "cluster".to_string(),
        "--name".to_string(),
        spec.name.clone(),
        "--config".to_string(),
        config_path.display().to_string(),
        "--kubeconfig".to_string(),
        spec.kubeconfig_path.display().to_string(),
        "--wait".to_string(),
        format!("{}s", spec.wait.as_secs()),
    ]
}

fn delete_args(name: &str, kubeconfig_path: &Path) -> Vec<String> {
    vec![
        "delete".to_string(),
        "cluster".to_string(),
        "--name".to_string(),
        name.to_string(),
        "--kubeconfig".to_string(),
        kubeconfig_path.display().to_string(),
    ]
}

#[async_trait]
impl ClusterProvider for KindProvider {
    #[instrument(skip(self, spec), fields(cluster_name = %spec.name, provider = "kind"))]
    async fn create(&self, spec: &ClusterSpec) -> Result<()> {
        info!("Creating Kind cluster: {}", spec.name);

        let mut config_file = tempfile::Builder::new()
            .prefix("kind-config-")
            .suffix(".yaml")
            .tempfile()?;
        config_file.write_all(kind_config(spec).as_bytes())?;
        config_file.flush()?;

        let output = self.run(&create_args(spec, config_file.path())).await?;
        if !output.status.success() {
            return Err(ClusterError::CreateFailed {
                name: spec.name.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("Cluster {} created successfully", spec.name);
        Ok(())
    }

    #[instrument(skip(self), fields(cluster_name = %name, provider = "kind"))]
    async fn delete(&self, name: &str, kubeconfig_path: &Path) -> Result<()> {
        info!("Deleting Kind cluster: {}", name);

        let output = self.run(&delete_args(name, kubeconfig_path)).await?;
        if !output.status.success() {
            return Err(ClusterError::DeleteFailed {
                name: name.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!("Cluster {} deleted", name);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "kind"
    }
}
