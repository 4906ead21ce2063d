//! Typed clients built from kubeconfig files

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;

use crate::error::{ClusterError, Result};

/// Create a Kubernetes client for the current context of a kubeconfig file
pub async fn client_from_kubeconfig(path: &Path) -> Result<Client> {
    let kubeconfig = Kubeconfig::read_from(path).map_err(|source| ClusterError::Kubeconfig {
        path: path.to_path_buf(),
        source,
    })?;

    let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|source| ClusterError::Kubeconfig {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Client::try_from(config)?)
}

/// Minimal kubeconfig pointing at a local API server, for tests
#[cfg(test)]
pub(crate) fn write_test_kubeconfig(path: &Path) -> std::io::Result<()> {
    std::fs::write(
        path,
        r#"apiVersion: v1
kind: Config
clusters:
- name: test
  cluster:
    server: https://127.0.0.1:6443
    insecure-skip-tls-verify: true
users:
- name: test
  user:
    token: test-token
contexts:
- name: test
  context:
    cluster: test
    user: test
current-context: test
"#,
    )
}
