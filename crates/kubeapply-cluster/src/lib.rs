//! kubeapply-cluster - Disposable clusters for Kubernetes integration tests
//!
//! This crate provides:
//! - **Ephemeral clusters**: single-node kind clusters created on demand and torn down after use
//! - **Existing clusters**: a typed client for a cluster you already have a kubeconfig for
//! - **Providers**: the [`ClusterProvider`] trait, with [`KindProvider`] as the default
//! - **Names**: random, DNS-safe resource names for tests
//!
//! # Example
//!
//! ```no_run
//! use kubeapply_cluster::EphemeralCluster;
//!
//! # async fn run() -> kubeapply_cluster::Result<()> {
//! let mut cluster = EphemeralCluster::new();
//! cluster.start().await?;
//!
//! let kubeconfig = cluster.kubeconfig_path().map(|p| p.to_path_buf());
//! // ... apply manifests against `kubeconfig`, inspect with `cluster.client()`
//!
//! cluster.stop().await?;
//! # Ok(())
//! # }
//! ```

pub mod ephemeral;
pub mod error;
pub mod existing;
pub mod kubeconfig;
pub mod names;
pub mod provider;

pub use ephemeral::{ClusterPhase, DEFAULT_NODE_IMAGE, DEFAULT_NODE_VERSION, EphemeralCluster};
pub use error::{ClusterError, Result};
pub use existing::ExistingCluster;
pub use kubeconfig::client_from_kubeconfig;
pub use names::random_name;
pub use provider::{ClusterProvider, ClusterSpec, DEFAULT_WAIT_TIMEOUT, KindProvider};
