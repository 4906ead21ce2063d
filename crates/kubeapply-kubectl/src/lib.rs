//! kubeapply-kubectl - `kubectl apply` / `kubectl delete` as a library
//!
//! This crate provides:
//! - **Apply**: manifest files (`-f`) and Kustomization directories (`-k`), with dry-run and recursive modes
//! - **Delete**: the same two target kinds, mirrored
//! - **Deadlines**: every call is bounded by its context deadline (15s by default)
//! - **Fatal error capture**: command failures come back as errors carrying the captured output,
//!   instead of terminating the process
//! - **Engines**: the `kubectl` binary by default, or any [`CommandEngine`]
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use kubeapply_kubectl::{ApplyManifestsOptions, Context, apply_manifests, delete_manifests};
//!
//! # async fn run() -> kubeapply_kubectl::Result<()> {
//! let ctx = Context::with_timeout(Duration::from_secs(30));
//!
//! apply_manifests(&ctx, "/path/to/kubeconfig", &ApplyManifestsOptions::new(), &["ns.yaml"]).await?;
//! delete_manifests(&ctx, "/path/to/kubeconfig", &["ns.yaml"]).await?;
//! # Ok(())
//! # }
//! ```

mod bridge;
pub mod client;
pub mod config;
pub mod context;
pub mod dry_run;
pub mod engine;
pub mod error;
pub mod fatal;
pub mod options;
pub mod streams;

pub use client::{
    Kubectl, apply_kustomization, apply_manifests, delete_kustomization, delete_manifests,
};
pub use config::{DEFAULT_TIMEOUT, KubectlConfig};
pub use context::Context;
pub use dry_run::DryRun;
pub use engine::{CommandEngine, FlagSet, Invocation, KubectlEngine, MockBehavior, MockEngine, Verb};
pub use error::{KubectlError, Result};
pub use options::{ApplyKustomizationOptions, ApplyManifestsOptions};
pub use streams::CapturedStreams;
